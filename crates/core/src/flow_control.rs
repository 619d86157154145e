//! Sliding-window reliable transfer.
//!
//! A transfer walks a fixed, ordered list of frames with a window of size `W`:
//!
//! ```text
//! Idle -> SendingWindow -> AwaitingAck -> Advance -> SendingWindow -> ... -> Done
//!                                      \-> Resend  -/
//! ```
//!
//! Each round sends frames `[cursor, min(cursor + W, total))` in order through
//! the device's normal send path, then asks the link conditions whether the
//! window was acknowledged. An acknowledgment slides the cursor to the end of
//! the window; a missing one resends the entire window (go-back-N, no
//! selective repeat, no duplicate suppression at the receiver).
//!
//! The cursor never moves backwards and never passes `total`. Each round
//! advances with non-zero probability, so a transfer finishes with
//! probability 1, though no fixed bound on rounds exists.

use crate::address::MacAddress;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::forwarding::ForwardingNode;
use crate::medium::LinkConditions;
use log::{debug, info, warn};

/// Default number of frames in flight per window.
pub const DEFAULT_WINDOW: usize = 3;

/// Split `payload` into frames of `frame_len` characters (the last may be shorter).
///
/// `frame_len` of zero is treated as one.
pub fn segment(payload: &str, frame_len: usize) -> Vec<String> {
    let chars: Vec<char> = payload.chars().collect();
    chars
        .chunks(frame_len.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Where a transfer session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    SendingWindow,
    AwaitingAck,
    Advance,
    Resend,
    Done,
}

/// State of one transfer: frames, window, cursor.
#[derive(Debug, Clone)]
struct TransferSession<'a> {
    frames: &'a [String],
    window: usize,
    cursor: usize,
    state: SessionState,
}

impl<'a> TransferSession<'a> {
    fn new(frames: &'a [String], window: usize) -> Self {
        Self {
            frames,
            window,
            cursor: 0,
            state: SessionState::Idle,
        }
    }

    /// Index of the next unacknowledged frame.
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn is_done(&self) -> bool {
        self.cursor == self.frames.len()
    }

    /// Half-open bounds of the current window.
    fn window_bounds(&self) -> (usize, usize) {
        (self.cursor, (self.cursor + self.window).min(self.frames.len()))
    }

    fn acknowledge(&mut self, acked: bool) {
        if acked {
            let (_, end) = self.window_bounds();
            self.cursor = end;
            self.state = SessionState::Advance;
        } else {
            self.state = SessionState::Resend;
        }
        if self.is_done() {
            self.state = SessionState::Done;
        }
    }
}

/// Observable result of a finished transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Windows sent (including resent ones)
    pub rounds: u64,

    /// Individual frame sends, duplicates from resends included
    pub frames_sent: u64,

    /// Windows acknowledged
    pub acks: u64,

    /// Windows resent after a missing acknowledgment
    pub resends: u64,

    /// Cursor value after every round, starting with the initial 0
    pub cursor_history: Vec<usize>,
}

impl TransferReport {
    /// Extra frame sends caused by resends, as a fraction of all sends.
    pub fn resend_overhead(&self, total_frames: usize) -> f64 {
        if self.frames_sent == 0 {
            0.0
        } else {
            self.frames_sent.saturating_sub(total_frames as u64) as f64 / self.frames_sent as f64
        }
    }
}

/// Sliding-window sender.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindow {
    window: usize,
    max_rounds: Option<u64>,
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_rounds: None,
        }
    }
}

impl SlidingWindow {
    /// # Errors
    /// `Error::InvalidWindow` if `window` is zero.
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(Error::InvalidWindow(window));
        }
        Ok(Self {
            window,
            max_rounds: None,
        })
    }

    /// Bound the number of rounds. Test-only guard; production transfers are unbounded.
    pub fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Transfer `frames` from `device` to `dest` through `node`.
    ///
    /// # Errors
    /// `Error::AttemptsExhausted` only when a round guard is set and reached
    /// before the last frame was acknowledged.
    pub fn transfer<C>(
        &self,
        conditions: &mut C,
        device: &Device,
        node: &mut dyn ForwardingNode,
        dest: &MacAddress,
        frames: &[String],
    ) -> Result<TransferReport>
    where
        C: LinkConditions + ?Sized,
    {
        info!("Initiating Sliding Window Protocol with window size: {}", self.window);

        let mut session = TransferSession::new(frames, self.window);
        let mut report = TransferReport {
            cursor_history: vec![0],
            ..TransferReport::default()
        };

        while !session.is_done() {
            if let Some(max) = self.max_rounds {
                if report.rounds >= max {
                    return Err(Error::AttemptsExhausted {
                        operation: "sliding window",
                        attempts: report.rounds,
                    });
                }
            }

            session.state = SessionState::SendingWindow;
            let (start, end) = session.window_bounds();
            info!("Sending frames {} to {}", start + 1, end);
            for (offset, frame) in frames[start..end].iter().enumerate() {
                info!("Frame {} sent: {}", start + offset + 1, frame);
                device.send(node, dest, frame);
                report.frames_sent += 1;
            }
            report.rounds += 1;

            session.state = SessionState::AwaitingAck;
            let acked = conditions.ack_received();
            session.acknowledge(acked);
            if acked {
                info!("Acknowledgment received.");
                report.acks += 1;
            } else {
                warn!("No acknowledgment received. Resending frames...");
                report.resends += 1;
            }
            debug!("Session {:?} at frame {}", session.state, session.cursor());
            report.cursor_history.push(session.cursor());
        }

        info!("Sliding Window Protocol completed.");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forwarding::Switch;
    use crate::medium::{RandomConditions, ScriptedConditions};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::rc::Rc;

    fn setup() -> (Rc<Device>, Rc<Device>, Switch) {
        let d1 = Device::shared("D1", "A1");
        let d3 = Device::shared("D3", "A3");
        let mut switch = Switch::new("S");
        switch.connect(d1.clone(), "A1");
        switch.connect(d3.clone(), "A3");
        (d1, d3, switch)
    }

    fn assert_history_valid(history: &[usize], window: usize, total: usize) {
        assert_eq!(history.first(), Some(&0));
        assert_eq!(history.last(), Some(&total));
        for pair in history.windows(2) {
            assert!(pair[1] >= pair[0], "cursor went backwards: {history:?}");
            assert!(pair[1] - pair[0] <= window, "step larger than window: {history:?}");
        }
    }

    #[test]
    fn test_segment() {
        assert_eq!(segment("110011", 1).len(), 6);
        assert_eq!(segment("110011", 4), vec!["1100", "11"]);
        assert_eq!(segment("abc", 0), vec!["a", "b", "c"]);
        assert!(segment("", 3).is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(SlidingWindow::new(0), Err(Error::InvalidWindow(0))));
        assert_eq!(SlidingWindow::default().window(), DEFAULT_WINDOW);
    }

    #[test]
    fn test_all_acked_six_frames_window_two() {
        let (d1, d3, mut switch) = setup();
        let frames = segment("110011", 1);
        let mut conditions = ScriptedConditions::new();

        let report = SlidingWindow::new(2)
            .unwrap()
            .transfer(&mut conditions, &d1, &mut switch, &"A3".into(), &frames)
            .unwrap();

        assert_eq!(report.rounds, 3);
        assert_eq!(report.frames_sent, 6);
        assert_eq!(report.cursor_history, vec![0, 2, 4, 6]);
        assert_eq!(d3.received(), frames);
    }

    #[test]
    fn test_missing_ack_resends_whole_window() {
        let (d1, d3, mut switch) = setup();
        let frames = segment("abcde", 1);
        let mut conditions = ScriptedConditions::new().with_acks([false, true, false, false, true]);

        let report = SlidingWindow::new(3)
            .unwrap()
            .transfer(&mut conditions, &d1, &mut switch, &"A3".into(), &frames)
            .unwrap();

        assert_eq!(report.cursor_history, vec![0, 0, 3, 3, 3, 5]);
        assert_eq!(report.resends, 3);
        assert_eq!(report.acks, 2);
        // abc, abc, de, de, de: no duplicate suppression at the receiver
        assert_eq!(
            d3.received(),
            vec!["a", "b", "c", "a", "b", "c", "d", "e", "d", "e", "d", "e"]
        );
    }

    #[test]
    fn test_empty_transfer_is_done_immediately() {
        let (d1, d3, mut switch) = setup();
        let mut conditions = ScriptedConditions::new().with_acks([false]);

        let report = SlidingWindow::default()
            .transfer(&mut conditions, &d1, &mut switch, &"A3".into(), &[])
            .unwrap();

        assert_eq!(report.rounds, 0);
        assert_eq!(report.cursor_history, vec![0]);
        assert_eq!(d3.received_count(), 0);
        // The ack script was never consulted.
        assert_eq!(conditions.remaining(), (0, 1));
    }

    #[test]
    fn test_round_guard() {
        let (d1, _d3, mut switch) = setup();
        let frames = segment("1111", 1);
        let mut conditions = ScriptedConditions::new().with_acks([false; 20]);

        let err = SlidingWindow::new(2)
            .unwrap()
            .with_max_rounds(4)
            .transfer(&mut conditions, &d1, &mut switch, &"A3".into(), &frames)
            .unwrap_err();

        assert!(matches!(err, Error::AttemptsExhausted { attempts: 4, .. }));
    }

    #[test]
    fn test_random_transfers_always_terminate_monotonically() {
        let mut sizes = ChaCha8Rng::seed_from_u64(2024);
        for seed in 0..40 {
            let (d1, _d3, mut switch) = setup();
            let total = sizes.gen_range(0..20);
            let window = sizes.gen_range(1..6);
            let frames: Vec<String> = (0..total).map(|i| i.to_string()).collect();
            let mut conditions = RandomConditions::seeded(seed);

            let report = SlidingWindow::new(window)
                .unwrap()
                .with_max_rounds(10_000)
                .transfer(&mut conditions, &d1, &mut switch, &"A3".into(), &frames)
                .unwrap();

            assert_history_valid(&report.cursor_history, window, total);
            assert_eq!(report.rounds, report.acks + report.resends);
            assert!(report.acks as usize >= total.div_ceil(window));
        }
    }

    #[test]
    fn test_session_state_transitions() {
        let frames = segment("abcd", 1);
        let mut session = TransferSession::new(&frames, 3);
        assert_eq!(session.state, SessionState::Idle);

        session.acknowledge(false);
        assert_eq!(session.state, SessionState::Resend);
        assert_eq!(session.cursor(), 0);

        session.acknowledge(true);
        assert_eq!(session.state, SessionState::Advance);
        assert_eq!(session.cursor(), 3);

        session.acknowledge(true);
        assert_eq!(session.state, SessionState::Done);
        assert_eq!(session.cursor(), frames.len());
    }

    #[test]
    fn test_resend_overhead() {
        let report = TransferReport {
            frames_sent: 8,
            ..TransferReport::default()
        };
        assert_eq!(report.resend_overhead(6), 0.25);
    }
}
