//! CSMA/CD access control.
//!
//! Before each transmission the sender "listens" to the medium: the injected
//! [`LinkConditions`] decide whether the attempt collides. A collision is
//! reported and the whole attempt is repeated immediately, with no backoff.
//! The first clean attempt performs the device's normal send.
//!
//! Every attempt is an independent Bernoulli trial, so the loop ends with
//! probability 1 but has no upper bound. It is a loop rather than recursion so
//! a long run of collisions cannot exhaust the stack.

use crate::address::MacAddress;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::forwarding::{Forwarded, ForwardingNode};
use crate::medium::LinkConditions;
use log::{info, warn};

/// Outcome of one logical transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitReport {
    /// Attempts made, including the successful one
    pub attempts: u64,

    /// Attempts lost to collisions
    pub collisions: u64,

    /// What the forwarding node did with the frame
    pub forwarded: Forwarded,
}

/// Carrier-sense multiple access with collision detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsmaCd {
    max_attempts: Option<u64>,
}

impl CsmaCd {
    /// Unbounded retries.
    pub fn new() -> Self {
        Self { max_attempts: None }
    }

    /// Give up after `max_attempts` collided attempts.
    ///
    /// Meant for tests that must bound worst-case run time; under the normal
    /// collision probability the guard is never reached.
    pub fn with_max_attempts(max_attempts: u64) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }

    /// Send `payload` from `device` to `dest` through `node`, retrying on collision.
    ///
    /// The underlying send happens exactly once on success.
    ///
    /// # Errors
    /// `Error::AttemptsExhausted` only when an attempt guard is set and every
    /// allowed attempt collided. Nothing is sent in that case.
    pub fn transmit<C>(
        &self,
        conditions: &mut C,
        device: &Device,
        node: &mut dyn ForwardingNode,
        dest: &MacAddress,
        payload: &str,
    ) -> Result<TransmitReport>
    where
        C: LinkConditions + ?Sized,
    {
        let mut attempts = 0;
        let mut collisions = 0;

        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(Error::AttemptsExhausted {
                        operation: "csma/cd",
                        attempts,
                    });
                }
            }
            attempts += 1;

            if conditions.collision() {
                collisions += 1;
                warn!("Collision detected! Retransmitting...");
                continue;
            }

            let forwarded = device.send(node, dest, payload);
            if collisions > 0 {
                info!("{} got through after {} collisions", device.mac(), collisions);
            }
            return Ok(TransmitReport {
                attempts,
                collisions,
                forwarded,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forwarding::Switch;
    use crate::medium::{RandomConditions, ScriptedConditions};
    use std::rc::Rc;

    fn pair() -> (Rc<Device>, Rc<Device>, Switch) {
        let d1 = Device::shared("D1", "A1");
        let d2 = Device::shared("D2", "A2");
        let mut switch = Switch::new("S");
        switch.connect(d1.clone(), "A1");
        switch.connect(d2.clone(), "A2");
        (d1, d2, switch)
    }

    #[test]
    fn test_clean_first_attempt() {
        let (d1, d2, mut switch) = pair();
        let mut conditions = ScriptedConditions::new();

        let report = CsmaCd::new()
            .transmit(&mut conditions, &d1, &mut switch, &"A2".into(), "1010101")
            .unwrap();

        assert_eq!(report.attempts, 1);
        assert_eq!(report.collisions, 0);
        assert_eq!(d2.received(), vec!["1010101"]);
    }

    #[test]
    fn test_collisions_do_not_duplicate_delivery() {
        let (d1, d2, mut switch) = pair();
        let mut conditions = ScriptedConditions::new().with_collisions([true, true, true, false]);

        let report = CsmaCd::new()
            .transmit(&mut conditions, &d1, &mut switch, &"A2".into(), "payload")
            .unwrap();

        assert_eq!(report.attempts, 4);
        assert_eq!(report.collisions, 3);
        assert_eq!(d2.received(), vec!["payload"]);
        assert_eq!(switch.stats().frames, 1);
    }

    #[test]
    fn test_guard_stops_without_sending() {
        let (d1, d2, mut switch) = pair();
        let mut conditions = ScriptedConditions::new().with_collisions([true; 10]);

        let err = CsmaCd::with_max_attempts(5)
            .transmit(&mut conditions, &d1, &mut switch, &"A2".into(), "x")
            .unwrap_err();

        assert!(matches!(err, Error::AttemptsExhausted { attempts: 5, .. }));
        assert_eq!(d2.received_count(), 0);
        assert_eq!(switch.stats().frames, 0);
    }

    #[test]
    fn test_long_collision_run_is_iterative() {
        let (d1, d2, mut switch) = pair();
        let mut conditions =
            ScriptedConditions::new().with_collisions(std::iter::repeat(true).take(200_000));

        let report = CsmaCd::new()
            .transmit(&mut conditions, &d1, &mut switch, &"A2".into(), "x")
            .unwrap();

        assert_eq!(report.collisions, 200_000);
        assert_eq!(d2.received_count(), 1);
    }

    #[test]
    fn test_one_send_per_message_under_random_collisions() {
        let (d1, d2, mut switch) = pair();
        let mut conditions = RandomConditions::seeded(99);
        let csma = CsmaCd::new();

        for i in 0..50 {
            csma.transmit(&mut conditions, &d1, &mut switch, &"A2".into(), &format!("m{i}"))
                .unwrap();
        }

        let expected: Vec<String> = (0..50).map(|i| format!("m{i}")).collect();
        assert_eq!(d2.received(), expected);
        assert_eq!(switch.stats().frames, 50);
        assert!(conditions.stats().attempts >= 50);
    }
}
