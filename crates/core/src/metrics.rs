//! Metrics collection and reporting for a simulation run.
//!
//! Each protocol returns a small report of what it did. `Metrics` folds those
//! reports together so a driver can print one summary at the end:
//! - Forwarding: frames, unicasts, floods, deliveries, learned addresses
//! - Error control: payloads discarded by the parity gate
//! - Access control: attempts and collisions
//! - Flow control: windows, acknowledgments, resends
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. It is updated by the single
//! thread that drives the simulation.

use crate::access_control::TransmitReport;
use crate::flow_control::TransferReport;
use crate::forwarding::ForwardingStats;
use std::time::{Duration, Instant};

/// Counters for one run of the model.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Forwarding ===
    /// Frames handled by forwarding nodes
    pub frames_forwarded: u64,

    /// Frames delivered to a single known endpoint
    pub frames_unicast: u64,

    /// Frames flooded to all but the sender
    pub frames_flooded: u64,

    /// Total receive calls made by forwarding nodes
    pub deliveries: u64,

    /// Source addresses learned as unbound entries
    pub addresses_learned: u64,

    // === Error control ===
    /// Payloads that passed the parity gate
    pub payloads_checked: u64,

    /// Payloads dropped for odd parity
    pub payloads_corrupted: u64,

    // === Access control ===
    /// Logical messages sent through CSMA/CD
    pub messages_sent: u64,

    /// Transmission attempts, successful ones included
    pub attempts: u64,

    /// Attempts lost to collisions
    pub collisions: u64,

    // === Flow control ===
    /// Sliding-window transfers completed
    pub transfers: u64,

    /// Windows sent, resent ones included
    pub windows_sent: u64,

    /// Individual frames put on the wire by transfers
    pub transfer_frames_sent: u64,

    /// Windows acknowledged
    pub acks: u64,

    /// Windows resent after a missing acknowledgment
    pub resends: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            frames_forwarded: 0,
            frames_unicast: 0,
            frames_flooded: 0,
            deliveries: 0,
            addresses_learned: 0,
            payloads_checked: 0,
            payloads_corrupted: 0,
            messages_sent: 0,
            attempts: 0,
            collisions: 0,
            transfers: 0,
            windows_sent: 0,
            transfer_frames_sent: 0,
            acks: 0,
            resends: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Add a forwarding node's counters.
    pub fn record_forwarding(&mut self, stats: &ForwardingStats) {
        self.frames_forwarded += stats.frames;
        self.frames_unicast += stats.unicast;
        self.frames_flooded += stats.flooded;
        self.deliveries += stats.deliveries;
        self.addresses_learned += stats.learned;
    }

    /// Record one parity-gate decision.
    pub fn record_parity(&mut self, passed: bool) {
        if passed {
            self.payloads_checked += 1;
        } else {
            self.payloads_corrupted += 1;
        }
    }

    pub fn record_transmit(&mut self, report: &TransmitReport) {
        self.messages_sent += 1;
        self.attempts += report.attempts;
        self.collisions += report.collisions;
    }

    pub fn record_transfer(&mut self, report: &TransferReport) {
        self.transfers += 1;
        self.windows_sent += report.rounds;
        self.transfer_frames_sent += report.frames_sent;
        self.acks += report.acks;
        self.resends += report.resends;
    }

    /// Fraction of frames that were flooded.
    pub fn flood_rate(&self) -> f64 {
        if self.frames_forwarded == 0 {
            0.0
        } else {
            self.frames_flooded as f64 / self.frames_forwarded as f64
        }
    }

    /// Compute collision rate (collisions / attempts).
    pub fn collision_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.collisions as f64 / self.attempts as f64
        }
    }

    /// Compute resend rate (resends / windows sent).
    pub fn resend_rate(&self) -> f64 {
        if self.windows_sent == 0 {
            0.0
        } else {
            self.resends as f64 / self.windows_sent as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Forwarding ===");
        println!("Frames forwarded: {}", self.frames_forwarded);
        println!("Unicast: {}", self.frames_unicast);
        println!("Flooded: {} ({:.1}%)", self.frames_flooded, self.flood_rate() * 100.0);
        println!("Deliveries: {}", self.deliveries);
        println!("Addresses learned: {}", self.addresses_learned);
        println!();

        println!("=== Error Control ===");
        println!("Payloads passed parity: {}", self.payloads_checked);
        println!("Payloads discarded: {}", self.payloads_corrupted);
        println!();

        println!("=== Access Control (CSMA/CD) ===");
        println!("Messages: {}", self.messages_sent);
        println!("Attempts: {}", self.attempts);
        println!("Collisions: {} ({:.1}%)", self.collisions, self.collision_rate() * 100.0);
        println!();

        println!("=== Flow Control (Sliding Window) ===");
        println!("Transfers: {}", self.transfers);
        println!("Windows sent: {}", self.windows_sent);
        println!("Frames sent: {}", self.transfer_frames_sent);
        println!("Acknowledged: {}", self.acks);
        println!("Resent: {} ({:.1}%)", self.resends, self.resend_rate() * 100.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             frames_forwarded={}\n\
             frames_flooded={}\n\
             deliveries={}\n\
             payloads_corrupted={}\n\
             attempts={}\n\
             collisions={}\n\
             collision_rate={:.4}\n\
             windows_sent={}\n\
             resends={}\n\
             resend_rate={:.4}\n",
            self.duration().as_millis(),
            self.frames_forwarded,
            self.frames_flooded,
            self.deliveries,
            self.payloads_corrupted,
            self.attempts,
            self.collisions,
            self.collision_rate(),
            self.windows_sent,
            self.resends,
            self.resend_rate(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
