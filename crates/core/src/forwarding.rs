//! Forwarding nodes: the learning switch and the segment bridge.
//!
//! Both decide, per frame, between unicast to a known endpoint and flooding
//! to everyone except the sender. An unknown destination is never an error;
//! flooding is the fallback.
//!
//! # Switch learning
//!
//! When a switch sees a source address it has no entry for, it records the
//! address as *unbound*: it now knows the address exists but not where it
//! lives. Only `connect` binds an address to an endpoint. Unbound entries are
//! treated as unknown, so frames to them are flooded.
//!
//! # Ownership
//!
//! Each node owns its table. `forward` takes `&mut self`, so table writes are
//! serialized by construction.

use crate::address::MacAddress;
use crate::device::Endpoint;
use crate::frame::Frame;
use crate::table::AddressTable;
use crate::topology::{Node, NodeKind};
use log::{debug, info};
use std::rc::Rc;

/// What a forwarding decision did with a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forwarded {
    /// Delivered to the endpoint bound to the destination.
    Unicast { to: String },
    /// Destination unknown; delivered to `recipients` endpoints.
    Flooded { recipients: usize },
}

impl Forwarded {
    /// Number of `receive` calls this decision produced.
    pub fn deliveries(&self) -> usize {
        match self {
            Forwarded::Unicast { .. } => 1,
            Forwarded::Flooded { recipients } => *recipients,
        }
    }
}

/// Counters kept by a forwarding node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardingStats {
    /// Frames handed to `forward`
    pub frames: u64,

    /// Frames delivered to a single known endpoint
    pub unicast: u64,

    /// Frames flooded because the destination was unknown
    pub flooded: u64,

    /// Total `receive` calls made
    pub deliveries: u64,

    /// Source addresses learned as unbound entries
    pub learned: u64,
}

impl ForwardingStats {
    fn record(&mut self, outcome: &Forwarded) {
        self.frames += 1;
        self.deliveries += outcome.deliveries() as u64;
        match outcome {
            Forwarded::Unicast { .. } => self.unicast += 1,
            Forwarded::Flooded { .. } => self.flooded += 1,
        }
    }

    /// Fraction of frames that had to be flooded.
    pub fn flood_rate(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.flooded as f64 / self.frames as f64
        }
    }
}

/// A node that moves frames between endpoints.
pub trait ForwardingNode: Node {
    /// Deliver `frame` to its destination, or flood it.
    fn forward(&mut self, frame: Frame) -> Forwarded;

    fn stats(&self) -> ForwardingStats;
}

fn flood(name: &str, table: &AddressTable, frame: &Frame) -> Forwarded {
    let mut recipients = 0;
    for endpoint in table.flood_candidates(&frame.source) {
        endpoint.receive(&frame.payload);
        recipients += 1;
    }
    debug!("{} flooded frame from {} to {} endpoints", name, frame.source, recipients);
    Forwarded::Flooded { recipients }
}

/// Learning switch.
#[derive(Debug)]
pub struct Switch {
    name: String,
    table: AddressTable,
    stats: ForwardingStats,
}

impl Switch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: AddressTable::new(),
            stats: ForwardingStats::default(),
        }
    }

    /// Register `endpoint` under `address`. Last write wins.
    pub fn connect(&mut self, endpoint: Rc<dyn Endpoint>, address: impl Into<MacAddress>) {
        let address = address.into();
        info!("{} with MAC {} connected to {}", endpoint.name(), address, self.name);
        self.table.bind(address, endpoint);
    }

    pub fn table(&self) -> &AddressTable {
        &self.table
    }
}

impl Node for Switch {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Switch
    }
}

impl ForwardingNode for Switch {
    fn forward(&mut self, frame: Frame) -> Forwarded {
        if self.table.learn(&frame.source) {
            info!("{} learning MAC address {}", self.name, frame.source);
            self.stats.learned += 1;
        }

        let outcome = match self.table.lookup(&frame.dest) {
            Some(endpoint) => {
                info!("{} forwarding data from {} to {}", self.name, frame.source, frame.dest);
                endpoint.receive(&frame.payload);
                Forwarded::Unicast {
                    to: endpoint.name().to_string(),
                }
            }
            None => {
                info!("{} broadcasting data since {} is unknown", self.name, frame.dest);
                flood(&self.name, &self.table, &frame)
            }
        };

        self.stats.record(&outcome);
        outcome
    }

    fn stats(&self) -> ForwardingStats {
        self.stats
    }
}

/// Bridge joining whole segments.
///
/// Addresses are bound a segment at a time and never learned, so every entry
/// resolves to an endpoint.
#[derive(Debug)]
pub struct Bridge {
    name: String,
    table: AddressTable,
    stats: ForwardingStats,
}

impl Bridge {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: AddressTable::new(),
            stats: ForwardingStats::default(),
        }
    }

    /// Bind every `(address, endpoint)` pair of one segment.
    pub fn connect_segment<I>(&mut self, segment: I)
    where
        I: IntoIterator<Item = (MacAddress, Rc<dyn Endpoint>)>,
    {
        let mut count = 0;
        for (address, endpoint) in segment {
            self.table.bind(address, endpoint);
            count += 1;
        }
        info!("{} connected a segment of {} endpoints", self.name, count);
    }

    /// Pair endpoints with addresses position by position; extras on either side are ignored.
    pub fn connect_segment_zip(&mut self, endpoints: &[Rc<dyn Endpoint>], addresses: &[MacAddress]) {
        self.connect_segment(addresses.iter().cloned().zip(endpoints.iter().cloned()));
    }

    pub fn table(&self) -> &AddressTable {
        &self.table
    }
}

impl Node for Bridge {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Bridge
    }
}

impl ForwardingNode for Bridge {
    fn forward(&mut self, frame: Frame) -> Forwarded {
        let outcome = match self.table.lookup(&frame.dest) {
            Some(endpoint) => {
                info!("{} forwarding data from {} to {}", self.name, frame.source, frame.dest);
                endpoint.receive(&frame.payload);
                Forwarded::Unicast {
                    to: endpoint.name().to_string(),
                }
            }
            None => {
                info!("{} does not know {}, flooding frame...", self.name, frame.dest);
                flood(&self.name, &self.table, &frame)
            }
        };

        self.stats.record(&outcome);
        outcome
    }

    fn stats(&self) -> ForwardingStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;

    fn addr(s: &str) -> MacAddress {
        MacAddress::from(s)
    }

    fn switch_with(devices: &[Rc<Device>]) -> Switch {
        let mut switch = Switch::new("S");
        for device in devices {
            switch.connect(device.clone(), device.mac().clone());
        }
        switch
    }

    #[test]
    fn test_switch_unicast_to_known_destination() {
        let d1 = Device::shared("D1", "A1");
        let d2 = Device::shared("D2", "A2");
        let d3 = Device::shared("D3", "A3");
        let mut switch = switch_with(&[d1.clone(), d2.clone(), d3.clone()]);

        let outcome = d1.send(&mut switch, &addr("A2"), "hi");

        assert_eq!(outcome, Forwarded::Unicast { to: "D2".to_string() });
        assert_eq!(d2.received(), vec!["hi"]);
        assert_eq!(d1.received_count(), 0);
        assert_eq!(d3.received_count(), 0);
    }

    #[test]
    fn test_switch_floods_unknown_destination() {
        let d1 = Device::shared("D1", "A1");
        let d2 = Device::shared("D2", "A2");
        let d3 = Device::shared("D3", "A3");
        let mut switch = switch_with(&[d1.clone(), d2.clone(), d3.clone()]);

        let outcome = d1.send(&mut switch, &addr("A9"), "who?");

        assert_eq!(outcome, Forwarded::Flooded { recipients: 2 });
        assert_eq!(d1.received_count(), 0);
        assert_eq!(d2.received(), vec!["who?"]);
        assert_eq!(d3.received(), vec!["who?"]);
    }

    #[test]
    fn test_switch_single_device_flood_reaches_nobody() {
        let d1 = Device::shared("D1", "A1");
        let mut switch = switch_with(&[d1.clone()]);

        let outcome = d1.send(&mut switch, &addr("A9"), "anyone?");

        assert_eq!(outcome, Forwarded::Flooded { recipients: 0 });
        assert_eq!(d1.received_count(), 0);
    }

    #[test]
    fn test_switch_learns_unknown_source_as_unbound() {
        let d2 = Device::shared("D2", "A2");
        let mut switch = switch_with(&[d2.clone()]);

        switch.forward(Frame::new(addr("A7"), addr("A2"), "x"));

        assert!(switch.table().is_unbound(&addr("A7")));
        assert_eq!(switch.stats().learned, 1);

        // A frame back to the learned address floods: the entry resolves to nothing.
        let outcome = d2.send(&mut switch, &addr("A7"), "reply");
        assert_eq!(outcome, Forwarded::Flooded { recipients: 0 });
    }

    #[test]
    fn test_switch_does_not_relearn_connected_source() {
        let d1 = Device::shared("D1", "A1");
        let d2 = Device::shared("D2", "A2");
        let mut switch = switch_with(&[d1.clone(), d2.clone()]);

        d1.send(&mut switch, &addr("A2"), "a");
        assert_eq!(switch.stats().learned, 0);
        assert!(switch.table().lookup(&addr("A1")).is_some());
    }

    #[test]
    fn test_switch_reconnect_last_write_wins() {
        let d1 = Device::shared("D1", "A1");
        let old = Device::shared("OLD", "A2");
        let new = Device::shared("NEW", "A2");
        let mut switch = Switch::new("S");
        switch.connect(d1.clone(), "A1");
        switch.connect(old.clone(), "A2");
        switch.connect(new.clone(), "A2");

        d1.send(&mut switch, &addr("A2"), "m");

        assert_eq!(old.received_count(), 0);
        assert_eq!(new.received(), vec!["m"]);
    }

    #[test]
    fn test_switch_stats() {
        let d1 = Device::shared("D1", "A1");
        let d2 = Device::shared("D2", "A2");
        let d3 = Device::shared("D3", "A3");
        let mut switch = switch_with(&[d1.clone(), d2, d3]);

        d1.send(&mut switch, &addr("A2"), "1");
        d1.send(&mut switch, &addr("A9"), "2");

        let stats = switch.stats();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.unicast, 1);
        assert_eq!(stats.flooded, 1);
        assert_eq!(stats.deliveries, 3);
        assert_eq!(stats.flood_rate(), 0.5);
    }

    #[test]
    fn test_bridge_segment_and_forward() {
        let a = Device::shared("A", "M1");
        let b = Device::shared("B", "M2");
        let c = Device::shared("C", "M3");
        let mut bridge = Bridge::new("B1");
        let endpoints: Vec<Rc<dyn Endpoint>> = vec![a.clone(), b.clone(), c.clone()];
        bridge.connect_segment_zip(&endpoints, &[addr("M1"), addr("M2"), addr("M3")]);

        let outcome = a.send(&mut bridge, &addr("M3"), "direct");
        assert_eq!(outcome, Forwarded::Unicast { to: "C".to_string() });
        assert_eq!(c.received(), vec!["direct"]);
        assert_eq!(b.received_count(), 0);
    }

    #[test]
    fn test_bridge_flood_excludes_source_only() {
        let a = Device::shared("A", "M1");
        let b = Device::shared("B", "M2");
        let c = Device::shared("C", "M3");
        let mut bridge = Bridge::new("B1");
        bridge.connect_segment(vec![
            (addr("M1"), a.clone() as Rc<dyn Endpoint>),
            (addr("M2"), b.clone() as Rc<dyn Endpoint>),
            (addr("M3"), c.clone() as Rc<dyn Endpoint>),
        ]);

        let outcome = a.send(&mut bridge, &addr("ZZ"), "flood");

        assert_eq!(outcome, Forwarded::Flooded { recipients: 2 });
        assert_eq!(a.received_count(), 0);
        assert_eq!(b.received_count(), 1);
        assert_eq!(c.received_count(), 1);
        // Bridges never learn.
        assert!(!bridge.table().contains(&addr("ZZ")));
    }

    #[test]
    fn test_bridge_zip_ignores_extra_addresses() {
        let a = Device::shared("A", "M1");
        let mut bridge = Bridge::new("B1");
        let endpoints: Vec<Rc<dyn Endpoint>> = vec![a];
        bridge.connect_segment_zip(&endpoints, &[addr("M1"), addr("M2")]);
        assert_eq!(bridge.table().len(), 1);
    }
}
