//! Endpoints and end devices.
//!
//! An [`Endpoint`] is anything a frame can be delivered to: an end device, or
//! a hub plugged into a switch port. Endpoints are shared through `Rc` since
//! the same device is referenced by every table and link it is attached to.

use crate::address::MacAddress;
use crate::forwarding::{Forwarded, ForwardingNode};
use crate::frame::Frame;
use crate::physical::Link;
use crate::topology::{Node, NodeKind};
use log::info;
use std::cell::RefCell;
use std::rc::Rc;

/// Receiving side of a delivery.
pub trait Endpoint: Node {
    /// Hardware address, if the endpoint has one. Hubs do not.
    fn address(&self) -> Option<&MacAddress> {
        None
    }

    /// Accept a delivered payload.
    fn receive(&self, payload: &str);
}

/// Pointer identity of two endpoints.
pub fn same_endpoint(a: &dyn Endpoint, b: &dyn Endpoint) -> bool {
    std::ptr::addr_eq(a as *const dyn Endpoint, b as *const dyn Endpoint)
}

/// A participant that originates and receives frames.
///
/// Identity is the address. Every received payload is kept, in arrival order,
/// so callers can observe deliveries.
#[derive(Debug)]
pub struct Device {
    name: String,
    address: MacAddress,
    inbox: RefCell<Vec<String>>,
}

impl Device {
    pub fn new(name: impl Into<String>, address: impl Into<MacAddress>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            inbox: RefCell::new(Vec::new()),
        }
    }

    /// Build a device already wrapped for sharing.
    pub fn shared(name: impl Into<String>, address: impl Into<MacAddress>) -> Rc<Self> {
        Rc::new(Self::new(name, address))
    }

    pub fn mac(&self) -> &MacAddress {
        &self.address
    }

    /// Data-link send: hand a frame addressed to `dest` to a forwarding node.
    pub fn send(&self, node: &mut dyn ForwardingNode, dest: &MacAddress, payload: &str) -> Forwarded {
        info!("{} sending data to {}", self.name, dest);
        node.forward(Frame::new(self.address.clone(), dest.clone(), payload))
    }

    /// Physical send: put the payload on a hub or point-to-point link.
    pub fn send_over(&self, link: &dyn Link, payload: &str) -> usize {
        info!("{} sending data: {}", self.name, payload);
        link.transmit(self, payload)
    }

    /// Payloads received so far.
    pub fn received(&self) -> Vec<String> {
        self.inbox.borrow().clone()
    }

    pub fn received_count(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl Node for Device {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::EndDevice
    }
}

impl Endpoint for Device {
    fn address(&self) -> Option<&MacAddress> {
        Some(&self.address)
    }

    fn receive(&self, payload: &str) {
        info!("{} received: {}", self.name, payload);
        self.inbox.borrow_mut().push(payload.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_records_payload() {
        let device = Device::new("D1", "A1");
        device.receive("hello");
        device.receive("world");
        assert_eq!(device.received(), vec!["hello", "world"]);
        assert_eq!(device.received_count(), 2);
    }

    #[test]
    fn test_device_identity() {
        let device = Device::new("D1", "A1");
        assert_eq!(device.name(), "D1");
        assert_eq!(device.kind(), NodeKind::EndDevice);
        assert_eq!(Endpoint::address(&device), Some(&MacAddress::from("A1")));
    }

    #[test]
    fn test_same_endpoint() {
        let a = Device::shared("D1", "A1");
        let b = Device::shared("D1", "A1");
        let a_again: Rc<dyn Endpoint> = a.clone();
        assert!(same_endpoint(&*a, &*a_again));
        assert!(!same_endpoint(&*a, &*b));
    }
}
