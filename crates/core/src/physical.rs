//! Physical layer: hubs and point-to-point connections.
//!
//! Neither looks at addresses. A hub repeats whatever it hears to every other
//! attached endpoint; a connection hands it to the party at the other end.

use crate::device::{same_endpoint, Endpoint};
use crate::topology::{Node, NodeKind};
use log::info;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared or point-to-point medium.
pub trait Link {
    /// Deliver `payload` from `sender` to the other attached endpoints.
    ///
    /// Returns the number of deliveries.
    fn transmit(&self, sender: &dyn Endpoint, payload: &str) -> usize;
}

/// Multi-port repeater.
///
/// Plugged into a switch port, a hub is itself an endpoint: whatever the
/// switch delivers to it is repeated to all of its members.
pub struct Hub {
    name: String,
    members: RefCell<Vec<Rc<dyn Endpoint>>>,
}

impl Hub {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: RefCell::new(Vec::new()),
        }
    }

    pub fn shared(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self::new(name))
    }

    /// Attach an endpoint to a hub port.
    pub fn connect(&self, endpoint: Rc<dyn Endpoint>) {
        info!("{} connected to {}", endpoint.name(), self.name);
        self.members.borrow_mut().push(endpoint);
    }

    /// Names of attached endpoints, in connection order.
    pub fn member_names(&self) -> Vec<String> {
        self.members
            .borrow()
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    fn repeat(&self, sender: Option<&dyn Endpoint>, payload: &str) -> usize {
        info!("{} broadcasting data...", self.name);
        // Snapshot so a member may connect more endpoints while receiving.
        let members: Vec<Rc<dyn Endpoint>> = self.members.borrow().clone();
        let mut delivered = 0;
        for member in &members {
            if sender.is_some_and(|s| same_endpoint(s, member.as_ref())) {
                continue;
            }
            member.receive(payload);
            delivered += 1;
        }
        delivered
    }
}

impl Link for Hub {
    fn transmit(&self, sender: &dyn Endpoint, payload: &str) -> usize {
        self.repeat(Some(sender), payload)
    }
}

impl Node for Hub {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Hub
    }
}

impl Endpoint for Hub {
    fn receive(&self, payload: &str) {
        self.repeat(None, payload);
    }
}

/// Cable between exactly two endpoints.
pub struct Connection {
    a: Rc<dyn Endpoint>,
    b: Rc<dyn Endpoint>,
}

impl Connection {
    pub fn new(a: Rc<dyn Endpoint>, b: Rc<dyn Endpoint>) -> Self {
        Self { a, b }
    }
}

impl Link for Connection {
    /// Anything not sent by `b` goes to `b`; what `b` sends goes to `a`.
    fn transmit(&self, sender: &dyn Endpoint, payload: &str) -> usize {
        let receiver = if same_endpoint(sender, self.b.as_ref()) {
            &self.a
        } else {
            &self.b
        };
        receiver.receive(payload);
        1
    }
}
