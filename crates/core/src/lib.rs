//! linksim-core: teaching model of a small layered network
//!
//! Devices exchange frames through hubs, bridges, and a learning switch.
//! Collision handling (CSMA/CD) and reliable delivery (sliding window) are
//! simplified models driven by seeded randomness.
//!
//! # Architecture
//!
//! Leaves first:
//! - `address`: opaque hardware addresses
//! - `table`: address table with learned (unbound) placeholders
//! - `forwarding`: learning `Switch` and segment `Bridge`
//! - `error_control`: even-parity check
//! - `access_control`: CSMA/CD retry loop
//! - `flow_control`: sliding-window transfer
//! - `device`, `physical`: endpoints, hubs, point-to-point connections
//! - `medium`: injected collision/acknowledgment events
//! - `topology`: node/link graph for display and domain counts
//! - `metrics`: run-level counters
//!
//! # Design Principles
//!
//! - **Self-healing**: unknown destinations flood, collisions retry, missing
//!   acks resend; none of them surface as errors
//! - **Iterative retries**: no retry path recurses
//! - **Deterministic**: all randomness comes through `LinkConditions`
//! - **Single-threaded**: endpoints are shared with `Rc`; each forwarding
//!   node owns its table and mutates it through `&mut self`

pub mod access_control;
pub mod address;
pub mod device;
pub mod error;
pub mod error_control;
pub mod flow_control;
pub mod forwarding;
pub mod frame;
pub mod medium;
pub mod metrics;
pub mod physical;
pub mod table;
pub mod topology;

// Re-export commonly used types
pub use address::MacAddress;
pub use device::{Device, Endpoint};
pub use error::{Error, Result};
pub use forwarding::{Bridge, Forwarded, ForwardingNode, Switch};
pub use frame::Frame;
pub use medium::{LinkConditions, RandomConditions};
pub use topology::{Node, NodeKind, Topology};
