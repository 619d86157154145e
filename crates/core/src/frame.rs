//! Data-link frames.

use crate::address::MacAddress;

/// One unit of data carrying source/destination addresses and a payload.
///
/// Built per send and consumed by forwarding; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub source: MacAddress,
    pub dest: MacAddress,
    pub payload: String,
}

impl Frame {
    pub fn new(source: MacAddress, dest: MacAddress, payload: impl Into<String>) -> Self {
        Self {
            source,
            dest,
            payload: payload.into(),
        }
    }
}
