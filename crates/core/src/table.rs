//! Address table: hardware address → endpoint, or "seen but not located".
//!
//! # Entries
//!
//! - **Bound**: registered at connect time, resolves to an endpoint.
//! - **Unbound**: created by learning a source address. The address is known
//!   to exist but no endpoint is attached, so forwarding treats it exactly
//!   like an absent address.
//!
//! At most one endpoint is bound per address; binding again replaces it.
//! Iteration follows first-insertion order, which keeps flood order stable
//! from run to run.

use crate::address::MacAddress;
use crate::device::Endpoint;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

struct Entry {
    address: MacAddress,
    endpoint: Option<Rc<dyn Endpoint>>,
}

/// Mapping owned by a single forwarding node.
#[derive(Default)]
pub struct AddressTable {
    slots: HashMap<MacAddress, usize>,
    entries: Vec<Entry>,
}

impl AddressTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `address` to `endpoint`, returning the endpoint it replaced.
    pub fn bind(&mut self, address: MacAddress, endpoint: Rc<dyn Endpoint>) -> Option<Rc<dyn Endpoint>> {
        if let Some(&slot) = self.slots.get(&address) {
            return self.entries[slot].endpoint.replace(endpoint);
        }
        self.push(address, Some(endpoint));
        None
    }

    /// Record that `address` exists without locating it.
    ///
    /// Returns true if the address was new. An existing entry, bound or not,
    /// is left untouched.
    pub fn learn(&mut self, address: &MacAddress) -> bool {
        if self.slots.contains_key(address) {
            return false;
        }
        self.push(address.clone(), None);
        true
    }

    fn push(&mut self, address: MacAddress, endpoint: Option<Rc<dyn Endpoint>>) {
        self.slots.insert(address.clone(), self.entries.len());
        self.entries.push(Entry { address, endpoint });
    }

    /// Is there any entry (bound or unbound) for `address`?
    pub fn contains(&self, address: &MacAddress) -> bool {
        self.slots.contains_key(address)
    }

    /// Resolve `address` to its bound endpoint. Unbound entries resolve to `None`.
    pub fn lookup(&self, address: &MacAddress) -> Option<&Rc<dyn Endpoint>> {
        self.slots
            .get(address)
            .and_then(|&slot| self.entries[slot].endpoint.as_ref())
    }

    /// Is `address` known only as a learned placeholder?
    pub fn is_unbound(&self, address: &MacAddress) -> bool {
        self.slots
            .get(address)
            .is_some_and(|&slot| self.entries[slot].endpoint.is_none())
    }

    /// Bound endpoints that should receive a flood from `source`.
    ///
    /// Skips unbound entries, the entry keyed by `source`, and any endpoint
    /// whose own address is `source`.
    pub fn flood_candidates<'a>(&'a self, source: &'a MacAddress) -> impl Iterator<Item = &'a Rc<dyn Endpoint>> + 'a {
        self.entries.iter().filter_map(move |entry| {
            let endpoint = entry.endpoint.as_ref()?;
            if entry.address == *source || endpoint.address() == Some(source) {
                None
            } else {
                Some(endpoint)
            }
        })
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&MacAddress, Option<&Rc<dyn Endpoint>>)> {
        self.entries
            .iter()
            .map(|entry| (&entry.address, entry.endpoint.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for AddressTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(addr, endpoint)| (addr.as_str(), endpoint.map(|e| e.name().to_string()))),
            )
            .finish()
    }
}
