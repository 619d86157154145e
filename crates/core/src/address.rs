//! Hardware addresses.
//!
//! An address is an opaque token such as `AA:BB:CC:DD:EE:01`. The model never
//! looks inside it: two addresses are equal iff their tokens are equal.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Opaque hardware (MAC) address of an endpoint.
///
/// Immutable once created. Comparison, hashing and ordering all work on the
/// raw token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create an address from a token.
    ///
    /// # Errors
    /// `Error::InvalidAddress` if the token is empty or contains whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(Error::InvalidAddress(token));
        }
        Ok(Self(token))
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// Literal addresses in topology setup code; trusted input.
impl From<&str> for MacAddress {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for MacAddress {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let addr: MacAddress = "AA:BB:CC:DD:EE:01".parse().unwrap();
        assert_eq!(addr.as_str(), "AA:BB:CC:DD:EE:01");
        assert_eq!(addr.to_string(), "AA:BB:CC:DD:EE:01");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!("".parse::<MacAddress>().is_err());
        assert!("AA BB".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_equality_is_token_equality() {
        assert_eq!(MacAddress::from("A1"), MacAddress::new("A1").unwrap());
        assert_ne!(MacAddress::from("A1"), MacAddress::from("a1"));
    }
}
