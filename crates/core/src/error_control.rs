//! Even-parity error check on bit-string payloads.
//!
//! Payloads are strings of `'0'`/`'1'` characters. A payload passes when it
//! carries an even number of `'1'`s. Characters other than `'1'` do not count
//! toward parity.

use crate::error::{Error, Result};

fn ones(payload: &str) -> usize {
    payload.chars().filter(|&c| c == '1').count()
}

/// True iff `payload` contains an even number of `'1'` characters.
pub fn check_parity(payload: &str) -> bool {
    ones(payload) % 2 == 0
}

/// Gate a payload before sending.
///
/// # Errors
/// `Error::Corruption` when the parity is odd. Callers log it and drop the
/// payload; it is never a reason to abort a run.
pub fn ensure_parity(payload: &str) -> Result<()> {
    let ones = ones(payload);
    if ones % 2 == 0 {
        Ok(())
    } else {
        Err(Error::Corruption {
            payload: payload.to_string(),
            ones,
        })
    }
}

/// The bit that, appended to `payload`, makes its parity even.
pub fn parity_bit(payload: &str) -> char {
    if check_parity(payload) {
        '0'
    } else {
        '1'
    }
}

/// `payload` followed by its parity bit.
pub fn with_parity(payload: &str) -> String {
    let mut framed = String::with_capacity(payload.len() + 1);
    framed.push_str(payload);
    framed.push(parity_bit(payload));
    framed
}
