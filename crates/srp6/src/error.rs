// Error types for the authentication exchange

use thiserror::Error;

/// Fatal protocol errors. Both variants mean the session must be
/// abandoned; neither is retried internally.
///
/// A failed evidence check is not an error - it surfaces as
/// `authenticated() == false` on the terminal session state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SrpError {
    /// The peer's public ephemeral value is congruent to zero modulo N.
    /// Proceeding would let an active attacker force a known premaster
    /// secret.
    #[error("peer public ephemeral value is divisible by the group modulus")]
    InvalidPublicValue,

    /// A value does not fit the field width derived from the group
    /// modulus. Indicates a malformed peer message or a group mismatch.
    #[error("value of {actual} bytes does not fit a {field}-byte field")]
    ValueTooLarge { actual: usize, field: usize },
}
