// SRP6 - Secure Remote Password (SRP-6a) protocol engine
//
// Client and server derive a shared session key and mutually prove
// possession of matching secrets without the password crossing the wire.
// The crate is the protocol core only: transport, verifier storage and
// session lifecycle policy belong to the caller, which also supplies the
// randomness source (rand's RngCore + CryptoRng) and the digest
// primitive (the digest crate's Digest).

pub mod big_number;
pub mod client;
pub mod crypto_hash;
pub mod error;
pub mod groups;
pub mod server;
pub mod verifier;

pub use big_number::BigNumber;
pub use client::ClientSession;
pub use error::SrpError;
pub use groups::{GroupParameters, RFC5054_GROUP_1024, RFC5054_GROUP_2048};
pub use server::ServerSession;
pub use verifier::{VerifierRecord, compute_verifier, compute_x, derive_verifier};

/// Default enrollment salt width in bytes
pub const DEFAULT_SALT_LENGTH: usize = 32;

/// Default ephemeral private exponent width in bytes
pub const DEFAULT_SECRET_LENGTH: usize = 256;
