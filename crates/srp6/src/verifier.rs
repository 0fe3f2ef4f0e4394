// Verifier derivation - long-term credential material
//
// Runs once per enrollment (or password change) on the client. The
// resulting record is handed to the server out-of-band; the password is
// not recoverable from it.

use digest::Digest;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::big_number::BigNumber;
use crate::crypto_hash::{HashInput, digest_all};
use crate::groups::GroupParameters;

/// What the server stores per identity instead of the password.
/// Salt and verifier serialize as uppercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierRecord {
    pub username: String,
    #[serde(with = "hex_bytes")]
    pub salt: Vec<u8>,
    pub verifier: BigNumber,
}

/// Private exponent x = H(salt | H(username ":" password))
///
/// Deterministic; the salt is the sole source of per-user variation, so
/// identical passwords still yield independent verifiers.
pub fn compute_x<D: Digest>(salt: &[u8], username: &str, password: &str) -> BigNumber {
    let identity_hash = digest_all::<D>(&[
        HashInput::Text(username),
        HashInput::Text(":"),
        HashInput::Text(password),
    ]);
    let x = digest_all::<D>(&[
        HashInput::Bytes(salt),
        HashInput::Bytes(&identity_hash),
    ]);
    BigNumber::from_bytes(&x)
}

/// Verifier v = g^x mod N for an already-chosen salt
pub fn derive_verifier<D: Digest>(
    group: &GroupParameters,
    username: &str,
    password: &str,
    salt: &[u8],
) -> BigNumber {
    let x = compute_x::<D>(salt, username, password);
    group.g().mod_exp(&x, group.n())
}

/// Derive a fresh enrollment record: random salt of `salt_length` bytes,
/// verifier v = g^x mod N
pub fn compute_verifier<D, R>(
    group: &GroupParameters,
    username: &str,
    password: &str,
    salt_length: usize,
    rng: &mut R,
) -> VerifierRecord
where
    D: Digest,
    R: RngCore + CryptoRng,
{
    let mut salt = vec![0u8; salt_length];
    rng.fill_bytes(&mut salt);

    let verifier = derive_verifier::<D>(group, username, password, &salt);
    tracing::debug!(username, salt_length, "derived password verifier");

    VerifierRecord {
        username: username.to_string(),
        salt,
        verifier,
    }
}

mod hex_bytes {
    use data_encoding::HEXUPPER;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&HEXUPPER.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let hex = String::deserialize(deserializer)?;
        HEXUPPER
            .decode(hex.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
