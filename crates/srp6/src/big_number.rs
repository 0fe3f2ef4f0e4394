// BigNumber - large unsigned integer codec
// Wraps num-bigint's BigUint with the deterministic byte conversions the
// protocol hashes depend on.
//
// All byte conversions are big-endian. Zero encodes to the empty
// sequence and the empty sequence decodes to zero.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SrpError;

/// BigNumber wraps num-bigint's BigUint for the protocol's modular
/// arithmetic and byte-exact hash inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigNumber {
    bn: BigUint,
}

impl Default for BigNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl BigNumber {
    /// Create a new BigNumber initialized to zero
    pub fn new() -> Self {
        BigNumber { bn: BigUint::zero() }
    }

    /// Create from a u32 value
    pub fn from_u32(val: u32) -> Self {
        BigNumber { bn: BigUint::from(val) }
    }

    /// Decode from big-endian bytes; the empty slice decodes to zero
    pub fn from_bytes(bytes: &[u8]) -> Self {
        BigNumber {
            bn: BigUint::from_bytes_be(bytes),
        }
    }

    /// Parse from a hex string (case-insensitive), None on invalid input
    pub fn from_hex_str(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if hex.is_empty() {
            return None;
        }
        BigUint::parse_bytes(hex.as_bytes(), 16).map(|bn| BigNumber { bn })
    }

    /// Draw exactly `byte_length` random bytes and decode them big-endian
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, byte_length: usize) -> Self {
        let mut bytes = vec![0u8; byte_length];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(&bytes)
    }

    /// Check if the number is zero
    pub fn is_zero(&self) -> bool {
        self.bn.is_zero()
    }

    /// Modular exponentiation: self^exp mod modulus
    pub fn mod_exp(&self, exp: &BigNumber, modulus: &BigNumber) -> BigNumber {
        BigNumber {
            bn: self.bn.modpow(&exp.bn, &modulus.bn),
        }
    }

    /// Number of bytes in the minimal encoding
    pub fn num_bytes(&self) -> usize {
        self.bn.bits().div_ceil(8) as usize
    }

    /// Minimal big-endian encoding; zero yields the empty sequence
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.bn.is_zero() {
            return Vec::new();
        }
        self.bn.to_bytes_be()
    }

    /// Left-zero-pad the minimal encoding to exactly `byte_length` bytes.
    /// Values that do not fit the field are rejected, never truncated.
    pub fn padded_bytes(&self, byte_length: usize) -> Result<Vec<u8>, SrpError> {
        let minimal = self.to_bytes();
        if minimal.len() > byte_length {
            return Err(SrpError::ValueTooLarge {
                actual: minimal.len(),
                field: byte_length,
            });
        }

        let mut result = vec![0u8; byte_length];
        result[byte_length - minimal.len()..].copy_from_slice(&minimal);
        Ok(result)
    }

    /// Convert to hex string (uppercase)
    pub fn as_hex_str(&self) -> String {
        if self.bn.is_zero() {
            return "0".to_string();
        }
        format!("{:X}", self.bn)
    }

    /// Get a reference to the inner BigUint
    pub fn inner(&self) -> &BigUint {
        &self.bn
    }
}

// Arithmetic operator implementations

impl std::ops::Add for &BigNumber {
    type Output = BigNumber;
    fn add(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn + &rhs.bn,
        }
    }
}

impl std::ops::Sub for &BigNumber {
    type Output = BigNumber;
    fn sub(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn - &rhs.bn,
        }
    }
}

impl std::ops::Mul for &BigNumber {
    type Output = BigNumber;
    fn mul(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn * &rhs.bn,
        }
    }
}

impl std::ops::Rem for &BigNumber {
    type Output = BigNumber;
    fn rem(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn % &rhs.bn,
        }
    }
}

// Persisted protocol values (verifier, group moduli) travel as uppercase
// hex strings.

impl Serialize for BigNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex_str())
    }
}

impl<'de> Deserialize<'de> for BigNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        BigNumber::from_hex_str(&hex)
            .ok_or_else(|| serde::de::Error::custom("invalid hex integer"))
    }
}
