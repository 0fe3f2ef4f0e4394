// Hash engine - digest computations over protocol values
//
// Every hash in the exchange is a digest of concatenated operands, where
// an operand is a big integer (minimal big-endian encoding), a raw byte
// string, or UTF-8 text. The digest primitive is pluggable through the
// `digest` crate's Digest trait; the reference deployment uses SHA-1.

use digest::Digest;

use crate::big_number::BigNumber;
use crate::error::SrpError;
use crate::groups::GroupParameters;

/// A single hash operand. The three encodings the protocol hashes are
/// spelled out as variants so conversion is decided by type, not by
/// inspecting the value at run time.
#[derive(Debug, Clone, Copy)]
pub enum HashInput<'a> {
    /// Big integer, hashed as its minimal big-endian encoding
    Number(&'a BigNumber),
    /// Raw bytes, hashed as-is
    Bytes(&'a [u8]),
    /// Text, hashed as UTF-8
    Text(&'a str),
}

impl HashInput<'_> {
    fn feed<D: Digest>(&self, hasher: &mut D) {
        match self {
            HashInput::Number(n) => hasher.update(n.to_bytes()),
            HashInput::Bytes(b) => hasher.update(b),
            HashInput::Text(s) => hasher.update(s.as_bytes()),
        }
    }
}

/// Digest of the ordered concatenation of `parts`
pub fn digest_all<D: Digest>(parts: &[HashInput<'_>]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        part.feed(&mut hasher);
    }
    hasher.finalize().to_vec()
}

/// Scrambling parameter u = H(PAD(A) | PAD(B))
///
/// Both public values are padded to the field width before hashing;
/// skipping the padding changes the digest and leaks the values' widths.
pub fn compute_u<D: Digest>(
    client_public: &BigNumber,
    server_public: &BigNumber,
    field_length: usize,
) -> Result<BigNumber, SrpError> {
    let padded_a = client_public.padded_bytes(field_length)?;
    let padded_b = server_public.padded_bytes(field_length)?;
    let digest = digest_all::<D>(&[
        HashInput::Bytes(&padded_a),
        HashInput::Bytes(&padded_b),
    ]);
    Ok(BigNumber::from_bytes(&digest))
}

/// Multiplier parameter k = H(N | PAD(g))
pub fn compute_k<D: Digest>(group: &GroupParameters) -> Result<BigNumber, SrpError> {
    let padded_g = group.g().padded_bytes(group.field_length())?;
    let digest = digest_all::<D>(&[
        HashInput::Number(group.n()),
        HashInput::Bytes(&padded_g),
    ]);
    Ok(BigNumber::from_bytes(&digest))
}

/// Evidence message M = H( (H(g) XOR H(N)) | H(username) | salt | A | B | K )
///
/// The XOR term commits to the group, H(username) to the identity; any
/// mismatch in g, N, username, A, B or the session key changes the result.
pub fn evidence_message<D: Digest>(
    group: &GroupParameters,
    username: &str,
    salt: &[u8],
    client_public: &BigNumber,
    server_public: &BigNumber,
    session_key: &[u8],
) -> Vec<u8> {
    let hashed_g = digest_all::<D>(&[HashInput::Number(group.g())]);
    let hashed_n = digest_all::<D>(&[HashInput::Number(group.n())]);
    let group_commitment: Vec<u8> = hashed_g
        .iter()
        .zip(&hashed_n)
        .map(|(g, n)| g ^ n)
        .collect();
    let hashed_username = digest_all::<D>(&[HashInput::Text(username)]);

    digest_all::<D>(&[
        HashInput::Bytes(&group_commitment),
        HashInput::Bytes(&hashed_username),
        HashInput::Bytes(salt),
        HashInput::Number(client_public),
        HashInput::Number(server_public),
        HashInput::Bytes(session_key),
    ])
}

/// Session proof H(A | M | K), the value each side returns once its peer's
/// evidence checked out
pub fn session_proof<D: Digest>(
    client_public: &BigNumber,
    evidence: &[u8],
    session_key: &[u8],
) -> Vec<u8> {
    digest_all::<D>(&[
        HashInput::Number(client_public),
        HashInput::Bytes(evidence),
        HashInput::Bytes(session_key),
    ])
}
