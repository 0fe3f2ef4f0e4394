// Client session - password side of the key exchange
//
// Each protocol phase is a separate type and every transition consumes
// the previous state, so the required call order is enforced at compile
// time and a finished or abandoned session cannot be replayed. The
// private exponent and premaster secret live only inside the states that
// need them.

use std::marker::PhantomData;

use digest::Digest;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::big_number::BigNumber;
use crate::crypto_hash::{self, HashInput, digest_all};
use crate::error::SrpError;
use crate::groups::GroupParameters;
use crate::verifier::compute_x;

/// Entry state: identity and group agreed, nothing computed yet
pub struct ClientSession<'a, D: Digest> {
    group: &'a GroupParameters,
    username: &'a str,
    password: &'a str,
    _digest: PhantomData<fn() -> D>,
}

impl<'a, D: Digest> ClientSession<'a, D> {
    pub fn new(group: &'a GroupParameters, username: &'a str, password: &'a str) -> Self {
        ClientSession {
            group,
            username,
            password,
            _digest: PhantomData,
        }
    }

    /// Draw the private ephemeral a as `secret_length` random bytes and
    /// compute A = g^a mod N
    pub fn generate_key_pair<R: RngCore + CryptoRng>(
        self,
        rng: &mut R,
        secret_length: usize,
    ) -> ClientKeyPair<'a, D> {
        self.with_ephemeral_secret(BigNumber::random(rng, secret_length))
    }

    /// Same as `generate_key_pair` with a caller-managed private
    /// exponent. The secret must be fresh; reusing one across sessions
    /// forfeits forward secrecy.
    pub fn with_ephemeral_secret(self, secret: BigNumber) -> ClientKeyPair<'a, D> {
        let public = self.group.g().mod_exp(&secret, self.group.n());
        tracing::trace!(username = self.username, "client public ephemeral computed");
        ClientKeyPair {
            group: self.group,
            username: self.username,
            password: self.password,
            secret,
            public,
            _digest: PhantomData,
        }
    }
}

/// Keys generated: holds (a, A); A is sent to the server
pub struct ClientKeyPair<'a, D: Digest> {
    group: &'a GroupParameters,
    username: &'a str,
    password: &'a str,
    secret: BigNumber,
    public: BigNumber,
    _digest: PhantomData<fn() -> D>,
}

impl<'a, D: Digest> ClientKeyPair<'a, D> {
    /// Public ephemeral A, the value sent to the server
    pub fn public_value(&self) -> &BigNumber {
        &self.public
    }

    /// Premaster secret S = (B - k*g^x) ^ (a + u*x) mod N
    /// with u = H(PAD(A) | PAD(B)), k = H(N | PAD(g)) and
    /// x = H(salt | H(username ":" password)).
    ///
    /// Aborts with InvalidPublicValue when B is congruent to zero mod N,
    /// which would hand an attacker a predictable premaster secret.
    pub fn compute_premaster_secret(
        self,
        salt: &[u8],
        server_public: &BigNumber,
    ) -> Result<ClientPremaster<'a, D>, SrpError> {
        let group = self.group;
        let n = group.n();

        let reduced_b = server_public % n;
        if reduced_b.is_zero() {
            tracing::debug!("rejecting server public ephemeral congruent to zero");
            return Err(SrpError::InvalidPublicValue);
        }

        let u = crypto_hash::compute_u::<D>(&self.public, server_public, group.field_length())?;
        let x = compute_x::<D>(salt, self.username, self.password);
        let k = crypto_hash::compute_k::<D>(group)?;

        // t1 = (B - k*g^x) mod N, computed in the group so the
        // subtraction never leaves the field
        let k_g_x = &(&k * &group.g().mod_exp(&x, n)) % n;
        let t1 = &(&reduced_b + &(n - &k_g_x)) % n;
        // t2 = a + u*x, over the plain integers
        let t2 = &self.secret + &(&u * &x);
        let premaster = t1.mod_exp(&t2, n);

        Ok(ClientPremaster {
            group,
            username: self.username,
            public: self.public,
            premaster,
            _digest: PhantomData,
        })
    }
}

/// Premaster secret computed; the password is no longer held
pub struct ClientPremaster<'a, D: Digest> {
    group: &'a GroupParameters,
    username: &'a str,
    public: BigNumber,
    premaster: BigNumber,
    _digest: PhantomData<fn() -> D>,
}

impl<'a, D: Digest> ClientPremaster<'a, D> {
    /// Raw shared value S; input to session-key derivation, not a key
    /// by itself
    pub fn premaster_secret(&self) -> &BigNumber {
        &self.premaster
    }

    /// Session key K = H(S), own evidence
    /// M = H( (H(g) XOR H(N)) | H(username) | salt | A | B | K ) and the
    /// server proof H(A | M | K) expected back at the final step
    pub fn compute_session_key(
        self,
        salt: &[u8],
        server_public: &BigNumber,
    ) -> ClientEvidence {
        let session_key = digest_all::<D>(&[HashInput::Number(&self.premaster)]);
        let evidence = crypto_hash::evidence_message::<D>(
            self.group,
            self.username,
            salt,
            &self.public,
            server_public,
            &session_key,
        );
        let expected_proof =
            crypto_hash::session_proof::<D>(&self.public, &evidence, &session_key);
        tracing::debug!(username = self.username, "client session key derived");

        ClientEvidence {
            session_key,
            evidence,
            expected_proof,
        }
    }
}

/// Key derived: evidence message ready to send, server proof precomputed
pub struct ClientEvidence {
    session_key: Vec<u8>,
    evidence: Vec<u8>,
    expected_proof: Vec<u8>,
}

impl ClientEvidence {
    /// Evidence message M, the value sent to the server
    pub fn evidence_message(&self) -> &[u8] {
        &self.evidence
    }

    pub fn session_key(&self) -> &[u8] {
        &self.session_key
    }

    /// Check the server's proof against the precomputed H(A | M | K) in
    /// constant time. The outcome is carried as a flag on the terminal
    /// state, never as an error.
    pub fn verify_session(self, server_proof: &[u8]) -> ClientVerified {
        let authenticated: bool = self
            .expected_proof
            .as_slice()
            .ct_eq(server_proof)
            .into();
        tracing::debug!(authenticated, "client verified server evidence");

        ClientVerified {
            authenticated,
            session_key: self.session_key,
            proof: self.expected_proof,
        }
    }
}

/// Terminal state
pub struct ClientVerified {
    authenticated: bool,
    session_key: Vec<u8>,
    proof: Vec<u8>,
}

impl ClientVerified {
    /// True when the server presented a matching proof
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Shared session key; only meaningful when `authenticated()`
    pub fn session_key(&self) -> &[u8] {
        &self.session_key
    }

    /// The client's own expected proof, returned to the caller
    /// regardless of outcome
    pub fn proof(&self) -> &[u8] {
        &self.proof
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::RFC5054_GROUP_1024;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sha1::Sha1;

    #[test]
    fn test_zero_server_public_rejected() {
        let group = &*RFC5054_GROUP_1024;
        let mut rng = StdRng::seed_from_u64(3);
        let salt = [0x11u8; 32];

        for degenerate in [
            BigNumber::new(),
            group.n().clone(),
            &group.n().clone() + group.n(),
        ] {
            let session = ClientSession::<Sha1>::new(group, "alice", "password123")
                .generate_key_pair(&mut rng, 32);
            let result = session.compute_premaster_secret(&salt, &degenerate);
            assert_eq!(result.err(), Some(SrpError::InvalidPublicValue));
        }
    }

    #[test]
    fn test_oversized_server_public_rejected() {
        let group = &*RFC5054_GROUP_1024;
        let mut rng = StdRng::seed_from_u64(4);
        let salt = [0x11u8; 32];

        // wider than the 128-byte field and not congruent to zero
        let oversized = BigNumber::from_bytes(&[0x01; 129]);
        let session = ClientSession::<Sha1>::new(group, "alice", "password123")
            .generate_key_pair(&mut rng, 32);
        let result = session.compute_premaster_secret(&salt, &oversized);
        assert!(matches!(result.err(), Some(SrpError::ValueTooLarge { .. })));
    }
}
