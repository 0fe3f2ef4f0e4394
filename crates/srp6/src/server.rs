// Server session - verifier side of the key exchange
//
// Mirror of the client state machine: one type per phase, transitions
// consume the previous state. The server never sees the password; it
// works from the enrollment verifier and releases its proof only after
// the client has presented matching evidence.

use std::marker::PhantomData;

use digest::Digest;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::big_number::BigNumber;
use crate::crypto_hash::{self, HashInput, digest_all};
use crate::error::SrpError;
use crate::groups::GroupParameters;

/// Entry state
pub struct ServerSession<'a, D: Digest> {
    group: &'a GroupParameters,
    _digest: PhantomData<fn() -> D>,
}

impl<'a, D: Digest> ServerSession<'a, D> {
    pub fn new(group: &'a GroupParameters) -> Self {
        ServerSession {
            group,
            _digest: PhantomData,
        }
    }

    /// Draw the private ephemeral b and compute
    /// B = (k*v + g^b mod N) mod N with k = H(N | PAD(g)).
    ///
    /// B congruent to zero mod N would be rejected by any honest client,
    /// so b is redrawn in that case; with a safe-prime group this does
    /// not happen in practice.
    pub fn generate_key_pair<R: RngCore + CryptoRng>(
        self,
        rng: &mut R,
        verifier: &BigNumber,
        secret_length: usize,
    ) -> Result<ServerKeyPair<'a, D>, SrpError> {
        let group = self.group;
        let k = crypto_hash::compute_k::<D>(group)?;
        loop {
            let secret = BigNumber::random(rng, secret_length);
            let public = ephemeral_public(group, &k, verifier, &secret);
            if !public.is_zero() {
                tracing::trace!("server public ephemeral computed");
                return Ok(ServerKeyPair {
                    group,
                    secret,
                    public,
                    _digest: PhantomData,
                });
            }
            tracing::warn!("degenerate server public ephemeral, redrawing secret");
        }
    }

    /// Same as `generate_key_pair` with a caller-managed private
    /// exponent; fails with InvalidPublicValue on the degenerate B
    /// instead of redrawing
    pub fn with_ephemeral_secret(
        self,
        verifier: &BigNumber,
        secret: BigNumber,
    ) -> Result<ServerKeyPair<'a, D>, SrpError> {
        let k = crypto_hash::compute_k::<D>(self.group)?;
        let public = ephemeral_public(self.group, &k, verifier, &secret);
        if public.is_zero() {
            return Err(SrpError::InvalidPublicValue);
        }
        Ok(ServerKeyPair {
            group: self.group,
            secret,
            public,
            _digest: PhantomData,
        })
    }
}

fn ephemeral_public(
    group: &GroupParameters,
    k: &BigNumber,
    verifier: &BigNumber,
    secret: &BigNumber,
) -> BigNumber {
    let g_b = group.g().mod_exp(secret, group.n());
    &(&(k * verifier) + &g_b) % group.n()
}

/// Keys generated: holds (b, B); B is sent to the client
pub struct ServerKeyPair<'a, D: Digest> {
    group: &'a GroupParameters,
    secret: BigNumber,
    public: BigNumber,
    _digest: PhantomData<fn() -> D>,
}

impl<'a, D: Digest> ServerKeyPair<'a, D> {
    /// Public ephemeral B, the value sent to the client
    pub fn public_value(&self) -> &BigNumber {
        &self.public
    }

    /// Premaster secret S = (A * v^u) ^ b mod N with
    /// u = H(PAD(A) | PAD(B)).
    ///
    /// Aborts with InvalidPublicValue when A is congruent to zero mod N:
    /// accepting it would fix the premaster secret at zero regardless of
    /// the password (the all-zero attack).
    pub fn compute_premaster_secret(
        self,
        verifier: &BigNumber,
        client_public: &BigNumber,
    ) -> Result<ServerPremaster<'a, D>, SrpError> {
        let group = self.group;
        let n = group.n();

        if (client_public % n).is_zero() {
            tracing::debug!("rejecting client public ephemeral congruent to zero");
            return Err(SrpError::InvalidPublicValue);
        }

        let u = crypto_hash::compute_u::<D>(client_public, &self.public, group.field_length())?;
        let v_u = verifier.mod_exp(&u, n);
        let premaster = (client_public * &v_u).mod_exp(&self.secret, n);

        Ok(ServerPremaster {
            group,
            public: self.public,
            premaster,
            _digest: PhantomData,
        })
    }
}

/// Premaster secret computed
pub struct ServerPremaster<'a, D: Digest> {
    group: &'a GroupParameters,
    public: BigNumber,
    premaster: BigNumber,
    _digest: PhantomData<fn() -> D>,
}

impl<'a, D: Digest> ServerPremaster<'a, D> {
    /// Raw shared value S; input to session-key derivation, not a key
    /// by itself
    pub fn premaster_secret(&self) -> &BigNumber {
        &self.premaster
    }

    /// Session key K = H(S), the evidence message the client must
    /// present (the formula is symmetric, so the server's own M doubles
    /// as the expected client evidence) and the proof H(A | M | K) to
    /// release once it does
    pub fn compute_session_key(
        self,
        username: &str,
        salt: &[u8],
        client_public: &BigNumber,
    ) -> ServerEvidence {
        let session_key = digest_all::<D>(&[HashInput::Number(&self.premaster)]);
        let evidence = crypto_hash::evidence_message::<D>(
            self.group,
            username,
            salt,
            client_public,
            &self.public,
            &session_key,
        );
        let proof = crypto_hash::session_proof::<D>(client_public, &evidence, &session_key);
        tracing::debug!(username, "server session key derived");

        ServerEvidence {
            session_key,
            evidence,
            proof,
        }
    }
}

/// Key derived: waiting for the client's evidence message
pub struct ServerEvidence {
    session_key: Vec<u8>,
    evidence: Vec<u8>,
    proof: Vec<u8>,
}

impl ServerEvidence {
    /// The evidence message a legitimate client will send
    pub fn evidence_message(&self) -> &[u8] {
        &self.evidence
    }

    pub fn session_key(&self) -> &[u8] {
        &self.session_key
    }

    /// Check the client's evidence in constant time. On a match the
    /// terminal state carries the proof to send back; on a mismatch the
    /// proof is withheld so a guessing attacker learns nothing beyond
    /// the failure itself.
    pub fn verify_session(self, client_evidence: &[u8]) -> ServerVerified {
        let authenticated: bool = self
            .evidence
            .as_slice()
            .ct_eq(client_evidence)
            .into();
        tracing::debug!(authenticated, "server verified client evidence");

        ServerVerified {
            authenticated,
            session_key: self.session_key,
            proof: authenticated.then_some(self.proof),
        }
    }
}

/// Terminal state
pub struct ServerVerified {
    authenticated: bool,
    session_key: Vec<u8>,
    proof: Option<Vec<u8>>,
}

impl ServerVerified {
    /// True when the client's evidence matched
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Shared session key; only meaningful when `authenticated()`
    pub fn session_key(&self) -> &[u8] {
        &self.session_key
    }

    /// Proof H(A | M | K) to return to the client, present only when
    /// authentication succeeded
    pub fn proof(&self) -> Option<&[u8]> {
        self.proof.as_deref()
    }
}
