/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Boneh-Lynn-Shacham short signatures.
//!
//! Signatures are `d H1(m)` in G1 and public keys `d g2` in G2.

use super::{
    g1_from_bytes, g1_to_bytes, hash_message_to_g1, is_identity_g1, is_identity_g2,
    pair, random_scalar, G1Projective, G2Projective, Scalar, G1_BYTES,
};
use crate::{hash::MessageMode, CpResult};
use group::Group;
use tracing::{debug, instrument};

/// A BLS secret key
#[derive(Clone)]
pub struct BlsSecretKey(Scalar);
wipe_on_drop!(BlsSecretKey, |k| [&mut k.0]);

impl core::fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BlsSecretKey")
    }
}

/// A BLS public key, `d g2`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsPublicKey(pub G2Projective);

/// A BLS signature, `d H1(m)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsSignature(pub G1Projective);

impl BlsSignature {
    /// The compressed G1 element
    pub fn to_bytes(&self) -> [u8; G1_BYTES] {
        g1_to_bytes(&self.0)
    }

    /// Decode a compressed G1 element
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        g1_from_bytes(data).map(Self)
    }
}

/// Create a new key pair
#[instrument(skip_all)]
pub fn generate() -> (BlsSecretKey, BlsPublicKey) {
    let d = random_scalar();
    (BlsSecretKey(d), BlsPublicKey(G2Projective::generator() * d))
}

/// Sign a message, or a SHA-256 digest of one
pub fn sign(input: &[u8], mode: MessageMode, sk: &BlsSecretKey) -> CpResult<BlsSignature> {
    Ok(BlsSignature(hash_message_to_g1(input, mode)? * sk.0))
}

/// Check `e(sig, g2) == e(H1(m), pk)`
pub fn verify(signature: &BlsSignature, input: &[u8], mode: MessageMode, pk: &BlsPublicKey) -> bool {
    if is_identity_g1(&signature.0) || is_identity_g2(&pk.0) {
        debug!("bls signature or key is the identity");
        return false;
    }
    let h = match hash_message_to_g1(input, mode) {
        Ok(h) => h,
        Err(_) => return false,
    };
    pair(&signature.0, &G2Projective::generator()) == pair(&h, &pk.0)
}

