/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Boneh-Boyen short signatures.
//!
//! For a message hash `h` the signature is `(d + h)^-1 g1`, verified by
//! `e(sig, q + h g2) == e(g1, g2)` with the public key `q = d g2`.

use super::{
    g1_from_bytes, g1_to_bytes, gt_generator, hash_to_scalar, is_identity_g1, pair,
    random_scalar, G1Projective, G2Projective, Gt, Scalar, G1_BYTES,
};
use crate::{hash::MessageMode, CpError, CpResult};
use ff::Field;
use group::Group;
use tracing::{debug, instrument};

/// A Boneh-Boyen secret key
#[derive(Clone)]
pub struct BbsSecretKey(Scalar);
wipe_on_drop!(BbsSecretKey, |k| [&mut k.0]);

impl core::fmt::Debug for BbsSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BbsSecretKey")
    }
}

/// A Boneh-Boyen public key with the precomputed `e(g1, g2)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BbsPublicKey {
    /// d g2
    pub q: G2Projective,
    /// e(g1, g2)
    pub z: Gt,
}

/// A Boneh-Boyen signature in G1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BbsSignature(pub G1Projective);

impl BbsSignature {
    /// The compressed G1 element
    pub fn to_bytes(&self) -> [u8; G1_BYTES] {
        g1_to_bytes(&self.0)
    }

    /// Decode a compressed G1 element
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        g1_from_bytes(data).map(Self)
    }
}

fn message_scalar(input: &[u8], mode: MessageMode) -> CpResult<Scalar> {
    Ok(hash_to_scalar(&[&mode.digest(input)?]))
}

/// Create a new key pair
#[instrument(skip_all)]
pub fn generate() -> (BbsSecretKey, BbsPublicKey) {
    let d = random_scalar();
    let pk = BbsPublicKey {
        q: G2Projective::generator() * d,
        z: gt_generator(),
    };
    (BbsSecretKey(d), pk)
}

/// Sign a message, or a SHA-256 digest of one
pub fn sign(input: &[u8], mode: MessageMode, sk: &BbsSecretKey) -> CpResult<BbsSignature> {
    let h = message_scalar(input, mode)?;
    let inv = Option::<Scalar>::from((sk.0 + h).invert())
        .ok_or(CpError::InvalidParameters("message hash cancels the secret key"))?;
    Ok(BbsSignature(G1Projective::generator() * inv))
}

/// Check `e(sig, q + h g2) == e(g1, g2)`
pub fn verify(signature: &BbsSignature, input: &[u8], mode: MessageMode, pk: &BbsPublicKey) -> bool {
    if is_identity_g1(&signature.0) {
        debug!("bbs signature is the identity");
        return false;
    }
    let h = match message_scalar(input, mode) {
        Ok(h) => h,
        Err(_) => return false,
    };
    pair(&signature.0, &(pk.q + G2Projective::generator() * h)) == pk.z
}
