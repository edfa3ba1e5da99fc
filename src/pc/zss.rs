/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Zhang-Safavi-Naini-Susilo short signatures.
//!
//! The mirror of Boneh-Boyen: the public key `q = d g1` lives in G1 and the
//! signature `(h + d)^-1 g2` in G2.

use super::{
    g2_from_bytes, g2_to_bytes, gt_generator, hash_to_scalar, is_identity_g2, pair,
    random_scalar, G1Projective, G2Projective, Gt, Scalar, G2_BYTES,
};
use crate::{hash::MessageMode, CpError, CpResult};
use ff::Field;
use group::Group;
use tracing::{debug, instrument};

/// A ZSS secret key
#[derive(Clone)]
pub struct ZssSecretKey(Scalar);
wipe_on_drop!(ZssSecretKey, |k| [&mut k.0]);

impl core::fmt::Debug for ZssSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ZssSecretKey")
    }
}

/// A ZSS public key with the precomputed `e(g1, g2)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZssPublicKey {
    /// d g1
    pub q: G1Projective,
    /// e(g1, g2)
    pub z: Gt,
}

/// A ZSS signature in G2
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZssSignature(pub G2Projective);

impl ZssSignature {
    /// The compressed G2 element
    pub fn to_bytes(&self) -> [u8; G2_BYTES] {
        g2_to_bytes(&self.0)
    }

    /// Decode a compressed G2 element
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        g2_from_bytes(data).map(Self)
    }
}

fn message_scalar(input: &[u8], mode: MessageMode) -> CpResult<Scalar> {
    Ok(hash_to_scalar(&[&mode.digest(input)?]))
}

/// Create a new key pair
#[instrument(skip_all)]
pub fn generate() -> (ZssSecretKey, ZssPublicKey) {
    let d = random_scalar();
    let pk = ZssPublicKey {
        q: G1Projective::generator() * d,
        z: gt_generator(),
    };
    (ZssSecretKey(d), pk)
}

/// Sign a message, or a SHA-256 digest of one
pub fn sign(input: &[u8], mode: MessageMode, sk: &ZssSecretKey) -> CpResult<ZssSignature> {
    let h = message_scalar(input, mode)?;
    let inv = Option::<Scalar>::from((h + sk.0).invert())
        .ok_or(CpError::InvalidParameters("message hash cancels the secret key"))?;
    Ok(ZssSignature(G2Projective::generator() * inv))
}

/// Check `e(q + h g1, sig) == e(g1, g2)`
pub fn verify(signature: &ZssSignature, input: &[u8], mode: MessageMode, pk: &ZssPublicKey) -> bool {
    if is_identity_g2(&signature.0) {
        debug!("zss signature is the identity");
        return false;
    }
    let h = match message_scalar(input, mode) {
        Ok(h) => h,
        Err(_) => return false,
    };
    pair(&(pk.q + G1Projective::generator() * h), &signature.0) == pk.z
}
