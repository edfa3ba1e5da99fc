/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Pointcheval-Sanders signatures.
//!
//! A signature is a pair `(a, (x + sum y_i m_i) a)` for a random `a` in G1.
//! `pss` signs a single message and `psb` a block of messages. Signatures
//! can be re-randomized by anyone with [`randomize`].

use super::{
    g1_from_bytes, g1_to_bytes, hash_to_scalar, is_identity_g1, pair, random_g1, random_scalar,
    G1Projective, G2Projective, Scalar, G1_BYTES,
};
use crate::{CpError, CpResult};
use group::Group;
use tracing::{debug, instrument};

/// Secret key of the single message scheme
#[derive(Clone)]
pub struct PssSecretKey {
    x: Scalar,
    y: Scalar,
}
wipe_on_drop!(PssSecretKey, |k| [&mut k.x, &mut k.y]);

impl core::fmt::Debug for PssSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PssSecretKey")
    }
}

/// Public key of the single message scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PssPublicKey {
    /// random generator of G2
    pub g: G2Projective,
    /// x g
    pub x: G2Projective,
    /// y g
    pub y: G2Projective,
}

/// Secret key of the block scheme
#[derive(Clone)]
pub struct PsbSecretKey {
    x: Scalar,
    y: Vec<Scalar>,
}
wipe_on_drop!(PsbSecretKey, |k| core::iter::once(&mut k.x).chain(k.y.iter_mut()));

impl core::fmt::Debug for PsbSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PsbSecretKey")
    }
}

/// Public key of the block scheme
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PsbPublicKey {
    /// random generator of G2
    pub g: G2Projective,
    /// x g
    pub x: G2Projective,
    /// y_i g
    pub y: Vec<G2Projective>,
}

/// A Pointcheval-Sanders signature, shared by both variants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PsSignature {
    /// random base
    pub a: G1Projective,
    /// (x + sum y_i m_i) a
    pub b: G1Projective,
}

impl PsSignature {
    /// `a || b`, both compressed
    pub fn to_bytes(&self) -> [u8; 2 * G1_BYTES] {
        let mut out = [0u8; 2 * G1_BYTES];
        out[..G1_BYTES].copy_from_slice(&g1_to_bytes(&self.a));
        out[G1_BYTES..].copy_from_slice(&g1_to_bytes(&self.b));
        out
    }

    /// Parse `a || b`
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        if data.len() != 2 * G1_BYTES {
            return Err(CpError::InvalidEncoding("ps signature must be 96 bytes"));
        }
        Ok(Self {
            a: g1_from_bytes(&data[..G1_BYTES])?,
            b: g1_from_bytes(&data[G1_BYTES..])?,
        })
    }
}

fn message_scalar(msg: &[u8]) -> Scalar {
    hash_to_scalar(&[msg])
}

fn random_g2() -> G2Projective {
    G2Projective::generator() * random_scalar()
}

/// `e(a, k) == e(b, g)` with both signature elements away from the identity
fn check(sig: &PsSignature, k: &G2Projective, g: &G2Projective) -> bool {
    if is_identity_g1(&sig.a) || is_identity_g1(&sig.b) {
        debug!("ps signature element is the identity");
        return false;
    }
    pair(&sig.a, k) == pair(&sig.b, g)
}

/// Create a single message key pair
#[instrument(skip_all)]
pub fn pss_generate() -> (PssSecretKey, PssPublicKey) {
    let x = random_scalar();
    let y = random_scalar();
    let g = random_g2();
    (
        PssSecretKey { x, y },
        PssPublicKey {
            g,
            x: g * x,
            y: g * y,
        },
    )
}

/// Sign a single message
pub fn pss_sign(msg: &[u8], sk: &PssSecretKey) -> PsSignature {
    let a = random_g1();
    PsSignature {
        a,
        b: a * (sk.x + sk.y * message_scalar(msg)),
    }
}

/// Check `e(a, X + m Y) == e(b, g)`
pub fn pss_verify(sig: &PsSignature, msg: &[u8], pk: &PssPublicKey) -> bool {
    check(sig, &(pk.x + pk.y * message_scalar(msg)), &pk.g)
}

/// Create a key pair for blocks of `len` messages
#[instrument(skip_all, fields(len = len))]
pub fn psb_generate(len: usize) -> CpResult<(PsbSecretKey, PsbPublicKey)> {
    if len == 0 {
        return Err(CpError::InvalidParameters("block must hold at least one message"));
    }
    let x = random_scalar();
    let y: Vec<Scalar> = (0..len).map(|_| random_scalar()).collect();
    let g = random_g2();
    let pk = PsbPublicKey {
        g,
        x: g * x,
        y: y.iter().map(|y| g * y).collect(),
    };
    Ok((PsbSecretKey { x, y }, pk))
}

/// Sign a block of between one and `len` messages, using the leading `y_i`
pub fn psb_sign(msgs: &[&[u8]], sk: &PsbSecretKey) -> CpResult<PsSignature> {
    if msgs.is_empty() || msgs.len() > sk.y.len() {
        return Err(CpError::InvalidParameters("wrong number of messages for key"));
    }
    let exponent = sk
        .y
        .iter()
        .zip(msgs.iter())
        .fold(sk.x, |acc, (y, msg)| acc + *y * message_scalar(msg));
    let a = random_g1();
    Ok(PsSignature { a, b: a * exponent })
}

/// Check `e(a, X + sum m_i Y_i) == e(b, g)`
pub fn psb_verify(sig: &PsSignature, msgs: &[&[u8]], pk: &PsbPublicKey) -> bool {
    if msgs.is_empty() || msgs.len() > pk.y.len() {
        debug!("psb block length mismatch");
        return false;
    }
    let k = pk
        .y
        .iter()
        .zip(msgs.iter())
        .fold(pk.x, |acc, (y, msg)| acc + *y * message_scalar(msg));
    check(sig, &k, &pk.g)
}

/// Re-randomize a signature into `(t a, t b)` for a fresh `t`.
///
/// The result verifies under the same key and messages and is unlinkable to
/// the input signature.
pub fn randomize(sig: &PsSignature) -> PsSignature {
    let t = random_scalar();
    PsSignature {
        a: sig.a * t,
        b: sig.b * t,
    }
}
