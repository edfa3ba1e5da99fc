/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Camenisch-Lysyanskaya signatures.
//!
//! Three variants share one structure: a random base `a` in G1 is raised to
//! secret exponents and the verifier checks the exponent relations through
//! pairings with the public key in G2.
//!
//! * `cls` signs a single message (scheme A).
//! * `cli` signs a message together with a randomizer scalar (scheme B).
//! * `clb` signs a block of messages at once (scheme C).
//!
//! Messages are hashed into the scalar field. Every verification rejects a
//! signature whose base `a` is the identity, which would otherwise satisfy
//! all of the pairing equations.

use super::{
    hash_to_scalar, is_identity_g1, pair, random_g1, random_scalar, G1Projective, G2Projective,
    Gt, Scalar,
};
use crate::{CpError, CpResult};
use group::Group;
use tracing::{debug, instrument};

macro_rules! secret_debug {
    ($name:ident) => {
        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

/// Secret key of the single message scheme
#[derive(Clone)]
pub struct ClsSecretKey {
    x: Scalar,
    y: Scalar,
}
secret_debug!(ClsSecretKey);
wipe_on_drop!(ClsSecretKey, |k| [&mut k.x, &mut k.y]);

/// Public key of the single message scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClsPublicKey {
    /// x g2
    pub x: G2Projective,
    /// y g2
    pub y: G2Projective,
}

/// Signature of the single message scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClsSignature {
    /// random base
    pub a: G1Projective,
    /// y a
    pub b: G1Projective,
    /// (x + x y m) a
    pub c: G1Projective,
}

/// Secret key of the randomized scheme
#[derive(Clone)]
pub struct CliSecretKey {
    x: Scalar,
    y: Scalar,
    z: Scalar,
}
secret_debug!(CliSecretKey);
wipe_on_drop!(CliSecretKey, |k| [&mut k.x, &mut k.y, &mut k.z]);

/// Public key of the randomized scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CliPublicKey {
    /// x g2
    pub x: G2Projective,
    /// y g2
    pub y: G2Projective,
    /// z g2
    pub z: G2Projective,
}

/// Signature of the randomized scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CliSignature {
    /// random base
    pub a: G1Projective,
    /// z a
    pub big_a: G1Projective,
    /// y a
    pub b: G1Projective,
    /// y z a
    pub big_b: G1Projective,
    /// (x + x y m) a + x y r A
    pub c: G1Projective,
}

/// Secret key of the block scheme
#[derive(Clone)]
pub struct ClbSecretKey {
    x: Scalar,
    y: Scalar,
    z: Vec<Scalar>,
}
secret_debug!(ClbSecretKey);
wipe_on_drop!(ClbSecretKey, |k| [&mut k.x, &mut k.y].into_iter().chain(k.z.iter_mut()));

/// Public key of the block scheme
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClbPublicKey {
    /// x g2
    pub x: G2Projective,
    /// y g2
    pub y: G2Projective,
    /// z_i g2 for every message after the first
    pub z: Vec<G2Projective>,
}

impl ClbPublicKey {
    /// The largest number of messages in a block
    pub fn block_len(&self) -> usize {
        self.z.len() + 1
    }
}

/// Signature of the block scheme
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClbSignature {
    /// random base
    pub a: G1Projective,
    /// z_i a
    pub big_a: Vec<G1Projective>,
    /// y a
    pub b: G1Projective,
    /// y z_i a
    pub big_b: Vec<G1Projective>,
    /// (x + x y m_0) a + sum x y m_i A_i
    pub c: G1Projective,
}

fn message_scalar(msg: &[u8]) -> Scalar {
    hash_to_scalar(&[msg])
}

/// `e(a, X) + m e(b, X)`, the left side shared by every variant
fn base_relation(x: &G2Projective, a: &G1Projective, b: &G1Projective, m: &Scalar) -> Gt {
    pair(a, x) + pair(b, x) * m
}

/// `e(p, q) == e(r, g2)`
fn same_exponent(p: &G1Projective, q: &G2Projective, r: &G1Projective) -> bool {
    pair(p, q) == pair(r, &G2Projective::generator())
}

/// Create a single message key pair
#[instrument(skip_all)]
pub fn cls_generate() -> (ClsSecretKey, ClsPublicKey) {
    let x = random_scalar();
    let y = random_scalar();
    let g = G2Projective::generator();
    (ClsSecretKey { x, y }, ClsPublicKey { x: g * x, y: g * y })
}

/// Sign a single message
pub fn cls_sign(msg: &[u8], sk: &ClsSecretKey) -> ClsSignature {
    let m = message_scalar(msg);
    let a = random_g1();
    ClsSignature {
        a,
        b: a * sk.y,
        c: a * (sk.x + sk.x * sk.y * m),
    }
}

/// Verify a single message signature
pub fn cls_verify(sig: &ClsSignature, msg: &[u8], pk: &ClsPublicKey) -> bool {
    if is_identity_g1(&sig.a) {
        debug!("cls signature base is the identity");
        return false;
    }
    let m = message_scalar(msg);
    same_exponent(&sig.a, &pk.y, &sig.b)
        && base_relation(&pk.x, &sig.a, &sig.b, &m) == pair(&sig.c, &G2Projective::generator())
}

/// Create a randomized scheme key pair
#[instrument(skip_all)]
pub fn cli_generate() -> (CliSecretKey, CliPublicKey) {
    let x = random_scalar();
    let y = random_scalar();
    let z = random_scalar();
    let g = G2Projective::generator();
    (
        CliSecretKey { x, y, z },
        CliPublicKey {
            x: g * x,
            y: g * y,
            z: g * z,
        },
    )
}

/// Sign a message together with the randomizer `r`
pub fn cli_sign(msg: &[u8], r: &Scalar, sk: &CliSecretKey) -> CliSignature {
    let m = message_scalar(msg);
    let a = random_g1();
    let big_a = a * sk.z;
    let xy = sk.x * sk.y;
    CliSignature {
        a,
        big_a,
        b: a * sk.y,
        big_b: big_a * sk.y,
        c: a * (sk.x + xy * m) + big_a * (xy * r),
    }
}

/// Verify a signature over a message and randomizer
pub fn cli_verify(sig: &CliSignature, msg: &[u8], r: &Scalar, pk: &CliPublicKey) -> bool {
    if is_identity_g1(&sig.a) {
        debug!("cli signature base is the identity");
        return false;
    }
    let m = message_scalar(msg);
    same_exponent(&sig.a, &pk.z, &sig.big_a)
        && same_exponent(&sig.a, &pk.y, &sig.b)
        && same_exponent(&sig.big_a, &pk.y, &sig.big_b)
        && base_relation(&pk.x, &sig.a, &sig.b, &m) + pair(&sig.big_b, &pk.x) * r
            == pair(&sig.c, &G2Projective::generator())
}

/// Create a key pair for blocks of `len` messages
#[instrument(skip_all, fields(len = len))]
pub fn clb_generate(len: usize) -> CpResult<(ClbSecretKey, ClbPublicKey)> {
    if len == 0 {
        return Err(CpError::InvalidParameters("block must hold at least one message"));
    }
    let x = random_scalar();
    let y = random_scalar();
    let z: Vec<Scalar> = (1..len).map(|_| random_scalar()).collect();
    let g = G2Projective::generator();
    let pk = ClbPublicKey {
        x: g * x,
        y: g * y,
        z: z.iter().map(|z| g * z).collect(),
    };
    Ok((ClbSecretKey { x, y, z }, pk))
}

/// Sign a block of between one and [`ClbPublicKey::block_len`] messages.
///
/// A shorter block uses the leading key components only.
pub fn clb_sign(msgs: &[&[u8]], sk: &ClbSecretKey) -> CpResult<ClbSignature> {
    if msgs.is_empty() || msgs.len() > sk.z.len() + 1 {
        return Err(CpError::InvalidParameters("wrong number of messages for key"));
    }
    let m: Vec<Scalar> = msgs.iter().map(|msg| message_scalar(msg)).collect();
    let a = random_g1();
    let xy = sk.x * sk.y;
    let big_a: Vec<G1Projective> = sk.z[..m.len() - 1].iter().map(|z| a * z).collect();
    let big_b = big_a.iter().map(|ai| *ai * sk.y).collect();
    let c = big_a
        .iter()
        .zip(m.iter().skip(1))
        .fold(a * (sk.x + xy * m[0]), |acc, (ai, mi)| acc + *ai * (xy * mi));
    Ok(ClbSignature {
        a,
        big_a,
        b: a * sk.y,
        big_b,
        c,
    })
}

/// Verify a block signature
pub fn clb_verify(sig: &ClbSignature, msgs: &[&[u8]], pk: &ClbPublicKey) -> bool {
    if msgs.is_empty()
        || msgs.len() > pk.block_len()
        || sig.big_a.len() != msgs.len() - 1
        || sig.big_b.len() != msgs.len() - 1
    {
        debug!("clb block length mismatch");
        return false;
    }
    if is_identity_g1(&sig.a) {
        debug!("clb signature base is the identity");
        return false;
    }
    let m: Vec<Scalar> = msgs.iter().map(|msg| message_scalar(msg)).collect();
    if !same_exponent(&sig.a, &pk.y, &sig.b) {
        return false;
    }
    for ((zi, ai), bi) in pk.z.iter().zip(sig.big_a.iter()).zip(sig.big_b.iter()) {
        if !same_exponent(&sig.a, zi, ai) || !same_exponent(ai, &pk.y, bi) {
            return false;
        }
    }
    let lhs = sig
        .big_b
        .iter()
        .zip(m.iter().skip(1))
        .fold(base_relation(&pk.x, &sig.a, &sig.b, &m[0]), |acc, (bi, mi)| {
            acc + pair(bi, &pk.x) * mi
        });
    lhs == pair(&sig.c, &G2Projective::generator())
}
