/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Protocols over the BLS12-381 pairing `e: G1 x G2 -> GT`.
//!
//! Messages are hashed into G1 or G2 with the hash-to-curve suites of
//! [`G1_DST`] and [`G2_DST`], and into the scalar field by reducing a wide
//! SHA-256 output. Group elements are exchanged in compressed form; decoding
//! checks the point is on the curve and in the prime order subgroup.

/// Overwrite the listed secret scalars when the key is zeroized or dropped
macro_rules! wipe_on_drop {
    ($name:ident, |$key:ident| $scalars:expr) => {
        impl zeroize::Zeroize for $name {
            fn zeroize(&mut self) {
                let $key = self;
                super::wipe_scalars($scalars);
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                let $key = self;
                super::wipe_scalars($scalars);
            }
        }

        impl zeroize::ZeroizeOnDrop for $name {}
    };
}

pub mod bbs;
pub mod bgn;
pub mod bls;
pub mod cl;
pub mod ibe;
pub mod ps;
pub mod sokaka;
pub mod zss;

pub use blstrs::{G1Projective, G2Projective, Gt, Scalar};

use crate::{
    config::{G1_DST, G2_DST},
    hash::{kdf, wide_hash, MessageMode},
    CpError, CpResult,
};
use blstrs::{Compress, G1Affine, G2Affine};
use ff::Field;
use group::{Curve, Group};
use core::sync::atomic::{compiler_fence, Ordering};
use rand::rngs::OsRng;

/// Length of a compressed G1 element
pub const G1_BYTES: usize = 48;
/// Length of a compressed G2 element
pub const G2_BYTES: usize = 96;
/// Length of a compressed GT element
pub const GT_BYTES: usize = 288;

/// `e(p, q)`
pub(crate) fn pair(p: &G1Projective, q: &G2Projective) -> Gt {
    blstrs::pairing(&p.to_affine(), &q.to_affine())
}

/// `e(g1, g2)`
pub(crate) fn gt_generator() -> Gt {
    pair(&G1Projective::generator(), &G2Projective::generator())
}

pub(crate) fn hash_to_g1(msg: &[u8]) -> G1Projective {
    G1Projective::hash_to_curve(msg, G1_DST, &[])
}

pub(crate) fn hash_to_g2(msg: &[u8]) -> G2Projective {
    G2Projective::hash_to_curve(msg, G2_DST, &[])
}

/// Hash the signing input selected by `mode` into G1
pub(crate) fn hash_message_to_g1(input: &[u8], mode: MessageMode) -> CpResult<G1Projective> {
    Ok(hash_to_g1(&mode.digest(input)?))
}

/// Reduce a 64 byte hash of the pieces into the scalar field.
///
/// Each half is cut to 248 bits so it is canonical on its own, then the
/// halves are combined as `hi * 2^248 + lo`.
pub(crate) fn hash_to_scalar(pieces: &[&[u8]]) -> Scalar {
    let wide = wide_hash(pieces);
    let mut hi = [0u8; 32];
    let mut lo = [0u8; 32];
    hi[1..].copy_from_slice(&wide[1..32]);
    lo[1..].copy_from_slice(&wide[33..]);
    let hi = Option::<Scalar>::from(Scalar::from_bytes_be(&hi)).unwrap_or(Scalar::ZERO);
    let lo = Option::<Scalar>::from(Scalar::from_bytes_be(&lo)).unwrap_or(Scalar::ZERO);
    let shift = Scalar::from(2u64).pow_vartime([248u64, 0, 0, 0]);
    hi * shift + lo
}

/// A uniformly random nonzero scalar
pub(crate) fn random_scalar() -> Scalar {
    loop {
        let s = Scalar::random(&mut OsRng);
        if !bool::from(s.is_zero()) {
            return s;
        }
    }
}

pub(crate) fn wipe_scalars<'a, I>(scalars: I)
where
    I: IntoIterator<Item = &'a mut Scalar>,
{
    for s in scalars {
        *s = Scalar::ZERO;
    }
    compiler_fence(Ordering::SeqCst);
}

/// A uniformly random G1 element other than the identity
pub(crate) fn random_g1() -> G1Projective {
    G1Projective::generator() * random_scalar()
}

/// Compressed encoding of a GT element
pub fn gt_to_bytes(gt: &Gt) -> CpResult<Vec<u8>> {
    let mut out = Vec::with_capacity(GT_BYTES);
    gt.write_compressed(&mut out)
        .map_err(|_| CpError::InvalidElement("GT element is not compressible"))?;
    Ok(out)
}

/// KDF2 over the compressed encoding of a GT element
pub(crate) fn gt_kdf(gt: &Gt, len: usize) -> CpResult<Vec<u8>> {
    if len == 0 {
        return Err(CpError::InvalidParameters("key length must be positive"));
    }
    Ok(kdf(&gt_to_bytes(gt)?, len))
}

/// Compressed encoding of a G1 element
pub fn g1_to_bytes(p: &G1Projective) -> [u8; G1_BYTES] {
    p.to_affine().to_compressed()
}

/// Decode a compressed G1 element, checking subgroup membership
pub fn g1_from_bytes(data: &[u8]) -> CpResult<G1Projective> {
    let bytes: &[u8; G1_BYTES] = data
        .try_into()
        .map_err(|_| CpError::InvalidEncoding("G1 element must be 48 bytes"))?;
    Option::<G1Affine>::from(G1Affine::from_compressed(bytes))
        .map(G1Projective::from)
        .ok_or(CpError::InvalidElement("invalid G1 element"))
}

/// Compressed encoding of a G2 element
pub fn g2_to_bytes(p: &G2Projective) -> [u8; G2_BYTES] {
    p.to_affine().to_compressed()
}

/// Decode a compressed G2 element, checking subgroup membership
pub fn g2_from_bytes(data: &[u8]) -> CpResult<G2Projective> {
    let bytes: &[u8; G2_BYTES] = data
        .try_into()
        .map_err(|_| CpError::InvalidEncoding("G2 element must be 96 bytes"))?;
    Option::<G2Affine>::from(G2Affine::from_compressed(bytes))
        .map(G2Projective::from)
        .ok_or(CpError::InvalidElement("invalid G2 element"))
}

pub(crate) fn is_identity_g1(p: &G1Projective) -> bool {
    bool::from(p.is_identity())
}

pub(crate) fn is_identity_g2(p: &G2Projective) -> bool {
    bool::from(p.is_identity())
}
