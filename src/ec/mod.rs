/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Protocols over the NIST P-256 curve.
//!
//! Private scalars are held in [`SecretKey`], which is never zero and is
//! wiped on drop. Public points are held in [`PublicKey`], which can only be
//! constructed from a point on the curve other than the identity; since the
//! cofactor is one this is also the full order check.

pub mod ecdh;
pub mod ecdsa;
pub mod ecies;
pub mod ecmqv;
pub mod ecss;
pub mod vbnn;

pub use p256::{PublicKey, SecretKey};

use crate::{hash::hash_pieces, CpError, CpResult};
use elliptic_curve::{
    bigint::U256, ops::Reduce, point::AffineCoordinates, sec1::ToEncodedPoint,
};
use ff::{Field, PrimeField};
use group::Group;
use p256::{FieldBytes, ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Length of an encoded scalar
pub const SCALAR_BYTES: usize = 32;

/// Length of a compressed point
pub const POINT_BYTES: usize = 33;

/// Generate a fresh private scalar and its public point
pub fn generate() -> (SecretKey, PublicKey) {
    let sk = SecretKey::random(&mut OsRng);
    let pk = sk.public_key();
    (sk, pk)
}

/// Decode and validate a SEC1 encoded point
pub fn decode_point(bytes: &[u8]) -> CpResult<PublicKey> {
    PublicKey::from_sec1_bytes(bytes).map_err(|_| CpError::InvalidElement("invalid P-256 point"))
}

/// Compressed SEC1 encoding of a public point
pub fn encode_point(pk: &PublicKey) -> Vec<u8> {
    pk.to_encoded_point(true).as_bytes().to_vec()
}

/// The x-coordinate of `p`, rejecting the identity
pub(crate) fn x_coordinate(p: &ProjectivePoint) -> CpResult<FieldBytes> {
    if bool::from(p.is_identity()) {
        return Err(CpError::InvalidElement("point at infinity"));
    }
    Ok(p.to_affine().x())
}

/// Reduce 32 big-endian bytes modulo the group order
pub(crate) fn reduce(bytes: &FieldBytes) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(bytes)
}

/// Hash the pieces into a scalar
pub(crate) fn hash_to_scalar(pieces: &[&[u8]]) -> Scalar {
    reduce(&hash_pieces::<Sha256>(pieces))
}

/// Parse a canonical scalar in `[1, n - 1]`
pub(crate) fn decode_nonzero_scalar(bytes: &[u8; SCALAR_BYTES]) -> Option<Scalar> {
    let s: Option<Scalar> = Scalar::from_repr(FieldBytes::clone_from_slice(bytes)).into();
    s.filter(|s| !bool::from(s.is_zero()))
}

/// Fixed width encoding of a scalar
pub(crate) fn encode_scalar(s: &Scalar) -> [u8; SCALAR_BYTES] {
    let mut out = [0u8; SCALAR_BYTES];
    out.copy_from_slice(&s.to_repr());
    out
}

/// Compressed encoding of a projective point, the identity as a single zero byte
pub(crate) fn point_bytes(p: &ProjectivePoint) -> Vec<u8> {
    p.to_affine().to_encoded_point(true).as_bytes().to_vec()
}

pub(crate) fn scalars_equal(a: &Scalar, b: &Scalar) -> bool {
    a.ct_eq(b).into()
}
