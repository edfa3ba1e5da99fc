/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Elliptic curve Menezes-Qu-Vanstone authenticated key agreement.
//!
//! Each party holds a static and an ephemeral key pair. Both parties derive
//! the same secret from their own two private scalars and the peer's two
//! public points.

use super::{reduce, x_coordinate, PublicKey, SecretKey};
use crate::{hash::kdf, CpError, CpResult};
use elliptic_curve::point::AffineCoordinates;
use p256::{FieldBytes, Scalar};

pub use super::generate;

/// Half the bit length of the group order, rounded up
const HALF_ORDER_BITS: usize = 128;

/// The associate value `(x mod 2^h) + 2^h` of a point, `h = HALF_ORDER_BITS`
fn associate(point: &PublicKey) -> Scalar {
    let x = point.as_affine().x();
    let split = x.len() - HALF_ORDER_BITS / 8;
    let mut bytes = FieldBytes::default();
    bytes[split - 1] = 1;
    bytes[split..].copy_from_slice(&x[split..]);
    reduce(&bytes)
}

/// Derive `len` bytes from our static and ephemeral keys and the peer's
/// static and ephemeral public points.
pub fn derive_key(
    static_sk: &SecretKey,
    ephemeral_sk: &SecretKey,
    peer_static: &PublicKey,
    peer_ephemeral: &PublicKey,
    len: usize,
) -> CpResult<Vec<u8>> {
    if len == 0 {
        return Err(CpError::InvalidParameters("key length must be positive"));
    }
    let u = associate(&ephemeral_sk.public_key());
    let v = associate(peer_ephemeral);

    // s = d_eph + u * d_static
    let s = *ephemeral_sk.to_nonzero_scalar() + u * *static_sk.to_nonzero_scalar();
    // P = s * (Q_eph' + v * Q_static')
    let t = peer_ephemeral.to_projective() + peer_static.to_projective() * v;
    let x = x_coordinate(&(t * s))?;
    Ok(kdf(&x, len))
}
