/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! The elliptic curve digital signature algorithm.
//!
//! Every call to [`sign`] draws a fresh nonce from the operating system, so
//! two signatures never share one.

use super::{
    decode_nonzero_scalar, encode_scalar, reduce, scalars_equal, x_coordinate, PublicKey,
    SecretKey, SCALAR_BYTES,
};
use crate::{hash::MessageMode, CpError, CpResult};
use ff::Field;
use p256::{FieldBytes, ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use tracing::trace;

pub use super::generate;

/// An ECDSA signature `(r, s)`.
///
/// The components are kept in their encoded form and range checked by
/// [`verify`], so a zero or unreduced component is a verification failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// x(kG) mod n
    pub r: [u8; SCALAR_BYTES],
    /// k^-1 (e + d r) mod n
    pub s: [u8; SCALAR_BYTES],
}

impl EcdsaSignature {
    /// `r || s`
    pub fn to_bytes(&self) -> [u8; 2 * SCALAR_BYTES] {
        let mut out = [0u8; 2 * SCALAR_BYTES];
        out[..SCALAR_BYTES].copy_from_slice(&self.r);
        out[SCALAR_BYTES..].copy_from_slice(&self.s);
        out
    }

    /// Split `r || s`
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        if data.len() != 2 * SCALAR_BYTES {
            return Err(CpError::InvalidEncoding("ecdsa signature must be 64 bytes"));
        }
        let mut r = [0u8; SCALAR_BYTES];
        let mut s = [0u8; SCALAR_BYTES];
        r.copy_from_slice(&data[..SCALAR_BYTES]);
        s.copy_from_slice(&data[SCALAR_BYTES..]);
        Ok(Self { r, s })
    }
}

/// Sign a message, or a SHA-256 digest of one
pub fn sign(input: &[u8], mode: MessageMode, sk: &SecretKey) -> CpResult<EcdsaSignature> {
    let digest = mode.digest(input)?;
    let e = reduce(FieldBytes::from_slice(&digest));
    let d = *sk.to_nonzero_scalar();

    loop {
        let k = Scalar::random(&mut OsRng);
        if bool::from(k.is_zero()) {
            continue;
        }
        let big_r = ProjectivePoint::GENERATOR * k;
        let r = reduce(&x_coordinate(&big_r)?);
        if bool::from(r.is_zero()) {
            continue;
        }
        let k_inv: Option<Scalar> = k.invert().into();
        let k_inv = match k_inv {
            Some(k_inv) => k_inv,
            None => continue,
        };
        let s = k_inv * (e + d * r);
        if bool::from(s.is_zero()) {
            continue;
        }
        return Ok(EcdsaSignature {
            r: encode_scalar(&r),
            s: encode_scalar(&s),
        });
    }
}

/// Check a signature over a message, or a SHA-256 digest of one
pub fn verify(signature: &EcdsaSignature, input: &[u8], mode: MessageMode, pk: &PublicKey) -> bool {
    let digest = match mode.digest(input) {
        Ok(digest) => digest,
        Err(_) => return false,
    };
    let (r, s) = match (
        decode_nonzero_scalar(&signature.r),
        decode_nonzero_scalar(&signature.s),
    ) {
        (Some(r), Some(s)) => (r, s),
        _ => {
            trace!("ecdsa signature component out of range");
            return false;
        }
    };
    let w: Option<Scalar> = s.invert().into();
    let w = match w {
        Some(w) => w,
        None => return false,
    };
    let e = reduce(FieldBytes::from_slice(&digest));
    let u1 = e * w;
    let u2 = r * w;
    let big_r = ProjectivePoint::GENERATOR * u1 + pk.to_projective() * u2;
    match x_coordinate(&big_r) {
        Ok(x) => scalars_equal(&reduce(&x), &r),
        Err(_) => false,
    }
}
