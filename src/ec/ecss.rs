/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Schnorr signatures: a challenge scalar `e` and a response scalar `s`.

use super::{
    decode_nonzero_scalar, encode_scalar, hash_to_scalar, point_bytes, scalars_equal, PublicKey,
    SecretKey, SCALAR_BYTES,
};
use crate::{hash::MessageMode, CpError, CpResult};
use ff::Field;
use group::Group;
use p256::{ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use tracing::trace;

pub use super::generate;

/// An ECSS signature `(e, s)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcssSignature {
    /// H(H(m) || kG)
    pub e: [u8; SCALAR_BYTES],
    /// k - d e
    pub s: [u8; SCALAR_BYTES],
}

impl EcssSignature {
    /// `e || s`
    pub fn to_bytes(&self) -> [u8; 2 * SCALAR_BYTES] {
        let mut out = [0u8; 2 * SCALAR_BYTES];
        out[..SCALAR_BYTES].copy_from_slice(&self.e);
        out[SCALAR_BYTES..].copy_from_slice(&self.s);
        out
    }

    /// Split `e || s`
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        if data.len() != 2 * SCALAR_BYTES {
            return Err(CpError::InvalidEncoding("ecss signature must be 64 bytes"));
        }
        let mut e = [0u8; SCALAR_BYTES];
        let mut s = [0u8; SCALAR_BYTES];
        e.copy_from_slice(&data[..SCALAR_BYTES]);
        s.copy_from_slice(&data[SCALAR_BYTES..]);
        Ok(Self { e, s })
    }
}

fn challenge(digest: &[u8], commitment: &ProjectivePoint) -> Scalar {
    hash_to_scalar(&[digest, &point_bytes(commitment)])
}

/// Sign a message, or a SHA-256 digest of one
pub fn sign(input: &[u8], mode: MessageMode, sk: &SecretKey) -> CpResult<EcssSignature> {
    let digest = mode.digest(input)?;
    let d = *sk.to_nonzero_scalar();
    loop {
        let k = Scalar::random(&mut OsRng);
        if bool::from(k.is_zero()) {
            continue;
        }
        let e = challenge(&digest, &(ProjectivePoint::GENERATOR * k));
        let s = k - d * e;
        if bool::from(e.is_zero()) || bool::from(s.is_zero()) {
            continue;
        }
        return Ok(EcssSignature {
            e: encode_scalar(&e),
            s: encode_scalar(&s),
        });
    }
}

/// Check a signature over a message, or a SHA-256 digest of one
pub fn verify(signature: &EcssSignature, input: &[u8], mode: MessageMode, pk: &PublicKey) -> bool {
    let digest = match mode.digest(input) {
        Ok(digest) => digest,
        Err(_) => return false,
    };
    let (e, s) = match (
        decode_nonzero_scalar(&signature.e),
        decode_nonzero_scalar(&signature.s),
    ) {
        (Some(e), Some(s)) => (e, s),
        _ => {
            trace!("ecss signature component out of range");
            return false;
        }
    };
    let commitment = ProjectivePoint::GENERATOR * s + pk.to_projective() * e;
    if bool::from(commitment.is_identity()) {
        return false;
    }
    scalars_equal(&challenge(&digest, &commitment), &e)
}
