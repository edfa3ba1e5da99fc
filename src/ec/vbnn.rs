/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! VBNN identity-based signatures.
//!
//! A key generation center holding a master secret issues each identity a
//! Schnorr signature `(R, s)` on that identity. The user signs by proving
//! knowledge of `s` in a second Schnorr proof whose challenge covers the
//! identity, the message and `R`. Verification reconstructs the user's
//! public value `R + H(id || R) mpk` from the identity alone, so a signature
//! only verifies for the identity its key was issued to.

use super::{
    decode_nonzero_scalar, decode_point, encode_point, encode_scalar, hash_to_scalar, point_bytes,
    scalars_equal, PublicKey, SecretKey, POINT_BYTES, SCALAR_BYTES,
};
use crate::{CpError, CpResult};
use ff::Field;
use group::Group;
use p256::{NonZeroScalar, ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use tracing::{debug, instrument};
use zeroize::Zeroize;

/// The length of an encoded signature
pub const SIGNATURE_BYTES: usize = POINT_BYTES + 2 * SCALAR_BYTES;

/// A key generation center: the master secret and its public key
#[derive(Clone)]
pub struct VbnnKgc {
    msk: SecretKey,
    mpk: PublicKey,
}

impl core::fmt::Debug for VbnnKgc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VbnnKgc").field("mpk", &self.mpk).finish()
    }
}

/// The private key issued to a single identity
#[derive(Clone)]
pub struct VbnnUserKey {
    r_point: PublicKey,
    s: SecretKey,
}

impl core::fmt::Debug for VbnnUserKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VbnnUserKey")
            .field("r_point", &self.r_point)
            .finish()
    }
}

/// A VBNN signature `(R, z, h)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VbnnSignature {
    /// The commitment issued with the signer's key
    pub r_point: PublicKey,
    /// y + h s
    pub z: [u8; SCALAR_BYTES],
    /// H(id || m || R || Y)
    pub h: [u8; SCALAR_BYTES],
}

impl VbnnSignature {
    /// `R || z || h`, with `R` compressed
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = encode_point(&self.r_point);
        out.extend_from_slice(&self.z);
        out.extend_from_slice(&self.h);
        out
    }

    /// Parse `R || z || h`
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        if data.len() != SIGNATURE_BYTES {
            return Err(CpError::InvalidEncoding("vbnn signature has the wrong length"));
        }
        let r_point = decode_point(&data[..POINT_BYTES])?;
        let mut z = [0u8; SCALAR_BYTES];
        let mut h = [0u8; SCALAR_BYTES];
        z.copy_from_slice(&data[POINT_BYTES..POINT_BYTES + SCALAR_BYTES]);
        h.copy_from_slice(&data[POINT_BYTES + SCALAR_BYTES..]);
        Ok(Self { r_point, z, h })
    }
}

/// c = H(id || R)
fn identity_challenge(identity: &[u8], r_point: &PublicKey) -> Scalar {
    hash_to_scalar(&[identity, &encode_point(r_point)])
}

/// h = H(id || m || R || Y)
fn message_challenge(
    identity: &[u8],
    message: &[u8],
    r_point: &PublicKey,
    y_point: &ProjectivePoint,
) -> Scalar {
    hash_to_scalar(&[
        identity,
        message,
        &encode_point(r_point),
        &point_bytes(y_point),
    ])
}

impl VbnnKgc {
    /// Create a new key generation center with a random master secret
    #[instrument(skip_all)]
    pub fn generate() -> Self {
        let (msk, mpk) = super::generate();
        Self { msk, mpk }
    }

    /// The master public key
    pub fn mpk(&self) -> &PublicKey {
        &self.mpk
    }

    /// Issue the private key for `identity`.
    ///
    /// The same center always issues the same key for the same identity.
    #[instrument(skip_all, fields(identity_len = identity.len()))]
    pub fn issue(&self, identity: &[u8]) -> CpResult<VbnnUserKey> {
        let mut msk_bytes = encode_scalar(&self.msk.to_nonzero_scalar());
        let r = hash_to_scalar(&[&msk_bytes, identity]);
        msk_bytes.zeroize();
        let r: Option<NonZeroScalar> = NonZeroScalar::new(r).into();
        let r = r.ok_or(CpError::InvalidParameters("identity hashes to zero"))?;

        let r_point = PublicKey::from_secret_scalar(&r);
        let c = identity_challenge(identity, &r_point);
        let msk = *self.msk.to_nonzero_scalar();
        let s: Option<NonZeroScalar> = NonZeroScalar::new(*r + c * msk).into();
        let s = s.ok_or(CpError::InvalidParameters("issued key is zero"))?;

        let lhs = ProjectivePoint::GENERATOR * *s;
        let rhs = r_point.to_projective() + self.mpk.to_projective() * c;
        if lhs != rhs {
            debug!("vbnn issued key failed its consistency check");
            return Err(CpError::InvalidParameters("issued key is inconsistent"));
        }
        Ok(VbnnUserKey {
            r_point,
            s: SecretKey::from(s),
        })
    }
}

impl VbnnUserKey {
    /// The commitment `R` bound to this key's identity
    pub fn r_point(&self) -> &PublicKey {
        &self.r_point
    }
}

/// Sign `message` as `identity`
pub fn sign(identity: &[u8], message: &[u8], key: &VbnnUserKey) -> CpResult<VbnnSignature> {
    let s = *key.s.to_nonzero_scalar();
    loop {
        let y = Scalar::random(&mut OsRng);
        if bool::from(y.is_zero()) {
            continue;
        }
        let y_point = ProjectivePoint::GENERATOR * y;
        let h = message_challenge(identity, message, &key.r_point, &y_point);
        let z = y + h * s;
        if bool::from(h.is_zero()) || bool::from(z.is_zero()) {
            continue;
        }
        return Ok(VbnnSignature {
            r_point: key.r_point.clone(),
            z: encode_scalar(&z),
            h: encode_scalar(&h),
        });
    }
}

/// Check that `signature` was made over `message` by the holder of the key
/// issued to `identity` under `mpk`
pub fn verify(signature: &VbnnSignature, identity: &[u8], message: &[u8], mpk: &PublicKey) -> bool {
    let (z, h) = match (
        decode_nonzero_scalar(&signature.z),
        decode_nonzero_scalar(&signature.h),
    ) {
        (Some(z), Some(h)) => (z, h),
        _ => {
            debug!("vbnn signature component out of range");
            return false;
        }
    };
    let c = identity_challenge(identity, &signature.r_point);
    let user_public = signature.r_point.to_projective() + mpk.to_projective() * c;
    let y_point = ProjectivePoint::GENERATOR * z - user_public * h;
    if bool::from(y_point.is_identity()) {
        return false;
    }
    scalars_equal(
        &message_challenge(identity, message, &signature.r_point, &y_point),
        &h,
    )
}
