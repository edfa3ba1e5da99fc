/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Elliptic curve Diffie-Hellman key agreement.

use super::{x_coordinate, PublicKey, SecretKey};
use crate::{hash::kdf, CpError, CpResult};

pub use super::generate;

/// Derive `len` bytes shared with the owner of `peer`.
///
/// The key is KDF2 over the x-coordinate of `sk * peer`.
pub fn derive_key(sk: &SecretKey, peer: &PublicKey, len: usize) -> CpResult<Vec<u8>> {
    if len == 0 {
        return Err(CpError::InvalidParameters("key length must be positive"));
    }
    let shared = peer.to_projective() * *sk.to_nonzero_scalar();
    let x = x_coordinate(&shared)?;
    Ok(kdf(&x, len))
}
