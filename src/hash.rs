/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Digest and key derivation helpers shared by every suite.

use crate::{CpError, CpResult};
use digest::{generic_array::GenericArray, Digest};
use sha2::Sha256;

/// Length of the message digest in bytes
pub const DIGEST_LEN: usize = 32;

/// Selects how a signing or verification input is interpreted
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MessageMode {
    /// The input is arbitrary data and is hashed first
    Raw,
    /// The input is already a SHA-256 digest
    Prehashed,
}

impl MessageMode {
    /// Produce the digest that the scheme actually signs
    pub fn digest(self, input: &[u8]) -> CpResult<[u8; DIGEST_LEN]> {
        match self {
            Self::Raw => Ok(md_map(input)),
            Self::Prehashed => input
                .try_into()
                .map_err(|_| CpError::InvalidEncoding("digest must be 32 bytes")),
        }
    }
}

/// SHA-256 of `data`
pub fn md_map(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// KDF2 over SHA-256: `H(z || 1) || H(z || 2) || ...` truncated to `len` bytes.
pub fn kdf(z: &[u8], len: usize) -> Vec<u8> {
    let h = DIGEST_LEN;
    let blocks = (len + h - 1) / h;
    let mut out = Vec::with_capacity(blocks * h);
    for counter in 1..=blocks as u32 {
        let mut hasher = Sha256::new();
        hasher.update(z);
        hasher.update(counter.to_be_bytes());
        out.extend_from_slice(hasher.finalize().as_slice());
    }
    out.truncate(len);
    out
}

/// Hash each piece individually then hash all the outputs together,
/// so that no concatenation of pieces is ambiguous.
pub fn hash_pieces<D: Digest>(data: &[&[u8]]) -> GenericArray<u8, D::OutputSize> {
    let mut hasher = D::new();
    data.iter().map(|datum| D::digest(datum)).for_each(|d| {
        hasher.update(d.as_slice());
    });
    hasher.finalize()
}

/// 64 bytes of hash output for reduction into a prime order scalar field
pub(crate) fn wide_hash(data: &[&[u8]]) -> [u8; 64] {
    let mut out = [0u8; 64];
    let first = hash_pieces::<Sha256>(data);
    let mut hasher = Sha256::new();
    hasher.update(first.as_slice());
    hasher.update([1u8]);
    out[..32].copy_from_slice(first.as_slice());
    out[32..].copy_from_slice(hasher.finalize().as_slice());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf_truncates_and_extends() {
        let z = b"shared secret";
        let short = kdf(z, 16);
        let long = kdf(z, 80);
        assert_eq!(short.len(), 16);
        assert_eq!(long.len(), 80);
        assert_eq!(&long[..16], short.as_slice());

        let mut first = z.to_vec();
        first.extend_from_slice(&1u32.to_be_bytes());
        assert_eq!(&long[..32], md_map(&first).as_slice());
    }

    #[test]
    fn prehashed_mode_requires_a_digest() {
        let m = b"message";
        let h = md_map(m);
        assert_eq!(MessageMode::Raw.digest(m).unwrap(), h);
        assert_eq!(MessageMode::Prehashed.digest(&h).unwrap(), h);
        assert!(MessageMode::Prehashed.digest(m).is_err());
    }
}
