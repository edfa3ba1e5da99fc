/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Sakai-Ohgishi-Kasahara non-interactive identity-based key agreement.
//!
//! Every identity receives `s H1(id)` in G1 and `s H2(id)` in G2 from the
//! holder of the master scalar `s`. Two parties order their identities,
//! shorter first and then lexicographically, and both evaluate
//! `e(H1(first), H2(second))^s` with whichever half of their key fits.

use super::{
    gt_kdf, hash_to_g1, hash_to_g2, pair, random_scalar, G1Projective, G2Projective, Scalar,
};
use crate::CpResult;
use core::cmp::Ordering;
use tracing::instrument;

/// The master scalar shared by the key generation center
#[derive(Clone)]
pub struct SokMaster {
    s: Scalar,
}
wipe_on_drop!(SokMaster, |k| [&mut k.s]);

impl core::fmt::Debug for SokMaster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SokMaster")
    }
}

/// The private key of one identity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SokPrivateKey {
    /// s H1(id)
    pub first: G1Projective,
    /// s H2(id)
    pub second: G2Projective,
}

impl SokMaster {
    /// Create a random master scalar
    #[instrument(skip_all)]
    pub fn generate() -> Self {
        Self { s: random_scalar() }
    }

    /// Derive the private key of `identity`
    pub fn issue(&self, identity: &[u8]) -> SokPrivateKey {
        SokPrivateKey {
            first: hash_to_g1(identity) * self.s,
            second: hash_to_g2(identity) * self.s,
        }
    }
}

fn goes_first(a: &[u8], b: &[u8]) -> bool {
    match a.len().cmp(&b.len()) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => a <= b,
    }
}

/// Derive a `len` byte key shared between `identity` holding `key` and `peer`
pub fn derive_key(identity: &[u8], key: &SokPrivateKey, peer: &[u8], len: usize) -> CpResult<Vec<u8>> {
    let shared = if goes_first(identity, peer) {
        pair(&key.first, &hash_to_g2(peer))
    } else {
        pair(&hash_to_g1(peer), &key.second)
    };
    gt_kdf(&shared, len)
}
