/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Boneh-Franklin identity-based encryption, BasicIdent.
//!
//! A ciphertext is `U = r g1` followed by the payload masked with
//! `KDF(e(P_pub, H2(id))^r)`. The recipient recovers the mask as
//! `KDF(e(U, s H2(id)))`.

use super::{
    g1_from_bytes, g1_to_bytes, gt_kdf, hash_to_g2, is_identity_g1, pair, random_scalar,
    G1Projective, G2Projective, Scalar, G1_BYTES,
};
use crate::{CpError, CpResult};
use group::Group;
use tracing::{debug, instrument};

/// The master secret of the key generation center
#[derive(Clone)]
pub struct IbeMaster {
    s: Scalar,
    public: G1Projective,
}
wipe_on_drop!(IbeMaster, |k| [&mut k.s]);

impl core::fmt::Debug for IbeMaster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IbeMaster")
            .field("public", &self.public)
            .finish()
    }
}

/// The private key of one identity, `s H2(id)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IbePrivateKey(pub G2Projective);

/// An IBE ciphertext
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IbeCiphertext {
    /// r g1
    pub u: G1Projective,
    /// The masked payload
    pub v: Vec<u8>,
}

impl IbeCiphertext {
    /// `U || V` with `U` compressed
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = g1_to_bytes(&self.u).to_vec();
        out.extend_from_slice(&self.v);
        out
    }

    /// Parse `U || V`
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        if data.len() <= G1_BYTES {
            return Err(CpError::InvalidEncoding("ibe ciphertext too short"));
        }
        let u = g1_from_bytes(&data[..G1_BYTES])?;
        Ok(Self {
            u,
            v: data[G1_BYTES..].to_vec(),
        })
    }
}

impl IbeMaster {
    /// Create a random master secret
    #[instrument(skip_all)]
    pub fn generate() -> Self {
        let s = random_scalar();
        Self {
            s,
            public: G1Projective::generator() * s,
        }
    }

    /// The master public key `P_pub = s g1`
    pub fn public(&self) -> &G1Projective {
        &self.public
    }

    /// Derive the private key of `identity`
    pub fn issue(&self, identity: &[u8]) -> IbePrivateKey {
        IbePrivateKey(hash_to_g2(identity) * self.s)
    }
}

/// Encrypt `plaintext` to `identity` under the master public key
pub fn encrypt(plaintext: &[u8], identity: &[u8], public: &G1Projective) -> CpResult<IbeCiphertext> {
    if plaintext.is_empty() {
        return Err(CpError::InvalidEncoding("plaintext is empty"));
    }
    if is_identity_g1(public) {
        return Err(CpError::InvalidElement("master public key is the identity"));
    }
    let r = random_scalar();
    let mask = gt_kdf(&(pair(public, &hash_to_g2(identity)) * r), plaintext.len())?;
    let v = plaintext.iter().zip(mask.iter()).map(|(a, b)| a ^ b).collect();
    Ok(IbeCiphertext {
        u: G1Projective::generator() * r,
        v,
    })
}

/// Decrypt a ciphertext with the recipient's private key
pub fn decrypt(ciphertext: &IbeCiphertext, key: &IbePrivateKey) -> CpResult<Vec<u8>> {
    if ciphertext.v.is_empty() {
        return Err(CpError::InvalidEncoding("ibe ciphertext has no payload"));
    }
    if is_identity_g1(&ciphertext.u) {
        debug!("ibe ciphertext carries the identity");
        return Err(CpError::InvalidCiphertext);
    }
    let mask = gt_kdf(&pair(&ciphertext.u, &key.0), ciphertext.v.len())?;
    Ok(ciphertext
        .v
        .iter()
        .zip(mask.iter())
        .map(|(a, b)| a ^ b)
        .collect())
}
