/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Elliptic curve integrated encryption scheme.
//!
//! An ephemeral Diffie-Hellman exchange with the recipient's key is run
//! through KDF2 to produce an AES-128 key and an HMAC-SHA256 key. The payload
//! is encrypted with AES-128-CBC under a zero IV with PKCS#7 padding and the
//! ciphertext body is authenticated. The tag is checked before any
//! decryption happens.

use super::{decode_point, encode_point, x_coordinate, PublicKey, SecretKey, POINT_BYTES};
use crate::{hash::kdf, CpError, CpResult};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

pub use super::generate;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Length of the AES-128 key
pub const CIPHER_KEY_LEN: usize = 16;
/// Length of the HMAC-SHA256 key and tag
pub const TAG_LEN: usize = 32;
const BLOCK_LEN: usize = 16;
const IV: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

/// An ECIES ciphertext: the ephemeral point and the authenticated body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EciesCiphertext {
    /// The sender's ephemeral public point
    pub ephemeral: PublicKey,
    /// AES-CBC ciphertext followed by the HMAC tag
    pub body: Vec<u8>,
}

impl EciesCiphertext {
    /// Compressed ephemeral point followed by the body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = encode_point(&self.ephemeral);
        out.extend_from_slice(&self.body);
        out
    }

    /// Parse and validate an encoded ciphertext
    pub fn from_bytes(data: &[u8]) -> CpResult<Self> {
        if data.len() < POINT_BYTES + BLOCK_LEN + TAG_LEN {
            return Err(CpError::InvalidEncoding("ecies ciphertext too short"));
        }
        let ephemeral = decode_point(&data[..POINT_BYTES])?;
        Ok(Self {
            ephemeral,
            body: data[POINT_BYTES..].to_vec(),
        })
    }
}

/// Derive the cipher and MAC keys from the shared point `sk * pk`
fn session_keys(sk: &SecretKey, pk: &PublicKey) -> CpResult<Vec<u8>> {
    let shared = pk.to_projective() * *sk.to_nonzero_scalar();
    let x = x_coordinate(&shared)?;
    Ok(kdf(&x, CIPHER_KEY_LEN + TAG_LEN))
}

fn tag(mac_key: &[u8], body: &[u8]) -> CpResult<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(mac_key)
        .map_err(|_| CpError::InvalidParameters("invalid mac key length"))?;
    mac.update(body);
    Ok(mac)
}

/// Encrypt `plaintext` to the holder of `recipient`
pub fn encrypt(plaintext: &[u8], recipient: &PublicKey) -> CpResult<EciesCiphertext> {
    let (ephemeral_sk, ephemeral) = generate();
    let keys = session_keys(&ephemeral_sk, recipient)?;
    let (cipher_key, mac_key) = keys.split_at(CIPHER_KEY_LEN);

    let mut body = Aes128CbcEnc::new_from_slices(cipher_key, &IV)
        .map_err(|_| CpError::InvalidParameters("invalid cipher key length"))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    let t = tag(mac_key, &body)?.finalize().into_bytes();
    body.extend_from_slice(t.as_slice());
    Ok(EciesCiphertext { ephemeral, body })
}

/// Authenticate and decrypt a ciphertext addressed to `sk`.
///
/// Returns [`CpError::Unauthenticated`] without touching the payload when the
/// tag does not match.
pub fn decrypt(ciphertext: &EciesCiphertext, sk: &SecretKey) -> CpResult<Vec<u8>> {
    let body = &ciphertext.body;
    if body.len() < BLOCK_LEN + TAG_LEN || (body.len() - TAG_LEN) % BLOCK_LEN != 0 {
        return Err(CpError::InvalidEncoding("ecies body has an invalid length"));
    }
    let keys = session_keys(sk, &ciphertext.ephemeral)?;
    let (cipher_key, mac_key) = keys.split_at(CIPHER_KEY_LEN);
    let (payload, t) = body.split_at(body.len() - TAG_LEN);

    if tag(mac_key, payload)?.verify_slice(t).is_err() {
        debug!("ecies tag mismatch");
        return Err(CpError::Unauthenticated);
    }
    Aes128CbcDec::new_from_slices(cipher_key, &IV)
        .map_err(|_| CpError::InvalidParameters("invalid cipher key length"))?
        .decrypt_padded_vec_mut::<Pkcs7>(payload)
        .map_err(|_| CpError::InvalidCiphertext)
}
