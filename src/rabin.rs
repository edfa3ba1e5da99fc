/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Rabin encryption.
//!
//! The plaintext block is the PKCS#1 v1.5 type 2 framing of
//! `M || SHA-256(M)[..8]`. Squaring is not injective, so decryption computes
//! all four square roots and keeps those whose framing parses and whose
//! trailing 8 bytes match the digest of the recovered message. If more than
//! one root qualifies the numerically smallest one wins; if none does the
//! ciphertext is rejected.

use crate::{
    config::{ModulusSize, MIN_MODULUS_BITS},
    hash::md_map,
    utils::*,
    CpError, CpResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use unknown_order::BigNumber;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bytes of redundancy appended to each message
pub const REDUNDANCY_LEN: usize = 8;

/// A Rabin public key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Zeroize)]
#[serde(try_from = "RabinPublicKeyParts")]
pub struct RabinPublicKey {
    pub(crate) n: BigNumber,
}

#[derive(Deserialize)]
struct RabinPublicKeyParts {
    n: BigNumber,
}

impl TryFrom<RabinPublicKeyParts> for RabinPublicKey {
    type Error = CpError;

    // a product of two primes equal to 3 mod 4 is 1 mod 4
    fn try_from(parts: RabinPublicKeyParts) -> CpResult<Self> {
        let n = parts.n;
        if n.bit_length() < MIN_MODULUS_BITS || &n % &BigNumber::from(4u64) != BigNumber::one() {
            return Err(CpError::InvalidElement("rabin modulus out of range"));
        }
        Ok(Self { n })
    }
}

/// A Rabin private key: the factors `p = q = 3 mod 4` of the modulus
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RabinPrivateKey {
    pub(crate) pk: RabinPublicKey,
    p: BigNumber,
    q: BigNumber,
    /// q * (q^-1 mod p), equal to 1 mod p and 0 mod q
    cp: BigNumber,
    /// p * (p^-1 mod q), equal to 0 mod p and 1 mod q
    cq: BigNumber,
}

impl From<&RabinPrivateKey> for RabinPublicKey {
    fn from(sk: &RabinPrivateKey) -> RabinPublicKey {
        sk.pk.clone()
    }
}

fn redundancy(msg: &[u8]) -> [u8; REDUNDANCY_LEN] {
    let mut out = [0u8; REDUNDANCY_LEN];
    out.copy_from_slice(&md_map(msg)[..REDUNDANCY_LEN]);
    out
}

impl RabinPrivateKey {
    /// Create a new random key
    #[instrument(skip_all, fields(bits = bits))]
    pub fn generate(bits: usize) -> CpResult<Self> {
        let size = ModulusSize::new(bits)?;
        let four = BigNumber::from(4u64);
        let three = BigNumber::from(3u64);
        let blum = |p: &BigNumber| p % &four == three;

        loop {
            let mut p = random_prime(size.prime_bits(), blum);
            let mut q = random_prime(size.prime_bits(), blum);
            let res = Self::with_primes_unchecked(&p, &q, size.bits());
            // Make sure the primes are zero'd
            p.zeroize();
            q.zeroize();
            if let Some(sk) = res {
                return Ok(sk);
            }
            debug!("rabin primes rejected, retrying");
        }
    }

    fn with_primes_unchecked(p: &BigNumber, q: &BigNumber, bits: usize) -> Option<Self> {
        if p == q {
            return None;
        }
        let n = p * q;
        if n.bit_length() != bits {
            return None;
        }
        let (mut qi, mut pi) = match (q.invert(p), p.invert(q)) {
            (Some(qi), Some(pi)) => (qi, pi),
            _ => return None,
        };
        let sk = Self {
            cp: (q * &qi) % &n,
            cq: (p * &pi) % &n,
            pk: RabinPublicKey { n },
            p: p.clone(),
            q: q.clone(),
        };
        qi.zeroize();
        pi.zeroize();
        Some(sk)
    }

    /// The public half of this key
    pub fn public_key(&self) -> &RabinPublicKey {
        &self.pk
    }

    /// Reverse ciphertext to plaintext
    pub fn decrypt(&self, ciphertext: &[u8]) -> CpResult<Vec<u8>> {
        let n = &self.pk.n;
        let k = self.pk.modulus_bytes();
        if ciphertext.len() > k + 1 {
            return Err(CpError::InvalidEncoding("ciphertext longer than the modulus"));
        }
        let c = BigNumber::from_slice(ciphertext);
        if !mod_in_zero(&c, n) {
            return Err(CpError::InvalidEncoding("ciphertext not reduced modulo n"));
        }

        let one = BigNumber::one();
        let four = BigNumber::from(4u64);
        // square roots modulo each prime, valid since p = q = 3 mod 4
        let mp = c.modpow(&((&self.p + &one) / &four), &self.p);
        let mq = c.modpow(&((&self.q + &one) / &four), &self.q);

        let a = mp.modmul(&self.cp, n);
        let b = mq.modmul(&self.cq, n);
        let r = a.modadd(&b, n);
        let s = (&(&a + n) - &b) % n;
        let roots = [n - &r, n - &s, r, s];

        let mut best: Option<(BigNumber, Vec<u8>)> = None;
        for root in roots {
            let msg = match self.unpack(&root, k) {
                Some(msg) => msg,
                None => continue,
            };
            let smaller = best.as_ref().map_or(true, |(b, _)| &root < b);
            if smaller {
                best = Some((root, msg));
            }
        }
        match best {
            Some((_, msg)) => Ok(msg),
            None => {
                debug!("no rabin square root carries valid redundancy");
                Err(CpError::InvalidCiphertext)
            }
        }
    }

    fn unpack(&self, root: &BigNumber, k: usize) -> Option<Vec<u8>> {
        let block = to_fixed_bytes(root, k).ok()?;
        let mut body = pkcs1_unpad_encrypt(&block).ok()?;
        if body.len() < REDUNDANCY_LEN {
            return None;
        }
        let tag = body.split_off(body.len() - REDUNDANCY_LEN);
        if ct_eq_bytes(&tag, &redundancy(&body)) {
            Some(body)
        } else {
            None
        }
    }

    /// Get this key's byte representation
    pub fn to_bytes(&self) -> CpResult<Vec<u8>> {
        Ok(postcard::to_stdvec(self)?)
    }

    /// Convert a byte representation to a private key
    pub fn from_bytes<B: AsRef<[u8]>>(data: B) -> CpResult<Self> {
        Ok(postcard::from_bytes(data.as_ref())?)
    }
}

impl RabinPublicKey {
    /// The length of the modulus, and of every ciphertext, in bytes
    pub fn modulus_bytes(&self) -> usize {
        byte_len(&self.n)
    }

    /// The Rabin modulus
    pub fn n(&self) -> &BigNumber {
        &self.n
    }

    /// Encrypt a message of at most `modulus_bytes() - 19` bytes
    pub fn encrypt(&self, plaintext: &[u8]) -> CpResult<Vec<u8>> {
        let k = self.modulus_bytes();
        let mut body = plaintext.to_vec();
        body.extend_from_slice(&redundancy(plaintext));
        let block = pkcs1_pad_encrypt(&body, k)?;
        let m = BigNumber::from_slice(&block);
        to_fixed_bytes(&m.modmul(&m, &self.n), k)
    }
}
