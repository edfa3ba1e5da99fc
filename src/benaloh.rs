/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Benaloh's dense probabilistic encryption.
//!
//! Plaintexts live in `Z_r` for a small prime block size `r`. Ciphertexts
//! multiply to a ciphertext of the sum of the plaintexts modulo `r`.

use crate::{
    config::{ModulusSize, MIN_MODULUS_BITS},
    utils::*,
    CpError, CpResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use unknown_order::BigNumber;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The largest supported block size. Decryption searches the block exhaustively.
pub const MAX_BLOCK: u64 = 1 << 20;

/// A Benaloh ciphertext
pub type BenalohCiphertext = BigNumber;

/// A Benaloh encryption key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Zeroize)]
#[serde(try_from = "BenalohEncryptionKeyParts")]
pub struct BenalohEncryptionKey {
    pub(crate) n: BigNumber,
    pub(crate) y: BigNumber,
    pub(crate) r: u64,
}

#[derive(Deserialize)]
struct BenalohEncryptionKeyParts {
    n: BigNumber,
    y: BigNumber,
    r: u64,
}

impl TryFrom<BenalohEncryptionKeyParts> for BenalohEncryptionKey {
    type Error = CpError;

    fn try_from(parts: BenalohEncryptionKeyParts) -> CpResult<Self> {
        let BenalohEncryptionKeyParts { n, y, r } = parts;
        if n.bit_length() < MIN_MODULUS_BITS || (&n % &BigNumber::from(2u64)).is_zero() {
            return Err(CpError::InvalidElement("benaloh modulus out of range"));
        }
        if !(3..=MAX_BLOCK).contains(&r) {
            return Err(CpError::InvalidElement("benaloh block size out of range"));
        }
        if !mod_in(&y, &n) || y.gcd(&n) != BigNumber::one() {
            return Err(CpError::InvalidElement("benaloh y not a unit of Z_n"));
        }
        Ok(Self { n, y, r })
    }
}

/// A Benaloh decryption key
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct BenalohDecryptionKey {
    pub(crate) pk: BenalohEncryptionKey,
    /// phi(n) / r
    exponent: BigNumber,
    /// y^(phi / r) mod n, a generator of the order r subgroup
    base: BigNumber,
}

impl From<&BenalohDecryptionKey> for BenalohEncryptionKey {
    fn from(sk: &BenalohDecryptionKey) -> BenalohEncryptionKey {
        sk.pk.clone()
    }
}

impl BenalohDecryptionKey {
    /// Create a new random key with block size `block`
    #[instrument(skip_all, fields(block = block, bits = bits))]
    pub fn generate(block: u64, bits: usize) -> CpResult<Self> {
        let size = ModulusSize::new(bits)?;
        if !(3..=MAX_BLOCK).contains(&block) {
            return Err(CpError::InvalidParameters("block size out of range"));
        }
        let r = BigNumber::from(block);
        if !r.is_prime() {
            return Err(CpError::InvalidParameters("block size must be prime"));
        }
        let r_bits = r.bit_length();
        if r_bits + 2 >= size.prime_bits() {
            return Err(CpError::InvalidParameters("block size too large for modulus"));
        }
        let one = BigNumber::one();

        loop {
            // q = t * r + 1 prime with gcd(t, r) = 1, so r | q - 1 but r^2 does not
            let q = loop {
                let t = random_bits(size.prime_bits() - r_bits);
                if (&t % &r).is_zero() {
                    continue;
                }
                let q = &(&t * &r) + &one;
                if q.is_prime() {
                    break q;
                }
            };
            // p prime with gcd(p - 1, r) = 1
            let p = random_prime(size.prime_bits(), |p| (p - &one).gcd(&r) == one);
            if p == q {
                continue;
            }
            let n = &p * &q;
            let phi = &(&p - &one) * &(&q - &one);
            let exponent = &phi / &r;

            // y whose (phi / r)-th power is not 1
            let (y, base) = loop {
                let y = BigNumber::random(&n);
                if !mod_in(&y, &n) || y.gcd(&n) != one {
                    continue;
                }
                let base = y.modpow(&exponent, &n);
                if base != one {
                    break (y, base);
                }
            };
            return Ok(Self {
                pk: BenalohEncryptionKey { n, y, r: block },
                exponent,
                base,
            });
        }
    }

    /// Reverse ciphertext to plaintext
    pub fn decrypt(&self, c: &BenalohCiphertext) -> CpResult<u64> {
        if !mod_in(c, &self.pk.n) {
            return Err(CpError::InvalidEncoding("ciphertext not in Z_n"));
        }
        let n = &self.pk.n;
        let target = c.modpow(&self.exponent, n);
        let mut acc = BigNumber::one();
        for m in 0..self.pk.r {
            if acc == target {
                return Ok(m);
            }
            acc = acc.modmul(&self.base, n);
        }
        debug!("benaloh discrete logarithm not found");
        Err(CpError::InvalidCiphertext)
    }

    /// Decrypt a fixed width ciphertext encoding
    pub fn decrypt_bytes(&self, data: &[u8]) -> CpResult<u64> {
        let c = self.pk.read_ciphertext(data)?;
        self.decrypt(&c)
    }
}

impl BenalohEncryptionKey {
    /// Encrypt `m < r`
    pub fn encrypt(&self, m: u64) -> CpResult<BenalohCiphertext> {
        if m >= self.r {
            return Err(CpError::InvalidEncoding("plaintext exceeds the block size"));
        }
        let u = loop {
            let u = BigNumber::random(&self.n);
            if mod_in(&u, &self.n) && u.gcd(&self.n) == BigNumber::one() {
                break u;
            }
        };
        let ym = self.y.modpow(&BigNumber::from(m), &self.n);
        let ur = u.modpow(&BigNumber::from(self.r), &self.n);
        Ok(ym.modmul(&ur, &self.n))
    }

    /// Combines two Benaloh ciphertexts so the plaintexts add modulo `r`
    pub fn add(&self, c1: &BenalohCiphertext, c2: &BenalohCiphertext) -> CpResult<BenalohCiphertext> {
        let c1_check = mod_in(c1, &self.n);
        let c2_check = mod_in(c2, &self.n);
        if !c1_check | !c2_check {
            return Err(CpError::InvalidEncoding("ciphertext not in Z_n"));
        }
        Ok(c1.modmul(c2, &self.n))
    }

    /// Fixed width encoding of a ciphertext
    pub fn ciphertext_to_bytes(&self, c: &BenalohCiphertext) -> CpResult<Vec<u8>> {
        to_fixed_bytes(c, byte_len(&self.n))
    }

    /// Parse a fixed width ciphertext encoding
    pub fn read_ciphertext(&self, data: &[u8]) -> CpResult<BenalohCiphertext> {
        if data.len() != byte_len(&self.n) {
            return Err(CpError::InvalidEncoding("ciphertext has the wrong length"));
        }
        let c = BigNumber::from_slice(data);
        if !mod_in(&c, &self.n) {
            return Err(CpError::InvalidEncoding("ciphertext not in Z_n"));
        }
        Ok(c)
    }

    /// The modulus
    pub fn n(&self) -> &BigNumber {
        &self.n
    }

    /// The block size `r`
    pub fn block(&self) -> u64 {
        self.r
    }
}
