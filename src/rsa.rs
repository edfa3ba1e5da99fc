/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! RSA encryption and signatures with PKCS#1 v1.5 framing.
//!
//! A private key always carries the plain exponent `d` ("basic") and may
//! additionally carry the CRT components ("quick"). Both representations
//! produce identical plaintexts and signatures for the same public key.

use crate::{
    config::{ModulusSize, RSA_MIN_MODULUS_BITS, RSA_PUBLIC_EXPONENT},
    hash::MessageMode,
    utils::*,
    CpError, CpResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use unknown_order::BigNumber;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An RSA public key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Zeroize)]
#[serde(try_from = "RsaPublicKeyParts")]
pub struct RsaPublicKey {
    pub(crate) n: BigNumber,
    pub(crate) e: BigNumber,
}

#[derive(Deserialize)]
struct RsaPublicKeyParts {
    n: BigNumber,
    e: BigNumber,
}

impl TryFrom<RsaPublicKeyParts> for RsaPublicKey {
    type Error = CpError;

    fn try_from(parts: RsaPublicKeyParts) -> CpResult<Self> {
        let RsaPublicKeyParts { n, e } = parts;
        let one = BigNumber::one();
        if n.bit_length() < RSA_MIN_MODULUS_BITS || (&n % &BigNumber::from(2u64)).is_zero() {
            return Err(CpError::InvalidElement("rsa modulus out of range"));
        }
        if e <= one || e >= n {
            return Err(CpError::InvalidElement("rsa public exponent out of range"));
        }
        Ok(Self { n, e })
    }
}

/// Chinese remainder theorem components of an RSA private key
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CrtComponents {
    p: BigNumber,
    q: BigNumber,
    /// d mod (p - 1)
    dp: BigNumber,
    /// d mod (q - 1)
    dq: BigNumber,
    /// q^-1 mod p
    qi: BigNumber,
}

impl CrtComponents {
    fn apply(&self, c: &BigNumber) -> BigNumber {
        let m1 = c.modpow(&self.dp, &self.p);
        let m2 = c.modpow(&self.dq, &self.q);
        // h = qi * (m1 - m2) mod p, lifted by p so the difference stays positive
        let h = (&(&m1 + &self.p) - &(&m2 % &self.p)) % &self.p;
        let h = h.modmul(&self.qi, &self.p);
        &m2 + &(&h * &self.q)
    }
}

/// An RSA private key
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateKey {
    pub(crate) pk: RsaPublicKey,
    d: BigNumber,
    crt: Option<CrtComponents>,
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(sk: &RsaPrivateKey) -> RsaPublicKey {
        sk.pk.clone()
    }
}

impl RsaPrivateKey {
    /// Create a new random key using the CRT representation
    pub fn generate(bits: usize) -> CpResult<Self> {
        Self::generate_quick(bits)
    }

    /// Create a new random key holding only the private exponent
    pub fn generate_basic(bits: usize) -> CpResult<Self> {
        let mut sk = Self::generate_quick(bits)?;
        sk.crt = None;
        Ok(sk)
    }

    /// Create a new random key holding the CRT components
    #[instrument(skip_all, fields(bits = bits))]
    pub fn generate_quick(bits: usize) -> CpResult<Self> {
        let size = ModulusSize::new(bits)?;
        if size.bits() < RSA_MIN_MODULUS_BITS {
            return Err(CpError::InvalidParameters(
                "rsa modulus too small for a signature block",
            ));
        }
        let e = BigNumber::from(RSA_PUBLIC_EXPONENT);
        let one = BigNumber::one();
        let coprime = |p: &BigNumber| (p - &one).gcd(&e) == one;

        loop {
            let mut p = random_prime(size.prime_bits(), coprime);
            let mut q = random_prime(size.prime_bits(), coprime);
            let res = Self::with_primes_unchecked(&p, &q, &e, size.bits());
            // Make sure the primes are zero'd
            p.zeroize();
            q.zeroize();
            if let Some(sk) = res {
                return Ok(sk);
            }
            debug!("rsa primes rejected, retrying");
        }
    }

    fn with_primes_unchecked(
        p: &BigNumber,
        q: &BigNumber,
        e: &BigNumber,
        bits: usize,
    ) -> Option<Self> {
        if p == q {
            return None;
        }
        let n = p * q;
        if n.bit_length() != bits {
            return None;
        }
        let one = BigNumber::one();
        let mut pm1 = p - &one;
        let mut qm1 = q - &one;
        let mut phi = &pm1 * &qm1;
        let d = e.invert(&phi);
        let qi = q.invert(p);
        let res = match (d, qi) {
            (Some(d), Some(qi)) => {
                let crt = CrtComponents {
                    dp: &d % &pm1,
                    dq: &d % &qm1,
                    p: p.clone(),
                    q: q.clone(),
                    qi,
                };
                Some(Self {
                    pk: RsaPublicKey { n, e: e.clone() },
                    d,
                    crt: Some(crt),
                })
            }
            (d, _) => {
                if let Some(mut d) = d {
                    d.zeroize();
                }
                None
            }
        };
        pm1.zeroize();
        qm1.zeroize();
        phi.zeroize();
        res
    }

    /// The same key with the CRT components removed
    pub fn to_basic(&self) -> Self {
        Self {
            pk: self.pk.clone(),
            d: self.d.clone(),
            crt: None,
        }
    }

    /// Whether this key decrypts with the CRT components
    pub fn is_quick(&self) -> bool {
        self.crt.is_some()
    }

    /// The public half of this key
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.pk
    }

    fn private_op(&self, c: &BigNumber) -> BigNumber {
        match &self.crt {
            Some(crt) => crt.apply(c),
            None => c.modpow(&self.d, &self.pk.n),
        }
    }

    /// Reverse ciphertext to plaintext
    pub fn decrypt(&self, ciphertext: &[u8]) -> CpResult<Vec<u8>> {
        let c = self.pk.read_integer(ciphertext)?;
        let m = self.private_op(&c);
        let block = to_fixed_bytes(&m, self.pk.modulus_bytes())?;
        pkcs1_unpad_encrypt(&block)
    }

    /// Sign a message or a SHA-256 digest of one
    pub fn sign(&self, input: &[u8], mode: MessageMode) -> CpResult<Vec<u8>> {
        let k = self.pk.modulus_bytes();
        let digest = mode.digest(input)?;
        let block = pkcs1_pad_sign(&digest, k)?;
        let s = self.private_op(&BigNumber::from_slice(&block));
        to_fixed_bytes(&s, k)
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

impl RsaPublicKey {
    /// The length of the modulus, and of every ciphertext and signature, in bytes
    pub fn modulus_bytes(&self) -> usize {
        byte_len(&self.n)
    }

    /// The RSA modulus
    pub fn n(&self) -> &BigNumber {
        &self.n
    }

    /// The public exponent
    pub fn e(&self) -> &BigNumber {
        &self.e
    }

    fn read_integer(&self, data: &[u8]) -> CpResult<BigNumber> {
        if data.len() > self.modulus_bytes() + 1 {
            return Err(CpError::InvalidEncoding("input longer than the modulus"));
        }
        let x = BigNumber::from_slice(data);
        if !mod_in_zero(&x, &self.n) {
            return Err(CpError::InvalidEncoding("input not reduced modulo n"));
        }
        Ok(x)
    }

    /// Encrypt a message of at most `modulus_bytes() - 11` bytes
    pub fn encrypt(&self, plaintext: &[u8]) -> CpResult<Vec<u8>> {
        let k = self.modulus_bytes();
        let block = pkcs1_pad_encrypt(plaintext, k)?;
        let c = BigNumber::from_slice(&block).modpow(&self.e, &self.n);
        to_fixed_bytes(&c, k)
    }

    /// Check a signature over a message or a SHA-256 digest of one
    pub fn verify(&self, signature: &[u8], input: &[u8], mode: MessageMode) -> bool {
        let k = self.modulus_bytes();
        let expected = match mode
            .digest(input)
            .and_then(|digest| pkcs1_pad_sign(&digest, k))
        {
            Ok(block) => block,
            Err(_) => return false,
        };
        let s = match self.read_integer(signature) {
            Ok(s) => s,
            Err(_) => {
                debug!("rsa signature out of range");
                return false;
            }
        };
        match to_fixed_bytes(&s.modpow(&self.e, &self.n), k) {
            Ok(block) => ct_eq_bytes(&block, &expected),
            Err(_) => false,
        }
    }

    /// Get this key's byte representation
    pub fn to_bytes(&self) -> CpResult<Vec<u8>> {
        Ok(postcard::to_stdvec(self)?)
    }

    /// Convert a byte representation to a public key
    pub fn from_bytes<B: AsRef<[u8]>>(data: B) -> CpResult<Self> {
        Ok(postcard::from_bytes(data.as_ref())?)
    }
}
