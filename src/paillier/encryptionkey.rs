use super::{Ciphertext, DecryptionKey, Nonce};
use crate::{
    config::MIN_MODULUS_BITS,
    utils::{byte_len, mod_in, mod_in_zero, to_fixed_bytes},
    CpError, CpResult,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unknown_order::BigNumber;
use zeroize::Zeroize;

/// A Paillier encryption key
#[derive(Clone, Debug, PartialEq, Zeroize)]
pub struct EncryptionKey {
    pub(crate) n: BigNumber,  // N = p * q, where p,q are primes
    pub(crate) nn: BigNumber, // N^2
}

impl Serialize for EncryptionKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.n.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EncryptionKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = BigNumber::deserialize(deserializer)?;
        Self::from_modulus(n).map_err(serde::de::Error::custom)
    }
}

impl From<&DecryptionKey> for EncryptionKey {
    fn from(sk: &DecryptionKey) -> EncryptionKey {
        sk.pk.clone()
    }
}

impl EncryptionKey {
    /// l computes a residuosity class of N^2: (x - 1) / n
    /// where it is the quotient x - 1 divided by N not modular multiplication of x - 1 times
    /// the modular multiplication inverse of N. The function comes from Paillier's 99 paper.
    pub(crate) fn l(&self, x: &BigNumber) -> Option<BigNumber> {
        let one = BigNumber::one();
        // Ensure x = 1 mod N
        if x % &self.n != one {
            return None;
        }

        // Ensure x \in [1..N^2]
        if !mod_in(x, &self.nn) {
            return None;
        }

        //(x - 1) / N
        Some((x - &one) / &self.n)
    }

    /// Encrypt a plaintext `m` in `[0, N)` with a fresh random nonce
    pub fn encrypt(&self, m: &BigNumber) -> CpResult<(Ciphertext, Nonce)> {
        self.encrypt_with_nonce(m, None)
    }

    /// Encrypt a given message with the encryption key and optionally use a random value
    /// m must be less than N
    #[allow(clippy::many_single_char_names)]
    pub fn encrypt_with_nonce(
        &self,
        m: &BigNumber,
        r: Option<Nonce>,
    ) -> CpResult<(Ciphertext, Nonce)> {
        if !mod_in_zero(m, &self.n) {
            return Err(CpError::InvalidEncoding("plaintext not in [0, N)"));
        }

        let r = match r {
            Some(r) => {
                if !mod_in(&r, &self.n) || r.gcd(&self.n) != BigNumber::one() {
                    return Err(CpError::InvalidEncoding("nonce not a unit of Z_N"));
                }
                r
            }
            None => loop {
                let r = Nonce::random(&self.n);
                if mod_in(&r, &self.n) {
                    break r;
                }
            },
        };

        Ok((self.encrypt_unchecked(m, &r), r))
    }

    /// Encrypt the big-endian integer in `x`, which must be less than N
    pub fn encrypt_bytes<M>(&self, x: M) -> CpResult<(Ciphertext, Nonce)>
    where
        M: AsRef<[u8]>,
    {
        let x = x.as_ref();
        if x.len() > byte_len(&self.n) {
            return Err(CpError::InvalidEncoding("plaintext longer than N"));
        }
        self.encrypt(&BigNumber::from_slice(x))
    }

    /// Encrypt a given message with the encryption key and a provided random value
    /// m can be greater than N
    pub fn encrypt_unchecked(&self, m: &BigNumber, r: &Nonce) -> Ciphertext {
        debug_assert!(mod_in(r, &self.n));

        // g^m mod N^2 = (N + 1)^m mod N^2 = m N + 1 mod N^2
        // See Prop 11.26, Pg. 385 of Intro to Modern Cryptography
        let g_m = m
            .modmul(&self.n, &self.nn)
            .modadd(&BigNumber::one(), &self.nn);

        // r^N mod N^2
        let r_n = &r.modpow(&self.n, &self.nn);

        // c = g^m r^n mod N^2
        g_m.modmul(r_n, &self.nn)
    }

    /// Combines two Paillier ciphertexts
    /// commonly denoted in text as c1 \bigoplus c2
    pub fn add(&self, c1: &Ciphertext, c2: &Ciphertext) -> CpResult<Ciphertext> {
        // constant time check
        let c1_check = mod_in(c1, &self.nn);
        let c2_check = mod_in(c2, &self.nn);
        if !c1_check | !c2_check {
            return Err(CpError::InvalidEncoding("ciphertext not in [1, N^2)"));
        }

        Ok(c1.modmul(c2, &self.nn))
    }

    /// Equivalent to multiplying the plaintext by `a`
    pub fn mul(&self, c: &Ciphertext, a: &BigNumber) -> CpResult<Ciphertext> {
        // constant time check
        let c1_check = mod_in(c, &self.nn);
        let c2_check = mod_in(a, &self.n);
        if !c1_check | !c2_check {
            return Err(CpError::InvalidEncoding("scalar multiplication inputs out of range"));
        }

        Ok(c.modpow(a, &self.nn))
    }

    /// Fixed width encoding of a ciphertext, the byte length of N^2
    pub fn ciphertext_to_bytes(&self, c: &Ciphertext) -> CpResult<Vec<u8>> {
        to_fixed_bytes(c, byte_len(&self.nn))
    }

    /// Parse a ciphertext encoding, rejecting values outside `[1, N^2)`
    pub fn read_ciphertext(&self, data: &[u8]) -> CpResult<Ciphertext> {
        if data.len() > byte_len(&self.nn) {
            return Err(CpError::InvalidEncoding("ciphertext longer than N^2"));
        }
        let c = BigNumber::from_slice(data);
        if !mod_in(&c, &self.nn) {
            return Err(CpError::InvalidEncoding("ciphertext not in [1, N^2)"));
        }
        Ok(c)
    }

    /// Get this key's byte representation
    pub fn to_bytes(&self) -> Vec<u8> {
        self.n.to_bytes()
    }

    /// Convert a  byte representation to a encryption key
    pub fn from_bytes<B: AsRef<[u8]>>(data: B) -> CpResult<Self> {
        Self::from_modulus(BigNumber::from_slice(data.as_ref()))
    }

    /// Validate a received modulus: large enough and odd
    fn from_modulus(n: BigNumber) -> CpResult<Self> {
        if n.bit_length() < MIN_MODULUS_BITS || (&n % &BigNumber::from(2u64)).is_zero() {
            return Err(CpError::InvalidElement("paillier modulus out of range"));
        }
        let nn = &n * &n;
        Ok(Self { n, nn })
    }

    /// The Paillier modulus
    pub fn n(&self) -> &BigNumber {
        &self.n
    }

    /// The Paillier modulus squared
    pub fn nn(&self) -> &BigNumber {
        &self.nn
    }
}
