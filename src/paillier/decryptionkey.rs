use super::{Ciphertext, EncryptionKey};
use crate::{config::ModulusSize, utils::mod_in, CpError, CpResult};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use unknown_order::BigNumber;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A Paillier decryption key
#[derive(Clone, Debug, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct DecryptionKey {
    pub(crate) pk: EncryptionKey,
    /// lcm(P - 1, Q - 1)
    pub(crate) lambda: BigNumber,
    /// Euler's totient: (P - 1)(Q - 1)
    pub(crate) totient: BigNumber,
    /// L((N + 1)^lambda mod N^2)-1 mod N
    pub(crate) u: BigNumber,
}

impl DecryptionKey {
    /// Create a new random key with a modulus of `bits` bits
    #[instrument(skip_all, fields(bits = bits))]
    pub fn generate(bits: usize) -> CpResult<Self> {
        let size = ModulusSize::new(bits)?;
        loop {
            let mut p = BigNumber::prime(size.prime_bits());
            let mut q = BigNumber::prime(size.prime_bits());
            let res = Self::with_primes_unchecked(&p, &q);
            // Make sure the primes are zero'd
            p.zeroize();
            q.zeroize();
            if let Some(sk) = res {
                return Ok(sk);
            }
        }
    }

    /// Create a new key from two primes.
    /// `p` and `q` are checked if prime
    pub fn with_primes(p: &BigNumber, q: &BigNumber) -> CpResult<Self> {
        if !p.is_prime() || !q.is_prime() {
            return Err(CpError::InvalidParameters("paillier factors must be prime"));
        }
        Self::with_primes_unchecked(p, q).ok_or(CpError::InvalidParameters(
            "paillier factors do not yield an invertible key",
        ))
    }

    /// Create a new key from two primes,
    /// `p` and `q` are not checked to see if they are prime
    #[allow(clippy::many_single_char_names)]
    pub fn with_primes_unchecked(p: &BigNumber, q: &BigNumber) -> Option<Self> {
        // Paillier doesn't work if p == q
        if p == q {
            return None;
        }
        let one = BigNumber::one();
        let pm1: BigNumber = p - &one;
        let qm1: BigNumber = q - &one;
        let n = p * q;
        let nn = &n * &n;
        let pk = EncryptionKey {
            n: n.clone(),
            nn: nn.clone(),
        };
        let lambda = pm1.lcm(&qm1);
        if lambda.is_zero() {
            return None;
        }
        let totient = &pm1 * &qm1;
        // g = N + 1 is only a valid generator when gcd(N, totient) = 1
        if n.gcd(&totient) != one {
            return None;
        }

        // (N+1)^lambda mod N^2
        let t: BigNumber = &n + &one;
        let tt = t.modpow(&lambda, &nn);

        // L((N+1)^lambda mod N^2)^-1 mod N
        let u = pk.l(&tt)?.invert(&n)?;
        Some(DecryptionKey {
            pk,
            lambda,
            totient,
            u,
        })
    }

    /// Reverse ciphertext to plaintext
    pub fn decrypt(&self, c: &Ciphertext) -> CpResult<BigNumber> {
        if !mod_in(c, &self.pk.nn) {
            return Err(CpError::InvalidEncoding("ciphertext not in [1, N^2)"));
        }

        // a = c^\lambda mod n^2
        let a = c.modpow(&self.lambda, &self.pk.nn);
        // ell = L(a, N)
        self.pk
            .l(&a)
            .map(|l| {
                // m = lu = L(a)*u = L(c^\lamba*)u mod n
                l.modmul(&self.u, &self.pk.n)
            })
            .ok_or(CpError::InvalidCiphertext)
    }

    /// Get this key's byte representation.
    pub fn to_bytes(&self) -> CpResult<Vec<u8>> {
        let bytes = DecryptionKeyBytes {
            n: self.pk.n.to_bytes(),
            lambda: self.lambda.to_bytes(),
            totient: self.totient.to_bytes(),
            u: self.u.to_bytes(),
        };
        Ok(postcard::to_stdvec(&bytes)?)
    }

    /// Convert a byte representation to a decryption key
    pub fn from_bytes<B: AsRef<[u8]>>(data: B) -> CpResult<Self> {
        let data = data.as_ref();
        let bytes = postcard::from_bytes::<DecryptionKeyBytes>(data)?;
        let pk = EncryptionKey::from_bytes(bytes.n.as_slice())?;
        Ok(Self {
            pk,
            lambda: BigNumber::from_slice(bytes.lambda.as_slice()),
            totient: BigNumber::from_slice(bytes.totient.as_slice()),
            u: BigNumber::from_slice(bytes.u.as_slice()),
        })
    }

    /// The Paillier modulus
    pub fn n(&self) -> &BigNumber {
        self.pk.n()
    }

    /// The Paillier `lambda`
    pub fn lambda(&self) -> &BigNumber {
        &self.lambda
    }

    /// The Paillier `totient`
    pub fn totient(&self) -> &BigNumber {
        &self.totient
    }

    /// The Paillier `u`
    pub fn u(&self) -> &BigNumber {
        &self.u
    }
}

#[derive(Serialize, Deserialize)]
struct DecryptionKeyBytes {
    n: Vec<u8>,
    lambda: Vec<u8>,
    totient: Vec<u8>,
    u: Vec<u8>,
}
