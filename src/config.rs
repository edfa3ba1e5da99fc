/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Validated key generation parameters.
//!
//! The curve suites are bound to a single parameter set each (P-256 and
//! BLS12-381), so only the integer-factorization and homomorphic suites
//! and the BGN decryption bound take runtime configuration.

use crate::{CpError, CpResult};
use serde::{Deserialize, Serialize};

/// The smallest modulus accepted by any factoring based scheme
pub const MIN_MODULUS_BITS: usize = 256;

/// The smallest RSA modulus, enough for a PKCS#1 v1.5 SHA-256 signature block
pub const RSA_MIN_MODULUS_BITS: usize = 496;

/// The RSA public exponent
pub const RSA_PUBLIC_EXPONENT: u64 = 65537;

/// Default upper bound for the BGN discrete logarithm search
pub const DEFAULT_BGN_SEARCH_BOUND: u64 = 1 << 12;

/// Domain separation tag for hashing into G1
pub const G1_DST: &[u8] = b"RELIC-CP-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Domain separation tag for hashing into G2
pub const G2_DST: &[u8] = b"RELIC-CP-V01-CS01-with-BLS12381G2_XMD:SHA-256_SSWU_RO_";

/// The bit length of a composite modulus `n = p * q`
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModulusSize {
    bits: usize,
}

impl ModulusSize {
    /// Validate a requested modulus length.
    ///
    /// The length must be at least [`MIN_MODULUS_BITS`] and split into two
    /// primes of whole bytes.
    pub fn new(bits: usize) -> CpResult<Self> {
        if bits < MIN_MODULUS_BITS {
            return Err(CpError::InvalidParameters("modulus is too small"));
        }
        if bits % 16 != 0 {
            return Err(CpError::InvalidParameters(
                "modulus length must be a multiple of 16 bits",
            ));
        }
        Ok(Self { bits })
    }

    /// The modulus length in bits
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// The length of each prime factor in bits
    pub fn prime_bits(&self) -> usize {
        self.bits / 2
    }

    /// The modulus length in bytes
    pub fn bytes(&self) -> usize {
        self.bits / 8
    }
}

/// Runtime parameters of the BGN scheme
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BgnParameters {
    /// Plaintexts are searched in `[0, search_bound]`
    pub search_bound: u64,
}

impl BgnParameters {
    /// Create parameters with a custom search bound
    pub fn new(search_bound: u64) -> CpResult<Self> {
        if search_bound == 0 {
            return Err(CpError::InvalidParameters("search bound must be positive"));
        }
        Ok(Self { search_bound })
    }
}

impl Default for BgnParameters {
    fn default() -> Self {
        Self {
            search_bound: DEFAULT_BGN_SEARCH_BOUND,
        }
    }
}
