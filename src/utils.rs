/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Integer range checks, fixed width encodings and PKCS#1 v1.5 framing.

use crate::{CpError, CpResult};
use rand::{rngs::OsRng, Rng, RngCore};
use subtle::ConstantTimeEq;
use unknown_order::BigNumber;
use zeroize::Zeroize;

/// Bytes of fixed overhead in a PKCS#1 v1.5 block: `00 || BT || PS(>= 8) || 00`
pub const PKCS1_OVERHEAD: usize = 11;

/// DER prefix of a SHA-256 DigestInfo
const SHA256_DIGEST_INFO: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// Check `1 <= a < n`
pub fn mod_in(a: &BigNumber, n: &BigNumber) -> bool {
    let lhs = &BigNumber::one() <= a;
    let rhs = a < n;
    lhs & rhs
}

/// Check `0 <= a < n`
pub fn mod_in_zero(a: &BigNumber, n: &BigNumber) -> bool {
    let lhs = &BigNumber::zero() <= a;
    let rhs = a < n;
    lhs & rhs
}

/// The number of bytes needed to hold `n`
pub fn byte_len(n: &BigNumber) -> usize {
    (n.bit_length() + 7) / 8
}

/// Big-endian encoding of `a` left padded to exactly `len` bytes
pub fn to_fixed_bytes(a: &BigNumber, len: usize) -> CpResult<Vec<u8>> {
    let raw = a.to_bytes();
    let first = raw.iter().position(|b| *b != 0).unwrap_or(raw.len());
    let raw = &raw[first..];
    if raw.len() > len {
        return Err(CpError::InvalidEncoding("integer does not fit the output"));
    }
    let mut out = vec![0u8; len - raw.len()];
    out.extend_from_slice(raw);
    Ok(out)
}

/// A uniformly random integer of exactly `bits` bits
pub fn random_bits(bits: usize) -> BigNumber {
    debug_assert!(bits > 0);
    let mut bytes = vec![0u8; (bits + 7) / 8];
    OsRng.fill_bytes(&mut bytes);
    let excess = bytes.len() * 8 - bits;
    bytes[0] &= 0xff >> excess;
    bytes[0] |= 0x80 >> excess;
    BigNumber::from_slice(&bytes)
}

/// A random prime of exactly `bits` bits satisfying `accept`
pub fn random_prime<F>(bits: usize, accept: F) -> BigNumber
where
    F: Fn(&BigNumber) -> bool,
{
    loop {
        let mut p = BigNumber::prime(bits);
        if p.bit_length() == bits && accept(&p) {
            return p;
        }
        p.zeroize();
    }
}

/// Frame `msg` as a PKCS#1 v1.5 encryption block (type 2) of `k` bytes
pub fn pkcs1_pad_encrypt(msg: &[u8], k: usize) -> CpResult<Vec<u8>> {
    if msg.len() + PKCS1_OVERHEAD > k {
        return Err(CpError::InvalidEncoding("message too long for the modulus"));
    }
    let ps_len = k - msg.len() - 3;
    let mut block = Vec::with_capacity(k);
    block.push(0x00);
    block.push(0x02);
    let mut rng = OsRng;
    for _ in 0..ps_len {
        block.push(rng.gen_range(1..=255u8));
    }
    block.push(0x00);
    block.extend_from_slice(msg);
    Ok(block)
}

/// Remove a PKCS#1 v1.5 type 2 framing
pub fn pkcs1_unpad_encrypt(block: &[u8]) -> CpResult<Vec<u8>> {
    if block.len() < PKCS1_OVERHEAD || block[0] != 0x00 || block[1] != 0x02 {
        return Err(CpError::InvalidCiphertext);
    }
    let sep = block[2..]
        .iter()
        .position(|b| *b == 0)
        .map(|i| i + 2)
        .ok_or(CpError::InvalidCiphertext)?;
    if sep < 10 {
        return Err(CpError::InvalidCiphertext);
    }
    Ok(block[sep + 1..].to_vec())
}

/// Frame a SHA-256 digest as a PKCS#1 v1.5 signature block (type 1) of `k` bytes
pub fn pkcs1_pad_sign(digest: &[u8], k: usize) -> CpResult<Vec<u8>> {
    let t_len = SHA256_DIGEST_INFO.len() + digest.len();
    if t_len + PKCS1_OVERHEAD > k {
        return Err(CpError::InvalidEncoding("modulus too small for the digest"));
    }
    let mut block = Vec::with_capacity(k);
    block.push(0x00);
    block.push(0x01);
    block.resize(k - t_len - 1, 0xff);
    block.push(0x00);
    block.extend_from_slice(&SHA256_DIGEST_INFO);
    block.extend_from_slice(digest);
    Ok(block)
}

/// Constant time equality of two byte strings
pub fn ct_eq_bytes(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
