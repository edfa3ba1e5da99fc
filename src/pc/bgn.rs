/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Boneh-Goh-Nissim style somewhat homomorphic encryption over an
//! asymmetric pairing.
//!
//! A small non-negative integer is encrypted in G1 or G2 as
//! `((y m + r) g, (z m + x r) g)`. Ciphertexts in the same group add, one
//! ciphertext from each group multiplies into four GT elements, and those
//! add again. Decryption removes the blinding with `x` and finds the
//! plaintext by searching the small message space.

use super::{gt_generator, pair, random_scalar, G1Projective, G2Projective, Gt, Scalar};
use crate::{config::BgnParameters, CpError, CpResult};
use core::ops::Add;
use ff::Field;
use group::Group;
use tracing::{debug, instrument};

/// The BGN secret key
#[derive(Clone)]
pub struct BgnSecretKey {
    x: Scalar,
    y: Scalar,
    z: Scalar,
}
wipe_on_drop!(BgnSecretKey, |k| [&mut k.x, &mut k.y, &mut k.z]);

impl core::fmt::Debug for BgnSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BgnSecretKey")
    }
}

/// The BGN public key: `x g, y g, z g` in both source groups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BgnPublicKey {
    gx: G1Projective,
    gy: G1Projective,
    gz: G1Projective,
    hx: G2Projective,
    hy: G2Projective,
    hz: G2Projective,
}

/// A ciphertext in G1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BgnCiphertext1(pub [G1Projective; 2]);

/// A ciphertext in G2
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BgnCiphertext2(pub [G2Projective; 2]);

/// A ciphertext in GT holding a product of plaintexts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BgnCiphertextT(pub [Gt; 4]);

impl Add for BgnCiphertext1 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1]])
    }
}

impl Add for BgnCiphertext2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1]])
    }
}

impl Add for BgnCiphertextT {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
            self.0[3] + rhs.0[3],
        ])
    }
}

/// Create a new key pair
#[instrument(skip_all)]
pub fn generate() -> (BgnSecretKey, BgnPublicKey) {
    loop {
        let x = random_scalar();
        let y = random_scalar();
        let z = random_scalar();
        // the decryption base (xy - z) g must not vanish
        if bool::from((x * y - z).is_zero()) {
            continue;
        }
        let g = G1Projective::generator();
        let h = G2Projective::generator();
        let pk = BgnPublicKey {
            gx: g * x,
            gy: g * y,
            gz: g * z,
            hx: h * x,
            hy: h * y,
            hz: h * z,
        };
        return (BgnSecretKey { x, y, z }, pk);
    }
}

fn encode<G: Group<Scalar = Scalar>>(m: u64, gx: &G, gy: &G, gz: &G) -> [G; 2] {
    let m = Scalar::from(m);
    let r = random_scalar();
    [*gy * m + G::generator() * r, *gz * m + *gx * r]
}

/// Encrypt `m` in G1
pub fn enc1(m: u64, pk: &BgnPublicKey) -> BgnCiphertext1 {
    BgnCiphertext1(encode(m, &pk.gx, &pk.gy, &pk.gz))
}

/// Encrypt `m` in G2
pub fn enc2(m: u64, pk: &BgnPublicKey) -> BgnCiphertext2 {
    BgnCiphertext2(encode(m, &pk.hx, &pk.hy, &pk.hz))
}

/// Find `m` in `[0, bound]` with `m base == target`
fn search<G: Group>(target: &G, base: &G, bound: u64) -> CpResult<u64> {
    let mut acc = G::identity();
    for m in 0..=bound {
        if acc == *target {
            return Ok(m);
        }
        acc += base;
    }
    debug!("bgn plaintext not found below the search bound");
    Err(CpError::InvalidCiphertext)
}

fn decode<G: Group<Scalar = Scalar>>(c: &[G; 2], sk: &BgnSecretKey, params: &BgnParameters) -> CpResult<u64> {
    let target = c[0] * sk.x - c[1];
    let base = G::generator() * (sk.x * sk.y - sk.z);
    search(&target, &base, params.search_bound)
}

/// Decrypt a G1 ciphertext
pub fn dec1(c: &BgnCiphertext1, sk: &BgnSecretKey, params: &BgnParameters) -> CpResult<u64> {
    decode(&c.0, sk, params)
}

/// Decrypt a G2 ciphertext
pub fn dec2(c: &BgnCiphertext2, sk: &BgnSecretKey, params: &BgnParameters) -> CpResult<u64> {
    decode(&c.0, sk, params)
}

/// Multiply the plaintexts of a G1 and a G2 ciphertext into a GT ciphertext
pub fn mul(c: &BgnCiphertext1, d: &BgnCiphertext2) -> BgnCiphertextT {
    BgnCiphertextT([
        pair(&c.0[0], &d.0[0]),
        pair(&c.0[0], &d.0[1]),
        pair(&c.0[1], &d.0[0]),
        pair(&c.0[1], &d.0[1]),
    ])
}

/// Add the plaintexts of two GT ciphertexts
pub fn add(c: &BgnCiphertextT, d: &BgnCiphertextT) -> BgnCiphertextT {
    *c + *d
}

/// Decrypt a GT ciphertext
pub fn dec(c: &BgnCiphertextT, sk: &BgnSecretKey, params: &BgnParameters) -> CpResult<u64> {
    let x = sk.x;
    let xx = x.square();
    let target = c.0[0] * xx - c.0[1] * x - c.0[2] * x + c.0[3];
    let t = x * sk.y - sk.z;
    let base = gt_generator() * t.square();
    search(&target, &base, params.search_bound)
}
