/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Public-key cryptographic protocols built on three arithmetic backends.
//!
//! * Integer factorization: RSA with basic or CRT private keys, and Rabin.
//! * Additively homomorphic encryption: Benaloh and Paillier.
//! * NIST P-256: ECDH, ECMQV, ECIES, ECDSA, Schnorr (ECSS) and VBNN
//!   identity-based signatures.
//! * BLS12-381 pairings: SOK key agreement, Boneh-Franklin IBE, BGN,
//!   BLS, Boneh-Boyen and ZSS short signatures, and the
//!   Camenisch-Lysyanskaya and Pointcheval-Sanders signature families.
//!
//! Every `verify` returns a `bool`; malformed and forged inputs are reported
//! the same way as any other verification failure. Every other operation
//! returns a [`CpResult`].
#![deny(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    trivial_casts,
    trivial_numeric_casts
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;

pub mod benaloh;
pub mod config;
pub mod ec;
pub mod hash;
pub mod paillier;
pub mod pc;
pub mod rabin;
pub mod rsa;
pub mod utils;

pub use error::*;
pub use unknown_order;
