/*
    Copyright Michael Lodder. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use thiserror::Error;

/// Errors produced by the protocol suites
#[derive(Debug, Error)]
pub enum CpError {
    /// Postcard deserialization error
    #[error("Invalid serialized bytes: {0}")]
    PostcardError(#[from] postcard::Error),
    /// The key generation parameters cannot satisfy the scheme
    #[error("Invalid parameters: {0}")]
    InvalidParameters(&'static str),
    /// The input or output does not fit the scheme's encoding
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(&'static str),
    /// A received group element or integer failed its validity check
    #[error("Invalid element: {0}")]
    InvalidElement(&'static str),
    /// The ciphertext did not decrypt to a well-formed plaintext
    #[error("Invalid ciphertext, unable to decrypt")]
    InvalidCiphertext,
    /// The authentication tag of a ciphertext did not match
    #[error("Ciphertext authentication failed")]
    Unauthenticated,
}

/// Protocol results
pub type CpResult<T> = Result<T, CpError>;
