// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

#![no_std]
#![deny(missing_docs)]

//! # qdsa-kummer
//!
//! **A Rust implementation of qDSA signatures and Diffie-Hellman key
//! exchange on the Kummer surface of the Gaudry-Schost genus-2
//! curve.**
//!
//! qDSA trades the group law of a Jacobian for the much cheaper
//! x-only arithmetic of its Kummer surface: key generation, signing
//! and exchange need nothing but a differential ladder, and
//! verification replaces point addition with a check of biquadratic
//! relations.  Everything rides on a compact stack: a 128-bit
//! Mersenne field, a 250-bit scalar ring, and a reduced-round
//! Keccak-f\[800\] sponge for hashing.
//!
//! Messages are exactly 32 bytes (a digest, in the intended firmware
//! deployment); public keys are 32 bytes, signatures 64.
//!
//! ```
//! use qdsa_kummer::SigningKey;
//!
//! let seed = [7u8; 32];
//! let message = [42u8; 32];
//!
//! let signing_key = SigningKey::from_seed(&seed);
//! let signature = signing_key.sign(&message);
//! assert!(signing_key
//!     .verifying_key()
//!     .verify(&message, &signature)
//!     .is_ok());
//! ```
//!
//! ## A note on timing
//!
//! The signing, key-generation and Diffie-Hellman paths use a
//! constant-time ladder.  Verification deliberately does not: its
//! inputs are public, and the verifier is sized for bootloaders where
//! the branch-on-bit swap is measurably cheaper.

#[cfg(any(test, feature = "std"))]
extern crate std;

mod check;
mod constants;
mod dh;
mod errors;
mod field;
mod kummer;
mod scalar;
mod signature;
mod signing;
mod sponge;
mod verifying;

pub use crate::dh::{DhPublicKey, DhSecret, SharedSecret};
pub use crate::errors::SignatureError;
pub use crate::signature::Signature;
pub use crate::signing::SigningKey;
pub use crate::verifying::VerifyingKey;

/// The length of a seed, in bytes.
pub const SEED_LENGTH: usize = 32;

/// The length of an expanded signing key, in bytes.
pub const SECRET_KEY_LENGTH: usize = 64;

/// The length of a public key, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// The length of a signature, in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// The length of a message; qDSA signs fixed-size 32-byte messages.
pub const MESSAGE_LENGTH: usize = 32;

/// The length of a Diffie-Hellman shared secret, in bytes.
pub const SHARED_SECRET_LENGTH: usize = 32;
