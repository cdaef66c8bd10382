// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! The 64-byte signature wire type.

// The commitment point keeps its traditional capital R.
#![allow(non_snake_case)]

use crate::kummer::CompressedKummerPoint;

/// A qDSA signature: a compressed Kummer point `R` followed by a
/// 32-byte little-endian scalar `s`.
///
/// Any 64 bytes parse as a `Signature`; whether `R` decompresses and
/// the pair verifies is decided by
/// [`VerifyingKey::verify`](crate::VerifyingKey::verify).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Signature {
    pub(crate) R: CompressedKummerPoint,
    pub(crate) s: [u8; 32],
}

impl Signature {
    /// Parse a signature from its 64-byte wire form.
    pub fn from_bytes(bytes: &[u8; 64]) -> Signature {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Signature {
            R: CompressedKummerPoint(r),
            s,
        }
    }

    /// Convert this signature to its 64-byte wire form, `R` then `s`.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(self.R.as_bytes());
        bytes[32..].copy_from_slice(&self.s);
        bytes
    }
}

impl From<&[u8; 64]> for Signature {
    fn from(bytes: &[u8; 64]) -> Signature {
        Signature::from_bytes(bytes)
    }
}
