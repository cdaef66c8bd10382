// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! qDSA verifying (public) keys.

use crate::check::check;
use crate::errors::SignatureError;
use crate::kummer::{mul_base_vartime, scalar_mul_vartime, CompressedKummerPoint};
use crate::scalar::Scalar;
use crate::signature::Signature;
use crate::signing::challenge_scalar;

/// A qDSA public key: a compressed Kummer point \\(Q = \[d'\]P\\).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct VerifyingKey {
    pub(crate) compressed: CompressedKummerPoint,
}

impl VerifyingKey {
    pub(crate) fn from_point(compressed: CompressedKummerPoint) -> VerifyingKey {
        VerifyingKey { compressed }
    }

    /// Parse a verifying key from its 32-byte wire form.
    ///
    /// Keys whose point does not decompress are rejected here, so a
    /// constructed `VerifyingKey` always denotes a point on the
    /// surface.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<VerifyingKey, SignatureError> {
        let compressed = CompressedKummerPoint(*bytes);
        compressed.decompress()?;
        Ok(VerifyingKey { compressed })
    }

    /// View this key as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.compressed.as_bytes()
    }

    /// Convert this key to a byte array.
    pub fn to_bytes(&self) -> [u8; 32] {
        *self.compressed.as_bytes()
    }

    /// Verify `signature` over a 32-byte `message`.
    ///
    /// Computes \\(\[s\]P\\) and \\(\[h\]Q\\) by two ladders and tests
    /// the biquadratic relations against the signature's `R`.
    ///
    /// This path is deliberately variable-time: every input is
    /// public.  It must not be fed secret data.
    pub fn verify(&self, message: &[u8; 32], signature: &Signature) -> Result<(), SignatureError> {
        let q = self.compressed.decompress()?;

        let s = Scalar::from_bytes(&signature.s);
        let h = challenge_scalar(&signature.R, self.as_bytes(), message);

        let wrapped = q.wrap();
        let hq = scalar_mul_vartime(&q, &wrapped, &h.to_bytes());
        let sp = mul_base_vartime(&s.to_bytes());

        check(sp, hq, &signature.R)?;
        Ok(())
    }
}
