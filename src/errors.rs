// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! Errors which may occur when parsing keys and/or signatures, or when
//! a signature fails to verify.

use core::fmt;
use core::fmt::Display;

/// Internal errors.  Most application-level developers will likely not
/// need to pay any attention to these.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum InternalError {
    /// A compressed Kummer point could not be decompressed: the
    /// discriminant had no square root, or a degenerate branch carried
    /// inconsistent tag bits.
    PointDecompression,
    /// The biquadratic verification relations were not all satisfied.
    Verify,
}

impl Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InternalError::PointDecompression => write!(f, "Cannot decompress Kummer point"),
            InternalError::Verify => write!(f, "Verification equation was not satisfied"),
        }
    }
}

/// Errors which may occur while processing signatures and keypairs.
///
/// This error may arise due to:
///
/// * A problem decompressing `R`, a curve point, in the `Signature`,
///   or the curve point for a `VerifyingKey`.
///
/// * Failure of a signature to satisfy the biquadratic verification
///   relations.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct SignatureError(pub(crate) InternalError);

impl Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<InternalError> for SignatureError {
    fn from(err: InternalError) -> SignatureError {
        SignatureError(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignatureError {}
