// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! Diffie-Hellman key exchange on the Kummer surface.
//!
//! The pseudo-multiplication of the ladder is all a Diffie-Hellman
//! needs: both parties arrive at \\(\pm\[ab\]P\\), and the compressed
//! encoding of that class is the shared secret.

#[cfg(feature = "rand_core")]
use rand_core::CryptoRngCore;

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::SignatureError;
use crate::kummer::{mul_base, scalar_mul, CompressedKummerPoint};
use crate::scalar::Scalar;

/// A Diffie-Hellman public key, the compressed point \\(\[x\]P\\).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct DhPublicKey(pub(crate) CompressedKummerPoint);

impl DhPublicKey {
    /// View this public key as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Convert this public key to a byte array.
    pub fn to_bytes(&self) -> [u8; 32] {
        *self.0.as_bytes()
    }
}

impl From<[u8; 32]> for DhPublicKey {
    /// Given a byte array, construct a `DhPublicKey`.
    ///
    /// Validity is only established during
    /// [`DhSecret::diffie_hellman`], which fails on keys that do not
    /// decompress.
    fn from(bytes: [u8; 32]) -> DhPublicKey {
        DhPublicKey(CompressedKummerPoint(bytes))
    }
}

/// A Diffie-Hellman secret: 32 bytes of randomness, used as a scalar
/// after reduction modulo the group order.
#[derive(Clone)]
pub struct DhSecret(pub(crate) [u8; 32]);

#[cfg(feature = "zeroize")]
impl Drop for DhSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for DhSecret {}

impl From<[u8; 32]> for DhSecret {
    fn from(bytes: [u8; 32]) -> DhSecret {
        DhSecret(bytes)
    }
}

impl DhSecret {
    /// Generate a fresh secret from the supplied RNG.
    #[cfg(feature = "rand_core")]
    pub fn random_from_rng<R: CryptoRngCore + ?Sized>(csprng: &mut R) -> DhSecret {
        let mut bytes = [0u8; 32];
        csprng.fill_bytes(&mut bytes);
        DhSecret(bytes)
    }

    /// The public key \\(\[x\]P\\) for this secret, via the
    /// constant-time fixed-base ladder.
    pub fn public_key(&self) -> DhPublicKey {
        let x = Scalar::from_bytes(&self.0);
        DhPublicKey(mul_base(&x.to_bytes()).compress())
    }

    /// Perform a Diffie-Hellman key agreement with `their_public`.
    ///
    /// Fails if the remote key does not decompress to a point on the
    /// surface.  The ladder runs in constant time with respect to the
    /// local secret.
    pub fn diffie_hellman(&self, their_public: &DhPublicKey) -> Result<SharedSecret, SignatureError> {
        let point = their_public.0.decompress()?;
        let wrapped = point.wrap();
        let x = Scalar::from_bytes(&self.0);
        let shared = scalar_mul(&point, &wrapped, &x.to_bytes());
        Ok(SharedSecret(*shared.compress().as_bytes()))
    }
}

/// The result of a Diffie-Hellman key exchange: the compressed shared
/// point.
pub struct SharedSecret(pub(crate) [u8; 32]);

#[cfg(feature = "zeroize")]
impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for SharedSecret {}

impl SharedSecret {
    /// View this shared secret as a byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert this shared secret to a byte array.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}
