// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! qDSA signing keys.

#[cfg(feature = "rand_core")]
use rand_core::CryptoRngCore;

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::kummer::{mul_base, CompressedKummerPoint};
use crate::scalar::Scalar;
use crate::signature::Signature;
use crate::sponge::BobJr;
use crate::verifying::VerifyingKey;

/// Derive the challenge scalar \\(h = H(R \parallel Q \parallel M)
/// \bmod N\\).
///
/// Shared by signing and verification; both sides must absorb the
/// exact same 96 bytes.
pub(crate) fn challenge_scalar(
    big_r: &CompressedKummerPoint,
    public_key: &[u8; 32],
    message: &[u8; 32],
) -> Scalar {
    let mut h = BobJr::new();
    h.absorb(big_r.as_bytes());
    h.absorb(public_key);
    h.absorb(message);
    h.finish();
    Scalar::from_bytes_wide(&h.digest64())
}

/// A qDSA signing key.
///
/// Internally this is the 64-byte expanded secret \\(d'' \parallel
/// d'\\) obtained by hashing a 32-byte seed: the first half keys the
/// deterministic nonce, the second half is the scalar behind the
/// public key.  The corresponding [`VerifyingKey`] is kept alongside.
#[derive(Clone)]
pub struct SigningKey {
    pub(crate) secret: [u8; 64],
    pub(crate) verifying_key: VerifyingKey,
}

#[cfg(feature = "zeroize")]
impl Drop for SigningKey {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for SigningKey {}

impl SigningKey {
    /// Expand a 32-byte seed into a signing key.
    ///
    /// Deterministic: the same seed always yields the same key pair.
    pub fn from_seed(seed: &[u8; 32]) -> SigningKey {
        let mut h = BobJr::new();
        h.absorb(seed);
        h.finish();
        SigningKey::from_bytes(&h.digest64())
    }

    /// Construct a signing key from the 64-byte expanded secret, as
    /// returned by [`SigningKey::to_bytes`].
    pub fn from_bytes(secret: &[u8; 64]) -> SigningKey {
        let d_prime: [u8; 32] = secret[32..].try_into().expect("thirty-two bytes");
        let scalar = Scalar::from_bytes(&d_prime);
        let public = mul_base(&scalar.to_bytes()).compress();
        SigningKey {
            secret: *secret,
            verifying_key: VerifyingKey::from_point(public),
        }
    }

    /// Convert this key to its 64-byte expanded secret.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.secret
    }

    /// The [`VerifyingKey`] for this signing key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.verifying_key
    }

    /// Generate a signing key from a fresh random seed.
    #[cfg(feature = "rand_core")]
    pub fn generate<R: CryptoRngCore + ?Sized>(csprng: &mut R) -> SigningKey {
        let mut seed = [0u8; 32];
        csprng.fill_bytes(&mut seed);
        let key = SigningKey::from_seed(&seed);
        #[cfg(feature = "zeroize")]
        seed.zeroize();
        key
    }

    /// Sign a 32-byte message.
    ///
    /// Deterministic: the nonce is \\(r = H(d'' \parallel M) \bmod
    /// N\\), the commitment is \\(R = \[r\]P\\) compressed, and
    /// \\(s = r - h d' \bmod N\\) with \\(h\\) the challenge scalar.
    /// The ladder runs in constant time.
    pub fn sign(&self, message: &[u8; 32]) -> Signature {
        let mut h = BobJr::new();
        h.absorb(&self.secret[..32]);
        h.absorb(message);
        h.finish();
        let nonce = Scalar::from_bytes_wide(&h.digest64());

        let big_r = mul_base(&nonce.to_bytes()).compress();

        let challenge = challenge_scalar(&big_r, self.verifying_key.as_bytes(), message);
        let d_prime: [u8; 32] = self.secret[32..].try_into().expect("thirty-two bytes");
        let d = Scalar::from_bytes(&d_prime);
        let s = &nonce - &(&challenge * &d);

        Signature {
            R: big_r,
            s: s.to_bytes(),
        }
    }
}
