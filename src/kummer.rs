// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! Points on the fast Kummer surface of the Gaudry-Schost curve, and
//! the differential ladder over them.
//!
//! A point is a projective 4-tuple \\((X : Y : Z : T)\\).  Because the
//! surface has no group law, only *differential* addition is
//! available: from \\(\pm P\\), \\(\pm Q\\) and the difference
//! \\(\pm(P - Q)\\) the ladder computes \\(\pm(P + Q)\\), one combined
//! double-and-add per scalar bit.
//!
//! Two sign conventions thread through this module:
//!
//! * Several curve constants are negative in their first coordinate;
//!   the tables store absolute values and ladder-internal points keep
//!   their `X` negated to compensate.  The ladder toggles the sign
//!   every iteration and strips it again on exit, so callers only ever
//!   see plain points.
//!
//! * The ladder's difference argument is *wrapped*: \\((X/Y, X/Z,
//!   X/T)\\), trading one inversion up front for three saved
//!   multiplications per step.

#![allow(non_snake_case)]

use core::mem;

use subtle::Choice;
use subtle::ConditionallySelectable;

use crate::constants::{BASEPOINT_WRAPPED, EHAT, E_CONS, KHAT, MU, Q};
use crate::errors::InternalError;
use crate::field;
use crate::field::FieldElement;

/// A projective point \\((X : Y : Z : T)\\) on the Kummer surface.
#[derive(Copy, Clone, Debug)]
pub(crate) struct KummerPoint {
    pub(crate) X: FieldElement,
    pub(crate) Y: FieldElement,
    pub(crate) Z: FieldElement,
    pub(crate) T: FieldElement,
}

/// A Kummer point in wrapped form \\((X/Y, X/Z, X/T)\\), used as the
/// fixed difference operand of the ladder.
///
/// Wrapping requires `Y`, `Z`, `T` all nonzero; the base point and
/// decompressed public keys satisfy this.
#[derive(Copy, Clone, Debug)]
pub(crate) struct WrappedPoint {
    pub(crate) Y: FieldElement,
    pub(crate) Z: FieldElement,
    pub(crate) T: FieldElement,
}

/// The 32-byte encoding of a Kummer point: two field elements with a
/// tag bit each in their top position (`tau` in the first half,
/// `sigma` in the second).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct CompressedKummerPoint(pub(crate) [u8; 32]);

impl ConditionallySelectable for KummerPoint {
    fn conditional_select(a: &KummerPoint, b: &KummerPoint, choice: Choice) -> KummerPoint {
        KummerPoint {
            X: FieldElement::conditional_select(&a.X, &b.X, choice),
            Y: FieldElement::conditional_select(&a.Y, &b.Y, choice),
            Z: FieldElement::conditional_select(&a.Z, &b.Z, choice),
            T: FieldElement::conditional_select(&a.T, &b.T, choice),
        }
    }
}

impl KummerPoint {
    /// The identity point \\((\mu_1 : \mu_2 : \mu_3 : \mu_4)\\).
    pub(crate) fn identity() -> KummerPoint {
        KummerPoint {
            X: FieldElement::from_small(MU[0]),
            Y: FieldElement::from_small(MU[1]),
            Z: FieldElement::from_small(MU[2]),
            T: FieldElement::from_small(MU[3]),
        }
    }

    fn coords(&self) -> [FieldElement; 4] {
        [self.X, self.Y, self.Z, self.T]
    }

    fn set_coords(&mut self, c: [FieldElement; 4]) {
        self.X = c[0];
        self.Y = c[1];
        self.Z = c[2];
        self.T = c[3];
    }

    /// Hadamard butterfly under the negated-X convention (ladder
    /// internal form).
    fn hadamard4(&mut self) {
        let mut c = self.coords();
        field::hadamard4(&mut c);
        self.set_coords(c);
    }

    /// Plain Hadamard transform of the coordinates.
    pub(crate) fn hadamard(&mut self) {
        let mut c = self.coords();
        field::hadamard(&mut c);
        self.set_coords(c);
    }

    /// Coordinatewise product with another point.
    pub(crate) fn mul4(&mut self, other: &KummerPoint) {
        self.X *= &other.X;
        self.Y *= &other.Y;
        self.Z *= &other.Z;
        self.T *= &other.T;
    }

    /// Coordinatewise squaring.
    pub(crate) fn sqr4(&mut self) {
        self.X = self.X.square();
        self.Y = self.Y.square();
        self.Z = self.Z.square();
        self.T = self.T.square();
    }

    /// Coordinatewise product with a tuple of small constants.
    pub(crate) fn mul4_const(&mut self, k: &[u16; 4]) {
        self.X = self.X.mul_small(k[0]);
        self.Y = self.Y.mul_small(k[1]);
        self.Z = self.Z.mul_small(k[2]);
        self.T = self.T.mul_small(k[3]);
    }

    /// Wrap into \\((X/Y, X/Z, X/T)\\) with a single inversion.
    pub(crate) fn wrap(&self) -> WrappedPoint {
        let w0 = &self.Y * &self.Z;
        let w1 = &w0 * &self.T;
        let w2 = &w1.invert() * &self.X;
        let w3 = &w2 * &self.T;
        WrappedPoint {
            Y: &w3 * &self.Z,
            Z: &w3 * &self.Y,
            T: &w0 * &w2,
        }
    }

    /// Compress to two field elements plus the tag bits `tau` and
    /// `sigma`.
    pub(crate) fn compress(&self) -> CompressedKummerPoint {
        let t = t_transform(self);

        // Normalize by the first nonzero of (L3, L2, L1, L4); tau
        // records whether L3 was it.
        let tau = !bool::from(t.Z.is_zero());
        let norm_inv = if tau {
            t.Z.invert()
        } else if !bool::from(t.Y.is_zero()) {
            t.Y.invert()
        } else if !bool::from(t.X.is_zero()) {
            t.X.invert()
        } else {
            t.T.invert()
        };

        let l4 = &t.T * &norm_inv;
        let l1 = &t.X * &norm_inv;
        let l2 = &t.Y * &norm_inv;

        // sigma is the parity of k2 * L4 - k3.
        let k2 = k2_poly(&l1, &l2, tau);
        let k3 = k3_poly(&l1, &l2, tau);
        let delta = &(&k2 * &l4) - &k3;

        let mut bytes = [0u8; 32];
        let mut l1b = l1.to_bytes();
        let mut l2b = l2.to_bytes();
        l1b[15] |= (tau as u8) << 7;
        l2b[15] |= (delta.to_bytes()[0] & 1) << 7;
        bytes[..16].copy_from_slice(&l1b);
        bytes[16..].copy_from_slice(&l2b);
        CompressedKummerPoint(bytes)
    }
}

impl WrappedPoint {
    /// Reconstruct a projective point whose wrapped form is `self`.
    pub(crate) fn unwrap(&self) -> KummerPoint {
        let T = &self.Y * &self.Z;
        KummerPoint {
            X: &T * &self.T,
            Y: &self.Z * &self.T,
            Z: &self.Y * &self.T,
            T,
        }
    }
}

impl CompressedKummerPoint {
    /// View this compressed point as a byte array.
    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Attempt to decompress to a projective Kummer point.
    ///
    /// Fails when the discriminant has no square root or when a
    /// degenerate branch carries inconsistent tag bits.
    pub(crate) fn decompress(&self) -> Result<KummerPoint, InternalError> {
        let mut l1b: [u8; 16] = self.0[..16].try_into().expect("sixteen bytes");
        let mut l2b: [u8; 16] = self.0[16..].try_into().expect("sixteen bytes");
        let tau_bit = (l1b[15] & 0x80) >> 7;
        let sigma = (l2b[15] & 0x80) >> 7;
        l1b[15] &= 0x7f;
        l2b[15] &= 0x7f;
        let l1 = FieldElement::from_bytes(&l1b);
        let l2 = FieldElement::from_bytes(&l2b);
        let tau = tau_bit == 1;

        let k2 = k2_poly(&l1, &l2, tau);
        let k3 = k3_poly(&l1, &l2, tau);
        let k4 = k4_poly(&l1, &l2, tau);

        let pre = if bool::from(k2.is_zero()) {
            if bool::from(k3.is_zero()) {
                // Only the identity compresses with k2 = k3 = 0, and
                // only with every tag clear.
                let nonzero = !bool::from(l1.is_zero()) || !bool::from(l2.is_zero());
                if nonzero || tau_bit != 0 || sigma != 0 {
                    return Err(InternalError::PointDecompression);
                }
                KummerPoint {
                    X: FieldElement::ZERO,
                    Y: FieldElement::ZERO,
                    Z: FieldElement::ZERO,
                    T: FieldElement::ONE,
                }
            } else {
                // sigma must disagree with the low byte of k3 here;
                // compression stored the parity of -k3.
                if (sigma ^ k3.to_bytes()[0]) == 0 {
                    return Err(InternalError::PointDecompression);
                }
                let x = &k3 * &l1;
                let y = &k3 * &l2;
                KummerPoint {
                    X: &x + &x,
                    Y: &y + &y,
                    Z: if tau { &k3 + &k3 } else { FieldElement::ZERO },
                    T: FieldElement::ZERO,
                }
            }
        } else {
            let delta = &k3.square() - &(&k2 * &k4);
            let (ok, root) = FieldElement::sqrt_with_sign(&delta, sigma);
            if !bool::from(ok) {
                return Err(InternalError::PointDecompression);
            }
            KummerPoint {
                X: &k2 * &l1,
                Y: &k2 * &l2,
                Z: if tau { k2 } else { FieldElement::ZERO },
                T: &k3 + &root,
            }
        };

        Ok(t_inv_transform(&pre))
    }
}

/// One row of the basis change `T`:
/// \\(\hat\kappa_2 x_2 + \hat\kappa_3 x_3 + \hat\kappa_4 x_4 - \hat\kappa_1 x_1\\).
fn t_row(
    x1: &FieldElement,
    x2: &FieldElement,
    x3: &FieldElement,
    x4: &FieldElement,
) -> FieldElement {
    let mut r = x2.mul_small(KHAT[1]);
    r += &x3.mul_small(KHAT[2]);
    r += &x4.mul_small(KHAT[3]);
    &r - &x1.mul_small(KHAT[0])
}

/// The basis change applied before compression.
fn t_transform(x: &KummerPoint) -> KummerPoint {
    KummerPoint {
        X: t_row(&x.T, &x.Z, &x.Y, &x.X),
        Y: t_row(&x.Z, &x.T, &x.X, &x.Y),
        Z: t_row(&x.Y, &x.X, &x.T, &x.Z),
        T: t_row(&x.X, &x.Y, &x.Z, &x.T),
    }
}

/// One row of the inverse basis change, using \\(\mu_2 = 2\mu_1\\):
/// \\(\mu_1 (2 x_2 - x_1) + \mu_3 x_3 + \mu_4 x_4\\).
fn t_inv_row(
    x1: &FieldElement,
    x2: &FieldElement,
    x3: &FieldElement,
    x4: &FieldElement,
) -> FieldElement {
    let mut r = &(x2 + x2) - x1;
    r = r.mul_small(MU[0]);
    r += &x3.mul_small(MU[2]);
    &r + &x4.mul_small(MU[3])
}

/// The basis change applied after decompression.
fn t_inv_transform(x: &KummerPoint) -> KummerPoint {
    KummerPoint {
        X: t_inv_row(&x.T, &x.Z, &x.Y, &x.X),
        Y: t_inv_row(&x.Z, &x.T, &x.X, &x.Y),
        Z: t_inv_row(&x.Y, &x.X, &x.T, &x.Z),
        T: t_inv_row(&x.X, &x.Y, &x.Z, &x.T),
    }
}

/// The compression polynomial \\(K_2(l_1, l_2, \tau)\\).
fn k2_poly(l1: &FieldElement, l2: &FieldElement, tau: bool) -> FieldElement {
    let mut r = l1.mul_small(Q[2]);
    r = l2 * &r;
    if tau {
        r += &l1.mul_small(Q[0]);
        r -= &l2.mul_small(Q[1]);
    }
    r = r.mul_small(Q[3]);
    r = &r + &r;
    r = &l1.mul_small(Q[5]).square() - &r;
    r = &l2.mul_small(Q[3]).square() + &r;
    if tau {
        r = &FieldElement::from_small(Q[4]).square() + &r;
    }
    r
}

/// The compression polynomial \\(K_3(l_1, l_2, \tau)\\).
fn k3_poly(l1: &FieldElement, l2: &FieldElement, tau: bool) -> FieldElement {
    let mut r = l1.square();
    let mut t0 = l2.square();
    let mut t1 = FieldElement::ZERO;
    if tau {
        r += &FieldElement::ONE;
        t0 += &FieldElement::ONE;
        t1 = &r + &t0;
    }
    r = &r * l2;
    r = r.mul_small(Q[0]);
    t0 = &t0 * l1;
    r -= &t0.mul_small(Q[1]);
    if tau {
        t1 -= &FieldElement::ONE;
        t1 -= &FieldElement::ONE;
        r += &t1.mul_small(Q[2]);
    }
    r = r.mul_small(Q[3]);
    if tau {
        let t = (l1 * l2).mul_small(Q[6]).mul_small(Q[7]);
        r -= &t;
    }
    r
}

/// The compression polynomial \\(K_4(l_1, l_2, \tau)\\).
fn k4_poly(l1: &FieldElement, l2: &FieldElement, tau: bool) -> FieldElement {
    let mut acc = FieldElement::ZERO;
    if tau {
        let mut t = &l2.mul_small(Q[0]) - &l1.mul_small(Q[1]);
        t += &FieldElement::from_small(Q[2]);
        t = &t * l1;
        t = &t * l2;
        t = t.mul_small(Q[3]);
        t = &t + &t;
        t = &l1.mul_small(Q[3]).square() - &t;
        acc = &l2.mul_small(Q[5]).square() + &t;
    }
    let mut r = l1.mul_small(Q[4]);
    r = &r * l2;
    r = r.square();
    if tau {
        r = &r + &acc;
    }
    r
}

/// One simultaneous differential double-and-add.
///
/// On entry both `p` and `q` carry a negated `X` (the ladder's
/// convention); `d` is the wrapped difference \\(p - q\\).  On exit
/// `p` is \\(2p\\) with `X` negated again, and `q` is \\(p + q\\) with
/// a plain `X` (the caller re-negates it next iteration).
fn differential_double_and_add(p: &mut KummerPoint, q: &mut KummerPoint, d: &WrappedPoint) {
    q.hadamard4();
    p.hadamard4();
    q.mul4(p);
    p.sqr4();
    q.mul4_const(&EHAT);
    p.mul4_const(&EHAT);
    q.hadamard4();
    p.hadamard4();
    q.sqr4();
    p.sqr4();
    q.Y *= &d.Y;
    q.Z *= &d.Z;
    q.T *= &d.T;
    p.mul4_const(&E_CONS);
}

/// Compute \\([n] Q\\) by the 251-step differential ladder, with
/// constant-time conditional swaps.
///
/// `q` is the base point, `d` its wrapped form, and `n` a little-endian
/// scalar of which bits 250..=0 are consumed (bit 250 first).
pub(crate) fn scalar_mul(q: &KummerPoint, d: &WrappedPoint, n: &[u8; 32]) -> KummerPoint {
    let mut p = KummerPoint::identity();
    let mut q = *q;
    let mut prevbit = 0u8;

    for i in (0..=250usize).rev() {
        let bit = (n[i >> 3] >> (i & 7)) & 1;
        let swap = bit ^ prevbit;
        prevbit = bit;
        q.X = -&q.X;
        KummerPoint::conditional_swap(&mut p, &mut q, Choice::from(swap));
        differential_double_and_add(&mut p, &mut q, d);
    }

    p.X = -&p.X;
    KummerPoint::conditional_swap(&mut p, &mut q, Choice::from(prevbit));
    p
}

/// Variable-time variant of [`scalar_mul`]: swaps branch on the scalar
/// bits.
///
/// Only for verification, where the scalar is derived from public
/// data.
pub(crate) fn scalar_mul_vartime(q: &KummerPoint, d: &WrappedPoint, n: &[u8; 32]) -> KummerPoint {
    let mut p = KummerPoint::identity();
    let mut q = *q;
    let mut prevbit = 0u8;

    for i in (0..=250usize).rev() {
        let bit = (n[i >> 3] >> (i & 7)) & 1;
        let swap = bit ^ prevbit;
        prevbit = bit;
        q.X = -&q.X;
        if swap != 0 {
            mem::swap(&mut p, &mut q);
        }
        differential_double_and_add(&mut p, &mut q, d);
    }

    p.X = -&p.X;
    if prevbit != 0 {
        mem::swap(&mut p, &mut q);
    }
    p
}

/// Compute \\([n] P\\) for the fixed base point, in constant time.
pub(crate) fn mul_base(n: &[u8; 32]) -> KummerPoint {
    let q = BASEPOINT_WRAPPED.unwrap();
    scalar_mul(&q, &BASEPOINT_WRAPPED, n)
}

/// Variable-time variant of [`mul_base`], for verification.
pub(crate) fn mul_base_vartime(n: &[u8; 32]) -> KummerPoint {
    let q = BASEPOINT_WRAPPED.unwrap();
    scalar_mul_vartime(&q, &BASEPOINT_WRAPPED, n)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scalar::Scalar;

    #[test]
    fn wrap_of_unwrap_is_identity_on_the_base_point() {
        let b = BASEPOINT_WRAPPED.unwrap();
        let w = b.wrap();
        assert_eq!(w.Y.to_bytes(), BASEPOINT_WRAPPED.Y.to_bytes());
        assert_eq!(w.Z.to_bytes(), BASEPOINT_WRAPPED.Z.to_bytes());
        assert_eq!(w.T.to_bytes(), BASEPOINT_WRAPPED.T.to_bytes());
    }

    #[test]
    fn ladder_by_one_returns_the_base_point() {
        let n = Scalar::from(1u64).to_bytes();
        let p = mul_base(&n);
        let base = BASEPOINT_WRAPPED.unwrap();
        assert_eq!(p.compress(), base.compress());
    }

    #[test]
    fn constant_time_and_vartime_ladders_agree() {
        let n = Scalar::from(0xdead_beef_0bad_f00du64).to_bytes();
        let ct = mul_base(&n);
        let vt = mul_base_vartime(&n);
        assert_eq!(ct.compress(), vt.compress());
    }

    #[test]
    fn compression_round_trips_through_decompression() {
        for k in [2u64, 3, 65_537, 0x1234_5678_9abc_def0] {
            let p = mul_base(&Scalar::from(k).to_bytes());
            let c = p.compress();
            let q = c.decompress().expect("ladder output must decompress");
            assert_eq!(q.compress(), c);
        }
    }

    #[test]
    fn ladder_is_multiplicative() {
        let n1 = Scalar::from(1_234_567u64);
        let n2 = Scalar::from(89_101_112u64);
        // [n1]([n2]P) = [n1 * n2]P
        let inner = mul_base(&n2.to_bytes());
        let wrapped = inner.wrap();
        let nested = scalar_mul(&inner, &wrapped, &n1.to_bytes());
        let flat = mul_base(&(&n1 * &n2).to_bytes());
        assert_eq!(nested.compress(), flat.compress());
    }

    #[test]
    fn all_ones_encoding_fails_decompression() {
        let c = CompressedKummerPoint([0xff; 32]);
        assert!(c.decompress().is_err());
    }
}
