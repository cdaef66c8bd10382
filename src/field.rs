// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{127} - 1\\).
//!
//! Elements are kept in a single `u128` limb.  Because \\(p\\) is a
//! Mersenne prime, reduction is a fold of the bits at and above
//! position 127 back into the low bits.  Arithmetic is lazy: results
//! are only *weakly* reduced (kept below \\(2\^{127} + 2\\)), and the
//! unique representative in \\([0, p)\\) is produced by
//! [`FieldElement::to_bytes`].
//!
//! The wire form is 16 little-endian bytes.  The top bit of byte 15 is
//! never set by a canonical element; point compression borrows it as a
//! tag bit.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallyNegatable;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

/// The prime \\(p = 2\^{127} - 1\\).
const P: u128 = (1u128 << 127) - 1;

/// \\(2p\\), used to make subtraction borrow-free.
const TWO_P: u128 = u128::MAX - 1;

/// An element of the field \\(\mathbb Z / (2\^{127} - 1)\\).
///
/// The inner value is congruent to the represented element but not
/// necessarily canonical; use [`FieldElement::to_bytes`] for the
/// canonical form.
#[derive(Copy, Clone)]
pub(crate) struct FieldElement(pub(crate) u128);

impl Debug for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement({:?})", &self.to_bytes())
    }
}

impl ConstantTimeEq for FieldElement {
    /// Test equality between two `FieldElement`s.  Since the internal
    /// representation is not canonical, both sides are frozen to wire
    /// format before comparison.
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        // subtle has no u128 impl, so build the mask by hand.
        let mask = (choice.unwrap_u8() as u128).wrapping_neg();
        FieldElement((a.0 & !mask) | (b.0 & mask))
    }
}

/// Fold the bits at and above position 127 back into the low bits.
///
/// For any input this returns a congruent value at most \\(2\^{127}\\).
#[inline(always)]
const fn weak_reduce(v: u128) -> u128 {
    (v & P) + (v >> 127)
}

/// Add two unreduced values, folding both the Mersenne bit and a
/// possible carry out of the 128-bit limb (\\(2\^{128} \equiv 2\\)).
#[inline(always)]
fn reduce_add(x: u128, y: u128) -> u128 {
    let (s, c) = x.overflowing_add(y);
    (s & P) + (s >> 127) + ((c as u128) << 1)
}

/// Fold a 256-bit value `lo + hi * 2^128` into the field.
///
/// Requires `hi < 2^127`, which every caller guarantees by weakly
/// reducing its operands first.
#[inline(always)]
fn fold_wide(lo: u128, hi: u128) -> u128 {
    debug_assert!(hi < (1u128 << 127));
    reduce_add(lo, hi << 1)
}

impl FieldElement {
    pub(crate) const ZERO: FieldElement = FieldElement(0);
    pub(crate) const ONE: FieldElement = FieldElement(1);

    /// Construct a field element from a small constant.
    pub(crate) const fn from_small(k: u16) -> FieldElement {
        FieldElement(k as u128)
    }

    /// Load a field element from its 16-byte little-endian encoding.
    ///
    /// All 128 bits are taken as-is; the value is interpreted modulo
    /// \\(p\\), so non-canonical encodings are accepted.
    pub(crate) fn from_bytes(bytes: &[u8; 16]) -> FieldElement {
        FieldElement(u128::from_le_bytes(*bytes))
    }

    /// Freeze to the canonical representative in \\([0, p)\\) and
    /// encode as 16 little-endian bytes.
    pub(crate) fn to_bytes(self) -> [u8; 16] {
        // Two folds bring any u128 to at most p; one conditional
        // subtraction of p finishes the job.  Branch-free since the
        // signing path freezes secret-derived values.
        let v = weak_reduce(weak_reduce(self.0));
        let (d, borrow) = v.overflowing_sub(P);
        let mask = (borrow as u128).wrapping_neg();
        ((v & mask) | (d & !mask)).to_le_bytes()
    }

    /// Test whether this element is zero, in constant time.
    pub(crate) fn is_zero(&self) -> Choice {
        let zero = [0u8; 16];
        self.to_bytes().ct_eq(&zero)
    }

    /// Multiply by a constant of at most 16 bits.
    pub(crate) fn mul_small(&self, k: u16) -> FieldElement {
        let x = weak_reduce(weak_reduce(self.0));
        let k = k as u128;
        let p0 = (x as u64 as u128) * k;
        let p1 = (x >> 64) * k;
        let (lo, c0) = p0.overflowing_add(p1 << 64);
        let hi = (p1 >> 64) + c0 as u128;
        FieldElement(fold_wide(lo, hi))
    }

    /// Square this field element.
    pub(crate) fn square(&self) -> FieldElement {
        self * self
    }

    /// Compute `self^(2^k)` by `k` successive squarings.
    pub(crate) fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);
        let mut r = self.square();
        for _ in 1..k {
            r = r.square();
        }
        r
    }

    /// Compute \\(x\^{(3p-5)/4}\\), which is \\(x\^{-1/2}\\) whenever
    /// `x` is a nonzero square.
    ///
    /// This is the fixed 11-multiplication, 125-squaring chain shared
    /// by inversion and square-root extraction.
    #[rustfmt::skip] // keep alignment of explanatory comments
    pub(crate) fn pow_minus_half(&self) -> FieldElement {
        // Each temporary is self raised to the annotated exponent.
        let x2   = self.square();          // 2
        let x3   = &x2 * self;             // 2^2 - 1
        let t0   = x3.square().square();   // 12
        let x15  = &t0 * &x3;              // 2^4 - 1
        let t1   = x15.square();           // 2^5 - 2
        let x31  = &t1 * self;             // 2^5 - 1
        let t2   = x31.pow2k(5);           // 2^10 - 2^5
        let a10  = &t2 * &x31;             // 2^10 - 1
        let t3   = a10.pow2k(10);          // 2^20 - 2^10
        let a20  = &t3 * &a10;             // 2^20 - 1
        let t4   = a20.pow2k(20);          // 2^40 - 2^20
        let a40  = &t4 * &a20;             // 2^40 - 1
        let t5   = a40.pow2k(40);          // 2^80 - 2^40
        let a80  = &t5 * &a40;             // 2^80 - 1
        let t6   = a80.pow2k(40);          // 2^120 - 2^40
        let a120 = &t6 * &a40;             // 2^120 - 1
        let t7   = a120.pow2k(4);          // 2^124 - 2^4
        let a124 = &t7 * &x15;             // 2^124 - 1
        let t8   = a124.square();          // 2^125 - 2
        let t9   = &t8 * &x2;              // 2^125
        let t10  = t9.square();            // 2^126
        &t8 * &t10                         // 2^126 + 2^125 - 2
    }

    /// Compute the multiplicative inverse, as \\(x\^{p-2}\\).
    ///
    /// Returns zero on input zero.
    pub(crate) fn invert(&self) -> FieldElement {
        let s = self.square();
        let r = s.pow_minus_half();
        let t = &r * self;
        &r * &t
    }

    /// Attempt a square root of `delta`, choosing the root whose low
    /// bit equals `sigma`.
    ///
    /// Returns `(Choice(1), root)` when `delta` is a square and
    /// `(Choice(0), _)` otherwise.  A zero `delta` trivially passes
    /// the root check; callers on the decompression path only reach
    /// this with a nonzero discriminant.
    pub(crate) fn sqrt_with_sign(delta: &FieldElement, sigma: u8) -> (Choice, FieldElement) {
        let t = delta.pow_minus_half();
        let mut r = &t * delta;
        let ok = (&r.square() - delta).is_zero();

        // Freeze before reading the parity, then match it to sigma.
        r = FieldElement::from_bytes(&r.to_bytes());
        let parity = r.to_bytes()[0] & 1;
        r.conditional_negate(Choice::from(parity ^ (sigma & 1)));
        (ok, r)
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        FieldElement(reduce_add(self.0, rhs.0))
    }
}

impl<'b> AddAssign<&'b FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &'b FieldElement) {
        self.0 = reduce_add(self.0, rhs.0);
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        // x - y as x + (2p - y), with y weakly reduced so that the
        // subtrahend cannot underflow.
        FieldElement(reduce_add(self.0, TWO_P - weak_reduce(weak_reduce(rhs.0))))
    }
}

impl<'b> SubAssign<&'b FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &'b FieldElement) {
        *self = &*self - rhs;
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        FieldElement(weak_reduce(TWO_P - weak_reduce(weak_reduce(self.0))))
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        // Schoolbook on 64-bit halves.  Weak reduction bounds both
        // high halves below 2^63, so the cross terms cannot carry out
        // of the 128-bit accumulator.
        let x = weak_reduce(weak_reduce(self.0));
        let y = weak_reduce(weak_reduce(rhs.0));
        let (x0, x1) = (x as u64 as u128, x >> 64);
        let (y0, y1) = (y as u64 as u128, y >> 64);

        let z0 = x0 * y0;
        let z1 = x0 * y1 + x1 * y0;
        let z2 = x1 * y1;

        let (lo, c0) = z0.overflowing_add(z1 << 64);
        let hi = z2 + (z1 >> 64) + c0 as u128;
        FieldElement(fold_wide(lo, hi))
    }
}

impl<'b> MulAssign<&'b FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &'b FieldElement) {
        *self = &*self * rhs;
    }
}

/// In-place Hadamard butterfly under the negated-first-coordinate
/// convention: the input's first element is assumed to carry a negated
/// value, and the output's *last* element comes out negated.
///
/// With `H` the plain Hadamard transform, this maps
/// \\((-x_0, x_1, x_2, x_3)\\) to \\((H_0, H_1, H_2, -H_3)\\).  The
/// ladder relies on this exact sign placement; see [`hadamard`] for
/// the plain transform.
pub(crate) fn hadamard4(x: &mut [FieldElement; 4]) {
    let t0 = &x[1] - &x[0];
    let t1 = &x[2] + &x[3];
    let t2 = &x[0] + &x[1];
    let t3 = &x[2] - &x[3];
    x[0] = &t0 + &t1;
    x[1] = &t0 - &t1;
    x[2] = &t3 - &t2;
    x[3] = &t3 + &t2;
}

/// In-place plain Hadamard transform of four field elements:
///
/// ```text
/// r0 = x0 + x1 + x2 + x3
/// r1 = x0 + x1 - x2 - x3
/// r2 = x0 - x1 + x2 - x3
/// r3 = x0 - x1 - x2 + x3
/// ```
///
/// Packaged as negate-transform-negate so that the sign placement
/// stays in lock-step with the biquadratic forms downstream; do not
/// unbundle the negations at call sites.
pub(crate) fn hadamard(x: &mut [FieldElement; 4]) {
    x[0] = -&x[0];
    hadamard4(x);
    x[3] = -&x[3];
}
