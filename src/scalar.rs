// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! Arithmetic modulo the group order \\(N\\), a 250-bit prime.
//!
//! Scalars are eight little-endian `u32` limbs.  The workhorse is the
//! 512-to-250-bit reduction: the high half is folded back four times
//! through \\(2\^{256} \bmod N\\), then the bits at and above position
//! 250 are cleared with two folds of \\(2\^{250} \bmod N\\).  Everything
//! else (wide multiplication, negation, the signing equation) is built
//! from that plus limbwise carry chains.

use core::fmt::Debug;
use core::ops::{Mul, Neg, Sub};

/// The group order \\(N\\), little-endian limbs.
pub(crate) const GROUP_ORDER: [u32; 8] = [
    0x7BF3_FA43,
    0xB88C_F4B4,
    0x065E_AB00,
    0x2D3D_8036,
    0xDF38_AD6B,
    0xFCCB_2967,
    0xFFFF_FFFF,
    0x03FF_FFFF,
];

/// \\(2\^{250} \bmod N\\), the fold constant for bits 250 and up.
const ELL: [u32; 8] = [
    0x840C_05BD,
    0x4773_0B4B,
    0xF9A1_54FF,
    0xD2C2_7FC9,
    0x20C7_5294,
    0x0334_D698,
    0x0,
    0x0,
];

/// \\(2\^{256} \bmod N\\) (that is, `ELL << 6`), the fold constant for
/// the high 256 bits.
const ELL6: [u32; 8] = [
    0x0301_6F40,
    0xDCC2_D2E1,
    0x6855_3FD1,
    0xB09F_F27E,
    0x31D4_A534,
    0xCD35_A608,
    0x0,
    0x0,
];

/// An integer modulo the group order \\(N\\).
///
/// Produced by the reducing constructors, so bits 250 and 251 of the
/// limb encoding are always clear, as the ladder expects.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) struct Scalar {
    pub(crate) limbs: [u32; 8],
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Scalar({:?})", &self.limbs)
    }
}

/// 256x256 -> 512 bit schoolbook multiplication on u32 limbs.
fn mul_wide(x: &[u32; 8], y: &[u32; 8]) -> [u32; 16] {
    let mut r = [0u32; 16];
    for i in 0..8 {
        let mut carry = 0u64;
        for j in 0..8 {
            let t = r[i + j] as u64 + x[i] as u64 * y[j] as u64 + carry;
            r[i + j] = t as u32;
            carry = t >> 32;
        }
        r[i + 8] = carry as u32;
    }
    r
}

/// Add the 256-bit `y` into the low half of the 512-bit accumulator
/// `x`, propagating the carry through all sixteen limbs.
fn add_into(x: &mut [u32; 16], y: &[u32; 8]) {
    let mut carry = 0u64;
    for i in 0..8 {
        let t = x[i] as u64 + y[i] as u64 + carry;
        x[i] = t as u32;
        carry = t >> 32;
    }
    for limb in &mut x[8..] {
        let t = *limb as u64 + carry;
        *limb = t as u32;
        carry = t >> 32;
    }
}

impl Scalar {
    pub(crate) const ZERO: Scalar = Scalar { limbs: [0; 8] };

    /// Reduce a 512-bit integer modulo \\(N\\).
    fn reduce512(x: &[u32; 16]) -> Scalar {
        let mut r = *x;

        // Fold the high 256 bits back through 2^256 = ELL6 (mod N).
        // Four passes leave the high half negligible.
        for _ in 0..4 {
            let hi: [u32; 8] = r[8..16].try_into().expect("eight limbs");
            let temp = mul_wide(&hi, &ELL6);
            r[8..16].copy_from_slice(&temp[8..16]);
            add_into(&mut r, temp[..8].try_into().expect("eight limbs"));
        }

        // Align bits 250..261 on limb 8 and fold them through
        // 2^250 = ELL (mod N).
        r[8] = (r[8] << 6) | ((r[7] & 0xfc00_0000) >> 26);
        r[7] &= 0x03ff_ffff;
        {
            let hi: [u32; 8] = r[8..16].try_into().expect("eight limbs");
            let temp = mul_wide(&hi, &ELL);
            r[8..16].copy_from_slice(&temp[8..16]);
            add_into(&mut r, temp[..8].try_into().expect("eight limbs"));
        }

        // The previous fold may have re-set bit 250; clear it the same
        // way.
        r[8] = (r[7] & 0x0400_0000) >> 26;
        r[7] &= 0x03ff_ffff;
        {
            let hi: [u32; 8] = r[8..16].try_into().expect("eight limbs");
            let temp = mul_wide(&hi, &ELL);
            r[8] = 0;
            add_into(&mut r, temp[..8].try_into().expect("eight limbs"));
        }

        Scalar {
            limbs: r[..8].try_into().expect("eight limbs"),
        }
    }

    /// Interpret 32 little-endian bytes as an integer and reduce it
    /// modulo \\(N\\).
    pub(crate) fn from_bytes(bytes: &[u8; 32]) -> Scalar {
        let mut t = [0u32; 16];
        for (limb, chunk) in t[..8].iter_mut().zip(bytes.chunks_exact(4)) {
            *limb = u32::from_le_bytes(chunk.try_into().expect("four bytes"));
        }
        Scalar::reduce512(&t)
    }

    /// Interpret 64 little-endian bytes (a full sponge output) as an
    /// integer and reduce it modulo \\(N\\).
    pub(crate) fn from_bytes_wide(bytes: &[u8; 64]) -> Scalar {
        let mut t = [0u32; 16];
        for (limb, chunk) in t.iter_mut().zip(bytes.chunks_exact(4)) {
            *limb = u32::from_le_bytes(chunk.try_into().expect("four bytes"));
        }
        Scalar::reduce512(&t)
    }

    /// Encode as 32 little-endian bytes; the top two bits are clear.
    ///
    /// This is the form the ladder consumes.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (chunk, limb) in bytes.chunks_exact_mut(4).zip(self.limbs.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        bytes
    }
}

impl From<u64> for Scalar {
    fn from(x: u64) -> Scalar {
        let mut limbs = [0u32; 8];
        limbs[0] = x as u32;
        limbs[1] = (x >> 32) as u32;
        Scalar { limbs }
    }
}

impl<'a> Neg for &'a Scalar {
    type Output = Scalar;

    /// \\(N - x\\), assuming \\(0 \le x < N\\).
    fn neg(self) -> Scalar {
        let mut limbs = [0u32; 8];
        let mut borrow = 0u64;
        for i in 0..8 {
            let t = (GROUP_ORDER[i] as u64).wrapping_sub(self.limbs[i] as u64 + borrow);
            limbs[i] = t as u32;
            borrow = (t >> 32) & 1;
        }
        Scalar { limbs }
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn mul(self, rhs: &'b Scalar) -> Scalar {
        Scalar::reduce512(&mul_wide(&self.limbs, &rhs.limbs))
    }
}

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    /// \\(x - y \bmod N\\), computed as \\(x + (N - y)\\) followed by a
    /// reduction.  This is the shape the signing equation
    /// \\(s = r - h d'\\) uses.
    fn sub(self, rhs: &'b Scalar) -> Scalar {
        let mut t = [0u32; 16];
        t[..8].copy_from_slice(&(-rhs).limbs);
        add_into(&mut t, &self.limbs);
        Scalar::reduce512(&t)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn values_below_2_250_pass_through() {
        // The fold only touches bits 250 and up; N itself survives
        // unreduced.  The ladder absorbs this: [N + k]P = [k]P.
        let order = Scalar { limbs: GROUP_ORDER };
        assert_eq!(Scalar::from_bytes(&order.to_bytes()), order);
    }

    #[test]
    fn bit_250_folds_to_ell() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x04; // 2^250
        assert_eq!(Scalar::from_bytes(&bytes), Scalar { limbs: ELL });
    }

    #[test]
    fn bit_256_folds_to_ell6() {
        let mut bytes = [0u8; 64];
        bytes[32] = 0x01; // 2^256
        assert_eq!(Scalar::from_bytes_wide(&bytes), Scalar { limbs: ELL6 });
    }

    #[test]
    fn small_values_pass_through() {
        let five = Scalar::from(5u64);
        assert_eq!(Scalar::from_bytes(&five.to_bytes()), five);
    }

    #[test]
    fn reduction_clears_top_bits() {
        let s = Scalar::from_bytes(&[0xff; 32]);
        assert!(s.limbs[7] <= 0x03ff_ffff);
        let w = Scalar::from_bytes_wide(&[0xff; 64]);
        assert!(w.limbs[7] <= 0x03ff_ffff);
    }

    #[test]
    fn wide_reduction_of_zero_padded_input_matches_narrow() {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&[0xabu8; 32]);
        assert_eq!(
            Scalar::from_bytes_wide(&wide),
            Scalar::from_bytes(&[0xabu8; 32])
        );
    }

    #[test]
    fn negation_is_an_involution() {
        let x = Scalar::from(123_456_789u64);
        assert_eq!(-&(-&x), x);
    }

    #[test]
    fn mul_matches_small_cases() {
        let a = Scalar::from(3u64);
        let b = Scalar::from(5u64);
        assert_eq!(&a * &b, Scalar::from(15u64));
    }

    #[test]
    fn sub_matches_small_cases() {
        let a = Scalar::from(5u64);
        let b = Scalar::from(3u64);
        // 5 - 3 lands on N + 2: the fold leaves sub-2^250 values alone.
        let mut expected = GROUP_ORDER;
        expected[0] += 2;
        assert_eq!((&a - &b).limbs, expected);
        // 3 - 5 = N - 2
        assert_eq!(&b - &a, -&Scalar::from(2u64));
    }

    #[test]
    fn mul_by_zero_is_zero() {
        let a = Scalar::from_bytes(&[0x5au8; 32]);
        assert_eq!(&a * &Scalar::ZERO, Scalar::ZERO);
    }
}
