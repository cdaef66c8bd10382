// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! The biquadratic verification check.
//!
//! On a Kummer surface the verifier cannot add points, so instead of
//! recomputing \\(R = sP + hQ\\) it tests a relation that holds
//! exactly when \\(R = \pm(sP \pm hQ)\\): for every pair of indices
//! \\(i < j\\), the biquadratic forms \\(B_{ii}, B_{jj}, B_{ij}\\) in
//! the coordinates of \\(sP\\) and \\(hQ\\) must satisfy
//!
//! ```text
//! B_jj * R_i^2  -  2 C * B_ij * R_i * R_j  +  B_ii * R_j^2  =  0
//! ```
//!
//! All three points are pushed through the Hadamard transform first;
//! the constant schedule below is tied to that basis.

use crate::constants::{CURVE_C, EHAT, KAPPA, MUHAT};
use crate::errors::InternalError;
use crate::field::FieldElement;
use crate::kummer::{CompressedKummerPoint, KummerPoint};

/// Dot product of two 4-tuples.
fn dot(x: [&FieldElement; 4], y: [&FieldElement; 4]) -> FieldElement {
    let mut r = x[0] * y[0];
    r += &(x[1] * y[1]);
    r += &(x[2] * y[2]);
    &r + &(x[3] * y[3])
}

/// Dot product against the \\(\kappa\\) constants with their fixed
/// sign pattern: \\(\kappa_1 x_0 - \kappa_2 x_1 - \kappa_3 x_2 + \kappa_4 x_3\\).
fn dot_kappa(x: [&FieldElement; 4]) -> FieldElement {
    let mut r = x[0].mul_small(KAPPA[0]);
    r -= &x[1].mul_small(KAPPA[1]);
    r -= &x[2].mul_small(KAPPA[2]);
    &r + &x[3].mul_small(KAPPA[3])
}

/// The field element \\(a b + c d\\) for small constants.
fn const_sum(a: u16, b: u16, c: u16, d: u16) -> FieldElement {
    FieldElement((a as u128) * (b as u128) + (c as u128) * (d as u128))
}

/// The four diagonal forms \\((B_{11}, B_{22}, B_{33}, B_{44})\\) of a
/// pair of (Hadamard-transformed) points, as a coordinate tuple with
/// the usual negated first entry.
fn bii_values(sp: &KummerPoint, hq: &KummerPoint) -> KummerPoint {
    let mut t0 = *sp;
    t0.sqr4();
    t0.mul4_const(&EHAT);
    let mut r = *hq;
    r.sqr4();
    r.mul4_const(&EHAT);
    t0.X = -&t0.X;
    r.X = -&r.X;

    let t1 = KummerPoint {
        X: dot([&t0.X, &t0.Y, &t0.Z, &t0.T], [&r.X, &r.Y, &r.Z, &r.T]),
        Y: dot([&t0.X, &t0.Y, &t0.Z, &t0.T], [&r.Y, &r.X, &r.T, &r.Z]),
        Z: dot([&t0.X, &t0.Z, &t0.Y, &t0.T], [&r.Z, &r.X, &r.T, &r.Y]),
        T: dot([&t0.X, &t0.T, &t0.Y, &t0.Z], [&r.T, &r.X, &r.Z, &r.Y]),
    };

    let mut out = KummerPoint {
        X: dot_kappa([&t1.X, &t1.Y, &t1.Z, &t1.T]),
        Y: dot_kappa([&t1.Y, &t1.X, &t1.T, &t1.Z]),
        Z: dot_kappa([&t1.Z, &t1.T, &t1.X, &t1.Y]),
        T: dot_kappa([&t1.T, &t1.Z, &t1.Y, &t1.X]),
    };
    out.mul4_const(&MUHAT);
    out.X = -&out.X;
    out
}

/// One off-diagonal form \\(B_{ij}\\), for a fixed permutation of the
/// coordinates of the two points and of the \\(\hat\mu\\) constants.
fn bij_value(p: [&FieldElement; 4], q: [&FieldElement; 4], c: [u16; 4]) -> FieldElement {
    let mut r = p[0] * p[1];
    let qq = q[0] * q[1];
    let pp = p[2] * p[3];
    r = &r - &pp;
    let qz = q[2] * q[3];
    r = &r * &(&qq - &qz);
    let cross = &pp * &qz;
    r = r.mul_small(c[2]).mul_small(c[3]);
    let cross = &cross * &const_sum(c[2], c[3], c[0], c[1]);
    r = &cross - &r;
    r = r.mul_small(c[0]).mul_small(c[1]);
    r = &r * &const_sum(c[1], c[3], c[0], c[2]);
    &r * &const_sum(c[1], c[2], c[0], c[3])
}

/// Whether \\(B_{jj} R_1^2 - 2 C B_{ij} R_1 R_2 + B_{ii} R_2^2 = 0\\).
fn quad(
    bij: &FieldElement,
    bjj: &FieldElement,
    bii: &FieldElement,
    r1: &FieldElement,
    r2: &FieldElement,
) -> bool {
    let mut t = bjj * &r1.square();
    let mut u = &(r1 * r2) * bij;
    u = &u * &CURVE_C;
    t = &t - &(&u + &u);
    t = &t + &(bii * &r2.square());
    bool::from(t.is_zero())
}

/// Verify that the compressed point `xr` equals \\(\pm(sP \pm hQ)\\).
///
/// Consumes the two ladder outputs; the whole path is variable-time,
/// which is fine for the public inputs of verification.
pub(crate) fn check(
    mut sp: KummerPoint,
    mut hq: KummerPoint,
    xr: &CompressedKummerPoint,
) -> Result<(), InternalError> {
    sp.hadamard();
    hq.hadamard();
    let bii = bii_values(&sp, &hq);

    let mut r = xr.decompress()?;
    r.hadamard();

    let mut ok = true;

    // B12
    let b = bij_value(
        [&sp.X, &sp.Y, &sp.Z, &sp.T],
        [&hq.X, &hq.Y, &hq.Z, &hq.T],
        [MUHAT[0], MUHAT[1], MUHAT[2], MUHAT[3]],
    );
    ok &= quad(&b, &bii.Y, &bii.X, &r.X, &r.Y);
    // B13
    let b = bij_value(
        [&sp.X, &sp.Z, &sp.Y, &sp.T],
        [&hq.X, &hq.Z, &hq.Y, &hq.T],
        [MUHAT[0], MUHAT[2], MUHAT[1], MUHAT[3]],
    );
    ok &= quad(&b, &bii.Z, &bii.X, &r.X, &r.Z);
    // B14
    let b = bij_value(
        [&sp.X, &sp.T, &sp.Y, &sp.Z],
        [&hq.X, &hq.T, &hq.Y, &hq.Z],
        [MUHAT[0], MUHAT[3], MUHAT[1], MUHAT[2]],
    );
    ok &= quad(&b, &bii.T, &bii.X, &r.X, &r.T);
    // B23, negated
    let b = -&bij_value(
        [&sp.Y, &sp.Z, &sp.X, &sp.T],
        [&hq.Y, &hq.Z, &hq.X, &hq.T],
        [MUHAT[1], MUHAT[2], MUHAT[0], MUHAT[3]],
    );
    ok &= quad(&b, &bii.Z, &bii.Y, &r.Y, &r.Z);
    // B24, negated
    let b = -&bij_value(
        [&sp.Y, &sp.T, &sp.X, &sp.Z],
        [&hq.Y, &hq.T, &hq.X, &hq.Z],
        [MUHAT[1], MUHAT[3], MUHAT[0], MUHAT[2]],
    );
    ok &= quad(&b, &bii.T, &bii.Y, &r.Y, &r.T);
    // B34, negated
    let b = -&bij_value(
        [&sp.Z, &sp.T, &sp.X, &sp.Y],
        [&hq.Z, &hq.T, &hq.X, &hq.Y],
        [MUHAT[2], MUHAT[3], MUHAT[0], MUHAT[1]],
    );
    ok &= quad(&b, &bii.T, &bii.Z, &r.Z, &r.T);

    if ok {
        Ok(())
    } else {
        Err(InternalError::Verify)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kummer::{mul_base_vartime, scalar_mul_vartime};
    use crate::scalar::Scalar;

    // A miniature verification: R = [s + h]P must check out against
    // sP = [s]P and hQ = [h]P.
    #[test]
    fn accepts_a_true_linear_combination() {
        let s = Scalar::from(987_654_321u64);
        let h = Scalar::from(1_357_911u64);
        let sum = Scalar::from(987_654_321u64 + 1_357_911u64);

        let sp = mul_base_vartime(&s.to_bytes());
        let base = crate::constants::BASEPOINT_WRAPPED.unwrap();
        let hq = scalar_mul_vartime(&base, &crate::constants::BASEPOINT_WRAPPED, &h.to_bytes());
        let r = mul_base_vartime(&sum.to_bytes()).compress();

        assert!(check(sp, hq, &r).is_ok());
    }

    #[test]
    fn rejects_an_unrelated_point() {
        let s = Scalar::from(987_654_321u64);
        let h = Scalar::from(1_357_911u64);

        let sp = mul_base_vartime(&s.to_bytes());
        let base = crate::constants::BASEPOINT_WRAPPED.unwrap();
        let hq = scalar_mul_vartime(&base, &crate::constants::BASEPOINT_WRAPPED, &h.to_bytes());
        let r = mul_base_vartime(&Scalar::from(42u64).to_bytes()).compress();

        assert!(check(sp, hq, &r).is_err());
    }

    #[test]
    fn also_accepts_the_difference() {
        // The relation only sees +-(sP +- hQ), so the difference
        // passes too.
        let s = Scalar::from(500_000u64);
        let h = Scalar::from(200_000u64);
        let diff = Scalar::from(300_000u64);

        let sp = mul_base_vartime(&s.to_bytes());
        let base = crate::constants::BASEPOINT_WRAPPED.unwrap();
        let hq = scalar_mul_vartime(&base, &crate::constants::BASEPOINT_WRAPPED, &h.to_bytes());
        let r = mul_base_vartime(&diff.to_bytes()).compress();

        assert!(check(sp, hq, &r).is_ok());
    }
}
