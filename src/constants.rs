// -*- mode: rust; -*-
//
// This file is part of qdsa-kummer.
// See LICENSE for licensing information.

//! Curve data for the Gaudry-Schost Kummer surface.
//!
//! All tables are the squared-Kummer constants of the fast genus-2
//! arithmetic: the small theta-derived multipliers, their "hat" duals,
//! the compression polynomial coefficients, and the wrapped base
//! point.  None of these are derivable at runtime; they are curve
//! data.
//!
//! Sign convention: the true first entry of several of these tuples is
//! negative.  The tables store absolute values and the point arithmetic
//! keeps the first coordinate of its operands negated to compensate.

use crate::field::FieldElement;
use crate::kummer::WrappedPoint;

/// Squared theta constants \\((\hat e_1 : \hat e_2 : \hat e_3 : \hat e_4)\\),
/// applied between the two Hadamard steps of the ladder.
pub(crate) const EHAT: [u16; 4] = [0x341, 0x9C3, 0x651, 0x231];

/// The doubling constants \\((e_1 : e_2 : e_3 : e_4)\\) applied to the
/// doubled leg at the end of a ladder step.
pub(crate) const E_CONS: [u16; 4] = [0x72, 0x39, 0x42, 0x1a2];

/// Identity point coordinates \\((\mu_1 : \mu_2 : \mu_3 : \mu_4)\\).
/// Note \\(\mu_2 = 2 \mu_1\\); the inverse basis-change rows exploit it.
pub(crate) const MU: [u16; 4] = [0x0b, 0x16, 0x13, 0x03];

/// Dual identity constants \\((\hat\mu_1 : \hat\mu_2 : \hat\mu_3 : \hat\mu_4)\\),
/// the constant schedule of the biquadratic forms.
pub(crate) const MUHAT: [u16; 4] = [0x0021, 0x000B, 0x0011, 0x0031];

/// Basis-change constants \\((\hat\kappa_1 : \hat\kappa_2 : \hat\kappa_3 :
/// \hat\kappa_4)\\) for the compression-side transform.
pub(crate) const KHAT: [u16; 4] = [0x3C1, 0x80, 0x239, 0x449];

/// Dot-product constants \\((\kappa_1 : \kappa_2 : \kappa_3 : \kappa_4)\\)
/// with sign pattern \\((+,-,-,+)\\), used by the diagonal biquadratics.
pub(crate) const KAPPA: [u16; 4] = [0x1259, 0x173F, 0x1679, 0x07C7];

/// Coefficients of the compression polynomials K_2, K_3, K_4.
pub(crate) const Q: [u16; 8] = [
    0x0DF7, 0x2599, 0x1211, 0x2FE3, 0x2C0B, 0x1D33, 0x1779, 0xABD7,
];

/// The curve constant \\(C\\) of the quadratic relation
/// \\(B_{jj} R_i^2 - 2 C B_{ij} R_i R_j + B_{ii} R_j^2 = 0\\).
pub(crate) const CURVE_C: FieldElement = FieldElement(0x40f50eefa320a2dd46f7e3d8cddda843);

/// The fixed base point, in wrapped form \\((X/Y, X/Z, X/T)\\).
///
/// Wrapping is precomputed so that the fixed-base ladder starts with a
/// single unwrap instead of an inversion.
pub(crate) const BASEPOINT_WRAPPED: WrappedPoint = WrappedPoint {
    Y: FieldElement(0x1be0c3dc_2049c2e7_aeb351a6_4e931a48),
    Z: FieldElement(0x23b416cd_8eaba630_64659818_e07e36df),
    T: FieldElement(0x5db35c38_4447a24d_c7ae3d05_7215441e),
};
