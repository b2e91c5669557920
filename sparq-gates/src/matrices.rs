//! Canonical gate matrices
//!
//! Fixed gates are `const` arrays; parametrized families are generated
//! analytically from their angle. All matrices are row-major and act on
//! the basis ordering `|0⟩, |1⟩` (two-qubit gates: `|00⟩ .. |11⟩` with the
//! first target as the low bit).

use num_complex::Complex64;
use sparq_core::complex::{I, ONE, ZERO};

/// 2x2 single-qubit matrix
pub type Matrix2 = [[Complex64; 2]; 2];
/// 4x4 two-qubit matrix
pub type Matrix4 = [[Complex64; 4]; 4];

const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);
const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// I = [[1, 0], [0, 1]]
pub const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];

/// H = 1/√2 [[1, 1], [1, -1]]
pub const HADAMARD: Matrix2 = [
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(INV_SQRT2, 0.0)],
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(-INV_SQRT2, 0.0)],
];

/// X = [[0, 1], [1, 0]]
pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

/// Y = [[0, -i], [i, 0]]
pub const PAULI_Y: Matrix2 = [[ZERO, NEG_I], [I, ZERO]];

/// Z = [[1, 0], [0, -1]]
pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// S = [[1, 0], [0, i]]
pub const S_GATE: Matrix2 = [[ONE, ZERO], [ZERO, I]];

/// S† = [[1, 0], [0, -i]]
pub const S_INVERSE: Matrix2 = [[ONE, ZERO], [ZERO, NEG_I]];

/// T = [[1, 0], [0, e^(iπ/4)]]
pub const T_GATE: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)]];

/// T† = [[1, 0], [0, e^(-iπ/4)]]
pub const T_INVERSE: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(INV_SQRT2, -INV_SQRT2)]];

/// SWAP exchanges `|01⟩` and `|10⟩`
pub const SWAP: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// iSWAP exchanges `|01⟩` and `|10⟩` with a phase of `i`
pub const ISWAP: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, I, ZERO],
    [ZERO, I, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// RX(θ) = [[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]
#[inline]
pub fn rotation_x(theta: f64) -> Matrix2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
        [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)],
    ]
}

/// RY(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]
#[inline]
pub fn rotation_y(theta: f64) -> Matrix2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
        [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)],
    ]
}

/// RZ(θ) = diag(e^(-iθ/2), e^(iθ/2))
#[inline]
pub fn rotation_z(theta: f64) -> Matrix2 {
    let half = theta / 2.0;
    [
        [Complex64::from_polar(1.0, -half), ZERO],
        [ZERO, Complex64::from_polar(1.0, half)],
    ]
}

/// R1(θ) = diag(1, e^(iθ))
#[inline]
pub fn phase(theta: f64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
}

/// R1(θ)† = diag(1, e^(-iθ))
#[inline]
pub fn phase_inverse(theta: f64) -> Matrix2 {
    phase(-theta)
}
