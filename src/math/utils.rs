// src/math/utils.rs

/// Mathematical constants used by the grid and hull code.
pub mod constants {
    pub const EPSILON: f64 = 1e-9;
    pub const SQRT_3: f64 = 1.732_050_807_568_877_2;
    pub const TAU: f64 = std::f64::consts::TAU;
}

/// Float comparisons with tolerance.
pub mod comparison {
    use super::constants::EPSILON;

    /// Checks whether two floats are (nearly) equal.
    pub fn nearly_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Checks whether a float is (nearly) zero.
    pub fn nearly_zero(a: f64) -> bool {
        a.abs() < EPSILON
    }
}
