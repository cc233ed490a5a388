//! Omrekening tussen Euler-hoeken en 3×3 rotatiematrices.
//!
//! De rotatievolgorde ligt vast: `R = Rz(z) · Ry(y) · Rx(x)`. Een vector wordt
//! eerst om X gedraaid, dan om Y en dan om Z (om de vaste wereldassen).
//! Matrices worden rij-georiënteerd als negen waarden opgeslagen.

use serde::{Deserialize, Serialize};

use super::ValueError;

/// Aantal elementen van een 3×3 matrix.
pub const MATRIX_LEN: usize = 9;

const IDENTITY: [f64; MATRIX_LEN] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
const GIMBAL_EPSILON: f64 = 1e-9;

/// Eenheid waarin hoeken worden uitgedrukt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }

    fn from_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => round_to(angle.to_degrees(), 3),
            Self::Radians => angle,
        }
    }
}

/// Haalt de hoeken `[x, y, z]` uit een rij-georiënteerde rotatiematrix.
///
/// Bij gimbal lock (`m[6] = ±1`) is de Z-hoek nul en neemt de X-hoek de rest
/// van de rotatie op. Graden worden op drie decimalen afgerond.
pub fn matrix_to_euler(matrix: &[f64], unit: AngleUnit) -> Result<[f64; 3], ValueError> {
    let m = checked_matrix(matrix)?;

    let (x, y, z) = if (m[6].abs() - 1.0).abs() > GIMBAL_EPSILON {
        let y = -m[6].clamp(-1.0, 1.0).asin();
        let cos_y = y.cos();
        let x = (m[7] / cos_y).atan2(m[8] / cos_y);
        let z = (m[3] / cos_y).atan2(m[0] / cos_y);
        (x, y, z)
    } else if m[6] < 0.0 {
        (m[1].atan2(m[2]), std::f64::consts::FRAC_PI_2, 0.0)
    } else {
        ((-m[1]).atan2(-m[2]), -std::f64::consts::FRAC_PI_2, 0.0)
    };

    Ok([
        unit.from_radians(x),
        unit.from_radians(y),
        unit.from_radians(z),
    ])
}

/// Bouwt de rij-georiënteerde matrix `Rz(z) · Ry(y) · Rx(x)`.
#[must_use]
pub fn euler_to_matrix(x: f64, y: f64, z: f64, unit: AngleUnit) -> [f64; MATRIX_LEN] {
    let (sx, cx) = unit.to_radians(x).sin_cos();
    let (sy, cy) = unit.to_radians(y).sin_cos();
    let (sz, cz) = unit.to_radians(z).sin_cos();

    [
        cy * cz,
        cz * sy * sx - sz * cx,
        cz * sy * cx + sz * sx,
        cy * sz,
        sz * sy * sx + cz * cx,
        sz * sy * cx - cz * sx,
        -sy,
        cy * sx,
        cy * cx,
    ]
}

fn checked_matrix(matrix: &[f64]) -> Result<[f64; MATRIX_LEN], ValueError> {
    let m: [f64; MATRIX_LEN] = matrix.try_into().map_err(|_| ValueError::InvalidLength {
        expected: MATRIX_LEN,
        found: matrix.len(),
    })?;
    if m.iter().any(|value| !value.is_finite()) {
        return Err(ValueError::NonFinite);
    }
    Ok(m)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // Geen -0.0 in de UI.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Rotatiehoeken met de bijbehorende matrix, bij elke wijziging gesynchroniseerd.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Orientation {
    x: f64,
    y: f64,
    z: f64,
    unit: AngleUnit,
    matrix: [f64; MATRIX_LEN],
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity(AngleUnit::default())
    }
}

impl Orientation {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, unit: AngleUnit) -> Self {
        Self {
            x,
            y,
            z,
            unit,
            matrix: euler_to_matrix(x, y, z, unit),
        }
    }

    #[must_use]
    pub fn identity(unit: AngleUnit) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            unit,
            matrix: IDENTITY,
        }
    }

    /// Leidt de hoeken af uit `matrix`; de opgeslagen matrix wordt uit die
    /// hoeken opnieuw opgebouwd.
    pub fn from_matrix(matrix: &[f64], unit: AngleUnit) -> Result<Self, ValueError> {
        let [x, y, z] = matrix_to_euler(matrix, unit)?;
        Ok(Self::new(x, y, z, unit))
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.z
    }

    #[must_use]
    pub fn angles(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    #[must_use]
    pub fn matrix(&self) -> &[f64; MATRIX_LEN] {
        &self.matrix
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
        self.recompute();
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
        self.recompute();
    }

    pub fn set_z(&mut self, z: f64) {
        self.z = z;
        self.recompute();
    }

    /// Drukt de opgeslagen hoeken uit in `unit`.
    pub fn set_unit(&mut self, unit: AngleUnit) {
        if unit == self.unit {
            return;
        }
        let [x, y, z] = self.angles().map(|angle| self.unit.to_radians(angle));
        self.x = unit.from_radians(x);
        self.y = unit.from_radians(y);
        self.z = unit.from_radians(z);
        self.unit = unit;
        self.recompute();
    }

    /// Past de rotatie toe op `vector`.
    #[must_use]
    pub fn transform_vector(&self, vector: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        [
            m[0] * vector[0] + m[1] * vector[1] + m[2] * vector[2],
            m[3] * vector[0] + m[4] * vector[1] + m[5] * vector[2],
            m[6] * vector[0] + m[7] * vector[1] + m[8] * vector[2],
        ]
    }

    fn recompute(&mut self) {
        self.matrix = euler_to_matrix(self.x, self.y, self.z, self.unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: &[f64], b: &[f64], tolerance: f64) {
        assert_eq!(a.len(), b.len());
        for (lhs, rhs) in a.iter().zip(b) {
            assert!((lhs - rhs).abs() <= tolerance, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_matrix_yields_zero_angles() {
        let angles = matrix_to_euler(&IDENTITY, AngleUnit::Degrees).unwrap();
        assert_eq!(angles, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_angles_yield_identity_matrix() {
        approx_eq(
            &euler_to_matrix(0.0, 0.0, 0.0, AngleUnit::Radians),
            &IDENTITY,
            EPSILON,
        );
    }

    #[test]
    fn round_trip_preserves_angles() {
        let samples = [
            [10.0, 20.0, 30.0],
            [-45.0, 60.0, 170.0],
            [179.0, -89.0, -120.0],
            [0.0, 0.0, 90.0],
            [33.3, -12.5, 0.0],
        ];
        for [x, y, z] in samples {
            let matrix = euler_to_matrix(x, y, z, AngleUnit::Degrees);
            let angles = matrix_to_euler(&matrix, AngleUnit::Degrees).unwrap();
            approx_eq(&angles, &[x, y, z], 0.01);
        }
    }

    #[test]
    fn round_trip_in_radians_is_not_rounded() {
        let matrix = euler_to_matrix(0.1234567, -0.5, 1.0, AngleUnit::Radians);
        let angles = matrix_to_euler(&matrix, AngleUnit::Radians).unwrap();
        approx_eq(&angles, &[0.1234567, -0.5, 1.0], 1e-12);
    }

    #[test]
    fn degrees_are_rounded_to_three_decimals() {
        let matrix = euler_to_matrix(12.345_678, 0.0, 0.0, AngleUnit::Degrees);
        let angles = matrix_to_euler(&matrix, AngleUnit::Degrees).unwrap();
        assert_eq!(angles[0], 12.346);
    }

    #[test]
    fn gimbal_lock_with_negative_m6_fixes_z() {
        let matrix = euler_to_matrix(30.0, 90.0, 0.0, AngleUnit::Degrees);
        approx_eq(&[matrix[6]], &[-1.0], EPSILON);

        let angles = matrix_to_euler(&matrix, AngleUnit::Degrees).unwrap();
        approx_eq(&angles, &[30.0, 90.0, 0.0], 0.01);
    }

    #[test]
    fn gimbal_lock_with_exact_matrix() {
        let matrix = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0];
        let angles = matrix_to_euler(&matrix, AngleUnit::Degrees).unwrap();
        assert_eq!(angles, [0.0, 90.0, 0.0]);
    }

    #[test]
    fn gimbal_lock_with_positive_m6() {
        let matrix = euler_to_matrix(-40.0, -90.0, 0.0, AngleUnit::Degrees);
        let angles = matrix_to_euler(&matrix, AngleUnit::Degrees).unwrap();
        approx_eq(&angles, &[-40.0, -90.0, 0.0], 0.01);

        let rebuilt = euler_to_matrix(angles[0], angles[1], angles[2], AngleUnit::Degrees);
        approx_eq(&rebuilt, &matrix, 1e-4);
    }

    #[test]
    fn matrix_must_have_nine_entries() {
        let err = matrix_to_euler(&[1.0, 0.0, 0.0], AngleUnit::Degrees).unwrap_err();
        assert_eq!(
            err,
            ValueError::InvalidLength {
                expected: 9,
                found: 3
            }
        );
    }

    #[test]
    fn non_finite_entries_are_rejected() {
        let mut matrix = IDENTITY;
        matrix[4] = f64::NAN;
        assert_eq!(
            matrix_to_euler(&matrix, AngleUnit::Radians),
            Err(ValueError::NonFinite)
        );
    }

    #[test]
    fn setters_keep_matrix_in_sync() {
        let mut orientation = Orientation::identity(AngleUnit::Degrees);
        orientation.set_z(90.0);
        approx_eq(
            orientation.matrix(),
            &euler_to_matrix(0.0, 0.0, 90.0, AngleUnit::Degrees),
            EPSILON,
        );

        // +X draait om Z naar +Y.
        approx_eq(
            &orientation.transform_vector([1.0, 0.0, 0.0]),
            &[0.0, 1.0, 0.0],
            EPSILON,
        );

        orientation.set_x(90.0);
        orientation.set_y(-30.0);
        approx_eq(
            orientation.matrix(),
            &euler_to_matrix(90.0, -30.0, 90.0, AngleUnit::Degrees),
            EPSILON,
        );
    }

    #[test]
    fn changing_unit_converts_angles() {
        let mut orientation = Orientation::new(180.0, 0.0, 90.0, AngleUnit::Degrees);
        let before = *orientation.matrix();

        orientation.set_unit(AngleUnit::Radians);
        approx_eq(
            &orientation.angles(),
            &[std::f64::consts::PI, 0.0, std::f64::consts::FRAC_PI_2],
            EPSILON,
        );
        approx_eq(orientation.matrix(), &before, EPSILON);
    }

    #[test]
    fn from_matrix_round_trips() {
        let matrix = euler_to_matrix(15.0, 25.0, 35.0, AngleUnit::Degrees);
        let orientation = Orientation::from_matrix(&matrix, AngleUnit::Degrees).unwrap();
        approx_eq(&orientation.angles(), &[15.0, 25.0, 35.0], 0.01);
        approx_eq(orientation.matrix(), &matrix, 1e-4);
    }
}
