//! Physical dimension vectors (`unitDimension`).

use std::ops::{Div, Mul};

use pmdh5::AttrValue;
use serde::{Deserialize, Serialize};

/// Exponents over the seven SI base quantities, in openPMD order:
/// length, mass, time, current, temperature, amount of substance,
/// luminous intensity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitDimension(pub [f64; 7]);

impl UnitDimension {
    pub const DIMENSIONLESS: Self = Self([0.0; 7]);
    pub const LENGTH: Self = Self::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    pub const MASS: Self = Self::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    pub const TIME: Self = Self::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
    pub const CURRENT: Self = Self::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0);
    pub const TEMPERATURE: Self = Self::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    pub const AMOUNT: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    pub const LUMINOUS_INTENSITY: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    /// C = A s
    pub const CHARGE: Self = Self([0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
    /// C / m^3
    pub const CHARGE_DENSITY: Self = Self([-3.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
    /// V / m = kg m / (A s^3)
    pub const ELECTRIC_FIELD: Self = Self([1.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0]);
    /// kg m / s
    pub const MOMENTUM: Self = Self([1.0, 1.0, -1.0, 0.0, 0.0, 0.0, 0.0]);

    pub const fn new(
        length: f64,
        mass: f64,
        time: f64,
        current: f64,
        temperature: f64,
        amount: f64,
        luminous_intensity: f64,
    ) -> Self {
        Self([length, mass, time, current, temperature, amount, luminous_intensity])
    }

    /// Raise the quantity to `power` (scales every exponent).
    pub fn powf(self, power: f64) -> Self {
        Self(self.0.map(|e| e * power))
    }

    pub fn as_array(&self) -> [f64; 7] {
        self.0
    }
}

impl Mul for UnitDimension {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o += r;
        }
        Self(out)
    }
}

impl Div for UnitDimension {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self * rhs.powf(-1.0)
    }
}

impl From<UnitDimension> for AttrValue {
    fn from(dim: UnitDimension) -> Self {
        AttrValue::F64Array(dim.0.to_vec())
    }
}
