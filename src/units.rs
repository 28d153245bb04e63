//! This module defines various unit types and their conversions.
//!
//! Prices and efficiencies are carried as `f64` newtypes. Power quantities used by the dispatch
//! algorithm are held in fixed point as whole tenths of a megawatt ([`Tenths`]), so that repeated
//! 0.1 MW steps never accumulate binary floating-point error.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a dimensionless quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl Dimensionless {
    /// Whether the underlying value is finite
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

macro_rules! unit_struct {
    ($name:ident, $suffix:literal) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", self.0, $suffix)
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Power, " MW");

// Derived quantities
unit_struct!(MoneyPerEnergy, " EUR/MWh");
unit_struct!(MoneyPerMass, " EUR/t");
unit_struct!(MassPerEnergy, " t/MWh");

// Multiplication rules
impl_mul!(MassPerEnergy, MoneyPerMass, MoneyPerEnergy);

/// A power quantity expressed as a whole number of tenths of a megawatt.
///
/// This is the allocation granularity of the dispatch algorithm.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
    derive_more::SubAssign,
    derive_more::Sum,
)]
pub struct Tenths(pub i64);

impl Tenths {
    /// No power at all
    pub const ZERO: Tenths = Tenths(0);

    /// The smallest allocation step (0.1 MW)
    pub const STEP: Tenths = Tenths(1);

    /// Convert from megawatts, rounding to the nearest tenth (halves round up).
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_power(power: Power) -> Self {
        Tenths((power.0 * 10.0 + 0.5).floor() as i64)
    }

    /// Convert from megawatts, first truncating toward zero to a whole megawatt.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_power_whole_mw(power: Power) -> Self {
        Tenths(power.0.trunc() as i64 * 10)
    }

    /// Convert back to megawatts
    #[allow(clippy::cast_precision_loss)]
    pub fn to_power(self) -> Power {
        Power(self.0 as f64 / 10.0)
    }

    /// The absolute value
    pub fn abs(self) -> Self {
        Tenths(self.0.abs())
    }

    /// Whether this quantity is strictly positive
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_power())
    }
}
