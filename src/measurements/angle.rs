// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 the survnet-core contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::ops::{Add, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{constants, Measurement, PhysicalQuantity, UnitOfMeasure};

/// Bearing unit with decimal degrees as the canonical unit (`spec.md` §4.2).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AngleUnit {
    /// `D`: decimal degrees, clockwise from grid north.
    Degrees,
    /// `R`: grads (400 per circle).
    Grads,
}

impl UnitOfMeasure<f64> for AngleUnit {
    fn quantity() -> PhysicalQuantity {
        PhysicalQuantity::Angle
    }

    fn si() -> Self {
        Self::Degrees
    }

    fn to_si(&self, value: &f64) -> f64 {
        match self {
            Self::Degrees => *value,
            Self::Grads => value / constants::GRADS_IN_DEGREE_DIVISOR,
        }
    }

    fn from_si(value: f64, to: &Self) -> f64 {
        match to {
            Self::Degrees => value,
            Self::Grads => value * constants::GRADS_IN_DEGREE_DIVISOR,
        }
    }
}

/// An angle, canonically stored in decimal degrees.
pub type Angle = Measurement<f64, AngleUnit>;

impl Angle {
    pub fn deg(value: f64) -> Self {
        Self {
            value,
            unit: AngleUnit::Degrees,
        }
    }

    pub fn grads(value: f64) -> Self {
        Self {
            value,
            unit: AngleUnit::Grads,
        }
    }

    /// Normalises a bearing in degrees to `[0, 360)`.
    pub fn normalized_deg(&self) -> f64 {
        let deg = self.to_si();
        let wrapped = deg % constants::DEGREES_IN_CIRCLE;
        if wrapped < 0.0 {
            wrapped + constants::DEGREES_IN_CIRCLE
        } else {
            wrapped
        }
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::deg(self.to_si() + rhs.to_si())
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::deg(self.to_si() - rhs.to_si())
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::deg(-self.to_si())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grads_convert_to_degrees() {
        let a = Angle::grads(400.0);
        assert!((a.to_si() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn normalized_wraps_negative() {
        let a = Angle::deg(-30.0);
        assert!((a.normalized_deg() - 330.0).abs() < 1e-9);
    }

    #[test]
    fn normalized_wraps_over_circle() {
        let a = Angle::deg(370.0);
        assert!((a.normalized_deg() - 10.0).abs() < 1e-9);
    }
}
