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

use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Polar;

/// A point or displacement in feet, east/north/vertical.
///
/// `Vector3D` is the sole position representation the core uses past the
/// kernel: stations, shot deltas and solver corrections are all expressed in
/// this frame (`spec.md` §3). It carries no unit tag because feet is the
/// crate's fixed internal unit for this quantity — see
/// [`crate::measurements::Length`] for the unit-tagged form used while still
/// parsing a reading.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3D {
    pub east: f64,
    pub north: f64,
    pub vertical: f64,
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D {
        east: 0.0,
        north: 0.0,
        vertical: 0.0,
    };

    pub fn new(east: f64, north: f64, vertical: f64) -> Self {
        Self {
            east,
            north,
            vertical,
        }
    }

    /// Euclidean length of this vector, in feet.
    pub fn length(&self) -> f64 {
        (self.east * self.east + self.north * self.north + self.vertical * self.vertical).sqrt()
    }

    /// Converts this displacement to its polar representation: slope
    /// distance, azimuth in degrees clockwise from north, and inclination in
    /// degrees above the horizontal.
    ///
    /// `len = 0` returns a zero-length polar with `azimuth = inclination =
    /// 0.0`, matching the solver's convention that a zero-length shot
    /// contributes an identity correction (`spec.md` §8).
    pub fn to_polar(&self) -> Polar {
        Polar::from_vector(self)
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(
            self.east + rhs.east,
            self.north + rhs.north,
            self.vertical + rhs.vertical,
        )
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(
            self.east - rhs.east,
            self.north - rhs.north,
            self.vertical - rhs.vertical,
        )
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Vector3D {
        Vector3D::new(-self.east, -self.north, -self.vertical)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f64) -> Vector3D {
        Vector3D::new(self.east * rhs, self.north * rhs, self.vertical * rhs)
    }
}

impl Display for Vector3D {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.east, self.north, self.vertical)
    }
}
