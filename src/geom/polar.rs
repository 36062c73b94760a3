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

use super::Vector3D;

/// A shot expressed as slope distance, azimuth and inclination.
///
/// Azimuth is degrees clockwise from grid north; inclination is the signed
/// elevation angle in degrees, positive going up (`spec.md` §2, §4.3).
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Polar {
    pub length: f64,
    pub azimuth_deg: f64,
    pub inclination_deg: f64,
}

impl Polar {
    pub fn new(length: f64, azimuth_deg: f64, inclination_deg: f64) -> Self {
        Self {
            length,
            azimuth_deg,
            inclination_deg,
        }
    }

    /// Converts this polar reading to a Cartesian delta in feet.
    ///
    /// `spec.md` §4.3 step 6: all angles are converted to radians for the
    /// trig; azimuth is measured clockwise from north, so east uses `sin`
    /// and north uses `cos`.
    pub fn to_vector(&self) -> Vector3D {
        let az = self.azimuth_deg.to_radians();
        let inc = self.inclination_deg.to_radians();
        let horizontal = self.length * inc.cos();

        Vector3D::new(
            horizontal * az.sin(),
            horizontal * az.cos(),
            self.length * inc.sin(),
        )
    }

    /// Recovers the polar reading implied by a Cartesian delta.
    ///
    /// A zero-length vector returns `azimuth = inclination = 0.0` rather
    /// than `NaN`, so the solver's "zero-length shot is an identity
    /// correction" rule (`spec.md` §8) doesn't need a special case.
    pub fn from_vector(v: &Vector3D) -> Self {
        let length = v.length();
        if length == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }

        let inclination_deg = (v.vertical / length).asin().to_degrees();
        let azimuth_deg = {
            let raw = v.east.atan2(v.north).to_degrees();
            if raw < 0.0 {
                raw + 360.0
            } else {
                raw
            }
        };

        Self::new(length, azimuth_deg, inclination_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} !~= {b}");
    }

    #[test]
    fn due_north_level() {
        let v = Polar::new(100.0, 0.0, 0.0).to_vector();
        assert_close(v.east, 0.0, 1e-9);
        assert_close(v.north, 100.0, 1e-9);
        assert_close(v.vertical, 0.0, 1e-9);
    }

    #[test]
    fn due_east_level() {
        let v = Polar::new(100.0, 90.0, 0.0).to_vector();
        assert_close(v.east, 100.0, 1e-9);
        assert_close(v.north, 0.0, 1e-9);
    }

    #[test]
    fn straight_up() {
        let v = Polar::new(50.0, 0.0, 90.0).to_vector();
        assert_close(v.east, 0.0, 1e-6);
        assert_close(v.north, 0.0, 1e-6);
        assert_close(v.vertical, 50.0, 1e-9);
    }

    #[test]
    fn round_trip_is_identity() {
        for len in [1.0, 37.5, 250.0] {
            for az in [0.0, 30.0, 90.0, 180.0, 270.0, 359.0] {
                for inc in [-89.0, -45.0, 0.0, 45.0, 89.0] {
                    let p = Polar::new(len, az, inc);
                    let v = p.to_vector();
                    let back = Polar::from_vector(&v);
                    assert_close(back.length, p.length, 1e-9);
                    assert_close(back.inclination_deg, p.inclination_deg, 1e-7);
                    // Azimuth is undefined for purely vertical shots; skip
                    // near the poles where atan2 is numerically unstable.
                    if inc.abs() < 89.0 {
                        assert_close(back.azimuth_deg, p.azimuth_deg, 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn zero_length_round_trips_to_zero() {
        let v = Vector3D::ZERO;
        let p = Polar::from_vector(&v);
        assert_eq!(p.length, 0.0);
        assert_eq!(p.azimuth_deg, 0.0);
        assert_eq!(p.inclination_deg, 0.0);
    }
}
