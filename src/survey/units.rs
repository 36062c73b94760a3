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

//! Unit conversions applied while parsing shot rows (`spec.md` §4.2).
//! Inclination conversion is split out as [`InclinationReading`] because a
//! depth-gauge reading isn't an angle until the kernel divides it by the
//! shot length (`spec.md` §4.3 step 5).

use super::format::{BearingUnit, DistanceUnit, InclinationUnit};
use crate::measurements::constants::FEET_IN_METER;

/// An inclination value as read off the instrument, before the kernel's
/// depth-gauge handling.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum InclinationReading {
    Degrees(f64),
    /// A depth-gauge delta (from minus to, positive = shallower), still in
    /// feet; not yet an angle.
    DepthDelta(f64),
}

/// Converts a length or passage-dimension reading to decimal feet.
pub fn distance_to_feet(value: f64, unit: DistanceUnit) -> f64 {
    match unit {
        DistanceUnit::DecimalFeet => value,
        DistanceUnit::Meters => value * FEET_IN_METER,
        DistanceUnit::FeetAndInches => feet_and_inches_to_feet(value),
    }
}

/// Converts a bearing reading to decimal degrees clockwise from north.
///
/// Quadrant bearings (`Q`) are assumed to already be recorded as a signed
/// decimal-degree azimuth by the time they reach this column — the format
/// only tags the recording convention, it doesn't change the column's
/// numeric shape — so `Q` and `D` both pass the value through unchanged.
pub fn bearing_to_degrees(value: f64, unit: BearingUnit) -> f64 {
    match unit {
        BearingUnit::Degrees | BearingUnit::Quadrant => value,
        BearingUnit::Grads => grads_to_degrees(value),
    }
}

/// Converts an inclination reading per its unit; depth-gauge readings are
/// returned unconverted for the kernel to resolve against shot length.
pub fn inclination_to_reading(value: f64, unit: InclinationUnit) -> InclinationReading {
    match unit {
        InclinationUnit::Degrees => InclinationReading::Degrees(value),
        InclinationUnit::PercentGrade => InclinationReading::Degrees((value / 100.0).atan().to_degrees()),
        InclinationUnit::DegreesAndMinutes => InclinationReading::Degrees(degrees_and_minutes_to_degrees(value)),
        InclinationUnit::Grads => InclinationReading::Degrees(grads_to_degrees(value)),
        InclinationUnit::DepthGauge => InclinationReading::DepthDelta(value),
    }
}

fn grads_to_degrees(value: f64) -> f64 {
    value * (360.0 / 400.0)
}

/// Decodes the `DDD.MM` integer+fraction convention: the whole part is
/// degrees, the fractional part (read as a two-digit number) is minutes.
fn degrees_and_minutes_to_degrees(value: f64) -> f64 {
    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    let value = value.abs();
    let degrees = value.trunc();
    let minutes = (value.fract() * 100.0).round();
    sign * (degrees + minutes / 60.0)
}

/// Decodes the same `DDD.II` integer+fraction convention for feet+inches.
fn feet_and_inches_to_feet(value: f64) -> f64 {
    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    let value = value.abs();
    let feet = value.trunc();
    let inches = (value.fract() * 100.0).round();
    sign * (feet + inches / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meters_convert_to_feet() {
        let ft = distance_to_feet(1.0, DistanceUnit::Meters);
        assert!((ft - FEET_IN_METER).abs() < 1e-9);
    }

    #[test]
    fn feet_and_inches_decode() {
        let ft = distance_to_feet(5.06, DistanceUnit::FeetAndInches);
        assert!((ft - 5.5).abs() < 1e-9);
    }

    #[test]
    fn grads_convert_bearing() {
        assert!((bearing_to_degrees(400.0, BearingUnit::Grads) - 360.0).abs() < 1e-9);
    }

    #[test]
    fn percent_grade_converts_via_arctan() {
        let reading = inclination_to_reading(100.0, InclinationUnit::PercentGrade);
        match reading {
            InclinationReading::Degrees(d) => assert!((d - 45.0).abs() < 1e-9),
            _ => panic!("expected degrees"),
        }
    }

    #[test]
    fn degrees_and_minutes_decode() {
        let reading = inclination_to_reading(10.30, InclinationUnit::DegreesAndMinutes);
        match reading {
            InclinationReading::Degrees(d) => assert!((d - 10.5).abs() < 1e-9),
            _ => panic!("expected degrees"),
        }
    }

    #[test]
    fn depth_gauge_passes_through_unconverted() {
        let reading = inclination_to_reading(-10.0, InclinationUnit::DepthGauge);
        assert_eq!(reading, InclinationReading::DepthDelta(-10.0));
    }

    #[test]
    fn negative_degrees_and_minutes_decode() {
        let reading = inclination_to_reading(-10.30, InclinationUnit::DegreesAndMinutes);
        match reading {
            InclinationReading::Degrees(d) => assert!((d - (-10.5)).abs() < 1e-9),
            _ => panic!("expected degrees"),
        }
    }
}
