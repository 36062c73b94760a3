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

//! The shot-to-delta kernel (`spec.md` §4.3): backsight reconciliation,
//! instrument corrections, declination, convergence and the final
//! polar→Cartesian conversion.

use crate::error::{Diagnostics, Error};
use crate::geom::{Polar, Vector3D};
use crate::measurements::Angle;
use crate::survey::{Backsight, BacksightCorrections, BacksightMode, FrontsightCorrections, InclinationReading, Shot};

/// Everything about a shot's owning survey (and project) that the kernel
/// needs but that isn't carried on the [`Shot`] itself.
pub struct KernelContext {
    pub declination_deg: f64,
    pub corrections: FrontsightCorrections,
    pub corrections2: BacksightCorrections,
    pub backsight_mode: BacksightMode,
    /// `None` if convergence isn't applied for this file at all (`spec.md` §4.5).
    pub convergence_deg: Option<f64>,
}

fn average_circular_degrees(a: f64, b: f64) -> f64 {
    let diff = ((b - a + 540.0) % 360.0) - 180.0;
    Angle::deg(a + diff / 2.0).normalized_deg()
}

/// Reconciles two independently-optional readings of the same quantity,
/// per `spec.md` §4.3 step 1: average if both are defined, otherwise use
/// whichever is defined.
fn reconcile<F>(front: Option<f64>, back: Option<f64>, average: F) -> Option<f64>
where
    F: Fn(f64, f64) -> f64,
{
    match (front, back) {
        (Some(f), Some(b)) => Some(average(f, b)),
        (Some(f), None) => Some(f),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Converts one raw shot into a Cartesian delta, in feet, from its `from`
/// station to its `to` station. Returns any `geom.domain` diagnostics
/// raised along the way (`spec.md` §4.3).
pub fn shot_to_delta(shot: &Shot, ctx: &KernelContext) -> (Vector3D, Diagnostics) {
    let mut diagnostics = Diagnostics::new();

    let length_ft = shot.length_ft + ctx.corrections.length_ft;

    let is_depth_gauge = matches!(shot.inclination, Some(InclinationReading::DepthDelta(_)));

    let frontsight_az = shot.azimuth_deg.map(|az| az + ctx.corrections.azimuth_deg);
    let frontsight_inc_deg = match shot.inclination {
        Some(InclinationReading::Degrees(inc)) => Some(inc + ctx.corrections.inclination_deg),
        _ => None,
    };

    let (combined_az, combined_inc_deg) = if ctx.backsight_mode == BacksightMode::Redundant {
        let (az2, inc2) = match shot.backsight {
            Backsight::Present {
                azimuth2_deg,
                inclination2_deg,
            } => (azimuth2_deg, inclination2_deg),
            Backsight::Absent => (None, None),
        };

        let az2_corrected = az2.map(|v| v + ctx.corrections2.azimuth_deg);
        let inc2_corrected = inc2.map(|v| v + ctx.corrections2.inclination_deg);

        let reversed_az2 = az2_corrected.map(|v| Angle::deg(v + 180.0).normalized_deg());
        let reversed_inc2 = inc2_corrected.map(|v| -v);

        (
            reconcile(frontsight_az, reversed_az2, average_circular_degrees),
            reconcile(frontsight_inc_deg, reversed_inc2, |a, b| (a + b) / 2.0),
        )
    } else {
        (frontsight_az, frontsight_inc_deg)
    };

    let azimuth_after_declination = combined_az.map(|az| az + ctx.declination_deg);
    let azimuth_final = match ctx.convergence_deg {
        Some(convergence) => azimuth_after_declination.map(|az| az - convergence),
        None => azimuth_after_declination,
    };

    let inclination_final_deg = if is_depth_gauge {
        let raw_depth = match shot.inclination {
            Some(InclinationReading::DepthDelta(d)) => d,
            _ => unreachable!("is_depth_gauge implies a DepthDelta reading"),
        };

        if length_ft <= 0.0 {
            Some(0.0)
        } else {
            let depth = if raw_depth.abs() > length_ft {
                let clamped = length_ft.copysign(raw_depth);
                diagnostics.push(Error::GeomDomain {
                    message: format!(
                        "depth-gauge delta {raw_depth} exceeds shot length {length_ft}; clamped to {clamped}"
                    ),
                });
                clamped
            } else {
                raw_depth
            };
            Some((depth / length_ft).clamp(-1.0, 1.0).asin().to_degrees())
        }
    } else {
        combined_inc_deg
    };

    let delta = match azimuth_final {
        Some(azimuth_deg) => Polar {
            length: length_ft,
            azimuth_deg,
            inclination_deg: inclination_final_deg.unwrap_or(0.0),
        }
        .to_vector(),
        None => {
            // `spec.md` §8: an azimuth sentinel means a vertical shot, whose
            // delta is purely vertical with sign matching the inclination.
            let sign = inclination_final_deg.map(f64::signum).unwrap_or(1.0);
            Vector3D::new(0.0, 0.0, length_ft * sign)
        }
    };

    (delta, diagnostics)
}
