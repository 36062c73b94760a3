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

//! The geomagnetic-variation collaborator (`spec.md` §6, §9 Open Question).
//!
//! A survey whose project flag `A` selects [`DeclinationMode::Computed`]
//! (`spec.md` §4.5, `crate::project::DeclinationMode`) needs a declination
//! value the kernel cannot derive on its own. `spec.md` §9 leaves the model
//! unspecified ("implementations must specify one and document it"); this
//! crate answers it with NOAA's World Magnetic Model via
//! [`world_magnetic_model`].
//!
//! This trait, not a concrete call, is what `kernel.rs` and the assembler are
//! written against, so a host can substitute another model (a fixed lookup
//! table, a different epoch of WMM) without touching either.
//!
//! Computing a declination needs a geographic latitude/longitude; this
//! crate's network lives in a local east/north/vertical frame in feet (§3),
//! and projecting that frame's UTM base back to geographic coordinates is
//! explicitly the GeoJSON/KML exporter's job (§1, out of scope). Callers
//! using [`DeclinationMode::Computed`] therefore supply the latitude and
//! longitude themselves (typically by projecting `Project::base` through
//! their own datum/UTM machinery) rather than handing this module a
//! `Project` to derive them from.

use chrono::{Datelike, NaiveDate};

use crate::error::Error;

/// Declination-on-demand, at a geographic location and date, in degrees.
pub trait GeomagneticModel {
    fn declination_deg(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        elevation_ft: f64,
        date: NaiveDate,
    ) -> Result<f64, Error>;
}

/// The default collaborator, backed by the World Magnetic Model.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldMagneticModel;

impl GeomagneticModel for WorldMagneticModel {
    fn declination_deg(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        elevation_ft: f64,
        date: NaiveDate,
    ) -> Result<f64, Error> {
        use world_magnetic_model::time::Date as WmmDate;
        use world_magnetic_model::uom::si::angle::degree;
        use world_magnetic_model::uom::si::f32::{Angle as WmmAngle, Length as WmmLength};
        use world_magnetic_model::uom::si::length::meter;
        use world_magnetic_model::GeomagneticField;

        let elevation_m = elevation_ft / crate::measurements::constants::FEET_IN_METER;

        let wmm_date = WmmDate::from_calendar_date(
            date.year(),
            time_month(date.month()).ok_or_else(|| Error::GeomDomain {
                message: format!("invalid month {} for geomagnetic computation", date.month()),
            })?,
            date.day() as u8,
        )
        .map_err(|e| Error::GeomDomain {
            message: format!("invalid date for geomagnetic computation: {e}"),
        })?;

        let field = GeomagneticField::new(
            WmmLength::new::<meter>(elevation_m as f32),
            WmmAngle::new::<degree>(latitude_deg as f32),
            WmmAngle::new::<degree>(longitude_deg as f32),
            wmm_date,
        )
        .map_err(|e| Error::GeomDomain {
            message: format!("World Magnetic Model rejected inputs: {e:?}"),
        })?;

        Ok(field.declination().get::<degree>() as f64)
    }
}

fn time_month(month: u32) -> Option<world_magnetic_model::time::Month> {
    world_magnetic_model::time::Month::try_from(month as u8).ok()
}
