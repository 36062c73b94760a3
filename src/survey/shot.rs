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

//! Shot rows (`spec.md` §3 `Shot (raw)`, §4.2).

use crate::error::Error;

use super::format::{BacksightMode, FormatDescriptor, LrudItem, ShotItem};
use super::units::{self, InclinationReading};

const SENTINEL: f64 = -999.0;

/// Passage-wall distances at a station; a negative reading means "passage" /
/// not measured and is dropped to `None` (`spec.md` §4.2).
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Lrud {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub up: Option<f64>,
    pub down: Option<f64>,
}

/// A shot's optional backsight reading, kept distinct from "backsight of
/// zero" per the Design Notes' present/absent guidance.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Backsight {
    Absent,
    Present {
        azimuth2_deg: Option<f64>,
        inclination2_deg: Option<f64>,
    },
}

/// Per-shot flags, a subset of `{L, P, X, C}` (`spec.md` §4.5).
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct ShotFlags {
    /// `X`: excluded from the network entirely.
    pub exclude: bool,
    /// `L`: excluded from length statistics only.
    pub length_exclude: bool,
    /// `P`: flagged for the exporter to omit from plots.
    pub plot_omit: bool,
    /// `C`: not adjusted by the solver.
    pub closure_exclude: bool,
}

impl ShotFlags {
    fn parse(token: &str) -> Self {
        let mut flags = Self::default();
        let inner = token.trim_matches('#').trim_start_matches('|');
        for c in inner.chars() {
            match c {
                'X' => flags.exclude = true,
                'L' => flags.length_exclude = true,
                'P' => flags.plot_omit = true,
                'C' => flags.closure_exclude = true,
                _ if c.is_whitespace() => {}
                other => log::trace!("ignoring unrecognised shot flag '{other}'"),
            }
        }
        flags
    }
}

/// A raw shot as read from a survey file, before kernel conversion to a
/// Cartesian delta.
#[derive(Clone, PartialEq, Debug)]
pub struct Shot {
    pub from: String,
    pub to: String,
    pub length_ft: f64,
    /// `None` when the sentinel `-999` disables azimuth usage (vertical shot).
    pub azimuth_deg: Option<f64>,
    /// `None` when the sentinel `-999` is present in this position.
    pub inclination: Option<InclinationReading>,
    pub lrud: Lrud,
    pub backsight: Backsight,
    pub flags: ShotFlags,
    pub comment: Option<String>,
}

struct Token<'a> {
    text: &'a str,
    end: usize,
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        tokens.push(Token {
            text: &line[start..i],
            end: i,
        });
    }
    tokens
}

fn parse_field(token: &str, file: &str, survey: &str, index: usize) -> Result<f64, Error> {
    token.parse::<f64>().map_err(|_| Error::SurveyRow {
        file: file.to_string(),
        survey: survey.to_string(),
        index,
        message: format!("expected a number, found \"{token}\""),
    })
}

/// Parses one whitespace-separated shot row according to `format`.
///
/// Column layout: `from to` then, per `spec.md` §4.2, the shot-item order
/// (length/azimuth/inclination, 3 columns) followed by the LRUD order (4
/// columns); then 2 more columns (`azimuth2`, `inclination2`) if the format
/// declares a redundant backsight; then an optional `#|<chars>#` flag token;
/// anything left on the line is the comment.
pub fn parse_shot_row(
    line: &str,
    format: &FormatDescriptor,
    file: &str,
    survey: &str,
    index: usize,
) -> Result<Shot, Error> {
    let tokens = tokenize(line);

    let has_backsight = format.backsight_mode == BacksightMode::Redundant;
    let required = 2 + 3 + 4 + if has_backsight { 2 } else { 0 };

    if tokens.len() < required {
        return Err(Error::SurveyRow {
            file: file.to_string(),
            survey: survey.to_string(),
            index,
            message: format!(
                "shot row has {} column(s), expected at least {required}",
                tokens.len()
            ),
        });
    }

    let from = tokens[0].text.to_string();
    let to = tokens[1].text.to_string();

    let mut cursor = 2;
    let mut length_raw = None;
    let mut azimuth_raw = None;
    let mut inclination_raw = None;
    for item in &format.shot_item_order {
        let value = parse_field(tokens[cursor].text, file, survey, index)?;
        match item {
            ShotItem::Length => length_raw = Some(value),
            ShotItem::Azimuth => azimuth_raw = Some(value),
            ShotItem::Inclination => inclination_raw = Some(value),
        }
        cursor += 1;
    }
    let length_raw = length_raw.expect("shot_item_order always includes Length");
    let azimuth_raw = azimuth_raw.expect("shot_item_order always includes Azimuth");
    let inclination_raw = inclination_raw.expect("shot_item_order always includes Inclination");

    let mut lrud = Lrud::default();
    for item in &format.lrud_order {
        let value = parse_field(tokens[cursor].text, file, survey, index)?;
        let reading = if value < 0.0 {
            None
        } else {
            Some(units::distance_to_feet(value, format.passage_unit))
        };
        match item {
            LrudItem::Left => lrud.left = reading,
            LrudItem::Right => lrud.right = reading,
            LrudItem::Up => lrud.up = reading,
            LrudItem::Down => lrud.down = reading,
        }
        cursor += 1;
    }

    let backsight = if has_backsight {
        let az2_raw = parse_field(tokens[cursor].text, file, survey, index)?;
        cursor += 1;
        let inc2_raw = parse_field(tokens[cursor].text, file, survey, index)?;
        cursor += 1;

        let azimuth2_deg = if az2_raw == SENTINEL {
            None
        } else {
            Some(units::bearing_to_degrees(az2_raw, format.bearing_unit))
        };
        let inclination2_deg = if inc2_raw == SENTINEL {
            None
        } else {
            match units::inclination_to_reading(inc2_raw, format.inclination_unit) {
                InclinationReading::Degrees(d) => Some(d),
                InclinationReading::DepthDelta(d) => Some(d),
            }
        };
        Backsight::Present {
            azimuth2_deg,
            inclination2_deg,
        }
    } else {
        Backsight::Absent
    };

    let mut flags = ShotFlags::default();
    if let Some(token) = tokens.get(cursor) {
        if token.text.starts_with('#') {
            flags = ShotFlags::parse(token.text);
            cursor += 1;
        }
    }

    let comment = tokens.get(cursor).map(|t| line[t.end - t.text.len()..].trim().to_string());
    let comment = comment.filter(|s| !s.is_empty());

    let length_ft = units::distance_to_feet(length_raw, format.length_unit);
    let azimuth_deg = if azimuth_raw == SENTINEL {
        None
    } else {
        Some(units::bearing_to_degrees(azimuth_raw, format.bearing_unit))
    };
    let inclination = if inclination_raw == SENTINEL {
        None
    } else {
        Some(units::inclination_to_reading(inclination_raw, format.inclination_unit))
    };

    Ok(Shot {
        from,
        to,
        length_ft,
        azimuth_deg,
        inclination,
        lrud,
        backsight,
        flags,
        comment,
    })
}
