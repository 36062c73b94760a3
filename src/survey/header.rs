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

//! Survey header parsing (`spec.md` §4.2): the cave name on line 1, then
//! label-anchored fields in any order, with `DECLINATION:`, `FORMAT:`,
//! `CORRECTIONS:` and `CORRECTIONS2:` co-resident on one line.

use crate::error::Error;

use super::format::FormatDescriptor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const LABELS: &[&str] = &[
    "SURVEY NAME:",
    "SURVEY DATE:",
    "COMMENT:",
    "SURVEY TEAM:",
    "DECLINATION:",
    "FORMAT:",
    "CORRECTIONS2:",
    "CORRECTIONS:",
];

/// `month/day/year`; absent defaults to `1/1/1` (`spec.md` §3 `Survey`).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurveyDate {
    pub month: u32,
    pub day: u32,
    pub year: i32,
}

impl Default for SurveyDate {
    fn default() -> Self {
        Self { month: 1, day: 1, year: 1 }
    }
}

/// Front-sight correction factors (`spec.md` §3 `Survey`).
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrontsightCorrections {
    pub azimuth_deg: f64,
    pub inclination_deg: f64,
    pub length_ft: f64,
}

/// Back-sight correction factors (`spec.md` §3 `Survey`).
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BacksightCorrections {
    pub azimuth_deg: f64,
    pub inclination_deg: f64,
}

/// A parsed survey header, everything but the shot rows.
#[derive(Clone, PartialEq, Debug)]
pub struct SurveyHeader {
    pub cave_name: String,
    pub survey_name: String,
    pub date: SurveyDate,
    pub comment: Option<String>,
    pub team: Vec<String>,
    pub declination_deg: f64,
    pub format: FormatDescriptor,
    pub corrections: FrontsightCorrections,
    pub corrections2: BacksightCorrections,
}

fn find_labelled_values(text: &str) -> Vec<(&'static str, String)> {
    let mut hits: Vec<(usize, &'static str)> = Vec::new();
    for label in LABELS {
        let mut search_start = 0usize;
        while let Some(pos) = text[search_start..].find(label) {
            let absolute = search_start + pos;
            hits.push((absolute, label));
            search_start = absolute + label.len();
        }
    }
    hits.sort_by_key(|(pos, _)| *pos);

    let mut values = Vec::with_capacity(hits.len());
    for (i, (pos, label)) in hits.iter().enumerate() {
        let value_start = pos + label.len();
        let value_end = hits.get(i + 1).map(|(next, _)| *next).unwrap_or(text.len());
        values.push((*label, text[value_start..value_end].trim().to_string()));
    }
    values
}

fn parse_date(raw: &str) -> SurveyDate {
    let parts: Vec<&str> = raw.split('/').map(str::trim).collect();
    if parts.len() != 3 {
        return SurveyDate::default();
    }
    let month = parts[0].parse().unwrap_or(1);
    let day = parts[1].parse().unwrap_or(1);
    let year = parts[2].parse().unwrap_or(1);
    SurveyDate { month, day, year }
}

fn parse_floats<const N: usize>(raw: &str) -> [f64; N] {
    let mut values = [0.0; N];
    for (i, token) in raw.split_whitespace().take(N).enumerate() {
        values[i] = token.parse().unwrap_or(0.0);
    }
    values
}

/// Parses one survey's header block (the text between the form-feed
/// separator and the first shot row). `cave_name` is carried in from the
/// file's first line, shared across every survey in the file.
pub fn parse_header(cave_name: &str, block: &str, file: &str) -> Result<SurveyHeader, Error> {
    let values = find_labelled_values(block);

    let mut survey_name = None;
    let mut date = SurveyDate::default();
    let mut comment = None;
    let mut team = Vec::new();
    let mut declination_deg = 0.0;
    let mut format_raw = None;
    let mut corrections = FrontsightCorrections::default();
    let mut corrections2 = BacksightCorrections::default();

    for (label, value) in values {
        match label {
            "SURVEY NAME:" => survey_name = Some(value),
            "SURVEY DATE:" => date = parse_date(&value),
            "COMMENT:" => comment = Some(value).filter(|s| !s.is_empty()),
            "SURVEY TEAM:" => {
                team = value
                    .split(|c| c == ',' || c == ';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "DECLINATION:" => declination_deg = value.parse().unwrap_or(0.0),
            "FORMAT:" => format_raw = Some(value),
            "CORRECTIONS:" => {
                let [az, inc, len] = parse_floats::<3>(&value);
                corrections = FrontsightCorrections {
                    azimuth_deg: az,
                    inclination_deg: inc,
                    length_ft: len,
                };
            }
            "CORRECTIONS2:" => {
                let [az, inc] = parse_floats::<2>(&value);
                corrections2 = BacksightCorrections {
                    azimuth_deg: az,
                    inclination_deg: inc,
                };
            }
            _ => {}
        }
    }

    let survey_name = survey_name.unwrap_or_else(|| "(unnamed)".to_string());

    let format_raw = format_raw.ok_or_else(|| Error::SurveyHeader {
        file: file.to_string(),
        survey: survey_name.clone(),
        message: "missing FORMAT: field".to_string(),
    })?;
    let format = FormatDescriptor::parse(&format_raw).map_err(|message| Error::SurveyHeader {
        file: file.to_string(),
        survey: survey_name.clone(),
        message,
    })?;

    Ok(SurveyHeader {
        cave_name: cave_name.to_string(),
        survey_name,
        date,
        comment,
        team,
        declination_deg,
        format,
        corrections,
        corrections2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declination_line_fields_together() {
        let block = "SURVEY NAME: A1\nDECLINATION: 1.5 FORMAT: DDDDLRUDLAD CORRECTIONS: 0 0 0 CORRECTIONS2: 0 0\n";
        let header = parse_header("Mystery Cave", block, "f.dat").unwrap();
        assert_eq!(header.survey_name, "A1");
        assert_eq!(header.declination_deg, 1.5);
        assert_eq!(header.corrections.length_ft, 0.0);
    }

    #[test]
    fn missing_format_is_fatal_for_survey() {
        let block = "SURVEY NAME: A1\nDECLINATION: 0\n";
        let err = parse_header("Mystery Cave", block, "f.dat").unwrap_err();
        assert!(matches!(err, Error::SurveyHeader { .. }));
    }

    #[test]
    fn absent_date_defaults_to_1_1_1() {
        let block = "FORMAT: DDDDLRUDLAD\n";
        let header = parse_header("Cave", block, "f.dat").unwrap();
        assert_eq!(header.date, SurveyDate { month: 1, day: 1, year: 1 });
    }

    #[test]
    fn team_splits_on_commas() {
        let block = "SURVEY TEAM: Alice, Bob ; Carol\nFORMAT: DDDDLRUDLAD\n";
        let header = parse_header("Cave", block, "f.dat").unwrap();
        assert_eq!(header.team, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn corrections_label_does_not_swallow_corrections2() {
        let block = "FORMAT: DDDDLRUDLAD\nCORRECTIONS: 1 2 3 CORRECTIONS2: 4 5\n";
        let header = parse_header("Cave", block, "f.dat").unwrap();
        assert_eq!(header.corrections.azimuth_deg, 1.0);
        assert_eq!(header.corrections2.azimuth_deg, 4.0);
    }
}
