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

//! Per-record-type content parsing. [`super::lexer`] hands us the raw,
//! already-delimited content of one record; this module turns that text
//! into typed values, per the grammar in `spec.md` §4.1/§6.

use crate::error::Error;
use crate::measurements::LengthUnit;

use super::lexer::{split_numeric_fields, split_top_level};

/// One entry in a file's comma list: either a bare link station name, or a
/// fixed station declared as `name[unit,east,north,vertical]`.
#[derive(Clone, Debug, PartialEq)]
pub enum FileMember {
    Link(String),
    Fixed(FixedStationSpec),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FixedStationSpec {
    pub name: String,
    pub unit: LengthUnit,
    pub east: f64,
    pub north: f64,
    pub vertical: f64,
}

fn parse_f64(field: &str, line: usize) -> Result<f64, Error> {
    field.trim().parse::<f64>().map_err(|_| Error::ProjectParse {
        line,
        message: format!("expected a number, found \"{}\"", field.trim()),
    })
}

fn parse_i32(field: &str, line: usize) -> Result<i32, Error> {
    field.trim().parse::<i32>().map_err(|_| Error::ProjectParse {
        line,
        message: format!("expected an integer, found \"{}\"", field.trim()),
    })
}

/// `#<path>[,<link-or-fixed>]*;`
pub fn parse_file_entry(content: &str, line: usize) -> Result<(String, Vec<FileMember>), Error> {
    let parts = split_top_level(content, ',');
    let mut parts = parts.into_iter();

    let path = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::ProjectParse {
            line,
            message: "file entry has no path".to_string(),
        })?;

    let mut members = Vec::new();
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        members.push(parse_member(part, line)?);
    }

    Ok((path, members))
}

fn parse_member(part: &str, line: usize) -> Result<FileMember, Error> {
    match part.find('[') {
        None => Ok(FileMember::Link(part.to_string())),
        Some(bracket_start) => {
            let name = part[..bracket_start].trim().to_string();
            let rest = &part[bracket_start + 1..];
            let inner = rest.strip_suffix(']').unwrap_or(rest);

            let unit_char = inner.chars().next().ok_or_else(|| Error::ProjectParse {
                line,
                message: format!("empty fixed-station brackets for \"{name}\""),
            })?;
            let unit = match unit_char {
                'F' | 'f' => LengthUnit::Feet,
                'M' | 'm' => LengthUnit::Meters,
                other => {
                    return Err(Error::ProjectParse {
                        line,
                        message: format!("unknown fixed-station unit '{other}' for \"{name}\""),
                    })
                }
            };

            let fields = split_numeric_fields(&inner[unit_char.len_utf8()..]);
            if fields.len() != 3 {
                return Err(Error::ProjectParse {
                    line,
                    message: format!(
                        "fixed station \"{name}\" needs east,north,vertical, found {} field(s)",
                        fields.len()
                    ),
                });
            }

            Ok(FileMember::Fixed(FixedStationSpec {
                name,
                unit,
                east: parse_f64(&fields[0], line)?,
                north: parse_f64(&fields[1], line)?,
                vertical: parse_f64(&fields[2], line)?,
            }))
        }
    }
}

/// `@<east>,<north>,<elev>,<zone>,<conv>;` (meters, meters, meters, integer, degrees)
pub struct BaseLocation {
    pub east_m: f64,
    pub north_m: f64,
    pub elevation_m: f64,
    pub zone: i32,
    pub convergence_deg: f64,
}

pub fn parse_base(content: &str, line: usize) -> Result<BaseLocation, Error> {
    let fields = split_numeric_fields(content);
    if fields.len() != 5 {
        return Err(Error::ProjectParse {
            line,
            message: format!(
                "base location needs 5 fields (east,north,elev,zone,conv), found {}",
                fields.len()
            ),
        });
    }

    Ok(BaseLocation {
        east_m: parse_f64(&fields[0], line)?,
        north_m: parse_f64(&fields[1], line)?,
        elevation_m: parse_f64(&fields[2], line)?,
        zone: parse_i32(&fields[3], line)?,
        convergence_deg: parse_f64(&fields[4], line)?,
    })
}

/// `%<number>;` or `*<number>;`
pub fn parse_convergence_value(content: &str, line: usize) -> Result<f64, Error> {
    parse_f64(content.trim(), line)
}

/// `$<integer>;`
pub fn parse_zone(content: &str, line: usize) -> Result<i32, Error> {
    parse_i32(content.trim(), line)
}

/// `[<folder-name>;`
pub fn parse_folder_name(content: &str) -> String {
    content.trim().to_string()
}

/// `&<datum string>;`
pub fn parse_datum(content: &str) -> String {
    content.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_link_list() {
        let (path, members) = parse_file_entry("survey1.dat,A1,A2", 1).unwrap();
        assert_eq!(path, "survey1.dat");
        assert_eq!(
            members,
            vec![
                FileMember::Link("A1".to_string()),
                FileMember::Link("A2".to_string())
            ]
        );
    }

    #[test]
    fn parses_fixed_station_member() {
        let (_, members) = parse_file_entry("s.dat,A1[F,100,200,300]", 1).unwrap();
        assert_eq!(
            members,
            vec![FileMember::Fixed(FixedStationSpec {
                name: "A1".to_string(),
                unit: LengthUnit::Feet,
                east: 100.0,
                north: 200.0,
                vertical: 300.0,
            })]
        );
    }

    #[test]
    fn parses_mixed_links_and_fixed() {
        let (_, members) = parse_file_entry("s.dat,A1,B2[M,1,2,3],A1", 1).unwrap();
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn base_location_parses_five_fields() {
        let base = parse_base("500000,4000000,120,17,1.25", 1).unwrap();
        assert_eq!(base.zone, 17);
        assert_eq!(base.convergence_deg, 1.25);
    }

    #[test]
    fn malformed_zone_is_fatal() {
        let err = parse_base("1,2,3,not-a-number,5", 9).unwrap_err();
        assert!(matches!(err, Error::ProjectParse { line: 9, .. }));
    }
}
