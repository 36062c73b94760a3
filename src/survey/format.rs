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

//! The format descriptor: an 11, 12 or 13 character string governing unit
//! interpretation and column order for a survey's shot rows (`spec.md` §3,
//! §4.2).

use crate::project::LrudAttach;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BearingUnit {
    Degrees,
    Quadrant,
    Grads,
}

/// Shared by the length and passage positions of the descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceUnit {
    DecimalFeet,
    FeetAndInches,
    Meters,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InclinationUnit {
    Degrees,
    PercentGrade,
    DegreesAndMinutes,
    Grads,
    DepthGauge,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LrudItem {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShotItem {
    Length,
    Azimuth,
    Inclination,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BacksightMode {
    #[default]
    None,
    Redundant,
}

/// A parsed format descriptor (`spec.md` §3 `Format descriptor`).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatDescriptor {
    pub bearing_unit: BearingUnit,
    pub length_unit: DistanceUnit,
    pub passage_unit: DistanceUnit,
    pub inclination_unit: InclinationUnit,
    pub lrud_order: [LrudItem; 4],
    pub shot_item_order: [ShotItem; 3],
    pub backsight_mode: BacksightMode,
    pub lrud_attach: LrudAttach,
}

impl FormatDescriptor {
    /// Parses the raw `FORMAT:` value. The string must be 11, 12 or 13
    /// uppercase characters; anything else is `survey.header`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let chars: Vec<char> = raw.chars().collect();
        if !(11..=13).contains(&chars.len()) {
            return Err(format!(
                "format descriptor must be 11, 12 or 13 characters, found {} (\"{raw}\")",
                chars.len()
            ));
        }

        let bearing_unit = match chars[0] {
            'D' => BearingUnit::Degrees,
            'Q' => BearingUnit::Quadrant,
            'R' => BearingUnit::Grads,
            c => return Err(format!("unknown bearing unit '{c}'")),
        };
        let length_unit = parse_distance_unit(chars[1])?;
        let passage_unit = parse_distance_unit(chars[2])?;
        let inclination_unit = match chars[3] {
            'D' => InclinationUnit::Degrees,
            'G' => InclinationUnit::PercentGrade,
            'M' => InclinationUnit::DegreesAndMinutes,
            'R' => InclinationUnit::Grads,
            'W' => InclinationUnit::DepthGauge,
            c => return Err(format!("unknown inclination unit '{c}'")),
        };

        let lrud_order = parse_lrud_order(&chars[4..8])?;
        let shot_item_order = parse_shot_item_order(&chars[8..11])?;

        let backsight_mode = if chars.len() >= 12 {
            match chars[11] {
                'B' => BacksightMode::Redundant,
                'N' => BacksightMode::None,
                c => return Err(format!("unknown backsight mode '{c}'")),
            }
        } else {
            BacksightMode::None
        };

        let lrud_attach = if chars.len() == 13 {
            match chars[12] {
                'F' => LrudAttach::From,
                'T' => LrudAttach::To,
                c => return Err(format!("unknown LRUD attach side '{c}'")),
            }
        } else {
            LrudAttach::From
        };

        if backsight_mode == BacksightMode::Redundant && inclination_unit == InclinationUnit::DepthGauge {
            return Err(
                "redundant backsight and depth-gauge inclination are mutually exclusive".to_string(),
            );
        }

        Ok(Self {
            bearing_unit,
            length_unit,
            passage_unit,
            inclination_unit,
            lrud_order,
            shot_item_order,
            backsight_mode,
            lrud_attach,
        })
    }
}

fn parse_distance_unit(c: char) -> Result<DistanceUnit, String> {
    match c {
        'D' => Ok(DistanceUnit::DecimalFeet),
        'I' => Ok(DistanceUnit::FeetAndInches),
        'M' => Ok(DistanceUnit::Meters),
        other => Err(format!("unknown distance unit '{other}'")),
    }
}

fn parse_lrud_order(chars: &[char]) -> Result<[LrudItem; 4], String> {
    let mut order = [LrudItem::Left; 4];
    for (i, c) in chars.iter().enumerate() {
        order[i] = match c {
            'L' => LrudItem::Left,
            'R' => LrudItem::Right,
            'U' => LrudItem::Up,
            'D' => LrudItem::Down,
            other => return Err(format!("unknown LRUD-order character '{other}'")),
        };
    }
    if !is_permutation(&order) {
        return Err("LRUD order must use L, R, U, D exactly once each".to_string());
    }
    Ok(order)
}

fn is_permutation(order: &[LrudItem; 4]) -> bool {
    let mut seen = [false; 4];
    for item in order {
        let idx = match item {
            LrudItem::Left => 0,
            LrudItem::Right => 1,
            LrudItem::Up => 2,
            LrudItem::Down => 3,
        };
        if seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

fn parse_shot_item_order(chars: &[char]) -> Result<[ShotItem; 3], String> {
    let mut order = [ShotItem::Length; 3];
    for (i, c) in chars.iter().enumerate() {
        order[i] = match c {
            'L' => ShotItem::Length,
            'A' => ShotItem::Azimuth,
            'D' => ShotItem::Inclination,
            other => return Err(format!("unknown shot-item character '{other}'")),
        };
    }
    let mut seen = [false; 3];
    for item in &order {
        let idx = match item {
            ShotItem::Length => 0,
            ShotItem::Azimuth => 1,
            ShotItem::Inclination => 2,
        };
        if seen[idx] {
            return Err("shot-item order must use L, A, D exactly once each".to_string());
        }
        seen[idx] = true;
    }
    Ok(order)
}
