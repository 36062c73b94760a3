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

//! The survey-file parser (`spec.md` §4.2): form-feed separated surveys,
//! each with a label-anchored header and whitespace-separated shot rows.

pub mod format;
mod header;
mod shot;
mod units;

pub use format::{BacksightMode, BearingUnit, DistanceUnit, FormatDescriptor, InclinationUnit, LrudItem, ShotItem};
pub use header::{BacksightCorrections, FrontsightCorrections, SurveyDate, SurveyHeader};
pub use shot::{Backsight, Lrud, Shot, ShotFlags};
pub use units::InclinationReading;

use crate::error::Diagnostics;

const FORM_FEED: u8 = 0x0C;
const CTRL_Z: u8 = 0x1A;

/// A fully parsed survey: its header plus an ordered list of shots
/// (`spec.md` §3 `Survey`).
#[derive(Clone, PartialEq, Debug)]
pub struct Survey {
    pub header: SurveyHeader,
    pub shots: Vec<Shot>,
}

impl Survey {
    pub fn cave_name(&self) -> &str {
        &self.header.cave_name
    }

    pub fn survey_name(&self) -> &str {
        &self.header.survey_name
    }
}

fn bytes_to_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == CTRL_Z).unwrap_or(bytes.len());
    bytes[..end].iter().map(|&b| b as char).collect()
}

/// Splits `text` on form-feed bytes, each of which separates one survey
/// from the next regardless of whether it sits alone on a line or trails
/// the previous line (`spec.md` §4.2).
fn split_surveys(text: &str) -> Vec<&str> {
    text.split(FORM_FEED as char).collect()
}

/// Splits a single survey's text into its header block and shot-row lines.
/// The first blank line is the header/shot delimiter the format calls out
/// as "consumed and discarded"; everything before it is header text,
/// everything after is shot rows.
fn split_header_and_rows(block: &str) -> (&str, &str) {
    match block.find("\n\n") {
        Some(pos) => (&block[..pos], &block[pos + 2..]),
        None => (block, ""),
    }
}

/// Parses a survey-file byte stream into its constituent [`Survey`]s.
///
/// `file` labels any `survey.row` diagnostics produced; header failures are
/// fatal only for the offending survey (`spec.md` §7) — other surveys in
/// the stream still parse.
pub fn parse_survey(bytes: &[u8], file: &str) -> (Vec<Survey>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let text = bytes_to_text(bytes);

    let mut surveys = Vec::new();
    for block in split_surveys(&text) {
        if block.trim().is_empty() {
            continue;
        }

        let mut lines = block.lines();
        let cave_name = lines.next().unwrap_or("").trim().to_string();
        let rest: String = lines.collect::<Vec<_>>().join("\n");
        let (header_text, rows_text) = split_header_and_rows(&rest);

        let header = match header::parse_header(&cave_name, header_text, file) {
            Ok(header) => header,
            Err(err) => {
                diagnostics.push(err);
                continue;
            }
        };

        let mut shots = Vec::new();
        for (index, line) in rows_text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match shot::parse_shot_row(line, &header.format, file, &header.survey_name, index) {
                Ok(shot) => shots.push(shot),
                Err(err) => diagnostics.push(err),
            }
        }

        surveys.push(Survey { header, shots });
    }

    (surveys, diagnostics)
}
