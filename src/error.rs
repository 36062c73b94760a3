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

//! The error taxonomy from `spec.md` §7, plus the [`Diagnostics`]
//! accumulator used by every entry point that keeps going after a problem
//! instead of aborting.

use std::error;
use std::fmt;

/// One diagnosed problem, tagged by the `kind.subkind` naming from
/// `spec.md` §7 (`project.parse`, `survey.row`, …).
#[derive(Clone, PartialEq, Debug)]
pub enum Error {
    /// `project.parse`: a malformed record. Fatal — aborts `parse_project`.
    ProjectParse { line: usize, message: String },

    /// `project.structure`: unmatched folder brackets. Fatal — aborts
    /// `parse_project`.
    ProjectStructure { message: String },

    /// `survey.header`: a missing/malformed required header field. Fatal
    /// for that survey only; other surveys in the file still parse.
    SurveyHeader {
        file: String,
        survey: String,
        message: String,
    },

    /// `survey.row`: a malformed shot row. The row is skipped.
    SurveyRow {
        file: String,
        survey: String,
        index: usize,
        message: String,
    },

    /// `geom.domain`: an out-of-range depth-gauge reading or failed unit
    /// conversion, auto-repaired by clamping.
    GeomDomain { message: String },

    /// `network.duplicate`: a station name collision the assembler could
    /// not resolve via link stations; the station was renamed.
    NetworkDuplicate { name: String, file: String },

    /// `network.disconnected`: a station unreachable from any anchor. The
    /// station is omitted from solver output.
    NetworkDisconnected { station: String },

    /// `solver.residual`: informational — misclosure still exceeds a
    /// configurable threshold after clamped adjustment.
    SolverResidual {
        anchor_a: String,
        anchor_b: String,
        residual_ft: f64,
    },
}

impl Error {
    /// The dotted taxonomy name from `spec.md` §7, e.g. `"survey.row"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProjectParse { .. } => "project.parse",
            Self::ProjectStructure { .. } => "project.structure",
            Self::SurveyHeader { .. } => "survey.header",
            Self::SurveyRow { .. } => "survey.row",
            Self::GeomDomain { .. } => "geom.domain",
            Self::NetworkDuplicate { .. } => "network.duplicate",
            Self::NetworkDisconnected { .. } => "network.disconnected",
            Self::SolverResidual { .. } => "solver.residual",
        }
    }

    /// Whether this kind of problem always aborts the call that raised it
    /// (as opposed to being accumulated into a [`Diagnostics`] buffer while
    /// the caller keeps going).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ProjectParse { .. } | Self::ProjectStructure { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectParse { line, message } => {
                write!(f, "project.parse at line {line}: {message}")
            }
            Self::ProjectStructure { message } => write!(f, "project.structure: {message}"),
            Self::SurveyHeader {
                file,
                survey,
                message,
            } => write!(f, "survey.header in {file} ({survey}): {message}"),
            Self::SurveyRow {
                file,
                survey,
                index,
                message,
            } => write!(
                f,
                "survey.row in {file} ({survey}) shot #{index}: {message}"
            ),
            Self::GeomDomain { message } => write!(f, "geom.domain: {message}"),
            Self::NetworkDuplicate { name, file } => {
                write!(f, "network.duplicate: \"{name}\" renamed in {file}")
            }
            Self::NetworkDisconnected { station } => {
                write!(f, "network.disconnected: \"{station}\" unreachable from any anchor")
            }
            Self::SolverResidual {
                anchor_a,
                anchor_b,
                residual_ft,
            } => write!(
                f,
                "solver.residual: {residual_ft:.4} ft remaining between {anchor_a} and {anchor_b}"
            ),
        }
    }
}

impl error::Error for Error {}

/// An ordered buffer of non-aborting [`Error`]s accumulated while a parse,
/// assembly, propagation or adjustment proceeds.
#[derive(Clone, Default, Debug)]
pub struct Diagnostics(Vec<Error>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: Error) {
        log::warn!("{error}");
        self.0.push(error);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.0.iter()
    }

    /// Diagnostics of a given taxonomy kind, e.g. `"network.disconnected"`.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Error> {
        self.0.iter().filter(move |e| e.kind() == kind)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
