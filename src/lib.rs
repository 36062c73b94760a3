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

//! Geometry and graph core for cave-survey processing.
//!
//! This crate turns a project of linked survey files — raw polar
//! measurements (tape length, compass bearing, inclination) between named
//! stations — into a coherent three-dimensional network of station
//! positions, with a distance-weighted traverse adjustment that removes the
//! positional seam a network with more than one fixed anchor otherwise
//! leaves behind.
//!
//! The plot-file emitter, GeoJSON/KML exporter, command-line surface and
//! any form of least-squares loop-closure are deliberately out of scope:
//! they're external collaborators that consume the [`network::SurveyNetwork`]
//! this crate produces.
//!
//! # Pipeline
//!
//! ```ignore
//! use std::collections::HashMap;
//! use survnet_core::{network, project, propagate, solve, survey};
//!
//! let project_bytes = std::fs::read("cave.mak")?;
//! let project = project::parse_project(&project_bytes)?;
//!
//! let mut surveys_by_file = HashMap::new();
//! for file in &project.files {
//!     let bytes = std::fs::read(&file.path)?;
//!     let (surveys, diagnostics) = survey::parse_survey(&bytes, &file.path);
//!     for d in diagnostics.iter() {
//!         log::warn!("{d}");
//!     }
//!     surveys_by_file.insert(file.path.clone(), surveys);
//! }
//!
//! let (mut net, _diagnostics) = network::assemble(&project, &surveys_by_file);
//! propagate::propagate(&mut net);
//! let (positions, _diagnostics) = solve::adjust(&mut net);
//!
//! for (name, position) in &positions {
//!     println!("{name}: {position}");
//! }
//! # Ok::<(), survnet_core::error::Error>(())
//! ```

pub mod error;
pub mod geom;
pub mod geomag;
pub mod kernel;
pub mod measurements;
pub mod network;
pub mod project;
pub mod propagate;
pub mod solve;
pub mod survey;

pub use error::{Diagnostics, Error};
pub use geom::{Polar, Vector3D};
pub use network::SurveyNetwork;
pub use project::Project;
pub use survey::Survey;
