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

//! The network assembler (`spec.md` §4.5): merges shots across files under
//! link-based renaming, materialises fixed stations, and builds the cached
//! adjacency the propagator and solver both walk.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexSet;

use crate::error::{Diagnostics, Error};
use crate::kernel::{self, KernelContext};
use crate::measurements::{Length, LengthUnit};
use crate::project::{FileEntry, FixedStation, Project};
use crate::survey::{Shot, Survey};

use super::station::{NetworkShot, NetworkShotFlags, Station};
use super::SurveyNetwork;

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Resolves whether a shot-level flag actually applies, per the `spec.md`
/// §4.5 gating table: the project's master switch and the flag's own
/// per-letter switch must both fail to disable it.
fn flag_effective(master: Option<bool>, specific: Option<bool>, raw: bool) -> bool {
    raw && master.unwrap_or(true) && specific.unwrap_or(true)
}

/// Renames raw station names against the running global namespace as one
/// file's shots are read (`spec.md` §4.5).
///
/// Starting `namespace` empty and applying the same rule to every file —
/// including the first — is what makes "the first file's stations enter the
/// global namespace unmodified" fall out on its own: with nothing in the
/// namespace yet, no name can collide.
struct Renamer<'a> {
    stem: String,
    links: &'a [String],
    namespace: &'a mut IndexSet<String>,
    resolved: HashMap<String, String>,
}

impl<'a> Renamer<'a> {
    fn new(stem: String, links: &'a [String], namespace: &'a mut IndexSet<String>) -> Self {
        Self {
            stem,
            links,
            namespace,
            resolved: HashMap::new(),
        }
    }

    /// Resolves `raw` to its final network name, caching the decision so
    /// every occurrence of the same raw name within this file maps
    /// consistently.
    fn resolve(&mut self, raw: &str, diagnostics: &mut Diagnostics, file: &str) -> String {
        if let Some(existing) = self.resolved.get(raw) {
            return existing.clone();
        }

        let is_link = self.links.iter().any(|l| l == raw);
        let final_name = if is_link && self.namespace.contains(raw) {
            raw.to_string()
        } else if self.namespace.contains(raw) {
            let renamed = format!("{}:{}", self.stem, raw);
            diagnostics.push(Error::NetworkDuplicate {
                name: raw.to_string(),
                file: file.to_string(),
            });
            renamed
        } else {
            raw.to_string()
        };

        self.namespace.insert(final_name.clone());
        self.resolved.insert(raw.to_string(), final_name.clone());
        final_name
    }
}

/// Resolves the declination the kernel should apply for `survey`, per
/// `spec.md` §4.5's `I`/`E`/`A` project flags.
///
/// `DeclinationMode::Computed` (`A`) asks for a geomagnetic-model lookup
/// (`crate::geomag`), which needs a geographic latitude/longitude this
/// crate's local east/north/vertical frame doesn't carry (projecting the
/// project's UTM base back to geographic coordinates is the GeoJSON/KML
/// exporter's job, `spec.md` §1). A host that wants `A` honoured computes
/// the value itself and overwrites `Survey::header::declination_deg` before
/// calling [`assemble`]; absent that, this falls back to the value as
/// entered and logs why.
fn resolve_declination_deg(project: &Project, survey: &Survey) -> f64 {
    let entered = survey.header.declination_deg;
    match project.flags.declination_mode {
        Some(crate::project::DeclinationMode::Ignore) => 0.0,
        Some(crate::project::DeclinationMode::Computed) => {
            log::warn!(
                "survey \"{}\": declination mode 'A' (computed) requires a geographic \
                 latitude/longitude this crate's local frame doesn't carry; falling back \
                 to the declination as entered. See crate::geomag for the collaborator a \
                 host can wire in ahead of calling assemble().",
                survey.header.survey_name
            );
            entered
        }
        Some(crate::project::DeclinationMode::AsEntered) | None => entered,
    }
}

fn kernel_context(survey: &Survey, convergence_deg: Option<f64>, project: &Project) -> KernelContext {
    KernelContext {
        declination_deg: resolve_declination_deg(project, survey),
        corrections: survey.header.corrections,
        corrections2: survey.header.corrections2,
        backsight_mode: survey.header.format.backsight_mode,
        convergence_deg,
    }
}

fn materialise_fixed(network: &mut SurveyNetwork, fixed: &FixedStation) {
    let east_ft = Length::new(fixed.east, fixed.unit).to_si();
    let north_ft = Length::new(fixed.north, fixed.unit).to_si();
    let vertical_ft = Length::new(fixed.vertical, fixed.unit).to_si();
    let position = crate::geom::Vector3D::new(east_ft, north_ft, vertical_ft);

    let station = network
        .stations
        .entry(fixed.name.clone())
        .or_insert_with(|| Station::new(fixed.name.clone()));
    station.position = Some(position);
    station.origin = Some(fixed.name.clone());
    station.fixed = true;

    network.anchors.insert(fixed.name.clone());
}

fn push_shot(network: &mut SurveyNetwork, shot: NetworkShot) {
    let index = network.shots.len();
    network
        .adjacency
        .entry(shot.from.clone())
        .or_default()
        .push((shot.to.clone(), index));
    network
        .adjacency
        .entry(shot.to.clone())
        .or_default()
        .push((shot.from.clone(), index));
    network.shots.push(shot);
}

fn ensure_station(network: &mut SurveyNetwork, name: &str) {
    network
        .stations
        .entry(name.to_string())
        .or_insert_with(|| Station::new(name.to_string()));
}

fn assemble_file(
    network: &mut SurveyNetwork,
    namespace: &mut IndexSet<String>,
    file: &FileEntry,
    surveys: &[Survey],
    project: &Project,
    diagnostics: &mut Diagnostics,
) {
    let stem = file_stem(&file.path);
    let mut renamer = Renamer::new(stem, &file.links, namespace);
    let convergence_deg = project.effective_convergence_deg(file);

    for survey in surveys {
        let ctx = kernel_context(survey, convergence_deg, project);

        for shot in &survey.shots {
            if !flag_effective(
                project.flags.apply_shot_flags,
                project.flags.apply_exclude_flag,
                shot.flags.exclude,
            ) {
                record_shot(network, &mut renamer, file, project, &ctx, shot, diagnostics);
            }
        }
    }
}

fn record_shot(
    network: &mut SurveyNetwork,
    renamer: &mut Renamer<'_>,
    file: &FileEntry,
    project: &Project,
    ctx: &KernelContext,
    shot: &Shot,
    diagnostics: &mut Diagnostics,
) {
    let from = renamer.resolve(&shot.from, diagnostics, &file.path);
    let to = renamer.resolve(&shot.to, diagnostics, &file.path);
    ensure_station(network, &from);
    ensure_station(network, &to);

    let (delta, kernel_diagnostics) = kernel::shot_to_delta(shot, ctx);
    diagnostics.extend(kernel_diagnostics);

    let flags = NetworkShotFlags {
        length_exclude: flag_effective(
            project.flags.apply_shot_flags,
            project.flags.apply_length_flag,
            shot.flags.length_exclude,
        ),
        plot_omit: flag_effective(
            project.flags.apply_shot_flags,
            project.flags.apply_plot_flag,
            shot.flags.plot_omit,
        ),
        closure_exclude: flag_effective(
            project.flags.apply_shot_flags,
            project.flags.apply_closure_flag,
            shot.flags.closure_exclude,
        ),
    };

    push_shot(
        network,
        NetworkShot {
            length_ft: delta.length(),
            from,
            to,
            delta,
            flags,
        },
    );
}

/// Builds a [`SurveyNetwork`] from a parsed [`Project`] and the surveys
/// parsed from each of its member files, keyed by [`FileEntry::path`]
/// (`spec.md` §4.5).
pub fn assemble(project: &Project, surveys_by_file: &HashMap<String, Vec<Survey>>) -> (SurveyNetwork, Diagnostics) {
    let mut network = SurveyNetwork::default();
    let mut namespace: IndexSet<String> = IndexSet::new();
    let mut diagnostics = Diagnostics::new();

    for file in &project.files {
        match surveys_by_file.get(&file.path) {
            Some(surveys) => {
                assemble_file(&mut network, &mut namespace, file, surveys, project, &mut diagnostics);
            }
            None => log::warn!("no surveys supplied for project file entry \"{}\"", file.path),
        }
    }

    // Fixed stations are merged after all shots are read (`spec.md` §4.4),
    // overriding any computed position and marking the station as an anchor.
    for file in &project.files {
        for fixed in &file.fixed {
            materialise_fixed(&mut network, fixed);
        }
    }

    (network, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ConvergenceOverride, ProjectFlags};
    use crate::survey::{
        Backsight, BacksightCorrections, FormatDescriptor, FrontsightCorrections, InclinationReading, Lrud, ShotFlags,
        SurveyDate, SurveyHeader,
    };

    fn format() -> FormatDescriptor {
        FormatDescriptor::parse("DDDDLRUDLAD").unwrap()
    }

    fn header(name: &str) -> SurveyHeader {
        SurveyHeader {
            cave_name: "Cave".to_string(),
            survey_name: name.to_string(),
            date: SurveyDate::default(),
            comment: None,
            team: Vec::new(),
            declination_deg: 0.0,
            format: format(),
            corrections: FrontsightCorrections::default(),
            corrections2: BacksightCorrections::default(),
        }
    }

    fn shot(from: &str, to: &str, length_ft: f64, azimuth_deg: f64, flags: ShotFlags) -> Shot {
        Shot {
            from: from.to_string(),
            to: to.to_string(),
            length_ft,
            azimuth_deg: Some(azimuth_deg),
            inclination: Some(InclinationReading::Degrees(0.0)),
            lrud: Lrud::default(),
            backsight: Backsight::Absent,
            flags,
            comment: None,
        }
    }

    fn file_entry(path: &str, links: Vec<String>, fixed: Vec<FixedStation>) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            links,
            fixed,
            folder: Vec::new(),
            convergence_override: None,
            zone_override: None,
        }
    }

    fn project_with(files: Vec<FileEntry>, flags: ProjectFlags) -> Project {
        Project {
            base: None,
            datum: None,
            convergence_override: None,
            zone_override: None,
            flags,
            files,
        }
    }

    #[test]
    fn single_file_stations_enter_unmodified() {
        let survey = Survey {
            header: header("S1"),
            shots: vec![shot("A1", "A2", 100.0, 0.0, ShotFlags::default())],
        };
        let project = project_with(vec![file_entry("one.dat", vec![], vec![])], ProjectFlags::default());
        let mut surveys = HashMap::new();
        surveys.insert("one.dat".to_string(), vec![survey]);

        let (network, diagnostics) = assemble(&project, &surveys);
        assert!(diagnostics.is_empty());
        assert!(network.stations.contains_key("A1"));
        assert!(network.stations.contains_key("A2"));
        assert_eq!(network.shots.len(), 1);
    }

    #[test]
    fn colliding_non_link_station_is_renamed() {
        let survey1 = Survey {
            header: header("S1"),
            shots: vec![shot("X1", "P", 100.0, 0.0, ShotFlags::default())],
        };
        let survey2 = Survey {
            header: header("S2"),
            shots: vec![shot("P", "X1", 50.0, 90.0, ShotFlags::default())],
        };
        let project = project_with(
            vec![
                file_entry("file1.dat", vec![], vec![]),
                file_entry("file2.dat", vec!["P".to_string()], vec![]),
            ],
            ProjectFlags::default(),
        );
        let mut surveys = HashMap::new();
        surveys.insert("file1.dat".to_string(), vec![survey1]);
        surveys.insert("file2.dat".to_string(), vec![survey2]);

        let (network, diagnostics) = assemble(&project, &surveys);
        assert!(network.stations.contains_key("P"));
        assert!(network.stations.contains_key("file2:X1"));
        assert_eq!(diagnostics.of_kind("network.duplicate").count(), 1);
    }

    #[test]
    fn excluded_flag_drops_shot_from_network() {
        let mut flags = ShotFlags::default();
        flags.exclude = true;
        let survey = Survey {
            header: header("S1"),
            shots: vec![shot("A1", "A2", 100.0, 0.0, flags)],
        };
        let mut project_flags = ProjectFlags::default();
        project_flags.apply_shot_flags = Some(true);
        project_flags.apply_exclude_flag = Some(true);
        let project = project_with(vec![file_entry("one.dat", vec![], vec![])], project_flags);
        let mut surveys = HashMap::new();
        surveys.insert("one.dat".to_string(), vec![survey]);

        let (network, _) = assemble(&project, &surveys);
        assert!(network.shots.is_empty());
        assert!(network.stations.is_empty());
    }

    #[test]
    fn exclude_flag_ignored_when_master_switch_off() {
        let mut flags = ShotFlags::default();
        flags.exclude = true;
        let survey = Survey {
            header: header("S1"),
            shots: vec![shot("A1", "A2", 100.0, 0.0, flags)],
        };
        let mut project_flags = ProjectFlags::default();
        project_flags.apply_shot_flags = Some(false);
        let project = project_with(vec![file_entry("one.dat", vec![], vec![])], project_flags);
        let mut surveys = HashMap::new();
        surveys.insert("one.dat".to_string(), vec![survey]);

        let (network, _) = assemble(&project, &surveys);
        assert_eq!(network.shots.len(), 1);
    }

    #[test]
    fn fixed_station_materialises_converted_and_marked_anchor() {
        let fixed = FixedStation {
            name: "A1".to_string(),
            unit: LengthUnit::Meters,
            east: 10.0,
            north: 0.0,
            vertical: 0.0,
        };
        let survey = Survey {
            header: header("S1"),
            shots: vec![shot("A1", "A2", 100.0, 0.0, ShotFlags::default())],
        };
        let project = project_with(
            vec![file_entry("one.dat", vec![], vec![fixed])],
            ProjectFlags::default(),
        );
        let mut surveys = HashMap::new();
        surveys.insert("one.dat".to_string(), vec![survey]);

        let (network, _) = assemble(&project, &surveys);
        let a1 = &network.stations["A1"];
        assert!(a1.fixed);
        assert_eq!(a1.origin.as_deref(), Some("A1"));
        assert!((a1.position.unwrap().east - 32.808398).abs() < 1e-3);
        assert!(network.anchors.contains("A1"));
    }

    #[test]
    fn ignore_declination_mode_zeroes_it_out() {
        let mut h = header("S1");
        h.declination_deg = 12.0;
        let survey = Survey {
            header: h,
            shots: vec![shot("A1", "A2", 100.0, 0.0, ShotFlags::default())],
        };
        let mut project_flags = ProjectFlags::default();
        project_flags.declination_mode = Some(crate::project::DeclinationMode::Ignore);
        let project = project_with(vec![file_entry("one.dat", vec![], vec![])], project_flags);
        let mut surveys = HashMap::new();
        surveys.insert("one.dat".to_string(), vec![survey]);

        let (network, _) = assemble(&project, &surveys);
        // Declination of 12 degrees would rotate the azimuth-0 shot off the
        // north axis; ignoring it keeps the delta pointed due north.
        assert!(network.shots[0].delta.east.abs() < 1e-9);
    }

    #[test]
    fn convergence_override_applies_when_project_enables_it() {
        let survey = Survey {
            header: header("S1"),
            shots: vec![shot("A1", "A2", 100.0, 0.0, ShotFlags::default())],
        };
        let mut file = file_entry("one.dat", vec![], vec![]);
        file.convergence_override = Some(ConvergenceOverride::Enabled(90.0));
        let mut project_flags = ProjectFlags::default();
        project_flags.apply_convergence = Some(true);
        let project = project_with(vec![file], project_flags);
        let mut surveys = HashMap::new();
        surveys.insert("one.dat".to_string(), vec![survey]);

        let (network, _) = assemble(&project, &surveys);
        let delta = &network.shots[0].delta;
        assert!((delta.east - -100.0).abs() < 1e-6);
    }
}
