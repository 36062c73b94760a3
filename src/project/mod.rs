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

//! The project-file parser (`spec.md` §4.1): file membership, folder
//! nesting, per-file link/fixed stations, base location, datum, zone,
//! convergence and project flags.

pub mod datum;
mod flags;
mod lexer;
mod record;

pub use flags::{DeclinationMode, LrudAttach, ProjectFlags};
pub use record::BaseLocation;

use crate::error::Error;
use crate::measurements::LengthUnit;

use record::FileMember;

/// A project- or file-scoped convergence directive (`%`/`*`, `spec.md` §4.1).
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ConvergenceOverride {
    /// `%<value>;`: apply this convergence, in degrees.
    Enabled(f64),
    /// `*<value>;`: the value is retained but never applied.
    Disabled(f64),
}

impl ConvergenceOverride {
    /// The convergence in degrees this override would apply, if enabled.
    pub fn value_deg(&self) -> f64 {
        match self {
            Self::Enabled(v) | Self::Disabled(v) => *v,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

/// A fixed (anchor) station declared for a file in the project file
/// (`spec.md` §3 `FixedStation`).
#[derive(Clone, PartialEq, Debug)]
pub struct FixedStation {
    pub name: String,
    pub unit: LengthUnit,
    pub east: f64,
    pub north: f64,
    pub vertical: f64,
}

/// One `#<path>,...;` entry (`spec.md` §3 `FileEntry`).
///
/// `convergence_override`/`zone_override` are this file's *effective*
/// settings — whatever `%`/`*`/`$` directive was most recently in scope
/// (current folder, or its enclosing folders, or the project) when this
/// entry was parsed. This resolves the Open Question in `spec.md` §9 about
/// per-file vs. top-level convergence: settings are "current state" that
/// folders scope and files snapshot, matching how the grammar nests file
/// entries inside folders but never nests settings directives themselves.
#[derive(Clone, PartialEq, Debug)]
pub struct FileEntry {
    pub path: String,
    pub links: Vec<String>,
    pub fixed: Vec<FixedStation>,
    pub folder: Vec<String>,
    pub convergence_override: Option<ConvergenceOverride>,
    pub zone_override: Option<i32>,
}

/// A fully parsed project file (`spec.md` §3 `Project`).
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Project {
    pub base: Option<BaseLocation>,
    pub datum: Option<String>,
    /// The convergence override in effect at the top level (outside any
    /// folder) of the project file, if any.
    pub convergence_override: Option<ConvergenceOverride>,
    /// The UTM zone override in effect at the top level, if any.
    pub zone_override: Option<i32>,
    pub flags: ProjectFlags,
    pub files: Vec<FileEntry>,
}

impl Project {
    /// The convergence, in degrees, that should be applied to `file`, or
    /// `None` if no convergence is in effect for it at all.
    ///
    /// `spec.md` §9: "`!V` enables application and `%` supplies the value;
    /// `*` disables application irrespective of `!V`."
    pub fn effective_convergence_deg(&self, file: &FileEntry) -> Option<f64> {
        let apply = self.flags.apply_convergence.unwrap_or(false);
        if !apply {
            return None;
        }

        match file.convergence_override.or(self.convergence_override) {
            Some(ConvergenceOverride::Enabled(v)) => Some(v),
            Some(ConvergenceOverride::Disabled(_)) => None,
            None => self.base.as_ref().map(|b| b.convergence_deg),
        }
    }
}

#[derive(Clone, Default)]
struct Settings {
    convergence_override: Option<ConvergenceOverride>,
    zone_override: Option<i32>,
}

/// Parses a project-file byte stream into a [`Project`].
///
/// Only `project.parse` (malformed record) and `project.structure`
/// (unmatched folder brackets) can occur, both fatal per `spec.md` §4.1.
pub fn parse_project(bytes: &[u8]) -> Result<Project, Error> {
    let records = lexer::lex(bytes)?;

    let mut base: Option<BaseLocation> = None;
    let mut datum: Option<String> = None;
    let mut flags = ProjectFlags::default();
    let mut files = Vec::new();

    let mut top_level_convergence_override: Option<ConvergenceOverride> = None;
    let mut top_level_zone_override: Option<i32> = None;

    let mut folder_names: Vec<String> = Vec::new();
    let mut settings_stack: Vec<Settings> = vec![Settings::default()];

    for rec in &records {
        match rec.prefix {
            b'#' => {
                let (path, members) = record::parse_file_entry(&rec.content, rec.line)?;
                let mut links = Vec::new();
                let mut fixed = Vec::new();
                for member in members {
                    match member {
                        FileMember::Link(name) => links.push(name),
                        FileMember::Fixed(spec) => fixed.push(FixedStation {
                            name: spec.name,
                            unit: spec.unit,
                            east: spec.east,
                            north: spec.north,
                            vertical: spec.vertical,
                        }),
                    }
                }

                let current = settings_stack.last().expect("settings stack never empty");
                log::debug!("project file entry: {path} (folder depth {})", folder_names.len());

                files.push(FileEntry {
                    path,
                    links,
                    fixed,
                    folder: folder_names.clone(),
                    convergence_override: current.convergence_override,
                    zone_override: current.zone_override,
                });
            }

            b'[' => {
                let name = record::parse_folder_name(&rec.content);
                log::trace!("project folder open: {name}");
                folder_names.push(name);
                let inherited = settings_stack.last().cloned().unwrap_or_default();
                settings_stack.push(inherited);
            }

            b']' => {
                if folder_names.is_empty() {
                    return Err(Error::ProjectStructure {
                        message: format!("unmatched ']' at line {}", rec.line),
                    });
                }
                folder_names.pop();
                settings_stack.pop();
            }

            b'@' => {
                base = Some(record::parse_base(&rec.content, rec.line)?);
            }

            b'&' => {
                let name = record::parse_datum(&rec.content);
                if !datum::is_known_datum(&name) {
                    return Err(Error::ProjectParse {
                        line: rec.line,
                        message: format!("unrecognised datum \"{name}\""),
                    });
                }
                datum = Some(name);
            }

            b'%' => {
                let value = record::parse_convergence_value(&rec.content, rec.line)?;
                let ov = ConvergenceOverride::Enabled(value);
                if settings_stack.len() == 1 && top_level_convergence_override.is_none() {
                    top_level_convergence_override = Some(ov);
                }
                settings_stack.last_mut().unwrap().convergence_override = Some(ov);
            }

            b'*' => {
                let value = record::parse_convergence_value(&rec.content, rec.line)?;
                let ov = ConvergenceOverride::Disabled(value);
                if settings_stack.len() == 1 && top_level_convergence_override.is_none() {
                    top_level_convergence_override = Some(ov);
                }
                settings_stack.last_mut().unwrap().convergence_override = Some(ov);
            }

            b'$' => {
                let zone = record::parse_zone(&rec.content, rec.line)?;
                if settings_stack.len() == 1 && top_level_zone_override.is_none() {
                    top_level_zone_override = Some(zone);
                }
                settings_stack.last_mut().unwrap().zone_override = Some(zone);
            }

            b'!' => {
                let parsed = ProjectFlags::parse(&rec.content);
                flags = merge_flags(flags, parsed);
            }

            other => unreachable!("lexer should never emit prefix '{}'", other as char),
        }
    }

    if settings_stack.len() != 1 || !folder_names.is_empty() {
        return Err(Error::ProjectStructure {
            message: "unmatched '[' at end of input".to_string(),
        });
    }

    Ok(Project {
        base,
        datum,
        convergence_override: top_level_convergence_override,
        zone_override: top_level_zone_override,
        flags,
        files,
    })
}

fn merge_flags(base: ProjectFlags, incoming: ProjectFlags) -> ProjectFlags {
    ProjectFlags {
        global_override: incoming.global_override.or(base.global_override),
        declination_mode: incoming.declination_mode.or(base.declination_mode),
        apply_convergence: incoming.apply_convergence.or(base.apply_convergence),
        override_lrud_attach: incoming.override_lrud_attach.or(base.override_lrud_attach),
        lrud_attach: incoming.lrud_attach.or(base.lrud_attach),
        apply_shot_flags: incoming.apply_shot_flags.or(base.apply_shot_flags),
        apply_exclude_flag: incoming.apply_exclude_flag.or(base.apply_exclude_flag),
        apply_plot_flag: incoming.apply_plot_flag.or(base.apply_plot_flag),
        apply_length_flag: incoming.apply_length_flag.or(base.apply_length_flag),
        apply_closure_flag: incoming.apply_closure_flag.or(base.apply_closure_flag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_project() {
        let input = b"#cave1.dat,A1;\n@500000,4000000,100,17,1.2;\n&WGS84;\n!VS;\n";
        let project = parse_project(input).unwrap();
        assert_eq!(project.files.len(), 1);
        assert_eq!(project.files[0].path, "cave1.dat");
        assert_eq!(project.files[0].links, vec!["A1".to_string()]);
        assert_eq!(project.datum.as_deref(), Some("WGS84"));
        assert_eq!(project.flags.apply_convergence, Some(true));
    }

    #[test]
    fn fixed_stations_merge_into_file_entry() {
        let input = b"#cave1.dat,A1[F,0,0,0];\n";
        let project = parse_project(input).unwrap();
        assert_eq!(project.files[0].fixed.len(), 1);
        assert_eq!(project.files[0].fixed[0].name, "A1");
    }

    #[test]
    fn folder_nesting_scopes_settings_and_reverts() {
        let input = b"#outer.dat;\n[Branch;\n%5.0;\n#inner.dat;\n];\n#after.dat;\n";
        let project = parse_project(input).unwrap();
        assert_eq!(project.files[0].folder, Vec::<String>::new());
        assert_eq!(project.files[0].convergence_override, None);

        assert_eq!(project.files[1].folder, vec!["Branch".to_string()]);
        assert_eq!(
            project.files[1].convergence_override,
            Some(ConvergenceOverride::Enabled(5.0))
        );

        // settings revert once the folder closes
        assert_eq!(project.files[2].folder, Vec::<String>::new());
        assert_eq!(project.files[2].convergence_override, None);
    }

    #[test]
    fn unmatched_open_folder_is_fatal() {
        let input = b"[Branch;\n#a.dat;\n";
        let err = parse_project(input).unwrap_err();
        assert!(matches!(err, Error::ProjectStructure { .. }));
    }

    #[test]
    fn unmatched_close_folder_is_fatal() {
        let input = b"];\n";
        let err = parse_project(input).unwrap_err();
        assert!(matches!(err, Error::ProjectStructure { .. }));
    }

    #[test]
    fn unrecognised_datum_is_fatal() {
        let input = b"&Mars 2020;\n";
        let err = parse_project(input).unwrap_err();
        assert!(matches!(err, Error::ProjectParse { .. }));
    }

    #[test]
    fn convergence_disabled_overrides_v_flag() {
        let input = b"#a.dat;\n*3.0;\n!V;\n";
        let project = parse_project(input).unwrap();
        assert_eq!(
            project.effective_convergence_deg(&project.files[0]),
            None
        );
    }

    #[test]
    fn convergence_enabled_requires_v_flag() {
        let input = b"#a.dat;\n%3.0;\n";
        let project = parse_project(input).unwrap();
        assert_eq!(project.effective_convergence_deg(&project.files[0]), None);
    }

    #[test]
    fn convergence_enabled_with_v_flag_applies() {
        let input = b"#a.dat;\n%3.0;\n!V;\n";
        let project = parse_project(input).unwrap();
        assert_eq!(
            project.effective_convergence_deg(&project.files[0]),
            Some(3.0)
        );
    }
}
