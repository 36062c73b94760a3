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

//! Project flags (`spec.md` §4.5, §6). Modeled as an explicit set of
//! booleans rather than a raw string, per the Design Notes' "string-based
//! flag accumulation" re-architecture guidance — but retaining `to_string`
//! so a host can round-trip the original `!...;` record.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a file's declination should be resolved.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclinationMode {
    /// `I`: ignore declination entirely.
    Ignore,
    /// `E`: use the value as entered on the survey's `DECLINATION:` line.
    #[default]
    AsEntered,
    /// `A`: compute declination from the station's date and location via
    /// [`crate::geomag::GeomagneticModel`].
    Computed,
}

/// To-station or from-station LRUD attachment, selected by `T`/`t`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LrudAttach {
    #[default]
    From,
    To,
}

/// The project-level flag set from a `!<flags>;` record (`spec.md` §6).
///
/// Uppercase enables a behaviour; the matching lowercase letter explicitly
/// disables it (used when a project wants to honour a file's own setting
/// instead, per the `G` flag). Each field defaults to "no opinion" (`None`)
/// when its letter is absent from the record at all.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectFlags {
    /// `G`/`g`: project settings globally override file-level settings.
    pub global_override: Option<bool>,
    pub declination_mode: Option<DeclinationMode>,
    /// `V`/`v`: apply convergence.
    pub apply_convergence: Option<bool>,
    /// `O`/`o`: override LRUD attachment.
    pub override_lrud_attach: Option<bool>,
    /// `T`/`t`: attach LRUD to the "to" (uppercase) or "from" (lowercase) station.
    pub lrud_attach: Option<LrudAttach>,
    /// `S`/`s`: apply per-shot flags at all.
    pub apply_shot_flags: Option<bool>,
    /// `X`/`x`: apply the total-exclusion shot flag.
    pub apply_exclude_flag: Option<bool>,
    /// `P`/`p`: apply the plotting-exclusion shot flag.
    pub apply_plot_flag: Option<bool>,
    /// `L`/`l`: apply the length-exclusion shot flag.
    pub apply_length_flag: Option<bool>,
    /// `C`/`c`: apply the closure-exclusion shot flag.
    pub apply_closure_flag: Option<bool>,
}

impl ProjectFlags {
    /// Parses a `!...;` record's content (without the `!`/`;`) into a flag
    /// set. Unknown letters are ignored; whitespace is insignificant.
    pub fn parse(content: &str) -> Self {
        let mut flags = Self::default();

        for c in content.chars() {
            match c {
                'G' => flags.global_override = Some(true),
                'g' => flags.global_override = Some(false),
                'I' => flags.declination_mode = Some(DeclinationMode::Ignore),
                'E' => flags.declination_mode = Some(DeclinationMode::AsEntered),
                'A' => flags.declination_mode = Some(DeclinationMode::Computed),
                'V' => flags.apply_convergence = Some(true),
                'v' => flags.apply_convergence = Some(false),
                'O' => flags.override_lrud_attach = Some(true),
                'o' => flags.override_lrud_attach = Some(false),
                'T' => flags.lrud_attach = Some(LrudAttach::To),
                't' => flags.lrud_attach = Some(LrudAttach::From),
                'S' => flags.apply_shot_flags = Some(true),
                's' => flags.apply_shot_flags = Some(false),
                'X' => flags.apply_exclude_flag = Some(true),
                'x' => flags.apply_exclude_flag = Some(false),
                'P' => flags.apply_plot_flag = Some(true),
                'p' => flags.apply_plot_flag = Some(false),
                'L' => flags.apply_length_flag = Some(true),
                'l' => flags.apply_length_flag = Some(false),
                'C' => flags.apply_closure_flag = Some(true),
                'c' => flags.apply_closure_flag = Some(false),
                _ if c.is_whitespace() => {}
                _ => log::trace!("ignoring unrecognised project flag '{c}'"),
            }
        }

        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_and_lowercase_disagree() {
        let flags = ProjectFlags::parse("Vx");
        assert_eq!(flags.apply_convergence, Some(true));
        assert_eq!(flags.apply_exclude_flag, Some(false));
    }

    #[test]
    fn declination_letters_pick_mode() {
        assert_eq!(
            ProjectFlags::parse("A").declination_mode,
            Some(DeclinationMode::Computed)
        );
        assert_eq!(
            ProjectFlags::parse("I").declination_mode,
            Some(DeclinationMode::Ignore)
        );
    }

    #[test]
    fn absent_letters_are_none() {
        let flags = ProjectFlags::parse("");
        assert_eq!(flags.apply_convergence, None);
        assert_eq!(flags.global_override, None);
    }
}
