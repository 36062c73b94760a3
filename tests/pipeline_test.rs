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

//! Drives the full pipeline — `parse_project` -> `parse_survey` ->
//! `assemble` -> `propagate` -> `adjust` — against the two end-to-end
//! scenarios `spec.md` §8 describes literally: a single-anchor chain, and a
//! two-anchor straight traverse with a 5ft misclosure.

use std::collections::HashMap;

use survnet_core::{network, project, propagate, solve, survey};

fn survey_text(survey_name: &str, shots: &str) -> String {
    format!(
        "Mystery Cave\n\
         SURVEY NAME: {survey_name}\n\
         DECLINATION: 0 FORMAT: DDDDLRUDLAD CORRECTIONS: 0 0 0 CORRECTIONS2: 0 0\n\
         \n\
         {shots}"
    )
}

#[test]
fn single_anchor_chain_matches_spec_scenario_one() {
    env_logger::try_init().ok();

    let project_text = b"#cave.dat,A[F,0,0,0];\n&WGS84;\n".to_vec();
    let project = project::parse_project(&project_text).unwrap();

    let shots = "A B 100.0 0.0 0.0 1 1 1 1\nB C 100.0 90.0 0.0 1 1 1 1\n";
    let (surveys, diagnostics) = survey::parse_survey(survey_text("S1", shots).as_bytes(), "cave.dat");
    assert!(diagnostics.is_empty());

    let mut surveys_by_file = HashMap::new();
    surveys_by_file.insert("cave.dat".to_string(), surveys);

    let (mut net, diagnostics) = network::assemble(&project, &surveys_by_file);
    assert!(diagnostics.is_empty());

    propagate::propagate(&mut net);
    let (positions, diagnostics) = solve::adjust(&mut net);
    assert!(diagnostics.is_empty());

    assert!((positions["A"].east).abs() < 1e-9 && (positions["A"].north).abs() < 1e-9);
    assert!((positions["B"].east).abs() < 1e-9 && (positions["B"].north - 100.0).abs() < 1e-9);
    assert!((positions["C"].east - 100.0).abs() < 1e-9 && (positions["C"].north - 100.0).abs() < 1e-9);
}

#[test]
fn two_anchor_traverse_matches_spec_scenario_two() {
    env_logger::try_init().ok();

    let project_text = b"#cave.dat,A[F,0,0,0],D[F,0,300,5];\n&WGS84;\n".to_vec();
    let project = project::parse_project(&project_text).unwrap();

    let shots = "A B 100.0 0.0 0.0 1 1 1 1\n\
                 B C 100.0 0.0 0.0 1 1 1 1\n\
                 C D 100.0 0.0 0.0 1 1 1 1\n";
    let (surveys, diagnostics) = survey::parse_survey(survey_text("S1", shots).as_bytes(), "cave.dat");
    assert!(diagnostics.is_empty());

    let mut surveys_by_file = HashMap::new();
    surveys_by_file.insert("cave.dat".to_string(), surveys);

    let (mut net, diagnostics) = network::assemble(&project, &surveys_by_file);
    assert!(diagnostics.is_empty());

    propagate::propagate(&mut net);
    let (positions, _diagnostics) = solve::adjust(&mut net);

    assert!(positions["A"].length() < 1e-9);
    let d = positions["D"];
    assert!((d.north - 300.0).abs() < 1e-9 && (d.vertical - 5.0).abs() < 1e-9);

    // The misclosure (0, 0, -5) is distributed proportionally to graph
    // distance across the three equal-length shots.
    let b = positions["B"];
    let c = positions["C"];
    assert!((b.north - 100.0).abs() < 1e-6);
    assert!((b.vertical - (5.0 / 3.0)).abs() < 1e-6);
    assert!((c.north - 200.0).abs() < 1e-6);
    assert!((c.vertical - (10.0 / 3.0)).abs() < 1e-6);
}
