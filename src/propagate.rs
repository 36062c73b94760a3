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

//! The multi-source breadth-first propagator (`spec.md` §4.6): assigns an
//! initial position to every station reachable from a fixed anchor,
//! recording which anchor's front reached it first.

use std::collections::VecDeque;

use crate::error::{Diagnostics, Error};
use crate::network::SurveyNetwork;

/// Walks `network` outward from every anchor simultaneously, writing
/// `Station::position`/`origin` exactly once per reachable station.
///
/// Enqueue order is the observable contract `spec.md` §4.6/§5 describes:
/// ascending BFS depth, and within a depth, anchors in sorted order first
/// (the seed order below) then neighbours in adjacency insertion order.
/// Seeding every anchor before any station is dequeued is what gives that
/// ordering for free — a plain FIFO queue already processes all of depth
/// `d` before any of depth `d+1` once every depth-0 node starts in it.
pub fn propagate(network: &mut SurveyNetwork) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    let mut anchor_names: Vec<String> = network.anchors.iter().cloned().collect();
    anchor_names.sort();
    for name in anchor_names {
        if network.stations.contains_key(&name) {
            queue.push_back(name);
        }
    }

    while let Some(name) = queue.pop_front() {
        let current_position = match network.stations.get(&name).and_then(|s| s.position) {
            Some(p) => p,
            None => continue,
        };
        let current_origin = network
            .stations
            .get(&name)
            .and_then(|s| s.origin.clone())
            .unwrap_or_else(|| name.clone());

        let neighbours = match network.adjacency.get(&name) {
            Some(n) => n.clone(),
            None => continue,
        };

        for (neighbour, shot_index) in neighbours {
            let already_visited = network
                .stations
                .get(&neighbour)
                .map(|s| s.origin.is_some())
                .unwrap_or(true);
            if already_visited {
                continue;
            }

            let (delta, to) = network.traverse(shot_index, &name);
            debug_assert_eq!(to, neighbour);
            let position = current_position + delta;

            if let Some(station) = network.stations.get_mut(&neighbour) {
                station.position = Some(position);
                station.origin = Some(current_origin.clone());
                queue.push_back(neighbour);
            }
        }
    }

    for (name, station) in network.stations.iter() {
        if station.origin.is_none() {
            diagnostics.push(Error::NetworkDisconnected { station: name.clone() });
        }
    }

    diagnostics
}
