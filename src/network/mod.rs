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

//! The assembled network (`spec.md` §3 `SurveyNetwork`): every station and
//! shot from every parsed survey file, merged under link-based renaming,
//! with the cached adjacency the propagator and solver both walk.

mod assembler;
mod station;

pub use assembler::assemble;
pub use station::{NetworkShot, NetworkShotFlags, Station};

use indexmap::{IndexMap, IndexSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fully merged network: stations, directed shots, the anchor set, and a
/// cached undirected adjacency (`spec.md` §3, §4.6).
///
/// `adjacency` maps a station name to its `(neighbour, shot index)` pairs in
/// insertion order — the order shots were read from their owning files —
/// since station/neighbour enumeration order is an observable contract for
/// [`crate::propagate::propagate`] (`spec.md` §4.6/§5).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurveyNetwork {
    pub stations: IndexMap<String, Station>,
    pub shots: Vec<NetworkShot>,
    pub anchors: IndexSet<String>,
    pub adjacency: IndexMap<String, Vec<(String, usize)>>,
}

impl SurveyNetwork {
    /// The delta and orientation-resolved direction of traversing `shot`
    /// starting from `from`: `(delta, to)`. If `from` is the shot's recorded
    /// `to` station instead, the delta is negated.
    pub fn traverse(&self, shot_index: usize, from: &str) -> (crate::geom::Vector3D, &str) {
        let shot = &self.shots[shot_index];
        if shot.from == from {
            (shot.delta, shot.to.as_str())
        } else {
            (-shot.delta, shot.from.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vector3D;

    #[test]
    fn traverse_negates_delta_in_reverse_direction() {
        let mut network = SurveyNetwork::default();
        network.shots.push(NetworkShot {
            from: "A".to_string(),
            to: "B".to_string(),
            delta: Vector3D::new(1.0, 2.0, 3.0),
            length_ft: Vector3D::new(1.0, 2.0, 3.0).length(),
            flags: NetworkShotFlags::default(),
        });

        let (delta, to) = network.traverse(0, "A");
        assert_eq!(delta, Vector3D::new(1.0, 2.0, 3.0));
        assert_eq!(to, "B");

        let (delta, to) = network.traverse(0, "B");
        assert_eq!(delta, Vector3D::new(-1.0, -2.0, -3.0));
        assert_eq!(to, "A");
    }
}
