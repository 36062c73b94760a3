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

//! The traverse-adjustment solver (`spec.md` §4.7): removes the positional
//! seam a multi-anchor network otherwise leaves at every anchor pair, by
//! redistributing each pair's misclosure across the shots between them,
//! proportionally to graph distance and clamped to each shot's own reading.
//!
//! Design Notes §9 re-architects "module-level solver abstract base class"
//! into a capability — "a function mapping [`SurveyNetwork`] to a mapping of
//! station names to positions" — with two concrete implementations:
//! [`IdentitySolver`] (the BFS propagation, unchanged) and
//! [`ProportionalSolver`] (this module's namesake algorithm). [`adjust`] is
//! the crate's stable entry point (`spec.md` §6) and always uses the latter.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use indexmap::IndexMap;

use crate::error::{Diagnostics, Error};
use crate::geom::{Polar, Vector3D};
use crate::measurements::Angle;
use crate::network::SurveyNetwork;

/// Maximum fractional change to a shot's length during clamped correction.
const LENGTH_FRAC: f64 = 0.05;
/// Maximum fractional change to a shot's heading/inclination, before the
/// 2-degree floor below applies.
const ANGLE_FRAC: f64 = 0.15;
/// The floor under the heading/inclination clamp, in degrees, so a shot
/// recorded at (or near) 0 degrees still gets some room to absorb correction.
const MIN_ANGLE_CLAMP_DEG: f64 = 2.0;

/// A capability mapping a [`SurveyNetwork`] to final station positions
/// (Design Notes §9).
pub trait Solver {
    fn solve(&self, network: &SurveyNetwork) -> (IndexMap<String, Vector3D>, Diagnostics);
}

/// The trivial solver: returns each station's BFS-propagated position
/// unchanged. Used when a network has at most one anchor, where no
/// anchor-to-anchor seam exists to remove (`spec.md` §8).
#[derive(Copy, Clone, Default, Debug)]
pub struct IdentitySolver;

impl Solver for IdentitySolver {
    fn solve(&self, network: &SurveyNetwork) -> (IndexMap<String, Vector3D>, Diagnostics) {
        let mut positions = IndexMap::new();
        for (name, station) in &network.stations {
            if let Some(position) = station.position {
                positions.insert(name.clone(), position);
            }
        }
        (positions, Diagnostics::new())
    }
}

/// The distance-weighted proportional-correction solver (`spec.md` §4.7).
#[derive(Copy, Clone, Debug)]
pub struct ProportionalSolver {
    /// Misclosure above which a pair's final residual is surfaced as a
    /// `solver.residual` diagnostic (`spec.md` §7) even though clamps may
    /// legitimately leave one — this is informational only.
    pub residual_threshold_ft: f64,
}

impl Default for ProportionalSolver {
    fn default() -> Self {
        Self {
            residual_threshold_ft: 0.01,
        }
    }
}

/// The result of walking a single-source BFS over the undirected adjacency,
/// summing oriented shot deltas: every reachable station's position relative
/// to `source` at the origin, plus the tree edges in traversal order.
struct Walk {
    positions: IndexMap<String, Vector3D>,
    edges: Vec<(String, String, usize)>,
}

fn bfs_walk(network: &SurveyNetwork, source: &str) -> Walk {
    let mut positions = IndexMap::new();
    let mut edges = Vec::new();
    positions.insert(source.to_string(), Vector3D::ZERO);

    let mut queue = VecDeque::new();
    queue.push_back(source.to_string());

    while let Some(u) = queue.pop_front() {
        let pos_u = positions[&u];
        let Some(neighbours) = network.adjacency.get(&u) else {
            continue;
        };
        for (v, shot_index) in neighbours.clone() {
            if positions.contains_key(&v) {
                continue;
            }
            let (delta, to) = network.traverse(shot_index, &u);
            debug_assert_eq!(to, v);
            positions.insert(v.clone(), pos_u + delta);
            edges.push((u.clone(), v.clone(), shot_index));
            queue.push_back(v);
        }
    }

    Walk { positions, edges }
}

/// Dijkstra's algorithm over shot length, giving the minimum cumulative
/// shot-length distance from `source` to every reachable station
/// (`spec.md` §4.7 step 3).
fn shortest_length_distances(network: &SurveyNetwork, source: &str) -> IndexMap<String, f64> {
    #[derive(PartialEq)]
    struct HeapItem(f64, String);

    impl Eq for HeapItem {}

    impl Ord for HeapItem {
        fn cmp(&self, other: &Self) -> Ordering {
            other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
        }
    }

    impl PartialOrd for HeapItem {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    let mut dist: IndexMap<String, f64> = IndexMap::new();
    dist.insert(source.to_string(), 0.0);
    let mut heap = BinaryHeap::new();
    heap.push(HeapItem(0.0, source.to_string()));

    while let Some(HeapItem(d, u)) = heap.pop() {
        if d > *dist.get(&u).unwrap_or(&f64::INFINITY) {
            continue;
        }
        let Some(neighbours) = network.adjacency.get(&u) else {
            continue;
        };
        for (v, shot_index) in neighbours {
            let candidate = d + network.shots[*shot_index].length_ft;
            if candidate < *dist.get(v).unwrap_or(&f64::INFINITY) {
                dist.insert(v.clone(), candidate);
                heap.push(HeapItem(candidate, v.clone()));
            }
        }
    }

    dist
}

fn fraction(name: &str, d_p: &IndexMap<String, f64>, d_q: &IndexMap<String, f64>) -> f64 {
    let dp = d_p.get(name).copied().unwrap_or(f64::INFINITY);
    let dq = d_q.get(name).copied().unwrap_or(f64::INFINITY);
    if !dp.is_finite() && !dq.is_finite() {
        return 0.0;
    }
    let dp = if dp.is_finite() { dp } else { 0.0 };
    let dq = if dq.is_finite() { dq } else { 0.0 };
    let sum = dp + dq;
    if sum <= 0.0 {
        0.0
    } else {
        dp / sum
    }
}

fn circular_diff_deg(a: f64, b: f64) -> f64 {
    ((a - b + 540.0) % 360.0) - 180.0
}

/// Clamps `corrected` against `original` per `spec.md` §4.7 step 4: length,
/// heading and inclination each independently bounded to a tolerance of the
/// survey reading `original` represents.
fn clamp_to_tolerance(original: Vector3D, corrected: Vector3D) -> Vector3D {
    let original_polar = original.to_polar();
    let corrected_polar = corrected.to_polar();

    let length = if original_polar.length == 0.0 {
        0.0
    } else {
        let lo = (1.0 - LENGTH_FRAC) * original_polar.length;
        let hi = (1.0 + LENGTH_FRAC) * original_polar.length;
        corrected_polar.length.clamp(lo, hi)
    };

    let heading_limit = (ANGLE_FRAC * original_polar.azimuth_deg.abs()).max(MIN_ANGLE_CLAMP_DEG);
    let heading_delta =
        circular_diff_deg(corrected_polar.azimuth_deg, original_polar.azimuth_deg).clamp(-heading_limit, heading_limit);
    let azimuth_deg = Angle::deg(original_polar.azimuth_deg + heading_delta).normalized_deg();

    let inclination_limit = (ANGLE_FRAC * original_polar.inclination_deg.abs()).max(MIN_ANGLE_CLAMP_DEG);
    let inclination_delta =
        (corrected_polar.inclination_deg - original_polar.inclination_deg).clamp(-inclination_limit, inclination_limit);
    let inclination_deg = original_polar.inclination_deg + inclination_delta;

    Polar::new(length, azimuth_deg, inclination_deg).to_vector()
}

/// Re-propagates from `anchor_p` to `anchor_q`, distributing their
/// misclosure across every shot reachable from `anchor_p`
/// (`spec.md` §4.7 steps 1-4). Returns `None` if `anchor_q` isn't reachable
/// from `anchor_p`, or if the pair's misclosure is already within `1e-9` ft.
fn adjust_pair(
    network: &SurveyNetwork,
    anchor_p: &str,
    anchor_q: &str,
    fixed_positions: &IndexMap<String, Vector3D>,
    diagnostics: &mut Diagnostics,
    residual_threshold_ft: f64,
) -> Option<IndexMap<String, Vector3D>> {
    let walk = bfs_walk(network, anchor_p);
    let measured_q = *walk.positions.get(anchor_q)?;
    let fixed_q = *fixed_positions.get(anchor_q)?;
    let misclosure = measured_q - fixed_q;
    if misclosure.length() < 1e-9 {
        return None;
    }

    let d_p = shortest_length_distances(network, anchor_p);
    let d_q = shortest_length_distances(network, anchor_q);

    let mut positions: IndexMap<String, Vector3D> = IndexMap::new();
    positions.insert(anchor_p.to_string(), fixed_positions[anchor_p]);

    for (u, v, shot_index) in &walk.edges {
        let shot = &network.shots[*shot_index];
        let (delta, to) = network.traverse(*shot_index, u);
        debug_assert_eq!(&to, v);
        let pos_u = positions[u];

        let applied_delta = if shot.flags.closure_exclude {
            delta
        } else {
            let f_u = fraction(u, &d_p, &d_q);
            let f_v = fraction(v, &d_p, &d_q);
            let correction = misclosure * (f_v - f_u);
            let corrected = delta - correction;
            clamp_to_tolerance(delta, corrected)
        };

        positions.insert(v.clone(), pos_u + applied_delta);
    }

    if let Some(&final_q) = positions.get(anchor_q) {
        let residual = (final_q - fixed_q).length();
        if residual > residual_threshold_ft {
            diagnostics.push(Error::SolverResidual {
                anchor_a: anchor_p.to_string(),
                anchor_b: anchor_q.to_string(),
                residual_ft: residual,
            });
        }
    }

    Some(positions)
}

fn mean(values: &[Vector3D]) -> Vector3D {
    let sum = values.iter().fold(Vector3D::ZERO, |acc, v| acc + *v);
    sum * (1.0 / values.len() as f64)
}

impl Solver for ProportionalSolver {
    fn solve(&self, network: &SurveyNetwork) -> (IndexMap<String, Vector3D>, Diagnostics) {
        let mut anchors: Vec<String> = network.anchors.iter().cloned().collect();
        anchors.sort();

        if anchors.len() < 2 {
            return IdentitySolver.solve(network);
        }

        let mut fixed_positions: IndexMap<String, Vector3D> = IndexMap::new();
        for anchor in &anchors {
            if let Some(position) = network.stations.get(anchor).and_then(|s| s.position) {
                fixed_positions.insert(anchor.clone(), position);
            }
        }

        let mut diagnostics = Diagnostics::new();
        let mut accumulated: IndexMap<String, Vec<Vector3D>> = IndexMap::new();

        for i in 0..anchors.len() {
            for j in (i + 1)..anchors.len() {
                let (p, q) = (&anchors[i], &anchors[j]);
                let Some(pair_positions) = adjust_pair(
                    network,
                    p,
                    q,
                    &fixed_positions,
                    &mut diagnostics,
                    self.residual_threshold_ft,
                ) else {
                    continue;
                };

                for (name, position) in pair_positions {
                    if network.stations.get(&name).map(|s| s.fixed).unwrap_or(false) {
                        continue;
                    }
                    accumulated.entry(name).or_default().push(position);
                }
            }
        }

        let mut positions = IndexMap::new();
        for (name, station) in &network.stations {
            if station.fixed {
                if let Some(position) = station.position {
                    positions.insert(name.clone(), position);
                }
                continue;
            }
            if let Some(list) = accumulated.get(name) {
                positions.insert(name.clone(), mean(list));
            } else if let Some(position) = station.position {
                // Reachable from at most one anchor (e.g. a component with a
                // single anchor, or never reached by any pairwise BFS), so
                // no pair had a seam to remove here; keep the initial
                // propagated position.
                positions.insert(name.clone(), position);
            }
        }

        (positions, diagnostics)
    }
}

/// Adjusts `network` in place, per `spec.md` §6: overwrites every non-anchor
/// [`crate::network::Station::position`] with the result of the
/// [`ProportionalSolver`] and returns the same mapping.
pub fn adjust(network: &mut SurveyNetwork) -> (IndexMap<String, Vector3D>, Diagnostics) {
    let (positions, diagnostics) = ProportionalSolver::default().solve(network);
    for (name, position) in &positions {
        if let Some(station) = network.stations.get_mut(name) {
            if !station.fixed {
                station.position = Some(*position);
            }
        }
    }
    (positions, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NetworkShot, NetworkShotFlags, Station};

    fn push_shot(network: &mut SurveyNetwork, from: &str, to: &str, delta: Vector3D, flags: NetworkShotFlags) {
        let index = network.shots.len();
        network.adjacency.entry(from.to_string()).or_default().push((to.to_string(), index));
        network.adjacency.entry(to.to_string()).or_default().push((from.to_string(), index));
        network.shots.push(NetworkShot {
            from: from.to_string(),
            to: to.to_string(),
            length_ft: delta.length(),
            delta,
            flags,
        });
    }

    fn ensure(network: &mut SurveyNetwork, name: &str) {
        network.stations.entry(name.to_string()).or_insert_with(|| Station::new(name));
    }

    fn anchor(network: &mut SurveyNetwork, name: &str, position: Vector3D) {
        network.stations.insert(name.to_string(), Station::anchor(name, position));
        network.anchors.insert(name.to_string());
    }

    fn propagate_initial(network: &mut SurveyNetwork) {
        crate::propagate::propagate(network);
    }

    /// `spec.md` §8 scenario 2: two-anchor straight traverse, 5ft misclosure.
    #[test]
    fn two_anchor_straight_traverse_distributes_misclosure() {
        let mut network = SurveyNetwork::default();
        anchor(&mut network, "A", Vector3D::ZERO);
        anchor(&mut network, "D", Vector3D::new(0.0, 300.0, 5.0));
        ensure(&mut network, "B");
        ensure(&mut network, "C");
        push_shot(&mut network, "A", "B", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "B", "C", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "C", "D", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        propagate_initial(&mut network);

        let (positions, _) = adjust(&mut network);

        assert_eq!(positions["A"], Vector3D::ZERO);
        assert_eq!(positions["D"], Vector3D::new(0.0, 300.0, 5.0));

        let b = positions["B"];
        let c = positions["C"];
        assert!((b.north - 100.0).abs() < 1e-6);
        assert!((b.vertical - (5.0 / 3.0)).abs() < 1e-6);
        assert!((c.north - 200.0).abs() < 1e-6);
        assert!((c.vertical - (10.0 / 3.0)).abs() < 1e-6);
    }

    /// `spec.md` §8 scenario 3: a T-junction spur with zero misclosure is
    /// left exactly where BFS propagation put it.
    #[test]
    fn zero_misclosure_leaves_spur_untouched() {
        let mut network = SurveyNetwork::default();
        anchor(&mut network, "A", Vector3D::ZERO);
        anchor(&mut network, "C", Vector3D::new(200.0, 0.0, 0.0));
        ensure(&mut network, "B");
        ensure(&mut network, "E");
        push_shot(&mut network, "A", "B", Vector3D::new(100.0, 0.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "B", "C", Vector3D::new(100.0, 0.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "B", "E", Vector3D::new(0.0, 50.0, 0.0), NetworkShotFlags::default());
        propagate_initial(&mut network);

        let (positions, _) = adjust(&mut network);
        assert_eq!(positions["E"], Vector3D::new(100.0, 50.0, 0.0));
    }

    /// `spec.md` §8 scenario 6: a `C`-flagged shot passes through exactly,
    /// never clamped or corrected.
    #[test]
    fn closure_excluded_shot_is_never_adjusted() {
        let mut network = SurveyNetwork::default();
        anchor(&mut network, "A", Vector3D::ZERO);
        anchor(&mut network, "D", Vector3D::new(0.0, 300.0, 5.0));
        ensure(&mut network, "B");
        ensure(&mut network, "C");
        let closure_exclude = NetworkShotFlags {
            closure_exclude: true,
            ..NetworkShotFlags::default()
        };
        push_shot(&mut network, "A", "B", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "B", "C", Vector3D::new(0.0, 100.0, 0.0), closure_exclude);
        push_shot(&mut network, "C", "D", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        propagate_initial(&mut network);

        let (positions, _) = adjust(&mut network);
        let b = positions["B"];
        let c = positions["C"];
        assert!((c - b - Vector3D::new(0.0, 100.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn single_anchor_matches_initial_propagation() {
        let mut network = SurveyNetwork::default();
        anchor(&mut network, "A", Vector3D::ZERO);
        ensure(&mut network, "B");
        push_shot(&mut network, "A", "B", Vector3D::new(10.0, 20.0, 0.0), NetworkShotFlags::default());
        propagate_initial(&mut network);
        let expected = network.stations["B"].position.unwrap();

        let (positions, _) = adjust(&mut network);
        assert_eq!(positions["B"], expected);
    }

    #[test]
    fn two_anchors_zero_error_matches_initial_propagation() {
        let mut network = SurveyNetwork::default();
        anchor(&mut network, "A", Vector3D::ZERO);
        anchor(&mut network, "D", Vector3D::new(0.0, 300.0, 0.0));
        ensure(&mut network, "B");
        ensure(&mut network, "C");
        push_shot(&mut network, "A", "B", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "B", "C", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "C", "D", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        propagate_initial(&mut network);
        let expected_b = network.stations["B"].position.unwrap();
        let expected_c = network.stations["C"].position.unwrap();

        let (positions, _) = adjust(&mut network);
        assert_eq!(positions["B"], expected_b);
        assert_eq!(positions["C"], expected_c);
    }

    #[test]
    fn adjust_is_a_fixed_point() {
        let mut network = SurveyNetwork::default();
        anchor(&mut network, "A", Vector3D::ZERO);
        anchor(&mut network, "D", Vector3D::new(0.0, 300.0, 5.0));
        ensure(&mut network, "B");
        ensure(&mut network, "C");
        push_shot(&mut network, "A", "B", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "B", "C", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        push_shot(&mut network, "C", "D", Vector3D::new(0.0, 100.0, 0.0), NetworkShotFlags::default());
        propagate_initial(&mut network);

        let (first, _) = adjust(&mut network);
        let (second, _) = adjust(&mut network);

        for name in ["B", "C"] {
            assert!((first[name] - second[name]).length() < 1e-9);
        }
    }
}
