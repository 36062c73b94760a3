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

//! [`Station`] and [`NetworkShot`], the network's node and edge types
//! (`spec.md` §3).

use crate::geom::Vector3D;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named point in the network (`spec.md` §3 `Station`).
///
/// `position`/`origin` are set once by [`crate::propagate::propagate`] for
/// non-anchors, and never again except by [`crate::solve`] overwriting
/// `position` in place — anchors are exempt from both.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Station {
    pub name: String,
    pub position: Option<Vector3D>,
    /// The anchor name that claimed this station during BFS, or this
    /// station's own name if it is itself an anchor. `None` until
    /// propagation runs.
    pub origin: Option<String>,
    pub fixed: bool,
}

impl Station {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            origin: None,
            fixed: false,
        }
    }

    pub fn anchor(name: impl Into<String>, position: Vector3D) -> Self {
        let name = name.into();
        Self {
            origin: Some(name.clone()),
            name,
            position: Some(position),
            fixed: true,
        }
    }
}

/// Which shot-level flags survived project-flag gating for this shot
/// (`spec.md` §4.5).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkShotFlags {
    /// `L`: excluded from length statistics; still participates in propagation.
    pub length_exclude: bool,
    /// `P`: structurally present but flagged for the exporter to omit.
    pub plot_omit: bool,
    /// `C`: not adjusted by the solver; its delta is authoritative.
    pub closure_exclude: bool,
}

/// A directed shot between two (possibly renamed) stations, reduced to its
/// Cartesian delta (`spec.md` §3 `NetworkShot`).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkShot {
    pub from: String,
    pub to: String,
    pub delta: Vector3D,
    pub length_ft: f64,
    pub flags: NetworkShotFlags,
}
