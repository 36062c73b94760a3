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

//! Resolves the Open Question in `spec.md` §9: "the datum table is
//! declared to exactly match the calculator's list, but the list is not
//! reproduced". This table is `survnet-core`'s documented answer, covering
//! the datum names that recur across cave-surveying calculator
//! implementations. It is intentionally small and exact-match (case
//! sensitive, per `spec.md` §4.1); hosts needing a different list can
//! construct a [`crate::project::Project`] directly and skip the check in
//! [`crate::project::parse_project`].

const KNOWN_DATUMS: &[&str] = &[
    "WGS 1984",
    "WGS84",
    "NAD 1927",
    "NAD27",
    "NAD 1983",
    "NAD83",
    "European 1950",
    "ED50",
    "Ordnance Survey of Great Britain 1936",
    "OSGB36",
    "Tokyo",
    "WGS 1972",
    "WGS72",
];

/// Whether `name` exactly matches one of the recognised datum names.
pub fn is_known_datum(name: &str) -> bool {
    KNOWN_DATUMS.contains(&name)
}
