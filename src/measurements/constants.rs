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

/// Feet per meter, as used by the reference cave-surveying calculators.
///
/// Kept at this precision (rather than the geodetic `1/0.3048`) because the
/// shot-to-delta kernel's rotation-invariance tests are sensitive to it.
pub const FEET_IN_METER: f64 = 3.280839895;

pub const INCHES_IN_FOOT: f64 = 12.0;

pub const GRADS_IN_DEGREE_DIVISOR: f64 = 400.0 / 360.0;

pub const DEGREES_IN_CIRCLE: f64 = 360.0;
