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

//! A small unit-of-measure system, generic over the stored value and the
//! enumerated unit, so conversions funnel through one audited path instead of
//! being reimplemented at every call site that needs feet-from-meters or
//! degrees-from-grads.

pub mod constants;

mod angle;
mod length;

pub use angle::{Angle, AngleUnit};
pub use length::{Length, LengthUnit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The physical quantity a [`UnitOfMeasure`] belongs to.
///
/// Only used to keep conversions from accidentally mixing, say, a length
/// unit into an angle context; the kernel and parsers are otherwise
/// strongly typed by `Length`/`Angle` themselves.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PhysicalQuantity {
    Length,
    Angle,
}

/// A unit that can convert a raw value to and from its quantity's SI form.
pub trait UnitOfMeasure<T>: Copy {
    fn quantity() -> PhysicalQuantity;

    /// The unit this quantity's SI representation is stored in.
    fn si() -> Self;

    fn to_si(&self, value: &T) -> T;

    fn from_si(value: T, to: &Self) -> T;
}

/// A value paired with the unit it is expressed in.
///
/// The value is always stored in `unit`, not converted to SI eagerly;
/// `to_si`/`convert_to` perform the conversion on demand. This mirrors how
/// survey readings arrive already in whatever unit a format descriptor
/// names, and are only normalised to feet/degrees when the kernel needs
/// them in that form.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement<T, U> {
    pub(crate) value: T,
    pub(crate) unit: U,
}

impl<T, U> Measurement<T, U>
where
    T: Copy,
    U: UnitOfMeasure<T>,
{
    pub fn new(value: T, unit: U) -> Self {
        Self { value, unit }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn unit(&self) -> &U {
        &self.unit
    }

    /// Converts the stored value into `unit`'s SI representation.
    pub fn to_si(&self) -> T {
        self.unit.to_si(&self.value)
    }

    /// Builds a `Measurement` from a value already expressed in SI units.
    pub fn from_si(value: T, unit: U) -> Self {
        Self {
            value: U::from_si(value, &unit),
            unit,
        }
    }

    /// Returns an equivalent measurement expressed in `unit`.
    pub fn convert_to(&self, unit: U) -> Self {
        Self::from_si(self.to_si(), unit)
    }
}

impl<T: PartialEq, U: PartialEq> PartialEq for Measurement<T, U> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.unit == other.unit
    }
}
