// PPMX: a PPM context model coupled with a binary arithmetic coder
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

pub mod context_model;
pub mod context_table;
pub mod static_table;
#[cfg(test)]
mod unit_tests;

pub use context_model::{ExclusionSet, FrequencyModel};
pub use context_table::{ContextEntry, SymbolIndex};

use crate::number_types::{ConstrainedNum, FREQUENCY_BITS};

/// Number type for all frequencies, used to limit a frequency's bits
pub type Frequency = ConstrainedNum<FREQUENCY_BITS>;

/// A struct describing the Cumulative Frequency Interval of a symbol
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cfi {
    pub start: Frequency,
    pub end: Frequency,
    pub total: Frequency,
}

/// A read-only view over a set of cumulative frequencies, indexed by position.
///
/// Implementations back the order-(-1) fallback distribution: a static table built once from a
/// histogram, or a mutable one that can be seeded and later queried the same way.
pub trait FrequencyTable {
    /// Returns the CFI assigned to the symbol at `index`, or None if `index` is out of range.
    fn get_cfi(&self, index: usize) -> Option<Cfi>;

    /// Returns the index whose CFI contains `cumulative_frequency`, or None if out of range.
    fn get_index(&self, cumulative_frequency: Frequency) -> Option<usize>;

    /// The sum of all frequencies held by the table.
    fn get_total(&self) -> Frequency;
}
