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

use crate::frequencies::SymbolIndex;
use crate::number_types::{FREQUENCY_BITS, INTERVAL_BITS};
use log::info;
use thiserror::Error;

/// Immutable parameters shared by an encoder/decoder pair. `W`, the coder's precision, is fixed
/// at compile time via [`INTERVAL_BITS`]/[`FREQUENCY_BITS`] rather than carried here: this
/// codec's `ConstrainedNum<BITS>` representation is a const generic, so picking `W` at runtime
/// would require either dynamic dispatch over every bit width or giving up the type-level
/// overflow guarantees those constants buy. A fixed, generous `W` (33 interval bits over 31
/// frequency bits) comfortably covers every alphabet this codec targets.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    /// Maximum context order `K`.
    max_order: usize,
    /// Alphabet size `N`, excluding EOF and ESC.
    alphabet_size: usize,
}

impl Configuration {
    /// Builds a configuration for context order `max_order` and `alphabet_size` normal symbols.
    pub fn new(max_order: usize, alphabet_size: usize) -> Result<Self, ConfigurationError> {
        if alphabet_size < 1 {
            return Err(ConfigurationError::AlphabetTooSmall(alphabet_size));
        }
        if INTERVAL_BITS < FREQUENCY_BITS + 2 {
            return Err(ConfigurationError::PrecisionTooSmall {
                interval_bits: INTERVAL_BITS,
                frequency_bits: FREQUENCY_BITS,
            });
        }
        info!(
            "Configuration: max_order={max_order}, alphabet_size={alphabet_size}, interval_bits={INTERVAL_BITS}, frequency_bits={FREQUENCY_BITS}"
        );
        Ok(Self {
            max_order,
            alphabet_size,
        })
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// The distinguished end-of-stream symbol, `N`.
    pub fn eof_symbol(&self) -> SymbolIndex {
        self.alphabet_size
    }

    /// The escape pseudo-symbol, `N+1`.
    pub fn esc_symbol(&self) -> SymbolIndex {
        self.alphabet_size + 1
    }

    /// Size of the order-(-1) fallback alphabet: every normal symbol plus EOF, but not ESC (the
    /// fallback never escapes).
    pub fn fallback_alphabet(&self) -> usize {
        self.alphabet_size + 1
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("alphabet size N must be at least 1, got {0}")]
    AlphabetTooSmall(usize),

    #[error(
        "precision too small: INTERVAL_BITS ({interval_bits}) must be at least FREQUENCY_BITS + 2 ({})",
        frequency_bits + 2
    )]
    PrecisionTooSmall { interval_bits: u32, frequency_bits: u32 },
}
