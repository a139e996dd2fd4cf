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

use crate::config::ConfigurationError;
use thiserror::Error;

/// Errors surfaced by the codec to its harness/CLI boundary.
///
/// Every variant here is fatal for the session it occurs in: there is no local recovery once the
/// encoder/decoder state has desynchronized, since both sides are deterministic and must agree
/// bit-for-bit.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Raised when interval narrowing collapses `high <= low`, or when a decode query finds no
    /// symbol for an otherwise-valid point: both indicate precision collapse or model
    /// desynchronization between encoder and decoder.
    #[error("arithmetic invariant violated while coding symbol #{symbol_index}: {detail}")]
    InvariantViolation { symbol_index: usize, detail: String },

    /// The decoder ran out of usable state before producing EOF. Always signals corrupted or
    /// truncated input, since the coder tolerates reading zero-padding past the real stream.
    #[error("decoder exhausted its input before producing EOF; the stream is truncated or corrupted")]
    DecodeExhausted,

    /// `BitBuffer::append` only accepts `bool`, so this is unreachable in this implementation -
    /// kept for parity with the bit-level push operation other variants expose directly.
    #[error("bit push given a value outside {{0,1}}: {0}")]
    BadBit(u8),
}
