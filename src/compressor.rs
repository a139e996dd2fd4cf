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

use crate::bit_buffer::BitBuffer;
use crate::frequencies::Cfi;
use crate::interval::{Interval, IntervalBoundary, IntervalState};
use anyhow::Result;

/// The encoding half of the integer-range arithmetic coder.
///
/// Narrows an [`Interval`] by one symbol's [`Cfi`] at a time, emitting settled bits (E1/E2) and
/// tracking unresolved middle-zoom steps (E3, the "straddle"/outstanding bits) until the session
/// is concluded.
pub struct ArithmeticEncoder {
    /// Number of pending bits put aside during near-convergence (E3): their value is unknown
    /// until a converging bit `b` is found, at which point they all resolve to `!b`.
    outstanding_bits: usize,

    /// The buffer holding the output bits.
    output: BitBuffer,

    /// The interval the encoder narrows with each symbol.
    interval: Interval,
}

impl ArithmeticEncoder {
    /// Creates a new encoder over the full `[0, 1)` interval, with an empty output.
    pub fn new() -> Self {
        Self {
            outstanding_bits: 0,
            output: BitBuffer::new(),
            interval: Interval::full_interval(),
        }
    }

    /// Narrows the interval by `cfi` and emits every bit the narrowing settles.
    pub fn encode(&mut self, cfi: Cfi) -> Result<()> {
        self.interval.update(cfi);
        self.process_interval_state()
    }

    /// Processes the state of the interval until it is non-converging, emitting (or deferring)
    /// bits along the way.
    fn process_interval_state(&mut self) -> Result<()> {
        loop {
            let (low, high) = match self.interval.get_state() {
                // E1/E2: the MSBs of low and high agree, so that bit is settled. Emit it, then
                // flush any outstanding bits (their value resolves to the opposite of it).
                IntervalState::Converging(bit) => {
                    self.output.append(bit);
                    self.output.append_repeated(!bit, self.outstanding_bits);
                    self.outstanding_bits = 0;

                    let low = self.interval.low() << 1u8;
                    let high = (self.interval.high() << 1u8) | 1u8;
                    (low, high)
                }
                // E3: low = 01xx.. and high = 10yy.., neither settled but squeezed toward the
                // middle. Defer a bit; its value depends on whichever side wins next.
                IntervalState::NearConvergence => {
                    self.outstanding_bits += 1;
                    let half = self.interval.system().half();
                    let low = (self.interval.low() << 1u8) ^ half;
                    let high = (self.interval.high() << 1u8) | (*half + 1);
                    (low, high)
                }
                IntervalState::NoConvergence => break Ok(()),
            };
            self.interval
                .set_low(low)
                .and_then(|_| self.interval.set_high(high))?;
        }
    }

    /// Flushes enough bits to disambiguate the final interval and returns the finished byte
    /// stream. Consumes the encoder: it is unusable afterward.
    pub fn conclude(mut self) -> Vec<u8> {
        let half = *self.interval.system().half();
        let max = *IntervalBoundary::max();
        let mut mid = *self.interval.low() + (*self.interval.high() - *self.interval.low()) / 2;

        if self.outstanding_bits > 0 {
            let bit = mid >= half;
            self.output.append(bit);
            self.output.append_repeated(!bit, self.outstanding_bits);
            self.outstanding_bits = 0;
            mid = (mid << 1) & max;
        }

        while mid != 0 {
            let bit = mid >= half;
            self.output.append(bit);
            mid = (mid << 1) & max;
        }

        let mut bytes: Vec<u8> = self.output.get_complete_bytes().collect();
        if let Some(leftover) = self.output.get_leftover_bits() {
            bytes.push(leftover);
        }
        bytes
    }
}

impl Default for ArithmeticEncoder {
    fn default() -> Self {
        Self::new()
    }
}
