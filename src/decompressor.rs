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

use crate::frequencies::{Cfi, Frequency};
use crate::interval::{Interval, IntervalState};
use crate::number_types::{ConstrainedNum, INTERVAL_BITS};
use anyhow::Result;

/// The decoding half of the integer-range arithmetic coder.
///
/// Mirrors [`crate::compressor::ArithmeticEncoder`] bit for bit: it does not know about symbols
/// or contexts at all, only the current interval and a `code` window into the input bits. The
/// PPM driver asks it for a cumulative-frequency `point` under a candidate total, looks that
/// point up in the model, then feeds the resulting [`Cfi`] back to narrow the interval.
pub struct ArithmeticDecoder<I: Iterator<Item = bool>> {
    /// Iterator over the compressed bits.
    bits_iter: I,

    /// Current interval in the decoding stage.
    interval: Interval,

    /// Current value from the input, used to locate the next symbol's interval within the
    /// current interval.
    code: ConstrainedNum<INTERVAL_BITS>,
}

impl<I: Iterator<Item = bool>> ArithmeticDecoder<I> {
    /// Creates a new decoder over `compressed_bits`, filling `code` with the first `INTERVAL_BITS`
    /// bits of input (treating a short stream as zero-padded).
    pub fn new(compressed_bits: I) -> Self {
        let mut this = Self {
            bits_iter: compressed_bits,
            interval: Interval::full_interval(),
            code: ConstrainedNum::zero(),
        };
        this.load_bits_to_code(INTERVAL_BITS);
        this
    }

    /// Computes the cumulative-frequency point that `code` currently represents, given a
    /// candidate `total`. The PPM driver passes this to `FrequencyModel::query` at each order.
    pub fn point(&self, total: Frequency) -> Result<Frequency> {
        let span = *self.interval.high() + 1 - *self.interval.low();
        let raw = (*total * (*self.code - *self.interval.low() + 1) - 1) / span;
        Ok(Frequency::new(raw)?)
    }

    /// Narrows the interval by the chosen symbol's `cfi` and pulls in enough new bits to resolve
    /// the renormalization this causes.
    pub fn advance(&mut self, cfi: Cfi) -> Result<()> {
        self.interval.update(cfi);
        self.process_interval_state()
    }

    /// Processes the state of the interval until it is non-converging, pulling in new bits.
    fn process_interval_state(&mut self) -> Result<()> {
        loop {
            let (low, high) = match self.interval.get_state() {
                IntervalState::Converging(_) => {
                    self.load_bits_to_code(1);
                    let low = self.interval.low() << 1u8;
                    let high = (self.interval.high() << 1u8) | 1u8;
                    (low, high)
                }
                IntervalState::NearConvergence => {
                    let half = self.interval.system().half();
                    let low = (self.interval.low() << 1u8) ^ half;
                    let high = (self.interval.high() << 1u8) | (*half + 1);

                    // code < high, so it must start with 01 just like low does.
                    self.code = ((self.code << 1u8) ^ half) | self.next_bit();
                    (low, high)
                }
                IntervalState::NoConvergence => break Ok(()),
            };
            self.interval
                .set_low(low)
                .and_then(|_| self.interval.set_high(high))?;
        }
    }

    /// Retrieves the next bit from `bits_iter` as a `ConstrainedNum`, or 0 if the stream is
    /// exhausted. The codec tolerates reading past the real input: trailing bits are implicit
    /// zeros.
    fn next_bit(&mut self) -> ConstrainedNum<INTERVAL_BITS> {
        match self.bits_iter.next() {
            None => ConstrainedNum::zero(),
            Some(b) => b.into(),
        }
    }

    /// Shifts `bits_num` bits from `bits_iter` into `code`.
    fn load_bits_to_code(&mut self, bits_num: u32) {
        for _ in 0..bits_num {
            self.code = (self.code << 1u8) | self.next_bit();
        }
    }
}
