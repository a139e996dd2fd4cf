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

//! Alphabet pre-mapping: a thin, deterministic, invertible transform between bytes and the PPM
//! model's symbol alphabet, kept outside the core codec entirely.

use crate::frequencies::SymbolIndex;

/// Maps bytes to PPM symbols and back. Implementations may be stateful on the decode side (the
/// shift-symbol scheme needs to remember the last shift it saw).
pub trait SymbolMapper {
    /// Number of normal symbols this mapper emits, not counting EOF/ESC.
    fn alphabet_size(&self) -> usize;

    /// Maps one input byte to one or more symbols.
    fn encode_byte(&self, byte: u8) -> Vec<SymbolIndex>;

    /// Feeds one decoded symbol in; returns a byte once a full byte's worth of symbols has been
    /// seen (shift symbols alone never produce a byte).
    fn decode_symbol(&mut self, symbol: SymbolIndex) -> Option<u8>;
}

/// Identity mapping: alphabet size 256, each byte is its own symbol. Used whenever the harness
/// doesn't need to shrink the alphabet.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityMapper;

impl SymbolMapper for IdentityMapper {
    fn alphabet_size(&self) -> usize {
        256
    }

    fn encode_byte(&self, byte: u8) -> Vec<SymbolIndex> {
        vec![byte as SymbolIndex]
    }

    fn decode_symbol(&mut self, symbol: SymbolIndex) -> Option<u8> {
        Some(symbol as u8)
    }
}

/// Shrinks the 256-byte alphabet into 66 symbols (64 data symbols plus two shift symbols), so
/// the PPM model only ever has to reason about a 6-bit-ish alphabet.
///
/// Symbol 64 ("shift 64") and symbol 65 ("shift 128") precede a data symbol in `0..64` to push
/// it into the upper halves of the byte range: `byte = data_symbol - decr`, where `decr` starts
/// at `-64` for every new byte and accumulates `+64`/`-128` per shift symbol seen. This covers
/// the full `0..256` byte range with only two extra pseudo-symbols:
///
/// | byte range | encoding |
/// |---|---|
/// | `0..64`    | `[64, byte]` |
/// | `64..128`  | `[byte - 64]` |
/// | `128..192` | `[64, 65, byte - 128]` |
/// | `192..256` | `[65, byte - 192]` |
#[derive(Debug, Default, Clone, Copy)]
pub struct ShiftMapper {
    /// Accumulated shift offset while decoding; reset to `-64` after every full byte.
    decr: i32,
}

const SHIFT_64: SymbolIndex = 64;
const SHIFT_128: SymbolIndex = 65;

impl ShiftMapper {
    pub fn new() -> Self {
        Self { decr: -64 }
    }
}

impl SymbolMapper for ShiftMapper {
    fn alphabet_size(&self) -> usize {
        66
    }

    fn encode_byte(&self, byte: u8) -> Vec<SymbolIndex> {
        let byte = byte as i32;
        match byte {
            0..=63 => vec![SHIFT_64, byte as SymbolIndex],
            64..=127 => vec![(byte - 64) as SymbolIndex],
            128..=191 => vec![SHIFT_64, SHIFT_128, (byte - 128) as SymbolIndex],
            _ => vec![SHIFT_128, (byte - 192) as SymbolIndex],
        }
    }

    fn decode_symbol(&mut self, symbol: SymbolIndex) -> Option<u8> {
        match symbol {
            SHIFT_64 => {
                self.decr += 64;
                None
            }
            SHIFT_128 => {
                self.decr -= 128;
                None
            }
            data => {
                let byte = data as i32 - self.decr;
                self.decr = -64;
                Some(byte as u8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mapper_round_trips_every_byte() {
        let mapper = IdentityMapper;
        for byte in 0..=255u8 {
            let symbols = mapper.encode_byte(byte);
            assert_eq!(symbols, vec![byte as SymbolIndex]);
        }
    }

    #[test]
    fn shift_mapper_round_trips_every_byte() {
        let encoder = ShiftMapper::new();
        let mut decoder = ShiftMapper::new();
        for byte in 0..=255u8 {
            let symbols = encoder.encode_byte(byte);
            let mut decoded = None;
            for symbol in symbols {
                if let Some(b) = decoder.decode_symbol(symbol) {
                    decoded = Some(b);
                }
            }
            assert_eq!(decoded, Some(byte), "byte {byte} failed to round-trip");
        }
    }

    #[test]
    fn shift_mapper_alphabet_is_66() {
        assert_eq!(ShiftMapper::new().alphabet_size(), 66);
    }
}
