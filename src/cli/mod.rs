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

use crate::bit_buffer::bit_iter::BitIterator;
use crate::config::Configuration;
use crate::frequencies::static_table::StaticFrequencyTable;
use crate::frequencies::{Frequency, FrequencyModel, SymbolIndex};
use crate::parser::{IdentityMapper, ShiftMapper, SymbolMapper};
use crate::ppm::{PpmDecoder, PpmEncoder};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compresses a file into a `.lz` sibling using the PPM arithmetic coder
    Encode(EncodeArgs),
    /// Decompresses a `.lz` file previously produced by `encode`
    Decode(DecodeArgs),
}

/// Parameters shared by encode and decode. Since the file format carries no header, the decoder
/// must be invoked with exactly the flags the matching `encode` call used.
#[derive(Args, Clone)]
struct CodecCommonArgs {
    /// Maximum PPM context order K
    #[arg(short = 'k', long = "order", default_value_t = 5)]
    order: usize,

    /// Shrink the byte alphabet to 66 symbols via the shift-symbol scheme instead of using all
    /// 256 byte values directly
    #[arg(long)]
    shift_alphabet: bool,

    /// Path to a counts file (one non-negative integer per line) warm-starting the order-0
    /// distribution; the order-(-1) fallback always stays uniform
    #[arg(long)]
    counts: Option<PathBuf>,
}

#[derive(Args)]
struct EncodeArgs {
    /// File to compress
    input: PathBuf,
    #[command(flatten)]
    common: CodecCommonArgs,
}

#[derive(Args)]
struct DecodeArgs {
    /// `.lz` file to decompress
    input: PathBuf,
    #[command(flatten)]
    common: CodecCommonArgs,

    /// Extension given to the decoded output file
    #[arg(long, default_value = "bin")]
    ext: String,
}

/// Runs the CLI, returning any error so `main` can print it and exit non-zero.
pub fn run() -> Result<()> {
    match Cli::parse().command {
        Command::Encode(args) => run_encode(args),
        Command::Decode(args) => run_decode(args),
    }
}

fn make_mapper(common: &CodecCommonArgs) -> Box<dyn SymbolMapper> {
    if common.shift_alphabet {
        Box::new(ShiftMapper::new())
    } else {
        Box::new(IdentityMapper)
    }
}

/// Builds the order-(-1) fallback table: always uniform over every normal symbol plus EOF. The
/// harness' counts file (if any) warm-starts order 0 instead, via `seed_from_counts_file`.
fn build_fallback(alphabet_size: usize) -> Result<StaticFrequencyTable> {
    let freqs = vec![Frequency::one(); alphabet_size + 1];
    StaticFrequencyTable::new(&freqs)
}

/// Loads one non-negative integer per line, using the first `alphabet_size` values (padding with
/// 1 if the file is short) and appending a small positive count for EOF, then seeds `model`'s
/// order-0 counts from it via `FrequencyModel::seed`.
fn seed_from_counts_file(model: &mut FrequencyModel, path: &Path, alphabet_size: usize) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read counts file {}", path.display()))?;

    let mut counts: Vec<u64> = content
        .lines()
        .filter_map(|line| line.trim().parse::<u64>().ok())
        .collect();

    counts.truncate(alphabet_size);
    counts.resize(alphabet_size, 1);
    counts.push(2); // small positive count for EOF

    for (symbol, count) in counts.into_iter().enumerate() {
        model.seed(symbol, count.max(1));
    }
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let mapper = make_mapper(&args.common);
    let alphabet_size = mapper.alphabet_size();
    let config = Configuration::new(args.common.order, alphabet_size)?;
    let fallback = build_fallback(alphabet_size)?;
    let mut model = FrequencyModel::new(config.max_order(), config.esc_symbol(), fallback);
    if let Some(path) = &args.common.counts {
        seed_from_counts_file(&mut model, path, alphabet_size)?;
    }
    let mut encoder = PpmEncoder::new(&config, model);

    let mut input = Vec::new();
    File::open(&args.input)
        .with_context(|| format!("failed to open input file {}", args.input.display()))?
        .read_to_end(&mut input)?;
    let input_len = input.len();

    for byte in input {
        for symbol in mapper.encode_byte(byte) {
            encoder.encode(symbol)?;
        }
    }
    encoder.encode(config.eof_symbol())?;
    let compressed = encoder.conclude();

    let out_path = args.input.with_extension("lz");
    std::fs::write(&out_path, &compressed)
        .with_context(|| format!("failed to write compressed output {}", out_path.display()))?;

    info!(
        "Encoded {} bytes into {} bytes ({:.3}x) at {}",
        input_len,
        compressed.len(),
        compressed.len() as f64 / input_len.max(1) as f64,
        out_path.display()
    );
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let mut mapper = make_mapper(&args.common);
    let alphabet_size = mapper.alphabet_size();
    let config = Configuration::new(args.common.order, alphabet_size)?;
    let fallback = build_fallback(alphabet_size)?;
    let mut model = FrequencyModel::new(config.max_order(), config.esc_symbol(), fallback);
    if let Some(path) = &args.common.counts {
        seed_from_counts_file(&mut model, path, alphabet_size)?;
    }

    let mut compressed = Vec::new();
    File::open(&args.input)
        .with_context(|| format!("failed to open compressed file {}", args.input.display()))?
        .read_to_end(&mut compressed)?;

    let bits = BitIterator::from(compressed);
    let mut decoder = PpmDecoder::new(&config, model, bits);

    let eof: SymbolIndex = config.eof_symbol();
    let mut output = Vec::new();
    loop {
        let symbol = decoder.decode()?;
        if symbol == eof {
            break;
        }
        if let Some(byte) = mapper.decode_symbol(symbol) {
            output.push(byte);
        }
    }

    let stem = args.input.file_stem().unwrap_or_default().to_string_lossy().into_owned();
    let out_path = args.input.with_file_name(format!("{stem}-decoded.{}", args.ext));
    std::fs::write(&out_path, &output)
        .with_context(|| format!("failed to write decoded output {}", out_path.display()))?;

    info!("Decoded {} bytes at {}", output.len(), out_path.display());
    Ok(())
}
