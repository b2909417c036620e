//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Command-line front end for the `uhex` library: composes Universal Hex
//! files out of per-board IHEX inputs, decomposes them back, and checks an
//! input's shape. All file I/O and argument parsing live here; the library
//! crate itself never touches the filesystem.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "uhex", version, about = "Compose and decompose Universal Hex firmware images")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Compose one Universal Hex from one or more labelled IHEX files.
  Compose {
    /// `board_id:path` pairs, e.g. `9900:board-v1.hex`. The board ID is parsed as hex.
    #[arg(long = "board", required = true, value_name = "ID:PATH")]
    boards: Vec<String>,

    /// Use the fixed-size block layout instead of the default contiguous section layout.
    #[arg(long)]
    blocks: bool,

    /// Output path for the composed Universal Hex.
    #[arg(short, long)]
    output: PathBuf,
  },

  /// Decompose a Universal Hex into one IHEX file per board.
  Decompose {
    /// Path to the Universal Hex input.
    input: PathBuf,

    /// Directory to write one `<board_id>.hex` file into per board.
    #[arg(short, long)]
    output_dir: PathBuf,
  },

  /// Report whether a file is a Universal Hex, and whether it carries the MakeCode-for-V1 signature.
  Check {
    /// Path to the file to inspect.
    input: PathBuf,
  },
}

fn main() -> Result<()> {
  env_logger::init();
  let cli = Cli::parse();

  match cli.command {
    Command::Compose { boards, blocks, output } => run_compose(&boards, blocks, &output),
    Command::Decompose { input, output_dir } => run_decompose(&input, &output_dir),
    Command::Check { input } => run_check(&input),
  }
}

fn run_compose(boards: &[String], blocks: bool, output: &PathBuf) -> Result<()> {
  let mut hexes = Vec::with_capacity(boards.len());
  for entry in boards {
    let (id_str, path) = entry
      .split_once(':')
      .with_context(|| format!("--board entry {entry:?} is not of the form ID:PATH"))?;
    let board_id = u16::from_str_radix(id_str.trim_start_matches("0x"), 16)
      .with_context(|| format!("board ID {id_str:?} is not valid hex"))?;
    let contents = fs::read_to_string(path)
      .with_context(|| format!("failed to read input file {path:?}"))?;
    log::debug!("loaded {} bytes of IHEX for board {board_id:#06X}", contents.len());
    hexes.push((board_id, contents));
  }

  let uhex = uhex::create_universal_hex(&hexes, blocks)
    .context("failed to compose Universal Hex")?;

  fs::write(output, uhex)
    .with_context(|| format!("failed to write output file {output:?}"))?;

  println!("wrote Universal Hex for {} board(s) to {}", hexes.len(), output.display());
  Ok(())
}

fn run_decompose(input: &PathBuf, output_dir: &PathBuf) -> Result<()> {
  let contents = fs::read_to_string(input)
    .with_context(|| format!("failed to read input file {input:?}"))?;

  let boards = uhex::separate_universal_hex(&contents)
    .context("failed to decompose Universal Hex")?;

  fs::create_dir_all(output_dir)
    .with_context(|| format!("failed to create output directory {output_dir:?}"))?;

  for (board_id, ihex) in &boards {
    let path = output_dir.join(format!("{board_id:04x}.hex"));
    fs::write(&path, ihex).with_context(|| format!("failed to write {path:?}"))?;
    println!("wrote board {board_id:#06X} to {}", path.display());
  }

  println!("decomposed into {} board(s)", boards.len());
  Ok(())
}

fn run_check(input: &PathBuf) -> Result<()> {
  let contents = fs::read_to_string(input)
    .with_context(|| format!("failed to read input file {input:?}"))?;

  if uhex::is_universal_hex(&contents) {
    println!("{}: Universal Hex", input.display());
  } else {
    println!("{}: plain IHEX", input.display());
    if uhex::is_makecode_for_v1_hex(&contents) {
      println!("  carries the MakeCode-for-V1 authoring signature");
    }
  }
  Ok(())
}
