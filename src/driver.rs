//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Top-level entry point: combines one IHEX fragment per board into a single
//! Universal Hex, stitching together whichever composer layout was asked for.

use crate::composer::{compose_block, compose_section};
use crate::error::ComposeError;
use crate::record;

/// Composes `hexes` (one `(board_id, ihex)` pair per board) into a single
/// Universal Hex string.
///
/// `blocks` selects the physical layout: `true` for the block layout (fixed
/// 512-character blocks, skippable by a bootloader that only cares about one
/// board), `false` for the section layout (one contiguous region per board,
/// smaller but not block-skippable).
///
/// Every fragment but the last has its own trailing EndOfFile record
/// stripped, so the combined stream still ends in exactly one.
pub fn create_universal_hex(hexes: &[(u16, String)], blocks: bool) -> Result<String, ComposeError> {
  if hexes.is_empty() {
    return Ok(String::new());
  }

  log::info!(
    "composing {} board(s) using the {} layout",
    hexes.len(),
    if blocks { "block" } else { "section" }
  );

  let eof_line = format!("{}\n", record::end_of_file_record());
  let mut out = String::new();

  for (index, (board_id, ihex)) in hexes.iter().enumerate() {
    let mut fragment = if blocks {
      compose_block(ihex, *board_id)
    } else {
      compose_section(ihex, *board_id)
    }?;

    let is_last = index == hexes.len() - 1;
    if !is_last {
      if let Some(stripped) = fragment.strip_suffix(&eof_line) {
        fragment.truncate(stripped.len());
      }
    }

    out.push_str(&fragment);
  }

  if !out.ends_with(&eof_line) {
    out.push_str(&eof_line);
  }

  Ok(out)
}

#[cfg(test)]
mod tests {

  use super::*;
  use crate::decomposer::separate_universal_hex;
  use crate::stream;

  const BOARD_A: &str =
    ":020000040000FA\n:10000000000102030405060708090A0B0C0D0E0F74\n:00000001FF\n";
  const BOARD_B: &str =
    ":020000040000FA\n:10001000101112131415161718191A1B1C1D1E1FB4\n:00000001FF\n";

  #[test]
  fn test_create_universal_hex_empty_input() {
    assert_eq!(create_universal_hex(&[], false).unwrap(), "");
  }

  #[test]
  fn test_create_universal_hex_single_board_ends_with_one_eof() {
    let hexes = vec![(0x9900u16, BOARD_A.to_owned())];
    let out = create_universal_hex(&hexes, false).unwrap();
    assert_eq!(out.matches(":00000001FF").count(), 1);
    assert!(out.ends_with(":00000001FF\n"));
  }

  #[test]
  fn test_create_universal_hex_multi_board_has_single_trailing_eof() {
    let hexes = vec![(0x9903u16, BOARD_A.to_owned()), (0x9900u16, BOARD_B.to_owned())];
    let out = create_universal_hex(&hexes, false).unwrap();
    assert_eq!(out.matches(":00000001FF").count(), 1);
  }

  #[test]
  fn test_create_universal_hex_is_recognized_and_round_trips() {
    let hexes = vec![(0x9903u16, BOARD_A.to_owned()), (0x1234u16, BOARD_B.to_owned())];
    let out = create_universal_hex(&hexes, false).unwrap();
    assert!(stream::is_universal_hex(&out));

    let recovered = separate_universal_hex(&out).unwrap();
    assert_eq!(recovered, hexes);
  }

  #[test]
  fn test_create_universal_hex_block_layout_round_trips() {
    let hexes = vec![(0x9900u16, BOARD_A.to_owned()), (0x1234u16, BOARD_B.to_owned())];
    let out = create_universal_hex(&hexes, true).unwrap();
    let recovered = separate_universal_hex(&out).unwrap();
    assert_eq!(recovered, hexes);
  }

  #[test]
  fn test_create_universal_hex_propagates_composer_errors() {
    let already_uhex = create_universal_hex(&[(0x9900, BOARD_A.to_owned())], false).unwrap();
    let hexes = vec![(0x9900u16, already_uhex)];
    assert!(create_universal_hex(&hexes, false).is_err());
  }
}
