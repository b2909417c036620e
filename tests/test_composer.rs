//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Black-box tests of the composer, exercised only through the public crate API.

use uhex::{compose_block, compose_section, ComposeError};

const BOARD_A: &str =
  ":020000040000FA\n:10000000000102030405060708090A0B0C0D0E0F74\n:00000001FF\n";

#[test]
fn section_layout_matches_the_documented_opening_and_length() {
  let out = compose_section(BOARD_A, 0x9900).unwrap();
  assert!(out.starts_with(":020000040000FA\n:0400000A9900C0DEBB\n"));
  assert!(out.ends_with(":00000001FF\n"));
  assert_eq!(out.len() % 512, 0);
}

#[test]
fn block_layout_is_recognized_as_universal_hex() {
  let out = compose_block(BOARD_A, 0x9900).unwrap();
  assert!(uhex::is_universal_hex(&out));
  assert_eq!(out.len() % 512, 0);
}

#[test]
fn non_v1_board_replaces_data_records_with_custom_data() {
  let section = compose_section(BOARD_A, 0x1234).unwrap();
  assert!(!section.contains(":1000000000"));
  assert!(section.contains(":1000000D00"));
}

#[test]
fn composing_an_already_universal_input_is_rejected() {
  let uhex_str = compose_section(BOARD_A, 0x9900).unwrap();
  assert_eq!(
    compose_section(&uhex_str, 0x9900),
    Err(ComposeError::AlreadyUniversalHex(0x9900))
  );
  assert_eq!(
    compose_block(&uhex_str, 0x9900),
    Err(ComposeError::AlreadyUniversalHex(0x9900))
  );
}

#[test]
fn empty_input_composes_to_empty_output() {
  assert_eq!(compose_section("", 0x9900).unwrap(), "");
  assert_eq!(compose_block("", 0x9900).unwrap(), "");
}
