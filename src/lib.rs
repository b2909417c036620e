//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! # The Universal Hex Library
//!
//! A library for parsing Intel HEX (IHEX) records and composing/decomposing
//! Universal Hex (UHEX): a container format that concatenates the IHEX
//! images for several microcontroller boards into one file a bootloader can
//! pick its own board's data out of.
//!
//! ```
//! use uhex::{create_universal_hex, separate_universal_hex};
//!
//! let board_a = ":020000040000FA\n:10000000000102030405060708090A0B0C0D0E0F74\n:00000001FF\n";
//! let uhex = create_universal_hex(&[(0x9900, board_a.to_owned())], false).unwrap();
//! assert!(uhex::is_universal_hex(&uhex));
//!
//! let boards = separate_universal_hex(&uhex).unwrap();
//! assert_eq!(boards, vec![(0x9900, board_a.to_owned())]);
//! ```

/// Function for computing the Intel HEX checksum.
pub mod checksum;

/// Combines per-board IHEX composer output into one Universal Hex.
pub mod composer;

/// Splits a Universal Hex back into its per-board IHEX constituents.
pub mod decomposer;

/// Top-level `create_universal_hex` entry point.
pub mod driver;

/// Typed error enums for every fallible operation this crate exposes.
pub mod error;

/// Hex-string/byte-buffer conversions.
pub mod hexutils;

/// Building, parsing, validating and retyping individual IHEX/UHEX records.
pub mod record;

/// Whole-stream operations: splitting, shape recognition, padding-width detection.
pub mod stream;

pub use composer::{compose_block, compose_section};
pub use decomposer::separate_universal_hex;
pub use driver::create_universal_hex;
pub use error::{ComposeError, DecomposeError, HexError, RecordError, StreamError};
pub use record::{Record, RecordType};
pub use stream::{is_makecode_for_v1_hex, is_universal_hex};
