//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Error types for every fallible component of the crate.
//!
//! Each family of operations gets its own [`thiserror::Error`] enum rather than
//! a single catch-all, so callers can match on the variant that matters to them.

use thiserror::Error;

/// Errors produced by the hex/byte utilities.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum HexError {
  #[error("hex string has odd length: {0:?}")]
  OddLength(String),
  #[error("hex string contains a non-hexadecimal character: {0:?}")]
  InvalidHexCharacter(String),
}

/// Errors produced while building, validating or parsing an individual record.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum RecordError {
  #[error("record string length {0} is out of range [{MIN_RECORD_LEN}, {MAX_RECORD_LEN}]", MIN_RECORD_LEN = crate::record::MIN_RECORD_LEN, MAX_RECORD_LEN = crate::record::MAX_RECORD_LEN)]
  RecordLengthOutOfRange(usize),
  #[error("record does not start with ':': {0:?}")]
  RecordStartInvalid(String),
  #[error("record type 0x{0:02X} is not a recognized record type")]
  RecordTypeInvalid(u8),
  #[error("record byte count implies a shorter record than was supplied: {0:?}")]
  RecordByteCountInconsistent(String),
  #[error("address {0:#06X} is out of range for a 16-bit record address")]
  RecordAddressOutOfRange(u32),
  #[error("data length {0} exceeds the maximum of {max} bytes", max = crate::record::RECORD_DATA_MAX_BYTES)]
  RecordDataTooLarge(usize),
  #[error("address {0:#X} does not fit in 32 bits")]
  ExtLinearAddressOutOfRange(u64),
  #[error("extended segment address record data is not a valid 0x1000-aligned segment: {0:?}")]
  ExtSegmentRecordInvalid(String),
  #[error(transparent)]
  Hex(#[from] HexError),
}

/// Errors produced while scanning a stream of records for shape or padding metadata.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum StreamError {
  #[error("data field length {0} exceeds the maximum of {max} bytes", max = crate::record::RECORD_DATA_MAX_BYTES)]
  DataFieldLengthTooLarge(usize),
}

/// Errors produced while composing a Universal Hex fragment from a labelled IHEX.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ComposeError {
  #[error("input is already a Universal Hex for board {0:#06X}")]
  AlreadyUniversalHex(u16),
  #[error("trailing records found after the end-of-file record: {0}")]
  TrailingRecordsAfterEof(String),
  #[error(transparent)]
  Record(#[from] RecordError),
  #[error(transparent)]
  Stream(#[from] StreamError),
}

/// Errors produced while recovering per-board IHEX streams from a Universal Hex.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DecomposeError {
  #[error("universal hex input contains no records")]
  UniversalHexEmpty,
  #[error("input does not have the shape of a universal hex (missing leading ELA+BlockStart or trailing EOF)")]
  UniversalHexShapeInvalid,
  #[error("block start record data length {0} is not 4 bytes")]
  BlockStartDataInvalid(usize),
  #[error(transparent)]
  Record(#[from] RecordError),
}
