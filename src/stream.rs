//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Operations over a whole stream of records: splitting a string into records,
//! recognizing Universal Hex shape, and measuring the dominant data-field width
//! used for padding.

use crate::error::StreamError;
use crate::record::{self, RecordType, MAX_RECORD_LEN, MIN_RECORD_LEN, RECORD_DATA_MAX_BYTES};

/// Splits an IHEX string into individual record strings. `\r` is stripped
/// everywhere; blank lines are dropped; order is preserved.
pub fn split_records(s: &str) -> Vec<String> {
  s.replace('\r', "")
    .split('\n')
    .filter(|line| !line.is_empty())
    .map(str::to_owned)
    .collect()
}

/// Walks `records` and returns the padding-record data width the composer
/// should use: the largest data-field byte length that either recurs at least
/// 13 times or is ever surpassed.
///
/// Keeps the source's early-exit heuristic (`count > 12`): on non-adversarial
/// inputs this yields the same final value as a full scan; see DESIGN.md.
pub fn find_data_field_length(records: &[String]) -> Result<usize, StreamError> {
  let mut max: usize = 16;
  let mut count: usize = 0;

  for record in records {
    let d = record.len().saturating_sub(MIN_RECORD_LEN) / 2;
    if d > max {
      max = d;
      count = 0;
    } else if d == max {
      count += 1;
    }
    if count > 12 {
      break;
    }
  }

  if max > RECORD_DATA_MAX_BYTES {
    return Err(StreamError::DataFieldLengthTooLarge(max));
  }

  Ok(max)
}

fn record_type_of(record: &str) -> Option<RecordType> {
  record::get_record_type(record).ok()
}

/// True iff `records` has the shape of a Universal Hex: it opens with an
/// Extended Linear Address record followed by a BlockStart record, and ends
/// with an EndOfFile record.
pub fn is_universal_hex_records(records: &[String]) -> bool {
  if records.len() < 2 {
    return false;
  }

  let first_is_ela = record_type_of(&records[0]) == Some(RecordType::ExtendedLinearAddress);
  let second_is_block_start = record_type_of(&records[1]) == Some(RecordType::BlockStart);
  let last_is_eof =
    record_type_of(&records[records.len() - 1]) == Some(RecordType::EndOfFile);

  first_is_ela && second_is_block_start && last_is_eof
}

/// True iff `records` carries the signature left behind by the MakeCode
/// authoring tool when targeting V1 boards: either the stream ends right at
/// the first EndOfFile and is preceded by the `0x20000000` Extended Linear
/// Address record, or records appear after the first EndOfFile that are
/// OtherData or further occurrences of that same address record.
///
/// This exists only to enrich error messages; it is never a validation gate.
pub fn is_makecode_for_v1_records(records: &[String]) -> bool {
  let v1_ela = match record::ext_lin_address_record(0x2000_0000) {
    Ok(record) => record,
    Err(_) => return false,
  };

  let first_eof_index = records
    .iter()
    .position(|r| record_type_of(r) == Some(RecordType::EndOfFile));

  let Some(eof_index) = first_eof_index else {
    return false;
  };

  let ends_at_first_eof = eof_index == records.len() - 1;
  let v1_ela_seen_before_eof = records[..eof_index].iter().any(|r| r == &v1_ela);

  let case_a = ends_at_first_eof && v1_ela_seen_before_eof;

  let case_b = records[(eof_index + 1)..].iter().any(|r| {
    record_type_of(r) == Some(RecordType::OtherData) || r == &v1_ela
  });

  case_a || case_b
}

/// True iff `s` carries the MakeCode-for-V1 signature (see
/// [`is_makecode_for_v1_records`]). Splits `s` into records and enriches
/// nothing else; this is purely a diagnostic helper for callers, mirroring
/// the role it plays inside the composer's error messages.
pub fn is_makecode_for_v1_hex(s: &str) -> bool {
  is_makecode_for_v1_records(&split_records(s))
}

/// Inexpensive prefix check for whether `s` is shaped like a Universal Hex,
/// without fully parsing it: it must begin with the Extended Linear Address
/// signature `:02000004`, and the next record (found via a bounded scan) must
/// begin with the BlockStart signature `:0400000A`.
///
/// The scan is bounded to `MAX_RECORD_LEN + 3` characters so adversarial input
/// cannot force an unbounded search for the next `:`.
pub fn is_universal_hex(s: &str) -> bool {
  const ELA_SIGNATURE: &str = ":02000004";
  const BLOCK_START_SIGNATURE: &str = ":0400000A";

  if !s.starts_with(ELA_SIGNATURE) {
    return false;
  }

  let bytes = s.as_bytes();
  let scan_limit = (MAX_RECORD_LEN + 3).min(bytes.len());

  let mut i = 1;
  while i < scan_limit {
    if bytes[i] == b':' {
      return s[i..].starts_with(BLOCK_START_SIGNATURE);
    }
    i += 1;
  }

  false
}
