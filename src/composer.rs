//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Turns one labelled IHEX stream into a Universal Hex fragment, under either
//! of two physical layouts.
//!
//! The block and section layouts share almost all of their logic (the
//! preamble, the per-record translation rules, end-of-file handling); only
//! the layout/padding policy differs, so both are built on top of
//! [`translate_record`] and [`pad_and_close`].

use crate::error::ComposeError;
use crate::record::{self, RecordType, V1_BOARD_IDS};
use crate::stream;

/// Size, in characters including the internal `\n`s, of one block in the
/// block layout.
const BLOCK_SIZE: usize = 512;

/// Length of a record with zero data bytes (`:` + BB + AAAA + TT + CC).
const BASE_RECORD_LEN: usize = record::MIN_RECORD_LEN;

/// Length of a zero-data record plus its trailing newline; the minimum room
/// any closing BlockEnd can possibly need.
const MIN_CLOSE_LEN: usize = BASE_RECORD_LEN + 1;

enum TranslateEffect {
  None,
  UpdateExtAddr(String),
  EndOfFile,
}

/// Applies the shared Data/ExtSeg/ExtLin/EOF translation rule to one input
/// record, returning what (if anything) to emit and any side effect on the
/// composer's running state.
fn translate_record(
  record_str: &str,
  replace_data: bool,
) -> Result<(Option<String>, TranslateEffect), ComposeError> {
  match record::get_record_type(record_str)? {
    RecordType::Data => {
      let emitted = if replace_data {
        record::convert_to(record_str, RecordType::CustomData)?
      } else {
        record_str.to_owned()
      };
      Ok((Some(emitted), TranslateEffect::None))
    }

    RecordType::ExtendedLinearAddress => Ok((
      Some(record_str.to_owned()),
      TranslateEffect::UpdateExtAddr(record_str.to_owned()),
    )),

    RecordType::ExtendedSegmentAddress => {
      let converted = record::convert_ext_seg_to_ext_lin(record_str)?;
      Ok((
        Some(converted.clone()),
        TranslateEffect::UpdateExtAddr(converted),
      ))
    }

    RecordType::EndOfFile => Ok((None, TranslateEffect::EndOfFile)),

    _ => Ok((Some(record_str.to_owned()), TranslateEffect::None)),
  }
}

/// Shared preamble for both layouts: splits the input, rejects an
/// already-universal input, and computes the board's data-replacement policy
/// and padding width. Returns `None` when the input has no records at all.
fn composer_preamble(
  ihex_str: &str,
  board_id: u16,
) -> Result<Option<(Vec<String>, bool, usize)>, ComposeError> {
  let records = stream::split_records(ihex_str);
  if records.is_empty() {
    return Ok(None);
  }

  if stream::is_universal_hex_records(&records) {
    log::debug!("board {board_id:#06X}: input is already a Universal Hex");
    return Err(ComposeError::AlreadyUniversalHex(board_id));
  }

  let replace_data = !V1_BOARD_IDS.contains(&board_id);
  let record_pad_cap = stream::find_data_field_length(&records)?;

  log::trace!(
    "board {board_id:#06X}: replace_data={replace_data}, record_pad_cap={record_pad_cap}"
  );

  Ok(Some((records, replace_data, record_pad_cap)))
}

fn trailing_records_error(records: &[String]) -> ComposeError {
  let message = if stream::is_makecode_for_v1_records(records) {
    "records remain after the end-of-file record; input carries the MakeCode \
         V1 authoring signature"
      .to_owned()
  } else {
    "records remain after the end-of-file record".to_owned()
  };
  ComposeError::TrailingRecordsAfterEof(message)
}

/// Appends PaddedData filler to `content` until exactly `MIN_CLOSE_LEN` chars
/// of room remain before `target`, then appends the BlockEnd record that
/// closes the gap flush. Returns the resulting total length of `content`'s
/// contribution (i.e. `used` after the append).
///
/// The stopping threshold and closing-record size are derived so that no
/// combination of record sizes can overshoot `target`, which is the
/// property the composer's 512-byte alignment invariant depends on.
fn pad_and_close(
  content: &mut String,
  mut used: usize,
  target: usize,
  record_pad_cap: usize,
) -> Result<usize, ComposeError> {
  loop {
    let remaining = target - used;
    if remaining <= 2 * MIN_CLOSE_LEN {
      break;
    }
    let size = ((remaining - 2 * MIN_CLOSE_LEN) / 2).min(record_pad_cap);
    let pad = record::padded_data_record(size)?;
    content.push_str(&pad);
    content.push('\n');
    used += pad.len() + 1;
  }

  let remaining = target - used;
  let n = (remaining - MIN_CLOSE_LEN) / 2;
  let end = record::block_end_record(n)?;
  content.push_str(&end);
  content.push('\n');
  used += end.len() + 1;

  Ok(used)
}

fn round_up_to_block(n: usize) -> usize {
  ((n + BLOCK_SIZE - 1) / BLOCK_SIZE) * BLOCK_SIZE
}

/// Composes `ihex_str` into a Universal Hex fragment for `board_id` using the
/// block layout: a sequence of fixed 512-character blocks, each self
/// contained with its own leading address record and BlockStart/BlockEnd
/// framing, so a bootloader can skip whole blocks that aren't its board's.
pub fn compose_block(ihex_str: &str, board_id: u16) -> Result<String, ComposeError> {
  let Some((records, replace_data, record_pad_cap)) = composer_preamble(ihex_str, board_id)?
  else {
    return Ok(String::new());
  };

  log::debug!("board {board_id:#06X}: composing block layout");

  let mut out = String::new();
  let mut idx = 0usize;
  let mut current_ext_addr = record::ext_lin_address_record(0)?;

  loop {
    if idx < records.len() {
      match record::get_record_type(&records[idx])? {
        RecordType::ExtendedLinearAddress => {
          current_ext_addr = records[idx].clone();
          idx += 1;
        }
        RecordType::ExtendedSegmentAddress => {
          current_ext_addr = record::convert_ext_seg_to_ext_lin(&records[idx])?;
          idx += 1;
        }
        _ => {}
      }
    }

    let block_start = record::block_start_record(board_id)?;
    let mut block = String::new();
    block.push_str(&current_ext_addr);
    block.push('\n');
    block.push_str(&block_start);
    block.push('\n');
    let mut used = block.len();

    let mut eof_reached = false;
    while idx < records.len() {
      let candidate = &records[idx];
      let tentative = candidate.len() + 1;
      if used + tentative + MIN_CLOSE_LEN > BLOCK_SIZE {
        break;
      }

      let (emitted, effect) = translate_record(candidate, replace_data)?;
      idx += 1;

      match effect {
        TranslateEffect::EndOfFile => eof_reached = true,
        TranslateEffect::UpdateExtAddr(addr) => current_ext_addr = addr,
        TranslateEffect::None => {}
      }

      if let Some(emitted) = emitted {
        block.push_str(&emitted);
        block.push('\n');
        used += emitted.len() + 1;
      }

      if eof_reached {
        break;
      }
    }

    if eof_reached {
      if idx < records.len() {
        return Err(trailing_records_error(&records));
      }
      log::trace!("board {board_id:#06X}: final block closes at end-of-file");
      block.push_str(&record::block_end_record(0)?);
      block.push('\n');
      block.push_str(&record::end_of_file_record());
      block.push('\n');
      out.push_str(&block);
      break;
    }

    pad_and_close(&mut block, used, BLOCK_SIZE, record_pad_cap)?;
    out.push_str(&block);

    if idx >= records.len() {
      break;
    }
  }

  Ok(out)
}

/// Composes `ihex_str` into a Universal Hex fragment for `board_id` using the
/// section layout: one contiguous region, padded only once at the very end to
/// round the whole fragment up to a 512-character multiple.
pub fn compose_section(ihex_str: &str, board_id: u16) -> Result<String, ComposeError> {
  let Some((records, replace_data, record_pad_cap)) = composer_preamble(ihex_str, board_id)?
  else {
    return Ok(String::new());
  };

  log::debug!("board {board_id:#06X}: composing section layout");

  let mut idx = 0usize;
  let mut out = String::new();

  match record::get_record_type(&records[0])? {
    RecordType::ExtendedLinearAddress => {
      out.push_str(&records[0]);
      idx = 1;
    }
    RecordType::ExtendedSegmentAddress => {
      out.push_str(&record::convert_ext_seg_to_ext_lin(&records[0])?);
      idx = 1;
    }
    _ => {
      out.push_str(&record::ext_lin_address_record(0)?);
    }
  }
  out.push('\n');

  out.push_str(&record::block_start_record(board_id)?);
  out.push('\n');
  let mut used = out.len();

  let mut eof_reached = false;
  while idx < records.len() {
    let candidate = &records[idx];
    let (emitted, effect) = translate_record(candidate, replace_data)?;
    idx += 1;

    if let TranslateEffect::EndOfFile = effect {
      eof_reached = true;
    }

    if let Some(emitted) = emitted {
      out.push_str(&emitted);
      out.push('\n');
      used += emitted.len() + 1;
    }

    if eof_reached {
      break;
    }
  }

  if idx < records.len() {
    return Err(trailing_records_error(&records));
  }

  let target = round_up_to_block(used + MIN_CLOSE_LEN);
  pad_and_close(&mut out, used, target, record_pad_cap)?;

  if eof_reached {
    out.push_str(&record::end_of_file_record());
    out.push('\n');
  }

  Ok(out)
}
