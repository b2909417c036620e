//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Splits a Universal Hex back into one labelled IHEX stream per board.

use std::collections::HashMap;

use crate::error::DecomposeError;
use crate::record::{self, RecordType};
use crate::stream;

struct BoardRecords {
  last_ext_addr: String,
  records: Vec<String>,
}

/// Splits `s` into `(board_id, ihex_string)` pairs, one per board found in
/// the input, in the order each board's BlockStart was first encountered.
///
/// CustomData records are relabelled back to Data. Repeated Extended Linear
/// Address records for a board are deduplicated. Any board whose last record
/// isn't already an EndOfFile record gets one appended.
pub fn separate_universal_hex(s: &str) -> Result<Vec<(u16, String)>, DecomposeError> {
  let records = stream::split_records(s);
  if records.is_empty() {
    return Err(DecomposeError::UniversalHexEmpty);
  }
  if !stream::is_universal_hex_records(&records) {
    return Err(DecomposeError::UniversalHexShapeInvalid);
  }

  let mut order: Vec<u16> = Vec::new();
  let mut boards: HashMap<u16, BoardRecords> = HashMap::new();
  let mut current_board_id: Option<u16> = None;

  let mut i = 0usize;
  while i < records.len() {
    let record_str = &records[i];
    let record_type = record::get_record_type(record_str)?;

    match record_type {
      RecordType::Data
      | RecordType::EndOfFile
      | RecordType::ExtendedSegmentAddress
      | RecordType::StartSegmentAddress => {
        let board_id = current_board_id
          .expect("uhex shape invariant: a board is always open before this record type");
        boards
          .get_mut(&board_id)
          .expect("board_id always has an entry once current_board_id is set")
          .records
          .push(record_str.clone());
        i += 1;
      }

      RecordType::CustomData => {
        let board_id = current_board_id
          .expect("uhex shape invariant: a board is always open before CustomData");
        let converted = record::convert_to(record_str, RecordType::Data)?;
        boards
          .get_mut(&board_id)
          .expect("board_id always has an entry once current_board_id is set")
          .records
          .push(converted);
        i += 1;
      }

      RecordType::ExtendedLinearAddress => {
        let next_is_block_start = records
          .get(i + 1)
          .map(|next| record::get_record_type(next))
          .transpose()?
          == Some(RecordType::BlockStart);

        if !next_is_block_start {
          // An ELA that isn't introducing a new block (e.g. one the
          // composer re-emitted mid-block because the input crossed
          // a 64KB boundary) belongs to whichever board is already
          // open; dedup it against that board's last ELA exactly
          // like the block-opening case below.
          let board_id = current_board_id
            .expect("uhex shape invariant: a board is always open before this record type");
          let state = boards
            .get_mut(&board_id)
            .expect("board_id always has an entry once current_board_id is set");
          if state.last_ext_addr != *record_str {
            state.last_ext_addr = record_str.clone();
            state.records.push(record_str.clone());
          }
          i += 1;
          continue;
        }

        let block_start_data = record::get_record_data(&records[i + 1])?;
        if block_start_data.len() != 4 {
          return Err(DecomposeError::BlockStartDataInvalid(
            block_start_data.len(),
          ));
        }
        let board_id =
          ((block_start_data[0] as u16) << 8) | (block_start_data[1] as u16);
        current_board_id = Some(board_id);

        match boards.get_mut(&board_id) {
          None => {
            order.push(board_id);
            boards.insert(
              board_id,
              BoardRecords {
                last_ext_addr: record_str.clone(),
                records: vec![record_str.clone()],
              },
            );
            i += 2;
          }
          Some(state) => {
            if state.last_ext_addr != *record_str {
              state.last_ext_addr = record_str.clone();
              state.records.push(record_str.clone());
            }
            i += 1;
          }
        }
      }

      // BlockStart (already consumed above), BlockEnd, PaddedData and
      // OtherData are framing/filler, not part of any board's IHEX.
      RecordType::BlockStart
      | RecordType::BlockEnd
      | RecordType::PaddedData
      | RecordType::OtherData
      | RecordType::StartLinearAddress => {
        i += 1;
      }
    }
  }

  log::debug!("separated Universal Hex into {} board(s)", order.len());

  let eof = record::end_of_file_record();
  let mut out = Vec::with_capacity(order.len());
  for board_id in order {
    let mut state = boards.remove(&board_id).expect("board listed in order");
    if state.records.last() != Some(&eof) {
      state.records.push(eof.clone());
    }
    let ihex = state
      .records
      .iter()
      .map(|r| format!("{r}\n"))
      .collect::<String>();
    out.push((board_id, ihex));
  }

  Ok(out)
}
