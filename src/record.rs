//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Building, parsing, validating and retyping individual IHEX/UHEX records.

use crate::checksum::checksum;
use crate::error::RecordError;
use crate::hexutils::{byte_to_hex, bytes_to_hex, hex_str_to_bytes};

/// Maximum number of data bytes this crate will place in a single record.
///
/// Plain IHEX permits up to 255, but every record this crate creates (data
/// records, padding, block framing) stays within the narrower 32-byte range
/// the Universal Hex composer relies on.
pub const RECORD_DATA_MAX_BYTES: usize = 32;

/// The character that begins every IHEX/UHEX record.
pub const START: char = ':';

/// Smallest legal record string length: `:` + BB + AAAA + TT + CC = 1 + 2 + 4 + 2 + 2 = 11.
pub const MIN_RECORD_LEN: usize = 11;

/// Largest legal record string length: [`MIN_RECORD_LEN`] plus a 32-byte payload (64 hex chars).
pub const MAX_RECORD_LEN: usize = MIN_RECORD_LEN + 64;

/// Board IDs belonging to the "V1 family". Any board ID not in this set is
/// treated as non-V1 by default.
pub const V1_BOARD_IDS: [u16; 2] = [0x9900, 0x9901];

/// A closed, numerically-tagged enumeration of the record types this crate understands.
#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum RecordType {
  /// Up to 32 bytes of payload at a 16-bit offset.
  Data = 0x00,
  /// Terminates an object file. Must occur exactly once, at the end.
  EndOfFile = 0x01,
  /// Bits 4-19 of the segment base address.
  ExtendedSegmentAddress = 0x02,
  /// The CS:IP pair for 16-bit object files.
  StartSegmentAddress = 0x03,
  /// The upper 16 bits of a 32-bit linear load address.
  ExtendedLinearAddress = 0x04,
  /// The 32-bit linear execution start address.
  StartLinearAddress = 0x05,
  /// UHEX framing: marks the start of a 512-character block for one board.
  BlockStart = 0x0A,
  /// UHEX framing: marks the end of a 512-character block.
  BlockEnd = 0x0B,
  /// UHEX filler: 0xFF-padded data used to round a block/section out to alignment.
  PaddedData = 0x0C,
  /// A Data record relabelled so bootloaders for other boards skip it.
  CustomData = 0x0D,
  /// Authoring-tool-specific data outside the above categories.
  OtherData = 0x0E,
}

impl RecordType {
  /// Returns the single-byte type specifier corresponding to the receiver.
  pub fn value(self) -> u8 {
    self as u8
  }
}

impl TryFrom<u8> for RecordType {
  type Error = RecordError;

  fn try_from(value: u8) -> Result<Self, RecordError> {
    match value {
      0x00 => Ok(RecordType::Data),
      0x01 => Ok(RecordType::EndOfFile),
      0x02 => Ok(RecordType::ExtendedSegmentAddress),
      0x03 => Ok(RecordType::StartSegmentAddress),
      0x04 => Ok(RecordType::ExtendedLinearAddress),
      0x05 => Ok(RecordType::StartLinearAddress),
      0x0A => Ok(RecordType::BlockStart),
      0x0B => Ok(RecordType::BlockEnd),
      0x0C => Ok(RecordType::PaddedData),
      0x0D => Ok(RecordType::CustomData),
      0x0E => Ok(RecordType::OtherData),
      other => Err(RecordError::RecordTypeInvalid(other)),
    }
  }
}

/// A fully decoded IHEX/UHEX record. Owns all of its fields; never borrows from
/// the string it was parsed from.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Record {
  pub byte_count: u8,
  pub address: u16,
  pub record_type: RecordType,
  pub data: Vec<u8>,
  pub checksum: u8,
}

impl Record {
  /// Returns `true` if the checksum stored on this record matches what the
  /// record's other fields would produce.
  ///
  /// `parse` does not perform this check itself; callers that want full
  /// verification call this explicitly.
  pub fn checksum_matches(&self) -> bool {
    self.checksum == expected_checksum(self.address, self.record_type, &self.data)
  }
}

fn expected_checksum(address: u16, record_type: RecordType, data: &[u8]) -> u8 {
  let mut body = Vec::with_capacity(4 + data.len());
  body.push(data.len() as u8);
  body.push((address >> 8) as u8);
  body.push((address & 0xFF) as u8);
  body.push(record_type.value());
  body.extend_from_slice(data);
  checksum(&body)
}

/// Builds the IHEX string representation of a record with the given address,
/// type and data.
///
/// Fails if `address` does not fit in 16 bits or `data` exceeds
/// [`RECORD_DATA_MAX_BYTES`].
pub fn create(address: u32, record_type: RecordType, data: &[u8]) -> Result<String, RecordError> {
  if address > 0xFFFF {
    return Err(RecordError::RecordAddressOutOfRange(address));
  }
  if data.len() > RECORD_DATA_MAX_BYTES {
    return Err(RecordError::RecordDataTooLarge(data.len()));
  }

  Ok(format_record(address as u16, record_type, data))
}

fn format_record(address: u16, record_type: RecordType, data: &[u8]) -> String {
  let mut body = Vec::with_capacity(4 + data.len());
  body.push(data.len() as u8);
  body.push((address >> 8) as u8);
  body.push((address & 0xFF) as u8);
  body.push(record_type.value());
  body.extend_from_slice(data);

  let cksum = checksum(&body);

  let mut result = String::with_capacity(1 + 2 * (body.len() + 1));
  result.push(START);
  result.push_str(&bytes_to_hex(&body));
  result.push_str(&byte_to_hex(cksum));
  result
}

/// Checks a record string's shape: length in range and a leading start code.
/// Does not verify the checksum or record type.
pub fn validate(record_str: &str) -> Result<(), RecordError> {
  let len = record_str.len();
  if !(MIN_RECORD_LEN..=MAX_RECORD_LEN).contains(&len) {
    return Err(RecordError::RecordLengthOutOfRange(len));
  }
  if record_str.chars().next() != Some(START) {
    return Err(RecordError::RecordStartInvalid(record_str.to_owned()));
  }
  Ok(())
}

/// Decodes the hex body of a record (everything after the start code) into bytes,
/// after confirming the record's basic shape.
fn decode_record_bytes(record_str: &str) -> Result<Vec<u8>, RecordError> {
  validate(record_str)?;
  Ok(hex_str_to_bytes(&record_str[1..])?)
}

/// Extracts and validates the record type of a record string.
pub fn get_record_type(record_str: &str) -> Result<RecordType, RecordError> {
  let bytes = decode_record_bytes(record_str)?;
  RecordType::try_from(bytes[3])
}

/// Returns the decoded payload of a record string (strips start code, header, checksum).
pub fn get_record_data(record_str: &str) -> Result<Vec<u8>, RecordError> {
  let bytes = decode_record_bytes(record_str)?;
  Ok(bytes[4..bytes.len() - 1].to_vec())
}

fn get_record_address(record_str: &str) -> Result<u16, RecordError> {
  let bytes = decode_record_bytes(record_str)?;
  Ok(((bytes[1] as u16) << 8) | (bytes[2] as u16))
}

/// Fully decodes a record string into an owned [`Record`].
///
/// Fails if the decoded byte count is inconsistent with the supplied string's
/// actual length (i.e. there are excess bytes beyond what the header's byte
/// count claims). The checksum is extracted but not verified; see
/// [`Record::checksum_matches`].
pub fn parse(record_str: &str) -> Result<Record, RecordError> {
  let bytes = decode_record_bytes(record_str)?;

  let byte_count = bytes[0];
  let address = ((bytes[1] as u16) << 8) | (bytes[2] as u16);
  let record_type = RecordType::try_from(bytes[3])?;
  let data = &bytes[4..bytes.len() - 1];
  let record_checksum = bytes[bytes.len() - 1];

  if data.len() != byte_count as usize {
    return Err(RecordError::RecordByteCountInconsistent(
      record_str.to_owned(),
    ));
  }

  Ok(Record {
    byte_count,
    address,
    record_type,
    data: data.to_vec(),
    checksum: record_checksum,
  })
}

/// Re-emits a record string's address and data under a new record type,
/// recomputing the checksum.
pub fn convert_to(record_str: &str, new_type: RecordType) -> Result<String, RecordError> {
  let address = get_record_address(record_str)?;
  let data = get_record_data(record_str)?;
  Ok(format_record(address, new_type, &data))
}

/// Converts an Extended Segment Address record into the equivalent Extended
/// Linear Address record.
///
/// The input's data must be exactly 2 bytes shaped `HH 00` where `HH` is a
/// multiple of `0x10` (i.e. the segment is aligned to `0x1000`).
pub fn convert_ext_seg_to_ext_lin(record_str: &str) -> Result<String, RecordError> {
  let data = get_record_data(record_str)?;

  let valid_shape = data.len() == 2 && data[1] == 0x00 && data[0] & 0x0F == 0;
  if !valid_shape {
    return Err(RecordError::ExtSegmentRecordInvalid(
      record_str.to_owned(),
    ));
  }

  let addr32 = (data[0] as u32) << 12;
  ext_lin_address_record(addr32 as u64)
}

/// The canonical end-of-file record: `:00000001FF`.
pub fn end_of_file_record() -> String {
  ":00000001FF".to_owned()
}

/// A BlockEnd record padded with `n` bytes of `0xFF`. `4` and `12` are
/// hardcoded for speed since they are by far the most common sizes.
pub fn block_end_record(n: usize) -> Result<String, RecordError> {
  match n {
    4 => Ok(":0400000BFFFFFFFFF5".to_owned()),
    12 => Ok(":0C00000BFFFFFFFFFFFFFFFFFFFFFFFFF5".to_owned()),
    _ => create(0, RecordType::BlockEnd, &vec![0xFF; n]),
  }
}

/// A PaddedData record filled with `n` bytes of `0xFF`.
pub fn padded_data_record(n: usize) -> Result<String, RecordError> {
  create(0, RecordType::PaddedData, &vec![0xFF; n])
}

/// An Extended Linear Address record whose data is the upper 16 bits of `addr32`.
///
/// Fails if `addr32` does not fit in 32 bits.
pub fn ext_lin_address_record(addr32: u64) -> Result<String, RecordError> {
  if addr32 > u32::MAX as u64 {
    return Err(RecordError::ExtLinearAddressOutOfRange(addr32));
  }
  let upper16 = ((addr32 >> 16) & 0xFFFF) as u16;
  create(
    0,
    RecordType::ExtendedLinearAddress,
    &[(upper16 >> 8) as u8, (upper16 & 0xFF) as u8],
  )
}

/// A BlockStart record identifying `board_id`: `board_id_be16 ‖ 0xC0 0xDE`.
pub fn block_start_record(board_id: u16) -> Result<String, RecordError> {
  create(
    0,
    RecordType::BlockStart,
    &[(board_id >> 8) as u8, (board_id & 0xFF) as u8, 0xC0, 0xDE],
  )
}

#[cfg(test)]
mod tests {

  use super::*;

  #[test]
  fn test_create_data_record() {
    let record = create(
      0x0010,
      RecordType::Data,
      &[0x61, 0x64, 0x64, 0x72, 0x65, 0x73, 0x73, 0x20, 0x67, 0x61, 0x70],
    )
    .unwrap();
    assert_eq!(record, ":0B0010006164647265737320676170A7");
  }

  #[test]
  fn test_create_rejects_address_out_of_range() {
    assert_eq!(
      create(0x10000, RecordType::Data, &[]),
      Err(RecordError::RecordAddressOutOfRange(0x10000))
    );
  }

  #[test]
  fn test_create_rejects_data_too_large() {
    let data = vec![0u8; RECORD_DATA_MAX_BYTES + 1];
    assert_eq!(
      create(0, RecordType::Data, &data),
      Err(RecordError::RecordDataTooLarge(RECORD_DATA_MAX_BYTES + 1))
    );
  }

  #[test]
  fn test_validate_rejects_bad_start() {
    assert_eq!(
      validate("X0000000001FF"),
      Err(RecordError::RecordStartInvalid("X0000000001FF".to_owned()))
    );
  }

  #[test]
  fn test_validate_rejects_length_out_of_range() {
    assert_eq!(
      validate(":0001"),
      Err(RecordError::RecordLengthOutOfRange(5))
    );
  }

  #[test]
  fn test_get_record_type_rejects_invalid_type() {
    assert_eq!(
      get_record_type(":0000000610"),
      Err(RecordError::RecordTypeInvalid(0x06))
    );
  }

  #[test]
  fn test_parse_data_record() {
    let parsed = parse(":0B0010006164647265737320676170A7").unwrap();
    assert_eq!(parsed.byte_count, 11);
    assert_eq!(parsed.address, 0x0010);
    assert_eq!(parsed.record_type, RecordType::Data);
    assert_eq!(
      parsed.data,
      vec![0x61, 0x64, 0x64, 0x72, 0x65, 0x73, 0x73, 0x20, 0x67, 0x61, 0x70]
    );
    assert!(parsed.checksum_matches());
  }

  #[test]
  fn test_parse_rejects_byte_count_inconsistency() {
    // claims 0 bytes of payload but carries 2.
    let record_str = ":020000000000FE";
    assert_eq!(
      parse(record_str),
      Err(RecordError::RecordByteCountInconsistent(
        record_str.to_owned()
      ))
    );
  }

  #[test]
  fn test_parse_does_not_verify_checksum() {
    // Correct shape and type, deliberately wrong checksum byte.
    let parsed = parse(":00000001FE").unwrap();
    assert_eq!(parsed.checksum, 0xFE);
    assert!(!parsed.checksum_matches());
  }

  #[test]
  fn test_convert_to_retypes_and_recomputes_checksum() {
    let data_record = create(0x0010, RecordType::Data, &[0xAB]).unwrap();
    let custom = convert_to(&data_record, RecordType::CustomData).unwrap();
    assert_eq!(get_record_type(&custom).unwrap(), RecordType::CustomData);
    assert_eq!(get_record_data(&custom).unwrap(), vec![0xAB]);
    assert!(parse(&custom).unwrap().checksum_matches());
  }

  #[test]
  fn test_convert_ext_seg_to_ext_lin() {
    let esa = create(0, RecordType::ExtendedSegmentAddress, &[0x20, 0x00]).unwrap();
    let ela = convert_ext_seg_to_ext_lin(&esa).unwrap();
    assert_eq!(ela, ext_lin_address_record(0x20 << 12).unwrap());
  }

  #[test]
  fn test_convert_ext_seg_to_ext_lin_rejects_unaligned() {
    let esa = create(0, RecordType::ExtendedSegmentAddress, &[0x21, 0x00]).unwrap();
    assert!(convert_ext_seg_to_ext_lin(&esa).is_err());
  }

  #[test]
  fn test_convert_ext_seg_to_ext_lin_rejects_wrong_shape() {
    let esa = create(0, RecordType::ExtendedSegmentAddress, &[0x20, 0x01]).unwrap();
    assert!(convert_ext_seg_to_ext_lin(&esa).is_err());
  }

  #[test]
  fn test_end_of_file_record_constant() {
    assert_eq!(end_of_file_record(), ":00000001FF");
  }

  #[test]
  fn test_block_end_record_precanned_sizes() {
    assert_eq!(block_end_record(4).unwrap(), ":0400000BFFFFFFFFF5");
    assert_eq!(
      block_end_record(12).unwrap(),
      ":0C00000BFFFFFFFFFFFFFFFFFFFFFFFFF5"
    );
  }

  #[test]
  fn test_block_end_record_generic_matches_create() {
    let expected = create(0, RecordType::BlockEnd, &vec![0xFF; 6]).unwrap();
    assert_eq!(block_end_record(6).unwrap(), expected);
  }

  #[test]
  fn test_ext_lin_address_record_zero() {
    assert_eq!(ext_lin_address_record(0).unwrap(), ":020000040000FA");
  }

  #[test]
  fn test_ext_lin_address_record_makecode_v1_signature() {
    assert_eq!(
      ext_lin_address_record(0x20000000).unwrap(),
      ":020000040020DA"
    );
  }

  #[test]
  fn test_ext_lin_address_record_rejects_overflow() {
    assert_eq!(
      ext_lin_address_record(1u64 << 32),
      Err(RecordError::ExtLinearAddressOutOfRange(1u64 << 32))
    );
  }

  #[test]
  fn test_block_start_record_satisfies_checksum_law() {
    // See DESIGN.md for the checksum-law reasoning behind this value.
    let record = block_start_record(0x9900).unwrap();
    assert_eq!(record, ":0400000A9900C0DEBB");
    assert!(parse(&record).unwrap().checksum_matches());
  }

  #[test]
  fn test_checksum_law_holds_for_every_created_record() {
    for (rtype, data) in [
      (RecordType::Data, vec![0x01, 0x02, 0x03]),
      (RecordType::EndOfFile, vec![]),
      (RecordType::ExtendedSegmentAddress, vec![0x12, 0x00]),
      (RecordType::StartSegmentAddress, vec![0x12, 0x34, 0x38, 0x00]),
      (RecordType::ExtendedLinearAddress, vec![0xAB, 0xCD]),
      (
        RecordType::StartLinearAddress,
        vec![0x12, 0x34, 0x56, 0x78],
      ),
      (RecordType::BlockStart, vec![0x99, 0x00, 0xC0, 0xDE]),
      (RecordType::BlockEnd, vec![0xFF; 4]),
      (RecordType::PaddedData, vec![0xFF; 8]),
      (RecordType::CustomData, vec![0x01, 0x02]),
      (RecordType::OtherData, vec![0x00]),
    ] {
      let record_str = create(0x1234, rtype, &data).unwrap();
      let parsed = parse(&record_str).unwrap();
      assert!(
        parsed.checksum_matches(),
        "checksum law violated for {rtype:?}"
      );
    }
  }

  #[test]
  fn test_record_type_try_from_covers_all_enumerated_values() {
    for value in [
      0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
    ] {
      assert!(RecordType::try_from(value as u8).is_ok());
    }
    for value in [0x06, 0x07, 0x08, 0x09, 0x0F, 0xFF] {
      assert_eq!(
        RecordType::try_from(value as u8),
        Err(RecordError::RecordTypeInvalid(value as u8))
      );
    }
  }
}
