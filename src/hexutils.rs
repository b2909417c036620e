//
// Copyright 2016 The IHEX Developers. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or
// distributed except according to those terms.
//

//! Pure conversions between ASCII hex strings and byte buffers. Case-insensitive
//! on input, always upper-case on output.

use hex_simd::AsciiCase;

use crate::error::HexError;

/// Decodes a hex string into a byte buffer.
///
/// Fails if the string has an odd length or contains a non-hexadecimal character.
pub fn hex_str_to_bytes(s: &str) -> Result<Vec<u8>, HexError> {
  if s.len() % 2 != 0 {
    return Err(HexError::OddLength(s.to_owned()));
  }

  hex_simd::decode_to_vec(s.as_bytes()).map_err(|_| HexError::InvalidHexCharacter(s.to_owned()))
}

/// Returns the fixed-width 2-character upper-case hex representation of a single byte.
pub fn byte_to_hex(b: u8) -> String {
  hex_simd::encode_to_string([b], AsciiCase::Upper)
}

/// Concatenation of [`byte_to_hex`] over every byte in `buf`.
pub fn bytes_to_hex(buf: &[u8]) -> String {
  hex_simd::encode_to_string(buf, AsciiCase::Upper)
}
