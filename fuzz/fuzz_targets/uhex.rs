#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzzes the two state machines with the most byte-level surface: decomposing
// an arbitrary string as if it were a Universal Hex, and composing an
// arbitrary string as a single board's IHEX under both layouts. Neither path
// should panic on any input.
fuzz_target!(|data: &str| {
  let decomposed = uhex::separate_universal_hex(data);
  let _ = std::hint::black_box(&decomposed);

  let section = uhex::compose_section(data, 0x9900);
  let _ = std::hint::black_box(&section);

  let block = uhex::compose_block(data, 0x1234);
  let _ = std::hint::black_box(&block);

  // Whatever separate_universal_hex recovered should re-compose without panicking.
  if let Ok(boards) = decomposed {
    let recomposed = uhex::create_universal_hex(&boards, false);
    let _ = std::hint::black_box(recomposed);
  }
});
