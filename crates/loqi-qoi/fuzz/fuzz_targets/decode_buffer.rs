#![no_main]

use libfuzzer_sys::fuzz_target;
use loqi_core::bytestream::MemCursor;

fuzz_target!(|data: &[u8]| {
    let mut decoder = loqi_qoi::QoiDecoder::new(MemCursor::new(data));
    let _ = decoder.decode();
});
