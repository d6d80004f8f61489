#![no_main]

use libfuzzer_sys::fuzz_target;
use loqi_core::bytestream::MemCursor;
use loqi_core::colorspace::ColorSpace;
use loqi_core::options::EncoderOptions;

fuzz_target!(|data: &[u8]| {
    // stay under the decoder's default width limit
    let pixel_count = (data.len() / 4).min(1 << 14);

    if pixel_count > 0 {
        let pixels = &data[..pixel_count * 4];
        let options = EncoderOptions::new(pixel_count, 1, ColorSpace::RGBA);

        let mut sink = vec![];
        loqi_qoi::QoiEncoder::new(pixels, options)
            .encode(&mut sink)
            .expect("Failed to encode valid pixel data!");

        let mut decoder = loqi_qoi::QoiDecoder::new(MemCursor::new(&sink));
        let decoded = decoder.decode().expect("Failed to decode a lossless stream!");

        assert!(
            pixels == decoded,
            "The decoded pixels don't match the original raster!"
        );
    }
});
