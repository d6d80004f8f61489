/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use loqi_core::bytestream::{ByteSink, ByteWriter};
use loqi_core::colorspace::ColorCharacteristics;
use loqi_core::options::EncoderOptions;

use crate::constants::{
    color_hash, QOI_HEADER_SIZE, QOI_MAGIC, QOI_MAX_RUN, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA,
    QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN, QOI_PADDING
};
use crate::QoiEncodeErrors;

/// Quite Ok Image encoder with optional lossy run merging
///
/// With lossiness `0` this produces stock QOI output. A non-zero
/// lossiness lets consecutive pixels whose color channels each differ
/// by at most that amount collapse into one run, the decoder then
/// reproduces the first pixel of the run for all of them.
///
/// # Example
/// - Encode a 100 by 100 RGB image
///
/// ```
/// use loqi_core::colorspace::ColorSpace;
/// use loqi_core::options::EncoderOptions;
/// use loqi_qoi::QoiEncoder;
/// use loqi_qoi::QoiEncodeErrors;
///
/// const W: usize = 100;
/// const H: usize = 100;
///
/// fn main() -> Result<(), QoiEncodeErrors> {
///     let pixels = std::array::from_fn::<u8, { W * H * 3 }, _>(|i| (i % 256) as u8);
///     let mut encoder = QoiEncoder::new(&pixels, EncoderOptions::new(W, H, ColorSpace::RGB));
///     let mut sink = vec![];
///     let size = encoder.encode(&mut sink)?;
///     // write bytes, or do something
///     Ok(())
/// }
/// ```
pub struct QoiEncoder<'a> {
    // raw pixels, in RGB or RGBA
    pixel_data:            &'a [u8],
    options:               EncoderOptions,
    color_characteristics: ColorCharacteristics
}

/// Per-pixel encoder state
///
/// The state machine has two modes, accumulating a run and idle. The
/// near test is the only entry into a run, a mismatching pixel, the
/// run cap and the end of the stream are the only exits. Every opcode
/// other than RUN is emitted while idle.
struct PixelEncoder {
    cache:     [[u8; 4]; 64],
    prev:      [u8; 4],
    run:       u8,
    lossiness: u8
}

impl PixelEncoder {
    fn new(lossiness: u8) -> PixelEncoder {
        PixelEncoder {
            cache: [[0; 4]; 64],
            prev: [0, 0, 0, 255],
            run: 0,
            lossiness
        }
    }

    /// Return true if every color channel of `px` lies within the
    /// lossiness threshold of the previous pixel
    ///
    /// Alpha must always match exactly, only color error is tolerated.
    fn near_prev(&self, px: [u8; 4]) -> bool {
        px[3] == self.prev[3]
            && px[0].abs_diff(self.prev[0]) <= self.lossiness
            && px[1].abs_diff(self.prev[1]) <= self.lossiness
            && px[2].abs_diff(self.prev[2]) <= self.lossiness
    }

    fn encode_pixel<T: ByteSink>(
        &mut self, px: [u8; 4], stream: &mut ByteWriter<T>
    ) -> Result<(), QoiEncodeErrors> {
        if self.near_prev(px) {
            self.run += 1;

            if self.run == QOI_MAX_RUN {
                stream.write_u8(QOI_OP_RUN | (self.run - 1))?;
                self.run = 0;
            }
            // `prev` keeps pointing at the pixel that opened the run,
            // the decoder reproduces that anchor for every merged pixel
            return Ok(());
        }

        self.flush_run(stream)?;

        let index_pos = color_hash(px);

        if self.cache[index_pos] == px {
            stream.write_u8(QOI_OP_INDEX | (index_pos as u8))?;
        } else {
            self.cache[index_pos] = px;

            if px[3] == self.prev[3] {
                let vr = px[0].wrapping_sub(self.prev[0]);
                let vg = px[1].wrapping_sub(self.prev[1]);
                let vb = px[2].wrapping_sub(self.prev[2]);

                let vg_r = vr.wrapping_sub(vg);
                let vg_b = vb.wrapping_sub(vg);

                if !(2..=253).contains(&vr) && !(2..=253).contains(&vg) && !(2..=253).contains(&vb)
                {
                    stream.write_u8(
                        QOI_OP_DIFF
                            | vr.wrapping_add(2) << 4
                            | vg.wrapping_add(2) << 2
                            | vb.wrapping_add(2)
                    )?;
                } else if !(8..=247).contains(&vg_r)
                    && !(32..=223).contains(&vg)
                    && !(8..=247).contains(&vg_b)
                {
                    stream.write_u8(QOI_OP_LUMA | vg.wrapping_add(32))?;
                    stream.write_u8(vg_r.wrapping_add(8) << 4 | vg_b.wrapping_add(8))?;
                } else {
                    stream.write_u8(QOI_OP_RGB)?;
                    stream.write_const(&[px[0], px[1], px[2]])?;
                }
            } else {
                stream.write_u8(QOI_OP_RGBA)?;
                stream.write_u32_be(u32::from_be_bytes(px))?;
            }
        }

        self.prev = px;

        Ok(())
    }

    /// Emit the pending run if one is open
    fn flush_run<T: ByteSink>(&mut self, stream: &mut ByteWriter<T>) -> Result<(), QoiEncodeErrors> {
        if self.run > 0 {
            stream.write_u8(QOI_OP_RUN | (self.run - 1))?;
            self.run = 0;
        }

        Ok(())
    }
}

impl<'a> QoiEncoder<'a> {
    /// Create a new encoder which will encode the pixels
    ///
    /// # Arguments
    /// - data: Pixel data, size must be equal to `width * height * colorspace channels`
    /// - options: Encoder details for data, this contains width, height, number of
    ///   color components and the lossiness threshold
    pub const fn new(data: &'a [u8], options: EncoderOptions) -> QoiEncoder<'a> {
        QoiEncoder {
            pixel_data: data,
            options,
            color_characteristics: ColorCharacteristics::sRGB
        }
    }

    pub fn set_color_characteristics(&mut self, characteristics: ColorCharacteristics) {
        self.color_characteristics = characteristics;
    }

    /// Return the maximum size for which the encoder can safely
    /// encode the image without fearing for an out of space error
    pub fn max_size(&self) -> usize {
        self.options.width()
            * self.options.height()
            * (self.options.colorspace().num_components() + 1)
            + QOI_HEADER_SIZE
            + QOI_PADDING
    }

    fn encode_headers<T: ByteSink>(
        &self, writer: &mut ByteWriter<T>
    ) -> Result<(), QoiEncodeErrors> {
        let expected_len = self.options.width()
            * self.options.height()
            * self.options.colorspace().num_components();

        if self.pixel_data.len() != expected_len {
            return Err(QoiEncodeErrors::WrongPixelCount(
                expected_len,
                self.pixel_data.len()
            ));
        }

        let options = &self.options;

        if (options.width() as u64) > u64::from(u32::MAX) {
            return Err(QoiEncodeErrors::TooLargeDimensions(options.width()));
        }
        if (options.height() as u64) > u64::from(u32::MAX) {
            return Err(QoiEncodeErrors::TooLargeDimensions(options.height()));
        }

        // qoif
        writer.write_all(&QOI_MAGIC.to_be_bytes())?;
        // dimensions fit u32, we checked above
        writer.write_u32_be(options.width() as u32)?;
        writer.write_u32_be(options.height() as u32)?;
        // channels
        writer.write_u8(options.colorspace().num_components() as u8)?;
        // colorspace
        let xtic = u8::from(self.color_characteristics == ColorCharacteristics::Linear);
        writer.write_u8(xtic)?;

        Ok(())
    }

    /// Encode the pixels into `sink`
    ///
    /// # Arguments
    /// - sink: Where the encoded bytes are written to
    ///
    /// # Returns
    /// - Ok(size): Actual bytes used for encoding
    /// - Err: The error encountered during encoding
    pub fn encode<T: ByteSink>(&mut self, sink: T) -> Result<usize, QoiEncodeErrors> {
        let mut stream = ByteWriter::new(sink);

        stream.reserve(self.max_size())?;

        self.encode_headers(&mut stream)?;

        let channel_count = self.options.colorspace().num_components();

        let mut state = PixelEncoder::new(self.options.lossiness());
        // starting pixel, alpha stays opaque for RGB input
        let mut px = [0, 0, 0, 255];

        for pix_chunk in self.pixel_data.chunks_exact(channel_count) {
            px[0..channel_count].copy_from_slice(pix_chunk);

            state.encode_pixel(px, &mut stream)?;
        }
        // a run still open at the end of the stream is flushed before
        // the trailing bytes
        state.flush_run(&mut stream)?;

        // write trailing bytes
        stream.write_u64_be(0x01)?;
        stream.flush()?;
        // done
        let len = stream.bytes_written();

        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use loqi_core::bytestream::MemCursor;
    use loqi_core::colorspace::ColorSpace;
    use loqi_core::options::EncoderOptions;
    use nanorand::{Rng, WyRand};

    use crate::constants::{
        QOI_HEADER_SIZE, QOI_MASK_2, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA,
        QOI_OP_RUN, QOI_PADDING
    };
    use crate::{QoiDecoder, QoiEncoder};

    fn encode(pixels: &[u8], options: EncoderOptions) -> Vec<u8> {
        let mut sink = vec![];
        QoiEncoder::new(pixels, options).encode(&mut sink).unwrap();
        sink
    }

    fn opcodes(encoded: &[u8]) -> &[u8] {
        &encoded[QOI_HEADER_SIZE..encoded.len() - QOI_PADDING]
    }

    /// Walk the opcode stream and count how many pixels RUN opcodes carry
    fn pixels_in_runs(encoded: &[u8]) -> usize {
        let mut body = opcodes(encoded);
        let mut total = 0;

        while let Some((&op, rest)) = body.split_first() {
            body = rest;

            if op == QOI_OP_RGB {
                body = &body[3..];
            } else if op == QOI_OP_RGBA {
                body = &body[4..];
            } else if (op & QOI_MASK_2) == QOI_OP_LUMA {
                body = &body[1..];
            } else if (op & QOI_MASK_2) == QOI_OP_RUN {
                total += usize::from(op & 0x3f) + 1;
            }
        }
        total
    }

    fn noisy_gradient(pixel_count: usize, amplitude: u8) -> Vec<u8> {
        let mut rng = WyRand::new_seed(0x6c6f7169);
        let mut pixels = Vec::with_capacity(pixel_count * 4);

        for i in 0..pixel_count {
            let base = ((i / 7) % 200) as u8;
            for _ in 0..3 {
                let noise = rng.generate::<u8>() % (amplitude + 1);
                pixels.push(base.wrapping_add(noise));
            }
            pixels.push(255);
        }
        pixels
    }

    #[test]
    fn framing_is_fixed() {
        const W: usize = 37;
        const H: usize = 11;

        let mut rng = WyRand::new_seed(0xbadc0de);
        let pixels: Vec<u8> = (0..W * H * 4).map(|_| rng.generate::<u8>()).collect();

        let options = EncoderOptions::new(W, H, ColorSpace::RGBA);
        let encoded = encode(&pixels, options);

        assert_eq!(&encoded[0..4], b"qoif");
        assert_eq!(&encoded[4..8], &(W as u32).to_be_bytes());
        assert_eq!(&encoded[8..12], &(H as u32).to_be_bytes());
        assert_eq!(encoded[12], 4);
        assert_eq!(encoded[13], 0);
        assert_eq!(&encoded[encoded.len() - 8..], &[0, 0, 0, 0, 0, 0, 0, 1]);

        let max = QoiEncoder::new(&pixels, options).max_size();
        assert!(encoded.len() <= max);
    }

    #[test]
    fn lossless_round_trip_rgb() {
        const W: usize = 100;
        const H: usize = 100;

        let pixels = std::array::from_fn::<u8, { W * H * 3 }, _>(|i| (i % 256) as u8);
        let encoded = encode(&pixels, EncoderOptions::new(W, H, ColorSpace::RGB));

        let mut decoder = QoiDecoder::new(MemCursor::new(&encoded));
        let decoded = decoder.decode().unwrap();

        assert_eq!(&pixels[..], &decoded[..]);
        assert_eq!(decoder.dimensions(), Some((W, H)));
        assert_eq!(decoder.colorspace(), Some(ColorSpace::RGB));
    }

    #[test]
    fn lossless_round_trip_rgba() {
        const W: usize = 73;
        const H: usize = 31;

        let mut rng = WyRand::new_seed(42);
        // runs, cache hits and small deltas all show up in this mix
        let mut pixels = Vec::with_capacity(W * H * 4);
        for i in 0..W * H {
            if i % 3 == 0 && i > 0 {
                let last = pixels.len() - 4;
                let repeat: Vec<u8> = pixels[last..].to_vec();
                pixels.extend_from_slice(&repeat);
            } else {
                pixels.extend_from_slice(&[
                    rng.generate::<u8>(),
                    rng.generate::<u8>(),
                    rng.generate::<u8>(),
                    rng.generate::<u8>()
                ]);
            }
        }
        pixels.truncate(W * H * 4);

        let encoded = encode(&pixels, EncoderOptions::new(W, H, ColorSpace::RGBA));

        let decoded = QoiDecoder::new(MemCursor::new(&encoded)).decode().unwrap();
        assert_eq!(&pixels[..], &decoded[..]);
    }

    #[test]
    fn two_pixel_scenario() {
        // (10,10,10) sits in luma range of the implicit (0,0,0,255)
        // predecessor, (11,9,11) is a one step diff from it
        let pixels = [10, 10, 10, 255, 11, 9, 11, 255];
        let encoded = encode(&pixels, EncoderOptions::new(2, 1, ColorSpace::RGBA));

        assert_eq!(
            opcodes(&encoded),
            [QOI_OP_LUMA | 42, 0x88, 0x40 | 0x30 | 0x04 | 0x03]
        );
        assert_eq!(encoded.len(), QOI_HEADER_SIZE + 3 + QOI_PADDING);
    }

    #[test]
    fn run_cap_splits_long_runs() {
        // all 100 pixels equal the implicit starting pixel, so every one
        // of them is absorbed: a capped run of 62 and a final run of 38
        let pixels = [0, 0, 0, 255].repeat(100);
        let encoded = encode(&pixels, EncoderOptions::new(100, 1, ColorSpace::RGBA));

        assert_eq!(opcodes(&encoded), [QOI_OP_RUN | 61, QOI_OP_RUN | 37]);
    }

    #[test]
    fn near_pixels_merge_into_runs() {
        let pixels = [10, 10, 10, 255, 11, 9, 11, 255];
        let options = EncoderOptions::new(2, 1, ColorSpace::RGBA).set_lossiness(2);
        let encoded = encode(&pixels, options);

        // the second pixel folds into a run instead of a DIFF
        assert_eq!(
            opcodes(&encoded),
            [QOI_OP_LUMA | 42, 0x88, QOI_OP_RUN | 0]
        );
    }

    #[test]
    fn run_anchor_never_drifts() {
        // B is near A, C is near B but not near A. If the previous pixel
        // drifted to B mid-run, C would be absorbed too and the image
        // would degrade past the configured tolerance.
        let pixels = [
            100, 100, 100, 255, // A
            102, 102, 102, 255, // B
            104, 104, 104, 255, // C
        ];
        let options = EncoderOptions::new(3, 1, ColorSpace::RGBA).set_lossiness(2);
        let encoded = encode(&pixels, options);

        assert_eq!(pixels_in_runs(&encoded), 1);

        // the decoder reproduces the anchor for B and the exact value for C
        let decoded = QoiDecoder::new(MemCursor::new(&encoded)).decode().unwrap();
        assert_eq!(decoded[0..4], [100, 100, 100, 255]);
        assert_eq!(decoded[4..8], [100, 100, 100, 255]);
        assert_eq!(decoded[8..12], [104, 104, 104, 255]);
    }

    #[test]
    fn alpha_change_is_never_lossy() {
        // generous color tolerance, but the alpha step must still force
        // a full RGBA opcode
        let pixels = [10, 10, 10, 255, 10, 10, 10, 200];
        let options = EncoderOptions::new(2, 1, ColorSpace::RGBA).set_lossiness(50);
        let encoded = encode(&pixels, options);

        assert_eq!(pixels_in_runs(&encoded), 0);
        assert_eq!(
            opcodes(&encoded),
            [QOI_OP_LUMA | 42, 0x88, QOI_OP_RGBA, 10, 10, 10, 200]
        );
    }

    #[test]
    fn cached_pixel_emits_index() {
        // P hashes to slot 11, Q to slot 37, re-seeing P must hit the cache
        let pixels = [
            10, 10, 10, 255, // P
            200, 50, 50, 255, // Q
            10, 10, 10, 255, // P again
        ];
        let encoded = encode(&pixels, EncoderOptions::new(3, 1, ColorSpace::RGBA));

        assert_eq!(
            opcodes(&encoded),
            [
                QOI_OP_LUMA | 42,
                0x88,
                QOI_OP_RGB,
                200,
                50,
                50,
                QOI_OP_INDEX | 11
            ]
        );
    }

    #[test]
    fn run_absorption_grows_with_lossiness() {
        // a flat black raster with four isolated gray bumps of growing
        // size. A bump above the threshold costs two emitted pixels, the
        // bump and the pixel falling back to black, so each threshold
        // step absorbs exactly two more pixels than the last.
        let mut pixels = [0, 0, 0, 255].repeat(100);
        for (at, bump) in [(10, 1), (30, 2), (50, 4), (70, 8)] {
            pixels[at * 4..at * 4 + 3].copy_from_slice(&[bump, bump, bump]);
        }

        let mut absorbed = Vec::new();
        for lossiness in [0, 1, 2, 4, 8] {
            let options =
                EncoderOptions::new(100, 1, ColorSpace::RGBA).set_lossiness(lossiness);
            absorbed.push(pixels_in_runs(&encode(&pixels, options)));
        }

        assert_eq!(absorbed, [92, 94, 96, 98, 100]);
        assert!(absorbed.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn lossy_output_stays_well_formed() {
        let pixels = noisy_gradient(48 * 48, 10);
        let options = EncoderOptions::new(48, 48, ColorSpace::RGBA).set_lossiness(4);
        let encoded = encode(&pixels, options);

        // every merged pixel decodes to its run anchor, so each channel
        // stays within the configured tolerance of the original
        let decoded = QoiDecoder::new(MemCursor::new(&encoded)).decode().unwrap();

        assert_eq!(decoded.len(), pixels.len());
        for (got, want) in decoded.chunks_exact(4).zip(pixels.chunks_exact(4)) {
            for c in 0..3 {
                assert!(got[c].abs_diff(want[c]) <= 4);
            }
            assert_eq!(got[3], want[3]);
        }
    }

    #[test]
    fn wrong_pixel_count_is_rejected() {
        let pixels = [0_u8; 12];
        let mut encoder = QoiEncoder::new(&pixels, EncoderOptions::new(2, 2, ColorSpace::RGBA));

        let mut sink = vec![];
        assert!(encoder.encode(&mut sink).is_err());
        assert!(sink.is_empty());
    }
}
