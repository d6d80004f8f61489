/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::identity_op)]

use alloc::vec;
use alloc::vec::Vec;

use loqi_core::bytestream::{ByteReader, ByteSource};
use loqi_core::colorspace::{ColorCharacteristics, ColorSpace};
use loqi_core::log::{error, trace};
use loqi_core::options::DecoderOptions;

use crate::constants::{
    color_hash, QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA,
    QOI_OP_RUN
};
use crate::errors::QoiDecodeErrors;

/// The reference decoder for the encoder in this crate
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to decode headers
/// or [`decode`] to return uncompressed pixels.
///
/// Lossily encoded images decode like any other image, runs simply
/// reproduce their first pixel. Details of the compressed image like
/// width and height are accessible after decoding headers.
///
/// [`decode_headers`]: QoiDecoder::decode_headers
/// [`decode`]: QoiDecoder::decode
pub struct QoiDecoder<T>
where
    T: ByteSource
{
    width:           usize,
    height:          usize,
    colorspace:      ColorSpace,
    characteristics: ColorCharacteristics,
    decoded_headers: bool,
    stream:          ByteReader<T>,
    options:         DecoderOptions
}

impl<T> QoiDecoder<T>
where
    T: ByteSource
{
    /// Create a new decoder with the default options
    ///
    /// # Arguments
    /// - `data`: The compressed qoi data
    ///
    /// # Example
    ///
    /// ```no_run
    /// use loqi_core::bytestream::MemCursor;
    /// let mut decoder = loqi_qoi::QoiDecoder::new(MemCursor::new(&[]));
    /// // additional code
    /// ```
    pub fn new(data: T) -> QoiDecoder<T> {
        QoiDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that obeys specified restrictions
    ///
    /// E.g can be used to set width and height limits to prevent OOM attacks
    ///
    /// # Arguments
    /// - `data`: The compressed qoi data
    /// - `options`: Decoder options that the decoder should respect
    ///
    /// # Example
    /// ```
    /// use loqi_core::bytestream::MemCursor;
    /// use loqi_core::options::DecoderOptions;
    /// use loqi_qoi::QoiDecoder;
    /// // only decode images less than 10 in both width and height
    ///
    /// let options = DecoderOptions::default().set_max_width(10).set_max_height(10);
    ///
    /// let mut decoder = QoiDecoder::new_with_options(MemCursor::new([]), options);
    /// ```
    pub fn new_with_options(data: T, options: DecoderOptions) -> QoiDecoder<T> {
        QoiDecoder {
            width: 0,
            height: 0,
            colorspace: ColorSpace::RGB,
            characteristics: ColorCharacteristics::sRGB,
            decoded_headers: false,
            stream: ByteReader::new(data),
            options
        }
    }

    /// Decode the header, storing the image details in the decoder
    ///
    /// # Returns
    /// - On success: Nothing
    /// - On error: The error encountered when decoding headers,
    ///   an instance of [QoiDecodeErrors]
    ///
    /// [QoiDecodeErrors]: crate::errors::QoiDecodeErrors
    pub fn decode_headers(&mut self) -> Result<(), QoiDecodeErrors> {
        let magic = self.stream.read_const::<4>()?;

        if &magic != b"qoif" {
            return Err(QoiDecodeErrors::WrongMagicBytes);
        }

        let width = self.stream.get_u32_be() as usize;
        let height = self.stream.get_u32_be() as usize;
        let channels = self.stream.get_u8();
        let characteristics = self.stream.get_u8();

        if width > self.options.max_width() {
            return Err(QoiDecodeErrors::LimitExceeded(
                "width",
                width,
                self.options.max_width()
            ));
        }
        if height > self.options.max_height() {
            return Err(QoiDecodeErrors::LimitExceeded(
                "height",
                height,
                self.options.max_height()
            ));
        }

        self.colorspace = match channels {
            3 => ColorSpace::RGB,
            4 => ColorSpace::RGBA,
            _ => return Err(QoiDecodeErrors::UnknownChannels(channels))
        };
        self.characteristics = match characteristics {
            0 => ColorCharacteristics::sRGB,
            1 => ColorCharacteristics::Linear,
            _ => {
                if self.options.strict_mode() {
                    return Err(QoiDecodeErrors::UnknownColorspace(characteristics));
                }
                error!("Unknown/invalid colorspace value {characteristics}, expected 0 or 1");
                ColorCharacteristics::sRGB
            }
        };
        self.width = width;
        self.height = height;

        trace!("Image width: {:?}", self.width);
        trace!("Image height: {:?}", self.height);
        trace!("Image colorspace: {:?}", self.colorspace);
        self.decoded_headers = true;

        Ok(())
    }

    /// Return the number of bytes required to hold a decoded image frame
    ///
    /// # Returns
    /// - `Some(usize)`: Minimum size for a buffer needed to decode the image
    /// - `None`: Indicates the headers were not decoded
    ///
    /// # Panics
    /// In case `width * height * components` overflows a usize
    pub fn output_buffer_size(&self) -> Option<usize> {
        if self.decoded_headers {
            self.width
                .checked_mul(self.height)
                .unwrap()
                .checked_mul(self.colorspace.num_components())
        } else {
            None
        }
    }

    /// Decode a qoi stream, returning the uncompressed pixels
    ///
    /// Additional details about the image can be queried after this or
    /// [`decode_headers`] returns, e.g width and height via
    /// [`dimensions`].
    ///
    /// # Returns
    /// - On success: The decoded interleaved pixels
    /// - On error: An instance of [QoiDecodeErrors] giving the reason
    ///   the image could not be decoded
    ///
    /// [`decode_headers`]: Self::decode_headers
    /// [`dimensions`]: Self::dimensions
    /// [QoiDecodeErrors]: crate::errors::QoiDecodeErrors
    pub fn decode(&mut self) -> Result<Vec<u8>, QoiDecodeErrors> {
        if !self.decoded_headers {
            self.decode_headers()?;
        }
        let mut output = vec![0; self.output_buffer_size().unwrap()];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode a qoi stream into a caller provided buffer
    ///
    /// Returns an error if the buffer cannot hold the decoded image
    ///
    /// # Arguments
    /// - `pixels`: Output buffer the decoded pixels are written to
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), QoiDecodeErrors> {
        if !self.decoded_headers {
            self.decode_headers()?;
        }

        if pixels.len() < self.output_buffer_size().unwrap() {
            return Err(QoiDecodeErrors::TooSmallOutput(
                self.output_buffer_size().unwrap(),
                pixels.len()
            ));
        }

        match self.colorspace.num_components() {
            3 => self.decode_inner_generic::<3>(pixels)?,
            4 => self.decode_inner_generic::<4>(pixels)?,
            _ => unreachable!()
        }
        Ok(())
    }

    fn decode_inner_generic<const SIZE: usize>(
        &mut self, pixels: &mut [u8]
    ) -> Result<(), QoiDecodeErrors> {
        const LAST_BYTES: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

        let mut index = [[0_u8; 4]; 64];
        // starting pixel
        let mut px = [0, 0, 0, 255];

        let mut run = 0;

        for pix_chunk in pixels.chunks_exact_mut(SIZE) {
            if run > 0 {
                run -= 1;
                pix_chunk.copy_from_slice(&px[0..SIZE]);
            } else {
                let chunk = self.stream.get_u8();

                if chunk == QOI_OP_RGB {
                    let packed_bytes = self.stream.read_const::<3>()?;

                    px[0..3].copy_from_slice(&packed_bytes);
                } else if chunk == QOI_OP_RGBA {
                    let packed_bytes = self.stream.read_const::<4>()?;

                    px.copy_from_slice(&packed_bytes);
                } else if (chunk & QOI_MASK_2) == QOI_OP_INDEX {
                    px.copy_from_slice(&index[usize::from(chunk) & 63]);
                } else if (chunk & QOI_MASK_2) == QOI_OP_DIFF {
                    px[0] = px[0].wrapping_add(((chunk >> 4) & 0x03).wrapping_sub(2));
                    px[1] = px[1].wrapping_add(((chunk >> 2) & 0x03).wrapping_sub(2));
                    px[2] = px[2].wrapping_add(((chunk >> 0) & 0x03).wrapping_sub(2));
                } else if (chunk & QOI_MASK_2) == QOI_OP_LUMA {
                    let b2 = self.stream.get_u8();
                    let vg = (chunk & 0x3f).wrapping_sub(32);

                    px[0] = px[0].wrapping_add(vg.wrapping_sub(8).wrapping_add((b2 >> 4) & 0x0f));
                    px[1] = px[1].wrapping_add(vg);
                    px[2] = px[2].wrapping_add(vg.wrapping_sub(8).wrapping_add((b2 >> 0) & 0x0f));
                } else if (chunk & QOI_MASK_2) == QOI_OP_RUN {
                    run = usize::from(chunk & 0x3f);
                }

                // copy pixel
                pix_chunk.copy_from_slice(&px[0..SIZE]);

                index[color_hash(px)] = px;
            }
        }

        let remaining = self.stream.read_const::<8>()?;

        if remaining != LAST_BYTES {
            if self.options.strict_mode() {
                return Err(QoiDecodeErrors::GenericStatic(
                    "Last bytes do not match QOI signature"
                ));
            }
            error!("Last bytes do not match QOI signature");
        }

        trace!("Finished decoding image");

        Ok(())
    }

    /// Return the image colorspace or `None` if the headers have not
    /// been decoded
    ///
    /// The colorspace can either be [RGB] or [RGBA]
    ///
    /// [RGB]: loqi_core::colorspace::ColorSpace::RGB
    /// [RGBA]: loqi_core::colorspace::ColorSpace::RGBA
    pub const fn colorspace(&self) -> Option<ColorSpace> {
        if self.decoded_headers {
            Some(self.colorspace)
        } else {
            None
        }
    }

    /// Return the transfer characteristics recorded in the header
    ///
    /// Or `None` if the headers have not been decoded
    pub const fn characteristics(&self) -> Option<ColorCharacteristics> {
        if self.decoded_headers {
            Some(self.characteristics)
        } else {
            None
        }
    }

    /// Return the width and height of the image
    ///
    /// Or `None` if the headers have not been decoded
    ///
    /// # Example
    ///
    /// ```no_run
    /// use loqi_core::bytestream::MemCursor;
    /// use loqi_qoi::QoiDecoder;
    /// let mut decoder = QoiDecoder::new(MemCursor::new(&[]));
    ///
    /// decoder.decode_headers().unwrap();
    /// // get dimensions now.
    /// let (w, h) = decoder.dimensions().unwrap();
    /// ```
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            return Some((self.width, self.height));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use loqi_core::bytestream::MemCursor;
    use loqi_core::colorspace::{ColorCharacteristics, ColorSpace};
    use loqi_core::options::DecoderOptions;

    use crate::constants::{QOI_OP_RGB, QOI_OP_RUN};
    use crate::errors::QoiDecodeErrors;
    use crate::QoiDecoder;

    fn framed(width: u32, height: u32, channels: u8, colorspace: u8, body: &[u8]) -> Vec<u8> {
        let mut stream = Vec::new();
        stream.extend_from_slice(b"qoif");
        stream.extend_from_slice(&width.to_be_bytes());
        stream.extend_from_slice(&height.to_be_bytes());
        stream.push(channels);
        stream.push(colorspace);
        stream.extend_from_slice(body);
        stream.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        stream
    }

    #[test]
    fn decodes_hand_built_stream() {
        // one literal pixel followed by a run of one
        let stream = framed(2, 1, 4, 0, &[QOI_OP_RGB, 10, 20, 30, QOI_OP_RUN | 0]);

        let mut decoder = QoiDecoder::new(MemCursor::new(&stream));
        let pixels = decoder.decode().unwrap();

        assert_eq!(pixels, [10, 20, 30, 255, 10, 20, 30, 255]);
        assert_eq!(decoder.dimensions(), Some((2, 1)));
        assert_eq!(decoder.colorspace(), Some(ColorSpace::RGBA));
        assert_eq!(
            decoder.characteristics(),
            Some(ColorCharacteristics::sRGB)
        );
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut stream = framed(1, 1, 4, 0, &[QOI_OP_RUN | 0]);
        stream[0] = b'p';

        let err = QoiDecoder::new(MemCursor::new(&stream)).decode();
        assert!(matches!(err, Err(QoiDecodeErrors::WrongMagicBytes)));
    }

    #[test]
    fn rejects_unknown_channels() {
        let stream = framed(1, 1, 5, 0, &[QOI_OP_RUN | 0]);

        let err = QoiDecoder::new(MemCursor::new(&stream)).decode();
        assert!(matches!(err, Err(QoiDecodeErrors::UnknownChannels(5))));
    }

    #[test]
    fn unknown_colorspace_errors_only_in_strict_mode() {
        let stream = framed(1, 1, 4, 7, &[QOI_OP_RGB, 1, 2, 3]);

        let lax = QoiDecoder::new(MemCursor::new(&stream)).decode();
        assert!(lax.is_ok());

        let options = DecoderOptions::default().set_strict_mode(true);
        let strict = QoiDecoder::new_with_options(MemCursor::new(&stream), options).decode();
        assert!(matches!(strict, Err(QoiDecodeErrors::UnknownColorspace(7))));
    }

    #[test]
    fn enforces_dimension_limits() {
        let stream = framed(64, 1, 4, 0, &[]);
        let options = DecoderOptions::default().set_max_width(16);

        let err = QoiDecoder::new_with_options(MemCursor::new(&stream), options).decode();
        assert!(matches!(
            err,
            Err(QoiDecodeErrors::LimitExceeded("width", 64, 16))
        ));
    }

    #[test]
    fn truncated_stream_errors() {
        // header promises one pixel but the stream ends immediately
        let mut stream = framed(1, 1, 4, 0, &[]);
        stream.truncate(14);

        let err = QoiDecoder::new(MemCursor::new(&stream)).decode();
        assert!(matches!(err, Err(QoiDecodeErrors::IoErrors(_))));
    }

    #[test]
    fn too_small_output_is_rejected() {
        let stream = framed(2, 2, 4, 0, &[QOI_OP_RUN | 3]);

        let mut decoder = QoiDecoder::new(MemCursor::new(&stream));
        let mut output = [0_u8; 4];

        let err = decoder.decode_into(&mut output);
        assert!(matches!(err, Err(QoiDecodeErrors::TooSmallOutput(16, 4))));
    }
}
