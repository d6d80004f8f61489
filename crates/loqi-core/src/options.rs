/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Encoder and decoder options
//!
//! Options describe the raster handed to the encoder and the limits the
//! reference decoder enforces, one value can be reused across sessions.

use crate::colorspace::ColorSpace;

/// Options describing the raster handed to the encoder
///
/// # Example
/// ```
/// use loqi_core::colorspace::ColorSpace;
/// use loqi_core::options::EncoderOptions;
///
/// let options = EncoderOptions::new(640, 480, ColorSpace::RGBA).set_lossiness(4);
/// assert_eq!(options.lossiness(), 4);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    width:      usize,
    height:     usize,
    colorspace: ColorSpace,
    lossiness:  u8
}

impl EncoderOptions {
    /// Create options for a `width` by `height` raster in `colorspace`
    ///
    /// Encoding starts out lossless, see
    /// [`set_lossiness`](Self::set_lossiness).
    pub const fn new(width: usize, height: usize, colorspace: ColorSpace) -> EncoderOptions {
        EncoderOptions {
            width,
            height,
            colorspace,
            lossiness: 0
        }
    }

    /// Return the raster width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Return the raster height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Return the pixel layout of the raster
    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    /// Return the per-channel error tolerated when merging pixel runs
    pub const fn lossiness(&self) -> u8 {
        self.lossiness
    }

    /// Set the per-channel error tolerated when merging pixel runs
    ///
    /// `0` keeps the encoder lossless. Larger values let consecutive
    /// pixels whose red, green and blue channels each differ by at most
    /// `lossiness` collapse into one run, alpha must always match
    /// exactly.
    pub const fn set_lossiness(mut self, lossiness: u8) -> EncoderOptions {
        self.lossiness = lossiness;
        self
    }
}

/// Options the reference decoder respects
///
/// Mainly useful to set width and height limits to prevent untrusted
/// images from ballooning memory.
///
/// # Example
/// ```
/// use loqi_core::options::DecoderOptions;
///
/// let options = DecoderOptions::default().set_max_width(1 << 10);
/// assert_eq!(options.max_width(), 1 << 10);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    max_width:   usize,
    max_height:  usize,
    strict_mode: bool
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_width:   1 << 14,
            max_height:  1 << 14,
            strict_mode: false
        }
    }
}

impl DecoderOptions {
    /// Return the maximum width the decoder will accept
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Return the maximum height the decoder will accept
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Return whether recoverable stream defects are treated as errors
    pub const fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Set the maximum width the decoder will accept
    pub const fn set_max_width(mut self, max_width: usize) -> DecoderOptions {
        self.max_width = max_width;
        self
    }

    /// Set the maximum height the decoder will accept
    pub const fn set_max_height(mut self, max_height: usize) -> DecoderOptions {
        self.max_height = max_height;
        self
    }

    /// Treat recoverable stream defects as hard errors
    ///
    /// When off, defects like an unknown colorspace byte are logged and
    /// decoding continues with a default.
    pub const fn set_strict_mode(mut self, strict: bool) -> DecoderOptions {
        self.strict_mode = strict;
        self
    }
}
