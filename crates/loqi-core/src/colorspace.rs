/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Image colorspace information

/// Interleaved pixel layouts the encoder accepts
///
/// Only 8-bit RGB and RGBA rasters can be encoded, anything else is
/// expected to be converted by the pixel source before encoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorSpace {
    RGB,
    RGBA
}

impl ColorSpace {
    /// Return the number of interleaved channels per pixel
    ///
    /// # Example
    /// ```
    /// use loqi_core::colorspace::ColorSpace;
    ///
    /// assert_eq!(ColorSpace::RGB.num_components(), 3);
    /// assert_eq!(ColorSpace::RGBA.num_components(), 4);
    /// ```
    pub const fn num_components(self) -> usize {
        match self {
            ColorSpace::RGB => 3,
            ColorSpace::RGBA => 4
        }
    }

    /// Return true if the layout carries an alpha channel
    pub const fn has_alpha(self) -> bool {
        matches!(self, ColorSpace::RGBA)
    }
}

/// Transfer characteristics recorded in the image header
///
/// Purely informative, neither the encoder nor the decoder converts
/// pixel values between the two.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorCharacteristics {
    /// sRGB with linear alpha
    sRGB,
    /// All channels linear
    Linear
}
