/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Errors possible during encoding and decoding.
use core::fmt::{Debug, Display, Formatter};

use loqi_core::bytestream::StreamError;

/// Errors encountered during encoding
pub enum QoiEncodeErrors {
    /// A dimension cannot be represented in the 32-bit header field
    TooLargeDimensions(usize),
    /// The pixel buffer length does not match
    /// `width * height * components`
    ///
    /// # Arguments
    /// - 1st argument is the length the options imply
    /// - 2nd argument is the length of the buffer handed in
    WrongPixelCount(usize, usize),
    /// Writing to the output sink failed
    IoError(StreamError)
}

impl Debug for QoiEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            QoiEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimension {found}, the header can only carry dimensions less than {}",
                    u32::MAX
                )
            }
            QoiEncodeErrors::WrongPixelCount(expected, found) => {
                writeln!(
                    f,
                    "Expected a pixel buffer of {expected} bytes but got {found} bytes"
                )
            }
            QoiEncodeErrors::IoError(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl Display for QoiEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<StreamError> for QoiEncodeErrors {
    fn from(value: StreamError) -> Self {
        QoiEncodeErrors::IoError(value)
    }
}

/// Errors encountered during decoding
pub enum QoiDecodeErrors {
    /// The image does not start with the magic bytes `qoif`
    ///
    /// Indicates the stream is not a qoi file
    WrongMagicBytes,
    /// The header contains an invalid channel number
    ///
    /// The only supported values are `3` and `4`
    UnknownChannels(u8),
    /// The header contains an invalid colorspace value
    ///
    /// The value should be `0` or `1`,
    /// ignored unless strict mode is set
    UnknownColorspace(u8),
    /// A header dimension exceeds the configured limit
    ///
    /// # Arguments
    /// - 1st argument names the axis
    /// - 2nd argument is the value found in the header
    /// - 3rd argument is the configured limit
    LimitExceeded(&'static str, usize, usize),
    /// The output buffer cannot hold the decoded image
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes needed
    /// - 2nd argument is the buffer length handed in
    TooSmallOutput(usize, usize),
    /// Generic message that does not need heap allocation
    GenericStatic(&'static str),
    /// Reading from the source failed
    IoErrors(StreamError)
}

impl Debug for QoiDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            QoiDecodeErrors::WrongMagicBytes => {
                writeln!(f, "Wrong magic bytes, expected `qoif` as image start")
            }
            QoiDecodeErrors::UnknownChannels(channel) => {
                writeln!(
                    f,
                    "Unknown channel number {channel}, expected either 3 or 4"
                )
            }
            QoiDecodeErrors::UnknownColorspace(colorspace) => {
                writeln!(
                    f,
                    "Unknown colorspace number {colorspace}, expected either 0 or 1"
                )
            }
            QoiDecodeErrors::LimitExceeded(axis, found, limit) => {
                writeln!(
                    f,
                    "Image {axis} {found} greater than max configured {axis} {limit}"
                )
            }
            QoiDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected} but found {found}"
                )
            }
            QoiDecodeErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
            QoiDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl Display for QoiDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<&'static str> for QoiDecodeErrors {
    fn from(value: &'static str) -> Self {
        QoiDecodeErrors::GenericStatic(value)
    }
}

impl From<StreamError> for QoiDecodeErrors {
    fn from(value: StreamError) -> Self {
        QoiDecodeErrors::IoErrors(value)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QoiEncodeErrors {}

#[cfg(feature = "std")]
impl std::error::Error for QoiDecodeErrors {}
