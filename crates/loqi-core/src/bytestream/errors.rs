/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Errors encountered when moving bytes in or out of a stream
pub enum StreamError {
    /// The sink cannot take any more bytes
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we wanted to write
    /// - 2nd argument is the number of bytes the sink could still take
    SinkFull(usize, usize),
    /// The source ran out of bytes
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we wanted to read
    /// - 2nd argument is the number of bytes actually left
    SourceExhausted(usize, usize),
    /// Generic message that does not need heap allocation
    Generic(&'static str),
    /// An error bubbled up from an underlying `std::io` stream
    #[cfg(feature = "std")]
    IoError(std::io::Error)
}

impl Debug for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            StreamError::SinkFull(wanted, left) => {
                writeln!(f, "Sink full, wanted to write {wanted} bytes but only {left} fit")
            }
            StreamError::SourceExhausted(wanted, left) => {
                writeln!(
                    f,
                    "Source exhausted, wanted {wanted} bytes but only {left} remain"
                )
            }
            StreamError::Generic(val) => {
                writeln!(f, "{val}")
            }
            #[cfg(feature = "std")]
            StreamError::IoError(err) => {
                writeln!(f, "I/O error {err}")
            }
        }
    }
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<&'static str> for StreamError {
    fn from(value: &'static str) -> Self {
        StreamError::Generic(value)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for StreamError {
    fn from(value: std::io::Error) -> Self {
        StreamError::IoError(value)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StreamError {}
