/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::{ByteSource, StreamError};

/// Encapsulates a byte source with endian aware reads
///
/// The non-failing getters return `0` once the source is exhausted, the
/// decoder relies on that in its opcode loop and validates the stream by
/// other means.
pub struct ByteReader<T: ByteSource> {
    source: T
}

impl<T: ByteSource> ByteReader<T> {
    pub fn new(source: T) -> ByteReader<T> {
        ByteReader { source }
    }

    /// Read a single byte, `0` once the source is exhausted
    #[inline(always)]
    pub fn get_u8(&mut self) -> u8 {
        self.source.fetch_byte_or_zero()
    }

    /// Read a big endian `u32`, `0` once the source is exhausted
    #[inline]
    pub fn get_u32_be(&mut self) -> u32 {
        let mut bytes = [0_u8; 4];
        // sources never partially fill, on error the zeros stand
        let _ = self.source.fetch_const(&mut bytes);

        u32::from_be_bytes(bytes)
    }

    /// Read a fixed number of bytes or error out
    #[inline]
    pub fn read_const<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut bytes = [0_u8; N];
        self.source.fetch_const(&mut bytes)?;

        Ok(bytes)
    }
}
