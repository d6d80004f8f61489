/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Byte sinks and byte sources
//!
//! The encoder writes its opcode stream through [`ByteWriter`] into anything
//! implementing [`ByteSink`], the decoder pulls bytes through [`ByteReader`]
//! from anything implementing [`ByteSource`].
//!
//! The format is strictly sequential, so neither trait exposes seeking.

pub use self::errors::StreamError;
pub use self::reader::ByteReader;
pub use self::sink::ByteSink;
pub use self::source::{ByteSource, MemCursor};
pub use self::writer::ByteWriter;

mod errors;
mod reader;
mod sink;
mod source;
mod writer;
