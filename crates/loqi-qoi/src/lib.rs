/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Encoding Quite Ok Image streams with optional lossy run merging
//!
//! [Format Specification](https://qoiformat.org/qoi-specification.pdf)
//!
//! The encoder deviates from stock QOI in one way: a configurable
//! per-channel error threshold lets near-identical consecutive pixels
//! collapse into a single run. The output is still a well-formed QOI
//! stream, the threshold only changes which pixels the runs claim.
//!
//! A reference decoder is included so callers can round-trip what they
//! encoded.
//!
//! # Features
//! - Encoding, lossless or lossy
//! - Decoding
//! - `no_std`
//!
//! ## `no_std`
//! You can use `no_std` with the alloc feature to compile for `no_std` endpoints

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;
extern crate core;

pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use loqi_core;
mod constants;
mod decoder;
mod encoder;
mod errors;
