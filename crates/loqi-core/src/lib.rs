/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by the `loqi` family of crates
//!
//! This crate provides the plumbing the encoder and its reference decoder
//! have in common
//!
//! - An append-only byte sink abstraction with endian aware writes
//! - A sequential byte source abstraction for decoding
//! - Colorspace information shared by images
//! - Encoder and decoder options
//!
//! The library is `#[no_std]` with `alloc`, the `std` feature adds
//! sink implementations for buffered file writers.
//!
//! # Features
//! - `std`: Enable `std` specific byte sinks
//! - `log`: Route the logging macros in [`log`](crate::log) to the `log` crate
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod bytestream;
pub mod colorspace;
pub mod log;
pub mod options;
