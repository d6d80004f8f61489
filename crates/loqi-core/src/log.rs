/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Logging macros for the loqi crates
//!
//! With the `log` feature enabled these are the macros from the `log`
//! crate, without it they expand to nothing so library code can log
//! unconditionally.

#[cfg(feature = "log")]
pub use ::log::{debug, error, info, trace, warn};

// #[macro_export] is required to make macros work across crates
// but it always puts the macro in the crate root.
// #[doc(hidden)] + "pub use" is a workaround to namespace a macro.
#[cfg(not(feature = "log"))]
pub use crate::{__debug as debug, __error as error, __info as info, __trace as trace, __warn as warn};

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __error {
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __warn {
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __info {
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __debug {
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "log"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __trace {
    ($($arg:tt)+) => {};
}
