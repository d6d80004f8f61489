/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::process::exit;

use log::error;

mod cmd_args;
mod convert;

pub fn main() {
    let cmd = cmd_args::create_cmd_args();
    let options = cmd.get_matches();

    cmd_args::setup_logger(&options);

    let result = convert::run(&options);

    if result.is_err() {
        println!();
        error!(
            " Could not complete conversion, reason {:?}",
            result.err().unwrap()
        );

        println!();
        exit(-1);
    }
}
