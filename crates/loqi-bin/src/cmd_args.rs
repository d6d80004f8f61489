/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{info, Level};

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("loqi")
        .about("Convert images to QOI, optionally merging near-identical pixels into runs")
        .arg(Arg::new("in")
            .short('i')
            .help("Input image to read pixels from")
            .long("input")
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .help("Output file to write the encoded image to")
            .long("output")
            .required(true))
        .arg(Arg::new("lossiness")
            .short('l')
            .long("lossiness")
            .help_heading("ENCODING")
            .help("Per-channel color error tolerated when merging pixel runs")
            .long_help("Per-channel color error tolerated when merging pixel runs.\nThe default of 0 keeps the encoder lossless. Alpha is always preserved exactly.")
            .value_parser(value_parser!(u8))
            .default_value("0"))
        .arg(Arg::new("linear")
            .long("linear")
            .help_heading("ENCODING")
            .action(ArgAction::SetTrue)
            .help("Mark the output as linear light instead of sRGB"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the encoding options"))
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level;

    if *options.get_one::<bool>("debug").unwrap() {
        log_level = Level::Debug;
    } else if *options.get_one::<bool>("trace").unwrap() {
        log_level = Level::Trace;
    } else if *options.get_one::<bool>("warn").unwrap() {
        log_level = Level::Warn
    } else if *options.get_one::<bool>("info").unwrap() {
        log_level = Level::Info;
    } else {
        log_level = Level::Warn;
    }

    simple_logger::init_with_level(log_level).unwrap();

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
