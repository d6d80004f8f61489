/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::BufWriter;

use clap::ArgMatches;
use image::GenericImageView;
use log::{debug, info};
use loqi_core::colorspace::{ColorCharacteristics, ColorSpace};
use loqi_core::options::EncoderOptions;
use loqi_qoi::{QoiEncodeErrors, QoiEncoder};

/// Errors that abort a conversion
pub enum ConvertErrors {
    /// The input could not be read or decoded into pixels,
    /// no output file was created
    UnreadableSource(String, image::ImageError),
    /// The output destination could not be created,
    /// no bytes were written
    UnopenableSink(String, std::io::Error),
    /// Encoding failed after the sink was opened,
    /// the output file is incomplete
    EncodeFailed(QoiEncodeErrors)
}

impl Debug for ConvertErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertErrors::UnreadableSource(path, err) => {
                writeln!(f, "Error loading image {path}: {err}")
            }
            ConvertErrors::UnopenableSink(path, err) => {
                writeln!(f, "Error opening output file {path}: {err}")
            }
            ConvertErrors::EncodeFailed(err) => {
                writeln!(f, "Error encoding image: {:?}", err)
            }
        }
    }
}

impl From<QoiEncodeErrors> for ConvertErrors {
    fn from(value: QoiEncodeErrors) -> Self {
        ConvertErrors::EncodeFailed(value)
    }
}

/// Decode the input raster, encode it and write the result
///
/// The input is decoded in full before the output file is created, so
/// a source error never leaves a file behind.
pub fn run(options: &ArgMatches) -> Result<(), ConvertErrors> {
    let input = options.get_one::<String>("in").unwrap();
    let output = options.get_one::<String>("out").unwrap();
    let lossiness = *options.get_one::<u8>("lossiness").unwrap();

    let image = image::open(input)
        .map_err(|err| ConvertErrors::UnreadableSource(input.clone(), err))?;

    let (width, height) = image.dimensions();
    let (width, height) = (width as usize, height as usize);

    // the encoder takes interleaved 8-bit pixels, carry alpha only
    // when the source has it
    let (pixels, colorspace) = if image.color().has_alpha() {
        (image.into_rgba8().into_raw(), ColorSpace::RGBA)
    } else {
        (image.into_rgb8().into_raw(), ColorSpace::RGB)
    };

    info!("Input: {input}");
    info!("Dimensions: {width} x {height}");
    info!("Colorspace: {colorspace:?}");
    info!("Lossiness: {lossiness}");

    let encoder_options =
        EncoderOptions::new(width, height, colorspace).set_lossiness(lossiness);
    let mut encoder = QoiEncoder::new(&pixels, encoder_options);

    if options.get_flag("linear") {
        encoder.set_color_characteristics(ColorCharacteristics::Linear);
    }

    let file = File::create(output)
        .map_err(|err| ConvertErrors::UnopenableSink(output.clone(), err))?;
    let mut sink = BufWriter::new(file);

    let size = encoder.encode(&mut sink)?;

    debug!("Encoded {} pixels", width * height);
    info!("Wrote {size} bytes to {output}");

    Ok(())
}
