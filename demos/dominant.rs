//! Print the dominant color and palette of a PNG or JPEG file.
//!
//! Usage:
//!   cargo run --example dominant -- <image.png|image.jpg> [color-count]

use std::env;
use std::fs;
use std::process::ExitCode;

use huepick::PaletteOptions;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: dominant <image.png|image.jpg> [color-count]");
        return ExitCode::FAILURE;
    };
    let color_count: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(huepick::DEFAULT_COLOR_COUNT);

    let mime = if path.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    };

    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let image = match huepick::decode_image(&data, mime) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = PaletteOptions::new().color_count(color_count);
    match huepick::get_color(&image, options.quality) {
        Ok(c) => println!("dominant: #{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    }
    match huepick::get_palette(&image, &options) {
        Ok(palette) => {
            for c in palette {
                println!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b);
            }
        }
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
