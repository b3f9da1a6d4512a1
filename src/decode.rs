//! Byte-stream decoding for the image formats the extractor accepts.
//!
//! Dispatches on the MIME type the caller observed (HTTP header, sniffed
//! magic, file extension) — only PNG and JPEG are supported.

use rgb::RGBA;

use crate::error::PaletteError;
use crate::pixels::ImageData;

/// Decode an image byte stream according to its MIME type.
///
/// Accepts `image/png`, `image/jpeg`, and `image/jpg`; anything else
/// fails with [`PaletteError::UnsupportedMime`].
pub fn decode_image(data: &[u8], mime: &str) -> Result<ImageData, PaletteError> {
    match mime {
        "image/png" => decode_png(data),
        "image/jpeg" | "image/jpg" => decode_jpeg(data),
        other => Err(PaletteError::UnsupportedMime(other.into())),
    }
}

fn decode_png(data: &[u8]) -> Result<ImageData, PaletteError> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(
        png::Transformations::EXPAND | png::Transformations::ALPHA | png::Transformations::STRIP_16,
    );
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let pixels = match info.color_type {
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .map(|c| RGBA {
                r: c[0],
                g: c[1],
                b: c[2],
                a: c[3],
            })
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .map(|c| RGBA {
                r: c[0],
                g: c[0],
                b: c[0],
                a: c[1],
            })
            .collect(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .map(|c| RGBA {
                r: c[0],
                g: c[1],
                b: c[2],
                a: 255,
            })
            .collect(),
        png::ColorType::Grayscale => buf
            .iter()
            .map(|&v| RGBA {
                r: v,
                g: v,
                b: v,
                a: 255,
            })
            .collect(),
        // EXPAND turns indexed images into RGB before we see them
        png::ColorType::Indexed => return Err(PaletteError::UnsupportedPixelFormat),
    };

    Ok(ImageData::new(info.width, info.height, pixels))
}

fn decode_jpeg(data: &[u8]) -> Result<ImageData, PaletteError> {
    let mut decoder = jpeg_decoder::Decoder::new(data);
    let buf = decoder.decode()?;
    let info = decoder
        .info()
        .ok_or_else(|| PaletteError::JpegDecode(jpeg_decoder::Error::Format(
            "decoder produced no image info".into(),
        )))?;

    let pixels = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => buf
            .chunks_exact(3)
            .map(|c| RGBA {
                r: c[0],
                g: c[1],
                b: c[2],
                a: 255,
            })
            .collect(),
        jpeg_decoder::PixelFormat::L8 => buf
            .iter()
            .map(|&v| RGBA {
                r: v,
                g: v,
                b: v,
                a: 255,
            })
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => buf
            .chunks_exact(4)
            .map(|c| {
                // jpeg-decoder hands CMYK through Adobe-inverted
                let k = u16::from(c[3]);
                RGBA {
                    r: (u16::from(c[0]) * k / 255) as u8,
                    g: (u16::from(c[1]) * k / 255) as u8,
                    b: (u16::from(c[2]) * k / 255) as u8,
                    a: 255,
                }
            })
            .collect(),
        _ => return Err(PaletteError::UnsupportedPixelFormat),
    };

    Ok(ImageData::new(
        u32::from(info.width),
        u32::from(info.height),
        pixels,
    ))
}
