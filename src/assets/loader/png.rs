//! PNG asset loading.

use std::io::Cursor;

use imgref::ImgVec;
use miette::{bail, IntoDiagnostic, Result, WrapErr};
use png::{BitDepth, ColorType, Decoder, Transformations};

use super::Loader;
use crate::assets::SpriteSheet;

/// PNG asset loader.
///
/// Every supported PNG is normalized to 8 bit RGBA pixels.
#[non_exhaustive]
pub struct PngLoader;

impl Loader<SpriteSheet> for PngLoader {
    #[inline]
    fn load(bytes: &[u8], id: &str) -> Result<SpriteSheet> {
        let mut decoder = Decoder::new(Cursor::new(bytes));

        // Discard text chunks
        decoder.set_ignore_text_chunk(true);

        // Convert indexed and 16 bit images to 8 bit with an alpha channel
        decoder
            .set_transformations(Transformations::normalize_to_color8() | Transformations::ALPHA);

        // Start parsing the PNG
        let mut reader = decoder
            .read_info()
            .into_diagnostic()
            .wrap_err_with(|| format!("Error reading PNG header of '{id}'"))?;

        let (color_type, bits) = reader.output_color_type();
        if bits != BitDepth::Eight {
            bail!("PNG '{id}' could not be converted to 8 bits per channel");
        }

        // Read the PNG
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .into_diagnostic()
            .wrap_err_with(|| format!("Error decoding PNG '{id}'"))?;
        buf.truncate(info.buffer_size());

        let pixels: Vec<[u8; 4]> = match color_type {
            ColorType::Rgba => buf
                .chunks_exact(4)
                .map(|rgba| [rgba[0], rgba[1], rgba[2], rgba[3]])
                .collect(),
            ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .map(|gray_alpha| [gray_alpha[0], gray_alpha[0], gray_alpha[0], gray_alpha[1]])
                .collect(),
            other => bail!("PNG '{id}' has unsupported color type {other:?}"),
        };

        log::debug!(
            "Loaded PNG '{id}' with size {}x{}",
            info.width,
            info.height
        );

        Ok(SpriteSheet::new(ImgVec::new(
            pixels,
            info.width as usize,
            info.height as usize,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::{Loader, PngLoader};

    /// Encode a tiny image with the PNG crate itself.
    fn encode(width: u32, height: u32, color_type: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, width, height);
            encoder.set_color(color_type);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }

        bytes
    }

    #[test]
    fn load_rgba() {
        let bytes = encode(
            2,
            1,
            png::ColorType::Rgba,
            &[255, 0, 0, 255, 0, 255, 0, 128],
        );
        let sheet = PngLoader::load(&bytes, "rgba").unwrap();

        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.height(), 1);
        assert_eq!(sheet.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(sheet.pixel(1, 0), Some([0, 255, 0, 128]));
    }

    #[test]
    fn load_rgb_adds_alpha() {
        let bytes = encode(1, 1, png::ColorType::Rgb, &[10, 20, 30]);
        let sheet = PngLoader::load(&bytes, "rgb").unwrap();

        assert_eq!(sheet.pixel(0, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn reject_garbage() {
        assert!(PngLoader::load(b"definitely not a png", "garbage").is_err());
    }
}
