//! Loading the sprite sheet and other data files.
//!
//! The default sprite sheet is embedded in the binary so it also works on the web, on the desktop a PNG on disk can be used instead.

pub mod loader;

use imgref::{ImgRef, ImgVec};
use miette::{ensure, Result};

use crate::config::FrameRect;
use loader::{png::PngLoader, Loader};

/// Bytes of the sprite sheet shipped with the game.
const EMBEDDED_SPRITE_SHEET: &[u8] = include_bytes!("../../assets/sprites.png");

/// Decoded bitmap containing all frames of the hero.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    /// RGBA pixels.
    image: ImgVec<[u8; 4]>,
}

impl SpriteSheet {
    /// Wrap already decoded pixels.
    #[inline]
    #[must_use]
    pub const fn new(image: ImgVec<[u8; 4]>) -> Self {
        Self { image }
    }

    /// Decode the sprite sheet embedded in the binary.
    ///
    /// # Errors
    ///
    /// - When the embedded PNG is corrupt.
    #[inline]
    pub fn embedded() -> Result<Self> {
        PngLoader::load(EMBEDDED_SPRITE_SHEET, "sprites")
    }

    /// Read and decode a sprite sheet PNG from disk.
    ///
    /// # Errors
    ///
    /// - When the file can't be read.
    /// - When the file is not a valid PNG.
    #[cfg(not(target_arch = "wasm32"))]
    #[inline]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use miette::{IntoDiagnostic, WrapErr};

        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Error reading sprite sheet '{}'", path.display()))?;

        PngLoader::load(&bytes, &path.display().to_string())
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.image.width()
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.image.height()
    }

    /// Get a single RGBA pixel, `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.image[(x, y)])
    }

    /// Whether the rectangle lies completely inside the sheet.
    #[inline]
    #[must_use]
    pub fn contains(&self, frame: &FrameRect) -> bool {
        frame.x as usize + frame.width as usize <= self.width()
            && frame.y as usize + frame.height as usize <= self.height()
    }

    /// Ensure all frames can be cut out of this sheet.
    ///
    /// # Errors
    ///
    /// - When any frame is partially or completely outside of the sheet.
    #[inline]
    pub fn validate_frames(&self, frames: &[FrameRect]) -> Result<()> {
        for frame in frames {
            ensure!(
                self.contains(frame),
                "Frame {frame:?} is outside of the {}x{} sprite sheet",
                self.width(),
                self.height()
            );
        }

        Ok(())
    }

    /// Cut a frame out of the sheet without copying.
    ///
    /// `None` when the frame is not completely inside the sheet.
    #[inline]
    #[must_use]
    pub fn frame(&self, frame: &FrameRect) -> Option<ImgRef<'_, [u8; 4]>> {
        self.contains(frame).then(|| {
            self.image.sub_image(
                frame.x as usize,
                frame.y as usize,
                frame.width as usize,
                frame.height as usize,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SpriteSheet;
    use crate::config::{AnimationConfig, FrameRect};

    #[test]
    fn embedded_contains_default_animation() {
        let sheet = SpriteSheet::embedded().unwrap();

        assert!(sheet
            .validate_frames(&AnimationConfig::default().frames)
            .is_ok());
    }

    #[test]
    fn frame_outside_of_sheet() {
        let sheet = SpriteSheet::new(imgref::ImgVec::new(vec![[0; 4]; 4 * 4], 4, 4));

        assert!(sheet.frame(&FrameRect::new(0, 0, 4, 4)).is_some());
        assert!(sheet.frame(&FrameRect::new(1, 0, 4, 4)).is_none());
        assert!(sheet
            .validate_frames(&[FrameRect::new(2, 2, 2, 3)])
            .is_err());
    }
}
