//! Compose the background and the hero sprite into a pixel buffer.

use std::time::Duration;

use imgref::{ImgRef, ImgVec};
use miette::{Result, WrapErr};

use crate::{assets::SpriteSheet, config::AnimationConfig, math::Vector};

/// Draws every visual frame into a buffer with the size of the grid.
///
/// Reads the simulation state but never mutates it.
#[derive(Debug, Clone)]
pub struct SceneComposer {
    /// RGBA pixels of the composed frame.
    canvas: ImgVec<[u8; 4]>,
    /// Color of the background tile.
    background: [u8; 4],
    /// Bitmap containing the hero frames.
    sprite_sheet: SpriteSheet,
    /// Which parts of the sprite sheet to cycle through.
    animation: AnimationConfig,
}

impl SceneComposer {
    /// Setup the composer with an empty canvas.
    ///
    /// # Arguments
    ///
    /// * `width` - Horizontal pixels of the canvas.
    /// * `height` - Vertical pixels of the canvas.
    /// * `background_color` - `0xAARRGGBB` color of the background tile.
    /// * `sprite_sheet` - Bitmap the animation frames are cut from.
    /// * `animation` - Frames of the hero animation.
    ///
    /// # Errors
    ///
    /// - When any animation frame lies outside of the sprite sheet.
    #[inline]
    pub fn new(
        width: usize,
        height: usize,
        background_color: u32,
        sprite_sheet: SpriteSheet,
        animation: AnimationConfig,
    ) -> Result<Self> {
        sprite_sheet
            .validate_frames(&animation.frames)
            .wrap_err("Sprite sheet doesn't fit the hero animation")?;

        let background = argb_to_rgba(background_color);
        let canvas = ImgVec::new(vec![background; width * height], width, height);

        Ok(Self {
            canvas,
            background,
            sprite_sheet,
            animation,
        })
    }

    /// Index of the animation frame shown after running for `elapsed` time.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_index(&self, elapsed: Duration) -> usize {
        let frames_shown = elapsed.as_secs_f64() * f64::from(self.animation.frame_rate);

        frames_shown as usize % self.animation.frames.len()
    }

    /// Draw the background and the hero centered at `position`.
    ///
    /// # Arguments
    ///
    /// * `position` - Center of the hero on the grid.
    /// * `elapsed` - Time since the game started, selects the animation frame.
    #[inline]
    pub fn compose(&mut self, position: Vector, elapsed: Duration) -> ImgRef<'_, [u8; 4]> {
        profiling::scope!("Compose scene");

        // Background tile filling the whole grid
        self.canvas.buf_mut().fill(self.background);

        let frame_rect = self.animation.frames[self.frame_index(elapsed)];
        if let Some(frame) = self.sprite_sheet.frame(&frame_rect) {
            // The hero is a square of the frame width, centered on the position
            #[allow(clippy::cast_possible_wrap)]
            let half_width = frame_rect.width as i32 / 2;

            blit(
                &mut self.canvas,
                frame,
                position.x - half_width,
                position.y - half_width,
            );
        }

        self.canvas.as_ref()
    }
}

/// Draw the source image with its top-left at the coordinates, clipping everything outside of the target.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn blit(target: &mut ImgVec<[u8; 4]>, source: ImgRef<'_, [u8; 4]>, left: i32, top: i32) {
    let (target_width, target_height) = (target.width() as i32, target.height() as i32);

    for (source_y, row) in source.rows().enumerate() {
        let y = top + source_y as i32;
        if y < 0 || y >= target_height {
            continue;
        }

        for (source_x, pixel) in row.iter().enumerate() {
            let x = left + source_x as i32;
            if x < 0 || x >= target_width {
                continue;
            }

            let index = (x as usize, y as usize);
            let blended = blend(target[index], *pixel);
            target[index] = blended;
        }
    }
}

/// Alpha blend a straight alpha source pixel over an opaque destination pixel.
#[allow(clippy::cast_possible_truncation)]
fn blend(destination: [u8; 4], source: [u8; 4]) -> [u8; 4] {
    match source[3] {
        0 => destination,
        u8::MAX => source,
        alpha => {
            let alpha = u16::from(alpha);
            let mix = |from: u8, onto: u8| {
                ((u16::from(from) * alpha + u16::from(onto) * (255 - alpha) + 127) / 255) as u8
            };

            [
                mix(source[0], destination[0]),
                mix(source[1], destination[1]),
                mix(source[2], destination[2]),
                destination[3],
            ]
        }
    }
}

/// Convert an `0xAARRGGBB` color to RGBA bytes.
#[inline]
#[must_use]
pub const fn argb_to_rgba(argb: u32) -> [u8; 4] {
    let [a, r, g, b] = argb.to_be_bytes();

    [r, g, b, a]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use imgref::ImgVec;

    use super::{argb_to_rgba, SceneComposer};
    use crate::{
        assets::SpriteSheet,
        config::{AnimationConfig, FrameRect},
        math::Vector,
    };

    const BACKGROUND: [u8; 4] = [0x5D, 0x1D, 0x45, 0xFF];
    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    /// Sheet with two 4x4 frames, a solid red one and a green one with a transparent left column.
    fn composer() -> SceneComposer {
        let mut pixels = Vec::new();
        for _y in 0..4 {
            pixels.extend([RED; 4]);
            pixels.extend([[0; 4], GREEN, GREEN, GREEN]);
        }
        let sheet = SpriteSheet::new(ImgVec::new(pixels, 8, 4));

        let animation = AnimationConfig {
            frames: vec![FrameRect::new(0, 0, 4, 4), FrameRect::new(4, 0, 4, 4)],
            frame_rate: 2.0,
        };

        SceneComposer::new(16, 16, 0xFF5D_1D45, sheet, animation).unwrap()
    }

    #[test]
    fn argb_conversion() {
        assert_eq!(argb_to_rgba(0xFF5D_1D45), BACKGROUND);
        assert_eq!(argb_to_rgba(0x8011_2233), [0x11, 0x22, 0x33, 0x80]);
    }

    #[test]
    fn hero_is_centered_on_position() {
        let mut composer = composer();
        let canvas = composer.compose(Vector::new(8, 8), Duration::ZERO);

        // Frame is 4 wide, so the top-left is 2 pixels up and left
        assert_eq!(canvas[(5usize, 5usize)], BACKGROUND);
        assert_eq!(canvas[(6usize, 6usize)], RED);
        assert_eq!(canvas[(9usize, 9usize)], RED);
        assert_eq!(canvas[(10usize, 10usize)], BACKGROUND);
    }

    #[test]
    fn background_is_redrawn() {
        let mut composer = composer();
        composer.compose(Vector::new(8, 8), Duration::ZERO);
        let canvas = composer.compose(Vector::new(2, 2), Duration::ZERO);

        assert_eq!(canvas[(8usize, 8usize)], BACKGROUND);
        assert_eq!(canvas[(0usize, 0usize)], RED);
    }

    #[test]
    fn animation_cycles_with_time() {
        let composer = composer();

        assert_eq!(composer.frame_index(Duration::ZERO), 0);
        assert_eq!(composer.frame_index(Duration::from_millis(499)), 0);
        assert_eq!(composer.frame_index(Duration::from_millis(500)), 1);
        assert_eq!(composer.frame_index(Duration::from_millis(1000)), 0);
        assert_eq!(composer.frame_index(Duration::from_millis(1600)), 1);
    }

    #[test]
    fn transparent_pixels_show_background() {
        let mut composer = composer();
        let canvas = composer.compose(Vector::new(8, 8), Duration::from_millis(600));

        assert_eq!(canvas[(6usize, 6usize)], BACKGROUND);
        assert_eq!(canvas[(7usize, 6usize)], GREEN);
    }

    #[test]
    fn hero_outside_of_grid_is_clipped() {
        let mut composer = composer();

        let canvas = composer.compose(Vector::new(-1, 15), Duration::ZERO);
        assert_eq!(canvas[(0usize, 15usize)], RED);
        assert_eq!(canvas[(1usize, 15usize)], BACKGROUND);

        let canvas = composer.compose(Vector::new(-100, 300), Duration::ZERO);
        assert!(canvas.pixels().all(|pixel| pixel == BACKGROUND));
    }

    #[test]
    fn frames_must_fit_the_sheet() {
        let sheet = SpriteSheet::new(ImgVec::new(vec![RED; 4], 2, 2));

        assert!(SceneComposer::new(8, 8, 0, sheet, AnimationConfig::default()).is_err());
    }
}
