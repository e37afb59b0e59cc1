//! Presenting the composed pixel buffer on the GPU.

pub(crate) mod gpu;
pub(crate) mod state;
pub(crate) mod upscale;

use wgpu::Color;

/// Texture format we prefer to use for everything.
///
/// We choose sRGB since the sprite sheet is created with this format and otherwise everything will be quite dark.
pub(crate) const PREFERRED_TEXTURE_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba8UnormSrgb;

/// Convert an `u32` color to a WGPU [`wgpu::Color`] taking in account sRGB.
#[allow(clippy::cast_lossless)]
fn u32_to_wgpu_color(argb: u32) -> Color {
    let [a, r, g, b] = argb.to_be_bytes().map(|channel| f64::from(channel) / 255.0);

    if PREFERRED_TEXTURE_FORMAT.is_srgb() {
        // Convert to linear space, the alpha channel is always linear
        Color {
            a,
            r: r.powf(2.2),
            g: g.powf(2.2),
            b: b.powf(2.2),
        }
    } else {
        Color { a, r, g, b }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn u32_to_wgpu_color() {
        let color = super::u32_to_wgpu_color(0xFFFF_0000);

        assert!((color.a - 1.0).abs() < f64::EPSILON);
        assert!((color.r - 1.0).abs() < f64::EPSILON);
        assert!(color.g.abs() < f64::EPSILON);
        assert!(color.b.abs() < f64::EPSILON);
    }
}
