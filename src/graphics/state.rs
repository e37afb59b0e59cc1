//! Main rendering state.

use std::sync::Arc;

use glamour::{Point2, Rect, Size2};
use imgref::ImgRef;
use miette::Result;
use winit::window::Window;

use crate::config::Config;

use super::{gpu::Gpu, upscale::UpscaleState};

/// Render state presenting the composed pixel buffer in the window.
pub(crate) struct RenderState {
    /// GPU state.
    gpu: Gpu<'static>,
    /// Texture and pipeline drawing the pixel buffer scaled up.
    upscale: UpscaleState,
    /// Size of the pixel buffer.
    ///
    /// Will be scaled with integer scaling and letterboxing to fit the screen.
    buffer_size: Size2<u32>,
    /// Letterbox output for the render pass viewport.
    ///
    /// `None` when the screen is too small to show the buffer.
    letterbox: Option<Rect>,
    /// Color of the area around the letterbox.
    viewport_color: wgpu::Color,
}

impl RenderState {
    /// Create a GPU surface on the window.
    ///
    /// # Errors
    ///
    /// - When no GPU surface could be created on the window.
    pub(crate) async fn new(config: &Config, window: Arc<Window>) -> Result<Self> {
        let buffer_size = config.buffer_size();

        // The canvas on the web keeps the size of the requested scaling
        #[cfg(target_arch = "wasm32")]
        let screen_size = config.window_size();
        #[cfg(not(target_arch = "wasm32"))]
        let screen_size = {
            let inner_size = window.inner_size();

            Size2::new(inner_size.width, inner_size.height)
        };

        // Setup the GPU and attach it to the window surface
        let gpu = Gpu::new(window, screen_size, config.vsync).await?;

        let upscale = UpscaleState::new(
            buffer_size,
            &gpu.device,
            include_str!(concat!(env!("OUT_DIR"), "/upscale.wgsl")),
        );

        let letterbox = calculate_letterbox(buffer_size, gpu.screen_size());
        let viewport_color = super::u32_to_wgpu_color(config.viewport_color);

        Ok(Self {
            gpu,
            upscale,
            buffer_size,
            letterbox,
            viewport_color,
        })
    }

    /// Upload the pixels and draw them to the window.
    pub(crate) fn render(&mut self, pixels: ImgRef<'_, [u8; 4]>) {
        profiling::scope!("Render");

        // Nothing fits, don't draw anything
        let Some(letterbox) = self.letterbox else {
            return;
        };

        // Queued writes are submitted together with the frame
        self.upscale.upload(pixels, &self.gpu.queue);

        // The surface might be lost, try again next frame
        let Some(mut frame) = self.gpu.start() else {
            return;
        };

        self.upscale
            .render(&mut frame, letterbox, self.viewport_color);

        frame.present();
    }

    /// Resize the surface.
    ///
    /// Only resize the surface on the desktop, on the web we keep the canvas the same size.
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn resize(&mut self, new_size: Size2<u32>) {
        // Resize the surface
        self.gpu.resize(new_size);

        // Recalculate the letterbox with the new size
        self.letterbox = calculate_letterbox(self.buffer_size, self.gpu.screen_size());
    }
}

/// Calculate the biggest integer scaled rectangle of the buffer centered on the screen.
///
/// # Returns
///
/// - `None` when the screen is smaller than the buffer in any direction.
#[allow(clippy::cast_precision_loss)]
fn calculate_letterbox(buffer_size: Size2<u32>, screen_size: Size2<u32>) -> Option<Rect> {
    if buffer_size.width == 0
        || buffer_size.height == 0
        || screen_size.width < buffer_size.width
        || screen_size.height < buffer_size.height
    {
        log::debug!(
            "Screen ({}x{}) can't fit the buffer, not drawing",
            screen_size.width,
            screen_size.height
        );

        return None;
    }

    // The smallest ratio of both axes fits
    let scale = (screen_size.width / buffer_size.width).min(screen_size.height / buffer_size.height);

    let scaled_width = buffer_size.width * scale;
    let scaled_height = buffer_size.height * scale;

    // Center the scaled rectangle inside the screen
    let offset_x = (screen_size.width - scaled_width) / 2;
    let offset_y = (screen_size.height - scaled_height) / 2;

    log::debug!(
        "Setting new letterbox to ({offset_x}:{offset_y} x {scaled_width}:{scaled_height}) with {scale} scaling"
    );

    Some(Rect {
        origin: Point2::new(offset_x as f32, offset_y as f32),
        size: Size2::new(scaled_width as f32, scaled_height as f32),
    })
}

#[cfg(test)]
mod tests {
    use glamour::Size2;

    use super::calculate_letterbox;

    #[test]
    fn exact_fit() {
        let letterbox = calculate_letterbox(Size2::new(64, 64), Size2::new(640, 640)).unwrap();

        assert_eq!((letterbox.origin.x, letterbox.origin.y), (0.0, 0.0));
        assert_eq!((letterbox.size.width, letterbox.size.height), (640.0, 640.0));
    }

    #[test]
    fn wide_screen_is_centered_horizontally() {
        let letterbox = calculate_letterbox(Size2::new(64, 64), Size2::new(1000, 600)).unwrap();

        // 600 / 64 = 9
        assert_eq!((letterbox.size.width, letterbox.size.height), (576.0, 576.0));
        assert_eq!((letterbox.origin.x, letterbox.origin.y), (212.0, 12.0));
    }

    #[test]
    fn non_square_buffer() {
        let letterbox = calculate_letterbox(Size2::new(80, 40), Size2::new(400, 400)).unwrap();

        assert_eq!((letterbox.size.width, letterbox.size.height), (400.0, 200.0));
        assert_eq!((letterbox.origin.x, letterbox.origin.y), (0.0, 100.0));
    }

    #[test]
    fn too_small_screen() {
        assert!(calculate_letterbox(Size2::new(64, 64), Size2::new(63, 200)).is_none());
        assert!(calculate_letterbox(Size2::new(64, 64), Size2::new(0, 0)).is_none());
    }
}
