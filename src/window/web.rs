//! Attach the window to a canvas on the web page.

use miette::Result;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;
use winit::{
    platform::web::{WindowAttributesExtWebSys, WindowExtWebSys},
    window::{Window, WindowAttributes},
};

use crate::config::Config;

/// Identifier of the canvas element the game is drawn on.
const CANVAS_ID: &str = "hero-walk";

/// Use the canvas with the [`CANVAS_ID`] if it exists, otherwise a new one will be appended to the page.
pub(super) fn attach_canvas(window_attributes: WindowAttributes) -> Result<WindowAttributes> {
    let window = web_sys::window().ok_or_else(|| miette::miette!("Error finding web window"))?;
    let document = window
        .document()
        .ok_or_else(|| miette::miette!("Error finding web document"))?;

    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .map(|element| {
            element
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|err| miette::miette!("Element '{CANVAS_ID}' is not a canvas: {err:?}"))
        })
        .transpose()?;

    if canvas.is_none() {
        log::debug!("No canvas with id '{CANVAS_ID}' found, creating one");
    }

    Ok(window_attributes
        .with_canvas(canvas)
        // Add the canvas to the web page
        .with_append(true)
        // Arrow keys shouldn't scroll the page
        .with_prevent_default(true))
}

/// Ensure the pixels are not rendered with wrong filtering and that the size is correct.
pub(super) fn style_canvas(window: &Window, config: &Config) -> Result<()> {
    let canvas = window
        .canvas()
        .ok_or_else(|| miette::miette!("Window is not attached to a canvas"))?;

    canvas.set_id(CANVAS_ID);
    canvas
        .style()
        .set_css_text(&format!(
            "image-rendering: pixelated; outline: none; border: none; width: {}px; height: {}px",
            config.window_size().width,
            config.window_size().height,
        ));

    Ok(())
}
