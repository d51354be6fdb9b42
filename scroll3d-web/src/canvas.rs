/// Canvas element that presents software-rendered frames
use scroll3d_core::{CanvasSize, Framebuffer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, ImageData};

use crate::dom;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Create a canvas, centre it horizontally, and append it to `container`
    pub fn attach(container: &HtmlElement) -> Result<Self, JsValue> {
        let canvas = dom::document()?
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("created element is not a canvas"))?;

        let style = canvas.style();
        style.set_property("position", "relative")?;
        style.set_property("left", "50%")?;
        style.set_property("transform", "translateX(-50%)")?;
        style.set_property("display", "block")?;

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        container.append_child(&canvas)?;
        Ok(Self { canvas, context })
    }

    /// Resize backing store and CSS box; returns the backing size in pixels
    pub fn set_size(&self, size: CanvasSize, pixel_ratio: f32) -> Result<(u32, u32), JsValue> {
        let (width, height) = size.pixel_size(pixel_ratio);
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", size.width))?;
        style.set_property("height", &format!("{}px", size.height))?;
        Ok((width, height))
    }

    /// Copy a frame into the canvas; empty pixels stay transparent
    pub fn present(&self, frame: &Framebuffer) -> Result<(), JsValue> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(());
        }
        let rgba = frame.to_rgba8();
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(rgba.as_slice()),
            frame.width() as u32,
            frame.height() as u32,
        )?;
        self.context.put_image_data(&image, 0.0, 0.0)
    }
}
