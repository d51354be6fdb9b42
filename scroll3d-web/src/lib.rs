/// scroll3d Web - WASM front end for the scroll-driven model viewer
///
/// Fetches the model, renders it with the core software rasterizer into a
/// canvas, and wires window scroll/resize events to the scroll trigger.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use scroll3d_core::chrome::ChromeConfig;
use scroll3d_core::{Asset, CanvasSize, Framebuffer, ScrollTrigger, Stage, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, Response};

mod canvas;
mod chrome;
mod dom;

use canvas::CanvasSurface;
use dom::to_js;

const PIXEL_RATIO: f32 = 1.0;

/// One scroll-animated model inside a container element
#[wasm_bindgen]
pub struct ScrollScene {
    inner: Rc<RefCell<SceneState>>,
}

#[wasm_bindgen]
impl ScrollScene {
    /// Fetch the configured asset and build the scene inside `container_id`
    pub async fn load(container_id: String, config_toml: Option<String>) -> Result<ScrollScene, JsValue> {
        let config = match config_toml {
            Some(text) => ViewerConfig::from_toml_str(&text).map_err(to_js)?,
            None => ViewerConfig::default(),
        };

        let container = dom::element_by_id(&container_id)?;
        let asset = match fetch_asset(&config.asset.path).await {
            Ok(asset) => asset,
            Err(e) => {
                log::error!("failed to load {}: {e:?}", config.asset.path);
                return Err(e);
            }
        };

        let trigger_element = dom::element_by_id(&config.trigger.element)?;
        let trigger = ScrollTrigger::from_config(&config.trigger).map_err(to_js)?;
        let surface = CanvasSurface::attach(&container)?;

        let initial = CanvasSize {
            width: container.client_width() as f32,
            height: container.client_height() as f32,
        };
        let stage = Stage::new(asset, &config, initial);

        Ok(ScrollScene {
            inner: Rc::new(RefCell::new(SceneState {
                stage,
                trigger,
                surface,
                framebuffer: Framebuffer::new(0, 0),
                container,
                trigger_element,
            })),
        })
    }

    /// Size the canvas, attach scroll/resize listeners, and start rendering
    pub fn start(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().resize(true)?;

        let state = Rc::clone(&self.inner);
        dom::on_window_event("resize", move || {
            if let Err(e) = state.borrow_mut().resize(false) {
                log::error!("resize failed: {e:?}");
            }
        })?;

        let state = Rc::clone(&self.inner);
        dom::on_window_event("scroll", move || {
            if let Err(e) = state.borrow_mut().on_scroll() {
                log::error!("scroll update failed: {e:?}");
            }
        })?;

        let state = Rc::clone(&self.inner);
        dom::frame_loop(move || {
            if let Err(e) = state.borrow_mut().frame() {
                log::error!("render failed: {e:?}");
            }
        })
    }

    /// Re-measure the trigger element, e.g. after page content changed
    pub fn refresh(&self) -> Result<(), JsValue> {
        self.inner.borrow_mut().refresh(true)
    }

    pub fn progress(&self) -> f32 {
        self.inner.borrow().trigger.progress()
    }
}

struct SceneState {
    stage: Stage,
    trigger: ScrollTrigger,
    surface: CanvasSurface,
    framebuffer: Framebuffer,
    container: HtmlElement,
    trigger_element: HtmlElement,
}

impl SceneState {
    fn resize(&mut self, force: bool) -> Result<(), JsValue> {
        let size = self.stage.resize(self.container.client_width() as f32);
        let (width, height) = self.surface.set_size(size, PIXEL_RATIO)?;
        self.framebuffer.resize(width as usize, height as usize);
        self.refresh(force)
    }

    fn refresh(&mut self, force: bool) -> Result<(), JsValue> {
        let layout = dom::measure_trigger(&self.trigger_element, self.trigger.pin_offset())?;
        self.trigger.refresh(layout, force, &mut self.stage);
        self.trigger.update(dom::scroll_y()?, &mut self.stage);
        self.apply_pin()
    }

    fn on_scroll(&mut self) -> Result<(), JsValue> {
        self.trigger.update(dom::scroll_y()?, &mut self.stage);
        self.apply_pin()
    }

    fn apply_pin(&self) -> Result<(), JsValue> {
        let offset = self.trigger.pin_offset();
        self.trigger_element
            .style()
            .set_property("transform", &format!("translateY({offset}px)"))
    }

    fn frame(&mut self) -> Result<(), JsValue> {
        self.stage.frame(&mut self.framebuffer);
        self.surface.present(&self.framebuffer)
    }
}

async fn fetch_asset(url: &str) -> Result<Asset, JsValue> {
    let response = JsFuture::from(dom::window()?.fetch_with_str(url))
        .await?
        .dyn_into::<Response>()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {} fetching {url}", response.status())));
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Asset::from_bytes(&bytes, &extension_of(url)).map_err(to_js)
}

fn extension_of(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("glb")
        .to_string()
}

/// Toggle the sidebar drawer (bound to the burger button), using the ids and
/// breakpoint given to `install_chrome`
#[wasm_bindgen]
pub fn toggle_sidebar() -> Result<(), JsValue> {
    chrome::toggle(&chrome::installed())
}

/// Wire sidebar link clicks, the nav background, and the logo carousel
#[wasm_bindgen]
pub fn install_chrome(config_toml: Option<String>) -> Result<(), JsValue> {
    let config = match config_toml {
        Some(text) => ViewerConfig::from_toml_str(&text).map_err(to_js)?.chrome,
        None => ChromeConfig::default(),
    };
    chrome::install(&config)
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of_url() {
        assert_eq!(extension_of("./macbook.glb"), "glb");
        assert_eq!(extension_of("/models/part.STL?v=3"), "STL");
        assert_eq!(extension_of("/models/noext"), "glb");
    }
}
