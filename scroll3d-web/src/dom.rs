/// DOM lookups and measurements shared by the web adapters
use std::fmt::Display;

use scroll3d_core::chrome::ClassList;
use scroll3d_core::TriggerLayout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, DomTokenList, Element, HtmlElement, Window};

pub fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("document not available"))
}

pub fn element_by_id(id: &str) -> Result<HtmlElement, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{id} not found")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} is not an HTML element")))
}

pub fn scroll_y() -> Result<f32, JsValue> {
    Ok(window()?.scroll_y()? as f32)
}

pub fn viewport_width() -> Result<f32, JsValue> {
    Ok(window()?.inner_width()?.as_f64().unwrap_or_default() as f32)
}

pub fn viewport_height() -> Result<f32, JsValue> {
    Ok(window()?.inner_height()?.as_f64().unwrap_or_default() as f32)
}

/// Measure a trigger element in document coordinates. `pin_offset` is the
/// translation currently applied by pinning, which the bounding box includes.
pub fn measure_trigger(element: &Element, pin_offset: f32) -> Result<TriggerLayout, JsValue> {
    let rect = element.get_bounding_client_rect();
    Ok(TriggerLayout {
        element_top: rect.top() as f32 + scroll_y()? - pin_offset,
        element_height: element.client_height() as f32,
        viewport_height: viewport_height()?,
    })
}

/// `ClassList` backed by an element's live `classList`
pub struct DomClasses(pub DomTokenList);

impl DomClasses {
    pub fn of(element: &Element) -> Self {
        Self(element.class_list())
    }
}

impl ClassList for DomClasses {
    fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    fn add(&mut self, class: &str) {
        if let Err(e) = self.0.add_1(class) {
            log::warn!("failed to add class {class}: {e:?}");
        }
    }

    fn remove(&mut self, class: &str) {
        if let Err(e) = self.0.remove_1(class) {
            log::warn!("failed to remove class {class}: {e:?}");
        }
    }
}

/// Run `handler` every time `event` fires on the window, for the page lifetime
pub fn on_window_event(event: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    window()?.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Call `tick` on every animation frame, for the page lifetime
pub fn frame_loop(mut tick: impl FnMut() + 'static) -> Result<(), JsValue> {
    use std::cell::RefCell;
    use std::rc::Rc;

    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&slot);

    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        tick();
        if let Some(closure) = next.borrow().as_ref() {
            if let Err(e) = request_frame(closure) {
                log::error!("requestAnimationFrame failed: {e:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(closure) = slot.borrow().as_ref() {
        request_frame(closure)?;
    }
    Ok(())
}

fn request_frame(closure: &Closure<dyn FnMut()>) -> Result<(), JsValue> {
    window()?.request_animation_frame(closure.as_ref().unchecked_ref())?;
    Ok(())
}
