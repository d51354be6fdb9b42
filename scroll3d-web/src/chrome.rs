/// DOM wiring for the sidebar drawer, nav background, and logo carousel
use std::cell::RefCell;

use scroll3d_core::chrome::{Carousel, ChromeConfig, NavBar, Sidebar};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom::{self, DomClasses};

thread_local! {
    static INSTALLED: RefCell<Option<ChromeConfig>> = const { RefCell::new(None) };
}

/// Config passed to the last `install`, or the defaults before that
pub fn installed() -> ChromeConfig {
    INSTALLED.with(|slot| slot.borrow().clone().unwrap_or_default())
}

fn remember(config: &ChromeConfig) {
    INSTALLED.with(|slot| *slot.borrow_mut() = Some(config.clone()));
}

pub fn toggle(config: &ChromeConfig) -> Result<(), JsValue> {
    let sidebar = dom::element_by_id(&config.sidebar_id)?;
    Sidebar::new(config.sidebar_breakpoint).toggle(&mut DomClasses::of(&sidebar), dom::viewport_width()?);
    Ok(())
}

pub fn install(config: &ChromeConfig) -> Result<(), JsValue> {
    remember(config);
    install_sidebar_links(config)?;
    install_nav(config)?;
    install_carousel(config)
}

fn install_sidebar_links(config: &ChromeConfig) -> Result<(), JsValue> {
    let sidebar = dom::element_by_id(&config.sidebar_id)?;
    let links = sidebar.query_selector_all("a")?;
    let drawer = Sidebar::new(config.sidebar_breakpoint);

    for index in 0..links.length() {
        let Some(link) = links.get(index) else {
            continue;
        };
        let sidebar = sidebar.clone();
        let closure = Closure::wrap(Box::new(move || match dom::viewport_width() {
            Ok(width) => drawer.on_link_click(&mut DomClasses::of(&sidebar), width),
            Err(e) => log::warn!("sidebar link click: {e:?}"),
        }) as Box<dyn FnMut()>);
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn install_nav(config: &ChromeConfig) -> Result<(), JsValue> {
    let nav_element = dom::element_by_id(&config.nav_id)?;
    let nav = NavBar::new(config.nav_threshold, config.nav_class.clone());

    dom::on_window_event("scroll", move || match dom::scroll_y() {
        Ok(scroll_y) => nav.on_scroll(&mut DomClasses::of(&nav_element), scroll_y),
        Err(e) => log::warn!("nav scroll: {e:?}"),
    })
}

fn install_carousel(config: &ChromeConfig) -> Result<(), JsValue> {
    let Some(track) = dom::document()?.query_selector(&config.carousel_selector)? else {
        log::warn!("carousel {} not found", config.carousel_selector);
        return Ok(());
    };
    let mut carousel = Carousel::new(config.carousel_speed);

    dom::frame_loop(move || step_carousel(&track, &mut carousel))
}

fn step_carousel(track: &Element, carousel: &mut Carousel) {
    let offset = carousel.step(track.scroll_width() as f32);
    track.set_scroll_left(offset as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_uses_installed_config() {
        assert_eq!(installed(), ChromeConfig::default());

        let config = ChromeConfig {
            sidebar_id: "drawer".to_string(),
            sidebar_breakpoint: 1024.0,
            ..ChromeConfig::default()
        };
        remember(&config);
        assert_eq!(installed().sidebar_id, "drawer");
        assert_eq!(installed().sidebar_breakpoint, 1024.0);
    }
}
