/// Page chrome state: sidebar drawer, navigation background, and logo carousel
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const SIDEBAR_OPEN_CLASS: &str = "translate-x-0";
pub const SIDEBAR_CLOSED_CLASS: &str = "translate-x-[-100%]";

/// Minimal view of an element's class attribute
pub trait ClassList {
    fn contains(&self, class: &str) -> bool;

    fn add(&mut self, class: &str);

    fn remove(&mut self, class: &str);

    fn toggle(&mut self, class: &str) {
        if self.contains(class) {
            self.remove(class);
        } else {
            self.add(class);
        }
    }
}

impl ClassList for BTreeSet<String> {
    fn contains(&self, class: &str) -> bool {
        BTreeSet::contains(self, class)
    }

    fn add(&mut self, class: &str) {
        self.insert(class.to_string());
    }

    fn remove(&mut self, class: &str) {
        BTreeSet::remove(self, class);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    pub sidebar_id: String,
    /// Viewport width below which the sidebar acts as a drawer
    pub sidebar_breakpoint: f32,
    pub nav_id: String,
    pub nav_threshold: f32,
    pub nav_class: String,
    pub carousel_selector: String,
    /// Pixels advanced per frame
    pub carousel_speed: f32,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            sidebar_id: "sidebar".to_string(),
            sidebar_breakpoint: 768.0,
            nav_id: "main-nav".to_string(),
            nav_threshold: 100.0,
            nav_class: "bg-[#0E0E0E]".to_string(),
            carousel_selector: ".carousel-container".to_string(),
            carousel_speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sidebar {
    pub breakpoint: f32,
}

impl Sidebar {
    pub fn new(breakpoint: f32) -> Self {
        Self { breakpoint }
    }

    fn is_drawer(&self, viewport_width: f32) -> bool {
        viewport_width < self.breakpoint
    }

    pub fn is_open(list: &impl ClassList) -> bool {
        list.contains(SIDEBAR_OPEN_CLASS)
    }

    /// Flip both drawer classes; wide viewports are left alone
    pub fn toggle(&self, list: &mut impl ClassList, viewport_width: f32) {
        if !self.is_drawer(viewport_width) {
            return;
        }
        list.toggle(SIDEBAR_CLOSED_CLASS);
        list.toggle(SIDEBAR_OPEN_CLASS);
    }

    pub fn close(&self, list: &mut impl ClassList) {
        if Self::is_open(list) {
            list.remove(SIDEBAR_OPEN_CLASS);
            list.add(SIDEBAR_CLOSED_CLASS);
        }
    }

    pub fn on_link_click(&self, list: &mut impl ClassList, viewport_width: f32) {
        if self.is_drawer(viewport_width) {
            self.close(list);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavBar {
    pub threshold: f32,
    pub class: String,
}

impl NavBar {
    pub fn new(threshold: f32, class: impl Into<String>) -> Self {
        Self {
            threshold,
            class: class.into(),
        }
    }

    pub fn is_solid(&self, scroll_y: f32) -> bool {
        scroll_y > self.threshold
    }

    pub fn on_scroll(&self, list: &mut impl ClassList, scroll_y: f32) {
        if self.is_solid(scroll_y) {
            list.add(&self.class);
        } else {
            list.remove(&self.class);
        }
    }
}

/// Endless horizontal scroll over a track holding its items twice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carousel {
    pub speed: f32,
    amount: f32,
}

impl Carousel {
    pub fn new(speed: f32) -> Self {
        Self { speed, amount: 0.0 }
    }

    /// Advance one frame and return the scroll offset to apply
    pub fn step(&mut self, scroll_width: f32) -> f32 {
        self.amount += self.speed;
        let offset = self.amount;
        if self.amount >= scroll_width / 2.0 {
            self.amount = 0.0;
        }
        offset
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed() -> BTreeSet<String> {
        BTreeSet::from([SIDEBAR_CLOSED_CLASS.to_string()])
    }

    #[test]
    fn test_sidebar_toggle_on_small_viewport() {
        let sidebar = Sidebar::new(768.0);
        let mut list = closed();
        sidebar.toggle(&mut list, 500.0);
        assert!(Sidebar::is_open(&list));
        assert!(!list.contains(SIDEBAR_CLOSED_CLASS));
        sidebar.toggle(&mut list, 500.0);
        assert_eq!(list, closed());
    }

    #[test]
    fn test_sidebar_ignores_wide_viewport() {
        let sidebar = Sidebar::new(768.0);
        let mut list = closed();
        sidebar.toggle(&mut list, 768.0);
        assert_eq!(list, closed());
    }

    #[test]
    fn test_link_click_closes_open_drawer() {
        let sidebar = Sidebar::new(768.0);
        let mut list = closed();
        sidebar.toggle(&mut list, 400.0);
        sidebar.on_link_click(&mut list, 1024.0);
        assert!(Sidebar::is_open(&list));
        sidebar.on_link_click(&mut list, 400.0);
        assert_eq!(list, closed());

        // closing an already closed drawer changes nothing
        sidebar.close(&mut list);
        assert_eq!(list, closed());
    }

    #[test]
    fn test_nav_background_threshold() {
        let nav = NavBar::new(100.0, "bg-[#0E0E0E]");
        let mut list = BTreeSet::new();
        nav.on_scroll(&mut list, 100.0);
        assert!(list.is_empty());
        nav.on_scroll(&mut list, 101.0);
        assert!(list.contains("bg-[#0E0E0E]"));
        nav.on_scroll(&mut list, 0.0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_carousel_wraps_at_half_width() {
        let mut carousel = Carousel::new(2.0);
        assert_eq!(carousel.step(10.0), 2.0);
        assert_eq!(carousel.step(10.0), 4.0);
        assert_eq!(carousel.step(10.0), 6.0);
        assert_eq!(carousel.amount(), 0.0);
        assert_eq!(carousel.step(10.0), 2.0);
    }
}
