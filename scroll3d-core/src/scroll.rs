/// Scroll-linked trigger turning a document scroll offset into element progress
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, map, opt, value, verify},
    number::complete::float,
    sequence::{delimited, pair, separated_pair},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point along an element or the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Fraction of the length (`top` = 0, `center` = 0.5, `bottom` = 1)
    Fraction(f32),
    /// Absolute offset in pixels from the top edge
    Pixels(f32),
}

impl Anchor {
    pub fn offset(&self, length: f32) -> f32 {
        match *self {
            Anchor::Fraction(fraction) => fraction * length,
            Anchor::Pixels(pixels) => pixels,
        }
    }
}

/// Where a trigger boundary sits: an element anchor meeting a viewport anchor.
///
/// Written as `"<element-edge> <viewport-edge>"`: `"top 10%"` is reached when
/// the element's top meets 10% of the viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl ScrollPosition {
    pub fn parse(input: &str) -> Result<Self> {
        match all_consuming(delimited(multispace0, position, multispace0))(input) {
            Ok((_, position)) => Ok(position),
            Err(e) => Err(Error::ScrollPosition {
                input: input.to_string(),
                reason: format!("{e:?}"),
            }),
        }
    }

    /// Scroll offset at which this position is reached
    pub fn resolve(&self, layout: &TriggerLayout) -> f32 {
        layout.element_top + self.element.offset(layout.element_height)
            - self.viewport.offset(layout.viewport_height)
    }
}

fn keyword(input: &str) -> IResult<&str, Anchor> {
    alt((
        value(Anchor::Fraction(0.0), tag("top")),
        value(Anchor::Fraction(0.5), tag("center")),
        value(Anchor::Fraction(1.0), tag("bottom")),
    ))(input)
}

fn measured(input: &str) -> IResult<&str, Anchor> {
    let finite = verify(float, |amount: &f32| amount.is_finite());
    let (input, (amount, unit)) = pair(finite, opt(alt((tag("%"), tag("px")))))(input)?;
    let anchor = match unit {
        Some("%") => Anchor::Fraction(amount / 100.0),
        _ => Anchor::Pixels(amount),
    };
    Ok((input, anchor))
}

fn anchor(input: &str) -> IResult<&str, Anchor> {
    alt((keyword, measured))(input)
}

fn position(input: &str) -> IResult<&str, ScrollPosition> {
    map(separated_pair(anchor, multispace1, anchor), |(element, viewport)| {
        ScrollPosition { element, viewport }
    })(input)
}

/// Geometry of the trigger element, in document pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerLayout {
    /// Distance from the document top to the element's top edge
    pub element_top: f32,
    pub element_height: f32,
    pub viewport_height: f32,
}

/// Serializable trigger definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub id: String,
    /// DOM id of the trigger element
    pub element: String,
    pub start: String,
    pub end: String,
    pub scrub: bool,
    pub pin: bool,
    pub pin_spacing: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            id: "animate-screen".to_string(),
            element: "animate-screen".to_string(),
            start: "top 10%".to_string(),
            end: "bottom 50%".to_string(),
            scrub: true,
            pin: true,
            pin_spacing: false,
        }
    }
}

/// Snapshot handed to observers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerState {
    pub progress: f32,
    pub start: f32,
    pub end: f32,
    pub is_active: bool,
    /// Height given to the pin spacer; `None` when the trigger does not pin
    pub pin_spacer_height: Option<f32>,
}

/// Receives trigger notifications. All methods default to no-ops.
pub trait TriggerObserver {
    fn on_update(&mut self, _state: &TriggerState) {}

    fn on_refresh(&mut self, _state: &TriggerState) {}

    fn on_toggle(&mut self, _state: &TriggerState) {}
}

impl TriggerObserver for () {}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    id: String,
    start_at: ScrollPosition,
    end_at: ScrollPosition,
    pin: bool,
    pin_spacing: bool,
    layout: Option<TriggerLayout>,
    start: f32,
    end: f32,
    scroll: f32,
    progress: f32,
    is_active: bool,
}

impl ScrollTrigger {
    pub fn from_config(config: &TriggerConfig) -> Result<Self> {
        Ok(Self {
            id: config.id.clone(),
            start_at: ScrollPosition::parse(&config.start)?,
            end_at: ScrollPosition::parse(&config.end)?,
            pin: config.pin,
            pin_spacing: config.pin_spacing,
            layout: None,
            start: 0.0,
            end: 0.0,
            scroll: 0.0,
            progress: 0.0,
            is_active: false,
        })
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn state(&self) -> TriggerState {
        TriggerState {
            progress: self.progress,
            start: self.start,
            end: self.end,
            is_active: self.is_active,
            pin_spacer_height: match (self.pin, self.layout) {
                (true, Some(layout)) => Some(if self.pin_spacing {
                    layout.element_height + (self.end - self.start).max(0.0)
                } else {
                    layout.element_height
                }),
                _ => None,
            },
        }
    }

    fn bounds_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    fn progress_at(&self, scroll: f32) -> f32 {
        if !self.bounds_finite() || !scroll.is_finite() {
            return self.progress;
        }
        let range = self.end - self.start;
        if range <= f32::EPSILON {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / range).clamp(0.0, 1.0)
    }

    /// Recompute boundaries from a fresh measurement. With `force`,
    /// observers get an update even if progress did not move.
    pub fn refresh(&mut self, layout: TriggerLayout, force: bool, observer: &mut impl TriggerObserver) {
        self.layout = Some(layout);
        self.start = self.start_at.resolve(&layout);
        self.end = self.end_at.resolve(&layout);

        let state = self.state();
        if let Some(height) = state.pin_spacer_height {
            log::debug!("trigger {}: pin spacer height {height}px", self.id);
        }
        observer.on_refresh(&state);

        let scroll = self.scroll;
        self.apply(scroll, force, observer);
    }

    /// Feed a new document scroll offset
    pub fn update(&mut self, scroll: f32, observer: &mut impl TriggerObserver) {
        if self.layout.is_none() {
            self.scroll = scroll;
            return;
        }
        self.apply(scroll, false, observer);
    }

    fn apply(&mut self, scroll: f32, force: bool, observer: &mut impl TriggerObserver) {
        self.scroll = scroll;
        let progress = self.progress_at(scroll);
        let active = scroll > self.start && scroll < self.end;
        let moved = progress != self.progress;
        let toggled = active != self.is_active;

        self.progress = progress;
        self.is_active = active;

        if toggled {
            observer.on_toggle(&self.state());
        }
        if moved || force {
            observer.on_update(&self.state());
        }
    }

    /// Vertical offset keeping a pinned element in place
    pub fn pin_offset(&self) -> f32 {
        if !self.pin || self.layout.is_none() || !self.bounds_finite() || !self.scroll.is_finite() {
            return 0.0;
        }
        (self.scroll.clamp(self.start, self.end.max(self.start))) - self.start
    }
}
