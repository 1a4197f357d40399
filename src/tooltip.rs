//! Help tooltips: placement geometry, hover/dismiss state and the table that
//! maps UI elements to their help topics.
//!
//! Coordinates are in whatever unit the surface uses (pixels in a browser,
//! character cells in a terminal). One `TooltipManager` lives for one popup
//! session.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Gap between the anchor and the tooltip box
const GAP: f64 = 10.0;
/// Minimum distance kept from the viewport edges when clamping
const EDGE_MARGIN: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Side of the anchor the tooltip sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    fn opposite(&self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Arrow on the tooltip, pointing back at the anchor
    pub fn arrow(&self) -> Arrow {
        match self {
            Side::Left => Arrow::Right,
            Side::Right => Arrow::Left,
            Side::Top => Arrow::Down,
            Side::Bottom => Arrow::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

impl Arrow {
    pub fn class(&self) -> &'static str {
        match self {
            Arrow::Left => "arrow-left",
            Arrow::Right => "arrow-right",
            Arrow::Up => "arrow-up",
            Arrow::Down => "arrow-down",
        }
    }
}

/// Where a tooltip box ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub side: Side,
    pub arrow: Arrow,
}

/// Positions a `width` x `height` box next to `anchor`.
///
/// The box goes on the `preferred` side. If that would push it past the
/// viewport edge on that side it flips to the opposite side. Finally the box is
/// clamped into the viewport along both axes.
pub fn place(anchor: Rect, width: f64, height: f64, viewport: Viewport, preferred: Side) -> Placement {
    let side = if overflows(anchor, width, height, viewport, preferred) {
        preferred.opposite()
    } else {
        preferred
    };

    let (left, top) = raw_position(anchor, width, height, side);
    Placement {
        left: clamp(left, viewport.width - width),
        top: clamp(top, viewport.height - height),
        side,
        arrow: side.arrow(),
    }
}

fn raw_position(anchor: Rect, width: f64, height: f64, side: Side) -> (f64, f64) {
    let centered_top = anchor.top + anchor.height / 2.0 - height / 2.0;
    let centered_left = anchor.left + anchor.width / 2.0 - width / 2.0;
    match side {
        Side::Left => (anchor.left - width - GAP, centered_top),
        Side::Right => (anchor.right() + GAP, centered_top),
        Side::Top => (centered_left, anchor.top - height - GAP),
        Side::Bottom => (centered_left, anchor.bottom() + GAP),
    }
}

fn overflows(anchor: Rect, width: f64, height: f64, viewport: Viewport, side: Side) -> bool {
    let (left, top) = raw_position(anchor, width, height, side);
    match side {
        Side::Left => left < 0.0,
        Side::Right => left + width > viewport.width,
        Side::Top => top < 0.0,
        Side::Bottom => top + height > viewport.height,
    }
}

/// Keeps a coordinate within [EDGE_MARGIN, max - EDGE_MARGIN], preferring the
/// start edge when the box is larger than the viewport
fn clamp(value: f64, max: f64) -> f64 {
    value.min(max - EDGE_MARGIN).max(EDGE_MARGIN)
}

/// Behaviour shared by every tooltip of a manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipStyle {
    pub preferred_side: Side,
    /// Delay before hiding once the pointer has left both icon and tooltip
    pub hide_delay: Duration,
}

impl TooltipStyle {
    /// Info icons: tooltip to the left of the icon
    pub fn info() -> Self {
        Self {
            preferred_side: Side::Left,
            hide_delay: Duration::from_millis(100),
        }
    }

    /// Explanations for disabled buttons: tooltip above the button
    pub fn disabled_button() -> Self {
        Self {
            preferred_side: Side::Top,
            hide_delay: Duration::from_millis(100),
        }
    }
}

/// Input events a tooltip reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipEvent {
    IconEnter,
    IconLeave,
    ContentEnter,
    ContentLeave,
    IconClick,
    OutsideClick,
    Escape,
}

#[derive(Debug, Clone)]
struct Tooltip {
    topic: &'static str,
    anchor: Rect,
    width: f64,
    height: f64,
    hovering_icon: bool,
    hovering_content: bool,
    visible: bool,
    hide_at: Option<Instant>,
    placement: Option<Placement>,
}

/// Owns the tooltips of one popup session
#[derive(Debug)]
pub struct TooltipManager {
    style: TooltipStyle,
    viewport: Viewport,
    tooltips: HashMap<String, Tooltip>,
    /// Element ids that already have a tooltip attached
    processed: HashSet<String>,
}

impl TooltipManager {
    pub fn new(style: TooltipStyle, viewport: Viewport) -> Self {
        Self {
            style,
            viewport,
            tooltips: HashMap::new(),
            processed: HashSet::new(),
        }
    }

    /// Attaches a tooltip to an element. Returns false, changing nothing, when
    /// the element was already set up.
    pub fn bind(
        &mut self,
        element_id: &str,
        topic: &'static str,
        anchor: Rect,
        width: f64,
        height: f64,
    ) -> bool {
        if !self.processed.insert(element_id.to_string()) {
            return false;
        }
        self.tooltips.insert(
            element_id.to_string(),
            Tooltip {
                topic,
                anchor,
                width,
                height,
                hovering_icon: false,
                hovering_content: false,
                visible: false,
                hide_at: None,
                placement: None,
            },
        );
        true
    }

    pub fn is_bound(&self, element_id: &str) -> bool {
        self.processed.contains(element_id)
    }

    /// Help topics of every bound element, sorted by element id
    pub fn bound_topics(&self) -> Vec<(&str, &'static str)> {
        let mut topics = self
            .tooltips
            .iter()
            .map(|(id, tooltip)| (id.as_str(), tooltip.topic))
            .collect::<Vec<_>>();
        topics.sort();
        topics
    }

    pub fn is_visible(&self, element_id: &str) -> bool {
        self.tooltips.get(element_id).is_some_and(|t| t.visible)
    }

    pub fn placement(&self, element_id: &str) -> Option<Placement> {
        self.tooltips
            .get(element_id)
            .filter(|t| t.visible)
            .and_then(|t| t.placement)
    }

    /// Applies one input event at time `now`
    pub fn handle(&mut self, element_id: &str, event: TooltipEvent, now: Instant) {
        match event {
            TooltipEvent::OutsideClick | TooltipEvent::Escape => {
                self.hide_all();
                return;
            }
            TooltipEvent::IconClick => {
                // Only one tooltip is open at a time
                for (id, tooltip) in self.tooltips.iter_mut() {
                    if id != element_id {
                        hide(tooltip);
                    }
                }
            }
            _ => {}
        }

        let (style, viewport) = (self.style, self.viewport);
        let Some(tooltip) = self.tooltips.get_mut(element_id) else {
            ::log::debug!("No tooltip bound to {}", element_id);
            return;
        };

        match event {
            TooltipEvent::IconEnter => tooltip.hovering_icon = true,
            TooltipEvent::IconLeave => tooltip.hovering_icon = false,
            TooltipEvent::ContentEnter => tooltip.hovering_content = true,
            TooltipEvent::ContentLeave => tooltip.hovering_content = false,
            TooltipEvent::IconClick => {
                if tooltip.visible {
                    hide(tooltip);
                    return;
                }
            }
            TooltipEvent::OutsideClick | TooltipEvent::Escape => {}
        }

        let wants_open = tooltip.hovering_icon
            || tooltip.hovering_content
            || event == TooltipEvent::IconClick;
        if wants_open {
            tooltip.hide_at = None;
            if !tooltip.visible {
                tooltip.visible = true;
                reposition(tooltip, viewport, style.preferred_side);
            }
        } else if tooltip.visible {
            tooltip.hide_at = Some(now + style.hide_delay);
        }
    }

    /// Hides tooltips whose grace delay has run out
    pub fn tick(&mut self, now: Instant) {
        for tooltip in self.tooltips.values_mut() {
            let expired = tooltip.hide_at.is_some_and(|at| now >= at);
            if expired && !tooltip.hovering_icon && !tooltip.hovering_content {
                hide(tooltip);
            }
        }
    }

    /// The anchor of an element moved (scroll); visible tooltips follow it
    pub fn move_anchor(&mut self, element_id: &str, anchor: Rect) {
        let (viewport, side) = (self.viewport, self.style.preferred_side);
        if let Some(tooltip) = self.tooltips.get_mut(element_id) {
            tooltip.anchor = anchor;
            if tooltip.visible {
                reposition(tooltip, viewport, side);
            }
        }
    }

    /// The viewport changed size; visible tooltips are placed again
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let side = self.style.preferred_side;
        for tooltip in self.tooltips.values_mut().filter(|t| t.visible) {
            reposition(tooltip, viewport, side);
        }
    }

    pub fn hide_all(&mut self) {
        self.tooltips.values_mut().for_each(hide);
    }
}

fn reposition(tooltip: &mut Tooltip, viewport: Viewport, side: Side) {
    tooltip.placement = Some(place(
        tooltip.anchor,
        tooltip.width,
        tooltip.height,
        viewport,
        side,
    ));
}

fn hide(tooltip: &mut Tooltip) {
    tooltip.visible = false;
    tooltip.hovering_icon = false;
    tooltip.hovering_content = false;
    tooltip.hide_at = None;
    tooltip.placement = None;
}

/// Which help topic each UI element explains
pub const TOOLTIP_BINDINGS: &[(&str, &str)] = &[
    ("overview-title", "title"),
    ("overview-description", "description"),
    ("overview-canonical", "canonical"),
    ("overview-robots", "robots"),
    ("overview-lang", "lang"),
    ("headings-h1", "h1"),
    ("headings-structure", "heading-structure"),
    ("images-missing-alt", "alt-text"),
    ("links-internal", "internal-links"),
    ("links-external", "external-links"),
    ("links-unique", "unique-links"),
    ("social-og", "open-graph"),
    ("social-twitter", "twitter-card"),
    ("schema-groups", "structured-data"),
    ("export-disabled", "export-disabled"),
];

/// Help text for a topic
pub fn help_text(topic: &str) -> Option<&'static str> {
    let text = match topic {
        "title" => "Shown as the clickable headline in search results. Aim for 50-60 characters.",
        "description" => "Often used as the search result snippet. Aim for 120-160 characters.",
        "canonical" => "Tells search engines which URL is the preferred version of this page.",
        "robots" => "Indexing directives for crawlers, e.g. noindex or nofollow.",
        "lang" => "Declared page language, used for language targeting.",
        "h1" => "A page should normally have exactly one H1 describing its main topic.",
        "heading-structure" => "Headings should descend without skipping levels.",
        "alt-text" => "Images without alt text are invisible to screen readers and image search.",
        "internal-links" => "Links that stay on this site, including relative links.",
        "external-links" => "Links to social networks, phone numbers and listed external services.",
        "unique-links" => "Links counted once per distinct href.",
        "open-graph" => "Open Graph tags control link previews on Facebook, LinkedIn and others.",
        "twitter-card" => "X/Twitter card tags control link previews on X.",
        "structured-data" => "Schema.org data that can enable rich results in search.",
        "export-disabled" => "Nothing to export: the filter matches no records.",
        _ => return None,
    };
    Some(text)
}

/// Help topic for an element id, from the binding table
pub fn topic_for(element_id: &str) -> Option<&'static str> {
    TOOLTIP_BINDINGS
        .iter()
        .find(|(id, _)| *id == element_id)
        .map(|(_, topic)| *topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 400.0,
        height: 600.0,
    };

    fn manager() -> TooltipManager {
        TooltipManager::new(TooltipStyle::info(), VIEWPORT)
    }

    #[test]
    fn test_default_left_with_right_arrow() {
        let placement = place(Rect::new(300.0, 100.0, 16.0, 16.0), 200.0, 50.0, VIEWPORT, Side::Left);
        assert_eq!(placement.side, Side::Left);
        assert_eq!(placement.arrow.class(), "arrow-right");
        assert_eq!(placement.left, 90.0);
        assert_eq!(placement.top, 83.0);
    }

    #[test]
    fn test_flips_right_when_left_edge_negative() {
        let icon = Rect::new(50.0, 100.0, 16.0, 16.0);
        let placement = place(icon, 200.0, 50.0, VIEWPORT, Side::Left);
        assert_eq!(placement.side, Side::Right);
        assert_ne!(placement.arrow.class(), "arrow-right");
        assert_eq!(placement.arrow.class(), "arrow-left");
        assert_eq!(placement.left, icon.right() + GAP);
        assert!(placement.left > icon.right());
    }

    #[test]
    fn test_four_directions_and_clamping() {
        let button = Rect::new(10.0, 10.0, 80.0, 30.0);

        // No room above: flips below
        let placement = place(button, 120.0, 40.0, VIEWPORT, Side::Top);
        assert_eq!(placement.side, Side::Bottom);
        assert_eq!(placement.arrow, Arrow::Up);
        assert_eq!(placement.top, button.bottom() + GAP);
        // Centered left would be -10, clamped to the margin
        assert_eq!(placement.left, EDGE_MARGIN);

        let low = Rect::new(150.0, 580.0, 80.0, 20.0);
        let placement = place(low, 120.0, 40.0, VIEWPORT, Side::Bottom);
        assert_eq!(placement.side, Side::Top);
        assert_eq!(placement.arrow, Arrow::Down);
    }

    #[test]
    fn test_hover_grace_delay() {
        let mut tooltips = manager();
        let start = Instant::now();
        assert!(tooltips.bind("headings-h1", "h1", Rect::new(300.0, 50.0, 16.0, 16.0), 200.0, 40.0));

        tooltips.handle("headings-h1", TooltipEvent::IconEnter, start);
        assert!(tooltips.is_visible("headings-h1"));

        // Cursor travels from icon to tooltip within the grace period
        tooltips.handle("headings-h1", TooltipEvent::IconLeave, start);
        tooltips.tick(start + Duration::from_millis(50));
        assert!(tooltips.is_visible("headings-h1"));
        tooltips.handle("headings-h1", TooltipEvent::ContentEnter, start + Duration::from_millis(60));
        tooltips.tick(start + Duration::from_millis(500));
        assert!(tooltips.is_visible("headings-h1"));

        // Leaving both hides after the delay
        let left_at = start + Duration::from_millis(600);
        tooltips.handle("headings-h1", TooltipEvent::ContentLeave, left_at);
        tooltips.tick(left_at + Duration::from_millis(99));
        assert!(tooltips.is_visible("headings-h1"));
        tooltips.tick(left_at + Duration::from_millis(100));
        assert!(!tooltips.is_visible("headings-h1"));
    }

    #[test]
    fn test_click_toggle_escape_and_outside_click() {
        let mut tooltips = manager();
        let now = Instant::now();
        tooltips.bind("a", "title", Rect::new(300.0, 50.0, 16.0, 16.0), 100.0, 40.0);
        tooltips.bind("b", "lang", Rect::new(300.0, 150.0, 16.0, 16.0), 100.0, 40.0);

        tooltips.handle("a", TooltipEvent::IconClick, now);
        assert!(tooltips.is_visible("a"));
        tooltips.handle("b", TooltipEvent::IconClick, now);
        assert!(!tooltips.is_visible("a"));
        assert!(tooltips.is_visible("b"));
        tooltips.handle("b", TooltipEvent::IconClick, now);
        assert!(!tooltips.is_visible("b"));

        tooltips.handle("a", TooltipEvent::IconClick, now);
        tooltips.handle("a", TooltipEvent::Escape, now);
        assert!(!tooltips.is_visible("a"));

        tooltips.handle("a", TooltipEvent::IconEnter, now);
        tooltips.handle("", TooltipEvent::OutsideClick, now);
        assert!(!tooltips.is_visible("a"));
    }

    #[test]
    fn test_bind_is_idempotent() {
        let mut tooltips = manager();
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(tooltips.bind("x", "title", rect, 10.0, 10.0));
        assert!(!tooltips.bind("x", "lang", rect, 10.0, 10.0));
        assert_eq!(tooltips.bound_topics(), vec![("x", "title")]);
    }

    #[test]
    fn test_reposition_on_scroll_and_resize() {
        let mut tooltips = manager();
        let now = Instant::now();
        tooltips.bind("a", "title", Rect::new(300.0, 100.0, 16.0, 16.0), 200.0, 40.0);
        tooltips.handle("a", TooltipEvent::IconEnter, now);
        assert_eq!(tooltips.placement("a").unwrap().side, Side::Left);

        tooltips.move_anchor("a", Rect::new(300.0, 40.0, 16.0, 16.0));
        assert_eq!(tooltips.placement("a").unwrap().top, 28.0);

        tooltips.move_anchor("a", Rect::new(100.0, 40.0, 16.0, 16.0));
        assert_eq!(tooltips.placement("a").unwrap().side, Side::Right);

        tooltips.resize(Viewport {
            width: 800.0,
            height: 600.0,
        });
        assert!(tooltips.placement("a").is_some());
    }

    #[test]
    fn test_binding_table_has_help() {
        for (element_id, topic) in TOOLTIP_BINDINGS {
            assert!(help_text(topic).is_some(), "no help for {element_id}");
        }
        assert_eq!(topic_for("headings-h1"), Some("h1"));
        assert_eq!(topic_for("nope"), None);
    }
}
