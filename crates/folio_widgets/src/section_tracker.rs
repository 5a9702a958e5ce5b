//! Scroll-driven active-section tracking
//!
//! The SectionTracker observes a scrollable container and an ordered list
//! of section regions, decides which single section is "active", and
//! publishes changes to any number of subscribers (nav links, tab bars).
//!
//! The decision is probe-based: a synthetic coordinate
//! `scroll_top + probe_offset` is tested against each section's span in
//! document order, first match wins. Two boundary snaps override the scan
//! so the first and last sections are always reachable: near the top the
//! first section is forced, near the bottom the last.
//!
//! Subscribers are notified only when the active section changes, never on
//! a redundant evaluation. "No active section" is published as an explicit
//! `None`.

use folio_core::events::{event_types, Event, EventData};

use crate::context::WidgetContext;
use crate::widget::WidgetId;

/// One vertically-stacked content region
///
/// `top` is measured relative to the observed container's own top, not the
/// document.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// Stable identifier published to subscribers
    pub id: String,
    /// Offset of the section's top edge within the container
    pub top: f32,
    /// Height of the section's span
    pub height: f32,
}

impl Section {
    /// Create a section
    pub fn new(id: impl Into<String>, top: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    fn contains(&self, probe: f32) -> bool {
        probe >= self.top && probe < self.top + self.height
    }
}

/// Section tracker configuration
///
/// The defaults reproduce the thresholds the design was measured with;
/// they are configuration, not derived quantities.
#[derive(Clone, Copy, Debug)]
pub struct SectionTrackerConfig {
    /// Offset added to the scroll position to form the probe coordinate
    pub probe_offset: f32,
    /// Below this scroll position the first section is forced active
    pub top_snap: f32,
    /// Within this distance of the scrollable bottom the last section is
    /// forced active
    pub bottom_snap: f32,
}

impl Default for SectionTrackerConfig {
    fn default() -> Self {
        Self {
            probe_offset: 100.0,
            top_snap: 50.0,
            bottom_snap: 50.0,
        }
    }
}

impl SectionTrackerConfig {
    /// Create a new config with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probe offset
    pub fn probe_offset(mut self, offset: f32) -> Self {
        self.probe_offset = offset;
        self
    }

    /// Set the top snap threshold
    pub fn top_snap(mut self, snap: f32) -> Self {
        self.top_snap = snap;
        self
    }

    /// Set the bottom snap threshold
    pub fn bottom_snap(mut self, snap: f32) -> Self {
        self.bottom_snap = snap;
        self
    }
}

/// Tracker state stored in the [`WidgetContext`]
///
/// `active` is `None` while no section has been determined (Idle) and
/// `Some(index)` once tracking. Mutated only by evaluation.
pub struct SectionTrackerState {
    /// Index of the active section, if any
    pub active: Option<usize>,
    /// Last observed scroll offset of the container
    pub scroll_top: f32,
    /// Last observed visible height of the container
    pub viewport_height: f32,
}

/// Subscriber callback, invoked with the new active section's id
pub type SectionSubscriber = Box<dyn FnMut(Option<&str>) + Send>;

/// Scroll-driven active-section tracker
pub struct SectionTracker {
    id: WidgetId,
    config: SectionTrackerConfig,
    sections: Vec<Section>,
    subscribers: Vec<SectionSubscriber>,
}

impl SectionTracker {
    /// Create a tracker with default thresholds
    pub fn new(ctx: &mut WidgetContext, sections: Vec<Section>) -> Self {
        Self::with_config(ctx, sections, SectionTrackerConfig::default())
    }

    /// Create a tracker with custom thresholds
    ///
    /// The tracker registers for document-level scroll and resize events
    /// and evaluates once immediately, so subscribers attached afterwards
    /// see only subsequent changes. It lives until [`unmount`] is called.
    ///
    /// [`unmount`]: SectionTracker::unmount
    pub fn with_config(
        ctx: &mut WidgetContext,
        sections: Vec<Section>,
        config: SectionTrackerConfig,
    ) -> Self {
        let id = ctx.register_widget();
        ctx.set_widget_state(
            id,
            SectionTrackerState {
                active: None,
                scroll_top: 0.0,
                viewport_height: 0.0,
            },
        );
        ctx.add_listener(id, event_types::SCROLL);
        ctx.add_listener(id, event_types::RESIZE);

        let mut tracker = Self {
            id,
            config,
            sections,
            subscribers: Vec::new(),
        };
        tracker.evaluate(ctx, 0.0, 0.0);
        tracker
    }

    /// Get the widget ID
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Subscribe to active-section changes
    ///
    /// The tracker already evaluated at construction, before any
    /// subscriber could attach, so the current value is published to the
    /// new subscriber immediately; afterwards it only hears changes. A nav
    /// highlight is therefore correct from the moment it is wired up.
    pub fn on_change<F: FnMut(Option<&str>) + Send + 'static>(
        &mut self,
        ctx: &WidgetContext,
        subscriber: F,
    ) {
        let mut subscriber: SectionSubscriber = Box::new(subscriber);
        subscriber(self.active_id(ctx));
        self.subscribers.push(subscriber);
    }

    /// Index of the currently active section, if any
    pub fn active(&self, ctx: &WidgetContext) -> Option<usize> {
        ctx.get_widget_state::<SectionTrackerState>(self.id)?.active
    }

    /// Identifier of the currently active section, if any
    pub fn active_id(&self, ctx: &WidgetContext) -> Option<&str> {
        let index = self.active(ctx)?;
        self.sections.get(index).map(|s| s.id.as_str())
    }

    /// Replace the observed geometry (e.g. after relayout) and re-evaluate
    pub fn set_sections(&mut self, ctx: &mut WidgetContext, sections: Vec<Section>) {
        self.sections = sections;
        let (scroll_top, viewport) = match ctx.get_widget_state::<SectionTrackerState>(self.id) {
            Some(s) => (s.scroll_top, s.viewport_height),
            None => return,
        };
        self.evaluate(ctx, scroll_top, viewport);
    }

    /// Handle a routed event
    ///
    /// Normalizes scroll and resize into [`evaluate`]; everything else is
    /// ignored.
    ///
    /// [`evaluate`]: SectionTracker::evaluate
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        let (scroll_top, viewport) = match ctx.get_widget_state::<SectionTrackerState>(self.id) {
            Some(s) => (s.scroll_top, s.viewport_height),
            None => return,
        };

        match (event.event_type, &event.data) {
            (event_types::SCROLL, EventData::Scroll { y, .. }) => {
                self.evaluate(ctx, *y, viewport);
            }
            (event_types::RESIZE, EventData::Resize { height, .. }) => {
                self.evaluate(ctx, scroll_top, *height);
            }
            _ => {}
        }
    }

    /// Recompute the active section for the given scroll position
    ///
    /// Publishes to subscribers only when the result differs from the
    /// previous evaluation.
    pub fn evaluate(&mut self, ctx: &mut WidgetContext, scroll_top: f32, viewport_height: f32) {
        let next = self.compute(scroll_top, viewport_height);

        let changed = {
            let state = match ctx.get_widget_state_mut::<SectionTrackerState>(self.id) {
                Some(s) => s,
                None => return,
            };
            state.scroll_top = scroll_top;
            state.viewport_height = viewport_height;
            if state.active == next {
                false
            } else {
                state.active = next;
                true
            }
        };

        if changed {
            ctx.mark_dirty(self.id);
            let id = next.and_then(|i| self.sections.get(i)).map(|s| s.id.as_str());
            tracing::debug!(active = ?id, scroll_top, "active section changed");
            for subscriber in &mut self.subscribers {
                subscriber(id);
            }
        }
    }

    /// Pure scan + overrides, no state touched
    fn compute(&self, scroll_top: f32, viewport_height: f32) -> Option<usize> {
        if self.sections.is_empty() {
            return None;
        }

        let probe = scroll_top + self.config.probe_offset;
        let mut active = self.sections.iter().position(|s| s.contains(probe));

        // Boundary snaps replace the scan result; without them the first
        // and last sections can be unreachable when their span is smaller
        // than the probe offset.
        if scroll_top < self.config.top_snap {
            active = Some(0);
        }
        let total_height = self
            .sections
            .iter()
            .map(|s| s.top + s.height)
            .fold(0.0f32, f32::max);
        if scroll_top + viewport_height >= total_height - self.config.bottom_snap {
            active = Some(self.sections.len() - 1);
        }

        active
    }

    /// Detach the scroll/resize listeners and unregister the widget
    pub fn unmount(&mut self, ctx: &mut WidgetContext) {
        ctx.remove_listener(self.id, event_types::SCROLL);
        ctx.remove_listener(self.id, event_types::RESIZE);
        ctx.unregister_widget(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn two_sections() -> Vec<Section> {
        vec![
            Section::new("a", 0.0, 500.0),
            Section::new("b", 500.0, 500.0),
        ]
    }

    #[test]
    fn test_top_snap_forces_first_section() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, two_sections());

        tracker.evaluate(&mut ctx, 0.0, 800.0);
        assert_eq!(tracker.active_id(&ctx), Some("a"));
    }

    #[test]
    fn test_probe_selects_containing_section() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, two_sections());

        // probe = 420 + 100 = 520, inside b's span [500, 1000)
        tracker.evaluate(&mut ctx, 420.0, 200.0);
        assert_eq!(tracker.active_id(&ctx), Some("b"));
    }

    #[test]
    fn test_bottom_snap_forces_last_section() {
        let mut ctx = WidgetContext::new();
        let sections = vec![
            Section::new("a", 0.0, 500.0),
            Section::new("b", 500.0, 500.0),
            Section::new("c", 1000.0, 40.0),
        ];
        let mut tracker = SectionTracker::new(&mut ctx, sections);

        // Probe at 700 + 100 lands in b, but the viewport bottom is within
        // 50 of the total height (1040), so the last section wins.
        tracker.evaluate(&mut ctx, 700.0, 300.0);
        assert_eq!(tracker.active_id(&ctx), Some("c"));
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let mut ctx = WidgetContext::new();
        // Overlapping spans: both contain probe 600
        let sections = vec![
            Section::new("first", 0.0, 1000.0),
            Section::new("second", 500.0, 1000.0),
        ];
        let mut tracker = SectionTracker::new(&mut ctx, sections);

        tracker.evaluate(&mut ctx, 500.0, 100.0);
        assert_eq!(tracker.active_id(&ctx), Some("first"));
    }

    #[test]
    fn test_empty_sections_yield_none() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, Vec::new());

        tracker.evaluate(&mut ctx, 300.0, 800.0);
        assert_eq!(tracker.active(&ctx), None);
        assert_eq!(tracker.active_id(&ctx), None);
    }

    #[test]
    fn test_subscribers_notified_only_on_change() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, two_sections());

        let notifications = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&notifications);
        tracker.on_change(&ctx, move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });

        // Attaching published the current value once; evaluations that
        // stay on "a" add nothing.
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
        tracker.evaluate(&mut ctx, 0.0, 800.0);
        tracker.evaluate(&mut ctx, 10.0, 800.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);

        // Change to "b" notifies once.
        tracker.evaluate(&mut ctx, 420.0, 200.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 2);

        // Redundant evaluation stays silent.
        tracker.evaluate(&mut ctx, 430.0, 200.0);
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscriber_receives_section_id() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, two_sections());

        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tracker.on_change(&ctx, move |id| {
            sink.lock().unwrap().push(id.map(String::from));
        });

        tracker.evaluate(&mut ctx, 420.0, 200.0);
        tracker.evaluate(&mut ctx, 0.0, 200.0);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                Some("a".to_string()),
                Some("b".to_string()),
                Some("a".to_string())
            ]
        );
    }

    #[test]
    fn test_attach_publishes_the_current_value() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, two_sections());

        // Construction evaluated to "a" before anyone was listening; a
        // subscriber wired afterwards still hears it right away.
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tracker.on_change(&ctx, move |id| {
            sink.lock().unwrap().push(id.map(String::from));
        });
        assert_eq!(*seen.lock().unwrap(), vec![Some("a".to_string())]);

        // With no sections there is no active section, published as an
        // explicit None.
        let mut empty = SectionTracker::new(&mut ctx, Vec::new());
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        empty.on_change(&ctx, move |id| {
            sink.lock().unwrap().push(id.map(String::from));
        });
        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }

    #[test]
    fn test_scroll_event_normalization() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, two_sections());

        // Establish a viewport via resize, then scroll.
        tracker.handle_event(&mut ctx, &Event::resize(1024.0, 200.0));
        tracker.handle_event(&mut ctx, &Event::scroll(0.0, 420.0));
        assert_eq!(tracker.active_id(&ctx), Some("b"));
    }

    #[test]
    fn test_unmount_detaches_listeners() {
        let mut ctx = WidgetContext::new();
        let mut tracker = SectionTracker::new(&mut ctx, two_sections());

        assert_eq!(ctx.listener_count(event_types::SCROLL), 1);
        assert_eq!(ctx.listener_count(event_types::RESIZE), 1);

        tracker.unmount(&mut ctx);
        assert_eq!(ctx.listener_count(event_types::SCROLL), 0);
        assert_eq!(ctx.listener_count(event_types::RESIZE), 0);
        assert!(!ctx.is_registered(tracker.id()));
    }
}
