//! Modal-scoped image slider
//!
//! The Slider owns the index state of a fixed ordered image set and
//! normalizes every input modality — buttons, dots, arrow keys, touch
//! swipes — into a single navigation primitive, [`go_to`].
//!
//! Navigation is guarded by a single-flight transition flag: once a move
//! is accepted, every further request is rejected until the transition
//! window elapses (driven through the per-frame [`update`] call). Rejected
//! requests are silent no-ops; an idle input such as "previous" on the
//! first slide is expected, not exceptional.
//!
//! Rendering is a pure function of state: [`view`] derives the track
//! translation, button enablement, active dot, and counter text, and can
//! be called idempotently after every change.
//!
//! [`go_to`]: Slider::go_to
//! [`update`]: Slider::update
//! [`view`]: Slider::view

use std::time::Duration;

use folio_core::events::{event_types, Event, EventData, KeyCode};
use thiserror::Error;

use crate::context::WidgetContext;
use crate::overlay::FullscreenOverlay;
use crate::widget::WidgetId;

/// Reference to one slide's image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef {
    /// Image source path or URL
    pub src: String,
    /// Alternative text
    pub alt: String,
}

impl ImageRef {
    /// Create an image reference
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Slider construction errors
#[derive(Debug, Error)]
pub enum SliderError {
    /// The slide set must contain at least one image
    #[error("slider requires at least one slide")]
    EmptySlideSet,
}

/// Slider configuration
#[derive(Clone, Copy, Debug)]
pub struct SliderConfig {
    /// Length of the transition window during which navigation is locked
    pub transition: Duration,
    /// Minimum horizontal travel for a touch gesture to count as a swipe
    pub swipe_threshold: f32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(500),
            swipe_threshold: 50.0,
        }
    }
}

impl SliderConfig {
    /// Create a new config with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transition window
    pub fn transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    /// Set the swipe threshold
    pub fn swipe_threshold(mut self, threshold: f32) -> Self {
        self.swipe_threshold = threshold;
        self
    }
}

/// In-flight touch coordinates
///
/// `start_x` is written on touch-start, `end_x` on every touch-move; both
/// are zeroed after each touch-end resolves, whatever the outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureSample {
    pub start_x: f32,
    pub end_x: f32,
}

/// Slider state stored in the [`WidgetContext`]
pub struct SliderState {
    /// Index of the visible slide
    pub current: usize,
    /// Single-flight transition guard
    pub transitioning: bool,
    /// Seconds left in the transition window
    remaining: f32,
    /// In-flight touch coordinates
    touch: GestureSample,
}

impl SliderState {
    fn new() -> Self {
        Self {
            current: 0,
            transitioning: false,
            remaining: 0.0,
            touch: GestureSample::default(),
        }
    }
}

/// Derived render state, a pure function of [`SliderState`]
#[derive(Clone, Debug, PartialEq)]
pub struct SliderView {
    /// Track translation in percent (`-100 * current`)
    pub track_offset_pct: f32,
    /// Previous button enabled (false exactly at the first slide)
    pub prev_enabled: bool,
    /// Next button enabled (false exactly at the last slide)
    pub next_enabled: bool,
    /// Index of the highlighted dot
    pub active_dot: usize,
    /// Counter text, e.g. "2 / 3"
    pub counter: String,
}

/// Modal-scoped image slider widget
pub struct Slider {
    id: WidgetId,
    config: SliderConfig,
    slides: Vec<ImageRef>,
    on_change: Option<Box<dyn FnMut(usize) + Send>>,
}

impl Slider {
    /// Create a slider with the default config
    pub fn new(ctx: &mut WidgetContext, slides: Vec<ImageRef>) -> Result<Self, SliderError> {
        Self::with_config(ctx, slides, SliderConfig::default())
    }

    /// Create a slider with a custom config
    ///
    /// Registers the keyboard and touch listeners for the slider's
    /// lifetime; [`unmount`] must be called when the hosting modal closes.
    ///
    /// [`unmount`]: Slider::unmount
    pub fn with_config(
        ctx: &mut WidgetContext,
        slides: Vec<ImageRef>,
        config: SliderConfig,
    ) -> Result<Self, SliderError> {
        if slides.is_empty() {
            return Err(SliderError::EmptySlideSet);
        }

        let id = ctx.register_widget();
        ctx.set_widget_state(id, SliderState::new());
        ctx.add_listener(id, event_types::KEY_DOWN);
        ctx.add_listener(id, event_types::TOUCH_START);
        ctx.add_listener(id, event_types::TOUCH_MOVE);
        ctx.add_listener(id, event_types::TOUCH_END);

        Ok(Self {
            id,
            config,
            slides,
            on_change: None,
        })
    }

    /// Get the widget ID
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Number of slides (always ≥ 1)
    pub fn count(&self) -> usize {
        self.slides.len()
    }

    /// The slide set
    pub fn slides(&self) -> &[ImageRef] {
        &self.slides
    }

    /// Set the navigation callback, invoked with each accepted index
    pub fn on_change<F: FnMut(usize) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Index of the visible slide
    pub fn current(&self, ctx: &WidgetContext) -> Option<usize> {
        ctx.get_widget_state::<SliderState>(self.id)
            .map(|s| s.current)
    }

    /// Whether a transition is in flight
    pub fn is_transitioning(&self, ctx: &WidgetContext) -> bool {
        ctx.get_widget_state::<SliderState>(self.id)
            .is_some_and(|s| s.transitioning)
    }

    /// Navigate to a slide by index
    ///
    /// The single navigation primitive every input source maps onto.
    /// Rejects without any state change when the target is out of range,
    /// equal to the current index, or a transition is in flight; the
    /// rejection is silent so concurrent input sources need no external
    /// coordination. Returns true when the move was accepted.
    pub fn go_to(&mut self, ctx: &mut WidgetContext, target: usize) -> bool {
        let count = self.slides.len();
        let accepted = {
            let state = match ctx.get_widget_state_mut::<SliderState>(self.id) {
                Some(s) => s,
                None => return false,
            };
            if target >= count || target == state.current || state.transitioning {
                false
            } else {
                state.current = target;
                state.transitioning = true;
                state.remaining = self.config.transition.as_secs_f32();
                true
            }
        };

        if accepted {
            ctx.mark_dirty(self.id);
            tracing::debug!(target, "slide change accepted");
            if let Some(ref mut callback) = self.on_change {
                callback(target);
            }
        }
        accepted
    }

    /// Navigate to the next slide
    pub fn next(&mut self, ctx: &mut WidgetContext) -> bool {
        let current = match self.current(ctx) {
            Some(c) => c,
            None => return false,
        };
        match current.checked_add(1) {
            Some(target) => self.go_to(ctx, target),
            None => false,
        }
    }

    /// Navigate to the previous slide
    pub fn prev(&mut self, ctx: &mut WidgetContext) -> bool {
        let current = match self.current(ctx) {
            Some(c) => c,
            None => return false,
        };
        match current.checked_sub(1) {
            Some(target) => self.go_to(ctx, target),
            None => false,
        }
    }

    /// Advance the transition window (call each frame)
    ///
    /// The lock release is scheduled at acceptance time; there is no
    /// explicit unlock call and an in-flight transition cannot be
    /// interrupted.
    pub fn update(&self, ctx: &mut WidgetContext, dt: f32) {
        if let Some(state) = ctx.get_widget_state_mut::<SliderState>(self.id) {
            if state.transitioning {
                state.remaining -= dt;
                if state.remaining <= 0.0 {
                    state.remaining = 0.0;
                    state.transitioning = false;
                }
            }
        }
    }

    /// Handle a routed event
    ///
    /// Normalizes arrow keys and touch gestures into the navigation
    /// primitive; no input source mutates state directly.
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &Event) {
        match (event.event_type, &event.data) {
            (event_types::KEY_DOWN, EventData::Key { key, .. }) => match *key {
                KeyCode::LEFT => {
                    self.prev(ctx);
                }
                KeyCode::RIGHT => {
                    self.next(ctx);
                }
                _ => {}
            },
            (event_types::TOUCH_START, EventData::Touch { x, .. }) => {
                if let Some(state) = ctx.get_widget_state_mut::<SliderState>(self.id) {
                    state.touch.start_x = *x;
                }
            }
            (event_types::TOUCH_MOVE, EventData::Touch { x, .. }) => {
                if let Some(state) = ctx.get_widget_state_mut::<SliderState>(self.id) {
                    state.touch.end_x = *x;
                }
            }
            (event_types::TOUCH_END, _) => {
                self.resolve_swipe(ctx);
            }
            _ => {}
        }
    }

    /// Resolve the recorded gesture on touch-end
    ///
    /// Coordinates are reset before navigating so a re-entrant touch can
    /// never observe a stale sample.
    fn resolve_swipe(&mut self, ctx: &mut WidgetContext) {
        let diff = {
            let state = match ctx.get_widget_state_mut::<SliderState>(self.id) {
                Some(s) => s,
                None => return,
            };
            let diff = state.touch.start_x - state.touch.end_x;
            state.touch = GestureSample::default();
            diff
        };

        if diff.abs() > self.config.swipe_threshold {
            if diff > 0.0 {
                // Swipe left - next
                self.next(ctx);
            } else {
                // Swipe right - previous
                self.prev(ctx);
            }
        }
    }

    /// Derive the render state for the current index
    pub fn view(&self, ctx: &WidgetContext) -> Option<SliderView> {
        let state = ctx.get_widget_state::<SliderState>(self.id)?;
        let count = self.slides.len();
        Some(SliderView {
            track_offset_pct: -(state.current as f32) * 100.0,
            prev_enabled: state.current > 0,
            next_enabled: state.current < count - 1,
            active_dot: state.current,
            counter: format!("{} / {}", state.current + 1, count),
        })
    }

    /// Open a fullscreen overlay for the visible slide
    pub fn open_fullscreen(&self, ctx: &mut WidgetContext) -> Option<FullscreenOverlay> {
        let current = self.current(ctx)?;
        let image = self.slides.get(current)?.clone();
        Some(FullscreenOverlay::open(ctx, image))
    }

    /// Detach all listeners and drop the slider's state
    ///
    /// Must be called when the hosting modal closes; a missed unmount
    /// would leak one keyboard listener per opened-and-closed modal.
    pub fn unmount(&mut self, ctx: &mut WidgetContext) {
        ctx.remove_listener(self.id, event_types::KEY_DOWN);
        ctx.remove_listener(self.id, event_types::TOUCH_START);
        ctx.remove_listener(self.id, event_types::TOUCH_MOVE);
        ctx.remove_listener(self.id, event_types::TOUCH_END);
        ctx.unregister_widget(self.id);
    }
}

/// Create a slider builder
pub fn slider(slides: Vec<ImageRef>) -> SliderBuilder {
    SliderBuilder {
        slides,
        config: SliderConfig::default(),
        on_change: None,
    }
}

/// Builder for creating sliders
pub struct SliderBuilder {
    slides: Vec<ImageRef>,
    config: SliderConfig,
    on_change: Option<Box<dyn FnMut(usize) + Send>>,
}

impl SliderBuilder {
    /// Set the transition window
    pub fn transition(mut self, transition: Duration) -> Self {
        self.config.transition = transition;
        self
    }

    /// Set the swipe threshold
    pub fn swipe_threshold(mut self, threshold: f32) -> Self {
        self.config.swipe_threshold = threshold;
        self
    }

    /// Set the navigation callback
    pub fn on_change<F: FnMut(usize) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Build the slider widget
    pub fn build(self, ctx: &mut WidgetContext) -> Result<Slider, SliderError> {
        let mut slider = Slider::with_config(ctx, self.slides, self.config)?;
        slider.on_change = self.on_change;
        Ok(slider)
    }
}
