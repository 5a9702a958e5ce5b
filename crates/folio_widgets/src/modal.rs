//! Project detail modal
//!
//! The modal presents one project's detail content and, when the project
//! carries more than one screenshot, hosts an embedded [`Slider`] for
//! them. A single screenshot is shown as a static image with no slider
//! chrome.
//!
//! # Lifecycle
//!
//! Each open builds a fresh slider, so reopening a project always starts
//! at the first slide. Closing tears down in a fixed order: the embedded
//! slider unmounts first, then the modal's own listeners are removed and
//! the widget unregisters. After a full cycle the listener registry is
//! back to its pre-open state.
//!
//! # Event routing
//!
//! The modal listens for key-down (Escape) and pointer-up (backdrop
//! click). Events it does not consume are forwarded to the embedded
//! slider, so the host only needs to route to the modal.

use folio_core::events::{event_types, Event, EventData, KeyCode};
use folio_core::fsm::StateMachine;

use crate::context::WidgetContext;
use crate::slider::{ImageRef, Slider, SliderConfig};
use crate::widget::WidgetId;

/// Modal lifecycle states and events
pub mod states {
    /// Modal is visible
    pub const OPEN: u32 = 0;
    /// Modal has been dismissed
    pub const CLOSED: u32 = 1;

    /// Dismiss request (custom FSM event)
    pub const CLOSE: u32 = 100;
}

/// Content of one project entry
#[derive(Clone, Debug, Default)]
pub struct ProjectDetail {
    /// Project title
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Technology tags
    pub tags: Vec<String>,
    /// Optional external link
    pub link: Option<String>,
    /// Screenshot set; two or more get a slider
    pub images: Vec<ImageRef>,
}

impl ProjectDetail {
    /// Create a project detail with a title and description
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Add a technology tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the external link
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Add a screenshot
    pub fn image(mut self, image: ImageRef) -> Self {
        self.images.push(image);
        self
    }
}

/// Modal hosting one project's detail view
pub struct ProjectModal {
    id: WidgetId,
    detail: ProjectDetail,
    slider: Option<Slider>,
    on_close: Option<Box<dyn FnMut() + Send>>,
}

impl ProjectModal {
    /// Open a modal for a project with the default slider config
    pub fn open(ctx: &mut WidgetContext, detail: ProjectDetail) -> Self {
        Self::open_with_config(ctx, detail, SliderConfig::default())
    }

    /// Open a modal for a project
    ///
    /// Builds an embedded slider only when the project has at least two
    /// screenshots.
    pub fn open_with_config(
        ctx: &mut WidgetContext,
        detail: ProjectDetail,
        slider_config: SliderConfig,
    ) -> Self {
        let fsm = StateMachine::builder(states::OPEN)
            .on(states::OPEN, states::CLOSE, states::CLOSED)
            .build();
        let id = ctx.register_widget_with_fsm(fsm);
        ctx.add_listener(id, event_types::KEY_DOWN);
        ctx.add_listener(id, event_types::POINTER_UP);

        let slider = if detail.images.len() > 1 {
            // Non-empty by the length check, so construction cannot fail.
            Slider::with_config(ctx, detail.images.clone(), slider_config).ok()
        } else {
            None
        };

        tracing::debug!(?id, title = %detail.title, slides = detail.images.len(), "project modal opened");

        Self {
            id,
            detail,
            slider,
            on_close: None,
        }
    }

    /// Get the widget ID
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The project content
    pub fn detail(&self) -> &ProjectDetail {
        &self.detail
    }

    /// The embedded slider, if the project has multiple screenshots
    pub fn slider(&self) -> Option<&Slider> {
        self.slider.as_ref()
    }

    /// The embedded slider (mutable)
    pub fn slider_mut(&mut self) -> Option<&mut Slider> {
        self.slider.as_mut()
    }

    /// Set the close callback
    pub fn on_close<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Whether the modal is still visible
    pub fn is_open(&self, ctx: &WidgetContext) -> bool {
        ctx.get_fsm_state(self.id) == Some(states::OPEN)
    }

    /// Advance the embedded slider's transition window
    pub fn update(&mut self, ctx: &mut WidgetContext, dt: f32) {
        if let Some(ref slider) = self.slider {
            slider.update(ctx, dt);
        }
    }

    /// Handle a routed event
    ///
    /// Escape and backdrop clicks close the modal; everything else is
    /// forwarded to the embedded slider. An event a surface above the
    /// modal already consumed (a fullscreen overlay swallowing its
    /// dismissing click) is skipped entirely, so hosts must route pointer
    /// events to the topmost surface first.
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &mut Event) {
        if event.propagation_stopped || !self.is_open(ctx) {
            return;
        }

        match (event.event_type, &event.data) {
            (event_types::KEY_DOWN, EventData::Key { key, .. }) if *key == KeyCode::ESCAPE => {
                self.close(ctx);
            }
            (event_types::POINTER_UP, _) => {
                self.close(ctx);
            }
            _ => {
                if let Some(ref mut slider) = self.slider {
                    slider.handle_event(ctx, event);
                }
            }
        }
    }

    /// Dismiss the modal
    ///
    /// The embedded slider unmounts before the modal's own teardown, and
    /// a second close is a no-op.
    pub fn close(&mut self, ctx: &mut WidgetContext) {
        if !ctx.send_fsm_event(self.id, states::CLOSE) {
            return;
        }

        if let Some(mut slider) = self.slider.take() {
            slider.unmount(ctx);
        }
        ctx.remove_listener(self.id, event_types::KEY_DOWN);
        ctx.remove_listener(self.id, event_types::POINTER_UP);
        ctx.unregister_widget(self.id);
        tracing::debug!(id = ?self.id, "project modal closed");

        if let Some(ref mut callback) = self.on_close {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::events::Modifiers;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn gallery_project() -> ProjectDetail {
        ProjectDetail::new("Tracker", "Habit tracking app")
            .tag("rust")
            .image(ImageRef::new("shot_1.png", "Screenshot 1"))
            .image(ImageRef::new("shot_2.png", "Screenshot 2"))
            .image(ImageRef::new("shot_3.png", "Screenshot 3"))
    }

    fn escape() -> Event {
        Event::key(event_types::KEY_DOWN, KeyCode::ESCAPE, Modifiers::none())
    }

    fn arrow_right() -> Event {
        Event::key(event_types::KEY_DOWN, KeyCode::RIGHT, Modifiers::none())
    }

    #[test]
    fn test_multiple_images_get_a_slider() {
        let mut ctx = WidgetContext::new();
        let modal = ProjectModal::open(&mut ctx, gallery_project());

        assert!(modal.slider().is_some());
        assert_eq!(modal.slider().unwrap().count(), 3);
        // Modal and slider each hold a key-down registration.
        assert_eq!(ctx.listener_count(event_types::KEY_DOWN), 2);
    }

    #[test]
    fn test_single_image_gets_no_slider() {
        let mut ctx = WidgetContext::new();
        let detail = ProjectDetail::new("CLI", "Command line tool")
            .image(ImageRef::new("only.png", "The one screenshot"));
        let modal = ProjectModal::open(&mut ctx, detail);

        assert!(modal.slider().is_none());
        assert_eq!(ctx.listener_count(event_types::KEY_DOWN), 1);
    }

    #[test]
    fn test_arrow_keys_reach_the_slider() {
        let mut ctx = WidgetContext::new();
        let mut modal = ProjectModal::open(&mut ctx, gallery_project());

        modal.handle_event(&mut ctx, &mut arrow_right());
        assert_eq!(modal.slider().unwrap().current(&ctx), Some(1));
    }

    #[test]
    fn test_escape_closes_and_tears_down() {
        let mut ctx = WidgetContext::new();
        let closed = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&closed);
        let mut modal = ProjectModal::open(&mut ctx, gallery_project()).on_close(move || {
            count.fetch_add(1, Ordering::SeqCst);
        });

        modal.handle_event(&mut ctx, &mut escape());

        assert!(!modal.is_open(&ctx));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        // Slider and modal listeners are both gone.
        assert_eq!(ctx.listener_count(event_types::KEY_DOWN), 0);
        assert_eq!(ctx.listener_count(event_types::TOUCH_START), 0);
        assert_eq!(ctx.listener_count(event_types::POINTER_UP), 0);
    }

    #[test]
    fn test_backdrop_click_closes() {
        let mut ctx = WidgetContext::new();
        let mut modal = ProjectModal::open(&mut ctx, gallery_project());

        modal.handle_event(&mut ctx, &mut Event::new(event_types::POINTER_UP));
        assert!(!modal.is_open(&ctx));
    }

    #[test]
    fn test_fullscreen_dismiss_click_spares_the_modal() {
        let mut ctx = WidgetContext::new();
        let mut modal = ProjectModal::open(&mut ctx, gallery_project());
        let mut overlay = modal
            .slider()
            .and_then(|s| s.open_fullscreen(&mut ctx))
            .unwrap();

        // One pointer release, routed topmost-first: the overlay consumes
        // it, the modal behind it stays open.
        let mut click = Event::new(event_types::POINTER_UP);
        overlay.handle_event(&mut ctx, &mut click);
        modal.handle_event(&mut ctx, &mut click);

        assert!(!overlay.is_open(&ctx));
        assert!(modal.is_open(&ctx));

        // The next release has no overlay above it and closes the modal.
        let mut click = Event::new(event_types::POINTER_UP);
        modal.handle_event(&mut ctx, &mut click);
        assert!(!modal.is_open(&ctx));
    }

    #[test]
    fn test_reopen_resets_the_slider() {
        let mut ctx = WidgetContext::new();

        let mut modal = ProjectModal::open(&mut ctx, gallery_project());
        modal.handle_event(&mut ctx, &mut arrow_right());
        assert_eq!(modal.slider().unwrap().current(&ctx), Some(1));
        modal.close(&mut ctx);

        // A fresh open starts at the first slide with a clean registry.
        let modal = ProjectModal::open(&mut ctx, gallery_project());
        assert_eq!(modal.slider().unwrap().current(&ctx), Some(0));
        assert_eq!(ctx.listener_count(event_types::KEY_DOWN), 2);
    }

    #[test]
    fn test_repeated_cycles_leave_no_listeners() {
        let mut ctx = WidgetContext::new();

        for _ in 0..10 {
            let mut modal = ProjectModal::open(&mut ctx, gallery_project());
            modal.handle_event(&mut ctx, &mut escape());
        }

        for event_type in [
            event_types::KEY_DOWN,
            event_types::POINTER_UP,
            event_types::TOUCH_START,
            event_types::TOUCH_MOVE,
            event_types::TOUCH_END,
        ] {
            assert_eq!(ctx.listener_count(event_type), 0);
        }
    }

    #[test]
    fn test_events_after_close_are_ignored() {
        let mut ctx = WidgetContext::new();
        let closed = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&closed);
        let mut modal = ProjectModal::open(&mut ctx, gallery_project()).on_close(move || {
            count.fetch_add(1, Ordering::SeqCst);
        });

        modal.close(&mut ctx);
        modal.handle_event(&mut ctx, &mut escape());
        modal.handle_event(&mut ctx, &mut arrow_right());

        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}
