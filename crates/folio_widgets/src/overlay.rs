//! Fullscreen image overlay
//!
//! A transient viewer for a single image, opened from the slider's
//! visible slide. Each overlay owns its own keyboard and pointer
//! listeners for exactly as long as it is open: they are registered at
//! open and removed at close, so repeated open/close cycles leave no
//! residual registrations behind.
//!
//! The open/closed lifecycle is a two-state FSM; once closed, an overlay
//! is inert and every further event or close call is a no-op.
//!
//! The overlay sits above whatever opened it, so the pointer release that
//! dismisses it is consumed: [`handle_event`] marks the event via
//! `stop_propagation`, and surfaces below check that flag before treating
//! the same release as their own dismiss.
//!
//! [`handle_event`]: FullscreenOverlay::handle_event

use folio_core::events::{event_types, Event, EventData, KeyCode};
use folio_core::fsm::StateMachine;

use crate::context::WidgetContext;
use crate::slider::ImageRef;
use crate::widget::WidgetId;

/// Overlay lifecycle states and events
pub mod states {
    /// Overlay is visible
    pub const OPEN: u32 = 0;
    /// Overlay has been dismissed
    pub const CLOSED: u32 = 1;

    /// Dismiss request (custom FSM event)
    pub const CLOSE: u32 = 100;
}

/// Fullscreen viewer for one image
pub struct FullscreenOverlay {
    id: WidgetId,
    image: ImageRef,
    on_close: Option<Box<dyn FnMut() + Send>>,
}

impl FullscreenOverlay {
    /// Open an overlay for an image
    ///
    /// Registers the Escape and click-to-dismiss listeners; they live
    /// until [`close`] runs.
    ///
    /// [`close`]: FullscreenOverlay::close
    pub fn open(ctx: &mut WidgetContext, image: ImageRef) -> Self {
        let fsm = StateMachine::builder(states::OPEN)
            .on(states::OPEN, states::CLOSE, states::CLOSED)
            .build();
        let id = ctx.register_widget_with_fsm(fsm);
        ctx.add_listener(id, event_types::KEY_DOWN);
        ctx.add_listener(id, event_types::POINTER_UP);
        tracing::debug!(?id, src = %image.src, "fullscreen overlay opened");

        Self {
            id,
            image,
            on_close: None,
        }
    }

    /// Get the widget ID
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The displayed image
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Set the close callback
    pub fn on_close<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Whether the overlay is still visible
    pub fn is_open(&self, ctx: &WidgetContext) -> bool {
        ctx.get_fsm_state(self.id) == Some(states::OPEN)
    }

    /// Handle a routed event
    ///
    /// Escape or any pointer release dismisses the overlay. A consumed
    /// pointer release is marked via [`Event::stop_propagation`] so the
    /// surface behind the overlay does not also treat it as a dismiss;
    /// hosts route pointer events to the topmost surface first.
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &mut Event) {
        match (event.event_type, &event.data) {
            (event_types::KEY_DOWN, EventData::Key { key, .. }) => {
                if *key == KeyCode::ESCAPE {
                    self.close(ctx);
                }
            }
            (event_types::POINTER_UP, _) => {
                if self.is_open(ctx) {
                    event.stop_propagation();
                    self.close(ctx);
                }
            }
            _ => {}
        }
    }

    /// Dismiss the overlay
    ///
    /// Removes both listeners and unregisters the widget. Idempotent: a
    /// second close finds the FSM already in `CLOSED` and does nothing.
    pub fn close(&mut self, ctx: &mut WidgetContext) {
        if !ctx.send_fsm_event(self.id, states::CLOSE) {
            return;
        }

        ctx.remove_listener(self.id, event_types::KEY_DOWN);
        ctx.remove_listener(self.id, event_types::POINTER_UP);
        ctx.unregister_widget(self.id);
        tracing::debug!(id = ?self.id, "fullscreen overlay closed");

        if let Some(ref mut callback) = self.on_close {
            callback();
        }
    }
}
