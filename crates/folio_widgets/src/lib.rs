//! Folio Widget Library
//!
//! Stateful interaction controllers for a portfolio site: scroll-position
//! tracking, a modal image slider, and the fullscreen overlay and project
//! modal built on top of it.
//!
//! # Architecture
//!
//! The widget system is built on three pillars:
//!
//! 1. **Normalized Events**: Every input source (keyboard, touch, scroll,
//!    resize, pointer) arrives as one [`folio_core::Event`]; widgets map
//!    inputs onto a small set of internal primitives instead of handling
//!    each source ad hoc.
//!
//! 2. **Scoped Listeners**: Document-level listeners are registered in the
//!    [`WidgetContext`] with explicit lifetimes: mount registers, teardown
//!    removes. The registry is observable, so leak-free open/close cycles
//!    are testable.
//!
//! 3. **Dirty Tracking**: State changes mark the owning widget dirty;
//!    hosts re-derive render state (e.g. [`Slider::view`]) only for dirty
//!    widgets.
//!
//! # Example
//!
//! ```ignore
//! use folio_widgets::prelude::*;
//!
//! let mut ctx = WidgetContext::new();
//!
//! // Track which section is active while the page scrolls
//! let mut tracker = SectionTracker::new(&mut ctx, sections);
//! tracker.on_change(&ctx, |active| println!("active section: {:?}", active));
//! tracker.handle_event(&mut ctx, &Event::scroll(0.0, 420.0));
//!
//! // Open a project modal; its slider handles keys and swipes
//! let mut modal = ProjectModal::open(&mut ctx, project);
//! modal.handle_event(&mut ctx, &mut event);
//! modal.update(&mut ctx, dt);
//!
//! if ctx.is_dirty(modal.slider().unwrap().id()) {
//!     let view = modal.slider().unwrap().view(&ctx);
//!     // render view...
//! }
//! ```

pub mod context;
pub mod modal;
pub mod overlay;
pub mod section_tracker;
pub mod slider;
pub mod widget;

pub use context::{DirtyTracker, WidgetContext, WidgetState};
pub use modal::{ProjectDetail, ProjectModal};
pub use overlay::FullscreenOverlay;
pub use section_tracker::{
    Section, SectionTracker, SectionTrackerConfig, SectionTrackerState,
};
pub use slider::{
    slider, GestureSample, ImageRef, Slider, SliderBuilder, SliderConfig, SliderError,
    SliderState, SliderView,
};
pub use widget::WidgetId;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::context::WidgetContext;
    pub use crate::modal::{ProjectDetail, ProjectModal};
    pub use crate::overlay::FullscreenOverlay;
    pub use crate::section_tracker::{Section, SectionTracker, SectionTrackerConfig};
    pub use crate::slider::{slider, ImageRef, Slider, SliderBuilder, SliderConfig};
    pub use crate::widget::WidgetId;
    pub use folio_core::events::{event_types, Event, EventData, KeyCode, Modifiers};
}
