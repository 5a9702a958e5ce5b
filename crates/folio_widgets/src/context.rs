//! Widget Context - manages widget state, FSMs, and listener lifetimes
//!
//! The WidgetContext provides:
//! - Widget registration with optional interaction FSMs
//! - Type-erased per-widget state storage
//! - Dirty tracking for incremental re-renders
//! - A global listener registry with explicitly scoped lifetimes
//!
//! # Listener registry
//!
//! Document-level input (keyboard, touch, scroll) is not delivered to a
//! hit-tested target; any widget may declare interest in an event type
//! while it is mounted. The host event loop queries [`listeners_of`] and
//! routes the event to each interested widget's `handle_event`:
//!
//! ```ignore
//! for id in ctx.listeners_of(event.event_type) {
//!     modal.handle_event(&mut ctx, &event); // host-side dispatch by id
//! }
//! ```
//!
//! Registrations are removed explicitly on teardown, never left to drop
//! order; [`listener_count`] makes the registry observable so teardown
//! can be verified.
//!
//! [`listeners_of`]: WidgetContext::listeners_of
//! [`listener_count`]: WidgetContext::listener_count

use std::any::Any;

use folio_core::events::{Event, EventType};
use folio_core::fsm::{EventId, StateMachine};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::widget::WidgetId;

/// Trait for widget state types
///
/// Any type stored as widget state must implement this trait. The
/// `as_any` methods enable type-safe downcasting.
pub trait WidgetState: Send + 'static {
    /// Get self as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get self as mutable Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Blanket implementation for all types
impl<T: Send + 'static> WidgetState for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Data stored for each registered widget
#[derive(Default)]
struct WidgetData {
    /// Optional FSM for interaction states
    fsm: Option<StateMachine>,
    /// Custom state (type-erased)
    state: Option<Box<dyn WidgetState>>,
}

/// Dirty tracking for incremental re-renders
#[derive(Default)]
pub struct DirtyTracker {
    dirty: FxHashSet<WidgetId>,
}

impl DirtyTracker {
    /// Create a new dirty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a widget as dirty (needs re-render)
    pub fn mark(&mut self, id: WidgetId) {
        self.dirty.insert(id);
    }

    /// Check if a widget is dirty
    pub fn is_dirty(&self, id: WidgetId) -> bool {
        self.dirty.contains(&id)
    }

    /// Check if any widgets are dirty
    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Take all dirty widget IDs (clears the set)
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        self.dirty.drain().collect()
    }

    /// Clear all dirty flags
    pub fn clear(&mut self) {
        self.dirty.clear();
    }
}

/// The central coordinator for widget state, FSMs, and listener scoping
pub struct WidgetContext {
    /// Per-widget data
    widgets: SlotMap<WidgetId, WidgetData>,
    /// Dirty tracker
    dirty: DirtyTracker,
    /// Document-level listener registry: event type -> interested widgets
    listeners: FxHashMap<EventType, Vec<WidgetId>>,
}

impl Default for WidgetContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetContext {
    /// Create a new widget context
    pub fn new() -> Self {
        Self {
            widgets: SlotMap::with_key(),
            dirty: DirtyTracker::new(),
            listeners: FxHashMap::default(),
        }
    }

    // =========================================================================
    // Widget Registration
    // =========================================================================

    /// Register a new widget and get its ID
    pub fn register_widget(&mut self) -> WidgetId {
        let id = self.widgets.insert(WidgetData::default());
        self.dirty.mark(id);
        id
    }

    /// Register a widget with a state machine
    pub fn register_widget_with_fsm(&mut self, fsm: StateMachine) -> WidgetId {
        let id = self.widgets.insert(WidgetData {
            fsm: Some(fsm),
            state: None,
        });
        self.dirty.mark(id);
        id
    }

    /// Unregister a widget
    ///
    /// Listener registrations are the owning widget's responsibility and
    /// should already be removed at this point; any that remain are swept
    /// here so a stale ID can never be routed to, and a warning is logged
    /// because the widget missed its teardown contract.
    pub fn unregister_widget(&mut self, id: WidgetId) {
        if self.widgets.remove(id).is_none() {
            return;
        }

        let mut leaked = 0usize;
        for targets in self.listeners.values_mut() {
            let before = targets.len();
            targets.retain(|t| *t != id);
            leaked += before - targets.len();
        }
        if leaked > 0 {
            tracing::warn!(?id, leaked, "widget unregistered with live listeners");
        }
    }

    /// Check if a widget is registered
    pub fn is_registered(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    // =========================================================================
    // Listener Registry
    // =========================================================================

    /// Declare a widget's interest in a document-level event type
    ///
    /// Idempotent: registering the same (widget, event type) pair twice
    /// keeps a single entry.
    pub fn add_listener(&mut self, id: WidgetId, event_type: EventType) {
        let targets = self.listeners.entry(event_type).or_default();
        if !targets.contains(&id) {
            targets.push(id);
        }
    }

    /// Remove a widget's interest in an event type
    pub fn remove_listener(&mut self, id: WidgetId, event_type: EventType) {
        if let Some(targets) = self.listeners.get_mut(&event_type) {
            targets.retain(|t| *t != id);
        }
    }

    /// Widgets currently listening for an event type, in registration order
    pub fn listeners_of(&self, event_type: EventType) -> Vec<WidgetId> {
        self.listeners
            .get(&event_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of live registrations for an event type
    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.listeners.get(&event_type).map_or(0, Vec::len)
    }

    // =========================================================================
    // State Machine Integration
    // =========================================================================

    /// Send an event to a widget's FSM
    ///
    /// Returns true if the FSM transitioned to a new state.
    pub fn send_fsm_event(&mut self, id: WidgetId, event: EventId) -> bool {
        if let Some(data) = self.widgets.get_mut(id) {
            if let Some(ref mut fsm) = data.fsm {
                if fsm.send(event) {
                    self.dirty.mark(id);
                    return true;
                }
            }
        }
        false
    }

    /// Dispatch an Event struct to a widget's FSM
    ///
    /// Convenience wrapper that extracts the event type.
    pub fn dispatch_event(&mut self, id: WidgetId, event: &Event) -> bool {
        self.send_fsm_event(id, event.event_type)
    }

    /// Get a widget's current FSM state
    pub fn get_fsm_state(&self, id: WidgetId) -> Option<u32> {
        self.widgets
            .get(id)
            .and_then(|d| d.fsm.as_ref())
            .map(|fsm| fsm.current_state())
    }

    // =========================================================================
    // Widget State
    // =========================================================================

    /// Set custom state for a widget
    pub fn set_widget_state<S: WidgetState>(&mut self, id: WidgetId, state: S) {
        if let Some(data) = self.widgets.get_mut(id) {
            data.state = Some(Box::new(state));
            self.dirty.mark(id);
        }
    }

    /// Get custom state for a widget (immutable)
    pub fn get_widget_state<S: 'static>(&self, id: WidgetId) -> Option<&S> {
        self.widgets
            .get(id)
            .and_then(|d| d.state.as_ref())
            .and_then(|s| (**s).as_any().downcast_ref())
    }

    /// Get custom state for a widget (mutable)
    pub fn get_widget_state_mut<S: 'static>(&mut self, id: WidgetId) -> Option<&mut S> {
        self.widgets
            .get_mut(id)
            .and_then(|d| d.state.as_mut())
            .and_then(|s| (**s).as_any_mut().downcast_mut())
    }

    // =========================================================================
    // Dirty Tracking
    // =========================================================================

    /// Mark a widget as needing re-render
    pub fn mark_dirty(&mut self, id: WidgetId) {
        self.dirty.mark(id);
    }

    /// Check if a specific widget needs re-rendering
    pub fn is_dirty(&self, id: WidgetId) -> bool {
        self.dirty.is_dirty(id)
    }

    /// Check if any widgets need re-rendering
    pub fn has_dirty(&self) -> bool {
        self.dirty.has_dirty()
    }

    /// Take all dirty widget IDs (clears the set)
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        self.dirty.take_dirty()
    }

    /// Clear all dirty flags (call after rendering)
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Get the dirty tracker
    pub fn dirty_tracker(&self) -> &DirtyTracker {
        &self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::events::event_types;

    #[derive(Debug)]
    struct TestState {
        value: i32,
    }

    #[test]
    fn test_widget_state_storage() {
        let mut ctx = WidgetContext::new();
        let id = ctx.register_widget();

        ctx.set_widget_state(id, TestState { value: 42 });

        let state = ctx.get_widget_state::<TestState>(id);
        assert!(state.is_some(), "State should be retrievable");
        assert_eq!(state.unwrap().value, 42);

        let state_mut = ctx.get_widget_state_mut::<TestState>(id);
        assert!(state_mut.is_some(), "Mutable state should be retrievable");
        state_mut.unwrap().value = 100;

        let state = ctx.get_widget_state::<TestState>(id);
        assert_eq!(state.unwrap().value, 100);
    }

    #[test]
    fn test_widget_registration() {
        let mut ctx = WidgetContext::new();
        let id1 = ctx.register_widget();
        let id2 = ctx.register_widget();

        assert!(ctx.is_registered(id1));
        assert!(ctx.is_registered(id2));
        assert_ne!(id1, id2);

        ctx.unregister_widget(id1);
        assert!(!ctx.is_registered(id1));
        assert!(ctx.is_registered(id2));
    }

    #[test]
    fn test_fsm_integration() {
        let mut ctx = WidgetContext::new();
        let fsm = StateMachine::builder(0)
            .on(0, event_types::POINTER_ENTER, 1)
            .on(1, event_types::POINTER_LEAVE, 0)
            .build();
        let id = ctx.register_widget_with_fsm(fsm);
        ctx.clear_dirty();

        assert_eq!(ctx.get_fsm_state(id), Some(0));

        assert!(ctx.send_fsm_event(id, event_types::POINTER_ENTER));
        assert_eq!(ctx.get_fsm_state(id), Some(1));
        assert!(ctx.is_dirty(id));

        // No edge for POINTER_DOWN from state 1
        ctx.clear_dirty();
        assert!(!ctx.send_fsm_event(id, event_types::POINTER_DOWN));
        assert!(!ctx.is_dirty(id));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut ctx = WidgetContext::new();
        let id1 = ctx.register_widget();
        let id2 = ctx.register_widget();

        // Clear initial dirty state from registration
        ctx.clear_dirty();
        assert!(!ctx.has_dirty());

        ctx.mark_dirty(id1);
        assert!(ctx.has_dirty());
        assert!(ctx.is_dirty(id1));
        assert!(!ctx.is_dirty(id2));

        let dirty = ctx.take_dirty();
        assert_eq!(dirty, vec![id1]);
        assert!(!ctx.has_dirty());
    }

    #[test]
    fn test_listener_registry() {
        let mut ctx = WidgetContext::new();
        let id1 = ctx.register_widget();
        let id2 = ctx.register_widget();

        assert_eq!(ctx.listener_count(event_types::KEY_DOWN), 0);

        ctx.add_listener(id1, event_types::KEY_DOWN);
        ctx.add_listener(id2, event_types::KEY_DOWN);
        // Re-registration is idempotent
        ctx.add_listener(id1, event_types::KEY_DOWN);

        assert_eq!(ctx.listener_count(event_types::KEY_DOWN), 2);
        assert_eq!(ctx.listeners_of(event_types::KEY_DOWN), vec![id1, id2]);

        ctx.remove_listener(id1, event_types::KEY_DOWN);
        assert_eq!(ctx.listeners_of(event_types::KEY_DOWN), vec![id2]);
    }

    #[test]
    fn test_unregister_sweeps_stale_listeners() {
        let mut ctx = WidgetContext::new();
        let id = ctx.register_widget();

        ctx.add_listener(id, event_types::KEY_DOWN);
        ctx.add_listener(id, event_types::TOUCH_START);

        // Widget forgot its teardown contract; the sweep still protects
        // the routing table.
        ctx.unregister_widget(id);
        assert_eq!(ctx.listener_count(event_types::KEY_DOWN), 0);
        assert_eq!(ctx.listener_count(event_types::TOUCH_START), 0);
    }
}
