//! Unified event types for the interaction layer
//!
//! Every input source (pointer, keyboard, touch, scroll, resize) is
//! normalized into a single [`Event`] struct carrying a numeric event type
//! and a typed payload. Widgets consume events through their
//! `handle_event` methods; they never read the platform directly.
//!
//! Event types are plain `u32` constants so they can double as FSM event
//! IDs (see [`crate::fsm`]).

/// Numeric event type identifier
pub type EventType = u32;

/// Well-known event type constants
pub mod event_types {
    use super::EventType;

    /// Pointer button pressed over the target
    pub const POINTER_DOWN: EventType = 1;
    /// Pointer button released over the target
    pub const POINTER_UP: EventType = 2;
    /// Pointer entered the target's bounds
    pub const POINTER_ENTER: EventType = 3;
    /// Pointer left the target's bounds
    pub const POINTER_LEAVE: EventType = 4;
    /// Key pressed
    pub const KEY_DOWN: EventType = 10;
    /// Key released
    pub const KEY_UP: EventType = 11;
    /// Touch contact began
    pub const TOUCH_START: EventType = 20;
    /// Touch contact moved
    pub const TOUCH_MOVE: EventType = 21;
    /// Touch contact ended
    pub const TOUCH_END: EventType = 22;
    /// Observed container scrolled (payload carries the absolute offset)
    pub const SCROLL: EventType = 30;
    /// Observed container resized
    pub const RESIZE: EventType = 31;
    /// Widget added to the live tree
    pub const MOUNT: EventType = 40;
    /// Widget removed from the live tree
    pub const UNMOUNT: EventType = 41;
}

/// Platform-independent key identifier
///
/// Wraps a `u32` so new codes can be added without breaking matches; the
/// associated constants cover the keys the interaction layer cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const LEFT: KeyCode = KeyCode(1);
    pub const RIGHT: KeyCode = KeyCode(2);
    pub const UP: KeyCode = KeyCode(3);
    pub const DOWN: KeyCode = KeyCode(4);
    pub const ESCAPE: KeyCode = KeyCode(5);
    pub const ENTER: KeyCode = KeyCode(6);
    pub const TAB: KeyCode = KeyCode(7);
    pub const SPACE: KeyCode = KeyCode(8);
}

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    const SHIFT: u8 = 1 << 0;
    const CTRL: u8 = 1 << 1;
    const ALT: u8 = 1 << 2;
    const META: u8 = 1 << 3;

    /// No modifiers held
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from individual flags
    pub fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if meta {
            bits |= Self::META;
        }
        Self { bits }
    }

    pub fn shift(&self) -> bool {
        self.bits & Self::SHIFT != 0
    }

    pub fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }

    pub fn alt(&self) -> bool {
        self.bits & Self::ALT != 0
    }

    pub fn meta(&self) -> bool {
        self.bits & Self::META != 0
    }

    /// The platform "command" accelerator (Cmd on macOS, Ctrl elsewhere)
    pub fn command(&self) -> bool {
        self.meta() || self.ctrl()
    }
}

/// Typed event payload
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// No payload (enter/leave, mount/unmount)
    None,
    /// Pointer position and button
    Pointer {
        x: f32,
        y: f32,
        button: u8,
        pressure: f32,
    },
    /// Keyboard key with modifier state
    Key { key: KeyCode, modifiers: Modifiers },
    /// Touch contact position
    Touch { x: f32, y: f32 },
    /// Absolute scroll offset of the observed container
    Scroll { x: f32, y: f32 },
    /// New size of the observed container
    Resize { width: f32, height: f32 },
}

/// A single input event
///
/// `target` identifies the widget the host routed the event to (0 for
/// document-level events that are broadcast through the listener registry).
#[derive(Clone, Debug)]
pub struct Event {
    /// The event type (see [`event_types`])
    pub event_type: EventType,
    /// Routed target widget, 0 for broadcast
    pub target: u64,
    /// Typed payload
    pub data: EventData,
    /// Host-supplied timestamp in milliseconds
    pub timestamp: u64,
    /// Whether a handler stopped further propagation
    pub propagation_stopped: bool,
}

impl Event {
    /// Create an event with an empty payload
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            target: 0,
            data: EventData::None,
            timestamp: 0,
            propagation_stopped: false,
        }
    }

    /// Create a key event
    pub fn key(event_type: EventType, key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            data: EventData::Key { key, modifiers },
            ..Self::new(event_type)
        }
    }

    /// Create a touch event
    pub fn touch(event_type: EventType, x: f32, y: f32) -> Self {
        Self {
            data: EventData::Touch { x, y },
            ..Self::new(event_type)
        }
    }

    /// Create a scroll event carrying the container's absolute offset
    pub fn scroll(x: f32, y: f32) -> Self {
        Self {
            data: EventData::Scroll { x, y },
            ..Self::new(event_types::SCROLL)
        }
    }

    /// Create a resize event
    pub fn resize(width: f32, height: f32) -> Self {
        Self {
            data: EventData::Resize { width, height },
            ..Self::new(event_types::RESIZE)
        }
    }

    /// Set the payload
    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    /// Set the timestamp
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Stop further propagation of this event
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_flags() {
        let mods = Modifiers::new(true, false, false, true);
        assert!(mods.shift());
        assert!(!mods.ctrl());
        assert!(mods.meta());
        assert!(mods.command());

        assert!(!Modifiers::none().command());
    }

    #[test]
    fn test_event_constructors() {
        let ev = Event::key(event_types::KEY_DOWN, KeyCode::LEFT, Modifiers::none());
        assert_eq!(ev.event_type, event_types::KEY_DOWN);
        assert!(matches!(
            ev.data,
            EventData::Key {
                key: KeyCode::LEFT,
                ..
            }
        ));

        let ev = Event::scroll(0.0, 420.0);
        assert_eq!(ev.event_type, event_types::SCROLL);
        assert_eq!(ev.data, EventData::Scroll { x: 0.0, y: 420.0 });
    }

    #[test]
    fn test_stop_propagation() {
        let mut ev = Event::new(event_types::POINTER_UP);
        assert!(!ev.propagation_stopped);
        ev.stop_propagation();
        assert!(ev.propagation_stopped);
    }
}
