//! Folio Core Primitives
//!
//! This crate provides the foundational primitives for the Folio
//! interaction layer:
//!
//! - **Typed Events**: Unified event representation across input sources
//! - **State Machines**: Flat statecharts for widget interaction states
//!
//! # Example
//!
//! ```rust
//! use folio_core::events::event_types;
//! use folio_core::fsm::StateMachine;
//!
//! // CLOSED --(POINTER_UP)--> OPEN
//! let mut fsm = StateMachine::builder(0)
//!     .on(0, event_types::POINTER_UP, 1)
//!     .build();
//!
//! assert!(fsm.send(event_types::POINTER_UP));
//! assert_eq!(fsm.current_state(), 1);
//! ```

pub mod events;
pub mod fsm;

pub use events::{event_types, Event, EventData, EventType, KeyCode, Modifiers};
pub use fsm::{EventId, StateId, StateMachine, StateMachineBuilder, Transition};
