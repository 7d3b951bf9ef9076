//! # cellbridge: listenable sources ⇄ observable cells
//!
//! A two-way bridge between two reactive-programming styles: *listenable
//! sources* (a minimal pull/push stream protocol driven by a talkback
//! handle) and *observable cells* (lazily observed value containers with
//! automatic dependency tracking).
//!
//! ## Quick Start
//!
//! ```rust
//! use cellbridge::prelude::*;
//! use std::{cell::RefCell, rc::Rc};
//!
//! // A writable reactive cell.
//! let celsius = ObservableCell::new(0);
//!
//! // Expose a pure read of it as a listenable source...
//! let read = celsius.clone();
//! let source = from_expression(move || read.current() * 9 / 5 + 32, ReactionConfig::default());
//!
//! // ...and bridge that source right back into a lazily-started cell.
//! let fahrenheit = as_cell(source, CellConfig::default());
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let watch = fahrenheit.clone();
//! let subscription = reaction(
//!   move || watch.current(),
//!   move |v| sink.borrow_mut().push(v),
//!   ReactionConfig::default(),
//! );
//!
//! celsius.set(100);
//! assert_eq!(*seen.borrow(), vec![None, Some(32), Some(212)]);
//! subscription.unsubscribe();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Listenable`] | A lazy stream of values, pulled one at a time via a talkback |
//! | [`ObservableCell`] / [`ResourceCell`] | Reactive value containers whose reads are tracked |
//! | [`reaction`] | Re-runs a pure expression whenever a tracked cell changes |
//! | [`as_cell`] / [`from_expression`] | The two bridge adapters |
//! | [`Subscription`] | Handle to cancel an active subscription |
//!
//! Conversion is lazy in both directions: an unobserved bridged cell never
//! greets its source, and an unactivated expression source never subscribes
//! to its cells.
//!
//! [`Listenable`]: listenable::Listenable
//! [`ObservableCell`]: cell::ObservableCell
//! [`ResourceCell`]: cell::ResourceCell
//! [`reaction`]: cell::reaction
//! [`as_cell`]: bridge::as_cell
//! [`from_expression`]: bridge::from_expression
//! [`Subscription`]: subscription::Subscription

pub mod bridge;
pub mod cell;
pub mod listenable;
pub mod prelude;
pub mod rc;
pub mod subscription;

// Re-export the prelude module
pub use prelude::*;
