//! The two bridge adapters.
//!
//! [`as_cell`] wraps a listenable source so it can be read as a reactive
//! cell; [`from_expression`] wraps a pure read of one or more cells so it
//! can be consumed as a listenable source. The two translations are
//! independent and share no state; neither paradigm knows the bridge
//! exists.

mod expression_source;
mod source_cell;

pub use expression_source::{from_expression, ExpressionSource};
pub use source_cell::as_cell;
