//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  bridge::{as_cell, from_expression, ExpressionSource},
  cell::{
    reaction, CellConfig, CellSink, ObservableCell, ReactionConfig, ReactionHandle, ResourceCell,
  },
  listenable::{
    BoxTalkback, Event, EventKind, FnMutSink, Listenable, Sink, Talkback, TalkbackSignal,
  },
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::{ClosureSubscription, Subscription, SubscriptionGuard},
};
