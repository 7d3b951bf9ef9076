//! The listenable-source protocol
//!
//! A listenable source is a lazy stream: nothing happens until a consumer
//! greets it with [`EventKind::Start`] and hands over a [`Sink`]. The source
//! answers — synchronously — with a `Start` event carrying a [`Talkback`],
//! the control handle the consumer uses to request the next value or to
//! terminate the stream.
//!
//! Event kinds and talkback signals are tagged enumerations in-crate; the
//! wire-level numeric codes of the protocol (`0`/`1`/`2`) are reachable
//! through [`EventKind::code`] and friends for interoperability with
//! code-based implementations.

use std::convert::Infallible;

use crate::rc::{MutRc, RcDerefMut};

// ============================================================================
// Wire codes
// ============================================================================

/// The three event kinds a source delivers to its sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
  /// Subscription handshake; the payload is the talkback handle.
  Start = 0,
  /// A value.
  Data = 1,
  /// Stream over; the payload is an optional error.
  End = 2,
}

impl EventKind {
  /// The wire-level code of this kind.
  #[inline]
  pub fn code(self) -> u8 { self as u8 }

  pub fn from_code(code: u8) -> Option<Self> {
    match code {
      0 => Some(EventKind::Start),
      1 => Some(EventKind::Data),
      2 => Some(EventKind::End),
      _ => None,
    }
  }
}

/// The two signals a consumer sends upstream through a talkback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TalkbackSignal {
  /// Request the next value.
  Pull = 1,
  /// Terminate the stream and release its resources.
  Terminate = 2,
}

impl TalkbackSignal {
  #[inline]
  pub fn code(self) -> u8 { self as u8 }

  pub fn from_code(code: u8) -> Option<Self> {
    match code {
      1 => Some(TalkbackSignal::Pull),
      2 => Some(TalkbackSignal::Terminate),
      _ => None,
    }
  }
}

// ============================================================================
// Events and talkbacks
// ============================================================================

/// The upstream control handle a source hands to its consumer.
///
/// Exclusively owned by the consumer that started the source; never shared.
pub trait Talkback {
  fn signal(&mut self, signal: TalkbackSignal);

  /// Request the next value.
  #[inline]
  fn pull(&mut self) { self.signal(TalkbackSignal::Pull) }

  /// Terminate the stream.
  #[inline]
  fn terminate(&mut self) { self.signal(TalkbackSignal::Terminate) }
}

pub type BoxTalkback = Box<dyn Talkback>;

/// An event delivered from a source to a sink.
///
/// `Err` rides only on [`Event::End`]; sources that cannot fail use the
/// default [`Infallible`].
pub enum Event<Item, Err = Infallible> {
  Start(BoxTalkback),
  Data(Item),
  End(Option<Err>),
}

impl<Item, Err> Event<Item, Err> {
  pub fn kind(&self) -> EventKind {
    match self {
      Event::Start(_) => EventKind::Start,
      Event::Data(_) => EventKind::Data,
      Event::End(_) => EventKind::End,
    }
  }
}

// ============================================================================
// Sinks
// ============================================================================

/// The downstream half of the protocol: whatever a source delivers into.
pub trait Sink<Item, Err = Infallible> {
  fn deliver(&mut self, event: Event<Item, Err>);
}

/// Blanket closure adapter, for consuming a source with a plain `FnMut`.
#[derive(Clone)]
pub struct FnMutSink<F>(pub F);

impl<F, Item, Err> Sink<Item, Err> for FnMutSink<F>
where
  F: FnMut(Event<Item, Err>),
{
  #[inline]
  fn deliver(&mut self, event: Event<Item, Err>) { (self.0)(event) }
}

/// Shared-ownership sink; lets a source keep delivering into a sink it has
/// also lent to its talkback.
impl<S, Item, Err> Sink<Item, Err> for MutRc<S>
where
  S: Sink<Item, Err>,
{
  #[inline]
  fn deliver(&mut self, event: Event<Item, Err>) { self.rc_deref_mut().deliver(event) }
}

// ============================================================================
// Sources
// ============================================================================

/// A lazy, listenable stream of values.
///
/// Activation consumes the source; a source that supports repeated
/// activation is `Clone`, and every activation is an independent stream
/// instance.
pub trait Listenable: Sized {
  type Item;
  type Err;

  /// Greet the source. Only [`EventKind::Start`] begins a subscription; a
  /// greet with any other kind is a no-op, per protocol convention.
  fn signal<S>(self, greet: EventKind, sink: S)
  where
    S: Sink<Self::Item, Self::Err> + 'static;

  /// Greet the source with [`EventKind::Start`].
  #[inline]
  fn listen<S>(self, sink: S)
  where
    S: Sink<Self::Item, Self::Err> + 'static,
  {
    self.signal(EventKind::Start, sink)
  }
}
