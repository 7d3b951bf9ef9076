//! Reactive expression → listenable source.

use std::convert::Infallible;

use crate::{
  cell::{reaction, ReactionConfig, ReactionHandle},
  listenable::{Event, EventKind, Listenable, Sink, Talkback, TalkbackSignal},
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

/// Convert a side-effect-free read of one or more cells into a listenable
/// source.
///
/// The returned source activates only on a [`EventKind::Start`] greet; any
/// other greet is a no-op. On activation it delivers the start event first
/// — the talkback terminates the underlying reactive subscription — and
/// then subscribes a reaction to `expression`, forwarding every reacted
/// value downstream as a data event. With `fire_immediately` set (the
/// default) the expression's current value is the first data event;
/// otherwise nothing is delivered until the value actually changes.
///
/// The source is unicast: every activation of a clone is an independent
/// reactive subscription, and terminating one leaves the others running.
///
/// ```rust
/// use cellbridge::prelude::*;
/// use std::{cell::RefCell, rc::Rc};
///
/// let cell = ObservableCell::new(1);
/// let read = cell.clone();
/// let source = from_expression(move || read.current(), ReactionConfig::default());
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = seen.clone();
/// source.listen(FnMutSink(move |event| {
///   if let Event::Data(v) = event {
///     log.borrow_mut().push(v);
///   }
/// }));
///
/// cell.set(2);
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub fn from_expression<F, T>(expression: F, config: ReactionConfig) -> ExpressionSource<F>
where
  F: Fn() -> T + 'static,
  T: Clone + PartialEq + 'static,
{
  ExpressionSource { expression, config }
}

/// Listenable source over a reactive expression; see [`from_expression`].
#[derive(Clone)]
pub struct ExpressionSource<F> {
  expression: F,
  config: ReactionConfig,
}

/// Explicit disposal state of one activation.
enum DisposeState {
  /// Talkback handed out, reaction not yet created.
  Pending,
  Active(ReactionHandle),
  Terminated,
}

struct ExpressionTalkback {
  state: MutRc<DisposeState>,
}

impl Talkback for ExpressionTalkback {
  fn signal(&mut self, signal: TalkbackSignal) {
    match signal {
      // Push-only source: values flow as the expression changes.
      TalkbackSignal::Pull => {}
      TalkbackSignal::Terminate => {
        let previous = std::mem::replace(&mut *self.state.rc_deref_mut(), DisposeState::Terminated);
        if let DisposeState::Active(handle) = previous {
          handle.unsubscribe();
        }
      }
    }
  }
}

impl<F, T> Listenable for ExpressionSource<F>
where
  F: Fn() -> T + 'static,
  T: Clone + PartialEq + 'static,
{
  type Item = T;
  type Err = Infallible;

  fn signal<S>(self, greet: EventKind, sink: S)
  where
    S: Sink<T, Infallible> + 'static,
  {
    if greet != EventKind::Start {
      return;
    }

    let mut sink = MutRc::own(sink);
    let state = MutRc::own(DisposeState::Pending);
    sink.deliver(Event::Start(Box::new(ExpressionTalkback { state: state.clone() })));

    // Terminated from inside the start event, before any subscription
    // existed; honor the intent by never subscribing at all.
    if matches!(*state.rc_deref(), DisposeState::Terminated) {
      return;
    }

    let mut data_sink = sink.clone();
    let handle = reaction(
      self.expression,
      move |value| data_sink.deliver(Event::Data(value)),
      self.config,
    );

    let mut current = state.rc_deref_mut();
    if matches!(*current, DisposeState::Terminated) {
      // Terminated during the immediate delivery.
      drop(current);
      handle.unsubscribe();
    } else {
      *current = DisposeState::Active(handle);
    }
  }
}
