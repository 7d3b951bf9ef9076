//! The reactive-subscription primitive.

use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use super::track::{self, CellHandle, Dependent};
use crate::subscription::Subscription;

/// Construction-time configuration of a reaction.
#[derive(Clone, Copy, Debug)]
pub struct ReactionConfig {
  /// Invoke the callback with the expression's current value right away,
  /// instead of waiting for the first change. Defaults to `true`.
  pub fire_immediately: bool,
}

impl Default for ReactionConfig {
  fn default() -> Self { Self { fire_immediately: true } }
}

/// Subscribe a callback to changes of a pure expression.
///
/// The expression runs once to establish tracking and again whenever a cell
/// it read changes; the callback fires when the expression's value actually
/// changes between runs (and once immediately, when configured). Delivery
/// is synchronous: a cell write returns only after every reaction it woke
/// has run.
///
/// The returned handle is the disposer; unsubscribing detaches the reaction
/// from every cell it observes, running resource teardown where it was the
/// last observer.
pub fn reaction<F, C, T>(expression: F, mut callback: C, config: ReactionConfig) -> ReactionHandle
where
  F: Fn() -> T + 'static,
  C: FnMut(T) + 'static,
  T: Clone + PartialEq + 'static,
{
  let mut previous: Option<T> = None;
  let mut first = true;
  let runner = move || {
    let (value, sources) = track::tracked(&expression);
    let emit = if first {
      first = false;
      config.fire_immediately
    } else {
      previous.as_ref() != Some(&value)
    };
    previous = Some(value.clone());
    if emit {
      callback(value);
    }
    sources
  };

  let core = Rc::new(ReactionCore {
    runner: RefCell::new(Box::new(runner)),
    deps: RefCell::new(Vec::new()),
    disposed: Cell::new(false),
  });
  execute(&core);
  ReactionHandle { core }
}

/// Disposer for an active [`reaction`].
pub struct ReactionHandle {
  core: Rc<ReactionCore>,
}

impl Subscription for ReactionHandle {
  fn unsubscribe(self) { dispose(&self.core); }

  fn is_closed(&self) -> bool { self.core.disposed.get() }
}

struct ActiveDep {
  handle: CellHandle,
  id: usize,
}

struct ReactionCore {
  runner: RefCell<Box<dyn FnMut() -> Vec<CellHandle>>>,
  deps: RefCell<Vec<ActiveDep>>,
  disposed: Cell<bool>,
}

impl Dependent for ReactionCore {
  fn invalidate(self: Rc<Self>) { execute(&self); }
}

/// Run the reaction once and reconcile its subscriptions.
///
/// Invalidations cascading out of a resource start hook re-enter here
/// recursively, which keeps delivery ordered: every value a resource feeds
/// while starting is observed before the next one is requested.
fn execute(core: &Rc<ReactionCore>) {
  if core.disposed.get() {
    return;
  }

  let sources = {
    let mut runner = match core.runner.try_borrow_mut() {
      Ok(runner) => runner,
      Err(_) => panic!(
        "re-entrant reaction evaluation is not supported: a reaction's callback wrote a cell its \
         own expression reads"
      ),
    };
    (runner.as_mut())()
  };

  // Disposed from inside its own callback; dispose already detached.
  if core.disposed.get() {
    return;
  }

  let mut stale = Vec::new();
  let mut fresh: Vec<CellHandle> = Vec::new();
  {
    let mut deps = core.deps.borrow_mut();
    let old = std::mem::take(&mut *deps);
    let mut kept = Vec::with_capacity(old.len());
    for dep in old {
      if sources
        .iter()
        .any(|source| source.identity() == dep.handle.identity())
      {
        kept.push(dep);
      } else {
        stale.push(dep);
      }
    }
    for source in sources {
      if !kept
        .iter()
        .any(|dep| dep.handle.identity() == source.identity())
      {
        fresh.push(source);
      }
    }
    *deps = kept;
  }

  // Attach before running any lifecycle hook, so cascades triggered by
  // activation see a consistent dependency list and cannot double-attach.
  {
    let mut deps = core.deps.borrow_mut();
    for source in &fresh {
      let id = source.attach(core.clone());
      deps.push(ActiveDep { handle: source.clone(), id });
    }
  }
  for dep in stale {
    dep.handle.detach(dep.id);
  }
  for source in fresh {
    source.activate();
  }
}

fn dispose(core: &Rc<ReactionCore>) {
  if core.disposed.replace(true) {
    return;
  }
  let deps = std::mem::take(&mut *core.deps.borrow_mut());
  for dep in deps {
    dep.handle.detach(dep.id);
  }
}
