//! Shared state behind every cell flavor.

use std::rc::Rc;

use super::{
  dependents::Dependents,
  track::{self, CellHandle, Dependent, TrackedCell},
};
use crate::rc::{MutRc, RcDeref, RcDerefMut};

/// Lifecycle hooks of a resource-backed cell.
pub(crate) struct ResourceHooks<V> {
  pub(crate) start: Box<dyn FnMut(CellWriter<V>)>,
  pub(crate) stop: Box<dyn FnMut()>,
}

pub(crate) struct CellCore<V> {
  pub(crate) value: V,
  pub(crate) dependents: Dependents,
  pub(crate) resource: Option<ResourceHooks<V>>,
  pub(crate) started: bool,
}

impl<V> CellCore<V> {
  pub(crate) fn plain(value: V) -> Self {
    Self { value, dependents: Dependents::default(), resource: None, started: false }
  }

  pub(crate) fn resource(value: V, hooks: ResourceHooks<V>) -> Self {
    Self { value, dependents: Dependents::default(), resource: Some(hooks), started: false }
  }
}

/// Write handle into a cell core; writing stores the value and notifies
/// every attached dependent before returning.
pub(crate) struct CellWriter<V> {
  core: MutRc<CellCore<V>>,
}

impl<V> Clone for CellWriter<V> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<V> CellWriter<V> {
  pub(crate) fn new(core: MutRc<CellCore<V>>) -> Self { Self { core } }

  pub(crate) fn write(&self, value: V) {
    self.core.rc_deref_mut().value = value;
    notify(&self.core);
  }
}

/// Invalidate every dependent of `core`, in attach order.
///
/// Dependents are snapshotted first so no registry borrow is held while
/// user code runs; a dependent attached or detached mid-notification takes
/// effect from the next write on.
pub(crate) fn notify<V>(core: &MutRc<CellCore<V>>) {
  let snapshot = core.rc_deref().dependents.snapshot();
  for dependent in snapshot {
    dependent.invalidate();
  }
}

/// Reconcile a resource cell's started flag with its observer count: run
/// the start hook on the 0→1 transition and the stop hook on 1→0.
///
/// The hooks are taken out of the core while they run, so hook code may
/// freely attach and detach dependents; the loop re-checks the count after
/// every hook invocation and settles any transition that raced in.
pub(crate) fn sync_resource<V>(core: &MutRc<CellCore<V>>) {
  loop {
    let (mut hooks, starting) = {
      let mut inner = core.rc_deref_mut();
      let observed = !inner.dependents.is_empty();
      let starting = match (inner.started, observed) {
        (false, true) => true,
        (true, false) => false,
        _ => return,
      };
      let hooks = match inner.resource.take() {
        Some(hooks) => hooks,
        // Plain cell, or a hook invocation further up the stack owns the
        // hooks and will re-run this reconciliation when it returns.
        None => return,
      };
      inner.started = starting;
      (hooks, starting)
    };

    if starting {
      (hooks.start)(CellWriter::new(core.clone()));
    } else {
      (hooks.stop)();
    }
    core.rc_deref_mut().resource = Some(hooks);
  }
}

impl<V: 'static> TrackedCell for MutRc<CellCore<V>> {
  fn attach(&self, dependent: Rc<dyn Dependent>) -> usize {
    self.rc_deref_mut().dependents.add(dependent)
  }

  fn detach(&self, id: usize) {
    self.rc_deref_mut().dependents.remove(id);
    sync_resource(self);
  }

  fn activate(&self) { sync_resource(self); }

  fn identity(&self) -> *const () { self.inner_addr() }
}

/// Register a tracked read of `core` with the active collector, if any.
pub(crate) fn record_read<V: 'static>(core: &MutRc<CellCore<V>>) {
  let identity = core.inner_addr();
  track::record(identity, || Rc::new(core.clone()) as CellHandle);
}
