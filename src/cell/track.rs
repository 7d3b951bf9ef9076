//! Thread-local dependency capture.
//!
//! While a reaction evaluates its expression, a collector frame sits on a
//! thread-local stack; every tracked cell read pushes a handle to itself
//! into the innermost frame. Reads outside any frame are plain reads and
//! register nothing.

use std::{cell::RefCell, rc::Rc};

/// Something that wants to be re-run when a cell it read changes.
pub(crate) trait Dependent {
  fn invalidate(self: Rc<Self>);
}

/// Type-erased observable surface of a cell, as captured by the tracker.
pub(crate) trait TrackedCell {
  /// Register a dependent; pure bookkeeping, runs no lifecycle hooks.
  fn attach(&self, dependent: Rc<dyn Dependent>) -> usize;

  /// Deregister a dependent and reconcile the cell's resource state.
  fn detach(&self, id: usize);

  /// Reconcile the cell's resource state with its observer count.
  fn activate(&self);

  /// Pointer identity, for deduplication and diffing.
  fn identity(&self) -> *const ();
}

pub(crate) type CellHandle = Rc<dyn TrackedCell>;

thread_local! {
  static COLLECTORS: RefCell<Vec<Vec<CellHandle>>> = RefCell::new(Vec::new());
}

/// Evaluate `f` under a fresh collector frame and return its value together
/// with the deduplicated set of cells it read.
pub(crate) fn tracked<R>(f: impl FnOnce() -> R) -> (R, Vec<CellHandle>) {
  // Pops the frame even if `f` panics, so a poisoned evaluation cannot
  // corrupt tracking for the rest of the thread.
  struct Frame;
  impl Drop for Frame {
    fn drop(&mut self) {
      COLLECTORS.with(|collectors| {
        collectors.borrow_mut().pop();
      });
    }
  }

  COLLECTORS.with(|collectors| collectors.borrow_mut().push(Vec::new()));
  let frame = Frame;
  let value = f();
  std::mem::forget(frame);
  let sources =
    COLLECTORS.with(|collectors| collectors.borrow_mut().pop().expect("collector frame lost"));
  (value, sources)
}

/// Record a read into the innermost collector frame, if any.
pub(crate) fn record(identity: *const (), handle: impl FnOnce() -> CellHandle) {
  COLLECTORS.with(|collectors| {
    let mut stack = collectors.borrow_mut();
    if let Some(frame) = stack.last_mut() {
      if !frame.iter().any(|cell| cell.identity() == identity) {
        frame.push(handle());
      }
    }
  })
}
