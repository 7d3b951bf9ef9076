use super::cell_core::{self, CellCore, CellWriter, ResourceHooks};
use crate::rc::{MutRc, RcDeref};

/// Construction-time configuration of a resource cell.
#[derive(Clone, Debug)]
pub struct CellConfig<Item> {
  /// Value reported by `current()` before the resource delivers anything.
  /// Defaults to `None`.
  pub initial_value: Option<Item>,
}

impl<Item> Default for CellConfig<Item> {
  fn default() -> Self { Self { initial_value: None } }
}

impl<Item> CellConfig<Item> {
  pub fn with_initial(value: Item) -> Self { Self { initial_value: Some(value) } }
}

/// Write handle passed to a resource cell's start hook.
///
/// Every `put` stores the value and synchronously notifies the cell's
/// dependents before returning.
pub struct CellSink<Item> {
  writer: CellWriter<Option<Item>>,
}

impl<Item> Clone for CellSink<Item> {
  fn clone(&self) -> Self { Self { writer: self.writer.clone() } }
}

impl<Item> CellSink<Item> {
  pub fn put(&self, value: Item) { self.writer.write(Some(value)); }
}

/// A lazily-started reactive cell backed by an external resource.
///
/// The `start` hook runs when the first dependent attaches, receiving a
/// [`CellSink`] to feed values through; the `stop` hook runs when the last
/// dependent detaches. A cell that is observed again after stopping starts
/// over. Observing zero times performs zero work.
///
/// Clones share the same underlying cell.
pub struct ResourceCell<Item> {
  core: MutRc<CellCore<Option<Item>>>,
}

impl<Item> Clone for ResourceCell<Item> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<Item: 'static> ResourceCell<Item> {
  pub fn new<Start, Stop>(mut start: Start, stop: Stop, config: CellConfig<Item>) -> Self
  where
    Start: FnMut(CellSink<Item>) + 'static,
    Stop: FnMut() + 'static,
  {
    let hooks: ResourceHooks<Option<Item>> = ResourceHooks {
      start: Box::new(move |writer| start(CellSink { writer })),
      stop: Box::new(stop),
    };
    Self { core: MutRc::own(CellCore::resource(config.initial_value, hooks)) }
  }
}

impl<Item: Clone + 'static> ResourceCell<Item> {
  /// The most recently delivered value, or the configured initial value
  /// (`None` when none was configured) before the first delivery; a
  /// tracked read.
  pub fn current(&self) -> Option<Item> {
    cell_core::record_read(&self.core);
    self.core.rc_deref().value.clone()
  }
}
