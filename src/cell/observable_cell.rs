use super::cell_core::{self, CellCore, CellWriter};
use crate::rc::{MutRc, RcDeref};

/// A writable reactive cell.
///
/// Reads through [`current`] are tracked: performed inside a reaction's
/// expression they attach the reaction as a dependent, performed anywhere
/// else they are plain reads. Writes through [`set`] notify every dependent
/// synchronously, in attach order, before returning.
///
/// Clones share the same underlying cell.
///
/// [`current`]: ObservableCell::current
/// [`set`]: ObservableCell::set
pub struct ObservableCell<Item> {
  core: MutRc<CellCore<Item>>,
}

impl<Item> Clone for ObservableCell<Item> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<Item> ObservableCell<Item> {
  pub fn new(initial: Item) -> Self { Self { core: MutRc::own(CellCore::plain(initial)) } }
}

impl<Item: Clone + 'static> ObservableCell<Item> {
  /// The current value; a tracked read.
  pub fn current(&self) -> Item {
    cell_core::record_read(&self.core);
    self.core.rc_deref().value.clone()
  }

  /// Replace the value and notify dependents.
  pub fn set(&self, value: Item) { CellWriter::new(self.core.clone()).write(value); }
}
