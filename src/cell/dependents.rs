use std::rc::Rc;

use smallvec::SmallVec;

use super::track::Dependent;

/// A cell's registry of attached dependents, with ID-based removal.
///
/// Uses `SmallVec<[_; 2]>` to avoid heap allocation for the common case of
/// one or two observers. Entries are owned strongly: as in any subject, a
/// dependent stays attached until it is explicitly removed, regardless of
/// what happens to the handle that attached it.
pub(crate) struct Dependents {
  next_id: usize,
  entries: SmallVec<[(usize, Rc<dyn Dependent>); 2]>,
}

impl Default for Dependents {
  fn default() -> Self { Self { next_id: 0, entries: SmallVec::new() } }
}

impl Dependents {
  /// Add a dependent and return its unique ID.
  pub(crate) fn add(&mut self, dependent: Rc<dyn Dependent>) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.entries.push((id, dependent));
    id
  }

  /// Remove a dependent by ID.
  pub(crate) fn remove(&mut self, id: usize) -> Option<Rc<dyn Dependent>> {
    self
      .entries
      .iter()
      .position(|(entry_id, _)| *entry_id == id)
      .map(|pos| self.entries.remove(pos).1)
  }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.entries.len() }

  #[inline]
  pub(crate) fn is_empty(&self) -> bool { self.len() == 0 }

  /// Clone out the current dependents so they can be notified without
  /// holding the registry borrow across user code.
  pub(crate) fn snapshot(&self) -> SmallVec<[Rc<dyn Dependent>; 2]> {
    self
      .entries
      .iter()
      .map(|(_, dependent)| dependent.clone())
      .collect()
  }
}
