//! Listenable source → reactive cell.

use crate::{
  cell::{CellConfig, CellSink, ResourceCell},
  listenable::{BoxTalkback, Event, Listenable, Sink},
  rc::{MutRc, RcDerefMut},
};

/// Convert a listenable source into a lazily-started reactive cell.
///
/// The cell is inert until first observed; observing it zero times performs
/// zero work on `source`. On first observation the source is greeted and
/// consumed as a strict one-at-a-time pull stream: the talkback is pulled
/// once after the start event and once after each data event, each value
/// fully absorbed into the cell — dependents notified and all — before the
/// next one is requested. When the cell's last observer detaches, the
/// talkback is terminated exactly once; observing the cell again starts a
/// fresh subscription on a clone of the source.
///
/// Assumes the source protocol's guarantee that the start event arrives
/// synchronously, before any data or end event; a teardown that races a
/// source violating this finds no talkback and releases nothing.
///
/// ```rust
/// use cellbridge::prelude::*;
///
/// #[derive(Clone)]
/// struct Silent;
/// impl Listenable for Silent {
///   type Item = i32;
///   type Err = std::convert::Infallible;
///   fn signal<S>(self, _: EventKind, _: S)
///   where
///     S: Sink<i32> + 'static,
///   {
///   }
/// }
///
/// let cell = as_cell(Silent, CellConfig::with_initial(-1));
/// assert_eq!(cell.current(), Some(-1));
/// ```
pub fn as_cell<S>(source: S, config: CellConfig<S::Item>) -> ResourceCell<S::Item>
where
  S: Listenable + Clone + 'static,
  S::Item: 'static,
  S::Err: 'static,
{
  let slot = MutRc::own(TalkbackSlot::default());
  let stop_slot = slot.clone();
  ResourceCell::new(
    move |cell| {
      // Each observation cycle is an independent stream instance.
      *slot.rc_deref_mut() = TalkbackSlot::default();
      source
        .clone()
        .listen(PullSink { cell, slot: slot.clone() });
    },
    move || {
      let talkback = {
        let mut state = stop_slot.rc_deref_mut();
        if state.terminated {
          return;
        }
        state.terminated = true;
        state.talkback.take()
      };
      match talkback {
        Some(mut talkback) => talkback.terminate(),
        // The pump holds the talkback; it terminates on the way out.
        None => {}
      }
    },
    config,
  )
}

/// Explicit subscription state, populated during the start event and read
/// during teardown.
#[derive(Default)]
struct TalkbackSlot {
  talkback: Option<BoxTalkback>,
  /// Pulls requested but not yet issued.
  pending: usize,
  /// A pull loop is active further down the stack.
  pumping: bool,
  terminated: bool,
}

struct PullSink<Item> {
  cell: CellSink<Item>,
  slot: MutRc<TalkbackSlot>,
}

impl<Item, Err> Sink<Item, Err> for PullSink<Item> {
  fn deliver(&mut self, event: Event<Item, Err>) {
    match event {
      Event::Start(mut talkback) => {
        let mut slot = self.slot.rc_deref_mut();
        if slot.terminated {
          drop(slot);
          talkback.terminate();
          return;
        }
        slot.talkback = Some(talkback);
        drop(slot);
        self.pump();
      }
      Event::Data(value) => {
        self.cell.put(value);
        self.pump();
      }
      // Stream over; never request again. Teardown still owns the
      // terminate signal, as ending a stream does not release the handle.
      Event::End(_) => {}
    }
  }
}

impl<Item> PullSink<Item> {
  /// Request the next value, exactly once per absorbed event.
  ///
  /// A source may answer a pull by synchronously delivering the next data
  /// event, whose absorption requests yet another pull; the pending counter
  /// un-nests that recursion so pulls are issued strictly one at a time and
  /// never while the talkback is already on the stack.
  fn pump(&mut self) {
    {
      let mut slot = self.slot.rc_deref_mut();
      slot.pending += 1;
      if slot.pumping {
        return;
      }
      slot.pumping = true;
    }
    loop {
      let mut talkback = {
        let mut slot = self.slot.rc_deref_mut();
        if slot.terminated || slot.pending == 0 {
          slot.pumping = false;
          return;
        }
        match slot.talkback.take() {
          Some(talkback) => {
            slot.pending -= 1;
            talkback
          }
          // Start event not seen yet; the pull is issued once it is.
          None => {
            slot.pumping = false;
            return;
          }
        }
      };
      talkback.pull();
      let mut slot = self.slot.rc_deref_mut();
      if slot.terminated {
        // Teardown ran while we held the talkback.
        slot.pumping = false;
        drop(slot);
        talkback.terminate();
        return;
      }
      slot.talkback = Some(talkback);
    }
  }
}
