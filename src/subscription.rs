//! Subscription handles for cancelling active work.

/// Handle returned when something starts observing; consuming it cancels
/// the observation.
///
/// Dropping a subscription without calling [`unsubscribe`] leaves the
/// underlying work running — wrap it in a [`SubscriptionGuard`] for RAII
/// behavior.
///
/// [`unsubscribe`]: Subscription::unsubscribe
pub trait Subscription {
  /// Cancel the subscription, releasing whatever it holds open.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;
}

/// Unit subscription: nothing to cancel, always closed.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

/// One-shot subscription backed by a teardown closure.
#[derive(Clone)]
pub struct ClosureSubscription<F>(pub F);

impl<F: FnOnce()> Subscription for ClosureSubscription<F> {
  #[inline]
  fn unsubscribe(self) { (self.0)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// An RAII wrapper that unsubscribes when dropped.
///
/// If you want to drop it immediately, wrap it in its own scope.
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> Self { Self(Some(subscription)) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}
