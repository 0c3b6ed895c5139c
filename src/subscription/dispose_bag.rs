use std::mem;

use parking_lot::Mutex;
use tracing::trace;

use super::subscribe::{Disposable, Subscription};

/// An owner-scoped collection of subscriptions.
///
/// Every subscription inserted into the bag is disposed when the bag is dropped
/// or when `dispose` is called. Subscriptions inserted after the bag was
/// disposed are disposed right away.
#[derive(Default)]
pub struct DisposeBag {
    subscriptions: Mutex<Vec<Subscription>>,
    disposed: Mutex<bool>,
}

impl DisposeBag {
    #[must_use]
    pub fn new() -> Self {
        DisposeBag::default()
    }

    pub fn insert(&self, subscription: Subscription) {
        let disposed = self.disposed.lock();
        if *disposed {
            drop(disposed);
            subscription.dispose();
            return;
        }
        let mut subscriptions = self.subscriptions.lock();
        subscriptions.retain(|s| !s.is_disposed());
        subscriptions.push(subscription);
    }

    /// Number of subscriptions currently held. Entries disposed elsewhere are
    /// released on the next `insert`.
    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Disposable for DisposeBag {
    fn dispose(&self) {
        let subscriptions = {
            let mut disposed = self.disposed.lock();
            *disposed = true;
            mem::take(&mut *self.subscriptions.lock())
        };
        trace!(count = subscriptions.len(), "dispose bag released");
        for s in subscriptions {
            s.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        *self.disposed.lock()
    }
}

impl Drop for DisposeBag {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Subscription {
    /// Hands this subscription over to `bag`.
    pub fn disposed_by(self, bag: &DisposeBag) {
        bag.insert(self);
    }
}
