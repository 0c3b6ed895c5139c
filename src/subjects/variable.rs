use super::BehaviorSubject;
use crate::observable::{Observable, ObservableExt};
use crate::observer::Observer;

/// A mutable cell whose changes can be observed.
///
/// `Variable` wraps a [`BehaviorSubject`]: subscribers first receive the current
/// value, then every later assignment. It can be set but never errored, and its
/// observers are completed when the `Variable` is dropped.
///
/// # Example
///
/// ```no_run
/// use rxplay::subjects::Variable;
/// use rxplay::{Subscribeable, Subscriber};
///
/// let mut variable = Variable::new("Initial value");
/// variable.set("New initial value");
///
/// // Receives "New initial value", then "1".
/// variable
///     .as_observable()
///     .subscribe(Subscriber::on_next(|v| println!("{}", v)));
///
/// variable.set("1");
/// ```
pub struct Variable<T: Clone + Send + 'static> {
    subject: BehaviorSubject<T>,
}

impl<T: Clone + Send + 'static> Variable<T> {
    pub fn new(value: T) -> Self {
        Variable {
            subject: BehaviorSubject::new(value),
        }
    }

    /// Returns a copy of the current value.
    pub fn value(&self) -> T {
        self.subject.value()
    }

    /// Replaces the current value and notifies every subscriber.
    pub fn set(&mut self, value: T) {
        self.subject.next(value);
    }

    /// Read-only view of the value stream. It completes when the `Variable` is
    /// dropped.
    pub fn as_observable(&self) -> Observable<T> {
        self.subject.clone().as_observable()
    }
}

impl<T: Clone + Send + 'static> Drop for Variable<T> {
    fn drop(&mut self) {
        self.subject.complete();
    }
}
