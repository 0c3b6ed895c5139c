//! The `observable` module provides the building blocks for creating and manipulating
//! observables: the `Observable` type, its factories and the `ObservableExt`
//! operator set.

mod aggregate;
mod combining;
mod factory;
mod filtering;
mod single;
mod timing;

pub use single::{Single, SingleObserver};

use std::{fmt::Debug, sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::observer::{Event, Observer};
use crate::scheduler::Scheduler;
use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};

/// The `Observable` struct represents a lazy source of values that can be observed
/// and transformed.
///
/// An `Observable` only describes how to produce events. Nothing happens until it is
/// subscribed, and every subscription runs the producer again (cold semantics).
/// Cloning an `Observable` is cheap and shares the producer.
///
/// # Example
///
/// ```no_run
/// use rxplay::{Observable, ObservableExt, Observer, Subscribeable, Subscriber, Subscription};
///
/// let evens = Observable::new(|mut subscriber: Subscriber<i32>| {
///     for i in 1..=10 {
///         if subscriber.is_closed() {
///             break;
///         }
///         subscriber.next(i);
///     }
///     subscriber.complete();
///     Subscription::empty()
/// })
/// .filter(|v| v % 2 == 0);
///
/// evens.subscribe(Subscriber::new(
///     |v| println!("Emitted {}", v),
///     |e| eprintln!("Error {}", e),
///     || println!("Completed"),
/// ));
/// ```
pub struct Observable<T> {
    subscribe_fn: Arc<dyn Fn(Subscriber<T>) -> Subscription + Send + Sync>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Observable {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
        }
    }
}

impl<T> Observable<T> {
    /// Creates a new `Observable` with the provided subscribe function.
    ///
    /// The subscribe function runs once per subscription. It pushes events into the
    /// `Subscriber` it is handed and returns a `Subscription` holding whatever cleanup
    /// the producer needs (stopping a thread, cancelling a timer). Return
    /// `Subscription::empty()` when there is nothing to clean up.
    pub fn new(sf: impl Fn(Subscriber<T>) -> Subscription + Send + Sync + 'static) -> Self {
        Observable {
            subscribe_fn: Arc::new(sf),
        }
    }

    /// Alias of [`Observable::new`].
    pub fn create(sf: impl Fn(Subscriber<T>) -> Subscription + Send + Sync + 'static) -> Self {
        Observable::new(sf)
    }
}

impl<T: 'static> Subscribeable for Observable<T> {
    type ObsType = T;

    fn subscribe(&self, v: Subscriber<Self::ObsType>) -> Subscription {
        let subscription = v.subscription().clone();
        let teardown = (self.subscribe_fn)(v);
        subscription.add(teardown);
        subscription
    }
}

pub(crate) type SharedSubscriber<T> = Arc<Mutex<Subscriber<T>>>;

/// Builds an upstream `Subscriber` whose every event is handed to `on_event`
/// together with the locked downstream subscriber `o`.
///
/// The upstream subscription becomes a child of the downstream one, so disposing
/// (or terminating) downstream releases upstream as well.
pub(crate) fn forward_events<T, U>(
    o: &SharedSubscriber<U>,
    on_event: impl FnMut(&mut Subscriber<U>, Event<T>) + Send + 'static,
) -> Subscriber<T>
where
    T: 'static,
    U: 'static,
{
    let o_cloned = Arc::clone(o);
    let mut on_event = on_event;
    let u = Subscriber::on_event(move |event| on_event(&mut o_cloned.lock(), event));
    o.lock().add_teardown(u.subscription().clone());
    u
}

/// Like `forward_events`, but only values go through `next_fn`; errors and completion
/// are passed straight to `o`.
pub(crate) fn forward_to<T, U>(
    o: &SharedSubscriber<U>,
    mut next_fn: impl FnMut(&mut Subscriber<U>, T) + Send + 'static,
) -> Subscriber<T>
where
    T: 'static,
    U: 'static,
{
    forward_events(o, move |o, event| match event {
        Event::Next(v) => next_fn(o, v),
        Event::Error(e) => o.error(e),
        Event::Completed => o.complete(),
    })
}

/// The `ObservableExt` trait provides a set of extension methods that can be applied
/// to observables and subjects to transform and manipulate their behavior.
///
/// Every operator returns a new cold `Observable`; the source is subscribed once per
/// subscription to the result.
pub trait ObservableExt<T: Send + 'static>: Subscribeable<ObsType = T> {
    /// Type-erases any subscribeable source into an `Observable`.
    fn as_observable(self) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Observable::new(move |s| self.subscribe(s))
    }

    /// Transforms the items emitted by the observable using a transformation
    /// function.
    fn map<U, F>(self, f: F) -> Observable<U>
    where
        Self: Sized + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
        U: 'static,
    {
        filtering::map(self, f)
    }

    /// Forwards only the values for which `predicate` returns `true`.
    fn filter<P>(self, predicate: P) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        filtering::filter(self, predicate)
    }

    /// Drops the first `n` values.
    fn skip(self, n: usize) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        filtering::skip(self, n)
    }

    /// Drops values while `predicate` holds, then forwards everything from the first
    /// value that fails it. The predicate is not called again after that.
    fn skip_while<P>(self, predicate: P) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        filtering::skip_while(self, predicate)
    }

    /// Drops values until `trigger` emits its first value. Values emitted before that
    /// are lost.
    fn skip_until<R, N>(self, trigger: R) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        R: Subscribeable<ObsType = N> + Send + Sync + 'static,
        N: 'static,
    {
        filtering::skip_until(self, trigger)
    }

    /// Forwards a value only if it differs from the previously forwarded one.
    fn distinct_until_changed(self) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        T: PartialEq + Clone,
    {
        filtering::distinct_until_changed_by(self, |a: &T, b: &T| a == b)
    }

    /// Like `distinct_until_changed` with a custom equality; `same` returns `true`
    /// when two values count as equal.
    fn distinct_until_changed_by<F>(self, same: F) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        T: Clone,
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        filtering::distinct_until_changed_by(self, same)
    }

    /// Forwards only the value at zero-based `index`, then completes.
    ///
    /// Errors with `RxError::ArgumentOutOfRange` if the source completes before
    /// reaching `index`.
    fn element_at(self, index: usize) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        filtering::element_at(self, index)
    }

    /// Suppresses all values, forwarding only error and completion.
    fn ignore_elements(self) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        filtering::ignore_elements(self)
    }

    /// Forwards the first `n` values, then completes and disposes the source.
    fn take(self, n: usize) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        filtering::take(self, n)
    }

    /// Collects every value and emits them as one `Vec` when the source completes.
    fn to_array(self) -> Observable<Vec<T>>
    where
        Self: Sized + Send + Sync + 'static,
    {
        filtering::to_array(self)
    }

    /// Invokes `f` for every event before passing it on unchanged.
    fn tap<F>(self, f: F) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        F: Fn(&Event<T>) + Send + Sync + 'static,
    {
        filtering::tap(self, f)
    }

    /// Logs subscription, every event and disposal at `debug` level under `label`.
    fn debug(self, label: &str) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        T: Debug,
    {
        filtering::debug(self, label.to_owned())
    }

    /// Emits every intermediate accumulation, starting from `seed`.
    fn scan<R, F>(self, seed: R, accumulator: F) -> Observable<R>
    where
        Self: Sized + Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
        F: Fn(R, T) -> R + Send + Sync + 'static,
    {
        aggregate::scan(self, seed, accumulator)
    }

    /// Emits the final accumulation once the source completes.
    fn reduce<R, F>(self, seed: R, accumulator: F) -> Observable<R>
    where
        Self: Sized + Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
        F: Fn(R, T) -> R + Send + Sync + 'static,
    {
        aggregate::reduce(self, seed, accumulator)
    }

    /// Emits `prefix` synchronously, then everything from the source.
    fn start_with(self, prefix: impl IntoIterator<Item = T>) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        T: Clone + Sync,
    {
        combining::start_with(self, prefix.into_iter().collect())
    }

    /// Emits the whole source, then subscribes to `other`.
    fn concat<R>(self, other: R) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        R: Subscribeable<ObsType = T> + Send + Sync + 'static,
    {
        combining::concat(self, other)
    }

    /// Subscribes to every inner source emitted by this source and forwards all of
    /// their values in arrival order.
    fn merge_all<U>(self) -> Observable<U>
    where
        Self: Sized + Send + Sync + 'static,
        T: Subscribeable<ObsType = U>,
        U: 'static,
    {
        combining::merge_all(self)
    }

    /// Merges this source with `other`.
    fn merge_with<R>(self, other: R) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        R: Subscribeable<ObsType = T> + Send + Sync + 'static,
    {
        Observable::merge(vec![self.as_observable(), other.as_observable()])
    }

    /// Combines the latest values of this source and `other` with `combiner`.
    fn combine_latest_with<B, R, U, F>(self, other: R, combiner: F) -> Observable<U>
    where
        Self: Sized + Send + Sync + 'static,
        T: Clone,
        R: Subscribeable<ObsType = B> + Send + Sync + 'static,
        B: Clone + Send + 'static,
        U: 'static,
        F: Fn(T, B) -> U + Send + Sync + 'static,
    {
        combining::combine_latest(self, other, combiner)
    }

    /// Pairs the n-th value of this source with the n-th value of `other`.
    fn zip_with<B, R, U, F>(self, other: R, combiner: F) -> Observable<U>
    where
        Self: Sized + Send + Sync + 'static,
        R: Subscribeable<ObsType = B> + Send + Sync + 'static,
        B: Send + 'static,
        U: 'static,
        F: Fn(T, B) -> U + Send + Sync + 'static,
    {
        combining::zip(self, other, combiner)
    }

    /// Mirrors whichever of this source and `other` produces an event first and
    /// disposes the other one.
    fn amb<R>(self, other: R) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        R: Subscribeable<ObsType = T> + Send + Sync + 'static,
    {
        combining::amb(self, other)
    }

    /// Shifts values and completion by `duration` on `scheduler`. Errors are
    /// forwarded immediately.
    fn delay<S>(self, duration: Duration, scheduler: S) -> Observable<T>
    where
        Self: Sized + Send + Sync + 'static,
        S: Scheduler,
    {
        timing::delay(self, duration, scheduler)
    }
}

impl<O, T: Send + 'static> ObservableExt<T> for O where O: Subscribeable<ObsType = T> {}
