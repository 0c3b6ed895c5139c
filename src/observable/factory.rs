use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::observable::{Observable, SharedSubscriber};
use crate::observer::Observer;
use crate::scheduler::Scheduler;
use crate::subscription::subscribe::{Subscriber, Subscription};
use crate::ObservableError;

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Emits each of `values` in order, then completes.
    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        let values: Vec<T> = values.into_iter().collect();
        Observable::new(move |mut o| {
            for v in values.iter() {
                if o.is_closed() {
                    break;
                }
                o.next(v.clone());
            }
            o.complete();
            Subscription::empty()
        })
    }

    /// Emits a single value, then completes.
    pub fn just(value: T) -> Self {
        Observable::new(move |mut o| {
            o.next(value.clone());
            o.complete();
            Subscription::empty()
        })
    }

    /// Walks a fresh clone of `iterable` on every subscription.
    ///
    /// Unbounded iterables are fine as long as something downstream (`take`,
    /// `element_at`, disposal from a handler) closes the subscriber.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    {
        Observable::new(move |mut o| {
            for v in iterable.clone() {
                if o.is_closed() {
                    break;
                }
                o.next(v);
            }
            o.complete();
            Subscription::empty()
        })
    }
}

impl<T: 'static> Observable<T> {
    /// Completes immediately without emitting.
    pub fn empty() -> Self {
        Observable::new(|mut o| {
            o.complete();
            Subscription::empty()
        })
    }

    /// Never emits and never terminates.
    pub fn never() -> Self {
        Observable::new(|_| Subscription::empty())
    }

    /// Errors immediately with `error`.
    pub fn throw(error: ObservableError) -> Self {
        Observable::new(move |mut o| {
            o.error(Arc::clone(&error));
            Subscription::empty()
        })
    }
}

impl Observable<u64> {
    /// Emits `0, 1, 2, ...`, one value per `period`, on `scheduler`. Never completes.
    pub fn interval<S: Scheduler>(period: Duration, scheduler: S) -> Self {
        Observable::new(move |o| {
            let o: SharedSubscriber<u64> = Arc::new(Mutex::new(o));
            schedule_tick(scheduler.clone(), period, o, 0);
            Subscription::empty()
        })
    }

    /// Emits `0` once after `delay`, then completes.
    pub fn timer<S: Scheduler>(delay: Duration, scheduler: S) -> Self {
        Observable::new(move |o: Subscriber<u64>| {
            let o = Arc::new(Mutex::new(o));
            let o_cloned = Arc::clone(&o);
            let task = scheduler.schedule(
                delay,
                Box::new(move || {
                    let mut o = o_cloned.lock();
                    o.next(0);
                    o.complete();
                }),
            );
            o.lock().add_teardown(task);
            Subscription::empty()
        })
    }
}

fn schedule_tick<S: Scheduler>(scheduler: S, period: Duration, o: SharedSubscriber<u64>, tick: u64) {
    if o.lock().is_closed() {
        return;
    }
    let next_scheduler = scheduler.clone();
    let o_cloned = Arc::clone(&o);
    let task = scheduler.schedule(
        period,
        Box::new(move || {
            {
                let mut o = o_cloned.lock();
                if o.is_closed() {
                    return;
                }
                o.next(tick);
            }
            schedule_tick(next_scheduler, period, o_cloned, tick + 1);
        }),
    );
    o.lock().add_teardown(task);
}
