use std::sync::Arc;

use parking_lot::Mutex;

use crate::observable::{forward_events, forward_to, Observable};
use crate::observer::{Event, Observer};
use crate::subscription::subscribe::Subscribeable;

pub(super) fn scan<S, T, R, F>(source: S, seed: R, accumulator: F) -> Observable<R>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
    R: Clone + Send + Sync + 'static,
    F: Fn(R, T) -> R + Send + Sync + 'static,
{
    let accumulator = Arc::new(accumulator);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let accumulator = Arc::clone(&accumulator);
        let mut acc = seed.clone();
        let u = forward_to(&o, move |o, v| {
            let next_acc = accumulator(acc.clone(), v);
            acc = next_acc.clone();
            o.next(next_acc);
        });
        source.subscribe(u)
    })
}

pub(super) fn reduce<S, T, R, F>(source: S, seed: R, accumulator: F) -> Observable<R>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
    R: Clone + Send + Sync + 'static,
    F: Fn(R, T) -> R + Send + Sync + 'static,
{
    let accumulator = Arc::new(accumulator);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let accumulator = Arc::clone(&accumulator);
        let mut acc = Some(seed.clone());
        let u = forward_events(&o, move |o, event| match event {
            Event::Next(v) => {
                acc = acc.take().map(|a| accumulator(a, v));
            }
            Event::Error(e) => o.error(e),
            Event::Completed => {
                if let Some(a) = acc.take() {
                    o.next(a);
                }
                o.complete();
            }
        });
        source.subscribe(u)
    })
}
