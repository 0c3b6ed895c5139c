use std::{
    fmt::Debug,
    mem,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use tracing::debug as log_debug;

use crate::observable::{forward_events, forward_to, Observable};
use crate::observer::{Event, Observer};
use crate::subscription::subscribe::{
    Disposable, Subscribeable, Subscriber, Subscription, UnsubscribeLogic,
};
use crate::RxError;

pub(super) fn map<S, T, U, F>(source: S, f: F) -> Observable<U>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
    U: 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let f = Arc::clone(&f);
        let u = forward_to(&o, move |o, v| o.next(f(v)));
        source.subscribe(u)
    })
}

pub(super) fn filter<S, T, P>(source: S, predicate: P) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let predicate = Arc::clone(&predicate);
        let u = forward_to(&o, move |o, v| {
            if predicate(&v) {
                o.next(v);
            }
        });
        source.subscribe(u)
    })
}

pub(super) fn skip<S, T>(source: S, n: usize) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
{
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let mut remaining = n;
        let u = forward_to(&o, move |o, v| {
            if remaining > 0 {
                remaining -= 1;
                return;
            }
            o.next(v);
        });
        source.subscribe(u)
    })
}

pub(super) fn skip_while<S, T, P>(source: S, predicate: P) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let predicate = Arc::clone(&predicate);
        let mut skipping = true;
        let u = forward_to(&o, move |o, v| {
            if skipping {
                if predicate(&v) {
                    return;
                }
                skipping = false;
            }
            o.next(v);
        });
        source.subscribe(u)
    })
}

pub(super) fn skip_until<S, T, R, N>(source: S, trigger: R) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
    R: Subscribeable<ObsType = N> + Send + Sync + 'static,
    N: 'static,
{
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let open = Arc::new(AtomicBool::new(false));

        // Slot for the trigger's own subscription, released after its first value.
        let trigger_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let open_t = Arc::clone(&open);
        let trigger_slot_n = Arc::clone(&trigger_slot);
        let o_cloned_e = Arc::clone(&o);
        let t = Subscriber::new(
            move |_: N| {
                open_t.store(true, Ordering::Release);
                if let Some(s) = trigger_slot_n.lock().take() {
                    s.dispose();
                }
            },
            move |e| o_cloned_e.lock().error(e),
            || {},
        );
        *trigger_slot.lock() = Some(t.subscription().clone());
        o.lock().add_teardown(t.subscription().clone());
        trigger.subscribe(t);

        let u = forward_to(&o, move |o, v| {
            if open.load(Ordering::Acquire) {
                o.next(v);
            }
        });
        source.subscribe(u)
    })
}

pub(super) fn distinct_until_changed_by<S, T, F>(source: S, same: F) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: Clone + Send + 'static,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    let same = Arc::new(same);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let same = Arc::clone(&same);
        let mut last: Option<T> = None;
        let u = forward_to(&o, move |o, v: T| {
            if let Some(prev) = &last {
                if same(prev, &v) {
                    return;
                }
            }
            last = Some(v.clone());
            o.next(v);
        });
        source.subscribe(u)
    })
}

pub(super) fn element_at<S, T>(source: S, index: usize) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
{
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let mut seen = 0;
        let u = forward_events(&o, move |o, event| match event {
            Event::Next(v) => {
                if seen == index {
                    o.next(v);
                    o.complete();
                }
                seen += 1;
            }
            Event::Error(e) => o.error(e),
            Event::Completed => o.error(RxError::ArgumentOutOfRange { index, len: seen }.into()),
        });
        source.subscribe(u)
    })
}

pub(super) fn ignore_elements<S, T>(source: S) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
{
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let u = forward_to(&o, |_, _| {});
        source.subscribe(u)
    })
}

pub(super) fn take<S, T>(source: S, n: usize) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
{
    Observable::new(move |mut o| {
        if n == 0 {
            o.complete();
            return Subscription::empty();
        }
        let o = Arc::new(Mutex::new(o));
        let mut taken = 0;
        let u = forward_to(&o, move |o, v| {
            taken += 1;
            o.next(v);
            if taken == n {
                o.complete();
            }
        });
        source.subscribe(u)
    })
}

pub(super) fn to_array<S, T>(source: S) -> Observable<Vec<T>>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: Send + 'static,
{
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let mut buffer = Vec::new();
        let u = forward_events(&o, move |o, event| match event {
            Event::Next(v) => buffer.push(v),
            Event::Error(e) => {
                buffer.clear();
                o.error(e);
            }
            Event::Completed => {
                o.next(mem::take(&mut buffer));
                o.complete();
            }
        });
        source.subscribe(u)
    })
}

pub(super) fn tap<S, T, F>(source: S, f: F) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
    F: Fn(&Event<T>) + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let f = Arc::clone(&f);
        let u = forward_events(&o, move |o, event| {
            f(&event);
            o.on(event);
        });
        source.subscribe(u)
    })
}

pub(super) fn debug<S, T>(source: S, label: String) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: Debug + 'static,
{
    let label: Arc<str> = label.into();
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        log_debug!(label = %label, "subscribed");

        let label_d = Arc::clone(&label);
        o.lock()
            .add_teardown(UnsubscribeLogic::Logic(Box::new(move || {
                log_debug!(label = %label_d, "disposed");
            })));

        let label_e = Arc::clone(&label);
        let u = forward_events(&o, move |o, event| {
            match &event {
                Event::Next(v) => log_debug!(label = %label_e, "next({:?})", v),
                Event::Error(e) => log_debug!(label = %label_e, error = %e, "error"),
                Event::Completed => log_debug!(label = %label_e, "completed"),
            }
            o.on(event);
        });
        source.subscribe(u)
    })
}
