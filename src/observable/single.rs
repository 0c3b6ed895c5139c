use std::sync::Arc;

use parking_lot::Mutex;

use crate::observable::{forward_events, Observable};
use crate::observer::{Event, Observer};
use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};
use crate::{ObservableError, RxError};

/// An observable that produces exactly one value or one error.
///
/// # Example
///
/// ```no_run
/// use rxplay::Single;
///
/// let greeting = Single::create(|observer| {
///     observer.resolve(Ok("hello".to_string()));
///     rxplay::Subscription::empty()
/// });
///
/// greeting.subscribe_result(|result| match result {
///     Ok(text) => println!("{}", text),
///     Err(e) => eprintln!("{}", e),
/// });
/// ```
pub struct Single<T> {
    observable: Observable<T>,
}

impl<T> Clone for Single<T> {
    fn clone(&self) -> Self {
        Single {
            observable: self.observable.clone(),
        }
    }
}

/// The one-shot producer side handed to [`Single::create`].
///
/// Dropping it without resolving errors the `Single` with `RxError::NoElements`.
pub struct SingleObserver<T> {
    subscriber: Option<Subscriber<T>>,
}

impl<T> SingleObserver<T> {
    /// Emits the value and completes.
    pub fn success(self, value: T) {
        self.resolve(Ok(value));
    }

    /// Terminates with `error`.
    pub fn failure(self, error: ObservableError) {
        self.resolve(Err(error));
    }

    pub fn resolve(mut self, result: Result<T, ObservableError>) {
        if let Some(mut s) = self.subscriber.take() {
            match result {
                Ok(v) => {
                    s.next(v);
                    s.complete();
                }
                Err(e) => s.error(e),
            }
        }
    }

    /// Returns `true` if nobody is listening anymore.
    pub fn is_closed(&self) -> bool {
        self.subscriber.as_ref().map_or(true, |s| s.is_closed())
    }
}

impl<T> Drop for SingleObserver<T> {
    fn drop(&mut self) {
        if let Some(mut s) = self.subscriber.take() {
            s.error(RxError::NoElements.into());
        }
    }
}

impl<T: 'static> Single<T> {
    /// Creates a `Single` from a producer that resolves a [`SingleObserver`].
    pub fn create(
        producer: impl Fn(SingleObserver<T>) -> Subscription + Send + Sync + 'static,
    ) -> Self {
        Single {
            observable: Observable::new(move |s| {
                producer(SingleObserver {
                    subscriber: Some(s),
                })
            }),
        }
    }

    /// A `Single` that fails with `error`.
    pub fn error(error: ObservableError) -> Self {
        Single {
            observable: Observable::throw(error),
        }
    }

    /// Takes the first value of `source`, or errors with `RxError::NoElements` if it
    /// completes empty.
    pub fn from_observable<S>(source: S) -> Self
    where
        S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    {
        Single {
            observable: Observable::new(move |o| {
                let o = Arc::new(Mutex::new(o));
                let u = forward_events(&o, |o, event| match event {
                    Event::Next(v) => {
                        o.next(v);
                        o.complete();
                    }
                    Event::Error(e) => o.error(e),
                    Event::Completed => o.error(RxError::NoElements.into()),
                });
                source.subscribe(u)
            }),
        }
    }

    /// Subscribes with a single callback receiving the outcome.
    pub fn subscribe_result(
        &self,
        on_result: impl FnOnce(Result<T, ObservableError>) + Send + 'static,
    ) -> Subscription {
        let on_result = Arc::new(Mutex::new(Some(on_result)));
        let on_result_e = Arc::clone(&on_result);
        self.observable.subscribe(Subscriber::new(
            move |v| {
                if let Some(f) = on_result.lock().take() {
                    f(Ok(v));
                }
            },
            move |e| {
                if let Some(f) = on_result_e.lock().take() {
                    f(Err(e));
                }
            },
            || {},
        ))
    }
}

impl<T: Clone + Send + Sync + 'static> Single<T> {
    /// A `Single` that succeeds with `value`.
    pub fn just(value: T) -> Self {
        Single {
            observable: Observable::just(value),
        }
    }
}

impl<T: 'static> Subscribeable for Single<T> {
    type ObsType = T;

    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription {
        self.observable.subscribe(s)
    }
}
