use std::{
    fmt,
    future::Future,
    mem,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use tokio::runtime;
use tracing::{trace, warn};

use crate::observer::{Event, Observer};
use crate::ObservableError;

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values emitted by an observable stream.
pub trait Subscribeable {
    /// The type of items emitted by the observable stream.
    type ObsType;

    /// Subscribes to the observable stream and specifies how to handle emitted values.
    ///
    /// The returned `Subscription` is the subscriber's own handle: disposing it stops
    /// delivery to that subscriber and releases everything the subscription holds
    /// upstream.
    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription;
}

/// A cancellation handle.
///
/// `dispose` must be idempotent and must be safe to call from inside an event
/// handler of the subscription being disposed.
pub trait Disposable {
    /// Releases the resources held by this handle. Calling it again is a no-op.
    fn dispose(&self);

    /// Returns `true` once `dispose` has been called.
    fn is_disposed(&self) -> bool;
}

type NextFn<T> = Box<dyn FnMut(T) + Send>;
type CompleteFn = Box<dyn FnMut() + Send>;
type ErrorFn = Box<dyn FnMut(ObservableError) + Send>;

/// A type that acts as an observer, allowing users to handle emitted values, errors,
/// and completion when subscribing to an `Observable` or a subject.
///
/// Every `Subscriber` owns a `Subscription`. Once the subscriber received a
/// terminal event, or once that subscription is disposed, the subscriber is closed
/// and silently drops everything it is handed.
pub struct Subscriber<NextFnType> {
    next_fn: NextFn<NextFnType>,
    complete_fn: Option<CompleteFn>,
    error_fn: Option<ErrorFn>,
    subscription: Subscription,
    stopped: bool,
}

impl<NextFnType> Subscriber<NextFnType> {
    /// Creates a new `Subscriber` instance with custom handling functions for emitted
    /// values, errors, and completion.
    pub fn new(
        next_fn: impl FnMut(NextFnType) + 'static + Send,
        error_fn: impl FnMut(ObservableError) + 'static + Send,
        complete_fn: impl FnMut() + 'static + Send,
    ) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: Some(Box::new(complete_fn)),
            error_fn: Some(Box::new(error_fn)),
            subscription: Subscription::empty(),
            stopped: false,
        }
    }

    /// Create a new Subscriber with the provided `next` function.
    ///
    /// Errors reaching a subscriber without an error function are logged and
    /// otherwise dropped.
    pub fn on_next(next_fn: impl FnMut(NextFnType) + 'static + Send) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: None,
            error_fn: None,
            subscription: Subscription::empty(),
            stopped: false,
        }
    }

    /// Create a new Subscriber that receives every notification as an `Event`.
    pub fn on_event(event_fn: impl FnMut(Event<NextFnType>) + 'static + Send) -> Self
    where
        NextFnType: 'static,
    {
        let event_fn = Arc::new(Mutex::new(event_fn));
        let event_fn_e = Arc::clone(&event_fn);
        let event_fn_c = Arc::clone(&event_fn);

        Subscriber::new(
            move |v| (&mut *event_fn.lock())(Event::Next(v)),
            move |e| (&mut *event_fn_e.lock())(Event::Error(e)),
            move || (&mut *event_fn_c.lock())(Event::Completed),
        )
    }

    /// Set the completion function for the Subscriber.
    pub fn on_complete(&mut self, complete_fn: impl FnMut() + 'static + Send) {
        self.complete_fn = Some(Box::new(complete_fn));
    }

    /// Set the error-handling function for the Subscriber.
    pub fn on_error(&mut self, error_fn: impl FnMut(ObservableError) + 'static + Send) {
        self.error_fn = Some(Box::new(error_fn));
    }

    /// The subscription owned by this subscriber.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Returns `true` after a terminal event or after the subscription was disposed.
    ///
    /// Producers should check it between emissions and stop early when it is set.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.stopped || self.subscription.is_disposed()
    }

    /// Registers cleanup that runs when this subscriber's subscription is disposed.
    pub fn add_teardown(&self, teardown: impl Into<UnsubscribeLogic>) {
        self.subscription.add(teardown);
    }
}

impl<T> Observer for Subscriber<T> {
    type NextFnType = T;

    fn next(&mut self, v: Self::NextFnType) {
        if self.is_closed() {
            return;
        }
        (self.next_fn)(v);
    }

    fn complete(&mut self) {
        if self.is_closed() {
            return;
        }
        self.stopped = true;
        if let Some(cfn) = &mut self.complete_fn {
            (cfn)();
        }
        self.subscription.dispose();
    }

    fn error(&mut self, observable_error: ObservableError) {
        if self.is_closed() {
            return;
        }
        self.stopped = true;
        match &mut self.error_fn {
            Some(efn) => (efn)(observable_error),
            None => warn!(error = %observable_error, "unhandled error reached a subscriber"),
        }
        self.subscription.dispose();
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("stopped", &self.stopped)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

struct SubscriptionInner {
    disposed: AtomicBool,
    teardowns: Mutex<Vec<UnsubscribeLogic>>,
    runtime_handle: Option<runtime::Handle>,
}

/// Represents a subscription to an observable or a subject, allowing control over
/// the subscription.
///
/// `Subscription` is a cheap, clonable handle: every clone refers to the same
/// subscription. Dropping a handle does not dispose it.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    /// Creates a new `Subscription` holding the given unsubscribe logic.
    #[must_use]
    pub fn new(unsubscribe_logic: UnsubscribeLogic) -> Self {
        let s = Subscription::empty();
        s.add(unsubscribe_logic);
        s
    }

    /// Creates a `Subscription` with no teardown logic.
    #[must_use]
    pub fn empty() -> Self {
        Subscription {
            inner: Arc::new(SubscriptionInner {
                disposed: AtomicBool::new(false),
                teardowns: Mutex::new(Vec::new()),
                runtime_handle: runtime::Handle::try_current().ok(),
            }),
        }
    }

    /// Adds teardown logic to this subscription.
    ///
    /// If the subscription is already disposed the logic runs right away.
    pub fn add(&self, teardown: impl Into<UnsubscribeLogic>) {
        let teardown = teardown.into();
        if let UnsubscribeLogic::Nil = teardown {
            return;
        }
        if let UnsubscribeLogic::Wrapped(s) = &teardown {
            if Arc::ptr_eq(&s.inner, &self.inner) {
                return;
            }
        }
        {
            let mut teardowns = self.inner.teardowns.lock();
            if !self.is_disposed() {
                teardowns.retain(|t| !matches!(t, UnsubscribeLogic::Wrapped(s) if s.is_disposed()));
                teardowns.push(teardown);
                return;
            }
        }
        teardown.unsubscribe(self.runtime_handle());
    }

    /// Returns `true` if both handles refer to the same subscription.
    #[must_use]
    pub fn ptr_eq(&self, other: &Subscription) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn runtime_handle(&self) -> Option<runtime::Handle> {
        if let Ok(handle) = runtime::Handle::try_current() {
            return Some(handle);
        }
        self.inner.runtime_handle.clone()
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let teardowns = mem::take(&mut *self.inner.teardowns.lock());
        trace!(teardowns = teardowns.len(), "disposing subscription");
        let runtime_handle = self.runtime_handle();
        for teardown in teardowns {
            teardown.unsubscribe(runtime_handle.clone());
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Subscription::empty()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Enumerates various unsubscribe logic options for a subscription.
pub enum UnsubscribeLogic {
    /// No specific unsubscribe logic.
    Nil,

    /// If one subscription depends on another. Wrapped subscription's `dispose`
    /// will be called upon unsubscribing.
    Wrapped(Subscription),

    /// Unsubscribe logic defined by a function.
    Logic(Box<dyn FnOnce() + Send>),

    /// Asynchronous unsubscribe logic represented by a future, spawned on the
    /// `Tokio` runtime that was current when the subscription was created.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

impl UnsubscribeLogic {
    fn unsubscribe(self, runtime_handle: Option<runtime::Handle>) {
        match self {
            UnsubscribeLogic::Nil => (),
            UnsubscribeLogic::Logic(fnc) => fnc(),
            UnsubscribeLogic::Wrapped(subscription) => subscription.dispose(),
            UnsubscribeLogic::Future(future) => match runtime_handle {
                Some(handle) => {
                    handle.spawn(future);
                }
                None => warn!("async unsubscribe logic dropped, no Tokio runtime available"),
            },
        }
    }
}

impl From<Subscription> for UnsubscribeLogic {
    fn from(s: Subscription) -> Self {
        UnsubscribeLogic::Wrapped(s)
    }
}
