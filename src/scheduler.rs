//! Schedulers decide where and when delayed work runs.
//!
//! Operators that deal with time (`delay`, `interval`, `timer`) take a scheduler
//! argument instead of spawning threads or tasks on their own, so the same chain can
//! run inline, on OS threads or on a `Tokio` runtime.

use std::{cell::RefCell, collections::VecDeque, fmt, thread, time::Duration};

use tokio::runtime::{self, TryCurrentError};

use crate::subscription::subscribe::{Disposable, Subscription, UnsubscribeLogic};

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send>;

/// Runs tasks after a delay.
///
/// The returned `Subscription` cancels the task if it has not started yet. It is
/// disposed by the scheduler once the task ran.
pub trait Scheduler: Clone + Send + Sync + 'static {
    fn schedule(&self, delay: Duration, task: Task) -> Subscription;
}

/// Runs every task on the calling thread, blocking for the delay first.
///
/// A task scheduled from inside a running task is queued and runs once the current
/// one returns, so recurring work (`interval`) loops instead of growing the stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

type Queued = (Duration, Task, Subscription);

thread_local! {
    // `Some` while a task of this thread's trampoline is running.
    static TRAMPOLINE: RefCell<Option<VecDeque<Queued>>> = const { RefCell::new(None) };
}

/// Clears the trampoline when the draining call returns or unwinds.
struct TrampolineGuard;

impl Drop for TrampolineGuard {
    fn drop(&mut self) {
        TRAMPOLINE.with(|queue| *queue.borrow_mut() = None);
    }
}

fn run_queued((delay, task, subscription): Queued) {
    if subscription.is_disposed() {
        return;
    }
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    task();
    subscription.dispose();
}

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Subscription {
        let subscription = Subscription::empty();
        let entry = (delay, task, subscription.clone());

        let first = TRAMPOLINE.with(|queue| {
            let mut queue = queue.borrow_mut();
            match queue.as_mut() {
                Some(pending) => {
                    pending.push_back(entry);
                    None
                }
                None => {
                    *queue = Some(VecDeque::new());
                    Some(entry)
                }
            }
        });
        let Some(first) = first else {
            return subscription;
        };

        let _guard = TrampolineGuard;
        run_queued(first);
        while let Some(next) =
            TRAMPOLINE.with(|queue| queue.borrow_mut().as_mut().and_then(VecDeque::pop_front))
        {
            run_queued(next);
        }
        subscription
    }
}

/// Spawns one OS thread per task.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Subscription {
        let subscription = Subscription::empty();
        let subscription_cloned = subscription.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            if subscription_cloned.is_disposed() {
                return;
            }
            task();
            subscription_cloned.dispose();
        });
        subscription
    }
}

/// Spawns tasks on a `Tokio` runtime. Disposal aborts a pending task.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: runtime::Handle,
}

impl TokioScheduler {
    /// Schedules onto the runtime behind `handle`.
    pub fn new(handle: runtime::Handle) -> Self {
        TokioScheduler { handle }
    }

    /// Schedules onto the runtime the caller is running in.
    pub fn try_current() -> Result<Self, TryCurrentError> {
        runtime::Handle::try_current().map(TokioScheduler::new)
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("runtime", &self.handle.runtime_flavor())
            .finish()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Subscription {
        let subscription = Subscription::empty();
        let subscription_cloned = subscription.clone();
        let join_handle = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if subscription_cloned.is_disposed() {
                return;
            }
            task();
            subscription_cloned.dispose();
        });
        let abort_handle = join_handle.abort_handle();
        subscription.add(UnsubscribeLogic::Logic(Box::new(move || abort_handle.abort())));
        subscription
    }
}
