//! `rxplay` is a small reactive extensions library: cold observables, hot subjects
//! and a set of combining, filtering and accumulating operators.
//!
//! An [`Observable`] describes a producer. Subscribing with a [`Subscriber`] runs the
//! producer, and the returned [`Subscription`] stops it again. Subjects
//! ([`PublishSubject`], [`BehaviorSubject`], [`ReplaySubject`], [`Variable`]) are
//! hot: they multicast whatever they are fed to everyone subscribed at that moment.
//!
//! Events are pushed synchronously on the thread that produces them unless a
//! [`Scheduler`] is involved (`delay`, `interval`, `timer`).
//!
//! # Example
//!
//! ```no_run
//! use rxplay::{Observable, ObservableExt, Subscribeable, Subscriber};
//!
//! Observable::of([1, 2, 2, 3, 3, 3])
//!     .distinct_until_changed()
//!     .scan(0, |acc, v| acc + v)
//!     .subscribe(Subscriber::new(
//!         |total| println!("running total {}", total),
//!         |e| eprintln!("error {}", e),
//!         || println!("done"),
//!     ));
//! ```
//!
//! [`PublishSubject`]: subjects::PublishSubject
//! [`BehaviorSubject`]: subjects::BehaviorSubject
//! [`ReplaySubject`]: subjects::ReplaySubject
//! [`Variable`]: subjects::Variable
//! [`Scheduler`]: scheduler::Scheduler

mod errors;
pub mod observable;
pub mod observer;
pub mod scheduler;
pub mod subjects;
pub mod subscription;

pub use errors::*;
pub use observable::{Observable, ObservableExt, Single, SingleObserver};
pub use observer::{Event, Observer};
pub use subscription::dispose_bag::DisposeBag;
pub use subscription::subscribe;
pub use subscription::subscribe::{
    Disposable, Subscribeable, Subscriber, Subscription, UnsubscribeLogic,
};
