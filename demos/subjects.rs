//! Subjects
//!
//! A subject is both an observer and an observable: values pushed into it with
//! `next` are multicast to every subscriber it currently holds. The flavors
//! differ only in what a new subscriber receives when it subscribes:
//!
//! - `PublishSubject` starts empty and only relays events emitted afterwards.
//! - `BehaviorSubject` replays its latest value (or its seed).
//! - `ReplaySubject` replays a buffer of past values.
//! - `Variable` wraps a `BehaviorSubject` and completes it when dropped.
//!
//! To run this example, execute `cargo run --example subjects`.

use std::{fmt::Display, sync::Arc};

use rxplay::{
    subjects::{BehaviorSubject, BufSize, PublishSubject, ReplaySubject, Variable},
    subscribe::Subscriber,
    Disposable, DisposeBag, ObservableExt, Observer, Subscribeable,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[error("An error occurred")]
struct DemoError;

pub fn create_subscriber<T: Display>(label: &'static str) -> Subscriber<T> {
    Subscriber::new(
        move |v| println!("{} -> {}", label, v),
        move |e| println!("{} -> error: {}", label, e),
        move || println!("{} -> completed", label),
    )
}

fn example(title: &str, body: impl FnOnce()) {
    println!("\n--- Example of: {} ---", title);
    body();
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    example("PublishSubject", || {
        let mut subject = PublishSubject::new();

        // No subscribers yet, lost.
        subject.next("Is anyone listening?");

        let subscription_one = subject.clone().subscribe(create_subscriber("1)"));
        subject.next("1");

        let bag = DisposeBag::new();
        subject
            .clone()
            .subscribe(create_subscriber("2)"))
            .disposed_by(&bag);

        subject.next("2");

        subscription_one.dispose();
        subject.next("3");

        subject.complete();
        // Terminated, dropped.
        subject.next("5");

        // A late subscriber only receives the terminal event.
        subject
            .clone()
            .subscribe(create_subscriber("3)"))
            .disposed_by(&bag);
        subject.next("?");
    });

    example("BehaviorSubject", || {
        let mut subject = BehaviorSubject::new("Initial value");
        let bag = DisposeBag::new();

        subject.next("X");

        subject
            .clone()
            .subscribe(create_subscriber("1)"))
            .disposed_by(&bag);

        subject.error(Arc::new(DemoError));

        subject
            .clone()
            .subscribe(create_subscriber("2)"))
            .disposed_by(&bag);

        println!("last value: {}", subject.value());
    });

    example("ReplaySubject", || {
        let mut subject = ReplaySubject::new(BufSize::Bounded(2));
        let bag = DisposeBag::new();

        subject.next("1");
        subject.next("2");
        subject.next("3");

        // Both receive the two latest values.
        subject
            .clone()
            .subscribe(create_subscriber("1)"))
            .disposed_by(&bag);
        subject
            .clone()
            .map(|v| format!("mapped {}", v))
            .subscribe(create_subscriber("2)"))
            .disposed_by(&bag);

        subject.next("4");
        subject.error(Arc::new(DemoError));

        // The buffer survives termination: "3", "4", then the error.
        subject
            .clone()
            .subscribe(create_subscriber("3)"))
            .disposed_by(&bag);
    });

    example("Variable", || {
        let mut variable = Variable::new("Initial value");
        let bag = DisposeBag::new();

        variable.set("New initial value");

        variable
            .as_observable()
            .subscribe(create_subscriber("1)"))
            .disposed_by(&bag);

        variable.set("1");

        variable
            .as_observable()
            .subscribe(create_subscriber("2)"))
            .disposed_by(&bag);

        variable.set("2");
        println!("current value: {}", variable.value());

        // Dropping the variable completes both subscribers.
        drop(variable);
    });
}
