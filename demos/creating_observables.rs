//! Creating observables
//!
//! Walks through the factory functions of `Observable`: `just`, `of`, `from_iter`,
//! `empty`, `never` and `create`, and shows the two ways of ending a
//! subscription, calling `dispose` on it or handing it to a `DisposeBag`.
//!
//! Set `RUST_LOG=rxplay=debug` to see the library's own log lines.
//!
//! To run this example, execute `cargo run --example creating_observables`.

use std::{fmt::Debug, sync::Arc, thread, time::Duration};

use rxplay::{
    subscribe::{Subscriber, Subscription, UnsubscribeLogic},
    Disposable, DisposeBag, Event, Observable, ObservableExt, Observer, Subscribeable,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum DroidError {
    #[error("Ou812: the droid is not the one you are looking for")]
    Ou812,
}

pub fn create_subscriber<T: Debug>(label: &'static str) -> Subscriber<T> {
    Subscriber::new(
        move |v| println!("[{}] next: {:?}", label, v),
        move |e| eprintln!("[{}] error: {}", label, e),
        move || println!("[{}] completed", label),
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

    let one = 1;
    let two = 2;
    let three = 3;

    example("just, of, from_iter", || {
        // A single element.
        Observable::just(one).subscribe(create_subscriber("just"));

        // Every element of the list, one after the other.
        Observable::of([one, two, three]).subscribe(create_subscriber("of"));

        // The whole array as one element.
        Observable::just([one, two, three]).subscribe(create_subscriber("just array"));

        Observable::from_iter(vec![one, two, three]).subscribe(create_subscriber("from_iter"));
    });

    example("subscribe", || {
        let observable = Observable::of(["1", "2", "3"]);

        // Observables are cold: every subscription replays the whole sequence.
        observable.subscribe(Subscriber::on_next(|element| println!("{}", element)));
        observable.subscribe(Subscriber::on_event(|event| println!("{:?}", event)));
    });

    example("empty", || {
        Observable::<()>::empty().subscribe(create_subscriber("empty"));
    });

    example("never", || {
        let bag = DisposeBag::new();

        Observable::<()>::never()
            .tap(|event| println!("tap: {:?}", event))
            .debug("never")
            .subscribe(create_subscriber("never"))
            .disposed_by(&bag);

        println!("Nothing emitted, disposing the bag");
        bag.dispose();
    });

    example("dispose", || {
        let subscription = Observable::of(["A", "B", "C"]).subscribe(Subscriber::on_event(
            |event: Event<&str>| {
                if let Event::Next(v) = event {
                    println!("{}", v);
                }
            },
        ));
        subscription.dispose();
    });

    example("DisposeBag", || {
        let bag = DisposeBag::new();
        Observable::of(["A", "B", "C"])
            .subscribe(create_subscriber("bag"))
            .disposed_by(&bag);
        // The bag releases its subscriptions when it goes out of scope.
    });

    example("create", || {
        let bag = DisposeBag::new();

        let droids = Observable::create(|mut o: Subscriber<&'static str>| {
            o.next("R2-D2");
            o.error(Arc::new(DroidError::Ou812));
            // Ignored, the sequence already terminated.
            o.next("C-3PO");
            o.complete();
            Subscription::new(UnsubscribeLogic::Logic(Box::new(|| {
                println!("droids: teardown")
            })))
        });

        droids
            .subscribe(create_subscriber("create"))
            .disposed_by(&bag);
    });

    example("create with a background producer", || {
        let ticks = Observable::create(|mut o: Subscriber<u32>| {
            let handle = thread::spawn(move || {
                for i in 0..5 {
                    if o.is_closed() {
                        break;
                    }
                    o.next(i);
                    thread::sleep(Duration::from_millis(10));
                }
                o.complete();
            });
            Subscription::new(UnsubscribeLogic::Logic(Box::new(move || {
                // Only joins when disposed from another thread.
                if handle.thread().id() != thread::current().id() {
                    let _ = handle.join();
                }
            })))
        });

        let subscription = ticks.take(3).subscribe(create_subscriber("ticks"));
        thread::sleep(Duration::from_millis(100));
        subscription.dispose();
    });
}
