//! Timed operators on a Tokio runtime
//!
//! `interval` ticks and `delay` shifts emissions in time; both take a scheduler
//! deciding where the timed work runs. This example drives them with a
//! `TokioScheduler` bound to the current runtime and waits for completion on a
//! oneshot channel.
//!
//! To run this example, execute `cargo run --example delayed_tokio`.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use rxplay::{
    scheduler::TokioScheduler, subscribe::Subscriber, Disposable, Observable, ObservableExt,
    Subscribeable,
};
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn completion_subscriber<T: std::fmt::Display>(
    label: &'static str,
    done: oneshot::Sender<()>,
) -> Subscriber<T> {
    let mut done = Some(done);
    Subscriber::new(
        move |v| println!("{}: {}", label, v),
        move |e| eprintln!("{}: error {}", label, e),
        move || {
            println!("{}: completed", label);
            if let Some(done) = done.take() {
                let _ = done.send(());
            }
        },
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scheduler = TokioScheduler::try_current().expect("running inside a tokio runtime");
    info!(?scheduler, "scheduler ready");

    // Five ticks, 100ms apart.
    let (tx, rx) = oneshot::channel();
    Observable::interval(Duration::from_millis(100), scheduler.clone())
        .take(5)
        .map(|tick| tick * 10)
        .subscribe(completion_subscriber("interval", tx));
    let _ = rx.await;

    // Every value shows up half a second late, order preserved.
    let (tx, rx) = oneshot::channel();
    Observable::of(["Luke", "Leia", "Han"])
        .delay(Duration::from_millis(500), scheduler.clone())
        .subscribe(completion_subscriber("delay", tx));
    let _ = rx.await;

    // Disposing an interval cancels its pending tick.
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cloned = Arc::clone(&seen);
    let subscription = Observable::interval(Duration::from_millis(50), scheduler)
        .subscribe(Subscriber::on_next(move |tick| seen_cloned.lock().push(tick)));
    tokio::time::sleep(Duration::from_millis(275)).await;
    subscription.dispose();
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("ticks before dispose: {:?}", seen.lock());
}
