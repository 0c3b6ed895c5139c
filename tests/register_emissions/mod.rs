use std::sync::Arc;

use parking_lot::Mutex;
use rxplay::subscribe::Subscriber;

pub type Nexts<T> = Arc<Mutex<Vec<T>>>;
pub type Completes = Arc<Mutex<Vec<i32>>>;
pub type Errors = Arc<Mutex<Vec<String>>>;

/// Returns ten subscriber factories that all record into the same buffers.
pub fn register_emissions_subscriber<T: Send + 'static>() -> (
    Vec<impl FnOnce() -> Subscriber<T>>,
    Nexts<T>,
    Completes,
    Errors,
) {
    let nexts: Nexts<T> = Arc::new(Mutex::new(Vec::with_capacity(5)));
    let nexts_c = Arc::clone(&nexts);

    let completes: Completes = Arc::new(Mutex::new(Vec::with_capacity(5)));
    let completes_c = Arc::clone(&completes);

    let errors: Errors = Arc::new(Mutex::new(Vec::with_capacity(5)));
    let errors_c = Arc::clone(&errors);

    let make_subscriber = vec![
        move || {
            Subscriber::new(
                move |n| {
                    // Track next() calls.
                    nexts_c.lock().push(n);
                },
                move |e| {
                    // Track error() calls.
                    errors_c.lock().push(e.to_string());
                },
                move || {
                    // Track complete() calls.
                    completes_c.lock().push(1);
                },
            )
        };
        10
    ];
    (make_subscriber, nexts, completes, errors)
}

/// A subscriber that only records values.
#[allow(dead_code)]
pub fn record_nexts<T: Send + 'static>(nexts: &Nexts<T>) -> Subscriber<T> {
    let nexts = Arc::clone(nexts);
    Subscriber::on_next(move |v| nexts.lock().push(v))
}
