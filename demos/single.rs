//! `Single` example
//!
//! A `Single` resolves exactly once, with a value or with an error. Here it wraps
//! a lookup in a small in-memory resource store and reports one of three failure
//! modes when the lookup goes wrong.
//!
//! To run this example, execute `cargo run --example single`.

use std::{collections::HashMap, sync::Arc};

use rxplay::{Observable, ObservableError, Single, Subscription};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum FileReadError {
    #[error("file not found")]
    NotFound,
    #[error("file is unreadable")]
    Unreadable,
    #[error("file is not valid UTF-8")]
    DecodingFailed,
}

/// Stand-in for a bundle of text resources. `None` marks a resource that exists
/// but cannot be read.
type ResourceStore = HashMap<&'static str, Option<Vec<u8>>>;

fn resources() -> ResourceStore {
    HashMap::from([
        (
            "ANewHope",
            Some(b"A long time ago in a galaxy far, far away....".to_vec()),
        ),
        ("Locked", None),
        ("Garbled", Some(vec![0xff, 0xfe, 0xfd])),
    ])
}

fn load_text(store: Arc<ResourceStore>, name: &'static str) -> Single<String> {
    Single::create(move |observer| {
        let outcome = match store.get(name) {
            None => Err(FileReadError::NotFound),
            Some(None) => Err(FileReadError::Unreadable),
            Some(Some(bytes)) => {
                String::from_utf8(bytes.clone()).map_err(|_| FileReadError::DecodingFailed)
            }
        };
        observer.resolve(outcome.map_err(|e| -> ObservableError { Arc::new(e) }));
        Subscription::empty()
    })
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Arc::new(resources());

    for name in ["ANewHope", "Locked", "Garbled", "Missing"] {
        load_text(Arc::clone(&store), name).subscribe_result(move |result| match result {
            Ok(text) => println!("{}: {}", name, text),
            Err(e) => println!("{}: {}", name, e),
        });
    }

    // A `Single` built from an observable takes its first element.
    Single::from_observable(Observable::of(["first", "second"]))
        .subscribe_result(|result| println!("from_observable: {:?}", result.ok()));

    Single::from_observable(Observable::<&str>::empty()).subscribe_result(|result| {
        if let Err(e) = result {
            println!("from_observable on an empty source: {}", e);
        }
    });
}
