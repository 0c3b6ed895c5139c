mod custom_error;
mod register_emissions;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use custom_error::CustomError;
use parking_lot::Mutex;
use register_emissions::{record_nexts, register_emissions_subscriber};
use rxplay::subjects::PublishSubject;
use rxplay::{Event, Observable, ObservableExt, Observer, RxError, Subscribeable};

#[test]
fn map_observable() {
    let (mut make_subscriber, nexts, completes, errors) = register_emissions_subscriber();

    Observable::of([1, 2, 3])
        .map(|v| v * 10)
        .map(|v| v + 1)
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![11, 21, 31]);
    assert_eq!(completes.lock().len(), 1);
    assert_eq!(errors.lock().len(), 0);
}

#[test]
fn filter_observable() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();

    Observable::from_iter(1..=10)
        .filter(|v| v % 2 == 0)
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![2, 4, 6, 8, 10]);
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn skip_observable() {
    let nexts = Arc::new(Mutex::new(Vec::new()));
    Observable::of(["A", "B", "C", "D", "E", "F"])
        .skip(3)
        .subscribe(record_nexts(&nexts));

    assert_eq!(*nexts.lock(), vec!["D", "E", "F"]);
}

#[test]
fn skip_while_never_reevaluates_predicate() {
    let (mut make_subscriber, nexts, _, _) = register_emissions_subscriber();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_c = Arc::clone(&calls);

    Observable::of([2, 2, 3, 4, 4])
        .skip_while(move |v| {
            calls_c.fetch_add(1, Ordering::SeqCst);
            v % 2 == 0
        })
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![3, 4, 4]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn skip_until_drops_values_before_trigger() {
    let (mut make_subscriber, nexts, _, _) = register_emissions_subscriber();
    let mut subject = PublishSubject::new();
    let mut trigger = PublishSubject::<&str>::new();

    subject
        .clone()
        .skip_until(trigger.clone())
        .subscribe(make_subscriber.pop().unwrap()());

    subject.next("A");
    subject.next("B");
    trigger.next("X");
    subject.next("C");

    assert_eq!(*nexts.lock(), vec!["C"]);
    // The trigger subscription is released after its first value.
    assert!(trigger.is_empty());
}

#[test]
fn skip_until_forwards_trigger_error() {
    let (mut make_subscriber, nexts, _, errors) = register_emissions_subscriber();
    let mut subject = PublishSubject::<i32>::new();
    let mut trigger = PublishSubject::<()>::new();

    subject
        .clone()
        .skip_until(trigger.clone())
        .subscribe(make_subscriber.pop().unwrap()());

    trigger.error(Arc::new(CustomError));
    subject.next(1);

    assert!(nexts.lock().is_empty());
    assert_eq!(errors.lock().len(), 1);
    assert!(subject.is_empty());
}

#[test]
fn distinct_until_changed_drops_consecutive_duplicates() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();

    Observable::of(["a", "a", "b", "b", "a"])
        .distinct_until_changed()
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec!["a", "b", "a"]);
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn distinct_until_changed_by_custom_comparer() {
    let nexts = Arc::new(Mutex::new(Vec::new()));

    Observable::of([10, 12, 25, 27, 31])
        .distinct_until_changed_by(|a, b| a / 10 == b / 10)
        .subscribe(record_nexts(&nexts));

    assert_eq!(*nexts.lock(), vec![10, 25, 31]);
}

#[test]
fn element_at_observable() {
    let (mut make_subscriber, nexts, completes, errors) = register_emissions_subscriber();
    let mut strikes = PublishSubject::new();

    strikes
        .clone()
        .element_at(2)
        .subscribe(make_subscriber.pop().unwrap()());

    strikes.next("X");
    strikes.next("X");
    assert!(nexts.lock().is_empty());

    strikes.next("X");

    assert_eq!(*nexts.lock(), vec!["X"]);
    assert_eq!(completes.lock().len(), 1);
    assert_eq!(errors.lock().len(), 0);
    // Upstream is released once the element was found.
    assert!(strikes.is_empty());
}

#[test]
fn element_at_out_of_range_errors() {
    let (mut make_subscriber, nexts, completes, errors) = register_emissions_subscriber();

    Observable::of([1, 2])
        .element_at(2)
        .subscribe(make_subscriber.pop().unwrap()());

    assert!(nexts.lock().is_empty());
    assert_eq!(completes.lock().len(), 0);
    assert_eq!(
        *errors.lock(),
        vec![RxError::ArgumentOutOfRange { index: 2, len: 2 }.to_string()]
    );
}

#[test]
fn ignore_elements_forwards_only_completion() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut strikes = PublishSubject::new();

    strikes
        .clone()
        .ignore_elements()
        .subscribe(make_subscriber.pop().unwrap()());

    strikes.next("X");
    strikes.next("X");
    strikes.complete();

    assert!(nexts.lock().is_empty());
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn ignore_elements_forwards_error() {
    let (mut make_subscriber, _, completes, errors) = register_emissions_subscriber::<i32>();

    Observable::of([1, 2])
        .concat(Observable::throw(Arc::new(CustomError)))
        .ignore_elements()
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(errors.lock().len(), 1);
    assert_eq!(completes.lock().len(), 0);
}

#[test]
fn take_observable() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut subject = PublishSubject::new();

    subject
        .clone()
        .take(2)
        .subscribe(make_subscriber.pop().unwrap()());

    subject.next(1);
    subject.next(2);
    subject.next(3);

    assert_eq!(*nexts.lock(), vec![1, 2]);
    assert_eq!(completes.lock().len(), 1);
    assert!(subject.is_empty());
}

#[test]
fn take_zero_completes_immediately() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let subject = PublishSubject::<i32>::new();

    subject
        .clone()
        .take(0)
        .subscribe(make_subscriber.pop().unwrap()());

    assert!(nexts.lock().is_empty());
    assert_eq!(completes.lock().len(), 1);
    assert!(subject.is_empty());
}

#[test]
fn to_array_emits_once_on_completion() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut subject = PublishSubject::new();

    subject
        .clone()
        .to_array()
        .subscribe(make_subscriber.pop().unwrap()());

    subject.next(1);
    subject.next(2);
    assert!(nexts.lock().is_empty());

    subject.complete();

    assert_eq!(*nexts.lock(), vec![vec![1, 2]]);
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn to_array_of_empty_source_emits_empty_vec() {
    let nexts = Arc::new(Mutex::new(Vec::new()));
    Observable::<i32>::empty()
        .to_array()
        .subscribe(record_nexts(&nexts));

    assert_eq!(*nexts.lock(), vec![Vec::<i32>::new()]);
}

#[test]
fn scan_observable() {
    let (mut make_subscriber, nexts, _, _) = register_emissions_subscriber();

    Observable::of([1, 3, 5, 7, 9])
        .scan(0, |acc, v| acc + v)
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![1, 4, 9, 16, 25]);
}

#[test]
fn reduce_observable() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();

    Observable::of([1, 3, 5, 7, 9])
        .reduce(0, |acc, v| acc + v)
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![25]);
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn reduce_error_emits_no_value() {
    let (mut make_subscriber, nexts, _, errors) = register_emissions_subscriber();

    Observable::of([1, 2])
        .concat(Observable::throw(Arc::new(CustomError)))
        .reduce(0, |acc, v| acc + v)
        .subscribe(make_subscriber.pop().unwrap()());

    assert!(nexts.lock().is_empty());
    assert_eq!(errors.lock().len(), 1);
}

#[test]
fn tap_sees_every_event() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_c = Arc::clone(&seen);
    let nexts = Arc::new(Mutex::new(Vec::new()));

    Observable::of([1, 2])
        .tap(move |event: &Event<i32>| {
            let label = match event {
                Event::Next(v) => format!("next {}", v),
                Event::Error(_) => "error".to_string(),
                Event::Completed => "completed".to_string(),
            };
            seen_c.lock().push(label);
        })
        .subscribe(record_nexts(&nexts));

    assert_eq!(*seen.lock(), vec!["next 1", "next 2", "completed"]);
    assert_eq!(*nexts.lock(), vec![1, 2]);
}

#[test]
fn debug_passes_events_through() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();

    Observable::of([1, 2, 3])
        .debug("numbers")
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![1, 2, 3]);
    assert_eq!(completes.lock().len(), 1);
}

fn phone_number_from(digits: &[u8]) -> String {
    let d: Vec<String> = digits.iter().map(|d| d.to_string()).collect();
    format!("{}{}{}-{}{}{}-{}{}{}{}", d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7], d[8], d[9])
}

#[test]
fn phone_number_dialing() {
    let contacts = [("603-555-1212", "Florent"), ("212-555-1212", "Junior")];
    let dialed = Arc::new(Mutex::new(Vec::new()));
    let dialed_c = Arc::clone(&dialed);
    let mut input = PublishSubject::new();

    input
        .clone()
        .skip_while(|d: &u8| *d == 0)
        .filter(|d| *d < 10)
        .take(10)
        .to_array()
        .subscribe(rxplay::Subscriber::on_next(move |digits: Vec<u8>| {
            let phone = phone_number_from(&digits);
            if let Some((_, name)) = contacts.iter().find(|(number, _)| *number == phone) {
                dialed_c.lock().push(name.to_string());
            }
        }));

    for d in [0, 6, 0, 3, 11, 5, 5, 5, 1, 2, 1, 2, 9, 9] {
        input.next(d);
    }

    assert_eq!(*dialed.lock(), vec!["Florent".to_string()]);
    assert!(input.is_empty());
}
