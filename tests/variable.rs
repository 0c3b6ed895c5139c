mod custom_error;
mod register_emissions;

use std::sync::Arc;

use custom_error::CustomError;
use parking_lot::Mutex;
use register_emissions::register_emissions_subscriber;
use rxplay::subjects::{PublishSubject, Variable};
use rxplay::{Observable, ObservableExt, Observer, RxError, Single, Subscribeable, Subscription};

#[test]
fn variable_replays_current_value_only() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();

    let mut variable = Variable::new("Initial value");
    variable.set("New initial value");

    variable
        .as_observable()
        .subscribe(make_subscriber.pop().unwrap()());

    variable.set("1");
    variable.set("2");

    assert_eq!(*nexts.lock(), vec!["New initial value", "1", "2"]);
    assert_eq!(variable.value(), "2");
    assert!(completes.lock().is_empty());

    // A late subscriber sees the latest value, never the history.
    variable
        .as_observable()
        .subscribe(make_subscriber.pop().unwrap()());
    assert_eq!(nexts.lock().last(), Some(&"2"));
    assert_eq!(nexts.lock().len(), 4);
}

#[test]
fn variable_completes_observers_when_dropped() {
    let (mut make_subscriber, _, completes, errors) = register_emissions_subscriber::<i32>();

    {
        let variable = Variable::new(0);
        variable
            .as_observable()
            .map(|v| v * 2)
            .subscribe(make_subscriber.pop().unwrap()());
        assert!(completes.lock().is_empty());
    }

    assert_eq!(completes.lock().len(), 1);
    assert!(errors.lock().is_empty());
}

#[test]
fn single_success() {
    let result = Arc::new(Mutex::new(None));
    let result_c = Arc::clone(&result);

    let single = Single::create(|observer| {
        observer.success("Copyright: none");
        Subscription::empty()
    });
    single.subscribe_result(move |r| *result_c.lock() = Some(r.map_err(|e| e.to_string())));

    assert_eq!(*result.lock(), Some(Ok("Copyright: none")));
}

#[test]
fn single_failure() {
    let result = Arc::new(Mutex::new(None));
    let result_c = Arc::clone(&result);

    let single = Single::<String>::create(|observer| {
        observer.failure(Arc::new(CustomError));
        Subscription::empty()
    });
    single.subscribe_result(move |r| *result_c.lock() = Some(r.map_err(|e| e.to_string())));

    assert_eq!(
        *result.lock(),
        Some(Err("Custom error occurred".to_string()))
    );
}

#[test]
fn single_dropped_observer_reports_no_elements() {
    let (mut make_subscriber, nexts, completes, errors) = register_emissions_subscriber::<i32>();

    Single::<i32>::create(|_observer| Subscription::empty())
        .as_observable()
        .subscribe(make_subscriber.pop().unwrap()());

    assert!(nexts.lock().is_empty());
    assert!(completes.lock().is_empty());
    assert_eq!(*errors.lock(), vec![RxError::NoElements.to_string()]);
}

#[test]
fn single_from_observable_takes_first_value() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut subject = PublishSubject::new();

    Single::from_observable(subject.clone()).subscribe(make_subscriber.pop().unwrap()());

    subject.next(7);
    subject.next(8);

    assert_eq!(*nexts.lock(), vec![7]);
    assert_eq!(completes.lock().len(), 1);
    assert!(subject.is_empty());
}

#[test]
fn single_from_empty_observable_errors() {
    let result = Arc::new(Mutex::new(None));
    let result_c = Arc::clone(&result);

    Single::from_observable(Observable::<i32>::empty())
        .subscribe_result(move |r| *result_c.lock() = Some(r.map_err(|e| e.to_string())));

    assert_eq!(*result.lock(), Some(Err(RxError::NoElements.to_string())));
}
