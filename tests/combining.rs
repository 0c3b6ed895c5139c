mod custom_error;
mod register_emissions;

use std::{sync::Arc, thread};

use custom_error::CustomError;
use parking_lot::Mutex;
use register_emissions::{record_nexts, register_emissions_subscriber};
use rxplay::subjects::{BehaviorSubject, PublishSubject};
use rxplay::{Disposable, Observable, ObservableExt, Observer, Subscribeable};

#[test]
fn start_with_emits_prefix_first() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();

    Observable::of([2, 3, 4])
        .start_with([1])
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![1, 2, 3, 4]);
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn start_with_before_hot_source() {
    let (mut make_subscriber, nexts, _, _) = register_emissions_subscriber();
    let mut subject = PublishSubject::new();

    subject
        .clone()
        .start_with([0, 1])
        .subscribe(make_subscriber.pop().unwrap()());
    subject.next(2);

    assert_eq!(*nexts.lock(), vec![0, 1, 2]);
}

#[test]
fn concat_does_not_interleave() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut first = PublishSubject::new();
    let mut second = PublishSubject::new();

    first
        .clone()
        .concat(second.clone())
        .subscribe(make_subscriber.pop().unwrap()());

    first.next("Berlin");
    // Not subscribed yet, lost.
    second.next("Moscow");
    first.next("Munich");
    first.complete();
    second.next("Madrid");
    second.complete();

    assert_eq!(*nexts.lock(), vec!["Berlin", "Munich", "Madrid"]);
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn concat_of_cold_observables() {
    let nexts = Arc::new(Mutex::new(Vec::new()));

    Observable::of(["Berlin", "Munich", "Frankfurt"])
        .concat(Observable::of(["Madrid", "Barcelona", "Valencia"]))
        .subscribe(record_nexts(&nexts));

    assert_eq!(
        *nexts.lock(),
        vec!["Berlin", "Munich", "Frankfurt", "Madrid", "Barcelona", "Valencia"]
    );
}

#[test]
fn concat_error_skips_second_source() {
    let (mut make_subscriber, nexts, completes, errors) = register_emissions_subscriber();
    let second = PublishSubject::new();

    Observable::of([1])
        .concat(Observable::throw(Arc::new(CustomError)))
        .concat(second.clone())
        .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(*nexts.lock(), vec![1]);
    assert_eq!(errors.lock().len(), 1);
    assert_eq!(completes.lock().len(), 0);
    assert!(second.is_empty());
}

#[test]
fn merge_of_two_subjects() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut left = PublishSubject::new();
    let mut right = PublishSubject::new();

    let source = Observable::of([left.clone(), right.clone()]);
    let s = source.merge_all().subscribe(make_subscriber.pop().unwrap()());

    left.next("Left: 1");
    right.next("Right: 1");
    right.next("Right: 2");
    left.next("Left: 2");

    assert_eq!(
        *nexts.lock(),
        vec!["Left: 1", "Right: 1", "Right: 2", "Left: 2"]
    );

    // Disposing the merged subscription unsubscribes from both subjects.
    s.dispose();
    assert!(left.is_empty());
    assert!(right.is_empty());

    left.next("Left: 3");
    right.next("Right: 3");
    assert_eq!(nexts.lock().len(), 4);
    assert_eq!(completes.lock().len(), 0);
}

#[test]
fn merge_completes_after_outer_and_all_inners() {
    let (mut make_subscriber, _, completes, _) = register_emissions_subscriber::<i32>();
    let mut left = PublishSubject::new();
    let mut right = PublishSubject::new();

    left.clone()
        .merge_with(right.clone())
        .subscribe(make_subscriber.pop().unwrap()());

    left.complete();
    assert_eq!(completes.lock().len(), 0);

    right.complete();
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn merge_first_error_disposes_everything() {
    let (mut make_subscriber, nexts, _, errors) = register_emissions_subscriber();
    let mut left = PublishSubject::new();
    let mut right = PublishSubject::new();

    left.clone()
        .merge_with(right.clone())
        .subscribe(make_subscriber.pop().unwrap()());

    left.next(1);
    right.error(Arc::new(CustomError));
    left.next(2);

    assert_eq!(*nexts.lock(), vec![1]);
    assert_eq!(errors.lock().len(), 1);
    assert!(left.is_empty());
}

#[test]
fn combine_latest_emits_once_both_emitted() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut left = PublishSubject::new();
    let mut right = PublishSubject::new();

    Observable::combine_latest(left.clone(), right.clone(), |l: i32, r: i32| {
        format!("{} {}", l, r)
    })
    .subscribe(make_subscriber.pop().unwrap()());

    left.next(45);
    assert!(nexts.lock().is_empty());

    right.next(1);
    left.next(30);
    right.next(1);
    right.next(2);

    assert_eq!(*nexts.lock(), vec!["45 1", "30 1", "30 1", "30 2"]);

    left.complete();
    assert_eq!(completes.lock().len(), 0);
    right.next(3);
    right.complete();

    assert_eq!(nexts.lock().last().map(String::as_str), Some("30 3"));
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn combine_latest_completes_when_a_source_never_emitted() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber::<(i32, i32)>();
    let mut left = PublishSubject::new();
    let mut right = PublishSubject::<i32>::new();

    left.clone()
        .combine_latest_with(right.clone(), |l: i32, r| (l, r))
        .subscribe(make_subscriber.pop().unwrap()());

    left.next(1);
    right.complete();

    assert!(nexts.lock().is_empty());
    assert_eq!(completes.lock().len(), 1);
    assert!(left.is_empty());
}

#[test]
fn zip_pairs_by_index() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();

    Observable::zip(
        Observable::of(["Sunny", "Cloudy", "Cloudy", "Sunny"]),
        Observable::of(["Lisbon", "Copenhagen", "London", "Madrid", "Vienna"]),
        |weather, city| format!("It's {} in {}", weather, city),
    )
    .subscribe(make_subscriber.pop().unwrap()());

    assert_eq!(
        *nexts.lock(),
        vec![
            "It's Sunny in Lisbon",
            "It's Cloudy in Copenhagen",
            "It's Cloudy in London",
            "It's Sunny in Madrid",
        ]
    );
    assert_eq!(completes.lock().len(), 1);
}

#[test]
fn zip_completes_when_completed_source_is_drained() {
    let (mut make_subscriber, nexts, completes, _) = register_emissions_subscriber();
    let mut left = PublishSubject::new();
    let mut right = PublishSubject::new();

    left.clone()
        .zip_with(right.clone(), |l: i32, r: i32| l + r)
        .subscribe(make_subscriber.pop().unwrap()());

    left.next(1);
    left.next(2);
    left.complete();
    assert_eq!(completes.lock().len(), 0);

    right.next(10);
    assert_eq!(completes.lock().len(), 0);
    right.next(20);

    assert_eq!(*nexts.lock(), vec![11, 22]);
    assert_eq!(completes.lock().len(), 1);
    assert!(right.is_empty());
}

#[test]
fn amb_follows_first_source_to_emit() {
    let (mut make_subscriber, nexts, _, _) = register_emissions_subscriber();
    let mut left = PublishSubject::new();
    let mut right = PublishSubject::new();

    left.clone()
        .amb(right.clone())
        .subscribe(make_subscriber.pop().unwrap()());

    left.next("Lisbon");
    right.next("Copenhagen");
    left.next("London");
    left.next("Madrid");
    right.next("Vienna");

    assert_eq!(*nexts.lock(), vec!["Lisbon", "London", "Madrid"]);
    // The losing source was disposed.
    assert!(right.is_empty());
    assert_eq!(left.len(), 1);
}

#[test]
fn amb_with_replaying_source_wins_on_subscribe() {
    let nexts = Arc::new(Mutex::new(Vec::new()));
    let mut right = PublishSubject::new();
    let left = BehaviorSubject::new(1);

    left.clone().amb(right.clone()).subscribe(record_nexts(&nexts));
    right.next(2);

    assert_eq!(*nexts.lock(), vec![1]);
    assert!(right.is_empty());
}

#[test]
fn scan_and_zip_show_running_total() {
    let nexts = Arc::new(Mutex::new(Vec::new()));
    let source = Observable::of([1, 3, 5, 7, 9]);
    let totals = source.clone().scan(0, |acc, v| acc + v);

    source
        .zip_with(totals, |v, total| format!("{} {}", v, total))
        .subscribe(record_nexts(&nexts));

    assert_eq!(*nexts.lock(), vec!["1 1", "3 4", "5 9", "7 16", "9 25"]);
}

fn feed_from_threads(subjects: [PublishSubject<u32>; 2], count: u32) {
    let producers: Vec<_> = subjects
        .into_iter()
        .map(|mut subject| {
            thread::spawn(move || {
                for i in 0..count {
                    subject.next(i);
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
}

#[test]
fn zip_keeps_index_order_across_threads() {
    let nexts = Arc::new(Mutex::new(Vec::new()));
    let left = PublishSubject::<u32>::new();
    let right = PublishSubject::<u32>::new();

    left.clone()
        .zip_with(right.clone(), |l, r| (l, r))
        .subscribe(record_nexts(&nexts));

    feed_from_threads([left, right], 2_000);

    let expected: Vec<_> = (0..2_000).map(|i| (i, i)).collect();
    assert_eq!(*nexts.lock(), expected);
}

#[test]
fn combine_latest_keeps_order_across_threads() {
    let nexts = Arc::new(Mutex::new(Vec::new()));
    let left = PublishSubject::<u32>::new();
    let right = PublishSubject::<u32>::new();

    left.clone()
        .combine_latest_with(right.clone(), |l, r| (l, r))
        .subscribe(record_nexts(&nexts));

    feed_from_threads([left, right], 2_000);

    let pairs = nexts.lock();
    // Latest values only grow, so every delivered pair is at least the previous one.
    assert!(pairs
        .windows(2)
        .all(|w| w[0].0 <= w[1].0 && w[0].1 <= w[1].1));
    assert_eq!(pairs.last(), Some(&(1_999, 1_999)));
}
