//! Filtering operators
//!
//! `ignore_elements`, `element_at`, `filter`, `skip_while`, `skip_until` and
//! `distinct_until_changed`, followed by a small phone dialer built from
//! `skip_while`, `filter`, `take` and `to_array`.
//!
//! To run this example, execute `cargo run --example filtering_operators`.

use std::{collections::HashMap, fmt::Debug};

use rxplay::{
    subjects::PublishSubject, subscribe::Subscriber, DisposeBag, Observable, ObservableExt,
    Observer, Subscribeable,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Droid {
    C3po,
    R2d2,
}

#[derive(Debug, Clone)]
struct Rating {
    title: &'static str,
    rating: u32,
}

const RATINGS: [Rating; 6] = [
    Rating { title: "Episode I", rating: 55 },
    Rating { title: "Episode II", rating: 66 },
    Rating { title: "Episode III", rating: 79 },
    Rating { title: "Episode IV", rating: 93 },
    Rating { title: "Episode V", rating: 94 },
    Rating { title: "Episode VI", rating: 80 },
];

pub fn print_event<T: Debug + 'static>() -> Subscriber<T> {
    Subscriber::on_event(|event| println!("{:?}", event))
}

fn phone_number(digits: &[u32]) -> String {
    let digits: String = digits.iter().map(|d| d.to_string()).collect();
    match (digits.get(..3), digits.get(3..6), digits.get(6..)) {
        (Some(area), Some(prefix), Some(line)) => format!("{}-{}-{}", area, prefix, line),
        _ => digits,
    }
}

fn example(title: &str, body: impl FnOnce()) {
    println!("\n--- Example of: {} ---", title);
    body();
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    example("ignore_elements", || {
        let bag = DisposeBag::new();
        let mut projects = PublishSubject::new();

        projects
            .clone()
            .ignore_elements()
            .subscribe(print_event())
            .disposed_by(&bag);

        projects.next("Land of Droids");
        projects.next("Wookie World");
        projects.next("Detours");
        // Only the completion gets through.
        projects.complete();
    });

    example("element_at", || {
        let bag = DisposeBag::new();
        let mut quotes = PublishSubject::new();

        quotes
            .clone()
            .element_at(2)
            .subscribe(print_event())
            .disposed_by(&bag);

        quotes.next("May the odds be ever in your favor");
        quotes.next("Live long and prosper");
        quotes.next("May the Force be with you");
    });

    example("element_at past the end", || {
        Observable::of([1, 2]).element_at(5).subscribe(print_event());
    });

    example("filter", || {
        let bag = DisposeBag::new();
        Observable::of(RATINGS)
            .filter(|movie| movie.rating >= 90)
            .subscribe(Subscriber::on_next(|movie| println!("{:?}", movie)))
            .disposed_by(&bag);
    });

    example("skip_while", || {
        let bag = DisposeBag::new();
        Observable::of(RATINGS)
            .skip_while(|movie| movie.rating < 90)
            .map(|movie| movie.title)
            .subscribe(Subscriber::on_next(|title| println!("{}", title)))
            .disposed_by(&bag);
    });

    example("skip_until", || {
        let bag = DisposeBag::new();
        let mut subject = PublishSubject::new();
        let mut trigger = PublishSubject::new();

        subject
            .clone()
            .skip_until(trigger.clone())
            .subscribe(Subscriber::on_next(|title| println!("{}", title)))
            .disposed_by(&bag);

        subject.next("Episode I");
        subject.next("Episode II");
        subject.next("Episode III");

        trigger.next(());

        subject.next("Episode IV");
    });

    example("distinct_until_changed", || {
        let bag = DisposeBag::new();
        Observable::of([Droid::R2d2, Droid::C3po, Droid::C3po, Droid::R2d2])
            .distinct_until_changed()
            .subscribe(Subscriber::on_next(|droid| println!("{:?}", droid)))
            .disposed_by(&bag);
    });

    example("phone dialer", || {
        let bag = DisposeBag::new();
        let contacts = HashMap::from([
            ("603-555-1212", "Florent"),
            ("212-555-1212", "Junior"),
            ("408-555-1212", "Marin"),
            ("617-555-1212", "Scott"),
        ]);

        let mut input = PublishSubject::new();

        input
            .clone()
            .skip_while(|&digit| digit == 0)
            .filter(|&digit| digit < 10)
            .take(10)
            .to_array()
            .subscribe(Subscriber::on_next(move |digits: Vec<u32>| {
                let phone = phone_number(&digits);
                match contacts.get(phone.as_str()) {
                    Some(contact) => println!("Dialing {} ({})...", contact, phone),
                    None => println!("Contact not found"),
                }
            }))
            .disposed_by(&bag);

        input.next(0);
        input.next(603);

        input.next(2);
        input.next(1);
        input.next(2);

        for digit in "5551212".chars().filter_map(|c| c.to_digit(10)) {
            input.next(digit);
        }

        input.next(9);
    });
}
