//! Combining operators
//!
//! Prefixing a sequence with `start_with`, chaining with `concat`, interleaving
//! with `merge`, pairing with `combine_latest` and `zip`, racing with `amb`, and
//! folding with `reduce` and `scan`.
//!
//! To run this example, execute `cargo run --example combining_operators`.

use std::fmt::Display;

use rxplay::{
    subjects::PublishSubject, subscribe::Subscriber, DisposeBag, Observable, ObservableExt,
    Observer, Subscribeable,
};
use tracing_subscriber::EnvFilter;

const RUNTIMES: [(&str, u32); 6] = [
    ("Episode I", 136),
    ("Episode II", 142),
    ("Episode III", 140),
    ("Episode IV", 121),
    ("Episode V", 124),
    ("Episode VI", 131),
];

pub fn print_next<T: Display>() -> Subscriber<T> {
    Subscriber::on_next(|v| println!("{}", v))
}

fn hours_minutes(minutes: u32) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

fn example(title: &str, body: impl FnOnce()) {
    println!("\n--- Example of: {} ---", title);
    body();
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    example("start_with", || {
        let bag = DisposeBag::new();
        Observable::of(["Episode I", "Episode II", "Episode III"])
            .start_with(["Episode IV", "Episode V"])
            .subscribe(print_next())
            .disposed_by(&bag);
    });

    example("concat", || {
        let bag = DisposeBag::new();
        let prequels = Observable::of(["Episode I", "Episode II", "Episode III"]);
        let originals = Observable::of(["Episode IV", "Episode V", "Episode VI"]);

        prequels
            .concat(originals)
            .subscribe(print_next())
            .disposed_by(&bag);
    });

    example("merge", || {
        let bag = DisposeBag::new();
        let mut trilogies = PublishSubject::new();
        let mut standalone = PublishSubject::new();

        Observable::of([trilogies.clone(), standalone.clone()])
            .merge_all()
            .subscribe(print_next())
            .disposed_by(&bag);

        trilogies.next("Episode I");
        trilogies.next("Episode II");
        standalone.next("The Clone Wars");
        trilogies.next("Episode III");
        standalone.next("Solo");
        standalone.next("Rogue One");
        trilogies.next("Episode IV");
    });

    example("combine_latest", || {
        let bag = DisposeBag::new();
        let characters = Observable::of(["Luke", "Han Solo", "Leia", "Chewbacca"]);
        let weapons = Observable::of(["Lightsaber", "DL-44", "Defender", "Bowcaster"]);

        // The first source is synchronous and done before the second emits, so
        // every weapon pairs with the last character.
        Observable::combine_latest(characters, weapons, |character, weapon| {
            format!("{}: {}", character, weapon)
        })
        .subscribe(print_next())
        .disposed_by(&bag);
    });

    example("zip", || {
        let bag = DisposeBag::new();
        let characters = Observable::of(["Luke", "Han Solo", "Leia", "Chewbacca"]);
        let weapons = Observable::of(["Lightsaber", "DL-44", "Defender", "Bowcaster"]);

        Observable::zip(characters, weapons, |character, weapon| {
            format!("{}: {}", character, weapon)
        })
        .subscribe(print_next())
        .disposed_by(&bag);
    });

    example("amb", || {
        let bag = DisposeBag::new();
        let mut prequels = PublishSubject::new();
        let mut originals = PublishSubject::new();

        prequels
            .clone()
            .amb(originals.clone())
            .subscribe(print_next())
            .disposed_by(&bag);

        // First to emit wins, the other source is dropped.
        originals.next("Episode IV");
        prequels.next("Episode I");
        prequels.next("Episode II");
        originals.next("Episode V");
    });

    example("reduce", || {
        let bag = DisposeBag::new();
        Observable::from_iter(RUNTIMES.map(|(_, minutes)| minutes))
            .reduce(0, |total, minutes| total + minutes)
            .map(hours_minutes)
            .subscribe(print_next())
            .disposed_by(&bag);
    });

    example("scan", || {
        let bag = DisposeBag::new();
        Observable::from_iter(RUNTIMES.map(|(_, minutes)| minutes))
            .scan(0, |total, minutes| total + minutes)
            .map(hours_minutes)
            .subscribe(print_next())
            .disposed_by(&bag);
    });

    example("zip + scan", || {
        let bag = DisposeBag::new();
        let runtimes = Observable::of(RUNTIMES);
        let totals = runtimes
            .clone()
            .scan(0, |total, (_, minutes): (&str, u32)| total + minutes);

        runtimes
            .zip_with(totals, |(title, minutes), total| {
                format!(
                    "{}: {} ({})",
                    title,
                    hours_minutes(minutes),
                    hours_minutes(total)
                )
            })
            .subscribe(print_next())
            .disposed_by(&bag);
    });
}
