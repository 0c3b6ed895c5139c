//! Card dealing
//!
//! Deals random hands from a standard deck into a `PublishSubject`. A hand worth
//! more than 21 points busts, which terminates the subject with an error; every
//! later deal is silently dropped.
//!
//! To run this example, execute `cargo run --example card_dealing`.

use std::sync::Arc;

use rand::Rng;
use rxplay::{
    subjects::PublishSubject, subscribe::Subscriber, Disposable, Observer, Subscribeable,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

type Card = (String, u32);
type Hand = Vec<Card>;

#[derive(Debug, Error)]
enum HandError {
    #[error("busted")]
    Busted,
}

fn deck() -> Vec<Card> {
    let ranks = [
        ("A", 1),
        ("2", 2),
        ("3", 3),
        ("4", 4),
        ("5", 5),
        ("6", 6),
        ("7", 7),
        ("8", 8),
        ("9", 9),
        ("10", 10),
        ("J", 10),
        ("Q", 10),
        ("K", 10),
    ];
    ['♠', '♥', '♦', '♣']
        .iter()
        .flat_map(|suit| {
            ranks
                .iter()
                .map(move |(rank, points)| (format!("{}{}", suit, rank), *points))
        })
        .collect()
}

fn points(hand: &[Card]) -> u32 {
    hand.iter().map(|(_, points)| points).sum()
}

fn describe(hand: &[Card]) -> String {
    hand.iter()
        .map(|(card, _)| card.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn deal(dealt_hand: &mut PublishSubject<Hand>, card_count: usize) {
    let mut deck = deck();
    let mut rng = rand::rng();
    let hand: Hand = (0..card_count)
        .map(|_| deck.swap_remove(rng.random_range(0..deck.len())))
        .collect();

    if points(&hand) > 21 {
        dealt_hand.error(Arc::new(HandError::Busted));
    } else {
        dealt_hand.next(hand);
    }
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dealt_hand = PublishSubject::new();

    let subscriber = Subscriber::new(
        |hand: Hand| println!("{} for {}", describe(&hand), points(&hand)),
        |e| println!("{}", e),
        || println!("Complete"),
    );
    let subscription = dealt_hand.clone().subscribe(subscriber);

    // Keep dealing until a hand busts.
    for _ in 0..10 {
        deal(&mut dealt_hand, 3);
        if dealt_hand.is_empty() {
            break;
        }
    }

    subscription.dispose();
    println!("Disposed");
}
