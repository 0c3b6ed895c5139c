//! Provides structures and traits related to subscription management.
//!
//! This module includes types such as `Subscriber` for handling observed values,
//! errors, and completions, `Subscription` for cancelling subscriptions to
//! observables and subjects, and `DisposeBag` for releasing a group of
//! subscriptions together.
pub mod dispose_bag;
pub mod subscribe;
