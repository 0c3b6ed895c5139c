//! Error types shared by observables, subjects and operators.

mod observable_errors;

pub use observable_errors::*;
