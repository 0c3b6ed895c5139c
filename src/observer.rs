use crate::ObservableError;

/// A single notification delivered to an `Observer`.
///
/// `Error` and `Completed` are terminal: once an observer received one of them
/// it receives nothing else.
#[derive(Debug, Clone)]
pub enum Event<T> {
    Next(T),
    Error(ObservableError),
    Completed,
}

impl<T> Event<T> {
    /// Returns `true` for `Error` and `Completed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Event::Next(_))
    }

    /// Maps the value of a `Next` event, passing terminal events through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Event<U> {
        match self {
            Event::Next(v) => Event::Next(f(v)),
            Event::Error(e) => Event::Error(e),
            Event::Completed => Event::Completed,
        }
    }
}

/// The consuming side of a stream: a sink for `next`, `error` and `complete`
/// notifications.
pub trait Observer {
    type NextFnType;

    fn next(&mut self, _: Self::NextFnType);
    fn error(&mut self, _: ObservableError);
    fn complete(&mut self);

    /// Dispatches an `Event` to the matching method.
    fn on(&mut self, event: Event<Self::NextFnType>) {
        match event {
            Event::Next(v) => self.next(v),
            Event::Error(e) => self.error(e),
            Event::Completed => self.complete(),
        }
    }
}
