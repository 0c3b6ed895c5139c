use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use crate::observable::{forward_to, Observable, SharedSubscriber};
use crate::observer::Observer;
use crate::subscription::subscribe::{Disposable, Subscribeable, Subscriber, Subscription};

impl<T: Send + 'static> Observable<T> {
    /// Merges every observable in `sources` into one stream.
    ///
    /// Values are forwarded in arrival order. The result completes once every
    /// source completed, and errors as soon as any source errors.
    pub fn merge(sources: Vec<Observable<T>>) -> Observable<T> {
        let sources = Arc::new(sources);
        Observable::new(move |o| {
            let inner = Observable::new({
                let sources = Arc::clone(&sources);
                move |mut s: Subscriber<Observable<T>>| {
                    for source in sources.iter() {
                        if s.is_closed() {
                            break;
                        }
                        s.next(source.clone());
                    }
                    s.complete();
                    Subscription::empty()
                }
            });
            merge_all(inner).subscribe(o)
        })
    }

    /// Combines the latest values of `a` and `b` with `combiner`, see
    /// [`ObservableExt::combine_latest_with`](crate::ObservableExt::combine_latest_with).
    pub fn combine_latest<A, B, SA, SB, F>(a: SA, b: SB, combiner: F) -> Observable<T>
    where
        SA: Subscribeable<ObsType = A> + Send + Sync + 'static,
        SB: Subscribeable<ObsType = B> + Send + Sync + 'static,
        A: Clone + Send + 'static,
        B: Clone + Send + 'static,
        F: Fn(A, B) -> T + Send + Sync + 'static,
    {
        combine_latest(a, b, combiner)
    }

    /// Pairs the values of `a` and `b` by index, see
    /// [`ObservableExt::zip_with`](crate::ObservableExt::zip_with).
    pub fn zip<A, B, SA, SB, F>(a: SA, b: SB, combiner: F) -> Observable<T>
    where
        SA: Subscribeable<ObsType = A> + Send + Sync + 'static,
        SB: Subscribeable<ObsType = B> + Send + Sync + 'static,
        A: Send + 'static,
        B: Send + 'static,
        F: Fn(A, B) -> T + Send + Sync + 'static,
    {
        zip(a, b, combiner)
    }
}

pub(super) fn start_with<S, T>(source: S, prefix: Vec<T>) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    Observable::new(move |mut o| {
        for v in prefix.iter() {
            if o.is_closed() {
                return Subscription::empty();
            }
            o.next(v.clone());
        }
        source.subscribe(o)
    })
}

pub(super) fn concat<S, R, T>(source: S, other: R) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    R: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
{
    let other = Arc::new(other);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let o_cloned_n = Arc::clone(&o);
        let o_cloned_e = Arc::clone(&o);
        let o_cloned_c = Arc::clone(&o);
        let other = Arc::clone(&other);

        let first = Subscriber::new(
            move |v| o_cloned_n.lock().next(v),
            move |e| o_cloned_e.lock().error(e),
            move || {
                let second = forward_to(&o_cloned_c, |o, v| o.next(v));
                other.subscribe(second);
            },
        );
        o.lock().add_teardown(first.subscription().clone());
        source.subscribe(first)
    })
}

struct MergeState {
    outer_done: bool,
    active: usize,
}

impl MergeState {
    fn finished(&self) -> bool {
        self.outer_done && self.active == 0
    }
}

pub(super) fn merge_all<S, I, T>(source: S) -> Observable<T>
where
    S: Subscribeable<ObsType = I> + Send + Sync + 'static,
    I: Subscribeable<ObsType = T> + 'static,
    T: 'static,
{
    Observable::new(move |o| {
        let o: SharedSubscriber<T> = Arc::new(Mutex::new(o));
        let state = Arc::new(Mutex::new(MergeState {
            outer_done: false,
            active: 0,
        }));

        let o_cloned_n = Arc::clone(&o);
        let o_cloned_e = Arc::clone(&o);
        let o_cloned_c = Arc::clone(&o);
        let state_n = Arc::clone(&state);
        let state_c = Arc::clone(&state);

        let outer = Subscriber::new(
            move |inner: I| {
                state_n.lock().active += 1;

                let o_inner_n = Arc::clone(&o_cloned_n);
                let o_inner_e = Arc::clone(&o_cloned_n);
                let o_inner_c = Arc::clone(&o_cloned_n);
                let state_inner = Arc::clone(&state_n);
                let s = Subscriber::new(
                    move |v| o_inner_n.lock().next(v),
                    move |e| o_inner_e.lock().error(e),
                    move || {
                        let finished = {
                            let mut state = state_inner.lock();
                            state.active -= 1;
                            state.finished()
                        };
                        if finished {
                            o_inner_c.lock().complete();
                        }
                    },
                );
                o_cloned_n.lock().add_teardown(s.subscription().clone());
                inner.subscribe(s);
            },
            move |e| o_cloned_e.lock().error(e),
            move || {
                let finished = {
                    let mut state = state_c.lock();
                    state.outer_done = true;
                    state.finished()
                };
                if finished {
                    o_cloned_c.lock().complete();
                }
            },
        );
        o.lock().add_teardown(outer.subscription().clone());
        source.subscribe(outer)
    })
}

struct CombineState<A, B> {
    latest_a: Option<A>,
    latest_b: Option<B>,
    a_done: bool,
    b_done: bool,
}

pub(super) fn combine_latest<SA, SB, A, B, U, F>(a: SA, b: SB, combiner: F) -> Observable<U>
where
    SA: Subscribeable<ObsType = A> + Send + Sync + 'static,
    SB: Subscribeable<ObsType = B> + Send + Sync + 'static,
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    U: 'static,
    F: Fn(A, B) -> U + Send + Sync + 'static,
{
    let combiner = Arc::new(combiner);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let state = Arc::new(Mutex::new(CombineState::<A, B> {
            latest_a: None,
            latest_b: None,
            a_done: false,
            b_done: false,
        }));

        let (o_a_n, o_a_e, o_a_c) = (Arc::clone(&o), Arc::clone(&o), Arc::clone(&o));
        let (state_a_n, state_a_c) = (Arc::clone(&state), Arc::clone(&state));
        let combiner_a = Arc::clone(&combiner);
        let sa = Subscriber::new(
            move |v: A| {
                // `state` stays locked until delivery so values from concurrent
                // sources reach downstream in the order they were combined.
                let mut state = state_a_n.lock();
                state.latest_a = Some(v);
                if let (Some(a), Some(b)) = (&state.latest_a, &state.latest_b) {
                    let combined = combiner_a(a.clone(), b.clone());
                    o_a_n.lock().next(combined);
                }
            },
            move |e| o_a_e.lock().error(e),
            move || {
                let mut state = state_a_c.lock();
                state.a_done = true;
                if state.b_done || state.latest_a.is_none() {
                    o_a_c.lock().complete();
                }
            },
        );

        let (o_b_n, o_b_e, o_b_c) = (Arc::clone(&o), Arc::clone(&o), Arc::clone(&o));
        let (state_b_n, state_b_c) = (Arc::clone(&state), Arc::clone(&state));
        let combiner_b = Arc::clone(&combiner);
        let sb = Subscriber::new(
            move |v: B| {
                let mut state = state_b_n.lock();
                state.latest_b = Some(v);
                if let (Some(a), Some(b)) = (&state.latest_a, &state.latest_b) {
                    let combined = combiner_b(a.clone(), b.clone());
                    o_b_n.lock().next(combined);
                }
            },
            move |e| o_b_e.lock().error(e),
            move || {
                let mut state = state_b_c.lock();
                state.b_done = true;
                if state.a_done || state.latest_b.is_none() {
                    o_b_c.lock().complete();
                }
            },
        );

        {
            let o = o.lock();
            o.add_teardown(sa.subscription().clone());
            o.add_teardown(sb.subscription().clone());
        }
        a.subscribe(sa);
        b.subscribe(sb);
        Subscription::empty()
    })
}

struct ZipState<A, B> {
    queue_a: VecDeque<A>,
    queue_b: VecDeque<B>,
    a_done: bool,
    b_done: bool,
}

impl<A, B> ZipState<A, B> {
    fn pair(&mut self) -> Option<(A, B)> {
        if self.queue_a.is_empty() || self.queue_b.is_empty() {
            return None;
        }
        let a = self.queue_a.pop_front()?;
        let b = self.queue_b.pop_front()?;
        Some((a, b))
    }

    // A completed source with nothing buffered can never pair again.
    fn exhausted(&self) -> bool {
        (self.a_done && self.queue_a.is_empty()) || (self.b_done && self.queue_b.is_empty())
    }
}

pub(super) fn zip<SA, SB, A, B, U, F>(a: SA, b: SB, combiner: F) -> Observable<U>
where
    SA: Subscribeable<ObsType = A> + Send + Sync + 'static,
    SB: Subscribeable<ObsType = B> + Send + Sync + 'static,
    A: Send + 'static,
    B: Send + 'static,
    U: 'static,
    F: Fn(A, B) -> U + Send + Sync + 'static,
{
    let combiner = Arc::new(combiner);
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let state = Arc::new(Mutex::new(ZipState {
            queue_a: VecDeque::new(),
            queue_b: VecDeque::new(),
            a_done: false,
            b_done: false,
        }));

        let (o_a_n, o_a_e, o_a_c) = (Arc::clone(&o), Arc::clone(&o), Arc::clone(&o));
        let (state_a_n, state_a_c) = (Arc::clone(&state), Arc::clone(&state));
        let combiner_a = Arc::clone(&combiner);
        let sa = Subscriber::new(
            move |v: A| {
                let mut state = state_a_n.lock();
                state.queue_a.push_back(v);
                let pair = state.pair();
                let exhausted = state.exhausted();
                // Pairs are delivered while `state` is held, keeping index order
                // across producer threads.
                let mut o = o_a_n.lock();
                if let Some((a, b)) = pair {
                    o.next(combiner_a(a, b));
                }
                if exhausted {
                    o.complete();
                }
            },
            move |e| o_a_e.lock().error(e),
            move || {
                let mut state = state_a_c.lock();
                state.a_done = true;
                if state.exhausted() {
                    o_a_c.lock().complete();
                }
            },
        );

        let (o_b_n, o_b_e, o_b_c) = (Arc::clone(&o), Arc::clone(&o), Arc::clone(&o));
        let (state_b_n, state_b_c) = (Arc::clone(&state), Arc::clone(&state));
        let combiner_b = Arc::clone(&combiner);
        let sb = Subscriber::new(
            move |v: B| {
                let mut state = state_b_n.lock();
                state.queue_b.push_back(v);
                let pair = state.pair();
                let exhausted = state.exhausted();
                let mut o = o_b_n.lock();
                if let Some((a, b)) = pair {
                    o.next(combiner_b(a, b));
                }
                if exhausted {
                    o.complete();
                }
            },
            move |e| o_b_e.lock().error(e),
            move || {
                let mut state = state_b_c.lock();
                state.b_done = true;
                if state.exhausted() {
                    o_b_c.lock().complete();
                }
            },
        );

        {
            let o = o.lock();
            o.add_teardown(sa.subscription().clone());
            o.add_teardown(sb.subscription().clone());
        }
        a.subscribe(sa);
        b.subscribe(sb);
        Subscription::empty()
    })
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Side {
    Left,
    Right,
}

struct AmbState {
    winner: Option<Side>,
    left: Option<Subscription>,
    right: Option<Subscription>,
}

impl AmbState {
    /// Returns `true` if `side` may forward its event, settling the race on the
    /// first call. The losing subscription is handed back for disposal.
    fn claim(&mut self, side: Side) -> (bool, Option<Subscription>) {
        match self.winner {
            Some(winner) => (winner == side, None),
            None => {
                self.winner = Some(side);
                let loser = match side {
                    Side::Left => self.right.take(),
                    Side::Right => self.left.take(),
                };
                (true, loser)
            }
        }
    }
}

fn amb_subscriber<T: 'static>(
    o: &SharedSubscriber<T>,
    state: &Arc<Mutex<AmbState>>,
    side: Side,
) -> Subscriber<T> {
    let claim = {
        let state = Arc::clone(state);
        move || {
            let (won, loser) = state.lock().claim(side);
            if let Some(loser) = loser {
                loser.dispose();
            }
            won
        }
    };
    let claim_n = claim.clone();
    let claim_e = claim.clone();
    let claim_c = claim;

    let (o_n, o_e, o_c) = (Arc::clone(o), Arc::clone(o), Arc::clone(o));
    Subscriber::new(
        move |v| {
            if claim_n() {
                o_n.lock().next(v);
            }
        },
        move |e| {
            if claim_e() {
                o_e.lock().error(e);
            }
        },
        move || {
            if claim_c() {
                o_c.lock().complete();
            }
        },
    )
}

pub(super) fn amb<S, R, T>(source: S, other: R) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    R: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: 'static,
{
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        let state = Arc::new(Mutex::new(AmbState {
            winner: None,
            left: None,
            right: None,
        }));

        let left = amb_subscriber(&o, &state, Side::Left);
        let right = amb_subscriber(&o, &state, Side::Right);
        {
            let mut state = state.lock();
            state.left = Some(left.subscription().clone());
            state.right = Some(right.subscription().clone());
        }
        {
            let o = o.lock();
            o.add_teardown(left.subscription().clone());
            o.add_teardown(right.subscription().clone());
        }
        source.subscribe(left);
        other.subscribe(right);
        Subscription::empty()
    })
}
