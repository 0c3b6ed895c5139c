use std::{collections::VecDeque, sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::observable::Observable;
use crate::observer::{Event, Observer};
use crate::scheduler::Scheduler;
use crate::subscription::subscribe::{Subscribeable, Subscriber};

pub(super) fn delay<S, T, Sch>(source: S, duration: Duration, scheduler: Sch) -> Observable<T>
where
    S: Subscribeable<ObsType = T> + Send + Sync + 'static,
    T: Send + 'static,
    Sch: Scheduler,
{
    Observable::new(move |o| {
        let o = Arc::new(Mutex::new(o));
        // Every scheduled task pops the oldest pending event, so delivery order
        // matches arrival order whatever order the tasks fire in.
        let pending: Arc<Mutex<VecDeque<Event<T>>>> = Arc::new(Mutex::new(VecDeque::new()));

        let o_cloned = Arc::clone(&o);
        let scheduler = scheduler.clone();
        let u = Subscriber::on_event(move |event| {
            if let Event::Error(e) = event {
                pending.lock().clear();
                o_cloned.lock().error(e);
                return;
            }
            pending.lock().push_back(event);

            let pending_cloned = Arc::clone(&pending);
            let o_task = Arc::clone(&o_cloned);
            let task = scheduler.schedule(
                duration,
                Box::new(move || {
                    // Pop under the downstream lock so concurrent tasks cannot
                    // reorder delivery.
                    let mut o = o_task.lock();
                    let event = pending_cloned.lock().pop_front();
                    if let Some(event) = event {
                        o.on(event);
                    }
                }),
            );
            o_cloned.lock().add_teardown(task);
        });
        o.lock().add_teardown(u.subscription().clone());
        source.subscribe(u)
    })
}
