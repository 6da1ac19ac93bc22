//! A `Host` implementation for replaying a scenario on an ordinary thread
//! instead of inside a kernel: state lives in a thread-local cell, driven
//! entirely by the scenario's own event list.

use std::cell::RefCell;

use rtsl::{Host, LifecycleError, ProbeBinding, ProbeHandle, Record, TaskId};

struct State {
    clock: u64,
    current_task: TaskId,
    need_resched: bool,
    irqs_disabled: bool,
    online_cpus: usize,
    next_probe: usize,
    emitted: Vec<(usize, Record)>,
}

impl State {
    fn fresh(online_cpus: usize) -> Self {
        State {
            clock: 0,
            current_task: TaskId::IDLE,
            need_resched: false,
            irqs_disabled: false,
            online_cpus,
            next_probe: 0,
            emitted: Vec::new(),
        }
    }
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::fresh(1));
}

pub struct SimHost;

impl SimHost {
    pub fn reset(online_cpus: usize) {
        STATE.with(|s| *s.borrow_mut() = State::fresh(online_cpus));
    }

    pub fn set_clock(ns: u64) {
        STATE.with(|s| s.borrow_mut().clock = ns);
    }

    pub fn advance_clock(ns: u64) {
        STATE.with(|s| s.borrow_mut().clock += ns);
    }

    pub fn set_current_task(task: TaskId) {
        STATE.with(|s| s.borrow_mut().current_task = task);
    }

    pub fn set_need_resched(value: bool) {
        STATE.with(|s| s.borrow_mut().need_resched = value);
    }

    pub fn set_irqs_disabled(value: bool) {
        STATE.with(|s| s.borrow_mut().irqs_disabled = value);
    }

    pub fn take_emitted() -> Vec<(usize, Record)> {
        STATE.with(|s| std::mem::take(&mut s.borrow_mut().emitted))
    }
}

impl Host for SimHost {
    fn now(_cpu: usize) -> rtsl::Instant {
        STATE.with(|s| rtsl::Instant::from_nanos(s.borrow().clock))
    }

    fn current_task(_cpu: usize) -> TaskId {
        STATE.with(|s| s.borrow().current_task)
    }

    fn need_resched(_cpu: usize) -> bool {
        STATE.with(|s| s.borrow().need_resched)
    }

    fn irqs_disabled(_cpu: usize) -> bool {
        STATE.with(|s| s.borrow().irqs_disabled)
    }

    fn online_cpus() -> usize {
        STATE.with(|s| s.borrow().online_cpus)
    }

    fn register_probe(binding: &ProbeBinding) -> Result<ProbeHandle, LifecycleError> {
        log::debug!("rtsl-sim: registering probe '{}'", binding.name);
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            let id = s.next_probe;
            s.next_probe += 1;
            Ok(ProbeHandle(id))
        })
    }

    fn unregister_probe(handle: ProbeHandle) {
        log::debug!("rtsl-sim: unregistering probe handle {}", handle.0);
    }

    fn emit(cpu: usize, record: Record) {
        log::info!("rtsl-sim: cpu{cpu}: {record:?}");
        STATE.with(|s| s.borrow_mut().emitted.push((cpu, record)));
    }
}
