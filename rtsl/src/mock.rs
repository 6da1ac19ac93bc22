//! A scripted `Host` for tests: a single thread-local state block driven
//! entirely by the test itself (clock, current task, need-resched,
//! irqs-disabled), with an in-memory record sink.
//!
//! Thread-local rather than a shared global so tests run in parallel
//! (cargo's default) without stepping on each other's scripted state.

use std::cell::RefCell;
use std::vec::Vec;

use crate::error::LifecycleError;
use crate::host::{Host, ProbeHandle};
use crate::record::{Record, TaskId};
use crate::time::Instant;
use crate::vectors::ProbeBinding;

struct State {
    clock: u64,
    current_task: TaskId,
    need_resched: bool,
    irqs_disabled: bool,
    online_cpus: usize,
    emitted: Vec<(usize, Record)>,
    next_probe: usize,
    fail_probe_named: Option<&'static str>,
}

impl State {
    fn fresh(online_cpus: usize) -> Self {
        State {
            clock: 0,
            current_task: TaskId::IDLE,
            need_resched: false,
            irqs_disabled: false,
            online_cpus,
            emitted: Vec::new(),
            next_probe: 0,
            fail_probe_named: None,
        }
    }
}

std::thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::fresh(1));
}

pub struct MockHost;

impl MockHost {
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

    pub fn fail_probe_named(name: Option<&'static str>) {
        STATE.with(|s| s.borrow_mut().fail_probe_named = name);
    }

    pub fn drain_emitted() -> Vec<(usize, Record)> {
        STATE.with(|s| core::mem::take(&mut s.borrow_mut().emitted))
    }
}

impl Host for MockHost {
    fn now(_cpu: usize) -> Instant {
        STATE.with(|s| Instant::from_nanos(s.borrow().clock))
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
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            if s.fail_probe_named == Some(binding.name) {
                return Err(LifecycleError::ProbeRegistrationFailed { probe: binding.name });
            }
            let id = s.next_probe;
            s.next_probe += 1;
            Ok(ProbeHandle(id))
        })
    }

    fn unregister_probe(_handle: ProbeHandle) {}

    fn emit(cpu: usize, record: Record) {
        STATE.with(|s| s.borrow_mut().emitted.push((cpu, record)));
    }
}
