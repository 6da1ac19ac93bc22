//! Global enable/disable and probe (un)registration around an `Engine`.
//!
//! The control mutex here is the only lock in this crate a hot-path
//! handler never takes: `enable`/`disable` always run with tracing off and
//! (by the time they touch per-CPU state) no probe registered, so they
//! never race `Engine`'s handlers.

use spin::Mutex;

use crate::engine::Engine;
use crate::error::LifecycleError;
use crate::host::{Host, ProbeHandle};
use crate::vectors::ProbeBinding;

struct ProbeSlots<const MAX_PROBES: usize> {
    handles: [Option<ProbeHandle>; MAX_PROBES],
}

impl<const MAX_PROBES: usize> ProbeSlots<MAX_PROBES> {
    const fn new() -> Self {
        ProbeSlots {
            handles: [None; MAX_PROBES],
        }
    }

    fn unregister_all<H: Host>(&mut self) {
        for slot in self.handles.iter_mut() {
            if let Some(handle) = slot.take() {
                H::unregister_probe(handle);
            }
        }
    }
}

/// Owns an `Engine` plus the bookkeeping needed to bring it up and down:
/// which probes are currently registered, and with what host-side handles.
pub struct Lifecycle<H: Host, const CPUS: usize, const MAX_PROBES: usize> {
    engine: Engine<H, CPUS>,
    control: Mutex<ProbeSlots<MAX_PROBES>>,
}

impl<H: Host, const CPUS: usize, const MAX_PROBES: usize> Default
    for Lifecycle<H, CPUS, MAX_PROBES>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host, const CPUS: usize, const MAX_PROBES: usize> Lifecycle<H, CPUS, MAX_PROBES> {
    pub fn new() -> Self {
        Lifecycle {
            engine: Engine::new(),
            control: Mutex::new(ProbeSlots::new()),
        }
    }

    pub fn engine(&self) -> &Engine<H, CPUS> {
        &self.engine
    }

    /// Register every probe in `table`, then mark tracing enabled. If
    /// already enabled, disables first (a write of `'1'` while running is a
    /// reset, not a no-op). On a mid-table registration failure, rolls back
    /// everything registered so far and leaves tracing off.
    pub fn enable(&self, table: &[ProbeBinding]) -> Result<(), LifecycleError> {
        assert!(
            table.len() <= MAX_PROBES,
            "probe table longer than MAX_PROBES"
        );

        let mut slots = self.control.lock();

        if self.engine.is_enabled() {
            self.disable_locked(&mut slots);
        }

        for cpu in 0..H::online_cpus().min(CPUS) {
            self.engine.reset_cpu(cpu);
        }

        let mut registered = 0usize;
        for binding in table.iter() {
            match H::register_probe(binding) {
                Ok(handle) => {
                    slots.handles[registered] = Some(handle);
                    registered += 1;
                }
                Err(err) => {
                    log::warn!("rtsl: probe '{}' failed to register: {err}", binding.name);
                    for slot in slots.handles[..registered].iter_mut() {
                        if let Some(handle) = slot.take() {
                            H::unregister_probe(handle);
                        }
                    }
                    return Err(err);
                }
            }
        }

        self.engine.set_enabled(true);
        log::info!("rtsl: tracing enabled, {registered} probes registered");
        Ok(())
    }

    pub fn disable(&self) {
        let mut slots = self.control.lock();
        self.disable_locked(&mut slots);
    }

    fn disable_locked(&self, slots: &mut ProbeSlots<MAX_PROBES>) {
        self.engine.set_enabled(false);
        slots.unregister_all::<H>();
        for cpu in 0..CPUS {
            self.engine.reset_cpu(cpu);
        }
        log::info!("rtsl: tracing disabled");
    }
}
