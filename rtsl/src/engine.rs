//! The event handlers: one method per observed tracepoint, implementing
//! the per-CPU state machine described by `crate::state::CpuState`.
//!
//! Every handler starts with the same two gates: tracing must be globally
//! enabled, and this CPU must have already reached its "initial condition"
//! (see `on_preempt_disable`'s `sched` arm) — otherwise it's a no-op. That
//! keeps a CPU's very first observed window starting at a well-defined
//! boundary instead of mid-critical-section.

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::host::Host;
use crate::record::Record;
use crate::state::CpuState;

struct PerCpu<const CPUS: usize> {
    slots: [CpuState; CPUS],
}

impl<const CPUS: usize> PerCpu<CPUS> {
    fn new() -> Self {
        PerCpu {
            slots: core::array::from_fn(|_| CpuState::new()),
        }
    }
}

pub struct Engine<H: Host, const CPUS: usize> {
    enabled: AtomicBool,
    cpus: PerCpu<CPUS>,
    _host: PhantomData<fn() -> H>,
}

impl<H: Host, const CPUS: usize> Default for Engine<H, CPUS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host, const CPUS: usize> Engine<H, CPUS> {
    pub fn new() -> Self {
        Engine {
            enabled: AtomicBool::new(false),
            cpus: PerCpu::new(),
            _host: PhantomData,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn set_enabled(&self, value: bool) {
        self.enabled.store(value, Ordering::SeqCst);
    }

    pub(crate) fn reset_cpu(&self, cpu: usize) {
        if let Some(state) = self.cpus.slots.get(cpu) {
            state.reset();
        }
    }

    fn state(&self, cpu: usize) -> &CpuState {
        &self.cpus.slots[cpu]
    }

    /// Both gates at once: globally enabled, and this CPU tracking.
    fn armed(&self, cpu: usize) -> Option<&CpuState> {
        if !self.enabled.load(Ordering::Relaxed) {
            return None;
        }
        let state = self.state(cpu);
        if !state.is_running() {
            return None;
        }
        Some(state)
    }

    // ---- preempt_disable -------------------------------------------------

    pub fn on_preempt_disable(&self, cpu: usize, to_schedule: bool) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        let state = self.state(cpu);

        if !to_schedule {
            if !state.is_running() {
                return;
            }
            if state.irq.window.is_open() {
                // Disabling preemption from inside an IRQ handler is
                // interference, not a POID source in its own right.
                return;
            }
            let id_already = state.poid_id.load(Ordering::Relaxed);
            state.poid_pd.store(true, Ordering::Relaxed);
            if id_already {
                return;
            }
            state
                .poid
                .set_start(&state.int_counter, || H::now(cpu).as_nanos());
            return;
        }

        // `sched` arm: the scheduler was entered. Gate through the
        // initial-condition check the first time this fires on `cpu`.
        if !state.is_running() {
            if H::irqs_disabled(cpu) {
                // Not yet at a well-defined boundary; stay dormant.
                return;
            }
            state.running.store(true, Ordering::Relaxed);
        }

        let irq_open = state.irq.window.is_open();
        if H::need_resched(cpu) && !irq_open && !state.poid_id.load(Ordering::Relaxed) {
            self.close_paie(cpu, state);
        }
        state.paie.force_clear();
        state.set_dst_pid(H::current_task(cpu));
        state
            .psd
            .set_start(&state.int_counter, || H::now(cpu).as_nanos());
    }

    // ---- preempt_enable ---------------------------------------------------

    pub fn on_preempt_enable(&self, cpu: usize, to_schedule: bool) {
        let Some(state) = self.armed(cpu) else {
            return;
        };

        if !to_schedule {
            if state.irq.window.is_open() {
                return;
            }
            state.poid_pd.store(false, Ordering::Relaxed);
            if state.poid_id.load(Ordering::Relaxed) {
                return;
            }
            let d = state
                .poid
                .close(&state.int_counter, || H::now(cpu).as_nanos());
            self.report_idle_gated(cpu, d, &state.poid, Record::Poid { duration_ns: d }, |d| {
                Record::MaxPoid { duration_ns: d }
            });
            if H::need_resched(cpu) {
                state
                    .paie
                    .set_start(&state.int_counter, || H::now(cpu).as_nanos());
            }
            return;
        }

        if state.dst.is_open() {
            let d = state
                .dst
                .close(&state.int_counter, || H::now(cpu).as_nanos());
            H::emit(
                cpu,
                Record::Dst {
                    duration_ns: d,
                    pid: state.dst_pid(),
                },
            );
            if state.dst.update_max(d) {
                H::emit(cpu, Record::MaxDst { duration_ns: d });
            }
        }

        let d = state
            .psd
            .close(&state.int_counter, || H::now(cpu).as_nanos());
        H::emit(cpu, Record::Psd { duration_ns: d });
        if state.psd.update_max(d) {
            H::emit(cpu, Record::MaxPsd { duration_ns: d });
        }

        if H::need_resched(cpu) {
            state
                .paie
                .set_start(&state.int_counter, || H::now(cpu).as_nanos());
        }
    }

    fn close_paie(&self, cpu: usize, state: &CpuState) {
        if state.paie.is_closed() {
            return;
        }
        let d = state
            .paie
            .close(&state.int_counter, || H::now(cpu).as_nanos());
        self.report_idle_gated(cpu, d, &state.paie, Record::Paie { duration_ns: d }, |d| {
            Record::MaxPaie { duration_ns: d }
        });
    }

    /// POID/PAIE are both suppressed while the idle task is current, and
    /// their max-update is suppressed along with them (an unemitted
    /// duration can't become a reported new maximum).
    fn report_idle_gated(
        &self,
        cpu: usize,
        duration_ns: u64,
        window: &crate::window::Window,
        record: Record,
        max_record: impl FnOnce(u64) -> Record,
    ) {
        if H::current_task(cpu).is_idle() {
            return;
        }
        H::emit(cpu, record);
        if window.update_max(duration_ns) {
            H::emit(cpu, max_record(duration_ns));
        }
    }

    // ---- irq_disable --------------------------------------------------------

    pub fn on_irq_disable(&self, cpu: usize, irq_entry: bool) {
        let Some(state) = self.armed(cpu) else {
            return;
        };

        if irq_entry {
            if state.psd.is_open() {
                state.irq.was_psd.store(true, Ordering::Relaxed);
            }
            state
                .irq
                .arrival_time
                .store(H::now(cpu).as_nanos(), Ordering::Relaxed);
            state
                .irq
                .window
                .set_start(&state.int_counter, || H::now(cpu).as_nanos());
            return;
        }

        if state.psd.is_open() && state.dst_pid() == H::current_task(cpu) {
            state
                .dst
                .set_start(&state.int_counter, || H::now(cpu).as_nanos());
        }

        let pd_already = state.poid_pd.load(Ordering::Relaxed);
        state.poid_id.store(true, Ordering::Relaxed);
        if pd_already {
            return;
        }
        state
            .poid
            .set_start(&state.int_counter, || H::now(cpu).as_nanos());
    }

    // ---- irq_enable -----------------------------------------------------------

    pub fn on_irq_enable(&self, cpu: usize, irq_exit: bool) {
        let Some(state) = self.armed(cpu) else {
            return;
        };

        if irq_exit {
            let d = state
                .irq
                .window
                .close(&state.int_counter, || H::now(cpu).as_nanos());
            let arrival = state.irq.arrival_time.load(Ordering::Relaxed);
            let vector = state.irq.vector.load(Ordering::Relaxed);
            H::emit(
                cpu,
                Record::IrqExecution {
                    vector,
                    arrival_time_ns: arrival,
                    duration_ns: d,
                },
            );
            state.poid.push_forward(d);
            state.dst.push_forward(d);
            state.paie.push_forward(d);
            if state.irq.was_psd.load(Ordering::Relaxed) {
                state.psd.push_forward(d);
            }
            state.irq.vector.store(-1, Ordering::Relaxed);
            state.irq.was_psd.store(false, Ordering::Relaxed);
            return;
        }

        state.poid_id.store(false, Ordering::Relaxed);
        if state.poid_pd.load(Ordering::Relaxed) || state.psd.is_open() {
            return;
        }
        let d = state
            .poid
            .close(&state.int_counter, || H::now(cpu).as_nanos());
        self.report_idle_gated(cpu, d, &state.poid, Record::Poid { duration_ns: d }, |d| {
            Record::MaxPoid { duration_ns: d }
        });
        if H::need_resched(cpu) {
            state
                .paie
                .set_start(&state.int_counter, || H::now(cpu).as_nanos());
        }
    }

    // ---- nmi ------------------------------------------------------------------

    pub fn on_nmi_entry(&self, cpu: usize) {
        let Some(state) = self.armed(cpu) else {
            return;
        };
        state.nmi.set(H::now(cpu).as_nanos());
    }

    pub fn on_nmi_exit(&self, cpu: usize) {
        let Some(state) = self.armed(cpu) else {
            return;
        };
        let now = H::now(cpu).as_nanos();
        let start = state.nmi.get();
        let d = now.saturating_sub(start);
        H::emit(
            cpu,
            Record::NmiExecution {
                start_ns: start,
                duration_ns: d,
            },
        );
        // So any `set_start`/`close` in flight on this CPU retries instead
        // of reading a `start` this NMI is about to push forward.
        state.int_counter.fetch_add(1, Ordering::Relaxed);
        state.irq.window.push_forward(d);
        state.poid.push_forward(d);
        state.psd.push_forward(d);
        state.dst.push_forward(d);
        state.paie.push_forward(d);
    }

    // ---- irq vector dispatch ----------------------------------------------

    pub fn on_irq_vector_entry(&self, cpu: usize, vector: i32) {
        let Some(state) = self.armed(cpu) else {
            return;
        };
        state.irq.vector.store(vector, Ordering::Relaxed);
        state.int_counter.fetch_add(1, Ordering::Relaxed);
    }
}
