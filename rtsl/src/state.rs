//! Per-CPU state the event handlers read and mutate.
//!
//! Each `CpuState` is owned exclusively by the CPU it describes: handlers
//! never touch another CPU's state, so the only synchronization needed is
//! the counter/barrier retry in `Window` against this CPU's own nested
//! interrupts (see `crate::window`).

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};

use crate::record::TaskId;
use crate::window::Window;

/// Scratch state for the IRQ currently executing on this CPU, if any.
pub(crate) struct IrqScratch {
    pub arrival_time: AtomicU64,
    pub window: Window,
    /// Whether PSD was open at IRQ entry; gates whether exit pushes PSD
    /// forward too.
    pub was_psd: AtomicBool,
    /// The vector reported at entry, or -1 if none is currently executing.
    pub vector: AtomicI32,
}

impl IrqScratch {
    const fn new() -> Self {
        IrqScratch {
            arrival_time: AtomicU64::new(0),
            window: Window::new(),
            was_psd: AtomicBool::new(false),
            vector: AtomicI32::new(-1),
        }
    }

    fn reset(&self) {
        self.arrival_time.store(0, Ordering::Relaxed);
        self.window.reset();
        self.was_psd.store(false, Ordering::Relaxed);
        self.vector.store(-1, Ordering::Relaxed);
    }
}

/// Scratch state for the NMI currently executing on this CPU, if any.
/// No retry protocol: NMIs don't nest with themselves on one CPU, and the
/// only reader is the `nmi_exit` that follows the `nmi_entry` that wrote
/// this.
pub(crate) struct NmiScratch {
    start: AtomicU64,
}

impl NmiScratch {
    const fn new() -> Self {
        NmiScratch {
            start: AtomicU64::new(0),
        }
    }

    fn reset(&self) {
        self.start.store(0, Ordering::Relaxed);
    }

    pub fn set(&self, t: u64) {
        self.start.store(t, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.start.load(Ordering::Relaxed)
    }
}

pub(crate) struct CpuState {
    pub poid: Window,
    pub poid_pd: AtomicBool,
    pub poid_id: AtomicBool,
    pub paie: Window,
    pub psd: Window,
    pub dst: Window,
    dst_pid: AtomicU64,
    pub irq: IrqScratch,
    pub nmi: NmiScratch,
    pub int_counter: AtomicU64,
    pub running: AtomicBool,
}

impl CpuState {
    pub const fn new() -> Self {
        CpuState {
            poid: Window::new(),
            poid_pd: AtomicBool::new(false),
            poid_id: AtomicBool::new(false),
            paie: Window::new(),
            psd: Window::new(),
            dst: Window::new(),
            dst_pid: AtomicU64::new(0),
            irq: IrqScratch::new(),
            nmi: NmiScratch::new(),
            int_counter: AtomicU64::new(0),
            running: AtomicBool::new(false),
        }
    }

    /// Zero every field. Only called from `Lifecycle::enable`/`disable`,
    /// which run with tracing disabled and no probe registered — no
    /// handler can be executing concurrently on this CPU.
    pub fn reset(&self) {
        self.poid.reset();
        self.poid_pd.store(false, Ordering::Relaxed);
        self.poid_id.store(false, Ordering::Relaxed);
        self.paie.reset();
        self.psd.reset();
        self.dst.reset();
        self.dst_pid.store(0, Ordering::Relaxed);
        self.irq.reset();
        self.nmi.reset();
        self.int_counter.store(0, Ordering::Relaxed);
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn dst_pid(&self) -> TaskId {
        TaskId(self.dst_pid.load(Ordering::Relaxed))
    }

    pub fn set_dst_pid(&self, pid: TaskId) {
        self.dst_pid.store(pid.0, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}
