//! The event stream emitted through `Host::emit`.

/// A host-native task identifier. `TaskId::IDLE` is the sentinel for the
/// per-CPU idle task; POID/PAIE records are suppressed while it's running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskId(pub u64);

impl TaskId {
    pub const IDLE: TaskId = TaskId(0);

    #[inline(always)]
    pub const fn is_idle(self) -> bool {
        self.0 == Self::IDLE.0
    }
}

/// One decomposition record or max-update, handed to `Host::emit`.
///
/// All durations are nanoseconds, already net of nested IRQ/NMI execution
/// time (see the `push_forward` interference compensation in `window`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// Preemption-or-IRQs-off duration.
    Poid { duration_ns: u64 },
    /// Preempt-active-interrupts-enabled duration.
    Paie { duration_ns: u64 },
    /// Pre-scheduling-delay duration (inside `schedule()`, before a switch
    /// is known to happen).
    Psd { duration_ns: u64 },
    /// Delay-before-switch-target duration: time from "a switch to this
    /// task is imminent" to the switch itself.
    Dst { duration_ns: u64, pid: TaskId },
    /// One IRQ handler's execution, independent of what it interrupted.
    IrqExecution {
        vector: i32,
        arrival_time_ns: u64,
        duration_ns: u64,
    },
    /// One NMI handler's execution.
    NmiExecution { start_ns: u64, duration_ns: u64 },
    /// A new running maximum for POID was reached.
    MaxPoid { duration_ns: u64 },
    /// A new running maximum for PAIE was reached.
    MaxPaie { duration_ns: u64 },
    /// A new running maximum for PSD was reached.
    MaxPsd { duration_ns: u64 },
    /// A new running maximum for DST was reached.
    MaxDst { duration_ns: u64 },
}
