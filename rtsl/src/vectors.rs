//! Probe tables: which tracepoints this crate needs bound, as data.
//!
//! The previous design hard-coded per-platform vector numbers with
//! `cfg!(target_arch = ...)` inside the engine itself. That couples the
//! decomposition logic to a platform list it has no business knowing, and
//! means adding a board means patching the core. Instead a probe table is
//! just a list of `(name, kind)` pairs the host walks at `enable()` time,
//! handing each to its own tracepoint-registration glue; the engine only
//! ever sees the typed `on_*` calls that glue makes, never the table.

/// What kind of event a named probe corresponds to, so the host's
/// registration glue knows which `Engine` method to wire it to and with
/// what fixed arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    NmiEntry,
    NmiExit,
    IrqDisable { irq_entry: bool },
    IrqEnable { irq_exit: bool },
    PreemptDisable { to_schedule: bool },
    PreemptEnable { to_schedule: bool },
    /// A hardware or software IRQ vector firing. The actual vector number
    /// reported to `Engine::on_irq_vector_entry` comes from the tracepoint
    /// payload at runtime, not from this table.
    IrqVectorEntry,
}

/// One row of a probe table: a host-meaningful tracepoint name plus what
/// it's for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeBinding {
    pub name: &'static str,
    pub kind: ProbeKind,
}

/// The probes every configuration needs regardless of platform: the
/// preempt-count and IRQ-mask transitions, plus NMI entry/exit.
pub const CORE_PROBES: &[ProbeBinding] = &[
    ProbeBinding {
        name: "nmi_entry",
        kind: ProbeKind::NmiEntry,
    },
    ProbeBinding {
        name: "nmi_exit",
        kind: ProbeKind::NmiExit,
    },
    ProbeBinding {
        name: "irq_disable_entry",
        kind: ProbeKind::IrqDisable { irq_entry: true },
    },
    ProbeBinding {
        name: "irq_disable_normal",
        kind: ProbeKind::IrqDisable { irq_entry: false },
    },
    ProbeBinding {
        name: "irq_enable_exit",
        kind: ProbeKind::IrqEnable { irq_exit: true },
    },
    ProbeBinding {
        name: "irq_enable_normal",
        kind: ProbeKind::IrqEnable { irq_exit: false },
    },
    ProbeBinding {
        name: "preempt_disable_nosched",
        kind: ProbeKind::PreemptDisable { to_schedule: false },
    },
    ProbeBinding {
        name: "preempt_disable_sched",
        kind: ProbeKind::PreemptDisable { to_schedule: true },
    },
    ProbeBinding {
        name: "preempt_enable_nosched",
        kind: ProbeKind::PreemptEnable { to_schedule: false },
    },
    ProbeBinding {
        name: "preempt_enable_sched",
        kind: ProbeKind::PreemptEnable { to_schedule: true },
    },
];

/// Core probes plus every x86_64 local-APIC vector this crate tracks
/// individually, named the way the host's IDT glue names them.
pub const DEFAULT_X86_VECTORS: &[ProbeBinding] = &[
    CORE_PROBES[0],
    CORE_PROBES[1],
    CORE_PROBES[2],
    CORE_PROBES[3],
    CORE_PROBES[4],
    CORE_PROBES[5],
    CORE_PROBES[6],
    CORE_PROBES[7],
    CORE_PROBES[8],
    CORE_PROBES[9],
    ProbeBinding {
        name: "local_timer",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "thermal",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "deferred_error",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "threshold",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "call_function_single",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "call_function",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "reschedule",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "irq_work",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "platform_ipi",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "error_apic",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "spurious_apic",
        kind: ProbeKind::IrqVectorEntry,
    },
    ProbeBinding {
        name: "external_interrupt",
        kind: ProbeKind::IrqVectorEntry,
    },
];

/// Core probes plus a single generic `irq_handler_entry` tracepoint, for
/// hosts (or architectures) that expose one dispatch point for all device
/// IRQs rather than naming every vector.
pub const GENERIC_IRQ_TABLE: &[ProbeBinding] = &[
    CORE_PROBES[0],
    CORE_PROBES[1],
    CORE_PROBES[2],
    CORE_PROBES[3],
    CORE_PROBES[4],
    CORE_PROBES[5],
    CORE_PROBES[6],
    CORE_PROBES[7],
    CORE_PROBES[8],
    CORE_PROBES[9],
    ProbeBinding {
        name: "irq_handler_entry",
        kind: ProbeKind::IrqVectorEntry,
    },
];
