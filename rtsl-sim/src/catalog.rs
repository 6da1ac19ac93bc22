//! A host-side catalog of named replay scenarios.
//!
//! Mirrors the engine's own unit-test scenarios so a scenario that starts
//! failing here is a signal the two have drifted apart; kept in sync by
//! convention, not by sharing code (the unit tests drive the engine
//! in-process, this drives it through the CLI's event log).

#[derive(Debug, Clone, Copy)]
pub enum Step {
    SetClock(u64),
    AdvanceClock(u64),
    SetCurrentTask(u64),
    SetNeedResched(bool),
    SetIrqsDisabled(bool),
    PreemptDisable { to_schedule: bool },
    PreemptEnable { to_schedule: bool },
    IrqDisable { irq_entry: bool },
    IrqEnable { irq_exit: bool },
    NmiEntry,
    NmiExit,
    IrqVectorEntry(i32),
}

pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub cpus: usize,
    pub steps: &'static [Step],
}

pub const CATALOG: &[Scenario] = &[
    Scenario {
        name: "basic-poid",
        description: "A plain preempt_disable/enable pair with no interference",
        cpus: 1,
        steps: &[
            Step::SetIrqsDisabled(false),
            Step::PreemptDisable { to_schedule: true },
            Step::PreemptEnable { to_schedule: true },
            Step::SetCurrentTask(42),
            Step::SetClock(1_000),
            Step::PreemptDisable { to_schedule: false },
            Step::AdvanceClock(2_000),
            Step::PreemptEnable { to_schedule: false },
        ],
    },
    Scenario {
        name: "irq-interference",
        description: "An IRQ nested inside a POID window, excluded from its duration",
        cpus: 1,
        steps: &[
            Step::SetIrqsDisabled(false),
            Step::PreemptDisable { to_schedule: true },
            Step::PreemptEnable { to_schedule: true },
            Step::SetCurrentTask(7),
            Step::SetClock(0),
            Step::PreemptDisable { to_schedule: false },
            Step::SetClock(1_000),
            Step::IrqDisable { irq_entry: true },
            Step::SetClock(1_500),
            Step::IrqEnable { irq_exit: true },
            Step::SetClock(3_000),
            Step::PreemptEnable { to_schedule: false },
        ],
    },
    Scenario {
        name: "nmi-interference",
        description: "An NMI nested inside a POID window, excluded from its duration",
        cpus: 1,
        steps: &[
            Step::SetIrqsDisabled(false),
            Step::PreemptDisable { to_schedule: true },
            Step::PreemptEnable { to_schedule: true },
            Step::SetCurrentTask(7),
            Step::SetClock(0),
            Step::PreemptDisable { to_schedule: false },
            Step::SetClock(100),
            Step::NmiEntry,
            Step::SetClock(250),
            Step::NmiExit,
            Step::SetClock(1_150),
            Step::PreemptEnable { to_schedule: false },
        ],
    },
    Scenario {
        name: "paie-resched",
        description: "need_resched opens PAIE at preempt_enable; it closes on the next schedule()",
        cpus: 1,
        steps: &[
            Step::SetIrqsDisabled(false),
            Step::PreemptDisable { to_schedule: true },
            Step::PreemptEnable { to_schedule: true },
            Step::SetCurrentTask(3),
            Step::SetClock(0),
            Step::PreemptDisable { to_schedule: false },
            Step::SetNeedResched(true),
            Step::AdvanceClock(1_000),
            Step::PreemptEnable { to_schedule: false },
            Step::AdvanceClock(500),
            Step::PreemptDisable { to_schedule: true },
        ],
    },
    Scenario {
        name: "psd-dst-handoff",
        description: "DST tracks the incoming task from inside schedule() until the switch",
        cpus: 1,
        steps: &[
            Step::SetCurrentTask(9),
            Step::SetClock(0),
            Step::PreemptDisable { to_schedule: true },
            Step::SetClock(200),
            Step::IrqDisable { irq_entry: false },
            Step::SetClock(800),
            Step::PreemptEnable { to_schedule: true },
        ],
    },
    Scenario {
        name: "idle-suppression",
        description: "No poid/paie records are emitted while the idle task is current",
        cpus: 1,
        steps: &[
            Step::SetIrqsDisabled(false),
            Step::PreemptDisable { to_schedule: true },
            Step::PreemptEnable { to_schedule: true },
            Step::SetClock(0),
            Step::PreemptDisable { to_schedule: false },
            Step::AdvanceClock(5_000),
            Step::PreemptEnable { to_schedule: false },
        ],
    },
];

pub fn find(name: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.name == name)
}
