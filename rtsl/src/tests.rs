use std::vec::Vec;

use crate::engine::Engine;
use crate::lifecycle::Lifecycle;
use crate::mock::MockHost;
use crate::record::{Record, TaskId};
use crate::vectors::{self, ProbeBinding};
use crate::{ControlFile, LifecycleError};

fn warmed_up(cpus: usize) -> Engine<MockHost, 4> {
    let _ = env_logger::try_init();
    assert!(cpus <= 4);
    MockHost::reset(cpus);
    MockHost::set_irqs_disabled(false);
    let engine = Engine::<MockHost, 4>::new();
    engine.set_enabled(true);
    // Drive the sched arm once to reach the initial condition and close
    // out the PSD window it opens, so every test starts from a clean,
    // fully-closed state.
    for cpu in 0..cpus {
        engine.on_preempt_disable(cpu, true);
        engine.on_preempt_enable(cpu, true);
    }
    MockHost::drain_emitted();
    engine
}

#[test]
fn poid_basic_open_close() {
    let engine = warmed_up(1);
    MockHost::set_current_task(TaskId(42));
    MockHost::set_clock(1_000);
    engine.on_preempt_disable(0, false);
    MockHost::advance_clock(2_000);
    engine.on_preempt_enable(0, false);

    let emitted = MockHost::drain_emitted();
    assert!(emitted.contains(&(0, Record::Poid { duration_ns: 2_000 })));
    assert!(emitted.contains(&(0, Record::MaxPoid { duration_ns: 2_000 })));
}

#[test]
fn poid_suppressed_while_idle() {
    let engine = warmed_up(1);
    MockHost::set_current_task(TaskId::IDLE);
    MockHost::set_clock(0);
    engine.on_preempt_disable(0, false);
    MockHost::advance_clock(5_000);
    engine.on_preempt_enable(0, false);

    let emitted = MockHost::drain_emitted();
    assert!(emitted.is_empty(), "idle task must not produce poid/max_poid: {emitted:?}");
}

#[test]
fn poid_excludes_nested_irq_execution_time() {
    let engine = warmed_up(1);
    MockHost::set_current_task(TaskId(7));
    MockHost::set_clock(0);
    engine.on_preempt_disable(0, false); // POID opens at t=0

    MockHost::set_clock(1_000);
    engine.on_irq_disable(0, true); // IRQ entry, IRQ window opens at t=1000

    MockHost::set_clock(1_500);
    engine.on_irq_enable(0, true); // IRQ exit, d=500; pushes POID.start to 500

    MockHost::set_clock(3_000);
    engine.on_preempt_enable(0, false); // POID closes: 3000 - 500 = 2500

    let emitted = MockHost::drain_emitted();
    assert!(emitted.iter().any(|r| matches!(
        r,
        (0, Record::IrqExecution { duration_ns: 500, .. })
    )));
    assert!(emitted.contains(&(0, Record::Poid { duration_ns: 2_500 })));
}

#[test]
fn poid_excludes_nested_nmi_execution_time() {
    let engine = warmed_up(1);
    MockHost::set_current_task(TaskId(7));
    MockHost::set_clock(0);
    engine.on_preempt_disable(0, false);

    MockHost::set_clock(100);
    engine.on_nmi_entry(0);
    MockHost::set_clock(250);
    engine.on_nmi_exit(0); // d=150, pushes POID.start to 150

    MockHost::set_clock(1_150);
    engine.on_preempt_enable(0, false); // 1150 - 150 = 1000

    let emitted = MockHost::drain_emitted();
    assert!(emitted.iter().any(|r| matches!(
        r,
        (0, Record::NmiExecution { duration_ns: 150, .. })
    )));
    assert!(emitted.contains(&(0, Record::Poid { duration_ns: 1_000 })));
}

#[test]
fn paie_opens_on_need_resched_and_closes_at_next_schedule() {
    let engine = warmed_up(1);
    MockHost::set_current_task(TaskId(3));

    MockHost::set_clock(0);
    engine.on_preempt_disable(0, false);
    MockHost::set_need_resched(true);
    MockHost::advance_clock(1_000);
    engine.on_preempt_enable(0, false); // closes POID, opens PAIE at t=1000

    MockHost::advance_clock(500); // t = 1500
    engine.on_preempt_disable(0, true); // sched arm: closes PAIE (500ns)

    let emitted = MockHost::drain_emitted();
    assert!(emitted.contains(&(0, Record::Poid { duration_ns: 1_000 })));
    assert!(emitted.contains(&(0, Record::Paie { duration_ns: 500 })));
    assert!(emitted.contains(&(0, Record::MaxPaie { duration_ns: 500 })));
}

#[test]
fn psd_and_dst_close_on_schedule_return() {
    let engine = warmed_up(1);
    MockHost::set_current_task(TaskId(9));
    MockHost::set_clock(0);
    engine.on_preempt_disable(0, true); // opens PSD at t=0, dst_pid=9

    MockHost::set_clock(200);
    engine.on_irq_disable(0, false); // normal sub-case: dst_pid == current, opens DST at t=200

    MockHost::set_clock(800);
    engine.on_preempt_enable(0, true); // closes DST (600ns) and PSD (800ns)

    let emitted = MockHost::drain_emitted();
    assert!(emitted.contains(&(
        0,
        Record::Dst {
            duration_ns: 600,
            pid: TaskId(9)
        }
    )));
    assert!(emitted.contains(&(0, Record::MaxDst { duration_ns: 600 })));
    assert!(emitted.contains(&(0, Record::Psd { duration_ns: 800 })));
    assert!(emitted.contains(&(0, Record::MaxPsd { duration_ns: 800 })));
}

#[test]
fn max_poid_only_reported_on_strict_increase() {
    let engine = warmed_up(1);
    MockHost::set_current_task(TaskId(1));

    let mut run = |start: u64, len: u64| {
        MockHost::set_clock(start);
        engine.on_preempt_disable(0, false);
        MockHost::set_clock(start + len);
        engine.on_preempt_enable(0, false);
    };

    run(0, 1_000);
    run(2_000, 1_000); // same duration again: no new max
    run(4_000, 1_500); // strictly greater: new max

    let emitted = MockHost::drain_emitted();
    let max_records: Vec<&(usize, Record)> = emitted
        .iter()
        .filter(|(_, r)| matches!(r, Record::MaxPoid { .. }))
        .collect();
    assert_eq!(
        max_records,
        std::vec![
            &(0, Record::MaxPoid { duration_ns: 1_000 }),
            &(0, Record::MaxPoid { duration_ns: 1_500 })
        ]
    );
}

#[test]
fn events_before_initial_condition_are_ignored() {
    MockHost::reset(1);
    MockHost::set_irqs_disabled(true); // interrupts off: initial condition not met
    let engine = Engine::<MockHost, 4>::new();
    engine.set_enabled(true);

    engine.on_preempt_disable(0, true); // sched arm, but irqs_disabled blocks it
    engine.on_preempt_disable(0, false);
    MockHost::advance_clock(1_000);
    engine.on_preempt_enable(0, false);

    assert!(MockHost::drain_emitted().is_empty());
}

#[test]
fn disabled_engine_ignores_every_handler() {
    MockHost::reset(1);
    let engine = Engine::<MockHost, 4>::new(); // never enabled
    engine.on_preempt_disable(0, true);
    engine.on_preempt_disable(0, false);
    engine.on_irq_disable(0, true);
    engine.on_irq_enable(0, true);
    engine.on_nmi_entry(0);
    engine.on_nmi_exit(0);
    engine.on_irq_vector_entry(0, 3);

    assert!(MockHost::drain_emitted().is_empty());
}

fn generic_table() -> &'static [ProbeBinding] {
    vectors::GENERIC_IRQ_TABLE
}

#[test]
fn control_file_read_reflects_enable_state() {
    MockHost::reset(2);
    let lifecycle = Lifecycle::<MockHost, 2, 16>::new();
    let cf = ControlFile::new(&lifecycle, generic_table());

    assert_eq!(cf.read(), b"0\n");
    cf.write(b"1\n").unwrap();
    assert_eq!(cf.read(), b"1\n");
    assert!(lifecycle.engine().is_enabled());

    cf.write(b"0").unwrap();
    assert_eq!(cf.read(), b"0\n");
    assert!(!lifecycle.engine().is_enabled());
}

#[test]
fn control_file_write_validates_input() {
    MockHost::reset(1);
    let lifecycle = Lifecycle::<MockHost, 1, 16>::new();
    let cf = ControlFile::new(&lifecycle, generic_table());

    assert_eq!(cf.write(b""), Err(crate::ControlError::BadAddress));
    assert_eq!(cf.write(b"xyz!"), Err(crate::ControlError::InvalidArgument));
    assert_eq!(cf.write(b"2"), Err(crate::ControlError::InvalidArgument));
}

#[test]
fn enable_rolls_back_on_probe_registration_failure() {
    MockHost::reset(1);
    let lifecycle = Lifecycle::<MockHost, 1, 16>::new();
    MockHost::fail_probe_named(Some("irq_handler_entry"));

    let err = lifecycle.enable(generic_table()).unwrap_err();
    assert_eq!(
        err,
        LifecycleError::ProbeRegistrationFailed {
            probe: "irq_handler_entry"
        }
    );
    assert!(!lifecycle.engine().is_enabled());
}

#[test]
fn reenabling_resets_per_cpu_state() {
    let engine_via_lifecycle = {
        MockHost::reset(1);
        let lifecycle = Lifecycle::<MockHost, 1, 16>::new();
        lifecycle.enable(generic_table()).unwrap();
        MockHost::set_irqs_disabled(false);
        lifecycle.engine().on_preempt_disable(0, true);
        MockHost::set_current_task(TaskId(5));
        MockHost::set_clock(0);
        lifecycle.engine().on_preempt_disable(0, false); // POID left open on purpose

        lifecycle.enable(generic_table()).unwrap(); // re-enable while already running: reset
        MockHost::drain_emitted();

        // A fresh POID/close cycle after reset must report its own
        // duration, not one skewed by the abandoned open window.
        MockHost::set_irqs_disabled(false);
        lifecycle.engine().on_preempt_disable(0, true);
        MockHost::set_current_task(TaskId(5));
        MockHost::set_clock(10_000);
        lifecycle.engine().on_preempt_disable(0, false);
        MockHost::advance_clock(250);
        lifecycle.engine().on_preempt_enable(0, false);
        MockHost::drain_emitted()
    };

    assert!(engine_via_lifecycle.contains(&(0, Record::Poid { duration_ns: 250 })));
}
