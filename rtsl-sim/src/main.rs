//! Replays catalog scenarios against the real `rtsl` engine, outside any
//! kernel, so its event-ordering logic can be exercised and read back on
//! an ordinary host.

mod catalog;
mod host;

use anyhow::Context;
use clap::{Parser, Subcommand};

use catalog::Step;
use host::SimHost;
use rtsl::vectors::GENERIC_IRQ_TABLE;
use rtsl::{Engine, Lifecycle, TaskId};

#[derive(Parser)]
#[command(name = "rtsl-sim", about = "Scenario replay harness for rtsl")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the named scenarios in the catalog.
    List,
    /// Replay one scenario and print every record it emits.
    Run {
        /// Scenario name, as shown by `list`.
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for scenario in catalog::CATALOG {
                println!("{:<20} {}", scenario.name, scenario.description);
            }
            Ok(())
        }
        Command::Run { name } => run(&name),
    }
}

fn run(name: &str) -> anyhow::Result<()> {
    let scenario = catalog::find(name)
        .with_context(|| format!("no such scenario: {name} (see `rtsl-sim list`)"))?;

    SimHost::reset(scenario.cpus);
    let lifecycle = Lifecycle::<SimHost, 16, 16>::new();
    lifecycle
        .enable(GENERIC_IRQ_TABLE)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("enabling the simulated engine")?;

    for step in scenario.steps {
        apply(lifecycle.engine(), *step)?;
    }

    let emitted = SimHost::take_emitted();
    println!("{} produced {} record(s):", scenario.name, emitted.len());
    for (cpu, record) in emitted {
        println!("  cpu{cpu}: {record:?}");
    }
    Ok(())
}

fn apply(engine: &Engine<SimHost, 16>, step: Step) -> anyhow::Result<()> {
    const CPU: usize = 0;
    match step {
        Step::SetClock(ns) => SimHost::set_clock(ns),
        Step::AdvanceClock(ns) => SimHost::advance_clock(ns),
        Step::SetCurrentTask(id) => SimHost::set_current_task(TaskId(id)),
        Step::SetNeedResched(v) => SimHost::set_need_resched(v),
        Step::SetIrqsDisabled(v) => SimHost::set_irqs_disabled(v),
        Step::PreemptDisable { to_schedule } => engine.on_preempt_disable(CPU, to_schedule),
        Step::PreemptEnable { to_schedule } => engine.on_preempt_enable(CPU, to_schedule),
        Step::IrqDisable { irq_entry } => engine.on_irq_disable(CPU, irq_entry),
        Step::IrqEnable { irq_exit } => engine.on_irq_enable(CPU, irq_exit),
        Step::NmiEntry => engine.on_nmi_entry(CPU),
        Step::NmiExit => engine.on_nmi_exit(CPU),
        Step::IrqVectorEntry(vector) => engine.on_irq_vector_entry(CPU, vector),
    }
    Ok(())
}
