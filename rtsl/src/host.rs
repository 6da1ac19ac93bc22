//! The seam between this crate and everything host/platform-specific: the
//! clock, the scheduler's own state, the tracing framework's probe
//! registry, and the record sink.
//!
//! Mirrors the `PerCpuOps`/`TimerOps` split the rest of this codebase uses
//! to keep architecture detail out of portable logic: one trait, all
//! associated functions, implemented by a single zero-sized type the host
//! picks once and monomorphizes `Engine` over.

use crate::error::LifecycleError;
use crate::record::{Record, TaskId};
use crate::time::Instant;
use crate::vectors::ProbeBinding;

/// Opaque handle returned by `register_probe`, handed back unchanged to
/// `unregister_probe`. The host decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeHandle(pub usize);

pub trait Host {
    /// Read `cpu`'s monotonic clock, in nanoseconds. May race with, and be
    /// interrupted by, IRQs and NMIs on the same CPU.
    fn now(cpu: usize) -> Instant;

    /// The task currently scheduled on `cpu`.
    fn current_task(cpu: usize) -> TaskId;

    /// Whether the scheduler has a higher-priority task ready to run on
    /// `cpu` right now.
    fn need_resched(cpu: usize) -> bool;

    /// Whether interrupts are currently disabled on `cpu`.
    fn irqs_disabled(cpu: usize) -> bool;

    /// CPUs this host has online. `Engine` only ever touches `0..online_cpus()`.
    fn online_cpus() -> usize;

    /// Register one tracepoint probe. Only called from `Lifecycle::enable`,
    /// serialized by its control mutex; never on a hot path.
    fn register_probe(binding: &ProbeBinding) -> Result<ProbeHandle, LifecycleError>;

    /// Unregister a probe returned by an earlier `register_probe` call.
    fn unregister_probe(handle: ProbeHandle);

    /// Hand one record to the host's sink. Must not block, allocate, or
    /// call back into the engine.
    fn emit(cpu: usize, record: Record);
}
