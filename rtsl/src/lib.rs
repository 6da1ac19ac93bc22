//! Per-CPU scheduling-latency decomposition: tracks the POID
//! (preemption-or-IRQs-off), PAIE (preempt-active-interrupts-enabled), PSD
//! (pre-scheduling-delay) and DST (delay-to-switch-target) windows, net of
//! nested IRQ/NMI execution time, and reports them plus their running
//! maxima through a host-supplied sink.
//!
//! This crate has no opinion on *how* events reach it — no architecture
//! code, no tracepoint framework, no allocator. Everything host-specific
//! lives behind the [`Host`] trait; the host's glue calls the typed
//! `Engine::on_*` methods from its own tracepoints.

#![cfg_attr(not(test), no_std)]

#[cfg(test)]
extern crate std;

mod engine;
mod state;
mod window;

pub mod control;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod record;
pub mod time;
pub mod vectors;

pub use control::ControlFile;
pub use engine::Engine;
pub use error::{ControlError, LifecycleError};
pub use host::{Host, ProbeHandle};
pub use lifecycle::Lifecycle;
pub use record::{Record, TaskId};
pub use time::Instant;
pub use vectors::{ProbeBinding, ProbeKind};

#[cfg(test)]
mod mock;

#[cfg(test)]
mod tests;
