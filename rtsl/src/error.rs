//! Error types for the lifecycle and control surfaces.
//!
//! Deliberately plain enums, not `thiserror`: the core has no allocator and
//! no use for a derive that mostly saves boilerplate `Display` impls.

use core::fmt;

/// Failure modes for `Lifecycle::enable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// A probe in the table failed to register with the host. Any probes
    /// registered earlier in the same `enable()` call are rolled back
    /// before this is returned.
    ProbeRegistrationFailed { probe: &'static str },
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::ProbeRegistrationFailed { probe } => {
                write!(f, "probe registration failed: {probe}")
            }
        }
    }
}

/// Failure modes for `ControlFile::write`, mapped the way the host's
/// syscall layer expects (EINVAL/EFAULT equivalents).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// The written byte isn't `'0'` or `'1'`, or the write was longer than
    /// the 3-byte limit.
    InvalidArgument,
    /// A zero-length write.
    BadAddress,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::InvalidArgument => write!(f, "invalid argument"),
            ControlError::BadAddress => write!(f, "bad address"),
        }
    }
}
