//! The control-file contract: a single byte toggles tracing, reads report
//! the current state the way the host's pseudo-filesystem would render it.
//!
//! Grounded in the same convention as a one-byte `/proc` or `/sys` enable
//! knob: `read()` always returns `"1\n"` or `"0\n"`; `write()` only looks
//! at the first byte and tolerates a trailing newline.

use crate::error::ControlError;
use crate::host::Host;
use crate::lifecycle::Lifecycle;
use crate::vectors::ProbeBinding;

pub struct ControlFile<'a, H: Host, const CPUS: usize, const MAX_PROBES: usize> {
    lifecycle: &'a Lifecycle<H, CPUS, MAX_PROBES>,
    table: &'a [ProbeBinding],
}

impl<'a, H: Host, const CPUS: usize, const MAX_PROBES: usize> ControlFile<'a, H, CPUS, MAX_PROBES> {
    pub fn new(lifecycle: &'a Lifecycle<H, CPUS, MAX_PROBES>, table: &'a [ProbeBinding]) -> Self {
        ControlFile { lifecycle, table }
    }

    pub fn read(&self) -> &'static [u8] {
        if self.lifecycle.engine().is_enabled() {
            b"1\n"
        } else {
            b"0\n"
        }
    }

    pub fn write(&self, buf: &[u8]) -> Result<(), ControlError> {
        if buf.is_empty() {
            return Err(ControlError::BadAddress);
        }
        if buf.len() > 3 {
            return Err(ControlError::InvalidArgument);
        }
        match buf[0] {
            b'1' => self
                .lifecycle
                .enable(self.table)
                .map_err(|_| ControlError::InvalidArgument),
            b'0' => {
                self.lifecycle.disable();
                Ok(())
            }
            _ => Err(ControlError::InvalidArgument),
        }
    }
}
