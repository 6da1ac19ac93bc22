//! The counter/barrier retry primitive every timing window is built from.
//!
//! A window's `start` is read by the CPU that owns it, but can be mutated
//! *underneath* a `now()` read by a nested IRQ or NMI on the same CPU
//! (interference compensation pushes `start` forward while the interrupt
//! executes). `set_start`/`close` guard against observing a torn read by
//! retrying whenever the per-CPU interrupt counter changed between the two
//! loads.

use core::sync::atomic::{compiler_fence, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Window {
    start: AtomicU64,
    max: AtomicU64,
}

impl Window {
    pub const fn new() -> Self {
        Window {
            start: AtomicU64::new(0),
            max: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub fn is_open(&self) -> bool {
        self.start.load(Ordering::Relaxed) != 0
    }

    #[inline(always)]
    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    #[inline(always)]
    pub fn max(&self) -> u64 {
        self.max.load(Ordering::Relaxed)
    }

    /// Zero both fields. Only safe while nothing can be racing this
    /// window's owning CPU, i.e. during enable()/disable().
    pub fn reset(&self) {
        self.start.store(0, Ordering::Relaxed);
        self.max.store(0, Ordering::Relaxed);
    }

    /// Open the window at `now()`, retrying the read if `int_counter`
    /// changed underneath it (an IRQ or NMI fired mid-read and may have
    /// already pushed a stale `start` forward).
    #[inline(always)]
    pub fn set_start(&self, int_counter: &AtomicU64, now: impl Fn() -> u64) {
        loop {
            let before = int_counter.load(Ordering::Relaxed);
            compiler_fence(Ordering::SeqCst);
            let t = now();
            compiler_fence(Ordering::SeqCst);
            let after = int_counter.load(Ordering::Relaxed);
            if before == after {
                self.start.store(t, Ordering::Relaxed);
                return;
            }
        }
    }

    /// Close the window and return its duration, retrying on the same
    /// condition as `set_start`.
    #[inline(always)]
    pub fn close(&self, int_counter: &AtomicU64, now: impl Fn() -> u64) -> u64 {
        loop {
            let before = int_counter.load(Ordering::Relaxed);
            compiler_fence(Ordering::SeqCst);
            let t = now();
            let start = self.start.load(Ordering::Relaxed);
            compiler_fence(Ordering::SeqCst);
            let after = int_counter.load(Ordering::Relaxed);
            if before == after {
                self.start.store(0, Ordering::Relaxed);
                return t.saturating_sub(start);
            }
        }
    }

    /// Clear `start` without computing or returning a duration — used when
    /// a window must be abandoned silently rather than closed and reported.
    #[inline(always)]
    pub fn force_clear(&self) {
        self.start.store(0, Ordering::Relaxed);
    }

    /// If this window is open, push its `start` forward by `delta`. Called
    /// by IRQ/NMI exit on every window so the interrupt's own execution
    /// time is excluded from whatever it interrupted.
    #[inline(always)]
    pub fn push_forward(&self, delta: u64) {
        let start = self.start.load(Ordering::Relaxed);
        if start != 0 {
            self.start.fetch_add(delta, Ordering::Relaxed);
        }
    }

    /// Raise `max` to `duration` if it's a new strict maximum. Returns
    /// whether it updated — callers emit a `max_*` record only then, which
    /// keeps the emitted max sequence strictly increasing (an equal
    /// duration is not a new maximum and is not reported again).
    #[inline(always)]
    pub fn update_max(&self, duration: u64) -> bool {
        loop {
            let current = self.max.load(Ordering::Relaxed);
            if duration <= current {
                return false;
            }
            if self
                .max
                .compare_exchange_weak(current, duration, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }
}
