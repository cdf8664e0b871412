//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over the
//! board's millisecond tick counter, so release timing can be tested on host
//! without embedded dependencies.
//!
//! The counter is a `u32` that wraps after ~49.7 days of uptime. All elapsed
//! time calculations go through [`elapsed_ms`], which uses modular
//! subtraction and stays correct across the wrap.

use core::cell::Cell;

/// Milliseconds elapsed from `since` to `now` on a wrapping `u32` counter.
///
/// Correct as long as the true interval is shorter than one full counter
/// period (2^32 ms).
///
/// # Example
///
/// ```
/// use parachute_core::traits::elapsed_ms;
///
/// assert_eq!(elapsed_ms(1_500, 1_000), 500);
/// // Counter wrapped between the two samples
/// assert_eq!(elapsed_ms(200, u32::MAX - 299), 500);
/// ```
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Platform-agnostic monotonic millisecond clock.
///
/// This trait abstracts over different time providers:
/// - the firmware's system tick counter on embedded targets
/// - `MockTime` for host testing with controllable time
///
/// # Example
///
/// ```
/// use parachute_core::traits::{MockTime, TimeSource};
///
/// fn poll<T: TimeSource>(time: &T, last_update: &mut u32) -> bool {
///     if time.elapsed_since(*last_update) >= 100 { // 10Hz
///         *last_update = time.now_ms();
///         return true;
///     }
///     false
/// }
///
/// let time = MockTime::new();
/// let mut last = 0;
/// time.advance(100);
/// assert!(poll(&time, &mut last));
/// ```
pub trait TimeSource {
    /// Returns current time in milliseconds since system start (wrapping).
    fn now_ms(&self) -> u32;

    /// Returns elapsed milliseconds since a reference point.
    ///
    /// Uses wrapping subtraction so the result is correct across a counter
    /// wrap.
    fn elapsed_since(&self, reference_ms: u32) -> u32 {
        elapsed_ms(self.now_ms(), reference_ms)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// Share it with a controller by reference (`&MockTime` is itself a
/// `TimeSource`) and advance it from the test body.
///
/// # Example
///
/// ```
/// use parachute_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ms(), 0);
///
/// time.advance(250);
/// assert_eq!(time.now_ms(), 250);
/// ```
#[derive(Debug, Default)]
pub struct MockTime {
    current_ms: Cell<u32>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(ms: u32) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ms: u32) {
        self.current_ms.set(ms);
    }

    /// Advances the current time, wrapping like the hardware counter.
    pub fn advance(&self, ms: u32) {
        self.current_ms.set(self.current_ms.get().wrapping_add(ms));
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u32 {
        self.current_ms.get()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
