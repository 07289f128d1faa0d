//! Scoped critical sections
//!
//! Replaces the raw interrupt enable/disable instructions with a guard:
//! interrupts are masked when the guard is created and restored when it is
//! dropped, on every exit path. The actual masking is provided by whatever
//! `critical-section` implementation the final binary links in.

use core::marker::PhantomData;

use critical_section::RestoreState;

/// RAII critical section
///
/// Nesting is allowed; each guard restores the state that was active when
/// it was created. Nested guards must be dropped in reverse creation order.
#[must_use = "the critical section ends as soon as the guard is dropped"]
pub struct CriticalSectionGuard {
    restore: RestoreState,
    // Restoring on another thread/core would corrupt the interrupt state.
    _not_send: PhantomData<*mut ()>,
}

impl CriticalSectionGuard {
    /// Mask interrupts until the guard is dropped
    #[allow(unsafe_code)]
    pub fn enter() -> Self {
        // SAFETY: the matching release happens exactly once, in Drop.
        let restore = unsafe { critical_section::acquire() };
        Self {
            restore,
            _not_send: PhantomData,
        }
    }
}

impl Drop for CriticalSectionGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        // SAFETY: paired with the acquire in `enter`.
        unsafe { critical_section::release(self.restore) }
    }
}
