//! # Submission Guard
//!
//! Rejects a second submission while the first is still in flight: the
//! command-side twin of disabling the button.
//!
//! ```text
//! click ──► try_begin() ──► Ok(token) ──► POST ... ──► token dropped ──► idle
//! click ──► try_begin() ──► Err(REQUEST_IN_FLIGHT)      (while busy)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ApiError;

/// One guard per submitting control (sale button, order button, ...).
#[derive(Debug)]
pub struct SubmitGuard {
    action: &'static str,
    busy: AtomicBool,
}

/// Held while a submission runs. Dropping it, on success, error or early
/// return, releases the guard.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the token is dropped"]
pub struct SubmitToken<'a> {
    guard: &'a SubmitGuard,
}

impl SubmitGuard {
    /// `action` names the submission in the "already in progress" message.
    pub fn new(action: &'static str) -> Self {
        SubmitGuard {
            action,
            busy: AtomicBool::new(false),
        }
    }

    pub fn try_begin(&self) -> Result<SubmitToken<'_>, ApiError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::in_flight(self.action))?;
        Ok(SubmitToken { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for SubmitToken<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_second_submission_is_rejected() {
        let guard = SubmitGuard::new("Sale");
        let token = guard.try_begin().unwrap();

        let err = guard.try_begin().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequestInFlight);
        assert!(guard.is_busy());

        drop(token);
        assert!(!guard.is_busy());
        assert!(guard.try_begin().is_ok());
    }
}
