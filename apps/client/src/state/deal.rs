//! # Deal Builder State
//!
//! The bundle being composed in the admin console.

use std::sync::{Mutex, PoisonError};

use medwear_core::DealDraft;

#[derive(Debug, Default)]
pub struct DealBuilderState {
    draft: Mutex<DealDraft>,
}

impl DealBuilderState {
    pub fn new() -> Self {
        DealBuilderState::default()
    }

    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DealDraft) -> R,
    {
        f(&self.draft.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DealDraft) -> R,
    {
        f(&mut self.draft.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn snapshot(&self) -> DealDraft {
        self.with_draft(DealDraft::clone)
    }
}
