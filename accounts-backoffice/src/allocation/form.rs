//! Entry-form lifecycle: editing, submitting, reset-on-success.

use super::{AllocationError, PaymentEntry};
use crate::models::{CreatePaymentRequest, ReferenceDocument};

/// The interactive payment-entry form: engine state, the candidate reference
/// documents offered for allocation, and the in-flight submission guard.
#[derive(Debug, Default)]
pub struct EntryForm {
    pub entry: PaymentEntry,
    pub candidates: Vec<ReferenceDocument>,
    submitting: bool,
}

impl EntryForm {
    /// Discard the current edit and start over with the given candidates.
    pub fn reset(&mut self, candidates: Vec<ReferenceDocument>) {
        self.entry = PaymentEntry::new();
        self.candidates = candidates;
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate the current state and move to the submitting state.
    ///
    /// Rejected outright while a previous submission is still outstanding, so
    /// a double-click cannot produce a duplicate receipt. A validation
    /// failure leaves the form in the editing state.
    pub fn begin_submit(&mut self) -> Result<CreatePaymentRequest, AllocationError> {
        if self.submitting {
            return Err(AllocationError::SubmissionInFlight);
        }
        let payload = self.entry.build_payload()?;
        self.submitting = true;
        Ok(payload)
    }

    /// Record the submission outcome: success clears the form back to a
    /// single default line, failure leaves the edit intact for correction.
    pub fn complete_submit(&mut self, success: bool) {
        self.submitting = false;
        if success {
            self.entry = PaymentEntry::new();
        }
    }
}
