//! The allocation engine: a receipt draft plus its ordered allocation lines.
//!
//! Every display and validation value (running totals, balances, claimed
//! reference ids) is derived from the current line list on demand; nothing is
//! cached, so removing or editing a line can never leave a stale total.

use super::{AllocationError, PaymentMode, ReceiptType};
use crate::models::{CreatePaymentLine, CreatePaymentRequest};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// Receipt header fields, mutable until submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReceiptDraft {
    pub client_id: Option<i64>,
    pub receipt_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub payment_mode: Option<PaymentMode>,
    pub description: String,
    pub opening_balance: Decimal,
    pub opening_balance_date: Option<NaiveDate>,
}

/// One row mapping part of the receipt amount to a justification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationLine {
    pub receipt_type: ReceiptType,
    /// Reference documents backing this line; only meaningful for
    /// `ReceiptType::Invoice` lines.
    pub references: BTreeSet<i64>,
    pub amount: Decimal,
    pub description: String,
}

/// A single scalar-field update, one variant per editable line field.
#[derive(Debug, Clone)]
pub enum LineEdit {
    ReceiptType(ReceiptType),
    Amount(Decimal),
    Description(String),
}

/// The payment-entry engine.
#[derive(Debug, Clone)]
pub struct PaymentEntry {
    pub receipt: ReceiptDraft,
    pub lines: Vec<AllocationLine>,
}

impl Default for PaymentEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentEntry {
    /// A fresh entry: cleared receipt and a single default line.
    pub fn new() -> Self {
        Self {
            receipt: ReceiptDraft::default(),
            lines: vec![AllocationLine::default()],
        }
    }

    /// Append a new empty line.
    pub fn add_line(&mut self) {
        self.lines.push(AllocationLine::default());
    }

    /// Remove the line at `index`. Out-of-range indexes are ignored.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Apply a single-field edit to the line at `index`. Out-of-range indexes
    /// are ignored. Switching a line away from `Invoice` clears its reference
    /// set, since references are only meaningful for invoice lines.
    pub fn edit_line(&mut self, index: usize, edit: LineEdit) {
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };
        match edit {
            LineEdit::ReceiptType(receipt_type) => {
                line.receipt_type = receipt_type;
                if receipt_type != ReceiptType::Invoice {
                    line.references.clear();
                }
            }
            LineEdit::Amount(amount) => line.amount = amount,
            LineEdit::Description(description) => line.description = description,
        }
    }

    /// Replace the reference set of the line at `index`. An id already claimed
    /// by a different line is rejected, keeping every reference document on at
    /// most one line. Out-of-range indexes are ignored.
    pub fn set_line_references(
        &mut self,
        index: usize,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<(), AllocationError> {
        if index >= self.lines.len() {
            return Ok(());
        }
        let references: BTreeSet<i64> = ids.into_iter().collect();
        let claimed = self.used_reference_ids(Some(index));
        if let Some(&id) = references.intersection(&claimed).next() {
            return Err(AllocationError::ReferenceInUse { id });
        }
        self.lines[index].references = references;
        Ok(())
    }

    /// Union of reference ids over every line except `excluding`.
    pub fn used_reference_ids(&self, excluding: Option<usize>) -> BTreeSet<i64> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != excluding)
            .flat_map(|(_, line)| line.references.iter().copied())
            .collect()
    }

    /// Sum of line amounts over indexes 0..=`upto`.
    pub fn running_total(&self, upto: usize) -> Decimal {
        self.lines
            .iter()
            .take(upto.saturating_add(1))
            .map(|line| line.amount)
            .sum()
    }

    /// Signed remainder after the lines up to `upto`; negative once the
    /// receipt is over-allocated.
    pub fn balance(&self, upto: usize) -> Decimal {
        self.receipt.amount - self.running_total(upto)
    }

    /// `balance` clamped for display; never negative.
    pub fn display_balance(&self, upto: usize) -> Decimal {
        self.balance(upto).max(Decimal::ZERO)
    }

    /// Total allocated across all lines.
    pub fn total_allocated(&self) -> Decimal {
        self.lines.iter().map(|line| line.amount).sum()
    }

    /// Signed unallocated remainder for the whole entry.
    pub fn unallocated(&self) -> Decimal {
        self.receipt.amount - self.total_allocated()
    }

    /// Validate the entry and assemble the upstream creation payload.
    ///
    /// A missing client or an allocation total above the receipt amount is
    /// rejected here, before anything reaches the network. Under-allocation
    /// is allowed; the remainder stays on account upstream.
    pub fn build_payload(&self) -> Result<CreatePaymentRequest, AllocationError> {
        let Some(client_id) = self.receipt.client_id else {
            return Err(AllocationError::MissingClient);
        };
        let allocated = self.total_allocated();
        if allocated > self.receipt.amount {
            return Err(AllocationError::OverAllocated {
                allocated,
                total: self.receipt.amount,
            });
        }
        Ok(CreatePaymentRequest {
            client_id,
            receipt_date: self.receipt.receipt_date,
            receipt_amount: self.receipt.amount,
            payment_mode: self.receipt.payment_mode,
            description: self.receipt.description.clone(),
            opening_balance: self.receipt.opening_balance,
            opening_balance_date: self.receipt.opening_balance_date,
            details: self
                .lines
                .iter()
                .map(|line| CreatePaymentLine {
                    receipt_type: line.receipt_type,
                    reference_ids: line.references.iter().copied().collect(),
                    amount: line.amount,
                    description: line.description.clone(),
                })
                .collect(),
        })
    }
}
