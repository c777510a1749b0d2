//! Domain models for the accounts back office.

mod client;
mod invoice;
mod paging;
mod payment;

pub use client::{Client, UpdateOutstanding};
pub use invoice::ReferenceDocument;
pub use paging::{paginate, ListQuery, Page};
pub use payment::{
    CreatePaymentLine, CreatePaymentRequest, CreatePaymentResponse, Payment, PaymentDetail,
};
