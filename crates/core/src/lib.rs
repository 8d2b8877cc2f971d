//! Core business logic for Parcela.
//!
//! This crate contains the installment and debt reconciliation engine with
//! ZERO storage-transport dependencies. Persistence goes through the
//! [`store::Collection`] port.
//!
//! # Modules
//!
//! - `currency` - Decimal parsing, formatting and rounding
//! - `schedule` - Shared purchases and their monthly installments
//! - `summary` - Per-person monthly aggregation
//! - `debt` - Debt balances and payment history
//! - `partial` - Partial payments against a monthly total
//! - `closing` - Month closing into payment plus carried-over debt
//! - `personal` - Personal expenses and installment series
//! - `observation` - Monthly notes
//! - `session` - One service per entity kind for a session

pub mod clock;
pub mod closing;
pub mod currency;
pub mod debt;
pub mod instrument;
pub mod observation;
pub mod partial;
pub mod personal;
pub mod schedule;
pub mod session;
pub mod store;
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use instrument::PaymentKind;
pub use session::{Backends, Household, MonthOverview, PersonOverview};
