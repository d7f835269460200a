//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{MAX_AMOUNT, parse_amount, percentage_of, round_rupiah};
pub use pagination::PageRequest;
