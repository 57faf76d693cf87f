//! Common Smart Contracts utilities.

pub mod address;
pub mod storage_slot;
