//! Core business logic for FinTrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and credential rules
//! - `expense` - Expense records, filtering, and spending analytics
//! - `budget` - Budget validation, reconciliation against expenses, and alerts
//! - `projection` - EMI, SIP, and SWP calculators

pub mod auth;
pub mod budget;
pub mod expense;
pub mod projection;
