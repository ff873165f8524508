//! Tenant Billing Service - subscription fee calculations for restaurant tenants.
//!
//! The calculator in [`services::calculator`] is pure and synchronous; the
//! HTTP layer in [`handlers`] only parses input and renders results.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use error::BillingError;
