//! Freelance service pricing backend.
//!
//! Products are built from tasks and steps; each step is charged at the
//! hourly rate of a specialty and experience tier, and the resulting labor
//! cost is run through the configured commissions, fees and taxes.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod routes;
pub mod services;
pub mod store;
