//! billing-datagen: synthesizes a consistent subscription-billing dataset
//! (customers, plans, subscriptions, lifecycle events, invoices, invoice
//! lines) for validating downstream billing-analytics transformations.

pub mod config;
pub mod models;
pub mod services;
