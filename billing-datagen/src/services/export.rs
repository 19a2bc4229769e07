//! CSV export.
//!
//! Writes the six raw tables with explicit headers and hand-formatted
//! cells: RFC 3339 timestamps, plain dates, two-decimal money, empty
//! string for absent optionals. Cell formatting lives here so the models
//! stay presentation-free.

use crate::models::{Customer, Invoice, InvoiceLine, Plan, Subscription, SubscriptionEvent};
use crate::services::assembler::Dataset;
use chrono::{DateTime, Utc};
use datagen_core::error::AppError;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

/// Output file names, in write order.
pub const TABLE_FILES: [&str; 6] = [
    "raw_customers.csv",
    "raw_plans.csv",
    "raw_subscriptions.csv",
    "raw_subscription_events.csv",
    "raw_invoices.csv",
    "raw_invoice_lines.csv",
];

/// Write every table of `dataset` under `output_dir`, creating it first.
pub fn export_dataset(dataset: &Dataset, output_dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(output_dir)?;

    write_customers(&dataset.customers, &output_dir.join("raw_customers.csv"))?;
    write_plans(&dataset.plans, &output_dir.join("raw_plans.csv"))?;
    write_subscriptions(&dataset.subscriptions, &output_dir.join("raw_subscriptions.csv"))?;
    write_events(&dataset.events, &output_dir.join("raw_subscription_events.csv"))?;
    write_invoices(&dataset.invoices, &output_dir.join("raw_invoices.csv"))?;
    write_invoice_lines(&dataset.invoice_lines, &output_dir.join("raw_invoice_lines.csv"))?;

    tracing::info!(
        output_dir = %output_dir.display(),
        customers = dataset.customers.len(),
        plans = dataset.plans.len(),
        subscriptions = dataset.subscriptions.len(),
        events = dataset.events.len(),
        invoices = dataset.invoices.len(),
        invoice_lines = dataset.invoice_lines.len(),
        "exported dataset"
    );
    Ok(())
}

fn write_customers(customers: &[Customer], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "customer_id",
        "customer_name",
        "customer_segment",
        "country",
        "created_at",
        "is_test_account",
    ])?;
    for c in customers {
        writer.write_record([
            c.customer_id.clone(),
            c.customer_name.clone(),
            c.customer_segment.clone(),
            c.country.clone(),
            timestamp(c.created_at),
            c.is_test_account.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_plans(plans: &[Plan], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "plan_id",
        "plan_name",
        "currency",
        "billing_period_months",
        "price_per_period",
        "mrr_equivalent",
        "is_active",
    ])?;
    for p in plans {
        writer.write_record([
            p.plan_id.clone(),
            p.plan_name.clone(),
            p.currency.clone(),
            p.billing_period_months.to_string(),
            money(p.price_per_period),
            money(p.mrr_equivalent),
            p.is_active.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_subscriptions(subscriptions: &[Subscription], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "subscription_id",
        "customer_id",
        "plan_id",
        "status",
        "start_at",
        "canceled_at",
        "pause_start_at",
        "pause_end_at",
        "current_period_start",
        "current_period_end",
        "auto_renew",
        "created_at",
    ])?;
    for s in subscriptions {
        writer.write_record([
            s.subscription_id.clone(),
            s.customer_id.clone(),
            s.plan_id.clone(),
            s.status.as_str().to_string(),
            timestamp(s.start_at),
            opt_timestamp(s.canceled_at),
            opt_timestamp(s.pause_start_at),
            opt_timestamp(s.pause_end_at),
            s.current_period_start.to_string(),
            s.current_period_end.to_string(),
            s.auto_renew.to_string(),
            timestamp(s.created_at),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_events(events: &[SubscriptionEvent], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "event_id",
        "occurred_at",
        "effective_date",
        "subscription_id",
        "customer_id",
        "event_type",
        "old_plan_id",
        "new_plan_id",
        "reason",
    ])?;
    for e in events {
        writer.write_record([
            e.event_id.clone(),
            timestamp(e.occurred_at),
            e.effective_date.to_string(),
            e.subscription_id.clone(),
            e.customer_id.clone(),
            e.event_type.as_str().to_string(),
            e.old_plan_id.clone().unwrap_or_default(),
            e.new_plan_id.clone().unwrap_or_default(),
            e.reason.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_invoices(invoices: &[Invoice], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "invoice_id",
        "issued_at",
        "paid_at",
        "subscription_id",
        "customer_id",
        "status",
        "currency",
        "invoice_period_start",
        "invoice_period_end",
        "total_amount",
    ])?;
    for inv in invoices {
        writer.write_record([
            inv.invoice_id.clone(),
            timestamp(inv.issued_at),
            opt_timestamp(inv.paid_at),
            inv.subscription_id.clone(),
            inv.customer_id.clone(),
            inv.status.as_str().to_string(),
            inv.currency.clone(),
            inv.invoice_period_start.to_string(),
            inv.invoice_period_end.to_string(),
            money(inv.total_amount),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_invoice_lines(lines: &[InvoiceLine], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "invoice_line_id",
        "invoice_id",
        "subscription_id",
        "customer_id",
        "plan_id",
        "line_type",
        "amount",
        "service_period_start",
        "service_period_end",
        "quantity",
        "description",
    ])?;
    for line in lines {
        writer.write_record([
            line.invoice_line_id.clone(),
            line.invoice_id.clone(),
            line.subscription_id.clone(),
            line.customer_id.clone(),
            line.plan_id.clone(),
            line.line_type.as_str().to_string(),
            money(line.amount),
            line.service_period_start.to_string(),
            line.service_period_end.to_string(),
            line.quantity.to_string(),
            line.description.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn opt_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(timestamp).unwrap_or_default()
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
