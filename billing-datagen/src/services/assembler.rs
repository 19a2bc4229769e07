//! Dataset assembly.
//!
//! Combines the plan catalog, the scripted scenarios, and the sampled
//! population into one dataset, scripted rows first so their ids lead
//! every table.

use crate::config::GeneratorConfig;
use crate::models::{
    Customer, Invoice, InvoiceLine, Plan, Subscription, SubscriptionEvent,
};
use crate::services::periods::PeriodCalculator;
use crate::services::random::RandomGenerator;
use crate::services::scenarios::ScenarioCatalog;
use datagen_core::error::AppError;
use rand::rngs::StdRng;

/// Which halves of the dataset to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Full,
    EdgeCasesOnly,
    RandomOnly,
}

/// The six output tables.
#[derive(Default)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub plans: Vec<Plan>,
    pub subscriptions: Vec<Subscription>,
    pub events: Vec<SubscriptionEvent>,
    pub invoices: Vec<Invoice>,
    pub invoice_lines: Vec<InvoiceLine>,
}

pub struct DatasetAssembler<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> DatasetAssembler<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn assemble(&self, mode: GenerationMode, rng: &mut StdRng) -> Result<Dataset, AppError> {
        let periods = PeriodCalculator::new(
            self.config.monthly_term_days,
            self.config.annual_term_days,
        );
        let catalog = self.config.plan_catalog();

        let mut dataset = Dataset {
            plans: catalog.plans().to_vec(),
            ..Dataset::default()
        };

        if mode != GenerationMode::RandomOnly {
            let scripted = ScenarioCatalog::new(&periods, &catalog).generate()?;
            tracing::info!(
                subscriptions = scripted.subscriptions.len(),
                invoices = scripted.invoices.len(),
                "generated scripted scenarios"
            );
            dataset.customers.extend(scripted.customers);
            dataset.subscriptions.extend(scripted.subscriptions);
            dataset.events.extend(scripted.events);
            dataset.invoices.extend(scripted.invoices);
            dataset.invoice_lines.extend(scripted.invoice_lines);
        }

        if mode != GenerationMode::EdgeCasesOnly {
            let sampled = RandomGenerator::new(self.config, &periods, &catalog).generate(rng)?;
            dataset.customers.extend(sampled.customers);
            dataset.subscriptions.extend(sampled.subscriptions);
            dataset.events.extend(sampled.events);
            dataset.invoices.extend(sampled.invoices);
            dataset.invoice_lines.extend(sampled.invoice_lines);
        }

        Ok(dataset)
    }
}
