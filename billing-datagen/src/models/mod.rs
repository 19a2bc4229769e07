//! Entity models for the generated dataset.

pub mod customer;
pub mod event;
pub mod invoice;
pub mod plan;
pub mod subscription;

pub use customer::Customer;
pub use event::{EventType, SubscriptionEvent};
pub use invoice::{Invoice, InvoiceLine, InvoiceStatus, LineType};
pub use plan::{Plan, PlanCatalog};
pub use subscription::{Subscription, SubscriptionStatus};
