//! Customer model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A billable account.
///
/// `created_at` always precedes the start of any subscription owned by
/// this customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_segment: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub is_test_account: bool,
}
