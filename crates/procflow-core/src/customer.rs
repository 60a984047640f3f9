//! Customer record.

use crate::CustomerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Customer owns zero or more processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: CustomerId,

    /// Display name.
    pub name: String,

    /// Company name, if distinct from the display name.
    #[serde(default)]
    pub company: Option<String>,

    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,

    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,

    /// When the customer record was created.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Create a new Customer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CustomerId::generate(),
            name: name.into(),
            company: None,
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set the company.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Builder method to set the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
