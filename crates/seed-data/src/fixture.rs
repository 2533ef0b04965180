//! The embedded placeholder dataset.

use serde::{Deserialize, Serialize};

use crate::{
    error::SeedError,
    models::{Customer, Invoice, RevenueRecord, User},
};

const PLACEHOLDER_JSON: &str = include_str!("../fixtures/placeholder-data.json");

/// A complete set of seed records, one collection per table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedDataset {
    pub users: Vec<User>,
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub revenue: Vec<RevenueRecord>,
}

impl SeedDataset {
    /// The dashboard's built-in sample data.
    pub fn placeholder() -> Result<Self, SeedError> {
        Self::from_json(PLACEHOLDER_JSON)
    }

    /// Parses a dataset with the same shape as the placeholder fixture.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.customers.is_empty()
            && self.invoices.is_empty()
            && self.revenue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_placeholder_parses() {
        let data = SeedDataset::placeholder().unwrap();

        assert_eq!(data.users.len(), 1);
        assert_eq!(data.customers.len(), 10);
        assert_eq!(data.invoices.len(), 15);
        assert_eq!(data.revenue.len(), 12);
    }

    #[test]
    fn test_placeholder_keys_are_unique() {
        let data = SeedDataset::placeholder().unwrap();

        let emails: HashSet<_> = data.users.iter().map(|u| &u.email).collect();
        assert_eq!(emails.len(), data.users.len());

        let customer_ids: HashSet<_> = data.customers.iter().map(|c| c.id).collect();
        assert_eq!(customer_ids.len(), data.customers.len());

        let months: HashSet<_> = data.revenue.iter().map(|r| &r.month).collect();
        assert_eq!(months.len(), data.revenue.len());
        assert!(data.revenue.iter().all(|r| r.month.len() <= 4));
    }

    #[test]
    fn test_invoices_reference_known_customers() {
        let data = SeedDataset::placeholder().unwrap();
        let customer_ids: HashSet<_> = data.customers.iter().map(|c| c.id).collect();

        for invoice in &data.invoices {
            assert!(
                customer_ids.contains(&invoice.customer_id),
                "invoice references unknown customer {}",
                invoice.customer_id
            );
        }
    }

    #[test]
    fn test_from_json_rejects_unknown_status() {
        let json = r#"{
            "users": [], "customers": [], "revenue": [],
            "invoices": [{"customer_id":"3958dc9e-712f-4377-85e9-fec4b6a6442a","amount":1,"status":"void","date":"2023-01-01"}]
        }"#;

        assert!(matches!(
            SeedDataset::from_json(json),
            Err(SeedError::Fixture(_))
        ));
    }

    #[test]
    fn test_empty_dataset() {
        assert!(SeedDataset::default().is_empty());
        assert!(!SeedDataset::placeholder().unwrap().is_empty());
    }
}
