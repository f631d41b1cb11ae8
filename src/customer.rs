//! The customer record and the request shapes that create or modify it.

use serde::{Deserialize, Serialize};

/// A customer as stored in the `customers` table and returned over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Customer {
    /// Assigned by the storage layer on insert; never changes afterwards
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Free-form label such as "active"
    pub status: String,
}

impl Customer {
    /// Build the stored record for a freshly inserted row.
    pub fn from_new(id: i64, new: NewCustomer) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            status: new.status,
        }
    }
}

/// Request body for creating a customer.
///
/// Absent fields default to the empty string. An `id` key, if sent, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub status: String,
}

/// Request body for updating a customer.
///
/// Only fields that are present (and not `null`) replace the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CustomerPatch {
    /// Merge the supplied fields onto `customer`, leaving the rest untouched.
    pub fn apply(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(status) = self.status {
            customer.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Customer {
        Customer {
            id: 7,
            name: "Alice".to_string(),
            email: "a@example.com".to_string(),
            status: "active".to_string(),
        }
    }

    #[test]
    fn new_customer_ignores_id_and_defaults_missing_fields() {
        let new: NewCustomer = serde_json::from_str(r#"{"id": 99, "name": "Bob"}"#).unwrap();
        assert_eq!(new.name, "Bob");
        assert_eq!(new.email, "");
        assert_eq!(new.status, "");
    }

    #[test]
    fn partial_patch_keeps_unsupplied_fields() {
        let patch: CustomerPatch = serde_json::from_str(r#"{"status": "inactive"}"#).unwrap();
        let mut customer = alice();
        patch.apply(&mut customer);

        assert_eq!(customer.id, 7);
        assert_eq!(customer.name, "Alice");
        assert_eq!(customer.email, "a@example.com");
        assert_eq!(customer.status, "inactive");
    }

    #[test]
    fn null_fields_are_treated_as_absent() {
        let patch: CustomerPatch =
            serde_json::from_str(r#"{"name": null, "email": "new@example.com"}"#).unwrap();
        let mut customer = alice();
        patch.apply(&mut customer);

        assert_eq!(customer.name, "Alice");
        assert_eq!(customer.email, "new@example.com");
    }

    #[test]
    fn empty_patch() {
        let patch: CustomerPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch, CustomerPatch::default());

        let mut customer = alice();
        patch.apply(&mut customer);
        assert_eq!(customer, alice());
    }

    #[test]
    fn customer_serializes_all_fields() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Alice",
                "email": "a@example.com",
                "status": "active"
            })
        );
    }
}
