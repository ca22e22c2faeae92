//! Customer records and the customer list query.
//!
//! The stock deployment indexes customer records under the field names
//! below and lists them newest first, filtered by any combination of name,
//! city, email, and phone number, with a prefix search over first and last
//! name.

use serde::{Deserialize, Serialize};

use crate::request::FilterRequest;
use crate::schema::FieldAllowList;

/// Filterable fields, in the order their filters are compiled.
pub const FILTER_FIELDS: [&str; 5] = ["FirstName", "LastName", "City", "Email", "PhoneNumber"];

/// Fields the free-text term is matched against.
pub const SEARCH_FIELDS: [&str; 2] = ["FirstName", "LastName"];

/// A customer record as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Numeric identifier, also the document key.
    pub id: i64,
    /// Given name.
    #[serde(rename = "FirstName")]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "LastName")]
    pub last_name: String,
    /// City of residence.
    #[serde(rename = "City")]
    pub city: String,
    /// Contact email address.
    #[serde(rename = "Email")]
    pub email: String,
    /// Contact phone number.
    #[serde(rename = "PhoneNumber")]
    pub phone_number: String,
}

impl Customer {
    /// Engine-side document key.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }

    /// Allow-list covering every filter and search field.
    pub fn allow_list() -> FieldAllowList {
        FieldAllowList::new(FILTER_FIELDS)
    }

    /// Sample records for seeding a fresh index.
    pub fn samples() -> Vec<Customer> {
        vec![
            Customer {
                id: 1,
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                city: "New York".to_string(),
                email: "john@example.com".to_string(),
                phone_number: "123-456-7890".to_string(),
            },
            Customer {
                id: 2,
                first_name: "Jane".to_string(),
                last_name: "Smith".to_string(),
                city: "Los Angeles".to_string(),
                email: "jane@example.com".to_string(),
                phone_number: "987-654-3210".to_string(),
            },
        ]
    }
}

/// Customer list filters. Empty strings mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerQuery {
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// City of residence.
    #[serde(default)]
    pub city: String,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Prefix search over first and last name.
    #[serde(default)]
    pub search: String,
}

impl CustomerQuery {
    /// Build the filter request for one page of customers.
    pub fn to_request(&self, offset: i64, limit: i64) -> FilterRequest {
        let values = [
            &self.first_name,
            &self.last_name,
            &self.city,
            &self.email,
            &self.phone_number,
        ];

        let mut request = FilterRequest::new(offset, limit).search_fields(SEARCH_FIELDS);
        for (field, value) in FILTER_FIELDS.iter().zip(values) {
            request = request.filter(*field, value.as_str());
        }
        if !self.search.is_empty() {
            request = request.query(self.search.as_str());
        }
        request
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::compiler::QueryCompiler;
    use crate::condition::{FilterCondition, MatchMode};
    use serde_json::json;

    #[test]
    fn test_customer_wire_names() {
        let value = serde_json::to_value(&Customer::samples()[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "FirstName": "John",
                "LastName": "Doe",
                "City": "New York",
                "Email": "john@example.com",
                "PhoneNumber": "123-456-7890"
            })
        );
    }

    #[test]
    fn test_document_id_is_decimal() {
        assert_eq!(Customer::samples()[1].document_id(), "2");
    }

    #[test]
    fn test_customer_query_compiles_in_field_order() {
        let query = CustomerQuery {
            first_name: "John".to_string(),
            city: "New York".to_string(),
            ..Default::default()
        };

        let doc = QueryCompiler::default()
            .compile(&query.to_request(0, 10))
            .unwrap();
        assert_eq!(
            doc.filter_group().unwrap(),
            &[
                FilterCondition::exact("FirstName", "John"),
                FilterCondition::exact("City", "New York"),
            ]
        );
    }

    #[test]
    fn test_customer_query_search_term() {
        let query = CustomerQuery {
            search: "jo".to_string(),
            ..Default::default()
        };

        let doc = QueryCompiler::default()
            .compile(&query.to_request(0, 10))
            .unwrap();
        assert_eq!(
            doc.filter_group().unwrap(),
            &[FilterCondition::multi_field(
                SEARCH_FIELDS,
                "jo",
                MatchMode::BoolPrefix
            )]
        );
    }

    #[test]
    fn test_customer_query_passes_allow_list() {
        let request = CustomerQuery::default().to_request(0, 10);
        assert!(Customer::allow_list().check(&request).is_ok());
    }
}
