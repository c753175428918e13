use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::brand::BrandRef;

// --- Outbound event payloads ---
// Field order is part of the wire format: bodies are signed byte-for-byte.

#[derive(Debug, Clone, Serialize)]
pub struct CompanyEventPayload {
    pub id: i64,
    pub name: String,
    pub vat_code: Option<String>,
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandEventPayload {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactEventPayload {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub brands: Vec<BrandRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceEventPayload {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub company_id: i64,
    pub company_name: String,
    pub invoice_date: Option<String>,
    pub total_amount: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateEventPayload {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub update_text: String,
    pub created_by: String,
    pub created_at: String,
}

// --- Inbound contact sync ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundBrand {
    #[serde(default)]
    pub name: String,
}

/// Contact record pushed by the sibling CRM with a `contact.updated` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundContact {
    /// Our own contact id as the sender last saw it. Number or numeric string.
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub brands: Vec<InboundBrand>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl InboundContact {
    pub fn local_id(&self) -> Option<i64> {
        match self.id.as_ref()? {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn first_name(&self) -> Option<&str> {
        present(&self.first_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        present(&self.last_name)
    }

    pub fn phone(&self) -> Option<&str> {
        present(&self.phone)
    }

    pub fn linkedin_url(&self) -> Option<&str> {
        present(&self.linkedin_url)
    }

    pub fn brand_labels(&self) -> impl Iterator<Item = &str> {
        self.brands.iter().map(|b| b.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::wire_json::to_wire_string;
    use serde_json::json;

    #[test]
    fn local_id_accepts_numbers_and_numeric_strings() {
        let mut c = InboundContact {
            id: Some(json!(42)),
            ..Default::default()
        };
        assert_eq!(c.local_id(), Some(42));
        c.id = Some(json!(" 42 "));
        assert_eq!(c.local_id(), Some(42));
        c.id = Some(json!(""));
        assert_eq!(c.local_id(), None);
        c.id = Some(json!(null));
        assert_eq!(c.local_id(), None);
        c.id = None;
        assert_eq!(c.local_id(), None);
    }

    #[test]
    fn blank_fields_count_as_absent() {
        let c: InboundContact = serde_json::from_value(json!({
            "id": 1,
            "email": "  ",
            "first_name": "Ona",
            "last_name": null,
            "brands": [{"name": "Acme"}, {}]
        }))
        .unwrap();
        assert_eq!(c.email(), None);
        assert_eq!(c.first_name(), Some("Ona"));
        assert_eq!(c.last_name(), None);
        assert_eq!(c.brand_labels().collect::<Vec<_>>(), vec!["Acme", ""]);
    }

    #[test]
    fn missing_brands_deserialize_as_empty() {
        let c: InboundContact = serde_json::from_value(json!({"id": 3})).unwrap();
        assert!(c.brands.is_empty());
    }

    #[test]
    fn contact_payload_wire_shape() {
        let payload = ContactEventPayload {
            id: 5,
            first_name: "Jonas".into(),
            last_name: "Jonaitis".into(),
            email: "j@example.com".into(),
            phone: None,
            brands: vec![BrandRef {
                id: 2,
                name: "Fizz".into(),
            }],
            created_at: None,
            updated_at: Some("2024-01-01T00:00:00.500000".into()),
        };
        assert_eq!(
            to_wire_string(&payload).unwrap(),
            r#"{"id": 5, "first_name": "Jonas", "last_name": "Jonaitis", "email": "j@example.com", "phone": null, "brands": [{"id": 2, "name": "Fizz"}], "updated_at": "2024-01-01T00:00:00.500000"}"#
        );
    }
}
