use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{Field, FieldKind, OrderRecord};

// ---------------------------------------------------------------------------
// Field predicates
// ---------------------------------------------------------------------------

// ASCII classes on purpose: `\d` and `\w` would accept non-ASCII digits.
static ORDER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{4}-[A-Za-z0-9]{4}$").unwrap());
static CUSTOMER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{8}$").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").unwrap());

/// `XXXX-XXXX`, alphanumeric on both sides of the hyphen.
pub fn validate_order_id(s: &str) -> bool {
    ORDER_ID_RE.is_match(s)
}

/// Exactly 8 alphanumeric characters.
pub fn validate_customer_id(s: &str) -> bool {
    CUSTOMER_ID_RE.is_match(s)
}

/// Decimal digits only: no sign, no decimal point.
pub fn validate_integer(s: &str) -> bool {
    INTEGER_RE.is_match(s)
}

/// Digits, optionally followed by a point and one or two digits.
pub fn validate_float(s: &str) -> bool {
    DECIMAL_RE.is_match(s)
}

// ---------------------------------------------------------------------------
// Record parsing
// ---------------------------------------------------------------------------

/// All per-field messages collected for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// Message for a single field value, or `None` if it is acceptable.
pub fn check_field(field: Field, value: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{} cannot be empty.", field.label()));
    }
    match field.kind() {
        FieldKind::Integer if !validate_integer(value) || value.parse::<u64>().is_err() => {
            Some(format!("{} must be an integer.", field.label()))
        }
        FieldKind::Decimal if !validate_float(value) => Some(format!(
            "{} must be a number with up to 2 decimal places.",
            field.label()
        )),
        FieldKind::OrderId if !validate_order_id(value) => {
            Some("Order ID must be in format 'XXXX-XXXX'.".to_string())
        }
        FieldKind::CustomerId if !validate_customer_id(value) => {
            Some("Customer ID must be 8 alphanumeric characters.".to_string())
        }
        FieldKind::Categorical if !field.options().iter().any(|o| *o == value) => Some(format!(
            "{} must be one of: {}.",
            field.label(),
            field.options().join(", ")
        )),
        _ => None,
    }
}

/// Validate every field of a raw record and convert it into an
/// [`OrderRecord`]. Values are trimmed; a missing entry counts as empty.
pub fn parse_record(values: &BTreeMap<Field, String>) -> Result<OrderRecord, ValidationErrors> {
    let get = |field: Field| values.get(&field).map(|v| v.trim()).unwrap_or("");

    let errors: Vec<String> = Field::ALL
        .iter()
        .filter_map(|&field| check_field(field, get(field)))
        .collect();
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    // Every value below already passed `check_field`.
    let int = |field: Field| get(field).parse::<u64>();
    let dec = |field: Field| get(field).parse::<f64>();
    let convert = || -> Result<OrderRecord, String> {
        Ok(OrderRecord {
            order_id: get(Field::OrderId).to_string(),
            customer_id: get(Field::CustomerId).to_string(),
            country_code: get(Field::CountryCode).parse().map_err(|e| format!("{e}"))?,
            collect_type: get(Field::CollectType).parse().map_err(|e| format!("{e}"))?,
            payment_group: get(Field::PaymentGroup).parse().map_err(|e| format!("{e}"))?,
            num_orders_last_50days: int(Field::NumOrdersLast50Days).map_err(|e| e.to_string())?,
            num_cancelled_orders_last_50days: int(Field::NumCancelledOrdersLast50Days)
                .map_err(|e| e.to_string())?,
            num_refund_orders_last_50days: int(Field::NumRefundOrdersLast50Days)
                .map_err(|e| e.to_string())?,
            num_associated_customers: int(Field::NumAssociatedCustomers).map_err(|e| e.to_string())?,
            num_items_ordered: int(Field::NumItemsOrdered).map_err(|e| e.to_string())?,
            total_payment_last_50days: dec(Field::TotalPaymentLast50Days).map_err(|e| e.to_string())?,
            order_value: dec(Field::OrderValue).map_err(|e| e.to_string())?,
            refund_value: dec(Field::RefundValue).map_err(|e| e.to_string())?,
        })
    };
    convert().map_err(|e| ValidationErrors(vec![e]))
}
