use super::model::{Field, FieldKind, OrderRecord};

// ---------------------------------------------------------------------------
// Column layout expected by the trained model
// ---------------------------------------------------------------------------

/// Default model input layout. The reference categories (`BD`, `delivery`,
/// `Buy Now, Pay Later`) have no column.
pub const REQUIRED_COLUMNS: [&str; 19] = [
    "num_orders_last_50days",
    "num_cancelled_orders_last_50days",
    "num_refund_orders_last_50days",
    "total_payment_last_50days",
    "num_associated_customers",
    "order_value",
    "num_items_ordered",
    "refund_value",
    "country_code_MY",
    "country_code_PH",
    "country_code_PK",
    "country_code_TH",
    "collect_type_pickup",
    "payment_group_Cash/Alternative Payments",
    "payment_group_Credit/Debit Card Payments",
    "payment_group_Digital Wallets",
    "payment_group_Online Banking",
    "payment_group_Other Payment Gateways",
    "payment_group_Preloaded Balance",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("feature column '{0}' is neither a raw numeric field nor a known indicator")]
    UnknownColumn(String),
    #[error("feature column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("feature schema is empty")]
    Empty,
}

/// How one feature column is computed from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureColumn {
    /// A raw count or amount, copied unchanged.
    Numeric(Field),
    /// 1.0 when `field` equals `value`, else 0.0.
    Indicator { field: Field, value: &'static str },
    /// Indicator for a category this application never produces.
    Zero,
}

impl FeatureColumn {
    /// Resolve a model column name (`order_value`, `country_code_PH`, ...).
    pub fn resolve(name: &str) -> Result<Self, SchemaError> {
        if let Some(field) = Field::from_name(name) {
            return match field.kind() {
                FieldKind::Integer | FieldKind::Decimal => Ok(FeatureColumn::Numeric(field)),
                _ => Err(SchemaError::UnknownColumn(name.to_string())),
            };
        }

        for field in [Field::CountryCode, Field::CollectType, Field::PaymentGroup] {
            let Some(value) = name
                .strip_prefix(field.name())
                .and_then(|rest| rest.strip_prefix('_'))
            else {
                continue;
            };
            return Ok(match field.options().iter().find(|o| **o == value) {
                Some(known) => FeatureColumn::Indicator { field, value: *known },
                None => {
                    log::warn!("Feature column '{name}' has no matching {field} value; it will always be 0");
                    FeatureColumn::Zero
                }
            });
        }

        Err(SchemaError::UnknownColumn(name.to_string()))
    }

    pub fn evaluate(&self, record: &OrderRecord) -> f64 {
        match self {
            FeatureColumn::Numeric(field) => record.numeric(*field).unwrap_or(0.0),
            FeatureColumn::Indicator { field, value } => {
                if record.category(*field) == Some(*value) {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureColumn::Zero => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureSchema – ordered, resolved column list
// ---------------------------------------------------------------------------

/// Ordered feature columns, each resolved once into a function of the record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut out_names: Vec<String> = Vec::with_capacity(names.len());
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if out_names.iter().any(|n| n == name) {
                return Err(SchemaError::DuplicateColumn(name.to_string()));
            }
            columns.push(FeatureColumn::resolve(name)?);
            out_names.push(name.to_string());
        }
        Ok(Self {
            names: out_names,
            columns,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Transform one record into the schema's column order.
    pub fn transform(&self, record: &OrderRecord) -> FeatureVector {
        FeatureVector {
            values: self.columns.iter().map(|c| c.evaluate(record)).collect(),
        }
    }

    /// Transform a batch; each row is computed exactly as a single record.
    pub fn transform_batch(&self, records: &[OrderRecord]) -> Vec<FeatureVector> {
        records.iter().map(|r| self.transform(r)).collect()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        FeatureSchema::from_names(&REQUIRED_COLUMNS)
            .expect("built-in feature layout must resolve against the raw fields")
    }
}

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// Model input for one record, aligned with a [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, schema: &FeatureSchema, name: &str) -> Option<f64> {
        schema.index_of(name).and_then(|i| self.values.get(i).copied())
    }
}
