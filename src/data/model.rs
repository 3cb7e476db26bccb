use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Field – one raw input column
// ---------------------------------------------------------------------------

/// How a raw field is validated and converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    OrderId,
    CustomerId,
    Integer,
    Decimal,
    Categorical,
}

/// The 13 raw order fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CountryCode,
    CustomerId,
    NumOrdersLast50Days,
    NumCancelledOrdersLast50Days,
    NumRefundOrdersLast50Days,
    TotalPaymentLast50Days,
    NumAssociatedCustomers,
    OrderId,
    CollectType,
    OrderValue,
    NumItemsOrdered,
    RefundValue,
    PaymentGroup,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::CountryCode,
        Field::CustomerId,
        Field::NumOrdersLast50Days,
        Field::NumCancelledOrdersLast50Days,
        Field::NumRefundOrdersLast50Days,
        Field::TotalPaymentLast50Days,
        Field::NumAssociatedCustomers,
        Field::OrderId,
        Field::CollectType,
        Field::OrderValue,
        Field::NumItemsOrdered,
        Field::RefundValue,
        Field::PaymentGroup,
    ];

    /// Column name as it appears in input files and feature names.
    pub fn name(self) -> &'static str {
        match self {
            Field::CountryCode => "country_code",
            Field::CustomerId => "customer_id",
            Field::NumOrdersLast50Days => "num_orders_last_50days",
            Field::NumCancelledOrdersLast50Days => "num_cancelled_orders_last_50days",
            Field::NumRefundOrdersLast50Days => "num_refund_orders_last_50days",
            Field::TotalPaymentLast50Days => "total_payment_last_50days",
            Field::NumAssociatedCustomers => "num_associated_customers",
            Field::OrderId => "order_id",
            Field::CollectType => "collect_type",
            Field::OrderValue => "order_value",
            Field::NumItemsOrdered => "num_items_ordered",
            Field::RefundValue => "refund_value",
            Field::PaymentGroup => "payment_group",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::OrderId => FieldKind::OrderId,
            Field::CustomerId => FieldKind::CustomerId,
            Field::CountryCode | Field::CollectType | Field::PaymentGroup => {
                FieldKind::Categorical
            }
            Field::TotalPaymentLast50Days | Field::OrderValue | Field::RefundValue => {
                FieldKind::Decimal
            }
            Field::NumOrdersLast50Days
            | Field::NumCancelledOrdersLast50Days
            | Field::NumRefundOrdersLast50Days
            | Field::NumAssociatedCustomers
            | Field::NumItemsOrdered => FieldKind::Integer,
        }
    }

    /// Allowed values for categorical fields; the first one is the form default.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Field::CountryCode => CountryCode::NAMES,
            Field::CollectType => CollectType::NAMES,
            Field::PaymentGroup => PaymentGroup::NAMES,
            _ => &[],
        }
    }

    /// Human-readable label, e.g. `Num Orders Last 50Days`.
    pub fn label(self) -> String {
        title_case(self.name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `snake_case` → `Title Case`, upper-casing any letter that follows a
/// non-letter (so `50days` becomes `50Days`).
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_letter = false;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Categorical values
// ---------------------------------------------------------------------------

/// Error returned when a categorical value is outside its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownCategory {
    pub field: Field,
    pub value: String,
}

macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident, $field:expr, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const NAMES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownCategory {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical!(
    /// Market the order was placed in.
    CountryCode, Field::CountryCode, {
        Ph => "PH",
        Bd => "BD",
        My => "MY",
        Pk => "PK",
        Th => "TH",
    }
);

categorical!(
    CollectType, Field::CollectType, {
        Delivery => "delivery",
        Pickup => "pickup",
    }
);

categorical!(
    /// Grouped payment method.
    PaymentGroup, Field::PaymentGroup, {
        CreditDebitCard => "Credit/Debit Card Payments",
        CashAlternative => "Cash/Alternative Payments",
        DigitalWallets => "Digital Wallets",
        OnlineBanking => "Online Banking",
        PreloadedBalance => "Preloaded Balance",
        BuyNowPayLater => "Buy Now, Pay Later",
        OtherGateways => "Other Payment Gateways",
    }
);

// ---------------------------------------------------------------------------
// OrderRecord – one validated input row
// ---------------------------------------------------------------------------

/// A fully validated order, ready for preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub country_code: CountryCode,
    pub collect_type: CollectType,
    pub payment_group: PaymentGroup,
    pub num_orders_last_50days: u64,
    pub num_cancelled_orders_last_50days: u64,
    pub num_refund_orders_last_50days: u64,
    pub num_associated_customers: u64,
    pub num_items_ordered: u64,
    pub total_payment_last_50days: f64,
    pub order_value: f64,
    pub refund_value: f64,
}

impl OrderRecord {
    /// Numeric value of a count or amount field; `None` for identifiers and
    /// categoricals.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        let v = match field {
            Field::NumOrdersLast50Days => self.num_orders_last_50days as f64,
            Field::NumCancelledOrdersLast50Days => self.num_cancelled_orders_last_50days as f64,
            Field::NumRefundOrdersLast50Days => self.num_refund_orders_last_50days as f64,
            Field::NumAssociatedCustomers => self.num_associated_customers as f64,
            Field::NumItemsOrdered => self.num_items_ordered as f64,
            Field::TotalPaymentLast50Days => self.total_payment_last_50days,
            Field::OrderValue => self.order_value,
            Field::RefundValue => self.refund_value,
            _ => return None,
        };
        Some(v)
    }

    /// Value of a categorical field as its canonical text.
    pub fn category(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::CountryCode => Some(self.country_code.as_str()),
            Field::CollectType => Some(self.collect_type.as_str()),
            Field::PaymentGroup => Some(self.payment_group.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FraudFlag – classifier output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FraudFlag {
    Legitimate,
    Suspicious,
}

impl FraudFlag {
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(FraudFlag::Legitimate),
            1 => Some(FraudFlag::Suspicious),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            FraudFlag::Legitimate => 0,
            FraudFlag::Suspicious => 1,
        }
    }

    pub fn is_suspicious(self) -> bool {
        self == FraudFlag::Suspicious
    }

    /// Verdict shown for a single manual prediction.
    pub fn verdict(self) -> &'static str {
        match self {
            FraudFlag::Suspicious => "Suspicious Order Detected!",
            FraudFlag::Legitimate => "Order Appears Safe",
        }
    }
}
