use std::collections::BTreeMap;

use super::model::{Field, OrderRecord};
use super::validate::parse_record;

/// Raw values of a valid PH / delivery / Digital Wallets order.
pub fn valid_values() -> BTreeMap<Field, String> {
    [
        (Field::CountryCode, "PH"),
        (Field::CustomerId, "CUST0001"),
        (Field::NumOrdersLast50Days, "12"),
        (Field::NumCancelledOrdersLast50Days, "1"),
        (Field::NumRefundOrdersLast50Days, "0"),
        (Field::TotalPaymentLast50Days, "350.75"),
        (Field::NumAssociatedCustomers, "2"),
        (Field::OrderId, "AB12-cd34"),
        (Field::CollectType, "delivery"),
        (Field::OrderValue, "42.5"),
        (Field::NumItemsOrdered, "3"),
        (Field::RefundValue, "0"),
        (Field::PaymentGroup, "Digital Wallets"),
    ]
    .into_iter()
    .map(|(f, v)| (f, v.to_string()))
    .collect()
}

/// `valid_values` with some fields replaced, parsed into a record.
pub fn record_with(overrides: &[(Field, &str)]) -> OrderRecord {
    let mut values = valid_values();
    for (field, value) in overrides {
        values.insert(*field, value.to_string());
    }
    parse_record(&values).unwrap()
}

/// CSV text with the standard header and one line per row of values.
pub fn csv_text(rows: &[BTreeMap<Field, String>]) -> String {
    let header: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header).unwrap();
    for row in rows {
        let cells: Vec<&str> = Field::ALL
            .iter()
            .map(|f| row.get(f).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&cells).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}
