//! Mapping between a fetched document and the flat string values an edit form holds.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::format::currency::{format_currency, parse_currency};
use crate::format::dates::{iso_date, parse_flexible_timestamp};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    #[default]
    Text,
    /// Shown as `1.234.567,00`, sent back as a JSON number.
    Currency,
    /// Shown and sent as `YYYY-MM-DD`.
    Date,
    Number,
}

/// One form field bound to a JSON pointer inside the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub field: String,
    pub pointer: String,
    #[serde(default)]
    pub format: FieldFormat,
    #[serde(default)]
    pub required: bool,
}

impl FieldBinding {
    pub fn new(field: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self { field: field.into(), pointer: pointer.into(), format: FieldFormat::Text, required: false }
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(field, value)| (field.into(), value.into())).collect())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("`{field}` is required")]
    MissingField { field: String },
    #[error("`{field}` is not a number: `{value}`")]
    InvalidNumber { field: String, value: String },
    #[error("`{field}` is not a date: `{value}`")]
    InvalidDate { field: String, value: String },
    #[error("`{pointer}` is not a usable JSON pointer")]
    InvalidPointer { pointer: String },
    #[error("`{pointer}` crosses a non-object value")]
    PointerConflict { pointer: String },
}

/// Reads every bound field out of `document`, formatted for display. Missing
/// or null values become empty strings.
pub fn populate_form(document: &Value, bindings: &[FieldBinding]) -> FormValues {
    bindings
        .iter()
        .map(|binding| {
            let display = document
                .pointer(&binding.pointer)
                .map(|value| display_value(value, binding.format))
                .unwrap_or_default();
            (binding.field.clone(), display)
        })
        .collect()
}

/// Inverse of [`populate_form`]: parses each value back and nests it along its pointer.
/// Blank optional fields are left out of the payload.
pub fn build_payload(values: &FormValues, bindings: &[FieldBinding]) -> Result<Value, PayloadError> {
    let mut payload = Value::Object(Map::new());

    for binding in bindings {
        let raw = values.get(&binding.field).map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            if binding.required {
                return Err(PayloadError::MissingField { field: binding.field.clone() });
            }
            continue;
        }

        let value = parse_value(binding, raw)?;
        write_pointer(&mut payload, &binding.pointer, value)?;
    }

    Ok(payload)
}

fn display_value(value: &Value, format: FieldFormat) -> String {
    match (format, value) {
        (_, Value::Null) => String::new(),
        (FieldFormat::Currency, Value::Number(number)) => decimal_of(number)
            .map(format_currency)
            .unwrap_or_else(|| number.to_string()),
        (FieldFormat::Currency, Value::String(text)) => format_currency(parse_currency(text)),
        (FieldFormat::Date, Value::String(text)) => {
            parse_flexible_timestamp(text).map(iso_date).unwrap_or_else(|| text.clone())
        }
        (_, Value::String(text)) => text.clone(),
        (_, other) => other.to_string(),
    }
}

fn parse_value(binding: &FieldBinding, raw: &str) -> Result<Value, PayloadError> {
    match binding.format {
        FieldFormat::Text => Ok(Value::String(raw.to_string())),
        FieldFormat::Currency => number_value(parse_currency(raw), binding, raw),
        FieldFormat::Number => {
            let parsed = Decimal::from_str(raw).map_err(|_| PayloadError::InvalidNumber {
                field: binding.field.clone(),
                value: raw.to_string(),
            })?;
            number_value(parsed, binding, raw)
        }
        FieldFormat::Date => parse_flexible_timestamp(raw)
            .map(|timestamp| Value::String(iso_date(timestamp)))
            .ok_or_else(|| PayloadError::InvalidDate {
                field: binding.field.clone(),
                value: raw.to_string(),
            }),
    }
}

fn decimal_of(number: &Number) -> Option<Decimal> {
    Decimal::from_str(&number.to_string())
        .or_else(|_| Decimal::from_scientific(&number.to_string()))
        .ok()
}

fn number_value(amount: Decimal, binding: &FieldBinding, raw: &str) -> Result<Value, PayloadError> {
    Number::from_str(&amount.normalize().to_string()).map(Value::Number).map_err(|_| {
        PayloadError::InvalidNumber { field: binding.field.clone(), value: raw.to_string() }
    })
}

fn write_pointer(target: &mut Value, pointer: &str, value: Value) -> Result<(), PayloadError> {
    let invalid = || PayloadError::InvalidPointer { pointer: pointer.to_string() };
    let path = pointer.strip_prefix('/').ok_or_else(invalid)?;
    let tokens: Vec<String> =
        path.split('/').map(|token| token.replace("~1", "/").replace("~0", "~")).collect();
    if tokens.iter().any(String::is_empty) {
        return Err(invalid());
    }

    let Some((last, parents)) = tokens.split_last() else {
        return Err(invalid());
    };

    let mut cursor = target;
    for token in parents {
        let object = cursor
            .as_object_mut()
            .ok_or_else(|| PayloadError::PointerConflict { pointer: pointer.to_string() })?;
        cursor = object.entry(token.clone()).or_insert_with(|| Value::Object(Map::new()));
    }

    let object = cursor
        .as_object_mut()
        .ok_or_else(|| PayloadError::PointerConflict { pointer: pointer.to_string() })?;
    object.insert(last.clone(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{build_payload, populate_form, FieldBinding, FieldFormat, FormValues, PayloadError};

    fn invoice_bindings() -> Vec<FieldBinding> {
        vec![
            FieldBinding::new("invoiceNo", "/invoiceNo").required(),
            FieldBinding::new("customer", "/cardName"),
            FieldBinding::new("invoiceDate", "/docDate").with_format(FieldFormat::Date),
            FieldBinding::new("total", "/docTotal").with_format(FieldFormat::Currency),
            FieldBinding::new("lines", "/lineCount").with_format(FieldFormat::Number),
            FieldBinding::new("preparedBy", "/arInvoiceApprovalSummary/preparedByName"),
        ]
    }

    #[test]
    fn populates_display_values_from_nested_document() {
        let document = json!({
            "invoiceNo": "INV-2025-0042",
            "cardName": "PT Sinar Jaya",
            "docDate": "2025-04-07T00:00:00",
            "docTotal": 1234567,
            "lineCount": 3,
            "arInvoiceApprovalSummary": { "preparedByName": "Rina" }
        });

        let values = populate_form(&document, &invoice_bindings());

        assert_eq!(values.get("invoiceNo"), Some("INV-2025-0042"));
        assert_eq!(values.get("invoiceDate"), Some("2025-04-07"));
        assert_eq!(values.get("total"), Some("1.234.567,00"));
        assert_eq!(values.get("lines"), Some("3"));
        assert_eq!(values.get("preparedBy"), Some("Rina"));
    }

    #[test]
    fn missing_values_populate_as_empty_strings() {
        let values = populate_form(&json!({ "invoiceNo": null }), &invoice_bindings());
        assert_eq!(values.len(), 6);
        assert_eq!(values.get("invoiceNo"), Some(""));
        assert_eq!(values.get("preparedBy"), Some(""));
    }

    #[test]
    fn builds_nested_payload_with_parsed_numbers() {
        let values: FormValues = [
            ("invoiceNo", "INV-2025-0042"),
            ("customer", "  PT Sinar Jaya "),
            ("invoiceDate", "2025-04-07"),
            ("total", "Rp 1.234.567,50"),
            ("lines", "3"),
            ("preparedBy", "Rina"),
        ]
        .into_iter()
        .collect();

        let payload = build_payload(&values, &invoice_bindings()).expect("payload");

        assert_eq!(
            payload,
            json!({
                "invoiceNo": "INV-2025-0042",
                "cardName": "PT Sinar Jaya",
                "docDate": "2025-04-07",
                "docTotal": 1234567.5,
                "lineCount": 3,
                "arInvoiceApprovalSummary": { "preparedByName": "Rina" }
            })
        );
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let values: FormValues = [("invoiceNo", "   ")].into_iter().collect();
        assert_eq!(
            build_payload(&values, &invoice_bindings()),
            Err(PayloadError::MissingField { field: "invoiceNo".to_string() })
        );
    }

    #[test]
    fn bad_numbers_dates_and_pointers_are_reported() {
        let number = vec![FieldBinding::new("qty", "/qty").with_format(FieldFormat::Number)];
        let values: FormValues = [("qty", "three")].into_iter().collect();
        assert!(matches!(build_payload(&values, &number), Err(PayloadError::InvalidNumber { .. })));

        let date = vec![FieldBinding::new("due", "/due").with_format(FieldFormat::Date)];
        let values: FormValues = [("due", "tomorrow")].into_iter().collect();
        assert!(matches!(build_payload(&values, &date), Err(PayloadError::InvalidDate { .. })));

        let pointer = vec![FieldBinding::new("name", "name")];
        let values: FormValues = [("name", "x")].into_iter().collect();
        assert!(matches!(build_payload(&values, &pointer), Err(PayloadError::InvalidPointer { .. })));

        let conflict =
            vec![FieldBinding::new("a", "/header"), FieldBinding::new("b", "/header/remarks")];
        let values: FormValues = [("a", "flat"), ("b", "nested")].into_iter().collect();
        assert!(matches!(
            build_payload(&values, &conflict),
            Err(PayloadError::PointerConflict { .. })
        ));
    }
}
