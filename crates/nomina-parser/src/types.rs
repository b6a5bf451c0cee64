//! Record and value types shared by every crate in the workspace

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Well-known record keys
pub mod keys {
    /// Display name of the file the record came from
    pub const FILE_NAME: &str = "fileName";
    pub const UUID: &str = "UUID";
    pub const FECHA_TIMBRADO: &str = "FechaTimbrado";
    pub const FECHA_INICIAL_PAGO: &str = "FechaInicialPago";
    pub const FECHA_FINAL_PAGO: &str = "FechaFinalPago";
    pub const FECHA_PAGO: &str = "FechaPago";
    pub const RFC_RECEPTOR: &str = "Rfc Receptor";
    pub const NOMBRE_RECEPTOR: &str = "Nombre Receptor";
    pub const TIPO_NOMINA: &str = "TipoNomina";
    pub const TOTAL_PERCEPCIONES: &str = "TotalPercepciones";
    pub const TOTAL_DEDUCCIONES: &str = "TotalDeducciones";
    pub const TOTAL_OTROS_PAGOS: &str = "TotalOtrosPagos";
    pub const NUM_DIAS_PAGADOS: &str = "NumDiasPagados";
    pub const TIPO_DE_COMPROBANTE: &str = "TipoDeComprobante";
    pub const VERSION: &str = "Version";
    pub const TOTAL: &str = "Total";

    /// Suffix of the taxed half of a perception
    pub const TAXED_SUFFIX: &str = "ImporteGravado";
    /// Suffix of the exempt half of a perception
    pub const EXEMPT_SUFFIX: &str = "ImporteExento";
    /// Prefix marking deduction columns
    pub const DEDUCTION_PREFIX: &str = "D-";
    /// Prefix marking other-payment columns
    pub const OTHER_PAYMENT_PREFIX: &str = "O-";
}

/// A single cell of a record.
///
/// Absence is not a variant: a key missing from the [`Record`] is the absent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Plain text form used for filtering and option matching.
    ///
    /// Integral numbers print without a fractional part (`1500`), others use the
    /// shortest round-trip form (`1500.5`).
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// True for empty text; numbers are never blank, zero included.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // -0.0 would otherwise print as "-0"
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Category of a repeated line item in the payroll complement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItemKind {
    Perception,
    Deduction,
    OtherPayment,
}

impl LineItemKind {
    /// Local element name of one item
    pub fn element(&self) -> &'static str {
        match self {
            Self::Perception => "Percepcion",
            Self::Deduction => "Deduccion",
            Self::OtherPayment => "OtroPago",
        }
    }

    /// Attribute holding the SAT type code
    pub fn type_attribute(&self) -> &'static str {
        match self {
            Self::Perception => "TipoPercepcion",
            Self::Deduction => "TipoDeduccion",
            Self::OtherPayment => "TipoOtroPago",
        }
    }

    /// Column keys produced by an item with the given type code and concept.
    ///
    /// Perceptions produce a taxed and an exempt column; the other kinds produce a
    /// single prefixed column.
    pub fn column_keys(&self, type_code: &str, concept: &str) -> Vec<String> {
        match self {
            Self::Perception => vec![
                format!("{} {} {}", type_code, concept, keys::TAXED_SUFFIX),
                format!("{} {} {}", type_code, concept, keys::EXEMPT_SUFFIX),
            ],
            Self::Deduction => vec![format!("{}{} {}", keys::DEDUCTION_PREFIX, type_code, concept)],
            Self::OtherPayment => vec![format!(
                "{}{} {}",
                keys::OTHER_PAYMENT_PREFIX,
                type_code,
                concept
            )],
        }
    }
}

/// One document's extracted data: column key to value.
///
/// Backed by a sorted map so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style [`Record::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Numeric value under `key`, if present and numeric
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(CellValue::as_number)
    }

    /// Display name of the originating file
    pub fn file_name(&self) -> Option<&str> {
        self.get(keys::FILE_NAME).and_then(CellValue::as_text)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_text_form() {
        assert_eq!(CellValue::Number(1500.0).to_text(), "1500");
        assert_eq!(CellValue::Number(1500.5).to_text(), "1500.5");
        assert_eq!(CellValue::Number(-0.0).to_text(), "0");
        assert_eq!(CellValue::text("ISR").to_text(), "ISR");
    }

    #[test]
    fn test_line_item_keys() {
        assert_eq!(
            LineItemKind::Perception.column_keys("001", "Sueldo"),
            vec!["001 Sueldo ImporteGravado", "001 Sueldo ImporteExento"]
        );
        assert_eq!(LineItemKind::Deduction.column_keys("002", "ISR"), vec!["D-002 ISR"]);
        assert_eq!(
            LineItemKind::OtherPayment.column_keys("002", "Subsidio"),
            vec!["O-002 Subsidio"]
        );
    }

    #[test]
    fn test_record_insert_overwrites() {
        let record = Record::new().with("D-002 ISR", 10.0).with("D-002 ISR", 25.0);
        assert_eq!(record.len(), 1);
        assert_eq!(record.number("D-002 ISR"), Some(25.0));
    }

    #[test]
    fn test_record_serializes_as_flat_object() {
        let record = Record::new().with("UUID", "abc").with("Total", 12.5);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"Total": 12.5, "UUID": "abc"}));
    }

    #[test]
    fn test_blank_values() {
        assert!(CellValue::text("").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }
}
