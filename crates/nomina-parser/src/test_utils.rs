//! Test utilities for extraction-related tests.
//!
//! Enable with the `test-utils` feature.
//!
//! # Usage
//!
//! In `Cargo.toml`:
//! ```toml
//! [dev-dependencies]
//! nomina-parser = { path = "../nomina-parser", features = ["test-utils"] }
//! ```
//!
//! In tests:
//! ```rust,ignore
//! use nomina_parser::test_utils::CfdiBuilder;
//!
//! let xml = CfdiBuilder::new().deduction("002", "ISR", 100.0).build();
//! let record = nomina_parser::extract_record(&xml, "a.xml").unwrap();
//! ```

use crate::types::Record;
use crate::{extract_record, ExtractResult};

/// Builds a namespaced CFDI 4.0 payroll receipt.
///
/// Totals are derived from the line items unless set explicitly.
#[derive(Debug, Clone)]
pub struct CfdiBuilder {
    uuid: String,
    stamped_at: String,
    period: (String, String, String),
    receiver: (String, String),
    payroll_type: String,
    days_paid: String,
    total: Option<f64>,
    perceptions: Vec<(String, String, f64, f64)>,
    deductions: Vec<(String, String, f64)>,
    other_payments: Vec<(String, String, f64)>,
    with_timbre: bool,
}

impl Default for CfdiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CfdiBuilder {
    pub fn new() -> Self {
        Self {
            uuid: "A1B2C3D4-0000-4000-8000-000000000000".to_string(),
            stamped_at: "2024-01-15T12:30:00".to_string(),
            period: (
                "2024-01-01".to_string(),
                "2024-01-15".to_string(),
                "2024-01-15".to_string(),
            ),
            receiver: ("XOJI740919U48".to_string(), "INGRID XODAR JIMENEZ".to_string()),
            payroll_type: "O".to_string(),
            days_paid: "15".to_string(),
            total: None,
            perceptions: Vec::new(),
            deductions: Vec::new(),
            other_payments: Vec::new(),
            with_timbre: true,
        }
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = uuid.to_string();
        self
    }

    pub fn stamped_at(mut self, timestamp: &str) -> Self {
        self.stamped_at = timestamp.to_string();
        self
    }

    pub fn period(mut self, start: &str, end: &str, paid: &str) -> Self {
        self.period = (start.to_string(), end.to_string(), paid.to_string());
        self
    }

    pub fn receiver(mut self, rfc: &str, name: &str) -> Self {
        self.receiver = (rfc.to_string(), name.to_string());
        self
    }

    pub fn payroll_type(mut self, payroll_type: &str) -> Self {
        self.payroll_type = payroll_type.to_string();
        self
    }

    /// Raw `NumDiasPagados` attribute text
    pub fn days_paid(mut self, days: &str) -> Self {
        self.days_paid = days.to_string();
        self
    }

    pub fn total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn perception(mut self, type_code: &str, concept: &str, taxed: f64, exempt: f64) -> Self {
        self.perceptions
            .push((type_code.to_string(), concept.to_string(), taxed, exempt));
        self
    }

    pub fn deduction(mut self, type_code: &str, concept: &str, amount: f64) -> Self {
        self.deductions
            .push((type_code.to_string(), concept.to_string(), amount));
        self
    }

    pub fn other_payment(mut self, type_code: &str, concept: &str, amount: f64) -> Self {
        self.other_payments
            .push((type_code.to_string(), concept.to_string(), amount));
        self
    }

    /// Drop the stamp so the document fails the structural gate
    pub fn without_timbre(mut self) -> Self {
        self.with_timbre = false;
        self
    }

    pub fn build(&self) -> String {
        let total_perceptions: f64 = self.perceptions.iter().map(|p| p.2 + p.3).sum();
        let total_deductions: f64 = self.deductions.iter().map(|d| d.2).sum();
        let total_other: f64 = self.other_payments.iter().map(|o| o.2).sum();
        let total = self
            .total
            .unwrap_or(total_perceptions - total_deductions + total_other);

        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<cfdi:Comprobante xmlns:cfdi=\"http://www.sat.gob.mx/cfd/4\" \
             xmlns:nomina12=\"http://www.sat.gob.mx/nomina12\" \
             xmlns:tfd=\"http://www.sat.gob.mx/TimbreFiscalDigital\" \
             Version=\"4.0\" TipoDeComprobante=\"N\" Total=\"{:.2}\">\n",
            total
        ));
        xml.push_str("  <cfdi:Emisor Rfc=\"EKU9003173C9\" Nombre=\"ESCUELA KEMPER URGATE\"/>\n");
        xml.push_str(&format!(
            "  <cfdi:Receptor Rfc=\"{}\" Nombre=\"{}\"/>\n",
            self.receiver.0, self.receiver.1
        ));
        xml.push_str("  <cfdi:Complemento>\n");
        xml.push_str(&format!(
            "    <nomina12:Nomina Version=\"1.2\" TipoNomina=\"{}\" FechaPago=\"{}\" \
             FechaInicialPago=\"{}\" FechaFinalPago=\"{}\" NumDiasPagados=\"{}\" \
             TotalPercepciones=\"{:.2}\" TotalDeducciones=\"{:.2}\" TotalOtrosPagos=\"{:.2}\">\n",
            self.payroll_type,
            self.period.2,
            self.period.0,
            self.period.1,
            self.days_paid,
            total_perceptions,
            total_deductions,
            total_other
        ));

        if !self.perceptions.is_empty() {
            xml.push_str("      <nomina12:Percepciones>\n");
            for (type_code, concept, taxed, exempt) in &self.perceptions {
                xml.push_str(&format!(
                    "        <nomina12:Percepcion TipoPercepcion=\"{}\" Clave=\"{}\" \
                     Concepto=\"{}\" ImporteGravado=\"{:.2}\" ImporteExento=\"{:.2}\"/>\n",
                    type_code, type_code, concept, taxed, exempt
                ));
            }
            xml.push_str("      </nomina12:Percepciones>\n");
        }

        if !self.deductions.is_empty() {
            xml.push_str("      <nomina12:Deducciones>\n");
            for (type_code, concept, amount) in &self.deductions {
                xml.push_str(&format!(
                    "        <nomina12:Deduccion TipoDeduccion=\"{}\" Clave=\"{}\" \
                     Concepto=\"{}\" Importe=\"{:.2}\"/>\n",
                    type_code, type_code, concept, amount
                ));
            }
            xml.push_str("      </nomina12:Deducciones>\n");
        }

        if !self.other_payments.is_empty() {
            xml.push_str("      <nomina12:OtrosPagos>\n");
            for (type_code, concept, amount) in &self.other_payments {
                xml.push_str(&format!(
                    "        <nomina12:OtroPago TipoOtroPago=\"{}\" Clave=\"{}\" \
                     Concepto=\"{}\" Importe=\"{:.2}\"/>\n",
                    type_code, type_code, concept, amount
                ));
            }
            xml.push_str("      </nomina12:OtrosPagos>\n");
        }

        xml.push_str("    </nomina12:Nomina>\n");
        if self.with_timbre {
            xml.push_str(&format!(
                "    <tfd:TimbreFiscalDigital Version=\"1.1\" UUID=\"{}\" FechaTimbrado=\"{}\"/>\n",
                self.uuid, self.stamped_at
            ));
        }
        xml.push_str("  </cfdi:Complemento>\n");
        xml.push_str("</cfdi:Comprobante>\n");
        xml
    }

    /// Build and extract in one step
    pub fn extract(&self, file_name: &str) -> ExtractResult<Record> {
        extract_record(&self.build(), file_name)
    }
}
