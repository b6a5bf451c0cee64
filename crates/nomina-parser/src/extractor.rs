//! CFDI payroll receipt extractor
//!
//! Elements are matched by local name, so `tfd:TimbreFiscalDigital`,
//! `nomina12:Nomina` and their unprefixed forms are all recognized. When an element
//! appears more than once, the first one in document order wins.

use crate::error::{ExtractError, ExtractResult};
use crate::number::{normalize_date, parse_amount};
use crate::traits::DocumentExtractor;
use crate::types::{keys, CellValue, LineItemKind, Record};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

const TIMBRE: &str = "TimbreFiscalDigital";
const NOMINA: &str = "Nomina";
const RECEPTOR: &str = "Receptor";
const COMPROBANTE: &str = "Comprobante";

/// Extractor for CFDI 3.3/4.0 receipts carrying the `nomina12` complement
#[derive(Debug, Clone, Copy, Default)]
pub struct CfdiExtractor;

impl CfdiExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one record from raw XML.
    ///
    /// Fails only when the markup is malformed or the stamp is missing. Missing
    /// attributes become empty text or zero.
    pub fn extract(&self, content: &str, file_name: &str) -> ExtractResult<Record> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(content, options)
            .map_err(|e| ExtractError::parse(e.to_string()))?;

        let timbre = find_element(&doc, TIMBRE).ok_or_else(|| ExtractError::schema(TIMBRE))?;
        let nomina = find_element(&doc, NOMINA);
        let receptor = find_element(&doc, RECEPTOR);
        let comprobante = find_element(&doc, COMPROBANTE);

        let mut record = Record::new();
        record.insert(keys::FILE_NAME, file_name);
        record.insert(keys::UUID, text_attr(Some(timbre), "UUID"));
        record.insert(
            keys::FECHA_TIMBRADO,
            normalize_date(&text_attr(Some(timbre), "FechaTimbrado")),
        );

        for key in [
            keys::FECHA_INICIAL_PAGO,
            keys::FECHA_FINAL_PAGO,
            keys::FECHA_PAGO,
        ] {
            record.insert(key, text_attr(nomina, key));
        }
        record.insert(keys::RFC_RECEPTOR, text_attr(receptor, "Rfc"));
        record.insert(keys::NOMBRE_RECEPTOR, text_attr(receptor, "Nombre"));
        record.insert(keys::TIPO_NOMINA, text_attr(nomina, keys::TIPO_NOMINA));

        for key in [
            keys::TOTAL_PERCEPCIONES,
            keys::TOTAL_DEDUCCIONES,
            keys::TOTAL_OTROS_PAGOS,
            keys::NUM_DIAS_PAGADOS,
        ] {
            record.insert(key, number_attr(nomina, key));
        }

        record.insert(
            keys::TIPO_DE_COMPROBANTE,
            text_attr(comprobante, keys::TIPO_DE_COMPROBANTE),
        );
        record.insert(keys::VERSION, text_attr(comprobante, keys::VERSION));
        record.insert(keys::TOTAL, number_attr(comprobante, keys::TOTAL));

        for kind in [
            LineItemKind::Perception,
            LineItemKind::Deduction,
            LineItemKind::OtherPayment,
        ] {
            extract_line_items(&doc, kind, file_name, &mut record);
        }

        Ok(record)
    }
}

impl DocumentExtractor for CfdiExtractor {
    fn name(&self) -> &'static str {
        "cfdi-nomina12"
    }

    fn extract(&self, content: &str, file_name: &str) -> ExtractResult<Record> {
        CfdiExtractor::extract(self, content, file_name)
    }
}

/// Convenience wrapper around [`CfdiExtractor::extract`]
pub fn extract_record(content: &str, file_name: &str) -> ExtractResult<Record> {
    CfdiExtractor::new().extract(content, file_name)
}

fn extract_line_items(doc: &Document, kind: LineItemKind, file_name: &str, record: &mut Record) {
    for item in elements(doc, kind.element()) {
        let type_code = item.attribute(kind.type_attribute()).unwrap_or_default();
        let concept = item.attribute("Concepto").unwrap_or_default();
        if type_code.is_empty() || concept.is_empty() {
            debug!(
                file = file_name,
                element = kind.element(),
                "skipping line item without type code or concept"
            );
            continue;
        }

        let amounts = match kind {
            LineItemKind::Perception => vec![
                parse_amount(item.attribute("ImporteGravado").unwrap_or_default()),
                parse_amount(item.attribute("ImporteExento").unwrap_or_default()),
            ],
            LineItemKind::Deduction | LineItemKind::OtherPayment => {
                vec![parse_amount(item.attribute("Importe").unwrap_or_default())]
            }
        };

        for (key, amount) in kind.column_keys(type_code, concept).into_iter().zip(amounts) {
            record.insert(key, CellValue::Number(amount));
        }
    }
}

fn elements<'a, 'input>(
    doc: &'a Document<'input>,
    local_name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    doc.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == local_name)
}

fn find_element<'a, 'input>(doc: &'a Document<'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
}

fn text_attr(node: Option<Node>, name: &str) -> String {
    node.and_then(|n| n.attribute(name))
        .unwrap_or_default()
        .to_string()
}

fn number_attr(node: Option<Node>, name: &str) -> f64 {
    parse_amount(node.and_then(|n| n.attribute(name)).unwrap_or_default())
}
