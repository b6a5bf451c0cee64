//! Line item extraction tests
//!
//! Covers the dynamically-keyed part of a record: perceptions, deductions and other
//! payments.

use nomina_parser::test_utils::CfdiBuilder;
use nomina_parser::{extract_record, keys, CellValue};
use proptest::prelude::*;

#[test]
fn test_perception_produces_taxed_and_exempt_columns() {
    let record = CfdiBuilder::new()
        .perception("001", "Sueldo", 10000.0, 0.0)
        .perception("019", "Horas extra", 500.0, 250.0)
        .extract("a.xml")
        .unwrap();

    assert_eq!(record.number("001 Sueldo ImporteGravado"), Some(10000.0));
    assert_eq!(record.number("001 Sueldo ImporteExento"), Some(0.0));
    assert_eq!(record.number("019 Horas extra ImporteGravado"), Some(500.0));
    assert_eq!(record.number("019 Horas extra ImporteExento"), Some(250.0));
    assert_eq!(record.number(keys::TOTAL_PERCEPCIONES), Some(10750.0));
}

#[test]
fn test_deduction_and_other_payment_prefixes() {
    let record = CfdiBuilder::new()
        .perception("001", "Sueldo", 8000.0, 0.0)
        .deduction("002", "ISR", 900.0)
        .deduction("001", "IMSS", 210.5)
        .other_payment("002", "Subsidio para el empleo", 50.0)
        .extract("b.xml")
        .unwrap();

    assert_eq!(record.number("D-002 ISR"), Some(900.0));
    assert_eq!(record.number("D-001 IMSS"), Some(210.5));
    assert_eq!(record.number("O-002 Subsidio para el empleo"), Some(50.0));
    assert_eq!(record.number(keys::TOTAL), Some(8000.0 - 1110.5 + 50.0));
}

#[test]
fn test_repeated_line_item_keeps_last_value() {
    let record = CfdiBuilder::new()
        .deduction("004", "Otros", 10.0)
        .deduction("004", "Otros", 30.0)
        .extract("c.xml")
        .unwrap();

    assert_eq!(record.number("D-004 Otros"), Some(30.0));
    assert_eq!(record.keys().filter(|k| k.starts_with("D-")).count(), 1);
}

#[test]
fn test_line_items_without_type_or_concept_are_skipped() {
    let xml = r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"
            xmlns:nomina12="http://www.sat.gob.mx/nomina12"
            xmlns:tfd="http://www.sat.gob.mx/TimbreFiscalDigital" Total="1">
        <cfdi:Complemento>
            <nomina12:Nomina>
                <nomina12:Percepciones>
                    <nomina12:Percepcion Concepto="Sin tipo" ImporteGravado="1"/>
                    <nomina12:Percepcion TipoPercepcion="001" ImporteGravado="1"/>
                    <nomina12:Percepcion TipoPercepcion="" Concepto="Vacio" ImporteGravado="1"/>
                </nomina12:Percepciones>
                <nomina12:Deducciones>
                    <nomina12:Deduccion TipoDeduccion="002" Importe="5"/>
                </nomina12:Deducciones>
            </nomina12:Nomina>
            <tfd:TimbreFiscalDigital UUID="u"/>
        </cfdi:Complemento>
    </cfdi:Comprobante>"#;

    let record = extract_record(xml, "skip.xml").unwrap();

    assert!(record
        .keys()
        .all(|k| !k.contains(keys::TAXED_SUFFIX) && !k.starts_with(keys::DEDUCTION_PREFIX)));
}

#[test]
fn test_unparsable_amounts_default_to_zero() {
    let xml = r#"<Comprobante Total="N/A">
        <Nomina NumDiasPagados="" TotalPercepciones="abc">
            <OtroPago TipoOtroPago="999" Concepto="Vales" Importe="--"/>
        </Nomina>
        <TimbreFiscalDigital UUID="u"/>
    </Comprobante>"#;

    let record = extract_record(xml, "raro.xml").unwrap();

    assert_eq!(record.number(keys::TOTAL), Some(0.0));
    assert_eq!(record.number(keys::NUM_DIAS_PAGADOS), Some(0.0));
    assert_eq!(record.number(keys::TOTAL_PERCEPCIONES), Some(0.0));
    assert_eq!(record.number("O-999 Vales"), Some(0.0));
}

#[test]
fn test_same_line_item_aligns_across_documents() {
    let first = CfdiBuilder::new().deduction("002", "ISR", 100.0).extract("1.xml").unwrap();
    let second = CfdiBuilder::new()
        .uuid("other")
        .deduction("002", "ISR", 250.0)
        .extract("2.xml")
        .unwrap();

    let first_keys: Vec<&str> = first.keys().filter(|k| k.starts_with("D-")).collect();
    let second_keys: Vec<&str> = second.keys().filter(|k| k.starts_with("D-")).collect();
    assert_eq!(first_keys, second_keys);
}

#[test]
fn test_stamp_date_is_truncated() {
    let record = CfdiBuilder::new()
        .stamped_at("2023-12-31T23:59:59")
        .extract("d.xml")
        .unwrap();

    assert_eq!(
        record.get(keys::FECHA_TIMBRADO),
        Some(&CellValue::text("2023-12-31"))
    );
}

proptest! {
    #[test]
    fn prop_extraction_is_deterministic(
        taxed in 0.0f64..1_000_000.0,
        exempt in 0.0f64..1_000.0,
        deduction in 0.0f64..50_000.0,
        concept in "[A-Za-z ]{1,20}",
    ) {
        let xml = CfdiBuilder::new()
            .perception("001", concept.trim_end(), taxed, exempt)
            .deduction("002", "ISR", deduction)
            .build();

        let first = extract_record(&xml, "p.xml").unwrap();
        let second = extract_record(&xml, "p.xml").unwrap();
        prop_assert_eq!(first, second);
    }
}
