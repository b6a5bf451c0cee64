//! Nomina Record Extractor
//!
//! Turns one CFDI payroll receipt (XML with the `nomina12` complement) into a flat
//! [`Record`] whose keys depend on the line items the document declares.
//! This crate provides:
//! - Well-formedness and structural validation ([`ExtractError`])
//! - Lenient attribute reading (missing text is empty, bad numbers are zero)
//! - Stable dynamic keys for perceptions, deductions and other payments
//!
//! Records are the canonical data type of the workspace; the query and pipeline
//! crates depend on this one for them.

pub mod error;
pub mod extractor;
pub mod number;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{extract_record, CfdiExtractor};
pub use number::{normalize_date, parse_amount};
pub use traits::DocumentExtractor;
pub use types::{keys, CellValue, LineItemKind, Record};
