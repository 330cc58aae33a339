//! Invoice documents read by the preview, and the calculated preview built
//! from them.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use innkeep_core::{
    summarize, CoreResult, GstSummary, InvoiceCalculator, InvoiceTotals, LineItem, SupplyType,
};
use serde::{Deserialize, Serialize};

use crate::error::{PreviewError, PreviewResult};

/// An invoice as submitted by the invoice form or an API client.
///
/// ```json
/// {
///   "number": "INV-2041",
///   "guest": "A. Rao",
///   "issued_on": "2024-03-18",
///   "line_items": [
///     { "quantity": "2", "unit_price": "3500", "tax_rate": "12",
///       "tax_inclusive": false, "discount_rate": "10", "tax_mode": "standard" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(default)]
    pub number: Option<String>,

    #[serde(default)]
    pub guest: Option<String>,

    #[serde(default)]
    pub issued_on: Option<NaiveDate>,

    pub line_items: Vec<LineItem>,
}

impl InvoiceDocument {
    /// Parses a document from JSON text.
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a document from a file, or from stdin when `path` is `-`.
    pub fn read(path: &Path) -> PreviewResult<Self> {
        let mut contents = String::new();
        if path == Path::new("-") {
            std::io::stdin()
                .read_to_string(&mut contents)
                .map_err(|e| PreviewError::io("<stdin>", e))?;
        } else {
            contents = std::fs::read_to_string(path).map_err(|e| PreviewError::io(path, e))?;
        }
        Self::from_json(&contents)
    }

    /// Runs the engine once over the document's line items.
    pub fn calculate(
        &self,
        calculator: &InvoiceCalculator,
        supply: SupplyType,
    ) -> CoreResult<InvoicePreview> {
        let totals = calculator.calculate(&self.line_items)?;
        let gst = summarize(&totals, supply);

        Ok(InvoicePreview {
            number: self.number.clone(),
            guest: self.guest.clone(),
            issued_on: self.issued_on,
            totals,
            gst,
        })
    }
}

/// A calculated invoice: the document's header plus engine output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePreview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,

    pub totals: InvoiceTotals,

    pub gst: GstSummary,
}
