//! CSV export

use csv::Writer;

use super::{money, quantity, ReportError};
use crate::engine::{CostReport, FlattenedBom};

pub const FLAT_CSV_HEADER: [&str; 8] = [
    "Component",
    "Manufacturer",
    "Reference Designators",
    "Quantity",
    "Unit Cost",
    "Extended Cost",
    "Distributor",
    "Distributor PN",
];

/// Flattened BOM as CSV, one row per component
pub fn flat_csv(bom: &FlattenedBom) -> Result<String, ReportError> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(FLAT_CSV_HEADER)?;
    for row in &bom.rows {
        let (distributor, distributor_pn) = row
            .source
            .as_ref()
            .map(|s| (s.distributor.as_str(), s.distributor_pn.as_deref().unwrap_or("")))
            .unwrap_or(("", ""));
        let designators = row
            .reference_designators
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        wtr.write_record([
            row.component.mpn.as_str(),
            row.component.manufacturer.as_str(),
            designators.as_str(),
            quantity(row.quantity).as_str(),
            money(row.unit_cost).as_str(),
            money(row.extended_cost).as_str(),
            distributor,
            distributor_pn,
        ])?;
    }
    finish(wtr)
}

/// Cost tree as CSV, one row per occurrence in pre-order
pub fn cost_csv(report: &CostReport) -> Result<String, ReportError> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record([
        "Level",
        "Item",
        "Description",
        "Qty Per Parent",
        "Quantity",
        "Unit Cost",
        "Subtotal",
        "DNP",
        "Excluded",
    ])?;
    for (depth, node) in report.tree.walk() {
        wtr.write_record([
            depth.to_string(),
            node.id.to_string(),
            node.description.clone(),
            quantity(node.quantity_per_parent),
            quantity(node.effective_quantity),
            money(node.unit_cost),
            money(node.subtotal),
            node.dnp.to_string(),
            node.excluded.to_string(),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ReportError::Encoding)
}
