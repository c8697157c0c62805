//! Markdown tables

use tabled::{builder::Builder, settings::Style};

use super::{money, quantity};
use crate::engine::{CostReport, FlattenedBom};

/// Flattened BOM as a markdown purchasing table
pub fn flat_markdown(bom: &FlattenedBom) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Flattened BOM: {}\n\n", bom.root));
    output.push_str(&format!("Build quantity: {}\n\n", quantity(bom.build_quantity)));

    let mut builder = Builder::default();
    builder.push_record([
        "Component",
        "Manufacturer",
        "Description",
        "Ref Des",
        "Qty",
        "Unit Cost",
        "Ext. Cost",
        "Distributor",
    ]);
    for row in &bom.rows {
        let distributor = row
            .source
            .as_ref()
            .map(|s| s.distributor.clone())
            .unwrap_or_else(|| "-".to_string());
        builder.push_record([
            row.component.mpn.clone(),
            row.component.manufacturer.clone(),
            row.description.clone(),
            row.reference_designators
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            quantity(row.quantity),
            money(row.unit_cost),
            money(row.extended_cost),
            distributor,
        ]);
    }
    output.push_str(&builder.build().with(Style::markdown()).to_string());
    output.push_str(&format!("\n\n**Total: ${}**\n", money(bom.total)));
    output
}

/// Cost tree as a markdown table, one row per occurrence with a level column
pub fn cost_markdown(report: &CostReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Cost Rollup: {}\n\n", report.root));
    output.push_str(&format!("Build quantity: {}\n\n", quantity(report.build_quantity)));

    let mut builder = Builder::default();
    builder.push_record(["Level", "Item", "Qty/Parent", "Qty", "Unit Cost", "Subtotal", "Notes"]);
    for (depth, node) in report.tree.walk() {
        let mut notes = Vec::new();
        if node.dnp {
            notes.push("DNP");
        } else if node.excluded {
            notes.push("excluded");
        }
        if node.missing_source {
            notes.push("no source");
        }
        builder.push_record([
            depth.to_string(),
            format!("{}{}", "  ".repeat(depth), node.id),
            quantity(node.quantity_per_parent),
            quantity(node.effective_quantity),
            money(node.unit_cost),
            money(node.subtotal),
            notes.join(", "),
        ]);
    }
    output.push_str(&builder.build().with(Style::markdown()).to_string());
    output.push_str(&format!("\n\n**Total: ${}**\n", money(report.total)));
    output
}
