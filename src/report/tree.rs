//! Indented cost tree

use console::style;

use super::{money, quantity};
use crate::engine::{CostNode, CostReport};

/// Render a cost report as a box-drawing tree
///
/// Colors are applied through `console`, which drops them automatically when
/// output is not a terminal.
pub fn render_cost_tree(report: &CostReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} x {}\n",
        style(&report.root).bold(),
        quantity(report.build_quantity)
    ));
    out.push_str(&line(&report.tree));
    out.push('\n');

    // (node, prefix for this node's children, branch for this node)
    let mut stack: Vec<(&CostNode, String, &str)> = Vec::new();
    push_children(&mut stack, &report.tree, String::new());

    while let Some((node, prefix, branch)) = stack.pop() {
        out.push_str(&prefix);
        out.push_str(branch);
        out.push_str(&line(node));
        out.push('\n');

        let child_prefix = if branch == "└─ " {
            format!("{prefix}   ")
        } else {
            format!("{prefix}│  ")
        };
        push_children(&mut stack, node, child_prefix);
    }

    out.push_str(&format!(
        "\nTotal: {}\n",
        style(format!("${}", money(report.total))).bold()
    ));
    out
}

fn push_children<'a>(
    stack: &mut Vec<(&'a CostNode, String, &'a str)>,
    node: &'a CostNode,
    prefix: String,
) {
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate().rev() {
        let branch = if i == last { "└─ " } else { "├─ " };
        stack.push((child, prefix.clone(), branch));
    }
}

fn line(node: &CostNode) -> String {
    let mut text = node.id.to_string();
    if !node.description.is_empty() {
        text.push_str(&format!("  {}", style(&node.description).dim()));
    }
    text.push_str(&format!(
        "  {} @ ${} = ${}",
        quantity(node.effective_quantity),
        money(node.unit_cost),
        money(node.subtotal)
    ));
    if !node.reference_designators.is_empty() {
        text.push_str(&format!("  [{}]", node.reference_designators.join(", ")));
    }
    if node.dnp {
        text.push_str(&format!("  {}", style("DNP").yellow()));
    } else if node.excluded {
        text.push_str(&format!("  {}", style("(excluded)").yellow()));
    }
    if node.missing_source {
        text.push_str(&format!("  {}", style("no source").red()));
    }
    text
}
