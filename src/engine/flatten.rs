//! Flattened parts list
//!
//! Collapses every path of the hierarchy into one row per distinct leaf
//! component. Per-unit requirements are computed once per distinct product,
//! bottom-up, and scaled into each parent that uses it.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::cost::{resolve_unit_cost, SourceSelector};
use super::cycle::ValidatedGraph;
use super::error::{MissingSourceWarning, ResolveError};
use super::tree::missing_warnings;
use super::{checked_add, checked_mul};
use crate::core::identity::{ComponentKey, NodeId, ProductId};
use crate::entities::Source;

/// One purchasing line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRow {
    pub component: ComponentKey,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,

    pub unit_of_measure: String,

    /// Summed over every populated path
    pub quantity: Decimal,

    /// Union of designators from every contributing line
    pub reference_designators: BTreeSet<String>,

    pub unit_cost: Decimal,

    /// quantity * unit_cost
    pub extended_cost: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    pub missing_source: bool,
}

/// Flattened BOM for a build quantity of a root product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedBom {
    pub root: ProductId,
    pub build_quantity: Decimal,

    /// One row per component, ordered by part number then manufacturer
    pub rows: Vec<FlatRow>,

    /// Sum of extended costs
    pub total: Decimal,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MissingSourceWarning>,
}

impl FlattenedBom {
    pub fn row(&self, component: &ComponentKey) -> Option<&FlatRow> {
        self.rows.iter().find(|r| &r.component == component)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct Need {
    quantity: Decimal,
    designators: BTreeSet<String>,
}

type Needs = BTreeMap<ComponentKey, Need>;

/// Flatten `build_quantity` units of the graph's root
pub fn flatten_graph<S: SourceSelector + ?Sized>(
    validated: &ValidatedGraph<'_>,
    build_quantity: Decimal,
    selector: &S,
    include_dnp: bool,
) -> Result<FlattenedBom, ResolveError> {
    let graph = validated.graph();
    let mut per_unit: HashMap<&ProductId, Needs> = HashMap::new();

    for product in validated.bottom_up() {
        let mut needs = Needs::new();
        for edge in graph.children_of(product) {
            if edge.dnp && !include_dnp {
                continue;
            }
            match &edge.child {
                NodeId::Component(key) => {
                    let need = needs.entry(key.clone()).or_default();
                    need.quantity = checked_add(need.quantity, edge.quantity, key)?;
                    need.designators
                        .extend(edge.reference_designators.iter().cloned());
                }
                NodeId::Product(child) => {
                    let Some(child_needs) = per_unit.get(child) else {
                        continue;
                    };
                    for (key, child_need) in child_needs {
                        let scaled = checked_mul(child_need.quantity, edge.quantity, key)?;
                        let need = needs.entry(key.clone()).or_default();
                        need.quantity = checked_add(need.quantity, scaled, key)?;
                        need.designators
                            .extend(child_need.designators.iter().cloned());
                    }
                }
            }
        }
        per_unit.insert(product, needs);
    }

    let root_needs = per_unit.remove(graph.root()).unwrap_or_default();
    let mut rows = Vec::with_capacity(root_needs.len());
    let mut missing = BTreeSet::new();
    let mut total = Decimal::ZERO;

    for (key, need) in root_needs {
        let Some((component, sources)) = graph.component(&key) else {
            continue;
        };
        let resolved = resolve_unit_cost(selector, sources);
        let quantity = checked_mul(need.quantity, build_quantity, &key)?;
        let extended_cost = checked_mul(quantity, resolved.unit_cost, &key)?;
        total = checked_add(total, extended_cost, &key)?;

        let missing_source = resolved.is_missing();
        if missing_source {
            missing.insert(key.clone());
        }

        rows.push(FlatRow {
            description: component.description.clone(),
            category: component.category.clone(),
            unit_of_measure: component.unit_of_measure.clone(),
            quantity,
            reference_designators: need.designators,
            unit_cost: resolved.unit_cost,
            extended_cost,
            source: resolved.source,
            missing_source,
            component: key,
        });
    }

    tracing::debug!(
        root = %graph.root(),
        rows = rows.len(),
        missing = missing.len(),
        "flattened BOM"
    );

    Ok(FlattenedBom {
        root: graph.root().clone(),
        build_quantity,
        rows,
        total,
        warnings: missing_warnings(graph, missing),
    })
}
