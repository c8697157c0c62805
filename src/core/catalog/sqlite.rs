//! Read-only catalog over a BOM manager SQLite database
//!
//! Expects the `products`, `components`, `component_sources`,
//! `bom_entries` and `sub_assemblies` tables. Every lookup is a fresh
//! query; callers that share the file with writers should open it on a
//! snapshot copy.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;

use super::{Catalog, CatalogError};
use crate::core::identity::{ComponentKey, NodeId, ProductId};
use crate::entities::edge::split_designators;
use crate::entities::{CompositionEdge, Component, Product, Source};

pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open a database file read-only
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(path = %path.display(), "opened sqlite catalog");
        Ok(Self { conn })
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

fn to_decimal(value: f64, record: impl FnOnce() -> String) -> Result<Decimal, CatalogError> {
    Decimal::try_from(value).map_err(|e| CatalogError::Malformed {
        record: record(),
        reason: e.to_string(),
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .ok()
}

impl Catalog for SqliteCatalog {
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT IFNULL(description, ''), revision, notes
             FROM products WHERE part_number = ?1",
        )?;
        let product = stmt
            .query_row(params![id.as_str()], |row| {
                Ok(Product {
                    part_number: id.clone(),
                    description: row.get(0)?,
                    revision: row.get(1)?,
                    notes: row.get(2)?,
                })
            })
            .optional()?;
        Ok(product)
    }

    fn component(&self, key: &ComponentKey) -> Result<Option<Component>, CatalogError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT IFNULL(description, ''), IFNULL(category, ''),
                    IFNULL(unit_of_measure, 'EA'), IFNULL(is_assembly, 0), notes
             FROM components
             WHERE mfg_part_number = ?1 AND IFNULL(manufacturer, '') = ?2",
        )?;
        let component = stmt
            .query_row(params![key.mpn, key.manufacturer], |row| {
                Ok(Component {
                    key: key.clone(),
                    description: row.get(0)?,
                    category: row.get(1)?,
                    unit_of_measure: row.get(2)?,
                    is_assembly: row.get::<_, i64>(3)? != 0,
                    notes: row.get(4)?,
                })
            })
            .optional()?;
        Ok(component)
    }

    fn sources_for(&self, key: &ComponentKey) -> Result<Vec<Source>, CatalogError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT IFNULL(cs.distributor, ''), cs.distributor_part_number, cs.unit_cost,
                    IFNULL(cs.minimum_order_qty, 1), cs.lead_time_days, cs.last_updated
             FROM component_sources cs
             JOIN components c ON cs.component_id = c.component_id
             WHERE c.mfg_part_number = ?1 AND IFNULL(c.manufacturer, '') = ?2
             ORDER BY cs.source_id",
        )?;
        let rows = stmt.query_map(params![key.mpn, key.manufacturer], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut sources = Vec::new();
        for row in rows {
            let (distributor, distributor_pn, cost, moq, lead, updated) = row?;
            let Some(cost) = cost else {
                tracing::debug!(
                    component = %key,
                    distributor = %distributor,
                    "skipping source without a price"
                );
                continue;
            };
            let record = || format!("source {} for {}", distributor, key);
            let source = Source {
                unit_cost: to_decimal(cost, record)?,
                moq: u32::try_from(moq).unwrap_or(1).max(1),
                lead_time_days: lead.and_then(|d| u32::try_from(d).ok()),
                last_updated: updated.as_deref().and_then(parse_timestamp),
                distributor_pn: distributor_pn.filter(|pn| !pn.is_empty()),
                distributor,
            };
            source
                .validate()
                .map_err(|e| CatalogError::bad_source(key, &source, e))?;
            sources.push(source);
        }
        Ok(sources)
    }

    fn child_edges(&self, id: &ProductId) -> Result<Vec<CompositionEdge>, CatalogError> {
        let mut edges = Vec::new();

        let mut stmt = self.conn.prepare_cached(
            "SELECT c.mfg_part_number, IFNULL(c.manufacturer, ''), be.quantity,
                    IFNULL(be.reference_designators, ''), IFNULL(be.do_not_populate, 0), be.notes
             FROM bom_entries be
             JOIN products p ON be.product_id = p.product_id
             LEFT JOIN components c ON be.component_id = c.component_id
             WHERE p.part_number = ?1
             ORDER BY be.entry_id",
        )?;
        let rows = stmt.query_map(params![id.as_str()], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;
        for row in rows {
            let (mpn, manufacturer, quantity, designators, dnp, notes) = row?;
            let Some(mpn) = mpn else {
                return Err(CatalogError::Dangling {
                    record: format!("BOM entry of {}", id),
                    missing: "component".to_string(),
                });
            };
            let key = ComponentKey::new(manufacturer, mpn).map_err(|e| CatalogError::Malformed {
                record: format!("BOM entry of {}", id),
                reason: e.to_string(),
            })?;
            let edge = CompositionEdge {
                parent: id.clone(),
                quantity: to_decimal(quantity, || format!("BOM entry {} -> {}", id, key))?,
                child: NodeId::Component(key),
                reference_designators: split_designators(&designators),
                dnp: dnp != 0,
                notes: notes.filter(|n| !n.is_empty()),
            };
            edge.validate().map_err(|e| CatalogError::bad_edge(&edge, e))?;
            edges.push(edge);
        }

        let mut stmt = self.conn.prepare_cached(
            "SELECT child.part_number, sa.quantity, IFNULL(sa.reference_designators, ''), sa.notes
             FROM sub_assemblies sa
             JOIN products parent ON sa.parent_product_id = parent.product_id
             LEFT JOIN products child ON sa.child_product_id = child.product_id
             WHERE parent.part_number = ?1
             ORDER BY sa.sub_assembly_id",
        )?;
        let rows = stmt.query_map(params![id.as_str()], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;
        for row in rows {
            let (child, quantity, designators, notes) = row?;
            let child = child
                .as_deref()
                .map(ProductId::parse)
                .transpose()
                .map_err(|e| CatalogError::Malformed {
                    record: format!("sub-assembly entry of {}", id),
                    reason: e.to_string(),
                })?
                .ok_or_else(|| CatalogError::Dangling {
                    record: format!("sub-assembly entry of {}", id),
                    missing: "product".to_string(),
                })?;
            let edge = CompositionEdge {
                parent: id.clone(),
                quantity: to_decimal(quantity, || format!("sub-assembly {} -> {}", id, child))?,
                child: NodeId::Product(child),
                reference_designators: split_designators(&designators),
                dnp: false,
                notes: notes.filter(|n| !n.is_empty()),
            };
            edge.validate().map_err(|e| CatalogError::bad_edge(&edge, e))?;
            edges.push(edge);
        }

        Ok(edges)
    }
}
