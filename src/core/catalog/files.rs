//! Catalog directory loading
//!
//! A catalog directory holds one record per YAML file:
//!
//! ```text
//! products/PCB-001.yaml      part_number, description, revision, notes, bom: [...]
//! components/RC0603.yaml     mpn, manufacturer, description, ..., sources: [...]
//! ```
//!
//! Each BOM line names exactly one of `component: {mpn, manufacturer}` or
//! `product: <part number>`. Files are read once into a [`MemoryCatalog`]
//! snapshot; malformed records fail the whole load with the file named.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{CatalogError, MemoryCatalog};
use crate::core::identity::{ComponentKey, NodeId, ProductId};
use crate::entities::edge::split_designators;
use crate::entities::{CompositionEdge, Component, Product, Source};
use crate::yaml::RecordSyntaxError;

/// Directory holding product records
pub const PRODUCTS_DIR: &str = "products";

/// Directory holding component records
pub const COMPONENTS_DIR: &str = "components";

#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(flatten)]
    product: Product,

    #[serde(default)]
    bom: Vec<BomLine>,
}

#[derive(Debug, Deserialize)]
struct BomLine {
    #[serde(default)]
    component: Option<ComponentKey>,

    #[serde(default)]
    product: Option<ProductId>,

    quantity: Decimal,

    #[serde(default)]
    reference_designators: Designators,

    #[serde(default)]
    dnp: bool,

    #[serde(default)]
    notes: Option<String>,
}

/// Designators may be written as a list or as "R1, R2, R3"
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Designators {
    List(Vec<String>),
    Text(String),
}

impl Default for Designators {
    fn default() -> Self {
        Designators::List(Vec::new())
    }
}

impl Designators {
    fn into_vec(self) -> Vec<String> {
        match self {
            Designators::List(list) => list.into_iter().map(|d| d.trim().to_string()).collect(),
            Designators::Text(text) => split_designators(&text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComponentRecord {
    #[serde(flatten)]
    component: Component,

    #[serde(default)]
    sources: Vec<Source>,
}

impl BomLine {
    fn into_edge(self, parent: &ProductId, path: &Path) -> Result<CompositionEdge, CatalogError> {
        let child = match (self.component, self.product) {
            (Some(key), None) => NodeId::Component(key),
            (None, Some(id)) => NodeId::Product(id),
            (Some(_), Some(_)) => {
                return Err(CatalogError::Parse {
                    path: path.to_path_buf(),
                    message: "BOM line names both a component and a product".to_string(),
                })
            }
            (None, None) => {
                return Err(CatalogError::Parse {
                    path: path.to_path_buf(),
                    message: "BOM line needs either `component:` or `product:`".to_string(),
                })
            }
        };

        Ok(CompositionEdge {
            parent: parent.clone(),
            child,
            quantity: self.quantity,
            reference_designators: self.reference_designators.into_vec(),
            dnp: self.dnp,
            notes: self.notes,
        })
    }
}

/// Load every record under a catalog directory into a snapshot
pub fn load_dir(root: &Path) -> Result<MemoryCatalog, CatalogError> {
    let mut catalog = MemoryCatalog::new();
    let mut pending_edges = Vec::new();

    for path in record_files(&root.join(PRODUCTS_DIR)) {
        let record: ProductRecord = read_record(&path)?;
        let parent = record.product.part_number.clone();
        for line in record.bom {
            pending_edges.push(line.into_edge(&parent, &path)?);
        }
        catalog.insert_product(record.product)?;
    }

    for path in record_files(&root.join(COMPONENTS_DIR)) {
        let record: ComponentRecord = read_record(&path)?;
        let key = record.component.key.clone();
        catalog.insert_component(record.component)?;
        for source in record.sources {
            catalog.insert_source(&key, source)?;
        }
    }

    // Edges last so a BOM may reference products from files read later
    for edge in pending_edges {
        catalog.insert_edge(edge)?;
    }

    tracing::debug!(
        products = catalog.product_count(),
        components = catalog.component_count(),
        root = %root.display(),
        "loaded catalog directory"
    );

    Ok(catalog)
}

/// All `.yaml`/`.yml` files below a directory, sorted for stable load order
fn record_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map_or(false, |ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    files.sort();
    files
}

fn read_record<T: serde::de::DeserializeOwned + 'static>(path: &Path) -> Result<T, CatalogError> {
    let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_yml::from_str(&content).map_err(|e| {
        RecordSyntaxError::from_serde_error(&e, &content, &path.display().to_string()).into()
    })
}
