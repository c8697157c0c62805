//! Integration tests for the hbom CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get an hbom command with a clean environment
fn hbom() -> Command {
    let mut cmd = Command::cargo_bin("hbom").unwrap();
    cmd.env_remove("HBOM_CATALOG")
        .env_remove("HBOM_POLICY")
        .env_remove("HBOM_MAX_DEPTH")
        .env_remove("HBOM_MAX_TREE_NODES")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create an empty catalog in a temp directory
fn setup_catalog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    hbom().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn component(root: &Path, mpn: &str, manufacturer: &str, sources: &str) {
    write(
        root,
        &format!("components/{mpn}.yaml"),
        &format!("mpn: {mpn}\nmanufacturer: {manufacturer}\ndescription: {mpn} part\n{sources}"),
    );
}

/// PCB-001: 5 resistors at 0.10 and 2 capacitors at 0.25
fn setup_pcb() -> TempDir {
    let tmp = setup_catalog();
    let root = tmp.path();
    write(
        root,
        "products/PCB-001.yaml",
        r#"
part_number: PCB-001
description: Control board
bom:
  - component: { mpn: RES-10K, manufacturer: Yageo }
    quantity: 5
    reference_designators: R1, R2, R3, R4, R5
  - component: { mpn: CAP-100N, manufacturer: Murata }
    quantity: 2
    reference_designators: [C1, C2]
"#,
    );
    component(
        root,
        "RES-10K",
        "Yageo",
        "sources:\n  - distributor: Digikey\n    distributor_pn: 311-10K\n    unit_cost: \"0.10\"\n",
    );
    component(
        root,
        "CAP-100N",
        "Murata",
        "sources:\n  - distributor: Mouser\n    unit_cost: \"0.25\"\n",
    );
    tmp
}

/// PSU-001 = PCB-PSU-001 + CABLE-001 + 4 screws, with a DNP fan option
fn setup_psu() -> TempDir {
    let tmp = setup_catalog();
    let root = tmp.path();
    write(
        root,
        "products/PSU-001.yaml",
        r#"
part_number: PSU-001
description: Power supply
bom:
  - product: PCB-PSU-001
    quantity: 1
  - product: CABLE-001
    quantity: 1
  - component: { mpn: SCREW-M3, manufacturer: Bossard }
    quantity: 4
  - product: FAN-KIT
    quantity: 1
    dnp: true
"#,
    );
    write(
        root,
        "products/PCB-PSU-001.yaml",
        r#"
part_number: PCB-PSU-001
bom:
  - component: { mpn: RES-10K, manufacturer: Yageo }
    quantity: 4
    reference_designators: R1-R4
"#,
    );
    write(
        root,
        "products/CABLE-001.yaml",
        r#"
part_number: CABLE-001
bom:
  - component: { mpn: CONN-2P, manufacturer: Molex }
    quantity: 2
  - component: { mpn: RES-10K, manufacturer: Yageo }
    quantity: 1
"#,
    );
    write(
        root,
        "products/FAN-KIT.yaml",
        r#"
part_number: FAN-KIT
bom:
  - component: { mpn: FAN-25, manufacturer: Sunon }
    quantity: 1
"#,
    );
    component(
        root,
        "RES-10K",
        "Yageo",
        "sources:\n  - distributor: Digikey\n    unit_cost: \"0.10\"\n",
    );
    component(
        root,
        "CONN-2P",
        "Molex",
        "sources:\n  - distributor: Mouser\n    unit_cost: \"0.75\"\n",
    );
    component(root, "SCREW-M3", "Bossard", "");
    component(
        root,
        "FAN-25",
        "Sunon",
        "sources:\n  - distributor: Mouser\n    unit_cost: \"4.00\"\n",
    );
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    hbom()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cost"))
        .stdout(predicate::str::contains("flatten"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_version_displays() {
    hbom()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hbom"));
}

#[test]
fn test_completions_bash() {
    hbom()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hbom"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_layout() {
    let tmp = TempDir::new().unwrap();
    hbom()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized hbom catalog"));

    assert!(tmp.path().join(".hbom/config.yaml").is_file());
    assert!(tmp.path().join("products").is_dir());
    assert!(tmp.path().join("components").is_dir());
}

#[test]
fn test_init_twice_is_harmless() {
    let tmp = setup_catalog();
    hbom()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_cost_outside_catalog_fails() {
    let tmp = TempDir::new().unwrap();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PCB-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an hbom catalog"));
}

// ============================================================================
// Cost Tests
// ============================================================================

#[test]
fn test_cost_flat_product() {
    let tmp = setup_pcb();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PCB-001", "-n", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PCB-001 x 10"))
        .stdout(predicate::str::contains("├─ RES-10K (Yageo)"))
        .stdout(predicate::str::contains("└─ CAP-100N (Murata)"))
        .stdout(predicate::str::contains("Total: $10.00"));
}

#[test]
fn test_cost_json() {
    let tmp = setup_pcb();
    let output = hbom()
        .current_dir(tmp.path())
        .args(["cost", "PCB-001", "-n", "10", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["root"], "PCB-001");
    let total: f64 = value["total"].as_str().unwrap().parse().unwrap();
    assert!((total - 10.0).abs() < 1e-9);
    assert_eq!(value["tree"]["children"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cost_with_subassemblies_and_dnp() {
    let tmp = setup_psu();
    // PCB 4 x 0.10 + cable (2 x 0.75 + 0.10) + screws 0; fan kit is DNP
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PSU-001", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $4.00"))
        .stdout(predicate::str::contains("FAN-KIT"))
        .stdout(predicate::str::contains("DNP"))
        .stderr(predicate::str::contains("no source for SCREW-M3 (Bossard)"));
}

#[test]
fn test_cost_include_dnp() {
    let tmp = setup_psu();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PSU-001", "--include-dnp", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $6.00"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_fresh_catalog_runs_without_warnings() {
    let tmp = setup_pcb();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PCB-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $1.00"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_include_dnp_false_overrides_config() {
    let tmp = setup_psu();
    write(tmp.path(), ".hbom/config.yaml", "include_dnp: true\n");
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PSU-001", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $6.00"));
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PSU-001", "--include-dnp=false", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $2.00"));
}

#[test]
fn test_cost_tree_size_limit() {
    let tmp = setup_psu();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PSU-001", "--max-tree-nodes", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("over the limit of 5"));
    hbom()
        .current_dir(tmp.path())
        .args(["flatten", "PSU-001", "--max-tree-nodes", "5"])
        .assert()
        .success();
}

#[test]
fn test_cost_unknown_product() {
    let tmp = setup_pcb();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "NOPE-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("product NOPE-1 not found"));
}

#[test]
fn test_cost_rejects_zero_quantity() {
    let tmp = setup_pcb();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PCB-001", "-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("build quantity must be positive"));
}

#[test]
fn test_cost_csv_to_file() {
    let tmp = setup_pcb();
    let out = tmp.path().join("cost.csv");
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PCB-001", "-f", "csv", "-o"])
        .arg(&out)
        .assert()
        .success();

    let content = fs::read_to_string(out).unwrap();
    assert!(content.starts_with("Level,Item,"));
    assert_eq!(content.lines().count(), 4);
}

// ============================================================================
// Flatten Tests
// ============================================================================

#[test]
fn test_flatten_markdown() {
    let tmp = setup_pcb();
    hbom()
        .current_dir(tmp.path())
        .args(["flatten", "PCB-001", "-n", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Flattened BOM: PCB-001"))
        .stdout(predicate::str::contains("R1, R2, R3, R4, R5"))
        .stdout(predicate::str::contains("**Total: $10.00**"));
}

#[test]
fn test_flatten_csv_rows() {
    let tmp = setup_pcb();
    let output = hbom()
        .current_dir(tmp.path())
        .args(["flatten", "PCB-001", "-n", "10", "--format", "csv"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "Component,Manufacturer,Reference Designators,Quantity,Unit Cost,Extended Cost,Distributor,Distributor PN"
    );
    assert_eq!(lines[1], "CAP-100N,Murata,\"C1, C2\",20,0.25,5.00,Mouser,");
    assert_eq!(
        lines[2],
        "RES-10K,Yageo,\"R1, R2, R3, R4, R5\",50,0.10,5.00,Digikey,311-10K"
    );
}

#[test]
fn test_flatten_aggregates_shared_component() {
    let tmp = setup_psu();
    let output = hbom()
        .current_dir(tmp.path())
        .args(["flatten", "PSU-001", "-n", "3", "-f", "json", "-q"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = value["rows"].as_array().unwrap();
    // FAN-25 is reachable only through the DNP fan kit
    assert_eq!(rows.len(), 3);
    let res = rows
        .iter()
        .find(|r| r["component"]["mpn"] == "RES-10K")
        .unwrap();
    assert_eq!(res["quantity"], "15");
}

// ============================================================================
// Check / Cycle Tests
// ============================================================================

#[test]
fn test_check_reports_shape() {
    let tmp = setup_psu();
    hbom()
        .current_dir(tmp.path())
        .args(["check", "PSU-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid hierarchy"))
        .stdout(predicate::str::contains("products:     4"))
        .stdout(predicate::str::contains("depth:        2"))
        .stdout(predicate::str::contains("tree nodes:   9 (limit 200000)"));
}

#[test]
fn test_cycle_is_reported_by_every_command() {
    let tmp = setup_catalog();
    write(
        tmp.path(),
        "products/A.yaml",
        "part_number: A\nbom:\n  - product: B\n    quantity: 1\n",
    );
    write(
        tmp.path(),
        "products/B.yaml",
        "part_number: B\nbom:\n  - product: A\n    quantity: 2\n",
    );

    for cmd in ["cost", "flatten", "check"] {
        hbom()
            .current_dir(tmp.path())
            .args([cmd, "A"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("composition cycle: A -> B -> A"));
    }
}

#[test]
fn test_max_depth_flag() {
    let tmp = setup_psu();
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "PSU-001", "--max-depth", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the limit of 1"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_catalog_config_sets_policy() {
    let tmp = setup_catalog();
    write(
        tmp.path(),
        "products/P.yaml",
        "part_number: P\nbom:\n  - component: { mpn: X }\n    quantity: 10\n",
    );
    write(
        tmp.path(),
        "components/X.yaml",
        r#"
mpn: X
sources:
  - distributor: Old
    unit_cost: "0.08"
    last_updated: 2023-01-01T00:00:00Z
  - distributor: New
    unit_cost: "0.12"
    last_updated: 2024-06-01T00:00:00Z
"#,
    );

    hbom()
        .current_dir(tmp.path())
        .args(["cost", "P"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $0.80"));

    write(tmp.path(), ".hbom/config.yaml", "policy: recent\n");
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "P"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $1.20"));

    // flag beats config
    hbom()
        .current_dir(tmp.path())
        .args(["cost", "P", "--policy", "lowest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $0.80"));
}

#[test]
fn test_catalog_flag_from_elsewhere() {
    let tmp = setup_pcb();
    let elsewhere = TempDir::new().unwrap();
    hbom()
        .current_dir(elsewhere.path())
        .arg("--catalog")
        .arg(tmp.path())
        .args(["cost", "PCB-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $1.00"));
}

#[test]
fn test_malformed_record_names_file() {
    let tmp = setup_catalog();
    write(
        tmp.path(),
        "products/BAD.yaml",
        "part_number: BAD\nbom:\n  - component: { mpn: X }\n    quantity: -1\n",
    );
    hbom()
        .current_dir(tmp.path())
        .args(["check", "BAD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quantity"));
}
