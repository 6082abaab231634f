use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "nutshell-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn summary_field(stdout: &str, key: &str) -> Option<u64> {
    let line = stdout.lines().find(|l| l.starts_with("done @ "))?;
    line.split(", ")
        .find_map(|kv| kv.strip_prefix(&format!("{key}=")))
        .and_then(|v| v.parse().ok())
}

#[test]
fn fat_tree_routing_delivers_default_probes() {
    let output = Command::new(env!("CARGO_BIN_EXE_fat_tree_routing"))
        .args(["--until-ms", "5"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("run fat_tree_routing");
    assert!(
        output.status.success(),
        "fat_tree_routing failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    // 4 个 pod 环流，每条 100 个包
    assert_eq!(summary_field(&stdout, "delivered_pkts"), Some(400));
    assert_eq!(summary_field(&stdout, "dropped_pkts"), Some(0));
    assert_eq!(summary_field(&stdout, "no_route_pkts"), Some(0));
    assert_eq!(summary_field(&stdout, "control_pkts"), Some(96));
}

#[test]
fn fat_tree_routing_writes_json_report() {
    let dir = unique_temp_dir("report");
    let config = write_file(
        &dir,
        "sim.json",
        r#"
{
    "topology": { "k": 4, "link_latency_us": 1 },
    "probes": {
        "start_us": 100,
        "pkts_per_flow": 2,
        "flows": [ { "src": [1, 0, 0], "dst": [0, 0, 0] } ]
    },
    "until_ms": 1
}
        "#,
    );
    let report = dir.join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_fat_tree_routing"))
        .args([
            "--config",
            config.to_str().unwrap(),
            "--report-json",
            report.to_str().unwrap(),
        ])
        .env("RUST_LOG", "warn")
        .output()
        .expect("run fat_tree_routing");
    assert!(
        output.status.success(),
        "fat_tree_routing failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let raw = fs::read_to_string(&report).expect("read report.json");
    let v: Value = serde_json::from_str(&raw).expect("parse report.json");
    assert_eq!(v["stats"]["delivered_pkts"].as_u64(), Some(2));

    let nodes = v["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes.len(), 36);
    let core = nodes
        .iter()
        .find(|n| n["name"] == "c0_0")
        .expect("core c0_0");
    assert_eq!(core["kind"], "core");
    assert_eq!(core["is_core"], true);
    let routes = core["routes"].as_array().expect("routes");
    assert_eq!(routes.len(), 4);
    assert!(routes.iter().any(|r| r["destination"] == "10.0.0.0"
        && r["mask"] == "255.255.0.0"
        && r["gateway"] == "10.4.0.1"));

    let agg = nodes
        .iter()
        .find(|n| n["name"] == "p1_a0")
        .expect("aggregation p1_a0");
    assert_eq!(agg["switch_identity"], "0.0.2.0");
    assert_eq!(agg["is_core"], false);
    let suffixes: Vec<&Value> = agg["routes"]
        .as_array()
        .expect("routes")
        .iter()
        .filter(|r| r["kind"] == "suffix")
        .collect();
    assert_eq!(suffixes.len(), 2);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn fat_tree_routing_prints_tables() {
    let output = Command::new(env!("CARGO_BIN_EXE_fat_tree_routing"))
        .args(["--until-ms", "1", "--print-tables"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("run fat_tree_routing");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("c0_0 (Core) switch=0.0.0.0 core=true"));
    assert!(stdout.contains("Destination     Gateway         Genmask         Flags Metric Ref    Use Iface"));
    assert!(stdout.contains("0.0.0.0         10.0.0.2        0.0.0.0         UG    -      -      -   1"));
}

#[test]
fn fat_tree_routing_rejects_invalid_k() {
    let output = Command::new(env!("CARGO_BIN_EXE_fat_tree_routing"))
        .args(["--k", "5"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("run fat_tree_routing");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fat-tree k must be even"), "stderr={stderr}");
}
