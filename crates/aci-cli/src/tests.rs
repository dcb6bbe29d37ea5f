//! CLI command tests

use crate::commands::UpdateCommand;
use crate::Cli;
use autoyast_net_core::{EditOutcome, InterfaceEntry, ProfileDocument, RouteEntry, SkipReason};
use clap::error::ErrorKind;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Sample ACI configuration for testing
const SAMPLE_CONFIG: &str = r#"
[DEFAULT]
vlan_id = 100
mtu = 1600

[aci_targets]
node1 = eth0

[routing]
destination = 0.0.0.0
gateway = 10.0.0.1
netmask = 0.0.0.0
"#;

/// Profile as delivered by a freshly installed node
const SAMPLE_PROFILE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE profile>
<profile xmlns="http://www.suse.com/1.0/yast2ns" xmlns:config="http://www.suse.com/1.0/configns">
  <networking>
    <dns>
      <hostname>node1</hostname>
    </dns>
    <interfaces config:type="list">
      <interface>
        <bootproto>dhcp</bootproto>
        <device>eth0</device>
        <startmode>auto</startmode>
      </interface>
    </interfaces>
    <routing>
      <ipv4_forward config:type="boolean">false</ipv4_forward>
    </routing>
  </networking>
</profile>
"#;

/// Write config and profile into a temporary directory
fn create_test_files() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("aci_nodes.conf");
    let input_path = temp_dir.path().join("autoinst.xml");
    fs::write(&config_path, SAMPLE_CONFIG).expect("Failed to write test file");
    fs::write(&input_path, SAMPLE_PROFILE).expect("Failed to write test file");
    (temp_dir, config_path, input_path)
}

fn interfaces(doc: &ProfileDocument) -> Vec<InterfaceEntry> {
    doc.interfaces()
        .unwrap()
        .find_all("interface")
        .filter_map(InterfaceEntry::from_element)
        .collect()
}

fn routes(doc: &ProfileDocument) -> Vec<RouteEntry> {
    doc.routing()
        .unwrap()
        .find("routes")
        .map(|routes| {
            routes
                .find_all("route")
                .filter_map(RouteEntry::from_element)
                .collect()
        })
        .unwrap_or_default()
}

fn run(config: &Path, input: &Path, output: &Path) -> anyhow::Result<crate::commands::UpdateReport> {
    UpdateCommand::from_config_file(config, "node1")?.execute(input, output)
}

#[test]
fn test_update_fresh_profile() {
    let (temp_dir, config_path, input_path) = create_test_files();
    let output_path = temp_dir.path().join("out_autoinst.xml");

    let report = run(&config_path, &input_path, &output_path).unwrap();
    assert_eq!(report.mtu, EditOutcome::Applied);
    assert_eq!(report.vlan_interface, EditOutcome::Applied);
    assert_eq!(report.route, EditOutcome::Applied);

    let doc = ProfileDocument::load(&output_path).unwrap();

    let all = interfaces(&doc);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].device, "eth0");
    assert_eq!(all[0].mtu, Some(1600));

    let vlans: Vec<_> = all.iter().filter(|i| i.device == "vlan.100").collect();
    assert_eq!(vlans.len(), 1);
    assert_eq!(vlans[0].etherdevice.as_deref(), Some("eth0"));

    let all_routes = routes(&doc);
    assert_eq!(all_routes.len(), 1);
    assert_eq!(all_routes[0].device, "vlan.100");
    assert_eq!(all_routes[0].gateway, "10.0.0.1");

    let output = fs::read_to_string(&output_path).unwrap();
    assert!(output.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    assert!(output.contains(r#"<profile xmlns="http://www.suse.com/1.0/yast2ns""#));
}

#[test]
fn test_update_is_idempotent() {
    let (temp_dir, config_path, input_path) = create_test_files();
    let first = temp_dir.path().join("first.xml");
    let second = temp_dir.path().join("second.xml");

    run(&config_path, &input_path, &first).unwrap();
    let report = run(&config_path, &first, &second).unwrap();

    let skipped = EditOutcome::Skipped(SkipReason::AlreadyPresent);
    assert_eq!(report.mtu, skipped);
    assert_eq!(report.vlan_interface, skipped);
    assert_eq!(report.route, skipped);

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_report_display() {
    let (temp_dir, config_path, input_path) = create_test_files();
    let output_path = temp_dir.path().join("out.xml");

    let report = run(&config_path, &input_path, &output_path).unwrap();
    let text = report.to_string();

    assert!(text.contains("mtu eth0: applied"));
    assert!(text.contains("vlan interface vlan.100: applied"));
    assert!(text.contains("route via vlan.100: applied"));
}

#[test]
fn test_missing_config_file() {
    let (temp_dir, _, input_path) = create_test_files();
    let output_path = temp_dir.path().join("out.xml");
    let missing = temp_dir.path().join("missing.conf");

    let err = run(&missing, &input_path, &output_path).unwrap_err();
    assert!(err.to_string().contains("node1"));
    assert!(!output_path.exists());
}

#[test]
fn test_profile_without_networking() {
    let (temp_dir, config_path, input_path) = create_test_files();
    let output_path = temp_dir.path().join("out.xml");
    fs::write(
        &input_path,
        r#"<profile xmlns="http://www.suse.com/1.0/yast2ns"><general/></profile>"#,
    )
    .unwrap();

    let err = run(&config_path, &input_path, &output_path).unwrap_err();
    assert!(err.to_string().contains("Failed to load profile"));
    assert!(!output_path.exists());
}

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["setup-aci-nodes", "-n", "node1", "-i", "autoinst.xml"]).unwrap();

    assert_eq!(cli.config_file, PathBuf::from("aci_nodes.conf"));
    assert_eq!(cli.output_file, PathBuf::from("/root/out_autoinst.xml"));
    assert_eq!(cli.node_name, "node1");
    assert_eq!(cli.log_level(), "warn");
}

#[test]
fn test_cli_long_flags() {
    let cli = Cli::try_parse_from([
        "setup-aci-nodes",
        "--config-file",
        "/etc/aci_nodes.conf",
        "--node-name",
        "node1.example.com",
        "--input-file",
        "in.xml",
        "--output-file",
        "out.xml",
        "--debug",
    ])
    .unwrap();

    assert_eq!(cli.config_file, PathBuf::from("/etc/aci_nodes.conf"));
    assert_eq!(cli.node_name, "node1.example.com");
    assert_eq!(cli.output_file, PathBuf::from("out.xml"));
    assert_eq!(cli.log_level(), "debug");
}

#[test]
fn test_cli_missing_required_arguments() {
    for args in [
        vec!["setup-aci-nodes", "-i", "autoinst.xml"],
        vec!["setup-aci-nodes", "-n", "node1"],
        vec!["setup-aci-nodes"],
    ] {
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }
}
