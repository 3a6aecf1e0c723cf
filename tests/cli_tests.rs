//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<blueprint xmlns="http://www.osgi.org/xmlns/blueprint/v1.0.0"
           xmlns:cm="http://aries.apache.org/blueprint/xmlns/blueprint-cm/v1.1.0"
           xmlns:cxf="http://camel.apache.org/schema/blueprint/cxf">
  <cm:property-placeholder persistent-id="com.acme.orders">
    <cm:default-properties>
      <cm:property name="partner.endpoint" value="https://partner.example.com/ws"/>
    </cm:default-properties>
  </cm:property-placeholder>

  <bean id="ordersDs" class="org.apache.commons.dbcp2.BasicDataSource">
    <property name="url" value="jdbc:postgresql://db.internal:5432/orders"/>
    <property name="password" value="hunter2"/>
  </bean>

  <cxf:cxfEndpoint id="partnerSoap" address="[{partner.endpoint}]"/>

  <camelContext id="orders" xmlns="http://camel.apache.org/schema/blueprint">
    <route id="processOrder">
      <from uri="direct:process"/>
      <to uri="cxf:bean:partnerSoap"/>
    </route>
  </camelContext>
</blueprint>"#;

const BILLING: &str = r#"<blueprint>
  <camelContext xmlns="http://camel.apache.org/schema/blueprint">
    <route id="invoice">
      <from uri="timer:tick"/>
      <to uri="https://billing.example.com/api/invoices"/>
    </route>
  </camelContext>
</blueprint>"#;

fn blueprint_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("orders.xml"), ORDERS).unwrap();
    let nested = temp.path().join("billing/OSGI-INF/blueprint");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("camel-context.xml"), BILLING).unwrap();
    temp
}

fn lens(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blueprint-lens"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let temp = TempDir::new().unwrap();
    lens(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("blueprint-lens"));
}

#[test]
fn test_cli_help() {
    let temp = TempDir::new().unwrap();
    lens(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("context"))
        .stdout(predicate::str::contains("survey"))
        .stdout(predicate::str::contains("profiles"));
}

#[test]
fn test_analyze_reports_external_service_with_config_property() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["analyze", "orders", "--source", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"partnerSoap\""))
        .stdout(predicate::str::contains("\"configProperty\": \"partner.endpoint\""))
        .stdout(predicate::str::contains("PostgreSQL"));
}

#[test]
fn test_analyze_text_format_resolves_nested_blueprint() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["analyze", "billing", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("invoice"))
        .stdout(predicate::str::contains("billing.example.com"));
}

#[test]
fn test_analyze_unknown_service_fails_with_not_found() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["analyze", "shipping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no blueprint found for service 'shipping'"));
}

#[test]
fn test_context_redacts_secrets_by_default() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["context", "orders", "--profile", "compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[SECRET_REDACTED]"))
        .stdout(predicate::str::contains("hunter2").not())
        .stderr(predicate::str::contains("[profile: compact]"));
}

#[test]
fn test_context_no_redact_keeps_raw_text() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["context", "orders", "--profile", "compact", "--no-redact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2"));
}

#[test]
fn test_context_truncates_to_max_length() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["context", "orders", "--max-length", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<!-- [truncated] -->"))
        .stderr(predicate::str::contains("truncated"));
}

#[test]
fn test_context_default_profile_reconstructs_fragments() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["context", "orders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<!-- Routes (1) -->"))
        .stdout(predicate::str::contains("<!-- Data sources (1) -->"))
        .stdout(predicate::str::contains("</blueprint>"))
        .stdout(predicate::str::contains("[truncated]").not());
}

#[test]
fn test_context_json_includes_structured_summary_and_redactions() {
    let temp = blueprint_dir();
    let output = lens(temp.path())
        .args(["context", "orders", "--format", "json", "--structured"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["service"], "orders");
    assert_eq!(value["profile"], "default");
    assert_eq!(value["payload"]["truncated"], false);
    assert_eq!(value["redactions"]["secret_property"], 1);
    assert_eq!(value["structured"]["externalServices"][0]["name"], "partnerSoap");
}

#[test]
fn test_context_unknown_profile_lists_available() {
    let temp = blueprint_dir();
    lens(temp.path())
        .args(["context", "orders", "--profile", "turbo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown optimization profile 'turbo'"))
        .stderr(predicate::str::contains("minimal-processing"));
}

#[test]
fn test_config_file_profile_and_default() {
    let temp = blueprint_dir();
    fs::write(
        temp.path().join("blueprint-lens.toml"),
        r#"
default_profile = "tiny"

[profiles.tiny]
includeFullXml = true
maxLength = 20
"#,
    )
    .unwrap();

    lens(temp.path())
        .args(["context", "orders", "--no-redact"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml version=\"1.0\""))
        .stdout(predicate::str::contains("<!-- [truncated] -->"))
        .stderr(predicate::str::contains("[profile: tiny]"));

    lens(temp.path())
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured:"))
        .stdout(predicate::str::contains("tiny"))
        .stdout(predicate::str::contains("(default)"));
}

#[test]
fn test_profiles_lists_presets() {
    let temp = TempDir::new().unwrap();
    lens(temp.path())
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("compact"))
        .stdout(predicate::str::contains("full-processing"))
        .stdout(predicate::str::contains("minimal-processing"))
        .stdout(predicate::str::contains("6000 chars"));
}

#[test]
fn test_survey_writes_report() {
    let temp = blueprint_dir();
    let report = temp.path().join("out/report.json");

    lens(temp.path())
        .args(["survey", "--no-timestamp", "--report"])
        .arg(&report)
        .assert()
        .success()
        .stderr(predicate::str::contains("Surveyed 2 blueprints"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["schema_version"], "1.0.0");
    assert!(value.get("generated_at").is_none());
    assert_eq!(value["totals"]["services"], 2);
    assert_eq!(value["services"][0]["service"], "billing");
    assert_eq!(value["services"][1]["service"], "orders");
    assert_eq!(value["services"][1]["external_services"][0], "partnerSoap");
}

#[test]
fn test_completions_bash() {
    let temp = TempDir::new().unwrap();
    lens(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blueprint-lens"));
}
