use std::io::Read;

use anyhow::{Context, Result};
use ecsrefresh_orchestrations::names::orchestrations;
use serde_json::Value;

use crate::config::Config;

pub async fn run_refresh(config: &Config, payload_path: &str) -> Result<()> {
    let payload = read_payload(payload_path)?;
    run(config, orchestrations::REFRESH_SERVICES, payload).await
}

pub async fn run_verify(config: &Config, payload_path: &str) -> Result<()> {
    let payload = read_payload(payload_path)?;
    run(config, orchestrations::VERIFY_REFRESHED_SERVICES, payload).await
}

pub async fn run_trigger(config: &Config) -> Result<()> {
    run(config, orchestrations::IMMEDIATE_REFRESH, Value::Null).await
}

async fn run(config: &Config, name: &str, payload: Value) -> Result<()> {
    let registry = crate::aws::initialize(config).await;
    let result = registry.invoke(name, &payload).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Read a JSON payload from a file, or from stdin when the path is "-"
fn read_payload(path: &str) -> Result<Value> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read payload file {}", path))?
    };

    parse_payload(&raw)
}

fn parse_payload(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw).context("Payload is not valid JSON")
}
