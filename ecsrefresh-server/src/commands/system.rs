use anyhow::Result;
use ecsrefresh_orchestrations::flows::{get_flow, ALL_FLOWS};

use crate::config::Config;

pub fn config(config: &Config) -> Result<()> {
    let settings = &config.settings;

    println!("ecsrefresh Configuration");
    println!("{}", "=".repeat(80));
    println!();

    println!("Server:");
    println!("  Host:              {}", config.server_host);
    println!("  Port:              {}", config.server_port);
    println!("  Log Format:        {:?}", config.log_format);
    println!();

    println!("Refresh:");
    println!("  Default Region:    {}", settings.default_region);
    println!("  Alarm Settle:      {}s", settings.alarm_settle.as_secs());
    println!("  Event Pacing:      {}s", settings.event_pacing.as_secs());
    println!();

    println!("Verification Events:");
    println!("  Bus:               {}", settings.event_bus);
    println!("  Source:            {}", settings.event_source);
    println!("  Detail Type:       {}", settings.event_detail_type);
    println!();

    println!("Immediate Trigger:");
    println!("  Cluster:           {}", settings.trigger_cluster);
    println!("  Service:           {}", settings.trigger_service);
    println!();

    println!("Environment Variables:");
    for key in ["AWS_PROFILE", "AWS_REGION", "RUST_LOG"] {
        let value = std::env::var(key).unwrap_or_else(|_| "not set".to_string());
        println!("  {:<20} {}", key, value);
    }

    Ok(())
}

pub fn flows(name: Option<String>) -> Result<()> {
    match name {
        Some(name) => {
            let flow = get_flow(&name)
                .ok_or_else(|| anyhow::anyhow!("No flow for orchestration: {}", name))?;
            println!("{}", flow.mermaid);
        }
        None => {
            for flow in ALL_FLOWS {
                println!("%% {}", flow.orchestration_name);
                println!("{}", flow.mermaid);
                println!();
            }
        }
    }
    Ok(())
}
