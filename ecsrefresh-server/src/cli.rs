use clap::{Parser, Subcommand};

/// ecsrefresh - refresh ECS services and verify they come back
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Serve the orchestrations over HTTP
    Serve {
        /// API port (default: SERVER_PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Refresh the stable services named in a health event payload
    Refresh {
        /// Path to the JSON payload ("-" reads stdin)
        #[arg(short, long, default_value = "-")]
        payload: String,
    },

    /// Verify refreshed services and re-enable their alarms
    Verify {
        /// Path to the JSON payload ("-" reads stdin)
        #[arg(short, long, default_value = "-")]
        payload: String,
    },

    /// Force a redeploy of the configured service, no checks
    Trigger,

    /// Show current configuration
    Config,

    /// Print orchestration flow diagrams (Mermaid)
    Flows {
        /// Orchestration name (default: all)
        name: Option<String>,
    },
}
