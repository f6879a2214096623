use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use khidmat_config::{Severity, validate};

#[derive(Parser)]
#[command(name = "khidmat", about = "Khidmat — WhatsApp intake bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true, env = "PORT")]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook gateway (default when no subcommand is provided).
    Gateway,
    /// Check the effective configuration and report problems.
    Doctor,
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut config = khidmat_config::discover_and_load();
    if let Some(bind) = cli.bind.clone() {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Commands::Gateway) {
        Commands::Gateway => {
            for diagnostic in validate(&config) {
                match diagnostic.severity {
                    Severity::Error => {
                        tracing::error!(field = diagnostic.field, "{}", diagnostic.message)
                    },
                    Severity::Warning => {
                        tracing::warn!(field = diagnostic.field, "{}", diagnostic.message)
                    },
                }
            }
            info!("starting khidmat gateway");
            khidmat_gateway::run(config).await
        },
        Commands::Doctor => {
            let diagnostics = validate(&config);
            if diagnostics.is_empty() {
                println!("config ok");
                return Ok(());
            }
            let mut failed = false;
            for diagnostic in &diagnostics {
                let tag = match diagnostic.severity {
                    Severity::Error => {
                        failed = true;
                        "error"
                    },
                    Severity::Warning => "warning",
                };
                println!("{tag}: {}: {}", diagnostic.field, diagnostic.message);
            }
            if failed {
                anyhow::bail!("configuration has errors");
            }
            Ok(())
        },
    }
}
