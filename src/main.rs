use anyhow::Result;
use clap::{Parser, Subcommand};

/// overseace - website contact and quote form backend
#[derive(Parser)]
#[command(name = "overseace")]
#[command(about = "Contact and quote request form backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load and validate the configuration, then print a summary
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = overseace::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Serve { host, port } => {
            overseace::observability::init_observability(&config.observability)?;
            overseace::server::serve(config, host, port).await
        }
        Commands::CheckConfig => {
            println!("server:      {}:{}", config.server.host, config.server.port);
            println!("recipient:   {}", config.forms.recipient);
            println!("timezone:    {}", config.forms.timezone);
            println!("sender:      {}", config.email.from_address);
            println!(
                "smtp:        {}:{} (timeout {}s)",
                config.email.smtp_host, config.email.smtp_port, config.email.smtp_timeout_secs
            );
            println!(
                "audit log:   {}",
                if config.audit.enabled {
                    config.audit.path.as_str()
                } else {
                    "disabled"
                }
            );
            println!(
                "rate limit:  {}",
                if config.rate_limit.enabled {
                    format!(
                        "{} requests / {}s",
                        config.rate_limit.max_requests, config.rate_limit.window_secs
                    )
                } else {
                    "disabled".to_string()
                }
            );
            Ok(())
        }
    }
}
