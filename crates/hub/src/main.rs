mod demo; // Demo components
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use hub_core::event::sync_event_handler;
use hub_core::{BootEntry, ConfigFormat, EventResult, Hub, HubConfig, HubEvent};
use log::{error, info};

use crate::demo::{Mailer, User};

/// Hub: an in-process component registry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Boot the demo User and Mailer components and send a welcome mail
    Demo {
        /// Configuration file (.json, .yaml, .yml or .toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the API prefix from the configuration
        #[arg(long)]
        api_prefix: Option<String>,
        /// Name of the user to create
        #[arg(long, default_value = "John Doe")]
        name: String,
        /// Email of the user to create
        #[arg(long, default_value = "john@doe.com")]
        email: String,
    },
    /// Print the effective configuration
    Config {
        /// Configuration file (.json, .yaml, .yml or .toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

impl From<OutputFormat> for ConfigFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ConfigFormat::Json,
            OutputFormat::Yaml => ConfigFormat::Yaml,
            OutputFormat::Toml => ConfigFormat::Toml,
        }
    }
}

fn load_config(path: Option<PathBuf>) -> hub_core::Result<HubConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Ok(HubConfig::from_file(path)?)
        }
        None => Ok(HubConfig::default()),
    }
}

async fn run_demo(config: HubConfig, name: &str, email: &str) -> hub_core::Result<()> {
    let hub = Hub::with_config(config);
    hub.events().register_handler(
        HubEvent::REGISTERED,
        sync_event_handler(|event| {
            if let Some(HubEvent::Registered { name }) = event.as_any().downcast_ref::<HubEvent>() {
                info!("Component '{}' is ready", name);
            }
            EventResult::Continue
        }),
    );

    let prefix = hub.config().api_prefix.clone();
    let user = User::new();
    let mailer = Mailer::new(&prefix);

    println!("Booting components...");
    hub.register(vec![
        BootEntry::new("User", user.clone()).depends_on(["Mailer"]),
        BootEntry::new("Mailer", mailer.clone()),
    ])
    .await?;

    let mut booted: Vec<String> = hub.registry().names();
    booted.sort_by_key(|name| hub.timestamp(name));
    for name in &booted {
        println!("  - Registered: {}", name);
    }

    let sent = user.create(name, email).await?;
    println!("User -> Mailer.SendMail: {}", sent);
    println!("Mails sent: {}", mailer.sent());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    match args.command {
        Some(Commands::Demo {
            config,
            api_prefix,
            name,
            email,
        }) => {
            let config = match load_config(config) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load configuration: {}", e);
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let config = match api_prefix {
                Some(prefix) => config.with_api_prefix(prefix),
                None => config,
            };
            if let Err(e) = run_demo(config, &name, &email).await {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Config { config, format }) => {
            let rendered = load_config(config)
                .map(HubConfig::normalized)
                .and_then(|config| Ok(config.serialize(format.into())?));
            match rendered {
                Ok(text) => {
                    println!("{}", text.trim_end());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            println!("{} {}", hub_core::kernel::constants::APP_NAME, hub_core::kernel::constants::APP_VERSION);
            println!("No command given. Run with --help for usage.");
            ExitCode::SUCCESS
        }
    }
}
