//! Relay TUI entry point.

use std::{
    error::Error,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use relay_app::{App, Runtime};
use relay_client::{Transport, TransportConfig, WsDialer, channel_url};
use relay_tui::{
    RestBootstrap, SessionBootstrap, TerminalDriver, Theme,
    config::{self, Config, DEFAULT_SERVER_NAME, ServerProfile},
    logging, servers,
};

/// Terminal client for remote assistant sessions
#[derive(Parser, Debug)]
#[command(name = "relay-tui")]
#[command(about = "Chat with a remote coding assistant from the terminal")]
#[command(version)]
struct Cli {
    /// Server profile file (defaults to ~/.relay-tui.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a chat session on a saved server
    Connect(ConnectArgs),

    /// Manage saved servers
    #[command(subcommand)]
    Servers(ServersCommand),
}

#[derive(Args, Debug)]
struct ConnectArgs {
    /// Saved server to connect to
    #[arg(short, long, env = "RELAY_SERVER", default_value = DEFAULT_SERVER_NAME)]
    server: String,

    /// Connect to this base URL instead of the saved server's
    #[arg(long, env = "RELAY_URL")]
    url: Option<String>,

    /// Use this bearer token instead of the saved server's
    #[arg(short, long, env = "RELAY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Project directory for a new session (defaults to the current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Attach to an existing session instead of creating one
    #[arg(long)]
    session: Option<String>,

    /// Label shown in the status bar (defaults to the server name)
    #[arg(short, long)]
    name: Option<String>,

    /// Append logs to this file. Logging is off without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum ServersCommand {
    /// List saved servers
    List,

    /// Save a server
    Add {
        /// Profile name
        #[arg(long)]
        name: String,
        /// Base URL, e.g. http://localhost:3002
        #[arg(long)]
        url: String,
        /// Bearer token
        #[arg(long)]
        token: String,
    },

    /// Delete a saved server
    Remove {
        /// Profile name
        name: String,
    },

    /// Check that saved servers respond
    Test {
        /// Only check this server
        name: Option<String>,
    },
}

#[allow(clippy::print_stderr)]
fn progress(message: &str) {
    eprintln!("{message}");
}

#[allow(clippy::print_stdout)]
fn output(message: &str) {
    print!("{message}");
}

fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
    let (config, created) = Config::load_or_init(path)?;
    if created {
        progress(&format!("Created default config at {}", path.display()));
    }
    Ok(config)
}

/// Saved profile for `args.server` with command-line overrides applied.
///
/// An explicit URL skips the config file entirely.
fn resolve_server(args: &ConnectArgs, config_path: &Path) -> Result<ServerProfile, Box<dyn Error>> {
    if let Some(url) = &args.url {
        return Ok(ServerProfile {
            name: args.server.clone(),
            url: url.clone(),
            token: args.token.clone().unwrap_or_default(),
        });
    }

    let config = load_config(config_path)?;
    let mut profile = config.find_server(&args.server)?.clone();
    if let Some(token) = &args.token {
        profile.token.clone_from(token);
    }
    Ok(profile)
}

/// Check server health and create a session. Returns the session id.
async fn start_session(
    rest: &RestBootstrap,
    project: Option<&Path>,
) -> Result<String, Box<dyn Error>> {
    progress(&format!("Connecting to {}...", rest.base_url()));
    let health = rest.health().await.map_err(|e| format!("server unreachable: {e}"))?;
    progress(&format!("Server OK: {}, {} active sessions", health.status, health.active_sessions));

    let project = match project {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let project = project.to_string_lossy();

    progress(&format!("Creating session for {project}..."));
    let session =
        rest.create_session(&project).await.map_err(|e| format!("create session: {e}"))?;
    progress(&format!("Session: {}", session.id));

    Ok(session.id)
}

async fn connect(args: ConnectArgs, config_path: &Path) -> Result<(), Box<dyn Error>> {
    let _log_guard = match &args.log_file {
        Some(path) => Some(logging::init(path, &args.log_level)?),
        None => None,
    };

    let server = resolve_server(&args, config_path)?;
    tracing::info!(server = %server.name, url = %server.url, "starting");

    let session_id = match &args.session {
        Some(id) => id.clone(),
        None => {
            let rest = RestBootstrap::new(&server.url, server.token.clone());
            start_session(&rest, args.project.as_deref()).await?
        },
    };

    let url = channel_url(&server.url, &server.token)?;
    let transport = Transport::connect(WsDialer, url.as_str(), TransportConfig::default())
        .await
        .map_err(|e| format!("websocket: {e}"))?;

    let label = args.name.unwrap_or(server.name);
    let driver = TerminalDriver::new(Theme::default(), label)?;

    let mut runtime = Runtime::new(driver, transport, App::new(session_id));
    Ok(runtime.run().await?)
}

async fn manage_servers(command: ServersCommand, config_path: &Path) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(config_path)?;

    match command {
        ServersCommand::List => output(&servers::list(&config)),
        ServersCommand::Add { name, url, token } => {
            config.add_server(&name, &url, &token)?;
            config.save(config_path)?;
            let saved = config.find_server(&name)?;
            output(&format!("Added server {:?} ({})\n", saved.name, saved.url));
        },
        ServersCommand::Remove { name } => {
            let removed = config.remove_server(&name)?;
            config.save(config_path)?;
            output(&format!("Removed server {:?}\n", removed.name));
        },
        ServersCommand::Test { name } => {
            let targets = match name {
                Some(name) => vec![config.find_server(&name)?.clone()],
                None => config.servers,
            };
            if targets.is_empty() {
                output("No servers configured.\n");
            }
            for target in &targets {
                let rest = RestBootstrap::new(&target.url, target.token.clone());
                output(&format!("{}\n", servers::check(target, &rest).await));
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_path);

    match cli.command {
        Command::Connect(args) => connect(args, &config_path).await,
        Command::Servers(command) => manage_servers(command, &config_path).await,
    }
}
