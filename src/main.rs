//! CLI entry point for hexo-amp

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hexo-amp")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "Serves AMP versions of Hexo posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Installation root holding views/amp.html (defaults to the executable's directory)
    #[arg(long, global = true)]
    app_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the AMP server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts and pages with their AMP URLs
    List {
        /// Type of content to list (post, page)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn default_app_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .filter(|dir| dir.join("views").is_dir())
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "hexo_amp=debug,info"
    } else {
        "hexo_amp=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let app_root = cli.app_root.unwrap_or_else(default_app_root);

    match cli.command {
        Commands::Server { port, ip } => {
            let site = hexo_amp::Site::new(&base_dir, app_root)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            hexo_amp::server::start(&site, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let site = hexo_amp::Site::new(&base_dir, app_root)?;
            hexo_amp::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("hexo-amp version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
