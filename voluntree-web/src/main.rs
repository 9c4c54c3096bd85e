//! Voluntree Web Server
//!
//! API server for the Voluntree marketplace: organizations post volunteering
//! and internship opportunities, individuals browse and apply.

use clap::Parser;
use voluntree_web::server::VoluntreeServerBuilder;
use voluntree_web::{init_logging, WebConfig};

/// Voluntree Web Server - volunteering marketplace API
#[derive(Parser)]
#[command(name = "voluntree-web")]
#[command(about = "API server for the Voluntree marketplace")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging first
    std::env::set_var(
        "RUST_LOG",
        format!("voluntree_web={},tower_http=debug", args.log_level),
    );
    init_logging();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Create web configuration, then override with command line arguments
    let mut config = WebConfig::from_env();
    config.host = args.host;
    config.port = args.port;
    config.dev_mode = args.dev;
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    println!("🚀 Starting Voluntree Web Server");
    println!("📍 Server: http://{}:{}", config.host, config.port);
    println!("🗄️  Database: {}", config.database_url);

    if std::env::var("SESSION_SECRET").is_err() {
        println!("⚠️  Warning: SESSION_SECRET is not set, using the built-in default.");
        println!("   Sessions will not survive a secret rotation. Set it in production.");
    }

    if std::env::var("RESEND_API_KEY").is_err() {
        println!("⚠️  Warning: RESEND_API_KEY is not set, notification emails are disabled.");
    }

    // Build and start the server
    let server = match VoluntreeServerBuilder::with_config(config).build().await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server (this will block until shutdown)
    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed to start: {}", e);
        std::process::exit(1);
    }

    println!("✅ Server shut down gracefully");
}
