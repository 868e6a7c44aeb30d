use anyhow::Context;
use clap::{Parser, Subcommand};
use dragonfly_imgproxy::config::Config;
use dragonfly_imgproxy::dragonfly::{encode_jobs, job::parse_jobs, sign, translate};
use dragonfly_imgproxy::proxy::DragonflyProxy;
use pingora_core::server::configuration::Opt;
use pingora_core::server::Server;
use std::path::PathBuf;

/// Dragonfly to imgproxy proxy - verifies signed job URLs and forwards them to imgproxy
#[derive(Parser, Debug)]
#[command(name = "dragonfly-imgproxy")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Upgrade workers gracefully
    #[arg(long)]
    upgrade: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the proxy (default)
    Serve(ServeArgs),

    /// Print a signed /media URL for a job list
    Sign {
        /// Signing secret shared with the proxy
        #[arg(long, env = "DRAGONFLY_SECRET")]
        secret: String,

        /// Job list as JSON, e.g. '[["f","a.jpg"],["p","thumb","100x100#"]]'
        #[arg(long)]
        jobs: String,

        /// Decorative file extension appended to the payload
        #[arg(long, default_value = "jpg")]
        ext: String,
    },

    /// Print the imgproxy path for a job list
    Translate {
        /// Source URL prefix prepended to fetch paths
        #[arg(long, default_value = "")]
        prefix: String,

        /// Job list as JSON
        #[arg(long)]
        jobs: String,
    },
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        None => serve(args.serve),
        Some(Command::Serve(serve_args)) => serve(serve_args),
        Some(Command::Sign { secret, jobs, ext }) => sign_url(&secret, &jobs, &ext),
        Some(Command::Translate { prefix, jobs }) => translate_jobs(&prefix, &jobs),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn sign_url(secret: &str, jobs_json: &str, ext: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!secret.is_empty(), "DragonflySecret required");
    let jobs = parse_jobs(jobs_json.as_bytes()).context("Invalid job list")?;

    let ext = ext.trim_start_matches('.');
    let suffix = if ext.is_empty() {
        String::new()
    } else {
        format!(".{}", ext)
    };

    println!(
        "/media/{}{}?sha={}",
        encode_jobs(&jobs),
        suffix,
        sign(secret, &jobs)
    );
    Ok(())
}

fn translate_jobs(prefix: &str, jobs_json: &str) -> anyhow::Result<()> {
    let jobs = parse_jobs(jobs_json.as_bytes()).context("Invalid job list")?;
    println!("{}", translate(prefix, &jobs)?);
    Ok(())
}

fn serve(args: ServeArgs) -> anyhow::Result<()> {
    // Load configuration from file
    let config = Config::from_file(&args.config)
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    // Initialize logging subsystem
    dragonfly_imgproxy::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        upstream_host = %config.upstream.host,
        upstream_port = config.upstream.port,
        error_status = ?config.server.error_status,
        "Configuration loaded successfully"
    );

    // Build Pingora server options
    let opt = Opt {
        daemon: args.daemon,
        test: args.test,
        upgrade: args.upgrade,
        ..Default::default()
    };

    let mut server = Server::new(Some(opt)).context("Failed to create Pingora server")?;
    server.bootstrap();

    let proxy = DragonflyProxy::new(&config)?;

    let mut proxy_service = pingora_proxy::http_proxy_service(&server.configuration, proxy);

    let listen_addr = config.server.listen_addr();
    proxy_service.add_tcp(&listen_addr);

    tracing::info!(
        address = %listen_addr,
        "Starting Dragonfly imgproxy proxy"
    );

    server.add_service(proxy_service);

    // Blocks until shutdown
    server.run_forever();
}
