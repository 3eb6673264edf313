//! Previewd - a local development server for HTML projects
//!
//! Discovers HTML content under a working directory and exposes it through
//! a generated index page and routed URLs.

mod listing;

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use previewd_core::config::ConfigLoader;
use previewd_core::{PreviewConfig, RouteDecision, RouteResolver};
use previewd_static::{FileServer, ServedFile};

/// Previewd - preview HTML projects and files from a working directory
#[derive(Parser)]
#[command(name = "previewd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the preview server
    Serve {
        /// Port to listen on (overrides the PORT environment variable)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Working directory to serve from
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Name of the projects directory under the working directory
        #[arg(long)]
        projects_root: Option<String>,

        /// Name of the files directory under the working directory
        #[arg(long)]
        files_root: Option<String>,

        /// Optional configuration file (JSON or TOML)
        #[arg(long)]
        config: Option<String>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        config: String,
    },

    /// Show version information
    Version,
}

/// Shared per-server state; the filesystem itself is the only mutable state
struct AppState {
    config: PreviewConfig,
    resolver: RouteResolver,
    files: FileServer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "info" })
        });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve {
            port,
            bind,
            dir,
            projects_root,
            files_root,
            config,
        } => {
            let mut config = match config {
                Some(path) => ConfigLoader::load(&path)?,
                None => PreviewConfig::from_env(),
            };
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(dir) = dir {
                config.working_dir = dir;
            }
            if let Some(root) = projects_root {
                config.projects_root = root;
            }
            if let Some(root) = files_root {
                config.files_root = root;
            }

            run_server(config).await?;
        }

        Commands::Validate { config } => match ConfigLoader::load(&config) {
            Ok(_) => println!("✅ Configuration '{}' is valid!", config),
            Err(e) => {
                eprintln!("❌ Configuration Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Version => {
            println!("Previewd v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

async fn run_server(config: PreviewConfig) -> previewd_core::Result<()> {
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| previewd_core::Error::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("🚀 Previewd v{} listening on http://{}", previewd_core::VERSION, addr);
    tracing::info!(
        "📁 Serving from {} (projects: {}/, files: {}/)",
        config.working_dir.display(),
        config.projects_root,
        config.files_root
    );

    let state = Arc::new(AppState {
        resolver: RouteResolver::new(config.clone()),
        files: FileServer::new(config.working_dir.clone()),
        config,
    });

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Accept error: {}", e);
                continue;
            }
        };

        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, service_fn(move |req| handle_request(req, state.clone())))
                .await
            {
                tracing::debug!("Error serving connection: {:?}", err);
            }
        });
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let head_only = req.method() == Method::HEAD;

    if req.method() != Method::GET && !head_only {
        return Ok(text_response(StatusCode::NOT_FOUND, "Not Found"));
    }

    tracing::debug!("{} {}", req.method(), path);

    let response = match state.resolver.resolve(&path).await {
        RouteDecision::Redirect { target } => Response::builder()
            .status(StatusCode::FOUND)
            .header("Location", target)
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|_| text_response(StatusCode::INTERNAL_SERVER_ERROR, "")),

        RouteDecision::Listing(listing) => {
            let html = listing::render(&listing, &state.config);
            Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(Full::new(Bytes::from(html)))
                .unwrap_or_else(|_| text_response(StatusCode::INTERNAL_SERVER_ERROR, ""))
        }

        RouteDecision::File { path } => match state.files.serve_path(&path).await {
            Ok(Some(served)) => file_response(served),
            Ok(None) => text_response(StatusCode::NOT_FOUND, "Not Found"),
            Err(e) => {
                tracing::warn!("Failed to serve {}: {}", path.display(), e);
                text_response(StatusCode::NOT_FOUND, "Not Found")
            }
        },

        RouteDecision::Unhandled => match state.files.serve(&path).await {
            Ok(Some(served)) => file_response(served),
            Ok(None) => text_response(StatusCode::NOT_FOUND, "Not Found"),
            Err(e) => {
                tracing::warn!("Failed to serve {}: {}", path, e);
                text_response(StatusCode::NOT_FOUND, "Not Found")
            }
        },
    };

    if head_only {
        let (parts, _) = response.into_parts();
        return Ok(Response::from_parts(parts, Full::new(Bytes::new())));
    }

    Ok(response)
}

fn file_response(served: ServedFile) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", served.mime_type)
        // Dev server: edits must show up on reload
        .header("Cache-Control", "no-cache");

    if let Some(last_modified) = served.last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }
    if let Some(etag) = served.etag {
        builder = builder.header("ETag", etag);
    }

    builder
        .body(Full::new(Bytes::from(served.content)))
        .unwrap_or_else(|_| text_response(StatusCode::INTERNAL_SERVER_ERROR, ""))
}

fn text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
}
