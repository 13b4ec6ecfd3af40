//! gridtree API Server binary

use clap::Parser;
use gridtree::api::{run_api_server, ApiConfig};
use gridtree::config::DEFAULT_DOCUMENT_TYPE;

#[derive(Parser, Debug)]
#[command(name = "gridtree-server")]
#[command(version)]
#[command(about = "gridtree API Server - spreadsheet ⇄ JSON transcoding over HTTP")]
#[command(long_about = r#"
gridtree API Server

Endpoints:
  - POST /api/v1/decode  - Decode an Excel workbook into a document
  - POST /api/v1/encode  - Encode a document into an Excel workbook
  - GET  /health         - Health check
  - GET  /version        - Server version info
  - GET  /               - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs

Example usage:
  gridtree-server                            # Start on localhost:8080
  gridtree-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/decode \
    -H "Content-Type: application/json" \
    -d '{"excel_path": "upload.xlsx"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "GRIDTREE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "GRIDTREE_PORT")]
    port: u16,

    /// document_type stamped on decoded documents
    #[arg(long, default_value = DEFAULT_DOCUMENT_TYPE, env = "GRIDTREE_DOCUMENT_TYPE")]
    document_type: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        document_type: args.document_type,
    };

    run_api_server(config).await
}
