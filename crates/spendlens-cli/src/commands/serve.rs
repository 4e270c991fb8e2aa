//! Server command implementation

use anyhow::Result;
use spendlens_server::{parse_allowed_origins, AnalyzeMode, ServerConfig};

pub async fn cmd_serve(
    host: &str,
    port: u16,
    mode: AnalyzeMode,
    allowed_origins: &str,
) -> Result<()> {
    let allowed_origins = parse_allowed_origins(allowed_origins);

    println!("🚀 Starting Spendlens web server...");
    println!("   Listening: http://{}:{}", host, port);
    match mode {
        AnalyzeMode::Summary => println!("   Mode: summary (POST /analyze returns rollups)"),
        AnalyzeMode::Insight => {
            println!("   Mode: insight (POST /analyze returns a model recap)")
        }
    }
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} (SPENDLENS_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = ServerConfig {
        mode,
        allowed_origins,
    };

    spendlens_server::serve_with_config(host, port, config).await
}
