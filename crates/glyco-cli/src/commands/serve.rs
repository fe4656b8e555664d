//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Glyco web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let api_keys = glyco_server::parse_api_keys(
        &std::env::var(glyco_server::API_KEYS_ENV).unwrap_or_default(),
    );

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!(
            "   ❌ Authentication enabled but {} is empty: every API request will be rejected",
            glyco_server::API_KEYS_ENV
        );
        println!("      Set {} or use --no-auth for local development", glyco_server::API_KEYS_ENV);
    } else {
        println!(
            "   🔑 API keys: {} configured ({})",
            api_keys.len(),
            glyco_server::API_KEYS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = glyco_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins: vec![],
        api_keys,
    };

    glyco_server::serve_with_config(db, host, port, static_dir, config).await?;

    Ok(())
}
