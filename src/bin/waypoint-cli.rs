use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use waypoint::middleware::{generate_token, JwtConfig};

#[derive(Parser)]
#[command(name = "waypoint-cli")]
#[command(about = "Token and request helper for a waypoint server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9999")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a signed HS256 token
    Token {
        #[arg(long, default_value_t = 1)]
        uid: u64,
        #[arg(long, default_value = "admin")]
        role: String,
        #[arg(long)]
        secret: String,
        #[arg(long, default_value_t = 3600)]
        ttl_secs: u64,
    },
    /// GET a path and print the response
    Get {
        path: String,
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Token {
            uid,
            role,
            secret,
            ttl_secs,
        } => {
            let config = JwtConfig {
                secret,
                ttl: Duration::from_secs(ttl_secs),
            };
            println!("{}", generate_token(&config, uid, &role)?);
        }
        Commands::Get { path, token } => {
            let mut headers = HeaderMap::new();
            if let Some(token) = token {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", token))?,
                );
            }
            let res = reqwest::Client::new()
                .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    println!("{}", status);

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
