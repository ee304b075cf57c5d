//! 命令行工具
//!
//! ## Usage
//!
//! ```bash
//! # 哈希密码（默认算法）
//! hashy "my secret"
//!
//! # 指定算法和 bcrypt cost
//! hashy -a bcrypt -c 12 "my secret"
//!
//! # 验证密码，并提示是否需要重哈希
//! hashy "my secret" '$2b$12$...'
//!
//! # 查看哈希信息（JSON）
//! hashy --info '$2b$12$...'
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hashy::{Error, PasswordHasher};

/// Hash and verify passwords with self-describing hashes
#[derive(Parser)]
#[command(name = "hashy", version, about, long_about = None)]
struct Cli {
    /// Secret to hash, or to verify against HASH
    #[arg(value_name = "SECRET", required_unless_present = "info")]
    secret: Option<String>,

    /// Hash to verify SECRET against
    #[arg(value_name = "HASH")]
    hash: Option<String>,

    /// Algorithm to use for hashing (defaults to the first registered algorithm)
    #[arg(short, long, value_name = "ALGORITHM")]
    algorithm: Option<String>,

    /// Cost for bcrypt
    #[arg(short, long)]
    cost: Option<u32>,

    /// Policy overrides as JSON, e.g. '{"argon2":{"timeCost":4}}'
    #[arg(long, value_name = "JSON")]
    policy: Option<String>,

    /// Print the algorithm and parameters of HASH as JSON
    #[arg(short, long, value_name = "HASH", conflicts_with_all = ["secret", "hash"])]
    info: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli, hashy::global()).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, hasher: &PasswordHasher) -> Result<String, String> {
    if let Some(json) = cli.policy.as_deref() {
        hasher.options().apply_json(json).map_err(display)?;
    }
    if let Some(cost) = cli.cost {
        hasher
            .options()
            .set("bcrypt", "cost", cost)
            .map_err(display)?;
    }

    if let Some(hash) = cli.info.as_deref() {
        let info = hasher.get_info(hash).map_err(display)?;
        return serde_json::to_string_pretty(&info).map_err(|e| e.to_string());
    }

    let algorithm = cli.algorithm.as_deref();
    match (cli.secret.as_deref(), cli.hash.as_deref()) {
        (Some(secret), None) => hasher.hash(secret, algorithm, None).await.map_err(display),
        (Some(secret), Some(hash)) => {
            if !hasher.verify(secret, hash).await.map_err(display)? {
                return Err("not ok".to_string());
            }
            if hasher.needs_rehash(hash, algorithm, None).map_err(display)? {
                Ok("ok but password should be rehashed".to_string())
            } else {
                Ok("ok".to_string())
            }
        }
        _ => Err("incorrect number of arguments".to_string()),
    }
}

fn display(e: Error) -> String {
    e.to_string()
}
