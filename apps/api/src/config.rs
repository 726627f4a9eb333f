use anyhow::{Context, Result};

/// Application configuration loaded from environment variables. Every
/// key has a workable default so the service starts on a fresh machine.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Threshold for the generate-all batch.
    pub min_materials_score: i64,
    /// Optional location boost fed into the scoring prompt.
    pub preferred_location: Option<String>,
    /// Optional path to a JSON file overriding the built-in filter rules.
    pub filter_rules_path: Option<String>,
    pub source_delay_ms: u64,
    pub score_delay_ms: u64,
    pub generate_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite://data/jobs.db"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "deepseek-r1:8b"),
            port: env_or("PORT", "3001")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            min_materials_score: env_or("MIN_MATERIALS_SCORE", "7")
                .parse::<i64>()
                .context("MIN_MATERIALS_SCORE must be an integer")?,
            preferred_location: std::env::var("PREFERRED_LOCATION").ok(),
            filter_rules_path: std::env::var("FILTER_RULES_PATH").ok(),
            source_delay_ms: env_or("SOURCE_DELAY_MS", "500")
                .parse::<u64>()
                .context("SOURCE_DELAY_MS must be an integer")?,
            score_delay_ms: env_or("SCORE_DELAY_MS", "500")
                .parse::<u64>()
                .context("SCORE_DELAY_MS must be an integer")?,
            generate_delay_ms: env_or("GENERATE_DELAY_MS", "1000")
                .parse::<u64>()
                .context("GENERATE_DELAY_MS must be an integer")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
