// src/config.rs
use std::env;

use anyhow::{Context, Result, bail};

pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Model tiers tried in order until one succeeds.
pub const DEFAULT_MODEL_TIERS: &[&str] = &["sonar-pro", "sonar"];

/// Persona used when the caller supplies no system prompt of its own.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Sahayak AI, a helpful teaching assistant for Indian classrooms serving students from Grade 1-12. Provide educational content that is culturally relevant and suitable for students. Adjust complexity based on grade level - simple for primary (1-5), moderate for middle school (6-8), and advanced for high school (9-12). **Format your responses using Markdown for clear readability (e.g., bold, lists, headings).** Include preparation for board exams (CBSE/State boards) and competitive exams (JEE/NEET) for higher grades.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_tiers: Vec<String>,
    pub bind_addr: String,
}

impl AppConfig {
    /// Reads configuration from the environment. The API key is required;
    /// everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("PERPLEXITY_API_KEY")
            .context("PERPLEXITY_API_KEY is not set (put it in the environment or a .env file)")?;

        let base_url =
            env::var("PERPLEXITY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let model_tiers = match env::var("MODEL_TIERS") {
            Ok(raw) => parse_model_tiers(&raw)?,
            Err(_) => DEFAULT_MODEL_TIERS.iter().map(|m| m.to_string()).collect(),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            api_key,
            base_url,
            model_tiers,
            bind_addr,
        })
    }
}

/// Parses a comma-separated model list, e.g. "sonar-pro, sonar".
fn parse_model_tiers(raw: &str) -> Result<Vec<String>> {
    let tiers: Vec<String> = raw
        .split(',')
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if tiers.is_empty() {
        bail!("MODEL_TIERS is set but contains no model names");
    }
    Ok(tiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_tiers() {
        let tiers = parse_model_tiers("sonar-pro, sonar").unwrap();
        assert_eq!(tiers, vec!["sonar-pro", "sonar"]);
    }

    #[test]
    fn single_tier_is_valid() {
        let tiers = parse_model_tiers("sonar-pro").unwrap();
        assert_eq!(tiers, vec!["sonar-pro"]);
    }

    #[test]
    fn blank_tier_list_is_rejected() {
        assert!(parse_model_tiers(" , ,").is_err());
        assert!(parse_model_tiers("").is_err());
    }
}
