//! Runner Configuration
//!
//! Environment first (`.env` is loaded by `main`), command-line arguments on top.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use subscription_pricing::PricingConfig;

/// How responses are written to stdout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Summary,
}

impl OutputFormat {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "summary" | "text" => Ok(Self::Summary),
            other => bail!("unknown output format '{other}' (expected json or summary)"),
        }
    }
}

/// Resolved runner settings
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    /// Cart JSON file; stdin when absent
    pub cart_path: Option<PathBuf>,

    pub output: OutputFormat,

    /// Pins "today" for reproducible runs
    pub today: Option<DateTime<Utc>>,

    pub pricing: PricingConfig,
}

impl CliConfig {
    pub fn from_env_and_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        Self::from_sources(args, |key| std::env::var(key).ok())
    }

    fn from_sources(
        args: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = Self {
            cart_path: lookup("PRICING_CART_PATH").map(PathBuf::from),
            output: lookup("PRICING_OUTPUT")
                .map(|v| OutputFormat::parse(&v))
                .transpose()?
                .unwrap_or_default(),
            today: lookup("PRICING_TODAY")
                .map(|v| parse_instant(&v))
                .transpose()?,
            pricing: PricingConfig::default(),
        };
        if let Some(horizon) = lookup("PRICING_HORIZON") {
            config.pricing.horizon = parse_horizon(&horizon)?;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--summary" => config.output = OutputFormat::Summary,
                "--json" => config.output = OutputFormat::Json,
                "--today" => {
                    let value = args.next().context("--today needs an RFC 3339 timestamp")?;
                    config.today = Some(parse_instant(&value)?);
                }
                "--horizon" => {
                    let value = args.next().context("--horizon needs a period count")?;
                    config.pricing.horizon = parse_horizon(&value)?;
                }
                flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
                path => config.cart_path = Some(PathBuf::from(path)),
            }
        }

        Ok(config)
    }
}

fn parse_instant(value: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("'{value}' is not an RFC 3339 timestamp"))
}

fn parse_horizon(value: &str) -> anyhow::Result<u32> {
    value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a period count"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_sources(Vec::new(), |_| None).unwrap();
        assert_eq!(config.cart_path, None);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.today, None);
        assert_eq!(config.pricing.horizon, 12);
    }

    #[test]
    fn test_environment() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PRICING_CART_PATH", "cart.json"),
            ("PRICING_OUTPUT", "summary"),
            ("PRICING_TODAY", "2026-10-16T15:30:00Z"),
            ("PRICING_HORIZON", "6"),
        ]);
        let config =
            CliConfig::from_sources(Vec::new(), |key| env.get(key).map(|v| (*v).to_string()))
                .unwrap();

        assert_eq!(config.cart_path, Some(PathBuf::from("cart.json")));
        assert_eq!(config.output, OutputFormat::Summary);
        assert_eq!(config.today.unwrap().to_rfc3339(), "2026-10-16T15:30:00+00:00");
        assert_eq!(config.pricing.horizon, 6);
    }

    #[test]
    fn test_arguments_override_environment() {
        let config = CliConfig::from_sources(
            args(&["--json", "--horizon", "3", "other.json"]),
            |key| (key == "PRICING_OUTPUT").then(|| "summary".to_string()),
        )
        .unwrap();

        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.pricing.horizon, 3);
        assert_eq!(config.cart_path, Some(PathBuf::from("other.json")));
    }

    #[test]
    fn test_bad_input() {
        assert!(CliConfig::from_sources(args(&["--verbose"]), |_| None).is_err());
        assert!(CliConfig::from_sources(args(&["--today"]), |_| None).is_err());
        assert!(CliConfig::from_sources(args(&["--today", "yesterday"]), |_| None).is_err());
        assert!(
            CliConfig::from_sources(Vec::new(), |_| Some("xml".to_string())).is_err()
        );
    }
}
