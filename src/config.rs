use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::optimizer::{Policy, SolverSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            request_timeout_secs: 10,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub policy: Policy,
    pub step: f64,
    pub tolerance: f64,
    pub max_expansions: usize,
    pub decimals: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let settings = SolverSettings::default();
        Self {
            policy: Policy::default(),
            step: settings.step,
            tolerance: settings.tolerance,
            max_expansions: settings.max_expansions,
            decimals: settings.decimals,
        }
    }
}

impl SolverConfig {
    pub fn settings(&self) -> SolverSettings {
        SolverSettings {
            step: self.step,
            tolerance: self.tolerance,
            max_expansions: self.max_expansions,
            decimals: self.decimals,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,hyper=warn,tower_http=info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("PLANNER__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.solver.step.is_nan() || self.solver.step <= 0.0 {
            anyhow::bail!("solver.step must be positive, got {}", self.solver.step);
        }
        if self.solver.tolerance.is_nan() || self.solver.tolerance < 0.0 {
            anyhow::bail!(
                "solver.tolerance must not be negative, got {}",
                self.solver.tolerance
            );
        }
        if self.solver.max_expansions == 0 {
            anyhow::bail!("solver.max_expansions must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::from_figment(Figment::from(Serialized::defaults(Config::default())))
            .unwrap();
        assert_eq!(cfg.server.port, 8888);
        assert_eq!(cfg.solver.policy, Policy::Search);
        assert_eq!(cfg.solver.settings(), SolverSettings::default());
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            [server]
            port = 9000

            [solver]
            policy = "greedy"
            step = 1.0

            [logging]
            format = "pretty"
        "#;
        let cfg = Config::from_figment(
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml)),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.solver.policy, Policy::Greedy);
        assert_eq!(cfg.solver.step, 1.0);
        assert_eq!(cfg.solver.decimals, 2);
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
        assert_eq!(cfg.logging.filter, "info,hyper=warn,tower_http=info");
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let toml = "[solver]\nstep = 0.0\n";
        let result = Config::from_figment(
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml)),
        );
        assert!(result.is_err());
    }
}
