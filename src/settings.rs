//! Settings for the service. Values come from the defaults below, then an
//! optional `tripsplit.toml` next to the binary, then `TRIPSPLIT__*`
//! environment variables (`TRIPSPLIT__SERVER__PORT=9000`).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::exchange::SettlementStrategy;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settlement {
    pub strategy: SettlementStrategy,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub settlement: Settlement,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("tripsplit").required(false))
                .add_source(Environment::with_prefix("TRIPSPLIT").separator("__")),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("settlement.strategy", "net_balance")?
            .build()?
            .try_deserialize()
    }
}
