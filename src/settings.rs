use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::interpolation::IdwParams;

/// Settings for the HTTP service
///
/// Layered from built-in defaults, `imping-geo.toml`, `imping-geo.local.toml`
/// and `IMPING_*` environment variables (e.g. `IMPING_SERVER__PORT=8080`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    server: Server,
    interpolation: Interpolation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    host: String,
    port: u16,
}

impl Server {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interpolation {
    power: f64,
    max_neighbors: Option<usize>,
    max_distance_m: Option<f64>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(File::with_name("imping-geo").required(false))
            .add_source(File::with_name("imping-geo.local").required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Loads settings from an explicit file on top of the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(File::from(path.as_ref()).required(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("interpolation.power", 2.0)?)
    }

    fn environment() -> Environment {
        Environment::with_prefix("IMPING")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Address the HTTP service binds to, `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Default interpolation parameters, validated
    pub fn idw_params(&self) -> Result<IdwParams> {
        let params = IdwParams {
            power: self.interpolation.power,
            max_neighbors: self.interpolation.max_neighbors,
            max_distance_m: self.interpolation.max_distance_m,
        };
        params.validate()?;
        Ok(params)
    }
}
