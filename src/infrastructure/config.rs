use serde::Deserialize;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "SENSE";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactSettings {
    /// Directory holding the CSV artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_title")]
    pub title: String,
    /// Rows shown in the RFM table preview
    #[serde(default = "default_table_preview_rows")]
    pub table_preview_rows: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            table_preview_rows: default_table_preview_rows(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Output")
}

fn default_title() -> String {
    "Sense — RFM, Clusters, Tendência & Testes de Hipótese".to_string()
}

fn default_table_preview_rows() -> usize {
    50
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_dashboard_config_from(CONFIG_FILE)
}

/// Load settings from an optional config file (any extension the `config`
/// crate understands) overlaid with `SENSE__SECTION__KEY` environment variables.
pub fn load_dashboard_config_from(name: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
