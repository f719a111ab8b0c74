//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `CONTRACTX_`-prefixed environment variables. Nested keys use a
//! double underscore, e.g. `CONTRACTX_SYSTEM_SIGNER__SIGNED_BY`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::logging_facility::Profile;
use serde::Deserialize;

use crate::Result;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "contractx.toml";

/// Identity written into signed-by fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignerIdentity {
    pub signed_by: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub blob_root: PathBuf,
    /// Base for absolute pagination links
    pub base_url: String,
    pub reminder_interval_days: u32,
    pub reminder_page_size: usize,
    pub log_profile: Profile,
    /// Signs notification amendments, which are approved on creation
    pub system_signer: SignerIdentity,
    /// Signs contracts approved manually by the agency
    pub manual_approval_signer: SignerIdentity,
}

fn configuration_error(err: ConfigError) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("load_config")
        .with_message(err.to_string())
}

impl ServiceConfig {
    /// Load from defaults, `path` (or `contractx.toml` if present) and the environment
    ///
    /// # Errors
    /// `ERR_CONFIGURATION` when a source cannot be read or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Self::defaults()
            .map_err(configuration_error)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("CONTRACTX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(configuration_error)?;

        let config: Self = settings.try_deserialize().map_err(configuration_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults only, ignoring files and the environment
    pub fn from_defaults() -> Result<Self> {
        let config: Self = Self::defaults()
            .and_then(|builder| builder.build())
            .and_then(|settings| settings.try_deserialize())
            .map_err(configuration_error)?;
        Ok(config)
    }

    fn defaults() -> std::result::Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database_path", ".contractx/contracts.db")?
            .set_default("blob_root", ".contractx/blobs")?
            .set_default("base_url", "http://localhost:5000")?
            .set_default("reminder_interval_days", 14)?
            .set_default("reminder_page_size", 20)?
            .set_default("log_profile", "development")?
            .set_default("system_signer.signed_by", "hand and approval system")?
            .set_default("system_signer.display_name", "ContractX system")?
            .set_default("manual_approval_signer.signed_by", "manually approved")?
            .set_default("manual_approval_signer.display_name", "Agency approver")
    }

    fn validate(&self) -> Result<()> {
        let problem = if self.reminder_page_size == 0 {
            Some("reminder_page_size must be at least 1")
        } else if self.base_url.trim().is_empty() {
            Some("base_url must not be empty")
        } else if self.system_signer.signed_by.trim().is_empty()
            || self.manual_approval_signer.signed_by.trim().is_empty()
        {
            Some("signer identities need a signed_by value")
        } else {
            None
        };

        match problem {
            Some(message) => Err(ExError::new(ExErrorKind::Configuration)
                .with_op("validate_config")
                .with_message(message)),
            None => Ok(()),
        }
    }
}
