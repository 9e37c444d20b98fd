mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Lookup, Postgres, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.lookup.debounce_ms == 0 {
		return Err(Error::Validation {
			message: "lookup.debounce_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.lookup.page_size == 0 {
		return Err(Error::Validation {
			message: "lookup.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.lookup.job_page_size == 0 {
		return Err(Error::Validation {
			message: "lookup.job_page_size must be greater than zero.".to_string(),
		});
	}

	Ok(())
}
