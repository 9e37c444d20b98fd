use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub lookup: Lookup,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Knobs for the reference typeahead. Defaults match the shipped UI: a
/// 300ms trailing-edge debounce, 20-row pages, and a shorter 10-row page
/// for jobs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Lookup {
	pub debounce_ms: u64,
	pub page_size: u32,
	pub job_page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}

impl Default for Lookup {
	fn default() -> Self {
		Self { debounce_ms: 300, page_size: 20, job_page_size: 10 }
	}
}

impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}
