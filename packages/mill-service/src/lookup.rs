mod debounce;

pub use debounce::{LookupSettings, LookupState, ReferenceLookup};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{MillService, ServiceError, ServiceResult};
pub use mill_storage::reference::{LookupOption, ReferenceEntity};

const LOOKUP_CACHE_SCHEMA_VERSION: i32 = 1;

/// The two fetch paths a lookup instance issues. Part of the cache key so
/// a search for "12" and a resolve of id "12" never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
	Search,
	Resolve,
}
impl LookupKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Search => "search",
			Self::Resolve => "resolve",
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSearchRequest {
	pub entity: ReferenceEntity,
	#[serde(default)]
	pub query: String,
	pub selected_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSearchResponse {
	pub options: Vec<LookupOption>,
}

pub fn lookup_cache_key(
	kind: LookupKind,
	entity: ReferenceEntity,
	key: &str,
) -> ServiceResult<String> {
	let payload = serde_json::json!({
		"kind": kind.as_str(),
		"schema_version": LOOKUP_CACHE_SCHEMA_VERSION,
		"entity": entity.as_str(),
		"key": key.trim(),
	});
	let raw = serde_json::to_vec(&payload).map_err(|err| ServiceError::Storage {
		message: format!("Failed to encode cache key payload: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

/// Prepends the resolved selection iff no search result already carries
/// its value, so the caller's saved choice stays selectable without ever
/// duplicating a row.
pub fn merge_options(
	mut results: Vec<LookupOption>,
	resolved: Option<LookupOption>,
) -> Vec<LookupOption> {
	if let Some(selected) = resolved
		&& !results.iter().any(|option| option.value == selected.value)
	{
		results.insert(0, selected);
	}

	results
}

pub fn page_size(lookup: &mill_config::Lookup, entity: ReferenceEntity) -> u32 {
	match entity {
		ReferenceEntity::Job => lookup.job_page_size,
		_ => lookup.page_size,
	}
}

impl MillService {
	/// One-shot merged option list: search page plus resolved selection.
	/// Search failures surface; a resolve miss or failure renders as no
	/// selection.
	pub async fn reference_options(
		&self,
		req: ReferenceSearchRequest,
	) -> ServiceResult<ReferenceSearchResponse> {
		let limit = page_size(&self.cfg.lookup, req.entity);
		let results = self.source.search(req.entity, req.query.trim(), limit).await?;
		let resolved = match req.selected_id.as_deref().map(str::trim) {
			None | Some("") => None,
			Some(id) => resolve_quietly(&*self.source, req.entity, id).await,
		};

		Ok(ReferenceSearchResponse { options: merge_options(results, resolved) })
	}

	/// A live lookup instance for interactive callers: debounced search,
	/// cached fetches, previous options retained while a new key is in
	/// flight.
	pub fn reference_lookup(&self, entity: ReferenceEntity) -> ReferenceLookup {
		let settings = LookupSettings {
			debounce: Duration::from_millis(self.cfg.lookup.debounce_ms),
			page_size: page_size(&self.cfg.lookup, entity),
		};

		ReferenceLookup::spawn(entity, self.source.clone(), settings)
	}
}

pub(crate) async fn resolve_quietly(
	source: &dyn crate::ReferenceSource,
	entity: ReferenceEntity,
	id: &str,
) -> Option<LookupOption> {
	match source.resolve(entity, id).await {
		Ok(option) => option,
		Err(err) => {
			tracing::warn!(entity = entity.as_str(), %err, "Reference resolve failed; rendering no selection.");

			None
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn option(value: &str, label: &str) -> LookupOption {
		LookupOption { value: value.to_string(), label: label.to_string() }
	}

	#[test]
	fn merge_prepends_missing_selection() {
		let results = vec![option("1", "Alder"), option("2", "Birch")];
		let merged = merge_options(results, Some(option("9", "Walnut")));

		assert_eq!(merged.len(), 3);
		assert_eq!(merged[0].value, "9");
		assert_eq!(merged[1].value, "1");
	}

	#[test]
	fn merge_skips_selection_already_in_page() {
		let results = vec![option("1", "Alder"), option("2", "Birch")];
		let merged = merge_options(results.clone(), Some(option("2", "Birch")));

		assert_eq!(merged, results);
	}

	#[test]
	fn merge_without_selection_is_identity() {
		let results = vec![option("1", "Alder")];

		assert_eq!(merge_options(results.clone(), None), results);
	}

	#[test]
	fn merge_is_idempotent() {
		let results = vec![option("1", "Alder")];
		let once = merge_options(results, Some(option("9", "Walnut")));
		let twice = merge_options(once.clone(), Some(option("9", "Walnut")));

		assert_eq!(once, twice);
	}

	#[test]
	fn cache_keys_separate_kind_entity_and_key() {
		let a = lookup_cache_key(LookupKind::Search, ReferenceEntity::Color, "oak").unwrap();
		let b = lookup_cache_key(LookupKind::Resolve, ReferenceEntity::Color, "oak").unwrap();
		let c = lookup_cache_key(LookupKind::Search, ReferenceEntity::Species, "oak").unwrap();
		let d = lookup_cache_key(LookupKind::Search, ReferenceEntity::Color, "ash").unwrap();

		assert_ne!(a, b);
		assert_ne!(a, c);
		assert_ne!(a, d);
	}

	#[test]
	fn cache_keys_are_stable_for_identical_parameters() {
		let a = lookup_cache_key(LookupKind::Search, ReferenceEntity::Job, " 205 ").unwrap();
		let b = lookup_cache_key(LookupKind::Search, ReferenceEntity::Job, "205").unwrap();

		assert_eq!(a, b);
	}

	#[test]
	fn job_page_is_smaller() {
		let lookup = mill_config::Lookup::default();

		assert_eq!(page_size(&lookup, ReferenceEntity::Job), 10);
		assert_eq!(page_size(&lookup, ReferenceEntity::Color), 20);
	}
}
