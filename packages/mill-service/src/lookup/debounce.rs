use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time};

use crate::{
	ReferenceSource,
	lookup::{self, LookupKind, LookupOption, ReferenceEntity},
};

#[derive(Debug, Clone)]
pub struct LookupSettings {
	pub debounce: Duration,
	pub page_size: u32,
}

/// What a selector renders: the merged option list, the raw query text,
/// and the fetch state of the search path. `error` reports the last
/// search failure and clears on the next successful publish.
#[derive(Debug, Clone, Default)]
pub struct LookupState {
	pub options: Vec<LookupOption>,
	pub is_loading: bool,
	pub search: String,
	pub error: Option<String>,
}

/// One live typeahead instance. Owns its own query/debounce state; nothing
/// is shared between instances. Keystrokes flow in through [`set_search`]
/// and only the last one in a debounce window reaches the store. Results
/// are cached per composite key, the previous option list stays visible
/// while a different key is in flight, and a fetch whose key has been
/// superseded is cached but never rendered.
///
/// [`set_search`]: ReferenceLookup::set_search
pub struct ReferenceLookup {
	query_tx: watch::Sender<String>,
	selected_tx: watch::Sender<Option<String>>,
	state_rx: watch::Receiver<LookupState>,
	worker: JoinHandle<()>,
}
impl ReferenceLookup {
	pub fn spawn(
		entity: ReferenceEntity,
		source: Arc<dyn ReferenceSource>,
		settings: LookupSettings,
	) -> Self {
		let (query_tx, query_rx) = watch::channel(String::new());
		let (selected_tx, selected_rx) = watch::channel(None);
		let (state_tx, state_rx) = watch::channel(LookupState::default());
		let worker = tokio::spawn(run(entity, source, settings, query_rx, selected_rx, state_tx));

		Self { query_tx, selected_tx, state_rx, worker }
	}

	pub fn set_search(&self, query: impl Into<String>) {
		self.query_tx.send_replace(query.into());
	}

	/// Externally-owned selection; may change at any time, `None` clears
	/// it and suppresses the resolve fetch entirely.
	pub fn set_selected(&self, id: Option<String>) {
		self.selected_tx.send_replace(id);
	}

	pub fn state(&self) -> LookupState {
		self.state_rx.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<LookupState> {
		self.state_rx.clone()
	}
}
impl Drop for ReferenceLookup {
	fn drop(&mut self) {
		self.worker.abort();
	}
}

struct Worker {
	entity: ReferenceEntity,
	source: Arc<dyn ReferenceSource>,
	settings: LookupSettings,
	query_rx: watch::Receiver<String>,
	selected_rx: watch::Receiver<Option<String>>,
	state_tx: watch::Sender<LookupState>,
	search_cache: HashMap<String, Vec<LookupOption>>,
	resolve_cache: HashMap<String, Option<LookupOption>>,
}

async fn run(
	entity: ReferenceEntity,
	source: Arc<dyn ReferenceSource>,
	settings: LookupSettings,
	query_rx: watch::Receiver<String>,
	selected_rx: watch::Receiver<Option<String>>,
	state_tx: watch::Sender<LookupState>,
) {
	let mut worker = Worker {
		entity,
		source,
		settings,
		query_rx,
		selected_rx,
		state_tx,
		search_cache: HashMap::new(),
		resolve_cache: HashMap::new(),
	};

	// Initial page for the empty query, like a selector opening on mount.
	worker.refresh(String::new()).await;

	let mut debounced = String::new();

	loop {
		let changed = tokio::select! {
			changed = worker.query_rx.changed() => {
				if changed.is_err() {
					return;
				}

				let settled = worker.debounce().await;
				let Some(settled) = settled else {
					return;
				};

				debounced = settled;

				true
			},
			changed = worker.selected_rx.changed() => changed.is_ok(),
		};

		if !changed {
			return;
		}

		worker.refresh(debounced.clone()).await;
	}
}

impl Worker {
	/// Trailing-edge debounce: every keystroke restarts the timer, so only
	/// the value that stays stable for the whole window survives.
	async fn debounce(&mut self) -> Option<String> {
		let mut pending = self.query_rx.borrow_and_update().clone();

		self.publish_search(&pending);

		loop {
			tokio::select! {
				() = time::sleep(self.settings.debounce) => return Some(pending),
				changed = self.query_rx.changed() => {
					changed.ok()?;

					pending = self.query_rx.borrow_and_update().clone();

					self.publish_search(&pending);
				},
			}
		}
	}

	async fn refresh(&mut self, debounced: String) {
		let raw_snapshot = self.query_rx.borrow().clone();
		let options = match self.search_options(&debounced).await {
			Ok(options) => options,
			Err(message) => {
				// Search failures surface; keep whatever was on screen.
				self.state_tx.send_modify(|state| {
					state.is_loading = false;
					state.error = Some(message);
				});

				return;
			},
		};

		// A fetch that lost the race to a newer query is cached above but
		// never rendered; the newer key's refresh is already queued.
		if *self.query_rx.borrow() != raw_snapshot {
			return;
		}

		let resolved = self.resolved_selection().await;
		let merged = lookup::merge_options(options, resolved);

		self.state_tx.send_modify(|state| {
			state.options = merged;
			state.is_loading = false;
			state.error = None;
		});
	}

	async fn search_options(&mut self, debounced: &str) -> Result<Vec<LookupOption>, String> {
		let key = lookup::lookup_cache_key(LookupKind::Search, self.entity, debounced)
			.map_err(|err| err.to_string())?;

		if let Some(cached) = self.search_cache.get(&key) {
			return Ok(cached.clone());
		}

		self.state_tx.send_modify(|state| {
			state.is_loading = true;
		});

		let fetched = self
			.source
			.search(self.entity, debounced.trim(), self.settings.page_size)
			.await
			.map_err(|err| err.to_string())?;

		self.search_cache.insert(key, fetched.clone());

		Ok(fetched)
	}

	/// Resolve misses and failures both render as "nothing selected"; the
	/// fetch is skipped entirely without a selection.
	async fn resolved_selection(&mut self) -> Option<LookupOption> {
		let selected = self.selected_rx.borrow_and_update().clone();
		let id = selected.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
		let key = lookup::lookup_cache_key(LookupKind::Resolve, self.entity, id).ok()?;

		if let Some(cached) = self.resolve_cache.get(&key) {
			return cached.clone();
		}

		let resolved = lookup::resolve_quietly(&*self.source, self.entity, id).await;

		self.resolve_cache.insert(key, resolved.clone());

		resolved
	}

	fn publish_search(&self, raw: &str) {
		self.state_tx.send_modify(|state| {
			state.search = raw.to_string();
		});
	}
}
