pub mod clients;
pub mod jobs;
pub mod lookup;
pub mod orders;
pub mod service_orders;
pub mod time_serde;

use std::{future::Future, pin::Pin, sync::Arc};

pub use clients::{ClientInput, ClientItem, ClientListResponse};
pub use jobs::{JobInput, JobItem, JobListResponse};
pub use lookup::{
	LookupKind, LookupSettings, LookupState, ReferenceLookup, ReferenceSearchRequest,
	ReferenceSearchResponse,
};
pub use orders::{
	SalesOrderInput, SalesOrderItem, SalesOrderListRequest, SalesOrderListResponse,
	SalesOrderStatusUpdate,
};
pub use service_orders::{
	ServiceOrderInput, ServiceOrderItem, ServiceOrderListRequest, ServiceOrderListResponse,
	ServiceOrderStatusUpdate,
};

use mill_config::Config;
use mill_storage::{
	db::Db,
	gateway::ClientGateway,
	reference::{self, LookupOption, ReferenceEntity},
};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	PermissionDenied { message: String },
	NotFound { message: String },
	ClientUnavailable { phase: &'static str },
	Storage { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::PermissionDenied { message } => write!(f, "Permission denied: {message}"),
			Self::NotFound { message } => write!(f, "Not found: {message}"),
			Self::ClientUnavailable { phase } => {
				write!(f, "Data client is not ready (phase: {phase}).")
			},
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<mill_storage::Error> for ServiceError {
	fn from(err: mill_storage::Error) -> Self {
		match err {
			mill_storage::Error::NotReady { phase } => Self::ClientUnavailable { phase },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

/// Seam between the lookup engine and whatever serves reference rows.
/// Production goes through the gateway-backed store; tests substitute an
/// in-memory source.
pub trait ReferenceSource
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		entity: ReferenceEntity,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, ServiceResult<Vec<LookupOption>>>;

	fn resolve<'a>(
		&'a self,
		entity: ReferenceEntity,
		id: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<LookupOption>>>;
}

struct GatewaySource {
	gateway: Arc<ClientGateway>,
}

impl ReferenceSource for GatewaySource {
	fn search<'a>(
		&'a self,
		entity: ReferenceEntity,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, ServiceResult<Vec<LookupOption>>> {
		Box::pin(async move {
			let db = self.gateway.ready()?;
			let options = reference::search_page(&db, entity, query, limit).await?;

			Ok(options)
		})
	}

	fn resolve<'a>(
		&'a self,
		entity: ReferenceEntity,
		id: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<LookupOption>>> {
		Box::pin(async move {
			let db = self.gateway.ready()?;
			let option = reference::resolve_by_id(&db, entity, id).await?;

			Ok(option)
		})
	}
}

pub struct MillService {
	pub cfg: Config,
	pub gateway: Arc<ClientGateway>,
	pub source: Arc<dyn ReferenceSource>,
}
impl MillService {
	pub fn new(cfg: Config) -> Self {
		let gateway = Arc::new(ClientGateway::new());
		let source = Arc::new(GatewaySource { gateway: gateway.clone() });

		Self { cfg, gateway, source }
	}

	pub fn with_source(cfg: Config, gateway: Arc<ClientGateway>, source: Arc<dyn ReferenceSource>) -> Self {
		Self { cfg, gateway, source }
	}

	/// Brings the data client to Ready. Must complete before any operation
	/// can touch the store; until then every call reports ClientUnavailable.
	pub async fn initialize(&self) -> ServiceResult<()> {
		self.gateway.initialize(&self.cfg.storage.postgres).await?;

		Ok(())
	}

	pub(crate) fn db(&self) -> ServiceResult<Arc<Db>> {
		Ok(self.gateway.ready()?)
	}
}

pub(crate) fn require(allowed: bool, action: &str) -> ServiceResult<()> {
	if allowed {
		Ok(())
	} else {
		Err(ServiceError::PermissionDenied { message: format!("Role may not {action}.") })
	}
}
