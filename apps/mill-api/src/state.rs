use std::sync::Arc;

use mill_service::MillService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MillService>,
}
impl AppState {
	pub async fn new(config: mill_config::Config) -> color_eyre::Result<Self> {
		let service = MillService::new(config);

		service.initialize().await?;

		Ok(Self { service: Arc::new(service) })
	}

	/// State over a service whose data client has not been brought up yet;
	/// every data operation reports ClientUnavailable until it is.
	pub fn uninitialized(config: mill_config::Config) -> Self {
		Self { service: Arc::new(MillService::new(config)) }
	}
}
