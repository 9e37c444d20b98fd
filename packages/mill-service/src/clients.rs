use time::OffsetDateTime;
use uuid::Uuid;

use mill_domain::{Permissions, Session};
use mill_storage::{models::ShopClient, queries};

use crate::{MillService, ServiceError, ServiceResult, require};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClientInput {
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub address: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClientItem {
	pub client_id: Uuid,
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub address: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClientListResponse {
	pub items: Vec<ClientItem>,
}

impl MillService {
	pub async fn create_client(
		&self,
		session: &Session,
		input: ClientInput,
	) -> ServiceResult<ClientItem> {
		require(Permissions::derive(session).can_edit_clients, "edit clients")?;

		if input.name.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Client name must be non-empty.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let client = ShopClient {
			client_id: Uuid::new_v4(),
			name: input.name,
			phone: input.phone,
			email: input.email,
			address: input.address,
			created_at: now,
			updated_at: now,
		};
		let db = self.db()?;

		queries::insert_client(&db, &client).await?;
		tracing::info!(client_id = %client.client_id, "Client created.");

		Ok(item(client))
	}

	pub async fn list_clients(&self, _session: &Session) -> ServiceResult<ClientListResponse> {
		let db = self.db()?;
		let clients = queries::list_clients(&db).await?;

		Ok(ClientListResponse { items: clients.into_iter().map(item).collect() })
	}
}

fn item(client: ShopClient) -> ClientItem {
	ClientItem {
		client_id: client.client_id,
		name: client.name,
		phone: client.phone,
		email: client.email,
		address: client.address,
		created_at: client.created_at,
		updated_at: client.updated_at,
	}
}
