use time::{Date, OffsetDateTime};
use uuid::Uuid;

use mill_domain::{Permissions, ServiceOrderStatus, Session};
use mill_storage::{models::ServiceOrder, queries};

use crate::{MillService, ServiceError, ServiceResult, require};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceOrderInput {
	pub client_id: Uuid,
	pub sales_order_id: Option<Uuid>,
	pub description: String,
	#[serde(default, with = "crate::time_serde::date_option")]
	pub scheduled_for: Option<Date>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceOrderStatusUpdate {
	pub service_order_id: Uuid,
	pub status: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceOrderItem {
	pub service_order_id: Uuid,
	pub client_id: Uuid,
	pub sales_order_id: Option<Uuid>,
	pub status: String,
	pub description: String,
	#[serde(with = "crate::time_serde::date_option")]
	pub scheduled_for: Option<Date>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ServiceOrderListRequest {
	pub status: Option<String>,
	pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceOrderListResponse {
	pub items: Vec<ServiceOrderItem>,
}

impl MillService {
	pub async fn create_service_order(
		&self,
		session: &Session,
		input: ServiceOrderInput,
	) -> ServiceResult<ServiceOrderItem> {
		require(Permissions::derive(session).can_edit_service, "edit service orders")?;

		if input.description.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Service order description must be non-empty.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let order = ServiceOrder {
			service_order_id: Uuid::new_v4(),
			client_id: input.client_id,
			sales_order_id: input.sales_order_id,
			status: ServiceOrderStatus::Open.as_str().to_string(),
			description: input.description,
			scheduled_for: input.scheduled_for,
			created_at: now,
			updated_at: now,
		};
		let db = self.db()?;

		queries::insert_service_order(&db, &order).await?;
		tracing::info!(service_order_id = %order.service_order_id, "Service order created.");

		Ok(item(order))
	}

	pub async fn update_service_order_status(
		&self,
		session: &Session,
		update: ServiceOrderStatusUpdate,
	) -> ServiceResult<ServiceOrderItem> {
		require(Permissions::derive(session).can_edit_service, "edit service orders")?;

		let status: ServiceOrderStatus =
			update.status.parse().map_err(|_| ServiceError::InvalidRequest {
				message: format!("Unknown service order status {:?}.", update.status),
			})?;
		let db = self.db()?;
		let now = OffsetDateTime::now_utc();
		let affected =
			queries::update_service_order_status(&db, update.service_order_id, status.as_str(), now)
				.await?;

		if affected == 0 {
			return Err(ServiceError::NotFound {
				message: format!("Service order {} does not exist.", update.service_order_id),
			});
		}

		let order =
			queries::fetch_service_order(&db, update.service_order_id).await?.ok_or_else(|| {
				ServiceError::NotFound {
					message: format!("Service order {} does not exist.", update.service_order_id),
				}
			})?;

		Ok(item(order))
	}

	pub async fn get_service_order(
		&self,
		_session: &Session,
		service_order_id: Uuid,
	) -> ServiceResult<ServiceOrderItem> {
		let db = self.db()?;
		let order = queries::fetch_service_order(&db, service_order_id).await?.ok_or_else(|| {
			ServiceError::NotFound {
				message: format!("Service order {service_order_id} does not exist."),
			}
		})?;

		Ok(item(order))
	}

	pub async fn list_service_orders(
		&self,
		_session: &Session,
		req: ServiceOrderListRequest,
	) -> ServiceResult<ServiceOrderListResponse> {
		if let Some(status) = req.status.as_deref() {
			status.parse::<ServiceOrderStatus>().map_err(|_| ServiceError::InvalidRequest {
				message: format!("Unknown service order status {status:?}."),
			})?;
		}

		let db = self.db()?;
		let orders = queries::list_service_orders(&db, req.status.as_deref(), req.client_id).await?;

		Ok(ServiceOrderListResponse { items: orders.into_iter().map(item).collect() })
	}
}

fn item(order: ServiceOrder) -> ServiceOrderItem {
	ServiceOrderItem {
		service_order_id: order.service_order_id,
		client_id: order.client_id,
		sales_order_id: order.sales_order_id,
		status: order.status,
		description: order.description,
		scheduled_for: order.scheduled_for,
		created_at: order.created_at,
		updated_at: order.updated_at,
	}
}
