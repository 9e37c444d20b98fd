use time::{Date, OffsetDateTime};
use uuid::Uuid;

use mill_domain::{Permissions, SalesOrderStatus, Session};
use mill_storage::{models::SalesOrder, queries};

use crate::{MillService, ServiceError, ServiceResult, require};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SalesOrderInput {
	pub client_id: Uuid,
	pub job_id: Option<Uuid>,
	pub color_id: Option<Uuid>,
	pub species_id: Option<Uuid>,
	pub door_style_id: Option<Uuid>,
	pub notes: Option<String>,
	#[serde(default, with = "crate::time_serde::date_option")]
	pub promised_date: Option<Date>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SalesOrderStatusUpdate {
	pub order_id: Uuid,
	pub status: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SalesOrderItem {
	pub order_id: Uuid,
	pub client_id: Uuid,
	pub job_id: Option<Uuid>,
	pub status: String,
	pub color_id: Option<Uuid>,
	pub species_id: Option<Uuid>,
	pub door_style_id: Option<Uuid>,
	pub notes: Option<String>,
	#[serde(with = "crate::time_serde::date_option")]
	pub promised_date: Option<Date>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SalesOrderListRequest {
	pub status: Option<String>,
	pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SalesOrderListResponse {
	pub items: Vec<SalesOrderItem>,
}

impl MillService {
	pub async fn create_sales_order(
		&self,
		session: &Session,
		input: SalesOrderInput,
	) -> ServiceResult<SalesOrderItem> {
		require(Permissions::derive(session).can_edit_sales, "edit sales orders")?;

		let now = OffsetDateTime::now_utc();
		let order = SalesOrder {
			order_id: Uuid::new_v4(),
			client_id: input.client_id,
			job_id: input.job_id,
			status: SalesOrderStatus::Pending.as_str().to_string(),
			color_id: input.color_id,
			species_id: input.species_id,
			door_style_id: input.door_style_id,
			notes: input.notes,
			promised_date: input.promised_date,
			created_at: now,
			updated_at: now,
		};
		let db = self.db()?;

		queries::insert_sales_order(&db, &order).await?;
		tracing::info!(order_id = %order.order_id, "Sales order created.");

		Ok(item(order))
	}

	pub async fn update_sales_order_status(
		&self,
		session: &Session,
		update: SalesOrderStatusUpdate,
	) -> ServiceResult<SalesOrderItem> {
		require(Permissions::derive(session).can_edit_sales, "edit sales orders")?;

		let status: SalesOrderStatus =
			update.status.parse().map_err(|_| ServiceError::InvalidRequest {
				message: format!("Unknown sales order status {:?}.", update.status),
			})?;
		let db = self.db()?;
		let now = OffsetDateTime::now_utc();
		let affected =
			queries::update_sales_order_status(&db, update.order_id, status.as_str(), now).await?;

		if affected == 0 {
			return Err(ServiceError::NotFound {
				message: format!("Sales order {} does not exist.", update.order_id),
			});
		}

		let order = queries::fetch_sales_order(&db, update.order_id).await?.ok_or_else(|| {
			ServiceError::NotFound {
				message: format!("Sales order {} does not exist.", update.order_id),
			}
		})?;

		Ok(item(order))
	}

	pub async fn get_sales_order(
		&self,
		_session: &Session,
		order_id: Uuid,
	) -> ServiceResult<SalesOrderItem> {
		let db = self.db()?;
		let order = queries::fetch_sales_order(&db, order_id).await?.ok_or_else(|| {
			ServiceError::NotFound { message: format!("Sales order {order_id} does not exist.") }
		})?;

		Ok(item(order))
	}

	pub async fn list_sales_orders(
		&self,
		_session: &Session,
		req: SalesOrderListRequest,
	) -> ServiceResult<SalesOrderListResponse> {
		if let Some(status) = req.status.as_deref() {
			status.parse::<SalesOrderStatus>().map_err(|_| ServiceError::InvalidRequest {
				message: format!("Unknown sales order status {status:?}."),
			})?;
		}

		let db = self.db()?;
		let orders = queries::list_sales_orders(&db, req.status.as_deref(), req.client_id).await?;

		Ok(SalesOrderListResponse { items: orders.into_iter().map(item).collect() })
	}

	pub async fn delete_sales_order(
		&self,
		session: &Session,
		order_id: Uuid,
	) -> ServiceResult<()> {
		require(Permissions::derive(session).can_delete, "delete records")?;

		let db = self.db()?;
		let affected = queries::delete_sales_order(&db, order_id).await?;

		if affected == 0 {
			return Err(ServiceError::NotFound {
				message: format!("Sales order {order_id} does not exist."),
			});
		}

		tracing::info!(%order_id, "Sales order deleted.");

		Ok(())
	}
}

fn item(order: SalesOrder) -> SalesOrderItem {
	SalesOrderItem {
		order_id: order.order_id,
		client_id: order.client_id,
		job_id: order.job_id,
		status: order.status,
		color_id: order.color_id,
		species_id: order.species_id,
		door_style_id: order.door_style_id,
		notes: order.notes,
		promised_date: order.promised_date,
		created_at: order.created_at,
		updated_at: order.updated_at,
	}
}
