use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopClient {
	pub client_id: Uuid,
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub address: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Job {
	pub job_id: Uuid,
	pub job_number: i64,
	pub name: String,
	pub client_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SalesOrder {
	pub order_id: Uuid,
	pub client_id: Uuid,
	pub job_id: Option<Uuid>,
	pub status: String,
	pub color_id: Option<Uuid>,
	pub species_id: Option<Uuid>,
	pub door_style_id: Option<Uuid>,
	pub notes: Option<String>,
	pub promised_date: Option<Date>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceOrder {
	pub service_order_id: Uuid,
	pub client_id: Uuid,
	pub sales_order_id: Option<Uuid>,
	pub status: String,
	pub description: String,
	pub scheduled_for: Option<Date>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
