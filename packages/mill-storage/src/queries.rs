use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{Job, SalesOrder, ServiceOrder, ShopClient},
};

pub async fn insert_client(db: &Db, client: &ShopClient) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO clients (client_id, name, phone, email, address, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(client.client_id)
	.bind(client.name.as_str())
	.bind(client.phone.as_deref())
	.bind(client.email.as_deref())
	.bind(client.address.as_deref())
	.bind(client.created_at)
	.bind(client.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn list_clients(db: &Db) -> Result<Vec<ShopClient>> {
	let clients = sqlx::query_as(
		"\
SELECT client_id, name, phone, email, address, created_at, updated_at
FROM clients
ORDER BY name ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(clients)
}

pub async fn insert_job(db: &Db, job: &Job) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO jobs (job_id, job_number, name, client_id, created_at)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(job.job_id)
	.bind(job.job_number)
	.bind(job.name.as_str())
	.bind(job.client_id)
	.bind(job.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Allocates the next job number and inserts in one statement, so the
/// current maximum cannot go stale between read and write. Concurrent
/// writers can still observe the same maximum; the unique constraint on
/// `job_number` rejects the loser, which callers retry.
pub async fn insert_job_with_next_number(
	db: &Db,
	job_id: Uuid,
	name: &str,
	client_id: Option<Uuid>,
	created_at: time::OffsetDateTime,
) -> Result<Job> {
	let job = sqlx::query_as(
		"\
INSERT INTO jobs (job_id, job_number, name, client_id, created_at)
SELECT $1, coalesce(max(job_number), 100) + 1, $2, $3, $4
FROM jobs
RETURNING job_id, job_number, name, client_id, created_at",
	)
	.bind(job_id)
	.bind(name)
	.bind(client_id)
	.bind(created_at)
	.fetch_one(&db.pool)
	.await?;

	Ok(job)
}

pub async fn list_jobs(db: &Db) -> Result<Vec<Job>> {
	let jobs = sqlx::query_as(
		"\
SELECT job_id, job_number, name, client_id, created_at
FROM jobs
ORDER BY job_number DESC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(jobs)
}

pub async fn insert_sales_order(db: &Db, order: &SalesOrder) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO sales_orders (
	order_id,
	client_id,
	job_id,
	status,
	color_id,
	species_id,
	door_style_id,
	notes,
	promised_date,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(order.order_id)
	.bind(order.client_id)
	.bind(order.job_id)
	.bind(order.status.as_str())
	.bind(order.color_id)
	.bind(order.species_id)
	.bind(order.door_style_id)
	.bind(order.notes.as_deref())
	.bind(order.promised_date)
	.bind(order.created_at)
	.bind(order.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_sales_order(db: &Db, order_id: Uuid) -> Result<Option<SalesOrder>> {
	let order = sqlx::query_as(
		"\
SELECT order_id, client_id, job_id, status, color_id, species_id, door_style_id, notes,
	promised_date, created_at, updated_at
FROM sales_orders
WHERE order_id = $1",
	)
	.bind(order_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(order)
}

pub async fn update_sales_order_status(
	db: &Db,
	order_id: Uuid,
	status: &str,
	updated_at: time::OffsetDateTime,
) -> Result<u64> {
	let result = sqlx::query(
		"\
UPDATE sales_orders
SET status = $1, updated_at = $2
WHERE order_id = $3",
	)
	.bind(status)
	.bind(updated_at)
	.bind(order_id)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected())
}

pub async fn delete_sales_order(db: &Db, order_id: Uuid) -> Result<u64> {
	let result = sqlx::query("DELETE FROM sales_orders WHERE order_id = $1")
		.bind(order_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

pub async fn list_sales_orders(
	db: &Db,
	status: Option<&str>,
	client_id: Option<Uuid>,
) -> Result<Vec<SalesOrder>> {
	let mut builder = sqlx::QueryBuilder::new(
		"SELECT order_id, client_id, job_id, status, color_id, species_id, door_style_id, notes, \
		 promised_date, created_at, updated_at FROM sales_orders WHERE TRUE",
	);

	if let Some(status) = status {
		builder.push(" AND status = ");
		builder.push_bind(status);
	}
	if let Some(client_id) = client_id {
		builder.push(" AND client_id = ");
		builder.push_bind(client_id);
	}

	builder.push(" ORDER BY created_at DESC");

	let orders = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(orders)
}

pub async fn insert_service_order(db: &Db, order: &ServiceOrder) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO service_orders (
	service_order_id,
	client_id,
	sales_order_id,
	status,
	description,
	scheduled_for,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(order.service_order_id)
	.bind(order.client_id)
	.bind(order.sales_order_id)
	.bind(order.status.as_str())
	.bind(order.description.as_str())
	.bind(order.scheduled_for)
	.bind(order.created_at)
	.bind(order.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_service_order(db: &Db, service_order_id: Uuid) -> Result<Option<ServiceOrder>> {
	let order = sqlx::query_as(
		"\
SELECT service_order_id, client_id, sales_order_id, status, description, scheduled_for,
	created_at, updated_at
FROM service_orders
WHERE service_order_id = $1",
	)
	.bind(service_order_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(order)
}

pub async fn update_service_order_status(
	db: &Db,
	service_order_id: Uuid,
	status: &str,
	updated_at: time::OffsetDateTime,
) -> Result<u64> {
	let result = sqlx::query(
		"\
UPDATE service_orders
SET status = $1, updated_at = $2
WHERE service_order_id = $3",
	)
	.bind(status)
	.bind(updated_at)
	.bind(service_order_id)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected())
}

pub async fn list_service_orders(
	db: &Db,
	status: Option<&str>,
	client_id: Option<Uuid>,
) -> Result<Vec<ServiceOrder>> {
	let mut builder = sqlx::QueryBuilder::new(
		"SELECT service_order_id, client_id, sales_order_id, status, description, scheduled_for, \
		 created_at, updated_at FROM service_orders WHERE TRUE",
	);

	if let Some(status) = status {
		builder.push(" AND status = ");
		builder.push_bind(status);
	}
	if let Some(client_id) = client_id {
		builder.push(" AND client_id = ");
		builder.push_bind(client_id);
	}

	builder.push(" ORDER BY created_at DESC");

	let orders = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(orders)
}
