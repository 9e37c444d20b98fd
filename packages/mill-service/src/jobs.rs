use time::OffsetDateTime;
use uuid::Uuid;

use mill_domain::{Permissions, Session};
use mill_storage::{models::Job, queries};

use crate::{MillService, ServiceError, ServiceResult, require};

const JOB_NUMBER_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JobInput {
	pub name: String,
	pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JobItem {
	pub job_id: Uuid,
	pub job_number: i64,
	pub name: String,
	pub client_id: Option<Uuid>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JobListResponse {
	pub items: Vec<JobItem>,
}

impl MillService {
	/// Job numbers are allocated monotonically; newest jobs sort first
	/// everywhere they are listed. Allocation happens inside the insert;
	/// a concurrent writer that grabs the same number trips the unique
	/// constraint and the insert is retried with a fresh number.
	pub async fn create_job(&self, session: &Session, input: JobInput) -> ServiceResult<JobItem> {
		require(Permissions::derive(session).can_edit_jobs, "edit jobs")?;

		if input.name.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Job name must be non-empty.".to_string(),
			});
		}

		let db = self.db()?;

		for _ in 0..JOB_NUMBER_ATTEMPTS {
			match queries::insert_job_with_next_number(
				&db,
				Uuid::new_v4(),
				&input.name,
				input.client_id,
				OffsetDateTime::now_utc(),
			)
			.await
			{
				Ok(job) => {
					tracing::info!(job_number = job.job_number, "Job created.");

					return Ok(item(job));
				},
				Err(err) if err.is_unique_violation() => continue,
				Err(err) => return Err(err.into()),
			}
		}

		Err(ServiceError::Storage {
			message: "Job number allocation kept colliding; giving up.".to_string(),
		})
	}

	pub async fn list_jobs(&self, _session: &Session) -> ServiceResult<JobListResponse> {
		let db = self.db()?;
		let jobs = queries::list_jobs(&db).await?;

		Ok(JobListResponse { items: jobs.into_iter().map(item).collect() })
	}
}

fn item(job: Job) -> JobItem {
	JobItem {
		job_id: job.job_id,
		job_number: job.job_number,
		name: job.name,
		client_id: job.client_id,
		created_at: job.created_at,
	}
}
