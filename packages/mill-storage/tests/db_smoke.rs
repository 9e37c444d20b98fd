use time::OffsetDateTime;
use uuid::Uuid;

use mill_config::Postgres;
use mill_storage::{
	db::Db,
	models::Job,
	queries,
	reference::{self, ReferenceEntity},
};
use mill_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres. Set MILL_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = mill_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set MILL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	for table in ["clients", "jobs", "colors", "species", "door_styles", "sales_orders", "service_orders"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "expected table {table} after bootstrap");
	}

	test_db.cleanup().await.expect("Failed to clean up test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MILL_PG_DSN to run."]
async fn job_search_returns_newest_numbers_first() {
	let Some(base_dsn) = mill_testkit::env_dsn() else {
		eprintln!("Skipping job_search_returns_newest_numbers_first; set MILL_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let now = OffsetDateTime::now_utc();

	for (number, name) in [(101, "Hallway built-ins"), (205, "Kitchen refit"), (103, "Vanity")] {
		let job = Job {
			job_id: Uuid::new_v4(),
			job_number: number,
			name: name.to_string(),
			client_id: None,
			created_at: now,
		};

		queries::insert_job(&db, &job).await.expect("Failed to insert job.");
	}

	let options = reference::search_page(&db, ReferenceEntity::Job, "", 10)
		.await
		.expect("Job search failed.");
	let labels: Vec<&str> = options.iter().map(|option| option.label.as_str()).collect();

	assert_eq!(labels, vec!["205 - Kitchen refit", "103 - Vanity", "101 - Hallway built-ins"]);

	let filtered = reference::search_page(&db, ReferenceEntity::Job, "kitchen", 10)
		.await
		.expect("Filtered job search failed.");

	assert_eq!(filtered.len(), 1);
	assert_eq!(filtered[0].label, "205 - Kitchen refit");

	test_db.cleanup().await.expect("Failed to clean up test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MILL_PG_DSN to run."]
async fn contended_job_number_allocation_stays_unique() {
	let Some(base_dsn) = mill_testkit::env_dsn() else {
		eprintln!("Skipping contended_job_number_allocation_stays_unique; set MILL_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 4 };
	let db = std::sync::Arc::new(Db::connect(&cfg).await.expect("Failed to connect to Postgres."));

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let mut handles = Vec::new();

	for i in 0..8 {
		let db = db.clone();

		handles.push(tokio::spawn(async move {
			let mut last_err = None;

			// Same retry discipline the service applies: a collision on
			// the unique job_number constraint gets a fresh allocation.
			for _ in 0..8 {
				match queries::insert_job_with_next_number(
					&db,
					Uuid::new_v4(),
					&format!("Job {i}"),
					None,
					OffsetDateTime::now_utc(),
				)
				.await
				{
					Ok(job) => return Ok(job.job_number),
					Err(err) if err.is_unique_violation() => last_err = Some(err),
					Err(err) => return Err(err),
				}
			}

			Err(last_err.expect("Retries exhausted without an error."))
		}));
	}

	let mut numbers = Vec::new();

	for handle in handles {
		let number =
			handle.await.expect("Writer task panicked.").expect("Job allocation failed.");

		numbers.push(number);
	}

	numbers.sort_unstable();

	assert_eq!(numbers, (101..=108).collect::<Vec<i64>>());

	test_db.cleanup().await.expect("Failed to clean up test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MILL_PG_DSN to run."]
async fn duplicate_job_numbers_report_a_unique_violation() {
	let Some(base_dsn) = mill_testkit::env_dsn() else {
		eprintln!("Skipping duplicate_job_numbers_report_a_unique_violation; set MILL_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let now = OffsetDateTime::now_utc();

	for job_id in [Uuid::new_v4(), Uuid::new_v4()] {
		let job = Job { job_id, job_number: 300, name: "Pantry".to_string(), client_id: None, created_at: now };

		match queries::insert_job(&db, &job).await {
			Ok(()) => {},
			Err(err) => {
				assert!(err.is_unique_violation(), "expected a unique violation, got {err}");

				test_db.cleanup().await.expect("Failed to clean up test database.");

				return;
			},
		}
	}

	panic!("second insert with a duplicate job_number must fail");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MILL_PG_DSN to run."]
async fn resolve_by_id_misses_are_none() {
	let Some(base_dsn) = mill_testkit::env_dsn() else {
		eprintln!("Skipping resolve_by_id_misses_are_none; set MILL_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let missing = reference::resolve_by_id(&db, ReferenceEntity::Color, &Uuid::new_v4().to_string())
		.await
		.expect("Resolve query failed.");

	assert_eq!(missing, None);

	test_db.cleanup().await.expect("Failed to clean up test database.");
}
