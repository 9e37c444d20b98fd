#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Data client is not ready (phase: {phase}).")]
	NotReady { phase: &'static str },
}
impl Error {
	/// True when the underlying driver reported a unique-constraint hit,
	/// e.g. two writers racing for the same job number.
	pub fn is_unique_violation(&self) -> bool {
		matches!(self, Self::Sqlx(sqlx::Error::Database(db)) if db.is_unique_violation())
	}
}
