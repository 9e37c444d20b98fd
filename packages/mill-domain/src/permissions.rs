use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of shop roles. Anything else carried by a session claim
/// fails to parse and derives an all-false capability matrix.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	Admin,
	Designer,
	Scheduler,
	Installation,
	Service,
	Plant,
	Reception,
	Manager,
	Inspection,
}
impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Admin => "admin",
			Self::Designer => "designer",
			Self::Scheduler => "scheduler",
			Self::Installation => "installation",
			Self::Service => "service",
			Self::Plant => "plant",
			Self::Reception => "reception",
			Self::Manager => "manager",
			Self::Inspection => "inspection",
		}
	}
}
impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"admin" => Ok(Self::Admin),
			"designer" => Ok(Self::Designer),
			"scheduler" => Ok(Self::Scheduler),
			"installation" => Ok(Self::Installation),
			"service" => Ok(Self::Service),
			"plant" => Ok(Self::Plant),
			"reception" => Ok(Self::Reception),
			"manager" => Ok(Self::Manager),
			"inspection" => Ok(Self::Inspection),
			_ => Err(UnknownRole),
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownRole;

/// Auth-session projection. `loaded` is false until the session backend
/// has answered; an unloaded session and an unauthenticated one look
/// identical downstream, so nothing may be granted from either.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Session {
	pub loaded: bool,
	pub role: Option<Role>,
}
impl Session {
	pub fn loading() -> Self {
		Self { loaded: false, role: None }
	}

	pub fn with_role(role: Role) -> Self {
		Self { loaded: true, role: Some(role) }
	}

	/// Reads the `role` claim out of a loosely-typed claim blob. The value
	/// is untrusted; unknown or missing roles collapse to `None`.
	pub fn from_claims(claims: &Value) -> Self {
		let role = claims.get("role").and_then(Value::as_str).and_then(|raw| raw.parse().ok());

		Self { loaded: true, role }
	}

	pub fn is(&self, role: Role) -> bool {
		self.loaded && self.role == Some(role)
	}
}

/// Capability matrix derived from a session. Pure projection, recomputed
/// on demand; never grants anything while the session is still loading.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Permissions {
	pub can_edit_sales: bool,
	pub can_edit_production: bool,
	pub can_edit_installation: bool,
	pub can_edit_service: bool,
	pub can_edit_clients: bool,
	pub can_edit_jobs: bool,
	pub can_edit_calendar: bool,
	pub can_edit_inspection: bool,
	pub can_manage_users: bool,
	pub can_edit_reports: bool,
	pub can_delete: bool,
}
impl Permissions {
	pub fn derive(session: &Session) -> Self {
		if !session.loaded {
			return Self::default();
		}

		let is = |role| session.role == Some(role);
		let admin = is(Role::Admin);
		let designer = is(Role::Designer);
		let scheduler = is(Role::Scheduler);
		let installation = is(Role::Installation);
		let service = is(Role::Service);
		let plant = is(Role::Plant);
		let reception = is(Role::Reception);
		let manager = is(Role::Manager);
		let inspection = is(Role::Inspection);

		Self {
			can_edit_sales: admin || designer || scheduler,
			can_edit_production: admin || scheduler || plant,
			can_edit_installation: admin || scheduler || installation,
			can_edit_service: admin || service || scheduler,
			can_edit_clients: admin || designer || reception,
			can_edit_jobs: admin || designer || scheduler,
			can_edit_calendar: admin || scheduler,
			can_edit_inspection: admin || manager || inspection,
			can_manage_users: admin,
			// Reports are open to every signed-in role on purpose; the
			// loaded gate above still wins for sessions that never settle.
			can_edit_reports: true,
			can_delete: admin,
		}
	}
}
