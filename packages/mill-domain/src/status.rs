use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sales-order lifecycle. Stored as lowercase strings; parsed fail-closed
/// at the service boundary.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
	Pending,
	Confirmed,
	InProduction,
	Ready,
	Installed,
	Closed,
}
impl SalesOrderStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Confirmed => "confirmed",
			Self::InProduction => "in_production",
			Self::Ready => "ready",
			Self::Installed => "installed",
			Self::Closed => "closed",
		}
	}
}
impl FromStr for SalesOrderStatus {
	type Err = UnknownStatus;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"pending" => Ok(Self::Pending),
			"confirmed" => Ok(Self::Confirmed),
			"in_production" => Ok(Self::InProduction),
			"ready" => Ok(Self::Ready),
			"installed" => Ok(Self::Installed),
			"closed" => Ok(Self::Closed),
			_ => Err(UnknownStatus),
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrderStatus {
	Open,
	Scheduled,
	InProgress,
	Completed,
	Cancelled,
}
impl ServiceOrderStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Open => "open",
			Self::Scheduled => "scheduled",
			Self::InProgress => "in_progress",
			Self::Completed => "completed",
			Self::Cancelled => "cancelled",
		}
	}
}
impl FromStr for ServiceOrderStatus {
	type Err = UnknownStatus;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"open" => Ok(Self::Open),
			"scheduled" => Ok(Self::Scheduled),
			"in_progress" => Ok(Self::InProgress),
			"completed" => Ok(Self::Completed),
			"cancelled" => Ok(Self::Cancelled),
			_ => Err(UnknownStatus),
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownStatus;
