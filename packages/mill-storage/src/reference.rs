use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;

use crate::{Result, db::Db};

/// Reference tables backing the typeahead selectors. Each entity maps to
/// one table plus the columns the generic search/resolve queries need.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceEntity {
	Color,
	DoorStyle,
	Species,
	Job,
	Client,
}

#[derive(Debug)]
pub struct ReferenceTable {
	pub table: &'static str,
	pub id_column: &'static str,
	/// SQL expression producing the display label.
	pub label_expr: &'static str,
	pub search_column: &'static str,
	pub order_column: &'static str,
	pub ascending: bool,
}

const COLOR_TABLE: ReferenceTable = ReferenceTable {
	table: "colors",
	id_column: "color_id",
	label_expr: "name",
	search_column: "name",
	order_column: "name",
	ascending: true,
};
const DOOR_STYLE_TABLE: ReferenceTable = ReferenceTable {
	table: "door_styles",
	id_column: "door_style_id",
	label_expr: "name",
	search_column: "name",
	order_column: "name",
	ascending: true,
};
const SPECIES_TABLE: ReferenceTable = ReferenceTable {
	table: "species",
	id_column: "species_id",
	label_expr: "name",
	search_column: "name",
	order_column: "name",
	ascending: true,
};
// Newest job numbers first.
const JOB_TABLE: ReferenceTable = ReferenceTable {
	table: "jobs",
	id_column: "job_id",
	label_expr: "job_number::text || ' - ' || name",
	search_column: "name",
	order_column: "job_number",
	ascending: false,
};
const CLIENT_TABLE: ReferenceTable = ReferenceTable {
	table: "clients",
	id_column: "client_id",
	label_expr: "name",
	search_column: "name",
	order_column: "name",
	ascending: true,
};

impl ReferenceEntity {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Color => "color",
			Self::DoorStyle => "door_style",
			Self::Species => "species",
			Self::Job => "job",
			Self::Client => "client",
		}
	}

	pub fn descriptor(self) -> &'static ReferenceTable {
		match self {
			Self::Color => &COLOR_TABLE,
			Self::DoorStyle => &DOOR_STYLE_TABLE,
			Self::Species => &SPECIES_TABLE,
			Self::Job => &JOB_TABLE,
			Self::Client => &CLIENT_TABLE,
		}
	}
}

/// One selectable row, normalized for the UI. `value` is the row id
/// rendered as text so string and numeric identifiers look the same to
/// callers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LookupOption {
	pub value: String,
	pub label: String,
}

/// Default page when the query is empty, otherwise a case-insensitive
/// substring match on the entity's display field. Order is stable per
/// entity so repeated calls with the same key page identically.
pub async fn search_page(
	db: &Db,
	entity: ReferenceEntity,
	query: &str,
	limit: u32,
) -> Result<Vec<LookupOption>> {
	let table = entity.descriptor();
	let mut builder = QueryBuilder::new("SELECT ");

	builder.push(table.id_column);
	builder.push("::text AS value, ");
	builder.push(table.label_expr);
	builder.push(" AS label FROM ");
	builder.push(table.table);

	let trimmed = query.trim();

	if !trimmed.is_empty() {
		builder.push(" WHERE ");
		builder.push(table.search_column);
		builder.push(" ILIKE ");
		builder.push_bind(format!("%{}%", escape_like(trimmed)));
	}

	builder.push(" ORDER BY ");
	builder.push(table.order_column);
	builder.push(if table.ascending { " ASC" } else { " DESC" });
	builder.push(" LIMIT ");
	builder.push_bind(i64::from(limit));

	let rows: Vec<(String, String)> = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(rows.into_iter().map(|(value, label)| LookupOption { value, label }).collect())
}

/// Exact-id single-row fetch. Missing rows come back as `None`; the
/// caller decides whether that is fatal.
pub async fn resolve_by_id(
	db: &Db,
	entity: ReferenceEntity,
	id: &str,
) -> Result<Option<LookupOption>> {
	let table = entity.descriptor();
	let mut builder = QueryBuilder::new("SELECT ");

	builder.push(table.id_column);
	builder.push("::text AS value, ");
	builder.push(table.label_expr);
	builder.push(" AS label FROM ");
	builder.push(table.table);
	builder.push(" WHERE ");
	builder.push(table.id_column);
	builder.push("::text = ");
	builder.push_bind(id);
	builder.push(" LIMIT 1");

	let row: Option<(String, String)> = builder.build_query_as().fetch_optional(&db.pool).await?;

	Ok(row.map(|(value, label)| LookupOption { value, label }))
}

/// `%` and `_` typed by the user must match literally, not as wildcards.
fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for c in raw.chars() {
		if matches!(c, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(c);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn like_wildcards_are_escaped() {
		assert_eq!(escape_like("50% gray_oak"), "50\\% gray\\_oak");
		assert_eq!(escape_like("back\\slash"), "back\\\\slash");
		assert_eq!(escape_like("plain"), "plain");
	}

	#[test]
	fn job_descriptor_orders_newest_first() {
		let table = ReferenceEntity::Job.descriptor();

		assert_eq!(table.order_column, "job_number");
		assert!(!table.ascending);
	}

	#[test]
	fn entity_names_are_stable() {
		assert_eq!(ReferenceEntity::DoorStyle.as_str(), "door_style");
		assert_eq!(ReferenceEntity::Color.as_str(), "color");
	}
}
