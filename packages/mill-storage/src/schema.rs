pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_clients.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_clients.sql")),
				"tables/002_jobs.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_jobs.sql")),
				"tables/003_colors.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_colors.sql")),
				"tables/004_species.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_species.sql")),
				"tables/005_door_styles.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_door_styles.sql")),
				"tables/006_sales_orders.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_sales_orders.sql")),
				"tables/007_service_orders.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_service_orders.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
