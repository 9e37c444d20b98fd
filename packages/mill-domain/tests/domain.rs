use serde_json::json;

use mill_domain::{Permissions, Role, SalesOrderStatus, ServiceOrderStatus, Session};

#[test]
fn admin_gets_every_edit_capability_and_delete() {
	let perms = Permissions::derive(&Session::with_role(Role::Admin));

	assert!(perms.can_edit_sales);
	assert!(perms.can_edit_production);
	assert!(perms.can_edit_installation);
	assert!(perms.can_edit_service);
	assert!(perms.can_edit_clients);
	assert!(perms.can_edit_jobs);
	assert!(perms.can_edit_calendar);
	assert!(perms.can_edit_inspection);
	assert!(perms.can_manage_users);
	assert!(perms.can_edit_reports);
	assert!(perms.can_delete);
}

#[test]
fn reception_edits_clients_and_reports_only() {
	let perms = Permissions::derive(&Session::with_role(Role::Reception));

	assert!(perms.can_edit_clients);
	assert!(perms.can_edit_reports);
	assert!(!perms.can_edit_production);
	assert!(!perms.can_edit_sales);
	assert!(!perms.can_delete);
	assert!(!perms.can_manage_users);
}

#[test]
fn unloaded_session_grants_nothing() {
	let session = Session { loaded: false, role: Some(Role::Admin) };
	let perms = Permissions::derive(&session);

	assert_eq!(perms, Permissions::default());
	assert!(!perms.can_edit_reports);
}

#[test]
fn delete_is_admin_only() {
	for role in [
		Role::Designer,
		Role::Scheduler,
		Role::Installation,
		Role::Service,
		Role::Plant,
		Role::Reception,
		Role::Manager,
		Role::Inspection,
	] {
		let perms = Permissions::derive(&Session::with_role(role));

		assert!(!perms.can_delete, "{role:?} must not delete");
		assert!(!perms.can_manage_users, "{role:?} must not manage users");
		assert!(perms.can_edit_reports, "{role:?} still edits reports");
	}
}

#[test]
fn unknown_role_claim_fails_closed() {
	let session = Session::from_claims(&json!({ "role": "superuser" }));

	assert!(session.loaded);
	assert_eq!(session.role, None);
	assert!(!Permissions::derive(&session).can_edit_sales);
	// The blanket report allowance still applies to a loaded session.
	assert!(Permissions::derive(&session).can_edit_reports);
}

#[test]
fn role_claim_is_normalized_at_the_boundary() {
	let session = Session::from_claims(&json!({ "role": "  Scheduler " }));

	assert_eq!(session.role, Some(Role::Scheduler));
	assert!(session.is(Role::Scheduler));
	assert!(!session.is(Role::Admin));
}

#[test]
fn missing_or_non_string_role_claims_collapse_to_none() {
	for claims in [json!({}), json!({ "role": 7 }), json!({ "role": null })] {
		let session = Session::from_claims(&claims);

		assert_eq!(session.role, None);
	}
}

#[test]
fn loading_session_is_predicate_is_false_for_every_role() {
	let session = Session::loading();

	assert!(!session.is(Role::Admin));
	assert!(!session.is(Role::Reception));
}

#[test]
fn status_strings_round_trip_and_reject_unknowns() {
	assert_eq!("in_production".parse::<SalesOrderStatus>(), Ok(SalesOrderStatus::InProduction));
	assert_eq!(SalesOrderStatus::Ready.as_str(), "ready");
	assert!("shipped".parse::<SalesOrderStatus>().is_err());

	assert_eq!("scheduled".parse::<ServiceOrderStatus>(), Ok(ServiceOrderStatus::Scheduled));
	assert!("done".parse::<ServiceOrderStatus>().is_err());
}
