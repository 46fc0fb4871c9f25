//! Staff-only admin pages.

mod common;

use common::TestClient;
use rstest::*;
use visitcard::apps::hello::{About, AllRequest, SignalData};

#[fixture]
async fn client() -> TestClient {
	let client = TestClient::new().await;
	client.create_superuser("admin", "admin").await;
	client.create_user("visitor", "visitor").await;
	client
}

#[fixture]
async fn staff(#[future] client: TestClient) -> TestClient {
	let mut client = client.await;
	client.login("admin", "admin").await;
	client
}

#[rstest]
#[tokio::test]
async fn test_anonymous_is_sent_to_login(#[future] client: TestClient) {
	let mut client = client.await;

	let response = client.get("/admin/").await;

	assert_eq!(response.status.as_u16(), 302);
	assert_eq!(response.location(), Some("/login/?next=/admin/"));
}

#[rstest]
#[case("/admin/")]
#[case("/admin/signaldata/")]
#[tokio::test]
async fn test_non_staff_is_forbidden(#[future] client: TestClient, #[case] uri: &str) {
	// Arrange
	let mut client = client.await;
	client.login("visitor", "visitor").await;

	// Act
	let response = client.get(uri).await;

	// Assert
	assert_eq!(response.status.as_u16(), 403);
}

#[rstest]
#[tokio::test]
async fn test_index_lists_models_with_counts(#[future] staff: TestClient) {
	let mut client = staff.await;

	let response = client.get("/admin/").await;

	assert_eq!(response.status.as_u16(), 200);
	let body = response.text();
	for link in ["/admin/about/", "/admin/allrequest/", "/admin/signaldata/"] {
		assert!(body.contains(link), "missing {link}");
	}
}

#[rstest]
#[tokio::test]
async fn test_change_list_is_paginated(#[future] staff: TestClient) {
	// Arrange
	let mut client = staff.await;
	for i in 0..30 {
		client
			.db()
			.objects::<AllRequest>()
			.create(AllRequest::new("GET", &format!("/seeded/{i}")))
			.await
			.unwrap();
	}

	// Act
	let first = client.get("/admin/allrequest/").await.text();
	let second = client.get("/admin/allrequest/?page=2").await.text();

	// Assert
	assert!(first.contains("&#x2F;seeded&#x2F;29<"));
	assert!(!first.contains("&#x2F;seeded&#x2F;0<"));
	assert!(first.contains("page 1 of 2"));
	assert!(second.contains("&#x2F;seeded&#x2F;0<"));
}

#[rstest]
#[tokio::test]
async fn test_add_change_and_delete(#[future] staff: TestClient) {
	// Arrange
	let mut client = staff.await;
	let fields = [
		("name", "Lesya"),
		("last_name", "Ukrainka"),
		("email", "lesya@example.com"),
		("jabber", "lesya@jabber.org"),
		("skype", "lesya.u"),
	];

	// Act
	let added = client.post("/admin/about/add/", &fields).await;
	let about = client.db().objects::<About>().all().first().await.unwrap().unwrap();
	let id = about.id.unwrap();

	let mut changed_fields = fields.to_vec();
	changed_fields[1] = ("last_name", "Kosach");
	let changed = client
		.post(&format!("/admin/about/{id}/"), &changed_fields)
		.await;
	let confirm = client.get(&format!("/admin/about/{id}/delete/")).await;
	let deleted = client
		.post(&format!("/admin/about/{id}/delete/"), &[])
		.await;

	// Assert
	assert_eq!(added.status.as_u16(), 302);
	assert_eq!(added.location(), Some("/admin/about/"));
	assert_eq!(changed.location(), Some("/admin/about/"));
	assert!(confirm.text().contains("Kosach"));
	assert_eq!(deleted.location(), Some("/admin/about/"));
	assert_eq!(client.db().objects::<About>().count().await.unwrap(), 0);

	let messages: Vec<String> = client
		.db()
		.objects::<SignalData>()
		.filter("message", format!("Delete row with id {id} in About"))
		.all()
		.await
		.unwrap()
		.into_iter()
		.map(|entry| entry.message)
		.collect();
	assert_eq!(messages.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_invalid_change_rerenders_form(#[future] staff: TestClient) {
	// Arrange
	let mut client = staff.await;
	let entry = client
		.db()
		.objects::<AllRequest>()
		.create(AllRequest::new("GET", "/"))
		.await
		.unwrap();
	let uri = format!("/admin/allrequest/{}/", entry.id.unwrap());

	// Act
	let response = client
		.post(&uri, &[("priority", "10"), ("method", "GET"), ("path", "/")])
		.await;

	// Assert
	assert_eq!(response.status.as_u16(), 200);
	assert!(
		response
			.text()
			.contains("Ensure this value is less than or equal to 9")
	);
}

#[rstest]
#[tokio::test]
async fn test_clear_audit_log(#[future] staff: TestClient) {
	// Arrange
	let mut client = staff.await;
	client.get("/").await;
	assert!(client.db().objects::<SignalData>().count().await.unwrap() > 0);

	// Act
	let confirm = client.get("/admin/signaldata/clear/").await;
	let cleared = client.post("/admin/signaldata/clear/", &[]).await;

	// Assert
	assert_eq!(confirm.status.as_u16(), 200);
	assert_eq!(cleared.status.as_u16(), 302);
	assert_eq!(cleared.location(), Some("/admin/signaldata/"));
	assert_eq!(client.db().objects::<SignalData>().count().await.unwrap(), 0);
}

#[rstest]
#[case("/admin/about/clear/")]
#[case("/admin/nosuchmodel/")]
#[case("/admin/about/999/")]
#[tokio::test]
async fn test_not_found(#[future] staff: TestClient, #[case] uri: &str) {
	let mut client = staff.await;

	let response = client.post(uri, &[]).await;

	assert_eq!(response.status.as_u16(), 404);
}
