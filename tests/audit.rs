//! Audit trail written by the model signals.

mod common;

use common::TestClient;
use rstest::*;
use visitcard::apps::hello::{AllRequest, SignalData};
use visitcard::management::CountObjectsCommand;

async fn messages(client: &TestClient) -> Vec<String> {
	client
		.db()
		.objects::<SignalData>()
		.all()
		.order_by(&["id"])
		.all()
		.await
		.unwrap()
		.into_iter()
		.map(|entry| entry.message)
		.collect()
}

#[rstest]
#[tokio::test]
async fn test_logged_requests_are_audited() {
	// Arrange
	let mut client = TestClient::new().await;

	// Act
	client.get("/").await;
	client.get("/request/").await;

	// Assert
	assert_eq!(
		messages(&client).await,
		[
			"Create row with id 1 in AllRequest",
			"Create row with id 2 in AllRequest",
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_priority_change_is_audited_as_update() {
	// Arrange
	let mut client = TestClient::new().await;
	client.get("/").await;

	// Act
	client.post("/request/edit/1/", &[("priority", "1")]).await;

	// Assert
	let messages = messages(&client).await;
	assert_eq!(
		messages.last().map(String::as_str),
		Some("Update row with id 1 in AllRequest")
	);
	let entry = client.db().objects::<AllRequest>().get(1).await.unwrap();
	assert_eq!(entry.priority, 1);
}

#[rstest]
#[tokio::test]
async fn test_count_objects_reports_every_model() {
	// Arrange
	let mut client = TestClient::new().await;
	client.get("/").await;

	// Act
	let lines = CountObjectsCommand::report(client.db()).await.unwrap();

	// Assert
	assert_eq!(
		lines,
		[
			"Error: Model User has 0 objects in database",
			"Error: Model About has 0 objects in database",
			"Error: Model AllRequest has 1 objects in database",
			"Error: Model SignalData has 1 objects in database",
		]
	);
}
