//! Profile and request log views.

use super::forms::{about_form, about_initial, apply_about, request_form, request_initial};
use super::images::{ImageProcessingError, save_profile_image};
use super::models::{About, AllRequest};
use crate::state::AppState;
use crate::views::base_context;
use hyper::Method;
use serde::Serialize;
use serde_json::{Value, json};
use visitcard_core::pagination::Paginator;
use visitcard_forms::Form;
use visitcard_http::{Request, Response, Result};
use visitcard_shortcuts::tera::Context;
use visitcard_shortcuts::{get_object_or_404, parse_pk, redirect, render, render_json, render_text};

/// Priority rank of a listing; anything unknown is treated as low
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityRank {
	Low,
	High,
}

impl PriorityRank {
	/// # Examples
	///
	/// ```
	/// use visitcard::apps::hello::views::PriorityRank;
	///
	/// assert_eq!(PriorityRank::parse("high"), PriorityRank::High);
	/// assert_eq!(PriorityRank::parse("urgent"), PriorityRank::Low);
	/// ```
	pub fn parse(token: &str) -> Self {
		match token {
			"high" => PriorityRank::High,
			_ => PriorityRank::Low,
		}
	}

	pub fn priority(self) -> i64 {
		match self {
			PriorityRank::Low => 0,
			PriorityRank::High => 1,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			PriorityRank::Low => "low",
			PriorityRank::High => "high",
		}
	}
}

/// One entry of the AJAX request feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
	pub req_id: Option<i64>,
	pub req_date: String,
	pub req_method: String,
	pub req_path: String,
	pub req_priority: i64,
}

impl From<&AllRequest> for FeedEntry {
	fn from(request: &AllRequest) -> Self {
		Self {
			req_id: request.id,
			req_date: request.formatted_date(),
			req_method: request.method.clone(),
			req_path: request.path.clone(),
			req_priority: request.priority,
		}
	}
}

fn request_row(request: &AllRequest) -> Value {
	json!({
		"id": request.id,
		"date": request.formatted_date(),
		"method": request.method,
		"path": request.path,
		"priority": request.priority,
		"label": request.to_string(),
	})
}

fn person_context(state: &AppState, person: &About) -> Value {
	json!({
		"id": person.id,
		"name": person.name,
		"last_name": person.last_name,
		"date": person.date.map(|date| date.format("%Y-%m-%d").to_string()),
		"bio": person.bio,
		"email": person.email,
		"jabber": person.jabber,
		"skype": person.skype,
		"other_contact": person.other_contact,
		"image_url": person
			.image
			.as_ref()
			.map(|image| format!("{}{image}", state.settings.media_url)),
	})
}

/// `GET /`: the first profile by id
pub async fn about(state: AppState, request: Request) -> Result<Response> {
	let person = state
		.db
		.objects::<About>()
		.all()
		.order_by(&["id"])
		.first()
		.await?;

	let mut context = base_context(&state, &request);
	context.insert(
		"person",
		&person.as_ref().map(|person| person_context(&state, person)),
	);
	render(&state.templates, "hello/about.html", &context)
}

async fn recent_requests(state: &AppState) -> Result<Vec<AllRequest>> {
	Ok(state
		.db
		.objects::<AllRequest>()
		.all()
		.order_by(&["-id"])
		.limit(state.settings.feed_size)
		.all()
		.await?)
}

/// `GET /request/`: the latest requests
pub async fn request_list(state: AppState, request: Request) -> Result<Response> {
	let requests = recent_requests(&state).await?;

	let mut context = base_context(&state, &request);
	context.insert(
		"requests",
		&requests.iter().map(request_row).collect::<Vec<_>>(),
	);
	render(&state.templates, "hello/request.html", &context)
}

/// `GET /request/ajax/`: the latest requests as JSON, newest first
pub async fn ajax_request_list(state: AppState, _request: Request) -> Result<Response> {
	let requests = recent_requests(&state).await?;
	let feed: Vec<FeedEntry> = requests.iter().map(FeedEntry::from).collect();
	render_json(&feed)
}

/// `GET /request/priority/{rank}/?page=N`
pub async fn priority(state: AppState, request: Request) -> Result<Response> {
	let rank = PriorityRank::parse(request.path_param("rank").unwrap_or_default());
	let query = state
		.db
		.objects::<AllRequest>()
		.filter("priority", rank.priority());

	let count = query.count().await?;
	let paginator = Paginator::new(
		usize::try_from(count).unwrap_or_default(),
		state.settings.requests_per_page,
	);
	let number = paginator.page_number_or_first(request.query_param("page").as_deref());
	let rows = query
		.order_by(&["-id"])
		.limit(paginator.per_page() as u64)
		.offset(paginator.offset(number) as u64)
		.all()
		.await?;
	let page = paginator.page(rows.iter().map(request_row).collect::<Vec<_>>(), number);

	let mut context = base_context(&state, &request);
	context.insert("rank", rank.label());
	context.insert("requests", &page.object_list);
	context.insert("page", &page.navigation());
	render(&state.templates, "hello/priority.html", &context)
}

fn edit_context(state: &AppState, request: &Request, form: &Form, person: &About) -> Context {
	let mut context = base_context(state, request);
	context.insert("form", &form.context());
	context.insert("pk", &person.id);
	context.insert("person", &person_context(state, person));
	context
}

/// `GET/POST /edit/{pk}/`: edit the profile; login required
pub async fn edit_person(state: AppState, request: Request) -> Result<Response> {
	let pk = parse_pk::<About>(request.path_param("pk"))?;
	let mut person: About = get_object_or_404(&state.db, pk).await?;

	let mut form = about_form(&person);
	form.set_initial(about_initial(&person));

	if request.method == Method::POST {
		form.bind(&request.form_data().await?);
		if form.is_valid() {
			apply_about(&form, &mut person);
			let upload = form
				.file("image")
				.map(|file| (file.filename.clone(), file.content.clone()));
			let image = match upload {
				Some((filename, content)) => {
					match save_profile_image(&state.settings.media_root, &filename, content).await {
						Ok(path) => Some(path),
						Err(ImageProcessingError::InvalidImage(message)) => {
							tracing::info!(%message, "rejected profile image");
							form.add_error(
								Some("image"),
								"Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
							);
							None
						}
						Err(e) => return Err(e.into()),
					}
				}
				None => None,
			};

			if form.errors().is_empty() {
				if image.is_some() {
					person.image = image;
				}
				state.db.objects::<About>().save(&mut person).await?;
				tracing::info!(pk, "profile updated");
				if request.is_ajax() {
					return Ok(render_text("OK"));
				}
			}
		}
	}

	let context = edit_context(&state, &request, &form, &person);
	render(&state.templates, "hello/edit.html", &context)
}

/// `GET/POST /request/edit/{pk}/`: change a request's priority
pub async fn request_edit(state: AppState, request: Request) -> Result<Response> {
	let pk = parse_pk::<AllRequest>(request.path_param("pk"))?;
	let mut entry: AllRequest = get_object_or_404(&state.db, pk).await?;

	let mut form = request_form();
	form.set_initial(request_initial(&entry));

	if request.method == Method::POST {
		form.bind(&request.form_data().await?);
		if form.is_valid() {
			entry.priority = form.get_i64("priority").unwrap_or_default();
			state.db.objects::<AllRequest>().save(&mut entry).await?;
			return Ok(redirect("/request/"));
		}
	}

	let mut context = base_context(&state, &request);
	context.insert("form", &form.context());
	context.insert("entry", &request_row(&entry));
	render(&state.templates, "hello/request_edit.html", &context)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("low", 0)]
	#[case("high", 1)]
	#[case("", 0)]
	#[case("HIGH", 0)]
	fn test_rank_resolution(#[case] token: &str, #[case] priority: i64) {
		assert_eq!(PriorityRank::parse(token).priority(), priority);
	}

	#[rstest]
	fn test_feed_entry_fields() {
		// Arrange
		let mut request = AllRequest::new("POST", "/edit/1/").with_priority(1);
		request.id = Some(4);

		// Act
		let entry = serde_json::to_value(FeedEntry::from(&request)).unwrap();

		// Assert
		assert_eq!(entry["req_id"], json!(4));
		assert_eq!(entry["req_method"], json!("POST"));
		assert_eq!(entry["req_path"], json!("/edit/1/"));
		assert_eq!(entry["req_priority"], json!(1));
		assert_eq!(entry["req_date"], json!(request.formatted_date()));
	}
}
