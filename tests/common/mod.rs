//! Test client driving the full middleware stack against an in-memory
//! database.

#![allow(dead_code)]

use hyper::Method;
use image::{ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use visitcard::{AppState, build_handler, load_templates, setup_database};
use visitcard_auth::User;
use visitcard_conf::Settings;
use visitcard_db::Database;
use visitcard_http::{Handler, Request, Response};

const BOUNDARY: &str = "visitcard-test-boundary";

pub struct TestClient {
	pub state: AppState,
	handler: Arc<dyn Handler>,
	session: Option<String>,
	media: TempDir,
}

impl TestClient {
	pub async fn new() -> Self {
		let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
		let media = tempfile::tempdir().unwrap();
		let settings = Settings {
			database_url: "sqlite::memory:".to_string(),
			templates_dir: root.join("templates"),
			static_root: root.join("static"),
			media_root: media.path().to_path_buf(),
			..Settings::default()
		};

		let db = setup_database(&settings).await.unwrap();
		db.migrate().await.unwrap();
		let templates = load_templates(&settings).unwrap();
		let state = AppState::new(db, templates, settings);
		let handler = build_handler(&state).unwrap();

		Self {
			state,
			handler,
			session: None,
			media,
		}
	}

	pub fn db(&self) -> &Database {
		&self.state.db
	}

	pub fn media_root(&self) -> PathBuf {
		self.media.path().to_path_buf()
	}

	pub async fn send(&mut self, request: Request) -> Response {
		let response = self
			.handler
			.handle(request)
			.await
			.unwrap_or_else(Response::from);
		self.remember_session(&response);
		response
	}

	fn remember_session(&mut self, response: &Response) {
		let cookie_name = &self.state.settings.session_cookie_name;
		let Some(set_cookie) = response.header("set-cookie") else {
			return;
		};
		let Some((name, rest)) = set_cookie.split_once('=') else {
			return;
		};
		if name != cookie_name {
			return;
		}
		let value = rest.split(';').next().unwrap_or_default();
		self.session = (!value.is_empty()).then(|| value.to_string());
	}

	fn builder(&self, method: Method, uri: &str) -> visitcard_http::RequestBuilder {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(session) = &self.session {
			let cookie = format!("{}={session}", self.state.settings.session_cookie_name);
			builder = builder.header("cookie", &cookie);
		}
		builder
	}

	pub async fn get(&mut self, uri: &str) -> Response {
		let request = self.builder(Method::GET, uri).build().unwrap();
		self.send(request).await
	}

	pub async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response {
		let request = self
			.builder(Method::POST, uri)
			.header("content-type", "application/x-www-form-urlencoded")
			.body(serde_urlencoded::to_string(fields).unwrap())
			.build()
			.unwrap();
		self.send(request).await
	}

	/// Multipart POST with an optional `(field, filename, content)` file,
	/// sent the way the profile page script sends it
	pub async fn post_ajax_multipart(
		&mut self,
		uri: &str,
		fields: &[(&str, &str)],
		file: Option<(&str, &str, &[u8])>,
	) -> Response {
		let request = self
			.builder(Method::POST, uri)
			.header(
				"content-type",
				&format!("multipart/form-data; boundary={BOUNDARY}"),
			)
			.header("x-requested-with", "XMLHttpRequest")
			.body(multipart_body(fields, file))
			.build()
			.unwrap();
		self.send(request).await
	}

	pub async fn create_user(&self, username: &str, password: &str) -> User {
		User::create_user(self.db(), username, "user@example.com", password)
			.await
			.unwrap()
	}

	pub async fn create_superuser(&self, username: &str, password: &str) -> User {
		User::create_superuser(self.db(), username, "admin@example.com", password)
			.await
			.unwrap()
	}

	pub async fn login(&mut self, username: &str, password: &str) -> Response {
		self.post(
			"/login/",
			&[("username", username), ("password", password)],
		)
		.await
	}
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
	let mut body = Vec::new();
	for (name, value) in fields {
		body.extend_from_slice(
			format!(
				"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
			)
			.as_bytes(),
		);
	}
	if let Some((name, filename, content)) = file {
		body.extend_from_slice(
			format!(
				"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
			)
			.as_bytes(),
		);
		body.extend_from_slice(content);
		body.extend_from_slice(b"\r\n");
	}
	body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
	body
}

/// A `width` x `height` PNG in two colours
pub fn png(width: u32, height: u32) -> Vec<u8> {
	let img = ImageBuffer::from_fn(width, height, |x, _| {
		if x < width / 2 {
			Rgb([255u8, 0, 0])
		} else {
			Rgb([0u8, 0, 255])
		}
	});
	let mut buffer = Vec::new();
	img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
		.unwrap();
	buffer
}

/// Fields of a valid profile form submission
pub fn profile_fields() -> Vec<(&'static str, &'static str)> {
	vec![
		("name", "Volodymyr"),
		("last_name", "Shevchenko"),
		("date", "1990-05-17"),
		("bio", "Rust developer"),
		("email", "vova@example.com"),
		("jabber", "vova@jabber.org"),
		("skype", "vova.s"),
		("other_contact", ""),
	]
}
