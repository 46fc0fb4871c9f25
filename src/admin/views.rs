//! Admin pages: index, change list, add/change forms, delete and clear.

use super::options::ModelAdmin;
use super::site::AdminSite;
use crate::state::AppState;
use crate::views::{base_context, staff_member_required, view};
use hyper::Method;
use serde_json::json;
use std::sync::Arc;
use visitcard_core::Error;
use visitcard_core::pagination::Paginator;
use visitcard_forms::Form;
use visitcard_http::{Handler, Request, Response, Result};
use visitcard_shortcuts::tera::Context;
use visitcard_shortcuts::{redirect, render};
use visitcard_urls::{Router, UrlResult};

fn model_admin(site: &AdminSite, request: &Request) -> Result<Arc<dyn ModelAdmin>> {
	Ok(site.get_model_admin(request.path_param("model").unwrap_or_default())?)
}

fn admin_context(state: &AppState, site: &AdminSite, request: &Request) -> Context {
	let mut context = base_context(state, request);
	context.insert("site_name", site.name());
	context.insert("url_prefix", site.url_prefix());
	context
}

fn model_context(site: &AdminSite, admin: &dyn ModelAdmin) -> serde_json::Value {
	json!({
		"name": admin.model_name(),
		"slug": admin.slug(),
		"list_url": site.list_url(admin),
		"clearable": admin.clearable(),
	})
}

pub async fn index(state: AppState, request: Request, site: Arc<AdminSite>) -> Result<Response> {
	let mut models = Vec::new();
	for admin in site.model_admins() {
		let mut entry = model_context(&site, admin.as_ref());
		entry["count"] = json!(admin.count(&state.db).await?);
		models.push(entry);
	}

	let mut context = admin_context(&state, &site, &request);
	context.insert("models", &models);
	render(&state.templates, "admin/index.html", &context)
}

pub async fn change_list(state: AppState, request: Request, site: Arc<AdminSite>) -> Result<Response> {
	let admin = model_admin(&site, &request)?;
	let count = admin.count(&state.db).await?;
	let paginator = Paginator::new(usize::try_from(count).unwrap_or_default(), admin.list_per_page());
	let number = paginator.page_number_or_first(request.query_param("page").as_deref());
	let rows = admin
		.rows(
			&state.db,
			paginator.per_page() as u64,
			paginator.offset(number) as u64,
		)
		.await?;
	let page = paginator.page(rows, number);

	let mut context = admin_context(&state, &site, &request);
	context.insert("model", &model_context(&site, admin.as_ref()));
	context.insert("columns", admin.list_display());
	context.insert("rows", &page.object_list);
	context.insert("page", &page.navigation());
	render(&state.templates, "admin/change_list.html", &context)
}

fn render_change_form(
	state: &AppState,
	site: &AdminSite,
	request: &Request,
	admin: &dyn ModelAdmin,
	form: &Form,
	object: Option<(i64, &str)>,
) -> Result<Response> {
	let mut context = admin_context(state, site, request);
	context.insert("model", &model_context(site, admin));
	context.insert("form", &form.context());
	context.insert(
		"object",
		&object.map(|(id, display)| json!({ "id": id, "display": display })),
	);
	render(&state.templates, "admin/change_form.html", &context)
}

pub async fn add(state: AppState, request: Request, site: Arc<AdminSite>) -> Result<Response> {
	let admin = model_admin(&site, &request)?;
	let mut form = admin.form();

	if request.method == Method::POST {
		form.bind(&request.form_data().await?);
		if form.is_valid() {
			let id = admin.save(&state.db, None, &form).await?;
			tracing::info!(model = admin.model_name(), id, "admin added object");
			return Ok(redirect(&site.list_url(admin.as_ref())));
		}
	}

	render_change_form(&state, &site, &request, admin.as_ref(), &form, None)
}

pub async fn change(state: AppState, request: Request, site: Arc<AdminSite>) -> Result<Response> {
	let admin = model_admin(&site, &request)?;
	let pk = parse_pk_param(&request)?;
	let (display, initial) = admin.initial(&state.db, pk).await?;

	let mut form = admin.form();
	form.set_initial(initial);

	if request.method == Method::POST {
		form.bind(&request.form_data().await?);
		if form.is_valid() {
			admin.save(&state.db, Some(pk), &form).await?;
			tracing::info!(model = admin.model_name(), id = pk, "admin changed object");
			return Ok(redirect(&site.list_url(admin.as_ref())));
		}
	}

	render_change_form(&state, &site, &request, admin.as_ref(), &form, Some((pk, display.as_str())))
}

fn parse_pk_param(request: &Request) -> Result<i64> {
	request
		.path_param("pk")
		.and_then(|raw| raw.parse().ok())
		.ok_or_else(|| Error::NotFound("No object with that id".to_string()))
}

pub async fn delete(state: AppState, request: Request, site: Arc<AdminSite>) -> Result<Response> {
	let admin = model_admin(&site, &request)?;
	let pk = parse_pk_param(&request)?;

	if request.method == Method::POST {
		let deleted = admin.delete(&state.db, pk).await?;
		tracing::info!(model = admin.model_name(), id = pk, display = %deleted, "admin deleted object");
		return Ok(redirect(&site.list_url(admin.as_ref())));
	}

	let (display, _) = admin.initial(&state.db, pk).await?;
	let mut context = admin_context(&state, &site, &request);
	context.insert("model", &model_context(&site, admin.as_ref()));
	context.insert("object", &json!({ "id": pk, "display": display }));
	render(&state.templates, "admin/delete_confirmation.html", &context)
}

/// Bulk-delete every row of a clearable model; no signals are sent
pub async fn clear(state: AppState, request: Request, site: Arc<AdminSite>) -> Result<Response> {
	let admin = model_admin(&site, &request)?;
	if !admin.clearable() {
		return Ok(Response::not_found());
	}

	if request.method == Method::POST {
		let deleted = admin.clear(&state.db).await?;
		tracing::info!(model = admin.model_name(), deleted, "admin cleared model");
		return Ok(redirect(&site.list_url(admin.as_ref())));
	}

	let mut context = admin_context(&state, &site, &request);
	context.insert("model", &model_context(&site, admin.as_ref()));
	context.insert("count", &admin.count(&state.db).await?);
	render(&state.templates, "admin/clear_confirmation.html", &context)
}

fn admin_view<F, Fut>(state: &AppState, site: &Arc<AdminSite>, f: F) -> Arc<dyn Handler>
where
	F: Fn(AppState, Request, Arc<AdminSite>) -> Fut + Send + Sync + 'static,
	Fut: std::future::Future<Output = Result<Response>> + Send + 'static,
{
	let site = site.clone();
	staff_member_required(
		state,
		view(state, move |state, request| f(state, request, site.clone())),
	)
}

/// Admin routes, to be mounted under `/admin/`
pub fn urlpatterns(state: &AppState, site: AdminSite) -> UrlResult<Router> {
	let site = Arc::new(site);
	Router::new()
		.route("/", admin_view(state, &site, index), "index")?
		.route("/{model}/", admin_view(state, &site, change_list), "changelist")?
		.route("/{model}/add/", admin_view(state, &site, add), "add")?
		.route("/{model}/clear/", admin_view(state, &site, clear), "clear")?
		.route("/{model}/{pk:int}/", admin_view(state, &site, change), "change")?
		.route(
			"/{model}/{pk:int}/delete/",
			admin_view(state, &site, delete),
			"delete",
		)
}
