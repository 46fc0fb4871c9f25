use super::options::{AdminModel, ModelAdmin, ModelAdminFor};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdminError {
	#[error("Model '{0}' is not registered in the admin")]
	NotRegistered(String),
}

impl From<AdminError> for visitcard_core::Error {
	fn from(error: AdminError) -> Self {
		Self::NotFound(error.to_string())
	}
}

/// The registered model admins, keyed by URL slug
pub struct AdminSite {
	name: String,
	url_prefix: String,
	models: IndexMap<String, Arc<dyn ModelAdmin>>,
}

impl AdminSite {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			url_prefix: "/admin".to_string(),
			models: IndexMap::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn url_prefix(&self) -> &str {
		&self.url_prefix
	}

	pub fn register<M: AdminModel>(&mut self) {
		self.register_admin(Arc::new(ModelAdminFor::<M>::default()));
	}

	pub fn register_admin(&mut self, admin: Arc<dyn ModelAdmin>) {
		self.models.insert(admin.slug(), admin);
	}

	/// Model names in registration order
	pub fn registered_models(&self) -> Vec<&'static str> {
		self.models.values().map(|admin| admin.model_name()).collect()
	}

	pub fn model_admins(&self) -> impl Iterator<Item = &Arc<dyn ModelAdmin>> {
		self.models.values()
	}

	/// Look up by slug (`allrequest`) or model name, ignoring case
	pub fn get_model_admin(&self, name: &str) -> Result<Arc<dyn ModelAdmin>, AdminError> {
		self.models
			.get(&name.to_lowercase())
			.cloned()
			.ok_or_else(|| AdminError::NotRegistered(name.to_string()))
	}

	pub fn list_url(&self, admin: &dyn ModelAdmin) -> String {
		format!("{}/{}/", self.url_prefix, admin.slug())
	}
}
