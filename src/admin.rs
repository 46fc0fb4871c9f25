//! Staff-only CRUD pages over the hello models.

pub mod options;
pub mod site;
pub mod views;

pub use options::{AdminModel, ChangeListRow, ModelAdmin, ModelAdminFor};
pub use site::{AdminError, AdminSite};
pub use views::urlpatterns;

use crate::apps::hello::{About, AllRequest, SignalData};

/// The site with every hello model registered
pub fn default_site() -> AdminSite {
	let mut site = AdminSite::new("visitcard administration");
	site.register::<About>();
	site.register::<AllRequest>();
	site.register::<SignalData>();
	site
}
