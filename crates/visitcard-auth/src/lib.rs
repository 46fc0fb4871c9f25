//! Users, sessions and authentication for visitcard.
//!
//! The usual stack is [`SessionMiddleware`] wrapping
//! [`AuthenticationMiddleware`]; views then call [`login`] / [`logout`] and
//! protect themselves with [`LoginRequired`].

pub mod error;
pub mod guard;
pub mod hasher;
pub mod login;
pub mod middleware;
pub mod session;
pub mod user;

pub use error::{AuthError, AuthResult};
pub use guard::{LoginRequired, redirect_to_login};
pub use hasher::{Argon2Hasher, PasswordHasher, check_password, make_password};
pub use login::{authenticate, login, logout, safe_redirect_target};
pub use middleware::{AuthenticationMiddleware, auth_state, current_user};
pub use session::{SESSION_KEY_USER_ID, Session, SessionConfig, SessionMiddleware, SessionStore};
pub use user::User;
