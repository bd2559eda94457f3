pub mod guard;
pub mod routes;
pub mod session;

pub use crate::domain::model::{AuthSnapshot, Credentials, Session, SessionState, User};
pub use crate::domain::ports::{AuthApi, ConfigProvider, KeyValueStore};
pub use crate::utils::error::Result;
