//! User profiles keyed by the identity provider's subject id

mod file_store;
mod model;
mod repository;

pub use file_store::FileUserStore;
pub use model::{validate_name_field, User, MAX_NAME_FIELD_LEN};
pub use repository::{UserRepository, UserStats};
