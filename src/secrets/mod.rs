mod credentials_file;

pub use credentials_file::{delete_token, load_token, resolve_token, store_token, TOKEN_ENV_VAR};
