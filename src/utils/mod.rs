pub mod url;

pub use url::{build_short_url, is_valid_url, normalize_url};
