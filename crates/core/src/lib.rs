pub mod cookies;
pub mod errors;
pub mod slug;

pub use cookies::{CookieJar, load_cookies, parse_cookie_jar};
pub use errors::{CookieError, Result};
pub use slug::slugify;
