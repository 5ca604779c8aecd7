/// Middleware modules for the API server
///
/// Identity resolution itself lives in `pomotrack_shared::auth::middleware`
/// and is wired up in `app.rs`; this module holds the remaining
/// HTTP-surface middleware.

pub mod security;
