/// Authentication primitives for Pomotrack
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed session token issue/verify
/// - [`middleware`]: Identity resolution from request headers
///
/// Tokens are HS256-signed with a process-wide secret that is loaded once at
/// startup and passed explicitly into every call; there is no mutable global
/// key state.

pub mod jwt;
pub mod middleware;
pub mod password;
