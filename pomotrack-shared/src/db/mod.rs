/// Database layer for Pomotrack
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: schema migration runner, invoked once at process startup

pub mod migrations;
pub mod pool;
