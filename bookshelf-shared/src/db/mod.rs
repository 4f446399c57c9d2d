/// Database layer for Bookshelf
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - Queries live next to their models in the `models` module
///
/// The schema itself ships in the workspace `migrations/` directory and is
/// applied by the API server at startup.

pub mod pool;
