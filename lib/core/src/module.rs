use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (user, restaurant, comment) implements this trait
/// to register its API endpoints. The binary entry point collects all
/// modules and merges their routes under the `/api` prefix.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes, merged under `/api` by the binary.
    fn routes(&self) -> Router;
}
