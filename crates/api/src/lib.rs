pub mod error;
pub mod routes;

pub use error::*;
pub use routes::*;

use axum::Router;
use tower_http::trace::TraceLayer;

/// The full HTTP surface with request tracing, ready to serve.
pub fn app(state: AppState) -> Router {
    create_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
