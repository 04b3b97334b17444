pub mod intake;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

/// The intake contract, served at the root and at the hosted script's `/exec` path.
pub fn intake_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/",
            get(intake::get_record)
                .post(intake::post_record)
                .options(intake::options_record),
        )
        .route(
            "/exec",
            get(intake::get_record)
                .post(intake::post_record)
                .options(intake::options_record),
        )
}
