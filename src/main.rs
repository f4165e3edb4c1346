#![warn(clippy::pedantic)]

mod error;
mod extract;
mod model;
mod route;
mod service;
mod store;
#[cfg(test)]
mod test;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use service::Service;
use store::PgStore;

pub use error::Error;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access.
/// Here that is only the mutation service, which itself wraps the store.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub service: Service,
}

pub type AppState = State;

fn router(service: Service) -> Router {
	Router::new()
		.nest("/users", route::users::routes())
		.nest("/tweets", route::tweets::routes())
		.nest("/follows", route::follows::routes())
		.layer(TraceLayer::new_for_http())
		.with_state(State { service })
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let pool = sqlx::PgPool::connect(
		&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
	)
	.await
	.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&pool)
		.await
		.expect("failed to run migrations");

	let app = router(Service::new(Arc::new(PgStore::new(pool))));

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(listener, app).await.unwrap();
}
