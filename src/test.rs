pub use axum_test::TestServer;
pub use serde_json::json;

use std::sync::Arc;

use crate::{router, service::Service, store::MemoryStore};

/// A test server over a fresh in-memory store.
pub fn app() -> TestServer {
	let service = Service::new(Arc::new(MemoryStore::default()));

	TestServer::new(router(service)).expect("failed to start test server")
}
