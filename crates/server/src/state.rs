use std::sync::Arc;

use service::storage::FreelancerStore;

/// Shared router state. The store is chosen once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FreelancerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn FreelancerStore>) -> Self {
        Self { store }
    }
}
