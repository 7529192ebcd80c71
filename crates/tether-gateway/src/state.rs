use std::sync::Arc;

use tether_core::{Persistence, SystemClock};
use tether_engine::ResolutionService;
use tether_generator::RandomGenerator;

/// The engine as the gateway runs it: any persistence backend, random codes,
/// wall-clock time.
pub type Engine = ResolutionService<Box<dyn Persistence>, RandomGenerator, SystemClock>;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
    base_url: String,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, public_base_url: impl Into<String>) -> Self {
        Self {
            engine,
            base_url: public_base_url.into(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
