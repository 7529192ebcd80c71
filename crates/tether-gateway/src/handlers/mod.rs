mod analytics;
mod health;
mod url;

pub use analytics::analytics_handler;
pub use health::health_handler;
pub use url::{
    create_url_handler, deactivate_shorten_handler, deactivate_url_handler,
    redirect_handler, redirect_shorten_handler,
};
