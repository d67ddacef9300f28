//! HTTP handlers for the raga-bgm web front end

pub mod compose;
pub mod downloads;
pub mod health;
pub mod ui;

pub use compose::compose_routes;
pub use downloads::download_routes;
pub use health::health_routes;
pub use ui::ui_routes;
