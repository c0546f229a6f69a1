pub mod actions;
pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod state;
pub mod status;
pub mod store;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use state::AppState;
