pub mod app;
mod config;
mod effects;

pub use app::run;
