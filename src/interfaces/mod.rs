pub mod presenter;
pub mod shell;
pub mod view_models;

pub use presenter::{OutputFormat, Presenter};
