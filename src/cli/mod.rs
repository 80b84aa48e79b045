//! CLI module - argument parsing and one runner per pipeline stage

mod args;
pub mod download;
pub mod eda;
pub mod preprocess;
pub mod train;

pub use args::{Cli, Commands};
pub use download::run_download;
pub use eda::run_eda;
pub use preprocess::run_preprocess;
pub use train::{run_train, TrainPaths};
