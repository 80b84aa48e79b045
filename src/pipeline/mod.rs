//! Pipeline module - validation, cleaning, splitting, scaling and training

pub mod clean;
pub mod config;
pub mod download;
pub mod error;
pub mod loader;
pub mod model;
pub mod preprocess;
pub mod quality;
pub mod scaler;
pub mod schema;
pub mod split;
pub mod train;

pub use clean::*;
pub use config::*;
pub use download::*;
pub use error::*;
pub use loader::*;
pub use model::{accuracy, feature_matrix, LogisticRegression};
pub use preprocess::*;
pub use quality::*;
pub use scaler::*;
pub use schema::*;
pub use split::*;
pub use train::*;
