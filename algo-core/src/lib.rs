pub mod algorithms;
pub mod config;
pub mod error;
pub mod model;
pub mod value;

pub use config::ServiceConfig;
pub use error::AlgoError;
pub use model::Algorithm;
pub use value::{Comparable, NodeId};
