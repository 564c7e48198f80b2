pub mod etl;
pub mod geometry;
pub mod pipeline;
pub mod routes;

pub use crate::domain::model::{Datasets, RouteMap};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
