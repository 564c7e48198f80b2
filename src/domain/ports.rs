use crate::domain::model::{AirlineSelector, Datasets, RouteMap};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn airline(&self) -> AirlineSelector;
    fn airports_url(&self) -> &str;
    fn routes_url(&self) -> &str;
    fn airlines_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn summary_csv_path(&self) -> Option<&str>;
    fn arc_points(&self) -> usize;
    /// `None` renders the map without background tiles.
    fn tile_url(&self) -> Option<&str>;
    fn cache_dir(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Datasets>;
    async fn transform(&self, data: Datasets) -> Result<RouteMap>;
    async fn load(&self, result: RouteMap) -> Result<String>;
}
