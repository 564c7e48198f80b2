use crate::adapters::http::{DatasetCache, DatasetClient};
use crate::adapters::render::{render_html, render_summary_csv, RenderOptions};
use crate::core::routes::build_route_map;
use crate::core::{ConfigProvider, Datasets, Pipeline, RouteMap, Storage};
use crate::utils::error::Result;
use std::time::Duration;

/// Fetches the OpenFlights tables, extracts one airline and writes the HTML map.
pub struct RouteMapPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: DatasetClient,
}

impl<S: Storage, C: ConfigProvider> RouteMapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let mut client = DatasetClient::new();
        if let Some(dir) = config.cache_dir() {
            client = client.with_cache(DatasetCache::new(dir));
        }
        if let Some(seconds) = config.timeout_seconds() {
            client = client.with_timeout(Duration::from_secs(seconds));
        }

        Self {
            storage,
            config,
            client,
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            tile_url: self.config.tile_url().map(str::to_string),
            ..RenderOptions::default()
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RouteMapPipeline<S, C> {
    async fn extract(&self) -> Result<Datasets> {
        // 依序下載，任一失敗就整個中止
        let airports = self.client.fetch_airports(self.config.airports_url()).await?;
        let routes = self.client.fetch_routes(self.config.routes_url()).await?;
        let airlines = self.client.fetch_airlines(self.config.airlines_url()).await?;

        Ok(Datasets {
            airports,
            routes,
            airlines,
        })
    }

    async fn transform(&self, data: Datasets) -> Result<RouteMap> {
        build_route_map(&data, &self.config.airline(), self.config.arc_points())
    }

    async fn load(&self, result: RouteMap) -> Result<String> {
        let html = render_html(&result, &self.render_options());
        let summary = match self.config.summary_csv_path() {
            Some(csv_path) => Some((csv_path, render_summary_csv(&result.visited)?)),
            None => None,
        };

        // 地圖最後寫入：摘要寫失敗時不留下新的 HTML
        if let Some((csv_path, csv)) = &summary {
            self.storage.write_file(csv_path, csv).await?;
            tracing::info!("📄 Airport summary saved to: {}", csv_path);
        }

        tracing::debug!(
            "Writing {} bytes of HTML to {}",
            html.len(),
            self.config.output_path()
        );
        self.storage
            .write_file(self.config.output_path(), html.as_bytes())
            .await?;

        Ok(self.config.output_path().to_string())
    }
}
