use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::StageMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitoring: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitoring: false,
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitoring: bool) -> Self {
        Self {
            pipeline,
            monitoring,
        }
    }

    pub async fn run(&self) -> Result<String> {
        let mut monitor = StageMonitor::new(self.monitoring);
        tracing::info!("Starting ETL process...");

        // Extract
        tracing::info!("Fetching datasets...");
        let datasets = self.pipeline.extract().await?;
        monitor.finish_stage("extract");

        // Transform
        tracing::info!("Building route map...");
        let route_map = self.pipeline.transform(datasets).await?;
        tracing::info!(
            "Mapped {} routes across {} airports",
            route_map.routes.len(),
            route_map.visited.len()
        );
        monitor.finish_stage("transform");

        // Load
        tracing::info!("Rendering map...");
        let output_path = self.pipeline.load(route_map).await?;
        monitor.finish_stage("load");
        monitor.log_final_stats();

        Ok(output_path)
    }
}
