use crate::domain::model::PosterRequest;
use crate::domain::ports::PosterPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Drives the pipeline stages for one or many themes.
pub struct PosterEngine<P: PosterPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: PosterPipeline> PosterEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Render one poster and persist it, returning the stored path.
    pub async fn run(&self, request: &PosterRequest) -> Result<String> {
        self.pipeline.check_theme(&request.theme)?;

        tracing::info!("Resolving '{}'...", request.place());
        let center = self.pipeline.locate(request).await?;
        tracing::info!("Center: {:.4}, {:.4}", center.lat, center.lon);
        self.monitor.log_stats("locate");

        tracing::info!("Fetching map data ({}m radius)...", request.distance_m);
        let map = self.pipeline.fetch(center, request.distance_m).await?;
        tracing::info!(
            "Fetched {} road way(s), {} water feature(s)",
            map.roads.len(),
            map.water.len()
        );
        self.monitor.log_stats("fetch");

        tracing::info!("Rendering theme '{}'...", request.theme);
        let png = self.pipeline.render(request, center, &map).await?;
        self.monitor.log_stats("render");

        let path = self.pipeline.store(&request.file_name(), png).await?;
        tracing::info!("Poster saved to {}", path);
        self.monitor.log_final_stats();
        Ok(path)
    }

    /// Render every known theme for the same place. Map data is fetched
    /// once and reused across themes; with `archive` the PNGs are also
    /// bundled into posters.zip.
    pub async fn run_all(&self, base: &PosterRequest, archive: bool) -> Result<Vec<String>> {
        tracing::info!("Resolving '{}'...", base.place());
        let center = self.pipeline.locate(base).await?;
        self.monitor.log_stats("locate");

        tracing::info!("Fetching map data ({}m radius)...", base.distance_m);
        let map = self.pipeline.fetch(center, base.distance_m).await?;
        self.monitor.log_stats("fetch");

        let mut paths = Vec::new();
        let mut rendered: Vec<(String, Vec<u8>)> = Vec::new();

        for theme in self.pipeline.theme_names() {
            tracing::info!("Rendering theme '{}'...", theme);
            let request = PosterRequest {
                theme,
                ..base.clone()
            };
            let png = self.pipeline.render(&request, center, &map).await?;
            let file_name = request.file_name();
            let path = self.pipeline.store(&file_name, png.clone()).await?;
            paths.push(path);
            rendered.push((file_name, png));
            self.monitor.log_stats("render");
        }

        if archive {
            let zip_data = build_archive(&rendered)?;
            tracing::debug!("archive is {} bytes", zip_data.len());
            let path = self.pipeline.store("posters.zip", zip_data).await?;
            paths.push(path);
        }

        self.monitor.log_final_stats();
        Ok(paths)
    }
}

fn build_archive(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
