use super::bbmodel::BbModelExporter;
use super::java_block::JavaBlockExporter;
use super::{ExportError, ExportedFile, Result};
use crate::voxelization::VoxelGrid;
use std::sync::{Arc, Mutex, OnceLock};

pub trait ModelExporter: Send + Sync {
    fn name(&self) -> String;
    fn extensions(&self) -> Vec<String>;
    fn write(&self, grid: &VoxelGrid) -> Result<Vec<ExportedFile>>;
    fn write_with_settings(
        &self,
        grid: &VoxelGrid,
        settings: Option<&str>,
    ) -> Result<Vec<ExportedFile>> {
        let _ = settings;
        self.write(grid)
    }
    fn export_settings_schema(&self) -> Option<String> {
        None
    }
}

#[derive(Default)]
pub struct ExportManager {
    exporters: Vec<Box<dyn ModelExporter>>,
}

impl ExportManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager with both built-in dialects registered.
    pub fn with_builtin() -> Self {
        let mut manager = Self::new();
        manager.register_exporter(JavaBlockExporter);
        manager.register_exporter(BbModelExporter);
        manager
    }

    pub fn register_exporter<E: ModelExporter + 'static>(&mut self, exporter: E) {
        self.exporters.push(Box::new(exporter));
    }

    fn find(&self, format: &str) -> Option<&dyn ModelExporter> {
        self.exporters
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(format))
            .map(|e| &**e)
    }

    fn find_by_extension(&self, path: &str) -> Result<&dyn ModelExporter> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.exporters
            .iter()
            .find(|e| e.extensions().contains(&extension))
            .map(|e| &**e)
            .ok_or_else(|| {
                ExportError::UnsupportedFormat(format!(
                    "could not determine format from extension: .{}",
                    extension
                ))
            })
    }

    pub fn write(&self, format: &str, grid: &VoxelGrid) -> Result<Vec<ExportedFile>> {
        self.write_with_settings(format, grid, None)
    }

    pub fn write_with_settings(
        &self,
        format: &str,
        grid: &VoxelGrid,
        settings: Option<&str>,
    ) -> Result<Vec<ExportedFile>> {
        let exporter = self
            .find(format)
            .ok_or_else(|| ExportError::UnsupportedFormat(format.to_string()))?;
        exporter.write_with_settings(grid, settings)
    }

    pub fn write_auto(&self, path: &str, grid: &VoxelGrid) -> Result<Vec<ExportedFile>> {
        self.find_by_extension(path)?.write(grid)
    }

    pub fn write_auto_with_settings(
        &self,
        path: &str,
        grid: &VoxelGrid,
        settings: Option<&str>,
    ) -> Result<Vec<ExportedFile>> {
        self.find_by_extension(path)?.write_with_settings(grid, settings)
    }

    pub fn list_exporters(&self) -> Vec<String> {
        self.exporters.iter().map(|e| e.name()).collect()
    }

    pub fn get_export_settings_schema(&self, format: &str) -> Option<String> {
        self.find(format)?.export_settings_schema()
    }
}

pub static MANAGER: OnceLock<Arc<Mutex<ExportManager>>> = OnceLock::new();

pub fn get_manager() -> Arc<Mutex<ExportManager>> {
    MANAGER
        .get_or_init(|| Arc::new(Mutex::new(ExportManager::with_builtin())))
        .clone()
}
