//! Voxel grid export to block-model documents.
//!
//! Two dialects share one geometry path ([`model::cuboids`]) and differ only in
//! serialization:
//!
//! - [`Dialect::JavaBlock`]: a flat block model (`model.json`) referencing a
//!   separate `texture.png` by slot name.
//! - [`Dialect::BbModel`]: a self-contained `.bbmodel` project with per-element
//!   UUIDs and the atlas inlined as a base64 data URL.

pub mod bbmodel;
pub mod java_block;
pub mod manager;
pub mod model;
pub mod texture;
pub mod uuid;

pub use bbmodel::{BbModel, BbModelExporter};
pub use java_block::{JavaBlockExporter, JavaBlockModel};
pub use manager::{get_manager, ExportManager, ModelExporter};
pub use model::{cuboid_bounds, cuboids, Cuboid, FaceDirection};
pub use texture::{pack, ColorAtlas, UvUnits};
pub use uuid::UuidGenerator;

use crate::voxelization::VoxelGrid;
use serde::{Deserialize, Serialize};

/// Attribution written into every flat-dialect model.
pub const DEFAULT_CREDIT: &str = "Created with Blockbench Converter";

/// Error type for export operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid export settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Output serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `model.json` + `texture.png`.
    #[default]
    JavaBlock,
    /// Single `.bbmodel` document with the texture inlined.
    #[serde(rename = "bbmodel")]
    BbModel,
}

impl Dialect {
    /// Exporter name under which the dialect is registered.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::JavaBlock => java_block::FORMAT_NAME,
            Dialect::BbModel => bbmodel::FORMAT_NAME,
        }
    }
}

/// One artifact produced by an exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Per-export settings, parsed from an optional JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Model name; also the `.bbmodel` file stem.
    pub name: String,
    pub credit: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            name: "model".to_string(),
            credit: DEFAULT_CREDIT.to_string(),
        }
    }
}

impl ExportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_credit(mut self, credit: impl Into<String>) -> Self {
        self.credit = credit.into();
        self
    }

    /// Parse settings; `None` gives the defaults.
    pub fn from_json(settings: Option<&str>) -> Result<Self> {
        let settings = match settings {
            Some(s) => serde_json::from_str::<Self>(s)
                .map_err(|e| ExportError::InvalidSettings(e.to_string()))?,
            None => Self::default(),
        };
        if settings.name.trim().is_empty() {
            return Err(ExportError::InvalidSettings("name must not be empty".into()));
        }
        Ok(settings)
    }
}

/// Export `grid` in `dialect`.
pub fn export(
    grid: &VoxelGrid,
    dialect: Dialect,
    settings: &ExportSettings,
) -> Result<Vec<ExportedFile>> {
    match dialect {
        Dialect::JavaBlock => java_block::export(grid, settings),
        Dialect::BbModel => bbmodel::export(grid, settings, &mut UuidGenerator::new()),
    }
}
