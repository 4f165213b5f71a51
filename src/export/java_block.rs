//! Flat dialect: a block model JSON plus a separate texture file.

use super::manager::ModelExporter;
use super::model::{cuboids, DisplayPresets, Faces, DISPLAY_PRESETS};
use super::texture::{pack, ColorAtlas, UvUnits};
use super::{ExportSettings, ExportedFile, Result};
use crate::voxelization::VoxelGrid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FORMAT_NAME: &str = "java_block";
pub const MODEL_FILE: &str = "model.json";
pub const TEXTURE_FILE: &str = "texture.png";
/// Texture slot every face refers to.
pub const TEXTURE_SLOT: &str = "texture";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JavaFace {
    pub uv: [f64; 4],
    /// Slot reference, `#<slot>`.
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JavaElement {
    pub from: [f64; 3],
    pub to: [f64; 3],
    pub faces: Faces<JavaFace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JavaBlockModel {
    pub credit: String,
    pub textures: BTreeMap<String, String>,
    pub elements: Vec<JavaElement>,
    pub display: DisplayPresets,
}

/// Build the flat model for `grid` against a packed `atlas`.
pub fn emit(grid: &VoxelGrid, atlas: &ColorAtlas, settings: &ExportSettings) -> JavaBlockModel {
    let slot_ref = format!("#{}", TEXTURE_SLOT);
    let elements = cuboids(grid, atlas, UvUnits::Block)
        .into_iter()
        .map(|c| JavaElement {
            from: c.from,
            to: c.to,
            faces: Faces::uniform(JavaFace {
                uv: c.uv,
                texture: slot_ref.clone(),
            }),
        })
        .collect();

    let mut textures = BTreeMap::new();
    textures.insert(TEXTURE_SLOT.to_string(), TEXTURE_FILE.to_string());

    JavaBlockModel {
        credit: settings.credit.clone(),
        textures,
        elements,
        display: DISPLAY_PRESETS,
    }
}

/// `model.json` and `texture.png` for `grid`.
pub fn export(grid: &VoxelGrid, settings: &ExportSettings) -> Result<Vec<ExportedFile>> {
    let atlas = pack(&grid.colors());
    let model = emit(grid, &atlas, settings);
    log::debug!(
        "Exporting {} elements as {} ({}x{} texture)",
        model.elements.len(),
        FORMAT_NAME,
        atlas.size,
        atlas.size
    );

    Ok(vec![
        ExportedFile::new(MODEL_FILE, serde_json::to_vec_pretty(&model)?),
        ExportedFile::new(TEXTURE_FILE, atlas.encode_png()),
    ])
}

pub struct JavaBlockExporter;

impl ModelExporter for JavaBlockExporter {
    fn name(&self) -> String {
        FORMAT_NAME.to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec!["json".to_string()]
    }

    fn write(&self, grid: &VoxelGrid) -> Result<Vec<ExportedFile>> {
        export(grid, &ExportSettings::default())
    }

    fn write_with_settings(
        &self,
        grid: &VoxelGrid,
        settings: Option<&str>,
    ) -> Result<Vec<ExportedFile>> {
        export(grid, &ExportSettings::from_json(settings)?)
    }

    fn export_settings_schema(&self) -> Option<String> {
        serde_json::to_string_pretty(&ExportSettings::default()).ok()
    }
}
