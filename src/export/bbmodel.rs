//! Rich dialect: a self-contained Blockbench project.

use super::manager::ModelExporter;
use super::model::{cuboids, DisplayPresets, Faces, DISPLAY_PRESETS};
use super::texture::{pack, ColorAtlas, UvUnits};
use super::uuid::UuidGenerator;
use super::{ExportSettings, ExportedFile, Result};
use crate::voxelization::VoxelGrid;
use serde::{Deserialize, Serialize};

pub const FORMAT_NAME: &str = "bbmodel";
pub const FORMAT_VERSION: &str = "4.5";
pub const MODEL_FORMAT: &str = "java_block";
const TEXTURE_NAME: &str = "texture.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BbMeta {
    pub format_version: String,
    pub model_format: String,
    pub box_uv: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BbResolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BbFace {
    /// Atlas pixels.
    pub uv: [f64; 4],
    /// Index into [`BbModel::textures`].
    pub texture: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BbElement {
    pub uuid: String,
    pub name: String,
    pub box_uv: bool,
    pub from: [f64; 3],
    pub to: [f64; 3],
    pub faces: Faces<BbFace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BbTexture {
    pub uuid: String,
    pub id: String,
    pub name: String,
    /// `data:image/png;base64,...`
    pub source: String,
    pub mode: String,
    pub visible: bool,
    pub width: u32,
    pub height: u32,
    pub uv_width: u32,
    pub uv_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BbModel {
    pub meta: BbMeta,
    pub name: String,
    pub resolution: BbResolution,
    pub elements: Vec<BbElement>,
    /// Element UUIDs in display order.
    pub outliner: Vec<String>,
    pub textures: Vec<BbTexture>,
    pub display: DisplayPresets,
}

/// Build the project for `grid` against a packed `atlas`.
pub fn emit(
    grid: &VoxelGrid,
    atlas: &ColorAtlas,
    settings: &ExportSettings,
    uuids: &mut UuidGenerator,
) -> BbModel {
    let elements: Vec<BbElement> = cuboids(grid, atlas, UvUnits::Pixel)
        .into_iter()
        .enumerate()
        .map(|(i, c)| BbElement {
            uuid: uuids.generate(),
            name: format!("voxel_{}", i),
            box_uv: false,
            from: c.from,
            to: c.to,
            faces: Faces::uniform(BbFace { uv: c.uv, texture: 0 }),
        })
        .collect();
    let outliner = elements.iter().map(|e| e.uuid.clone()).collect();

    let texture = BbTexture {
        uuid: uuids.generate(),
        id: "0".to_string(),
        name: TEXTURE_NAME.to_string(),
        source: atlas.data_url(),
        mode: "bitmap".to_string(),
        visible: true,
        width: atlas.size,
        height: atlas.size,
        uv_width: atlas.size,
        uv_height: atlas.size,
    };

    BbModel {
        meta: BbMeta {
            format_version: FORMAT_VERSION.to_string(),
            model_format: MODEL_FORMAT.to_string(),
            box_uv: false,
        },
        name: settings.name.clone(),
        resolution: BbResolution {
            width: atlas.size,
            height: atlas.size,
        },
        elements,
        outliner,
        textures: vec![texture],
        display: DISPLAY_PRESETS,
    }
}

/// `<name>.bbmodel` for `grid`.
pub fn export(
    grid: &VoxelGrid,
    settings: &ExportSettings,
    uuids: &mut UuidGenerator,
) -> Result<Vec<ExportedFile>> {
    let atlas = pack(&grid.colors());
    let model = emit(grid, &atlas, settings, uuids);
    log::debug!(
        "Exporting {} elements as {} '{}'",
        model.elements.len(),
        FORMAT_NAME,
        model.name
    );

    Ok(vec![ExportedFile::new(
        format!("{}.{}", settings.name, FORMAT_NAME),
        serde_json::to_vec(&model)?,
    )])
}

pub struct BbModelExporter;

impl ModelExporter for BbModelExporter {
    fn name(&self) -> String {
        FORMAT_NAME.to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec![FORMAT_NAME.to_string()]
    }

    fn write(&self, grid: &VoxelGrid) -> Result<Vec<ExportedFile>> {
        export(grid, &ExportSettings::default(), &mut UuidGenerator::new())
    }

    fn write_with_settings(
        &self,
        grid: &VoxelGrid,
        settings: Option<&str>,
    ) -> Result<Vec<ExportedFile>> {
        let settings = ExportSettings::from_json(settings)?;
        export(grid, &settings, &mut UuidGenerator::new())
    }

    fn export_settings_schema(&self) -> Option<String> {
        serde_json::to_string_pretty(&ExportSettings::default()).ok()
    }
}
