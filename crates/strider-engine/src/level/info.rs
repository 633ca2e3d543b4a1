use std::path::{Path, PathBuf};

use strider_format::MetadataRecord;
use strider_format::info::INFO_FILE;

use super::{LevelError, Missing};

/// Alternate metadata file recognized but not implemented.
pub const INFO_JSON_FILE: &str = "info.json";

/// On-storage metadata encodings.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MetadataFormat {
    Text,
    Json,
}

impl MetadataFormat {
    /// Finds the metadata file in `dir`. `info.txt` wins when both exist.
    pub fn locate(dir: &Path) -> Result<(PathBuf, MetadataFormat), LevelError> {
        let text = dir.join(INFO_FILE);
        if text.is_file() {
            return Ok((text, MetadataFormat::Text));
        }
        let json = dir.join(INFO_JSON_FILE);
        if json.is_file() {
            return Ok((json, MetadataFormat::Json));
        }
        Err(LevelError::NotFound(Missing::Metadata(dir.to_path_buf())))
    }
}

/// Typed view of a level's metadata record.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelInfo {
    pub name: String,
    pub creators: Vec<String>,
    pub difficulty: Option<f32>,
    pub difficulty_label: Option<String>,
    pub record: MetadataRecord,
}

impl LevelInfo {
    /// Builds the typed view. `fallback_name` is used when the record has
    /// neither `full_name` nor `name`.
    pub fn from_record(record: MetadataRecord, fallback_name: &str) -> Self {
        let name = record
            .get("full_name")
            .or_else(|| record.get("name"))
            .unwrap_or(fallback_name)
            .to_string();
        let creators = record
            .get("creators")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let difficulty = record.get_parsed("difficulty");
        let difficulty_label = record.get("difficulty_name").map(str::to_string);

        Self { name, creators, difficulty, difficulty_label, record }
    }

    /// Reads the metadata of the level stored in `dir`.
    pub fn load(dir: &Path) -> Result<Self, LevelError> {
        let (path, format) = MetadataFormat::locate(dir)?;
        if format == MetadataFormat::Json {
            return Err(LevelError::Unsupported(format!("JSON metadata ({})", path.display())));
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|source| LevelError::Io { path: path.clone(), source })?;

        let fallback = dir.file_name().and_then(|n| n.to_str()).unwrap_or("untitled");
        Ok(Self::from_record(MetadataRecord::parse(&text), fallback))
    }
}
