use std::path::Path;

use strider_format::{Blueprint, parse_str};

use crate::level::{LevelError, Missing};

/// Conventional blueprint file name inside a level directory.
pub const BLUEPRINT_FILE: &str = "level.scene";

/// Supplies a level package with its scene blueprint, keyed by directory.
pub trait SceneProvider {
    fn load_blueprint(&self, dir: &Path) -> Result<Blueprint, LevelError>;
}

/// Reads and parses a blueprint file from the level directory.
#[derive(Debug, Clone)]
pub struct FsSceneProvider {
    file_name: String,
}

impl FsSceneProvider {
    pub fn new() -> Self {
        Self::with_file_name(BLUEPRINT_FILE)
    }

    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self { file_name: file_name.into() }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Default for FsSceneProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneProvider for FsSceneProvider {
    fn load_blueprint(&self, dir: &Path) -> Result<Blueprint, LevelError> {
        let path = dir.join(&self.file_name);
        if !path.is_file() {
            return Err(LevelError::NotFound(Missing::Blueprint(path)));
        }
        let src = std::fs::read_to_string(&path)
            .map_err(|source| LevelError::Io { path: path.clone(), source })?;
        let blueprint =
            parse_str(&src).map_err(|source| LevelError::Blueprint { path: path.clone(), source })?;
        log::debug!("parsed {} ({} nodes)", path.display(), blueprint.node_count());
        Ok(blueprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_configured_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("custom.scene"), "Level { Anchor \"a\" }").unwrap();
        let bp = FsSceneProvider::with_file_name("custom.scene").load_blueprint(dir.path()).unwrap();
        assert_eq!(bp.node_count(), 2);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsSceneProvider::new().load_blueprint(dir.path()).unwrap_err();
        assert!(matches!(err, LevelError::NotFound(Missing::Blueprint(_))));
    }

    #[test]
    fn malformed_file_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BLUEPRINT_FILE), "Level {\n  Anchor \"a\" {\n").unwrap();
        match FsSceneProvider::new().load_blueprint(dir.path()) {
            Err(LevelError::Blueprint { source, .. }) => assert_eq!(source.line, 3),
            other => panic!("unexpected {other:?}"),
        }
    }
}
