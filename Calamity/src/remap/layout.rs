//! Export and bundle path layout
//!
//! ```text
//! <export>/<folder>/g1m/<asset>.g1m                 model input
//! <export>/KIDSSystemResource/kidsobjdb/<db key>    database input
//! <export>/MaterialEditor/g1t                       shared texture source
//! <export>/<folder>/ktid/<texture>.ktid             KTID tool scratch in
//! <export>/<folder>/ktid/<texture>.g1t              KTID tool scratch out
//! <output>/<folder>/merged/<asset>/                 bundle
//! ```

use std::path::{Path, PathBuf};

use super::folder::EditorFolder;

/// Path layout of one remap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapLayout {
    export_root: PathBuf,
    output_root: PathBuf,
}

impl RemapLayout {
    /// Layout that writes bundles into a separate output root
    pub fn new(export_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Layout that writes bundles back into the export tree
    pub fn in_place(export_root: impl Into<PathBuf>) -> Self {
        let export_root = export_root.into();
        Self {
            output_root: export_root.clone(),
            export_root,
        }
    }

    /// Root of the exporter output
    pub fn export_root(&self) -> &Path {
        &self.export_root
    }

    /// Root bundles are written under
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// `<export>/<folder>/g1m/<asset>.g1m`
    pub fn model_source(&self, folder: EditorFolder, asset_id: &str) -> PathBuf {
        self.export_root
            .join(folder.as_str())
            .join("g1m")
            .join(format!("{asset_id}.g1m"))
    }

    /// `<output>/<folder>/merged/<asset>`
    pub fn bundle_dir(&self, folder: EditorFolder, asset_id: &str) -> PathBuf {
        self.output_root.join(folder.as_str()).join("merged").join(asset_id)
    }

    /// `<export>/KIDSSystemResource/kidsobjdb/<db key>`
    pub fn database_file(&self, database_key: &str) -> PathBuf {
        self.export_root
            .join("KIDSSystemResource")
            .join("kidsobjdb")
            .join(database_key)
    }

    /// `<export>/MaterialEditor/g1t`
    pub fn texture_source_dir(&self) -> PathBuf {
        self.export_root.join("MaterialEditor").join("g1t")
    }

    /// `<export>/<folder>/ktid/<texture>.ktid`
    pub fn scratch_ktid(&self, folder: EditorFolder, texture_key: &str) -> PathBuf {
        self.scratch_dir(folder).join(format!("{texture_key}.ktid"))
    }

    /// `<export>/<folder>/ktid/<texture>.g1t`
    pub fn scratch_g1t(&self, folder: EditorFolder, texture_key: &str) -> PathBuf {
        self.scratch_dir(folder).join(format!("{texture_key}.g1t"))
    }

    fn scratch_dir(&self, folder: EditorFolder) -> PathBuf {
        self.export_root.join(folder.as_str()).join("ktid")
    }
}
