use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use super::config::AnatomyConfig;
use super::source::ArtifactSource;
use crate::error::HcpError;
use crate::matfile::MatFile;
use crate::mesh::extract_mesh;
use crate::transforms::{parse_transforms, read_ras_transform, CoordFrame, Transform, TransformRecord};

/// Directory below `<out>/<subject>` receiving the artifacts
pub const BEM_DIR: &str = "bem";

/// What a pipeline run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnatomyOutput {
    /// Subject identifier
    pub subject: String,
    /// Head to MRI transform that was written
    pub head_mri: TransformRecord,
    /// Path of the written surface
    pub surface_path: PathBuf,
    /// Path of the written transform record
    pub trans_path: PathBuf,
    /// Vertices in the surface
    pub vertex_count: usize,
    /// Triangles in the surface
    pub face_count: usize,
}

/// Extracts the head-model surface and the head to MRI transform of one
/// subject from its structural and MEG anatomy releases.
#[derive(Debug, Clone, Default)]
pub struct AnatomyPipeline {
    config: AnatomyConfig,
}

impl AnatomyPipeline {
    /// Create a pipeline
    pub fn new(config: AnatomyConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &AnatomyConfig {
        &self.config
    }

    /// Compose `inverse(ras) · table[device_to_structural]`.
    ///
    /// Both inputs are in millimeters; with `convert_to_meter` the
    /// translations are rescaled before composing.
    pub fn head_mri_transform(
        &self,
        ras_text: &str,
        transforms_text: &str,
    ) -> Result<Transform, HcpError> {
        let mut ras = read_ras_transform(ras_text)?;
        if self.config.convert_to_meter {
            ras = ras.to_meters();
        }
        let table = parse_transforms(transforms_text, self.config.convert_to_meter)?;
        let device_to_structural = table.get(&self.config.device_to_structural)?;
        Ok(ras.inverse()? * *device_to_structural)
    }

    /// Run for `subject` and write the artifacts below `output_dir`
    pub fn run(
        &self,
        subject: &str,
        structural: &dyn ArtifactSource,
        meg_anatomy: &dyn ArtifactSource,
        output_dir: &Path,
    ) -> Result<AnatomyOutput, HcpError> {
        info!("Extracting anatomy for subject {}", subject);

        let ras_name = structural.find_suffix(&self.config.ras_suffix, subject)?;
        let transform_name = meg_anatomy.find_suffix(&self.config.transform_suffix, subject)?;
        let headmodel_name = meg_anatomy.find_suffix(&self.config.headmodel_suffix, subject)?;
        debug!(
            "Using {} from {} and {}, {} from {}",
            ras_name,
            structural.describe(),
            transform_name,
            headmodel_name,
            meg_anatomy.describe()
        );

        let ras_text = structural.read_to_string(&ras_name)?;
        let transforms_text = meg_anatomy.read_to_string(&transform_name)?;
        let head_mri = self.head_mri_transform(&ras_text, &transforms_text)?;

        let headmodel = MatFile::from_bytes(&meg_anatomy.read(&headmodel_name)?)?;
        let mut mesh = extract_mesh(&headmodel, None)?;
        mesh.scale(self.config.mesh_scale());
        mesh.transform(&head_mri);
        info!(
            "Head model surface: {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        );

        let bem_dir = output_dir.join(subject).join(BEM_DIR);
        fs::create_dir_all(&bem_dir)?;

        let surface_path = bem_dir.join(&self.config.surface_name);
        mesh.write_off_file(&surface_path)?;

        let record = TransformRecord::new(CoordFrame::Head, CoordFrame::Mri, head_mri);
        let trans_path = bem_dir.join(format!("{}-head_mri-trans.json", subject));
        record.write_json(&trans_path)?;

        info!("Wrote {} and {}", surface_path.display(), trans_path.display());

        Ok(AnatomyOutput {
            subject: subject.to_string(),
            head_mri: record,
            surface_path,
            trans_path,
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
        })
    }
}
