//! End-to-end tests of the anatomy extraction pipeline
//!
//! Subjects are laid out the way the HCP releases unpack, once as plain
//! directories and once as ZIP archives.

mod common;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use glam::DVec3;
use hcpmeg::anatomy::{open_source, AnatomyConfig, AnatomyPipeline, DirectorySource, ZipSource};
use hcpmeg::matfile::MatFile;
use hcpmeg::mesh::extract_mesh;
use hcpmeg::transforms::{CoordFrame, TransformRecord};
use hcpmeg::HcpError;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const SUBJECT: &str = "100307";

fn structural_entries() -> Vec<(String, Vec<u8>)> {
    vec![(
        format!("{0}/T1w/{0}/mri/c_ras.mat", SUBJECT),
        common::C_RAS.as_bytes().to_vec(),
    )]
}

fn meg_anatomy_entries() -> Vec<(String, Vec<u8>)> {
    vec![
        (
            format!("{0}/MEG/anatomy/{0}_MEG_anatomy_transform.txt", SUBJECT),
            common::TRANSFORM_TXT.as_bytes().to_vec(),
        ),
        (
            format!("{0}/MEG/anatomy/{0}_MEG_anatomy_headmodel.mat", SUBJECT),
            common::headmodel_mat(),
        ),
    ]
}

fn write_tree(root: &Path, entries: &[(String, Vec<u8>)]) {
    for (name, bytes) in entries {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }
}

fn write_zip(path: &Path, entries: &[(String, Vec<u8>)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// Expected position of a head-model vertex given in millimeters:
/// bti2spm adds (10, 20, 30) mm, the inverse RAS offset subtracts 5 mm.
fn expected_vertex(mm: DVec3) -> DVec3 {
    (mm + DVec3::new(10.0, 20.0, 30.0) - DVec3::splat(5.0)) / 1000.0
}

fn read_off(path: &Path) -> (Vec<DVec3>, Vec<[u32; 3]>) {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("OFF"));
    let counts: Vec<usize> = lines
        .next()
        .unwrap()
        .split_whitespace()
        .map(|t| t.parse().unwrap())
        .collect();
    let points = (0..counts[0])
        .map(|_| {
            let v: Vec<f64> = lines
                .next()
                .unwrap()
                .split_whitespace()
                .map(|t| t.parse().unwrap())
                .collect();
            DVec3::new(v[0], v[1], v[2])
        })
        .collect();
    let faces = (0..counts[1])
        .map(|_| {
            let v: Vec<u32> = lines
                .next()
                .unwrap()
                .split_whitespace()
                .map(|t| t.parse().unwrap())
                .collect();
            assert_eq!(v[0], 3);
            [v[1], v[2], v[3]]
        })
        .collect();
    (points, faces)
}

fn check_outputs(out: &Path) {
    let bem = out.join(SUBJECT).join("bem");
    let (points, faces) = read_off(&bem.join("inner_skull.off"));

    assert_eq!(points.len(), 4);
    assert!((points[0] - expected_vertex(DVec3::ZERO)).length() < 1e-12);
    assert!((points[3] - expected_vertex(DVec3::new(0.0, 0.0, 10.0))).length() < 1e-12);
    assert_eq!(faces, vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]);

    let record =
        TransformRecord::read_json(bem.join(format!("{}-head_mri-trans.json", SUBJECT))).unwrap();
    assert_eq!(record.from, CoordFrame::Head);
    assert_eq!(record.to, CoordFrame::Mri);
    assert!((record.trans.translation() - DVec3::new(0.005, 0.015, 0.025)).length() < 1e-15);
}

#[test]
fn test_pipeline_from_directories() {
    let structural = tempdir().unwrap();
    let meg = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_tree(structural.path(), &structural_entries());
    write_tree(meg.path(), &meg_anatomy_entries());

    let output = AnatomyPipeline::new(AnatomyConfig::default())
        .run(
            SUBJECT,
            &DirectorySource::new(structural.path()),
            &DirectorySource::new(meg.path()),
            out.path(),
        )
        .unwrap();

    assert_eq!(output.vertex_count, 4);
    assert_eq!(output.face_count, 4);
    assert!(output.surface_path.ends_with("100307/bem/inner_skull.off"));
    check_outputs(out.path());
}

#[test]
fn test_pipeline_from_zip_archives() {
    let dir = tempdir().unwrap();
    let structural = dir.path().join(format!("{}_3T_Structural_preproc.zip", SUBJECT));
    let meg = dir.path().join(format!("{}_MEG_anatomy.zip", SUBJECT));
    write_zip(&structural, &structural_entries());
    write_zip(&meg, &meg_anatomy_entries());

    let out = dir.path().join("subjects");
    AnatomyPipeline::default()
        .run(
            SUBJECT,
            &ZipSource::new(&structural),
            open_source(&meg).unwrap().as_ref(),
            &out,
        )
        .unwrap();

    check_outputs(&out);
}

#[test]
fn test_pipeline_in_millimeters() {
    let structural = tempdir().unwrap();
    let meg = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_tree(structural.path(), &structural_entries());
    write_tree(meg.path(), &meg_anatomy_entries());

    let config = AnatomyConfig {
        convert_to_meter: false,
        ..AnatomyConfig::default()
    };
    let output = AnatomyPipeline::new(config)
        .run(
            SUBJECT,
            &DirectorySource::new(structural.path()),
            &DirectorySource::new(meg.path()),
            out.path(),
        )
        .unwrap();

    assert_eq!(output.head_mri.trans.translation(), DVec3::new(5.0, 15.0, 25.0));
    let (points, _) = read_off(&output.surface_path);
    assert_eq!(points[1], DVec3::new(15.0, 15.0, 25.0));
}

#[test]
fn test_missing_headmodel_names_subject() {
    let structural = tempdir().unwrap();
    let meg = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_tree(structural.path(), &structural_entries());
    write_tree(meg.path(), &meg_anatomy_entries()[..1]);

    let err = AnatomyPipeline::default()
        .run(
            SUBJECT,
            &DirectorySource::new(structural.path()),
            &DirectorySource::new(meg.path()),
            out.path(),
        )
        .unwrap_err();
    match err {
        HcpError::MissingArtifact { subject, artifact } => {
            assert_eq!(subject, SUBJECT);
            assert_eq!(artifact, "_MEG_anatomy_headmodel.mat");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extract_mesh_from_fixture() {
    let mat = MatFile::from_bytes(&common::headmodel_mat()).unwrap();
    let mesh = extract_mesh(&mat, None).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.points[2], DVec3::new(0.0, 10.0, 0.0));
    assert!(mesh
        .faces
        .iter()
        .flatten()
        .all(|&index| (index as usize) < mesh.vertex_count()));
}
