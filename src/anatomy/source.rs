use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::HcpError;

/// A set of files the pipeline can list and read whole.
///
/// Entry names are relative paths with `/` separators, as stored in an
/// HCP release archive.
pub trait ArtifactSource: Send + Sync {
    /// All entry names, sorted
    fn list(&self) -> Result<Vec<String>, HcpError>;

    /// Full contents of one entry
    fn read(&self, name: &str) -> Result<Vec<u8>, HcpError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;

    /// First entry whose name ends with `suffix`
    fn find_suffix(&self, suffix: &str, subject: &str) -> Result<String, HcpError> {
        self.list()?
            .into_iter()
            .find(|name| name.ends_with(suffix))
            .ok_or_else(|| HcpError::missing_artifact(subject, suffix))
    }

    /// Contents of an entry as UTF-8 text
    fn read_to_string(&self, name: &str) -> Result<String, HcpError> {
        let bytes = self.read(name)?;
        String::from_utf8(bytes).map_err(|e| HcpError::invalid_value(name, e.to_string()))
    }
}

/// An unpacked release directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve the files below `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn collect(&self, dir: &Path, out: &mut Vec<String>) -> Result<(), HcpError> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.collect(&path, out)?;
            } else if let Ok(relative) = path.strip_prefix(&self.root) {
                let name: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                out.push(name.join("/"));
            }
        }
        Ok(())
    }
}

impl ArtifactSource for DirectorySource {
    fn list(&self) -> Result<Vec<String>, HcpError> {
        let mut names = Vec::new();
        self.collect(&self.root, &mut names)?;
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, HcpError> {
        Ok(fs::read(self.root.join(name))?)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// A release ZIP archive, re-opened for each access
#[derive(Debug, Clone)]
pub struct ZipSource {
    path: PathBuf,
}

impl ZipSource {
    /// Serve the entries of the archive at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn archive(&self) -> Result<ZipArchive<BufReader<File>>, HcpError> {
        let file = File::open(&self.path)?;
        Ok(ZipArchive::new(BufReader::new(file))?)
    }
}

impl ArtifactSource for ZipSource {
    fn list(&self) -> Result<Vec<String>, HcpError> {
        let archive = self.archive()?;
        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, HcpError> {
        let mut archive = self.archive()?;
        let mut entry = archive.by_name(name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Open a directory or a `.zip` archive as a source
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn ArtifactSource>, HcpError> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(Box::new(DirectorySource::new(path)));
    }
    if !path.is_file() {
        return Err(HcpError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }
    Ok(Box::new(ZipSource::new(path)))
}
