use anyhow::{Context, Result, anyhow};
use log::debug;
use rand::seq::IndexedRandom;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with a specific extension directly inside a directory.
    ///
    /// The extension match is case-insensitive; results are sorted by path.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow!("Directory does not exist: {:?}", dir));
        }

        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
            {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Most recently modified file with the given extension
    pub fn newest_file<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Option<PathBuf>> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;

        for path in Self::find_files(dir, extension)? {
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .with_context(|| format!("Failed to read modification time: {:?}", path))?;

            if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }

    /// Uniformly random file with the given extension
    pub fn random_file<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Option<PathBuf>> {
        let candidates = Self::find_files(dir, extension)?;
        debug!("{} candidate .{} file(s)", candidates.len(), extension);
        Ok(candidates.choose(&mut rand::rng()).cloned())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow!("Source file does not exist: {:?}", from));
        }

        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;

        Ok(())
    }

    /// Directory handed to the subtitle renderer for font lookup.
    ///
    /// Uses the configured directory when it exists, otherwise the
    /// platform font directory, otherwise the configured path unchanged.
    pub fn resolve_fonts_dir<P: AsRef<Path>>(configured: P) -> PathBuf {
        let configured = configured.as_ref();
        if Self::dir_exists(configured) {
            return configured.to_path_buf();
        }

        match dirs::font_dir().filter(|d| Self::dir_exists(d)) {
            Some(system) => {
                debug!("Fonts dir {:?} not found, using {:?}", configured, system);
                system
            }
            None => configured.to_path_buf(),
        }
    }
}
