//! Local artifact repository.
//!
//! Installed archives are laid out Maven-style:
//! `<root>/<group path>/<name>/<version>/<name>-<version>.jar`, with a JSON
//! descriptor `<name>-<version>.json` next to the archive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::ProjectConfig;
use crate::consts::ARCHIVE_EXTENSION;
use crate::util::fs::{copy_atomic, write_atomic};

const DESCRIPTOR_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("no local repository location; set JBUILD_REPOSITORY or HOME")]
  NoLocation,

  #[error("artifact {} does not exist", path.display())]
  MissingArtifact { path: PathBuf },

  #[error("failed to create {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy { from: PathBuf, to: PathBuf, source: io::Error },

  #[error("failed to write descriptor {}: {source}", path.display())]
  WriteDescriptor { path: PathBuf, source: io::Error },

  #[error("failed to serialize descriptor: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Metadata written beside an installed archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDescriptor {
  pub descriptor_version: u32,
  pub group_id: String,
  pub name: String,
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub main_class: Option<String>,
  pub modules: Vec<String>,
  pub size_bytes: u64,
  pub installed_at_unix: u64,
}

/// Where an artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledArtifact {
  pub archive: PathBuf,
  pub descriptor: PathBuf,
  pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct LocalRepository {
  root: PathBuf,
}

impl LocalRepository {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory holding one version of an artifact.
  pub fn artifact_dir(&self, config: &ProjectConfig) -> PathBuf {
    let mut dir = self.root.clone();
    dir.extend(config.group_id.split('.').filter(|part| !part.is_empty()));
    dir.join(&config.name).join(&config.version)
  }

  /// Copy `archive` into the repository and record its descriptor.
  ///
  /// Reinstalling the same version replaces the previous files.
  pub fn install(&self, archive: &Path, config: &ProjectConfig) -> Result<InstalledArtifact, RepositoryError> {
    if !archive.is_file() {
      return Err(RepositoryError::MissingArtifact {
        path: archive.to_path_buf(),
      });
    }

    let dir = self.artifact_dir(config);
    fs::create_dir_all(&dir).map_err(|source| RepositoryError::CreateDir {
      path: dir.clone(),
      source,
    })?;

    let target = dir.join(config.artifact_name(ARCHIVE_EXTENSION));
    let size_bytes = copy_atomic(archive, &target).map_err(|source| RepositoryError::Copy {
      from: archive.to_path_buf(),
      to: target.clone(),
      source,
    })?;

    let descriptor = ArtifactDescriptor {
      descriptor_version: DESCRIPTOR_VERSION,
      group_id: config.group_id.clone(),
      name: config.name.clone(),
      version: config.version.clone(),
      main_class: config.main_class.clone(),
      modules: config.modules.clone(),
      size_bytes,
      installed_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0),
    };
    let descriptor_path = dir.join(config.artifact_name("json"));
    let content = serde_json::to_string_pretty(&descriptor)?;
    write_atomic(&descriptor_path, content.as_bytes()).map_err(|source| RepositoryError::WriteDescriptor {
      path: descriptor_path.clone(),
      source,
    })?;

    info!(archive = %target.display(), bytes = size_bytes, "artifact installed");
    Ok(InstalledArtifact {
      archive: target,
      descriptor: descriptor_path,
      size_bytes,
    })
  }
}
