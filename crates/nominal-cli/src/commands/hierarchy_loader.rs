use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use nominal_lib::TypeHierarchy;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest '{}': {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Hierarchy(#[from] nominal_lib::Error),
}

/// Read a manifest (`-` for stdin) and build a finalized hierarchy from it.
pub fn load_hierarchy(path: &Path) -> Result<TypeHierarchy, LoadError> {
    let content = read_manifest(path)?;
    let decls = nominal_core::parse_manifest(&content).map_err(|source| LoadError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;

    let hierarchy = TypeHierarchy::from_manifest(&decls)?;
    tracing::debug!(path = %path.display(), types = hierarchy.len(), "hierarchy loaded");
    Ok(hierarchy)
}

fn read_manifest(path: &Path) -> Result<String, LoadError> {
    let read_error = |source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_error)?;
        return Ok(buf);
    }

    fs::read_to_string(path).map_err(read_error)
}
