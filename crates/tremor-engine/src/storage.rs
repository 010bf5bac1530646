//! JSON reader/writer for the tremor registry file.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::types::{TremorError, TremorRegistry, TremorResult};

/// Writer for registry files.
pub struct RegistryWriter;

/// Reader for registry files.
pub struct RegistryReader;

impl RegistryWriter {
    /// Write the registry to a file.
    ///
    /// The document is written to a sibling temp file and renamed into place, so readers
    /// never observe a half-written registry.
    pub fn write_to_file(registry: &TremorRegistry, path: &Path) -> TremorResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        replace_via_temp(path, |file| Self::write_to(registry, file))
    }

    /// Write the registry as indented JSON to any writer.
    pub fn write_to<W: Write>(registry: &TremorRegistry, writer: &mut W) -> TremorResult<()> {
        serde_json::to_writer_pretty(&mut *writer, registry)
            .map_err(|e| TremorError::Storage(format!("Serialization failed: {e}")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl RegistryReader {
    /// Read a registry from a file.
    pub fn read_from_file(path: &Path) -> TremorResult<TremorRegistry> {
        let mut file = std::fs::File::open(path)?;
        Self::read_from(&mut file)
    }

    /// Read a registry from any reader.
    pub fn read_from<R: Read>(reader: &mut R) -> TremorResult<TremorRegistry> {
        let mut registry: TremorRegistry = serde_json::from_reader(reader)
            .map_err(|e| TremorError::Storage(format!("Deserialization failed: {e}")))?;
        registry.refresh_summary();
        Ok(registry)
    }
}

/// Write `path` through a sibling temp file that is renamed into place. The temp file
/// is removed on every failure path.
fn replace_via_temp<F>(path: &Path, write: F) -> TremorResult<()>
where
    F: FnOnce(&mut std::fs::File) -> TremorResult<()>,
{
    let tmp_path = temp_path(path);

    let written = std::fs::File::create(&tmp_path)
        .map_err(TremorError::from)
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all()?;
            Ok(())
        });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        TremorError::Storage(format!("Failed to replace {}: {e}", path.display()))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "registry.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
