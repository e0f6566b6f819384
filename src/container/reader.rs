//! ZF3D container reader.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use smallvec::SmallVec;
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

use super::format::{vertex_entry_name, SCENE_ENTRY};
use super::source::ContainerSource;
use crate::document::parse_document;
use crate::scene::{Attribute, SceneModel};
use crate::util::{ContainerError, DecodeError, Result};
use crate::vertex;

/// Upper bound of the deflate expansion ratio.
const MAX_INFLATE_RATIO: u64 = 1032;

/// Options controlling how a container is read.
#[derive(Clone, Debug)]
pub struct ReadOptions {
    /// Attributes to keep in decoded buffers. POSITION is always kept.
    pub retain: Vec<Attribute>,
    /// Memory-map files instead of reading them into memory.
    pub use_mmap: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            retain: Attribute::ALL.to_vec(),
            use_mmap: cfg!(feature = "mmap"),
        }
    }
}

impl ReadOptions {
    /// Options that keep positions only.
    pub fn positions_only() -> Self {
        Self {
            retain: vec![Attribute::Position],
            ..Self::default()
        }
    }

    fn retained(&self) -> SmallVec<[Attribute; 4]> {
        let mut retain: SmallVec<[Attribute; 4]> = SmallVec::from_slice(&self.retain);
        if !retain.contains(&Attribute::Position) {
            retain.push(Attribute::Position);
        }
        retain
    }
}

/// Why one surface has no buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// No `<index>.vertex` entry, and no node draws the surface
    #[error("vertex stream entry is missing")]
    MissingStream,

    /// Stream exists but failed to decode
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Outcome of decoding one surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceReport {
    /// Position of the surface in the document.
    pub index: usize,
    pub id: String,
    /// Archive entry the stream was read from.
    pub entry: String,
    /// Vertex count on success.
    pub outcome: std::result::Result<usize, SurfaceError>,
}

impl SurfaceReport {
    /// Check if the surface decoded.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// A read container: the model plus one report per surface.
///
/// Surfaces that failed have no entry in `model.buffers`; their reports
/// say why.
#[derive(Clone, Debug)]
pub struct ContainerRead {
    pub model: SceneModel,
    pub surfaces: Vec<SurfaceReport>,
}

impl ContainerRead {
    /// Check if every surface decoded.
    pub fn is_complete(&self) -> bool {
        self.surfaces.iter().all(SurfaceReport::is_ok)
    }

    /// Reports of surfaces that failed.
    pub fn failures(&self) -> impl Iterator<Item = &SurfaceReport> {
        self.surfaces.iter().filter(|r| !r.is_ok())
    }

    /// The model, or the first surface failure as an error.
    pub fn into_complete(self) -> Result<SceneModel> {
        if let Some(report) = self.surfaces.into_iter().find(|r| !r.is_ok()) {
            return Err(match report.outcome {
                Err(SurfaceError::Decode(source)) => ContainerError::Surface {
                    surface: report.id,
                    source,
                },
                _ => ContainerError::MissingVertexStream {
                    surface: report.id,
                    entry: report.entry,
                },
            });
        }
        Ok(self.model)
    }
}

/// Read a container file with default options.
pub fn read_container(path: impl AsRef<Path>) -> Result<ContainerRead> {
    read_container_opts(path, &ReadOptions::default())
}

/// Read a container file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_container_opts(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<ContainerRead> {
    let source = ContainerSource::open_opts(path, opts.use_mmap)?;
    tracing::debug!(size = source.size(), mapped = source.is_mapped(), "opened container");
    read_container_bytes(source.bytes(), opts)
}

/// Read a container already in memory.
pub fn read_container_bytes(bytes: &[u8], opts: &ReadOptions) -> Result<ContainerRead> {
    if bytes.is_empty() {
        return Err(ContainerError::NotAContainer("input is empty".into()));
    }
    read_container_from(Cursor::new(bytes), opts)
}

/// Read a container from any seekable reader.
pub fn read_container_from<R: Read + Seek>(mut reader: R, opts: &ReadOptions) -> Result<ContainerRead> {
    let archive_len = reader.seek(SeekFrom::End(0))?;
    reader.rewind()?;

    let mut archive = open_archive(reader)?;
    tracing::debug!(entries = archive.len(), archive_len, "zip directory read");

    let scene = read_entry(&mut archive, SCENE_ENTRY, archive_len)?.ok_or(ContainerError::MissingScene)?;
    let mut model = parse_document(&scene)?;

    let referenced: BTreeSet<String> = model
        .referenced_surfaces()
        .into_iter()
        .map(str::to_string)
        .collect();
    let retain = opts.retained();

    let mut buffers = BTreeMap::new();
    let mut reports = Vec::with_capacity(model.surfaces.len());
    for (index, surface) in model.surfaces.iter().enumerate() {
        let entry = vertex_entry_name(index);
        let outcome = match read_entry(&mut archive, &entry, archive_len)? {
            None if referenced.contains(&surface.id) => {
                return Err(ContainerError::MissingVertexStream {
                    surface: surface.id.clone(),
                    entry,
                });
            }
            None => Err(SurfaceError::MissingStream),
            Some(stream) => match vertex::decode_selected(surface, &stream, &retain) {
                Ok(buffer) => {
                    let count = buffer.vertex_count();
                    buffers.insert(surface.id.clone(), buffer);
                    Ok(count)
                }
                Err(e) => Err(SurfaceError::Decode(e)),
            },
        };

        match &outcome {
            Ok(count) => tracing::debug!(surface = %surface.id, %entry, vertices = count, "decoded surface"),
            Err(e) => tracing::debug!(surface = %surface.id, %entry, error = %e, "surface failed"),
        }
        reports.push(SurfaceReport {
            index,
            id: surface.id.clone(),
            entry,
            outcome,
        });
    }

    model.buffers = buffers;
    Ok(ContainerRead {
        model,
        surfaces: reports,
    })
}

/// Check whether bytes look like a container (a readable zip directory).
pub fn is_container(bytes: &[u8]) -> bool {
    !bytes.is_empty() && ZipArchive::new(Cursor::new(bytes)).is_ok()
}

fn open_archive<R: Read + Seek>(reader: R) -> Result<ZipArchive<R>> {
    ZipArchive::new(reader).map_err(|e| match e {
        ZipError::Io(io) if io.kind() != std::io::ErrorKind::UnexpectedEof => ContainerError::Io(io),
        other => ContainerError::NotAContainer(other.to_string()),
    })
}

/// Most bytes an entry may expand to.
///
/// Sizes in the zip directory are untrusted: the declared size is capped by
/// what the stored bytes can inflate to, and those by the archive itself.
fn entry_limit(declared: u64, compressed: u64, archive_len: u64) -> u64 {
    let inflated = compressed.min(archive_len).saturating_mul(MAX_INFLATE_RATIO);
    declared.min(inflated)
}

/// Extract one entry; `None` if the archive has no such entry.
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    archive_len: u64,
) -> Result<Option<Vec<u8>>> {
    let file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(ZipError::Io(e)) => return Err(ContainerError::Io(e)),
        Err(e) => return Err(ContainerError::corrupt(name, e)),
    };
    let limit = entry_limit(file.size(), file.compressed_size(), archive_len);

    let capacity = usize::try_from(limit.min(archive_len)).unwrap_or(0);
    let mut data = Vec::with_capacity(capacity);
    file.take(limit.saturating_add(1))
        .read_to_end(&mut data)
        .map_err(|e| ContainerError::corrupt(name, e))?;
    if data.len() as u64 > limit {
        return Err(ContainerError::corrupt(
            name,
            format!("expands beyond {} bytes", limit),
        ));
    }
    Ok(Some(data))
}
