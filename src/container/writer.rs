//! ZF3D container writer.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::format::{vertex_entry_name, SCENE_ENTRY};
use crate::document::write_document;
use crate::scene::SceneModel;
use crate::util::{ContainerError, EncodeError, Result};
use crate::vertex;

/// Options controlling how a container is written.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Compression level (0-9, where 0 stores entries uncompressed).
    pub compression_level: i32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression_level: 6,
        }
    }
}

impl WriteOptions {
    fn file_options(&self) -> SimpleFileOptions {
        let options = SimpleFileOptions::default();
        let level = match self.compression_level {
            l if l <= 0 => return options.compression_method(CompressionMethod::Stored),
            1 => Some(1),
            2..=5 => None,
            6..=9 => Some(9),
            _ => None,
        };
        options
            .compression_method(CompressionMethod::Deflated)
            .compression_level(level)
    }
}

/// Write a model into container bytes with default options.
pub fn write_container(model: &SceneModel) -> Result<Vec<u8>> {
    write_container_opts(model, &WriteOptions::default())
}

/// Write a model into container bytes.
///
/// Every surface needs a buffer in `model.buffers`. All streams are
/// encoded before anything is packaged, so a failing surface leaves no
/// partial archive behind.
#[tracing::instrument(skip_all, fields(surfaces = model.surfaces.len()))]
pub fn write_container_opts(model: &SceneModel, opts: &WriteOptions) -> Result<Vec<u8>> {
    let mut streams = Vec::with_capacity(model.surfaces.len());
    for surface in &model.surfaces {
        let encoded = model
            .buffer(&surface.id)
            .ok_or_else(|| EncodeError::MissingBuffer(surface.id.clone()))
            .and_then(|buffer| vertex::encode(surface, buffer))
            .map_err(|source| ContainerError::Encode {
                surface: surface.id.clone(),
                source,
            })?;
        streams.push(encoded);
    }
    let document = write_document(model)?;

    let options = opts.file_options();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file(SCENE_ENTRY, options)
        .map_err(ContainerError::write_failed)?;
    zip.write_all(&document)?;

    for (index, stream) in streams.iter().enumerate() {
        let entry = vertex_entry_name(index);
        tracing::trace!(%entry, bytes = stream.len(), "writing vertex stream");
        zip.start_file(entry, options)
            .map_err(ContainerError::write_failed)?;
        zip.write_all(stream)?;
    }

    let bytes = zip.finish().map_err(ContainerError::write_failed)?.into_inner();
    tracing::debug!(bytes = bytes.len(), "container written");
    Ok(bytes)
}

/// Write a model to a container file.
pub fn write_container_to(path: impl AsRef<Path>, model: &SceneModel, opts: &WriteOptions) -> Result<()> {
    let bytes = write_container_opts(model, opts)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
