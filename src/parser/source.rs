//! Opening SAF-T input: a plain XML file or a ZIP archive holding one.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::core::SaftError;

const ZIP_LOCAL_HEADER: &[u8; 4] = b"PK\x03\x04";
const ZIP_EMPTY_ARCHIVE: &[u8; 4] = b"PK\x05\x06";

fn zip_error(e: ZipError) -> SaftError {
    match e {
        ZipError::Io(io) => SaftError::Io(io),
        other => SaftError::structural(format!("unreadable archive: {other}")),
    }
}

/// True when the stream starts with a ZIP signature. The position is restored.
pub fn is_zip<R: Read + Seek>(reader: &mut R) -> std::io::Result<bool> {
    let start = reader.stream_position()?;
    let mut magic = [0u8; 4];
    let mut read = 0;
    while read < magic.len() {
        match reader.read(&mut magic[read..])? {
            0 => break,
            n => read += n,
        }
    }
    reader.seek(SeekFrom::Start(start))?;
    Ok(read == magic.len() && (&magic == ZIP_LOCAL_HEADER || &magic == ZIP_EMPTY_ARCHIVE))
}

/// Aggregate Σuncompressed / max(Σcompressed, 1) over every entry.
///
/// Reads the central directory only; no entry is decompressed.
pub fn compression_ratio<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<f64, SaftError> {
    let mut uncompressed: u64 = 0;
    let mut compressed: u64 = 0;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(zip_error)?;
        uncompressed = uncompressed.saturating_add(entry.size());
        compressed = compressed.saturating_add(entry.compressed_size());
    }
    Ok(uncompressed as f64 / compressed.max(1) as f64)
}

enum SourceKind {
    Xml,
    Zip {
        archive: ZipArchive<File>,
        member: usize,
        name: String,
    },
}

/// A resolved SAF-T input that can be read from the start any number of times.
///
/// The underlying file handle is owned and released when the source is
/// dropped, whichever way loading ends.
pub struct SaftSource {
    path: PathBuf,
    kind: SourceKind,
}

impl std::fmt::Debug for SaftSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaftSource")
            .field("path", &self.path)
            .field("member", &self.member_name())
            .finish()
    }
}

impl SaftSource {
    /// Open `path`, guarding ZIP input against excessive decompression ratios.
    ///
    /// For an archive, fails with [`SaftError::ZipBombSuspected`] before any
    /// entry is decompressed when the aggregate ratio exceeds `max_ratio`,
    /// and with [`SaftError::Structural`] unless exactly one `.xml` member exists.
    pub fn open(path: impl AsRef<Path>, max_ratio: f64) -> Result<Self, SaftError> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        if !is_zip(&mut file)? {
            return Ok(Self {
                path,
                kind: SourceKind::Xml,
            });
        }

        let mut archive = ZipArchive::new(file).map_err(zip_error)?;
        let ratio = compression_ratio(&mut archive)?;
        debug!("{}: {} entries, ratio {ratio:.1}", path.display(), archive.len());
        if ratio > max_ratio {
            return Err(SaftError::ZipBombSuspected {
                ratio,
                threshold: max_ratio,
            });
        }

        let mut candidates = Vec::new();
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i).map_err(zip_error)?;
            if !entry.is_dir() && entry.name().to_ascii_lowercase().ends_with(".xml") {
                candidates.push((i, entry.name().to_string()));
            }
        }
        let (member, name) = match candidates.len() {
            0 => return Err(SaftError::structural("archive contains no .xml member")),
            1 => candidates.remove(0),
            n => {
                let names: Vec<&str> = candidates.iter().map(|(_, n)| n.as_str()).collect();
                return Err(SaftError::structural(format!(
                    "archive contains {n} .xml members: {}",
                    names.join(", ")
                )));
            }
        };
        debug!("{}: reading member {name}", path.display());

        Ok(Self {
            path,
            kind: SourceKind::Zip {
                archive,
                member,
                name,
            },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the selected archive member; `None` for plain XML.
    pub fn member_name(&self) -> Option<&str> {
        match &self.kind {
            SourceKind::Xml => None,
            SourceKind::Zip { name, .. } => Some(name),
        }
    }

    /// A fresh buffered reader positioned at the start of the document.
    pub fn reader(&mut self) -> Result<Box<dyn BufRead + '_>, SaftError> {
        match &mut self.kind {
            SourceKind::Xml => Ok(Box::new(BufReader::new(File::open(&self.path)?))),
            SourceKind::Zip {
                archive, member, ..
            } => {
                let entry = archive.by_index(*member).map_err(zip_error)?;
                Ok(Box::new(BufReader::new(entry)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detects_zip_signature_and_rewinds() {
        let mut zip = Cursor::new(b"PK\x03\x04rest".to_vec());
        assert!(is_zip(&mut zip).unwrap());
        assert_eq!(zip.position(), 0);

        let mut xml = Cursor::new(b"<?xml version=\"1.0\"?>".to_vec());
        assert!(!is_zip(&mut xml).unwrap());

        let mut short = Cursor::new(b"PK".to_vec());
        assert!(!is_zip(&mut short).unwrap());
    }
}
