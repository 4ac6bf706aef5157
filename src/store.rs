use crate::error::{EditorError, Result};
use crate::statics;
use crate::xml::XmlDocument;
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => statics::NL_LF,
            LineEnding::CrLf => statics::NL_CRLF,
        }
    }
}

/// One parsed definition file plus the formatting facts needed to write it back.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub document: XmlDocument,
    /// Encoding the file was read with. Output is always UTF-16LE.
    pub encoding: &'static Encoding,
    pub line_ending: LineEnding,
    pub indent: String,
}

impl LoadedFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| EditorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, &bytes)
    }

    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self> {
        let parse_error = |message: String| EditorError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let (text, encoding) = decode_text(bytes).map_err(parse_error)?;
        let document = XmlDocument::parse(&text).map_err(|e| parse_error(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            document,
            encoding,
            line_ending: detect_line_ending(&text),
            indent: detect_indent(&text),
        })
    }

    /// Exact bytes a save would write: declaration + pretty tree, UTF-16LE with BOM.
    pub fn to_bytes(&self) -> Vec<u8> {
        let text = self.document.to_xml_string(
            statics::XML_DECLARATION,
            self.line_ending.as_str(),
            &self.indent,
        );
        encode_utf16le(&text)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Summary of one folder scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub found: usize,
    pub parsed: usize,
    pub failures: Vec<LoadFailure>,
}

impl LoadStats {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// All parsed documents of the open folder, keyed by path in load order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    folder: Option<PathBuf>,
    files: IndexMap<PathBuf, LoadedFile>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with the `.xml` files found under `folder`.
    /// Files that fail to parse are reported in the stats and skipped.
    pub fn load_folder(&mut self, folder: &Path) -> Result<LoadStats> {
        self.clear();

        if !folder.is_dir() {
            return Err(EditorError::NotADirectory(folder.to_path_buf()));
        }
        let folder = std::path::absolute(folder).map_err(|source| EditorError::Io {
            path: folder.to_path_buf(),
            source,
        })?;

        let mut stats = LoadStats::default();
        for entry in WalkDir::new(&folder).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry under {folder:?}: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_xml_path(entry.path()) {
                continue;
            }

            stats.found += 1;
            let path = entry.into_path();
            match LoadedFile::load(&path) {
                Ok(file) => {
                    stats.parsed += 1;
                    self.files.insert(path, file);
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    stats.failures.push(LoadFailure {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            found = stats.found,
            parsed = stats.parsed,
            failed = stats.failed(),
            "loaded {folder:?}"
        );
        self.folder = Some(folder);
        Ok(stats)
    }

    /// Drop every document. All `NodeId`s handed out before are meaningless afterwards.
    pub fn clear(&mut self) {
        self.files.clear();
        self.folder = None;
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&LoadedFile> {
        self.files.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut LoadedFile> {
        self.files.get_mut(path)
    }

    pub fn document(&self, path: &Path) -> Option<&XmlDocument> {
        self.get(path).map(|f| &f.document)
    }

    pub fn document_mut(&mut self, path: &Path) -> Option<&mut XmlDocument> {
        self.get_mut(path).map(|f| &mut f.document)
    }

    /// Paths in load order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }

    pub fn files(&self) -> impl Iterator<Item = &LoadedFile> {
        self.files.values()
    }

    /// Add or replace a document. A new path goes to the end of the load order.
    pub fn insert(&mut self, file: LoadedFile) {
        self.files.insert(file.path.clone(), file);
    }

    pub fn bytes_for(&self, path: &Path) -> Result<Vec<u8>> {
        self.get(path)
            .map(LoadedFile::to_bytes)
            .ok_or_else(|| EditorError::NotLoaded(path.to_path_buf()))
    }

    /// Write the document at `path` back to its own file.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.save_as(path, path)
    }

    /// Write the document at `path` to `new_path`. The store itself is not modified.
    pub fn save_as(&self, path: &Path, new_path: &Path) -> Result<()> {
        let bytes = self.bytes_for(path)?;
        fs::write(new_path, &bytes).map_err(|source| EditorError::Io {
            path: new_path.to_path_buf(),
            source,
        })?;
        tracing::info!("saved {path:?} to {new_path:?} ({} bytes)", bytes.len());
        Ok(())
    }
}

pub fn is_xml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
}

fn decode_text(bytes: &[u8]) -> std::result::Result<(String, &'static Encoding), String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or_else(|| {
        let sniffed = match bytes {
            [b'<', 0, ..] => UTF_16LE,
            [0, b'<', ..] => UTF_16BE,
            _ => UTF_8,
        };
        (sniffed, 0)
    });

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| format!("file is not valid {}", encoding.name()))?;
    Ok((text.into_owned(), encoding))
}

fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

fn detect_line_ending(text: &str) -> LineEnding {
    // Count terminators; a stray CRLF in a mostly-LF file should not flip the style.
    let mut lf_count = 0usize;
    let mut crlf_count = 0usize;
    let bytes = text.as_bytes();

    for (i, b) in bytes.iter().enumerate() {
        if *b != b'\n' {
            continue;
        }
        if i > 0 && bytes[i - 1] == b'\r' {
            crlf_count += 1;
        } else {
            lf_count += 1;
        }
    }

    if crlf_count > lf_count {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}

fn detect_indent(text: &str) -> String {
    let mut smallest: Option<usize> = None;
    for line in text.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('\t') {
            return "\t".to_string();
        }
        let spaces = line.len() - line.trim_start_matches(' ').len();
        if spaces > 0 {
            smallest = Some(smallest.map_or(spaces, |s| s.min(spaces)));
        }
    }
    " ".repeat(smallest.unwrap_or(statics::DEFAULT_INDENT_WIDTH))
}
