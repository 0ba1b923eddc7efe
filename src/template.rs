//! The local template file model.
//!
//! A template file is a JSON object. The reserved top-level key
//! [`TEMPLATE_ID_KEY`] tags the file with the remote template id; every
//! other top-level key belongs to the template's content. Files without the
//! tag have not been created remotely yet.

use serde::de::Error as _;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{Result, TemplateError};

/// Reserved top-level key holding the remote template id.
pub const TEMPLATE_ID_KEY: &str = "transloadit_template_id";

/// One local file representing one remote template.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Remote id embedded in the file, if the template exists remotely.
    pub id: Option<String>,
    /// Name used when creating; the server owns the name afterwards.
    pub name: String,
    body: Map<String, Value>,
}

impl TemplateFile {
    /// Parse a template file. The reserved id key is split out of the body;
    /// everything else stays in the user's original key order.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut body: Map<String, Value> =
            serde_json::from_str(&raw).map_err(|source| TemplateError::MalformedTemplateFile {
                path: path.to_path_buf(),
                source,
            })?;

        let id = match body.shift_remove(TEMPLATE_ID_KEY) {
            None => None,
            Some(Value::String(id)) => Some(id),
            Some(other) => {
                return Err(TemplateError::MalformedTemplateFile {
                    path: path.to_path_buf(),
                    source: serde_json::Error::custom(format!(
                        "{TEMPLATE_ID_KEY} must be a string, got {other}"
                    )),
                });
            }
        };

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            id,
            name,
            body,
        })
    }

    /// The template content as a JSON value (the body without the id tag).
    pub fn content(&self) -> Value {
        Value::Object(self.body.clone())
    }

    /// Rewrite the file with `id` embedded under the reserved key, keeping
    /// every other field untouched and in order.
    ///
    /// The write goes to a temp file in the same directory and replaces the
    /// original by rename, so an interrupted run never leaves a half-written
    /// file in place of the source. The temp file is cleaned up on drop if
    /// the rename never happens.
    pub fn write_with_id(&mut self, id: &str) -> Result<()> {
        let mut tagged = Map::with_capacity(self.body.len() + 1);
        tagged.insert(TEMPLATE_ID_KEY.to_string(), Value::String(id.to_string()));
        for (key, value) in &self.body {
            tagged.insert(key.clone(), value.clone());
        }

        let serialized = serde_json::to_string_pretty(&Value::Object(tagged))
            .expect("template body is always serializable");

        let dir = self.path.parent().unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        self.id = Some(id.to_string());
        Ok(())
    }
}
