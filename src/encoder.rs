//! Artifact generation: walk a file tree, encode every regular file, and
//! render the generated source through the carton template.
//!
//! Generation is a one-shot offline step. The walk is deterministic (entries
//! sorted by file name) so regenerating from an unchanged tree produces a
//! byte-identical artifact.
//!
//! Per-entry failures (stat, read, compression) skip that entry and are
//! collected into the [`GenerationReport`]; only template and destination
//! failures abort the generation.

use std::fs;
use std::path::Path;

use minijinja::Environment;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::codec::Codec;
use crate::error::{CartonError, Result};
use crate::store::{mod_time_nanos, EmbeddedStore};

/// Path under which the generator's own template is embedded, relative to
/// the template tree root.
pub const TEMPLATE_KEY: &str = "carton.tpl";

/// Template input structure: one entry of the generated map.
#[derive(Debug, Serialize)]
struct ArtifactFile {
    path: String,
    content: String,
    mod_time: i64,
}

/// Template input structure: the whole artifact.
#[derive(Debug, Serialize)]
struct ArtifactContext<'a> {
    package: &'a str,
    name: &'a str,
    source: String,
    destination: String,
    version: &'static str,
    files: Vec<ArtifactFile>,
}

/// Outcome of a generation run: how many files were embedded and which
/// entries were skipped, with the reason for each.
#[derive(Debug)]
pub struct GenerationReport {
    pub embedded: usize,
    pub skipped: Vec<(String, String)>,
}

/// Offline generator producing one carton artifact per run.
///
/// Two constructors select the bootstrap phase: [`from_template_file`] reads
/// the artifact template from disk (used before any artifact exists), while
/// [`from_store`] fetches it through an [`EmbeddedStore`] under
/// [`TEMPLATE_KEY`] (the self-hosted path, used once the crate's own
/// artifact has been generated).
///
/// [`from_template_file`]: Encoder::from_template_file
/// [`from_store`]: Encoder::from_store
#[derive(Debug)]
pub struct Encoder {
    package: String,
    name: String,
    template: String,
    codec: Codec,
}

impl Encoder {
    /// Bootstrap constructor: load the artifact template from a local file.
    pub fn from_template_file(
        package: impl Into<String>,
        name: impl Into<String>,
        template: &Path,
    ) -> Result<Self> {
        let text = fs::read_to_string(template)?;
        Ok(Encoder {
            package: package.into(),
            name: name.into(),
            template: text,
            codec: Codec::default(),
        })
    }

    /// Self-hosted constructor: fetch the artifact template through the
    /// generic lookup API of an existing store.
    pub fn from_store(
        package: impl Into<String>,
        name: impl Into<String>,
        store: &EmbeddedStore,
    ) -> Result<Self> {
        let bytes = store.get(TEMPLATE_KEY)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| CartonError::Decode("embedded template is not UTF-8".into()))?;
        Ok(Encoder {
            package: package.into(),
            name: name.into(),
            template: text,
            codec: Codec::default(),
        })
    }

    /// Walk `root`, embed every regular file beneath it, and write the
    /// rendered artifact to `dest` (created or truncated).
    ///
    /// Fails if the template does not render or the destination cannot be
    /// written; per-entry failures only land in the report.
    pub fn generate(&self, root: &Path, dest: &Path) -> Result<GenerationReport> {
        let (files, skipped) = self.collect(root)?;
        let embedded = files.len();

        let ctx = ArtifactContext {
            package: &self.package,
            name: &self.name,
            source: root.display().to_string(),
            destination: dest.display().to_string(),
            version: crate::VERSION,
            files,
        };

        let env = Environment::new();
        let rendered = env.render_str(&self.template, &ctx)?;
        fs::write(dest, rendered)?;

        debug!(
            embedded,
            skipped = skipped.len(),
            dest = %dest.display(),
            "artifact generated"
        );
        Ok(GenerationReport { embedded, skipped })
    }

    fn collect(&self, root: &Path) -> Result<(Vec<ArtifactFile>, Vec<(String, String)>)> {
        let mut files = Vec::new();
        let mut skipped = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let at = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    warn!(path = %at, %err, "skipping unwalkable entry");
                    skipped.push((at, err.to_string()));
                    continue;
                }
            };
            // Non-following metadata: symlinks report themselves, so broken
            // or self-referential links never abort the walk.
            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    let at = entry.path().display().to_string();
                    warn!(path = %at, %err, "skipping unstattable entry");
                    skipped.push((at, err.to_string()));
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }

            let key = match relative_key(root, entry.path()) {
                Some(key) => key,
                None => {
                    let at = entry.path().display().to_string();
                    warn!(path = %at, "skipping non-UTF-8 path");
                    skipped.push((at, "path is not valid UTF-8".into()));
                    continue;
                }
            };

            let encoded = fs::read(entry.path())
                .map_err(CartonError::from)
                .and_then(|bytes| self.codec.encode(&bytes));
            match encoded {
                Ok(content) => files.push(ArtifactFile {
                    path: key,
                    content,
                    mod_time: mod_time_nanos(&meta),
                }),
                Err(err) => {
                    let at = entry.path().display().to_string();
                    warn!(path = %at, %err, "skipping unreadable file");
                    skipped.push((at, err.to_string()));
                }
            }
        }
        Ok((files, skipped))
    }
}

/// Key for an embedded file: its path relative to the walked root. Walking
/// a single file keeps the path as given, matching a one-file tree.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => path,
    };
    rel.to_str().map(str::to_string)
}
