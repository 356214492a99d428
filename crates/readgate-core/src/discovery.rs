//! Input discovery.
//!
//! Turns a target path into the list of Markdown files to analyze. A file
//! target yields itself. A directory is walked with `ignore`, so `.gitignore`
//! rules apply and hidden entries are skipped.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::{DiscoveryError, DiscoveryResult};

/// File extensions treated as Markdown (compared case-insensitively).
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Compiled discovery settings.
#[derive(Debug, Clone)]
pub struct Discovery {
    exclude: GlobSet,
}

impl Discovery {
    /// Compile the exclusion patterns.
    ///
    /// Patterns match paths relative to the walked directory.
    pub fn new<S: AsRef<str>>(exclude: &[S]) -> DiscoveryResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in exclude {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|source| DiscoveryError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let exclude = builder.build().map_err(|source| DiscoveryError::Pattern {
            pattern: exclude
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;
        Ok(Self { exclude })
    }

    /// List the documents under `target`, sorted by path.
    #[tracing::instrument(skip(self), fields(%target))]
    pub fn discover(&self, target: &Utf8Path) -> DiscoveryResult<Vec<Utf8PathBuf>> {
        let metadata =
            std::fs::metadata(target.as_std_path()).map_err(|source| {
                DiscoveryError::Inaccessible {
                    path: target.to_path_buf(),
                    source,
                }
            })?;

        if !metadata.is_dir() {
            return Ok(vec![target.to_path_buf()]);
        }

        let mut files = Vec::new();
        let mut walker = WalkBuilder::new(target);
        walker.require_git(false).follow_links(false);

        for (index, entry) in walker.build().enumerate() {
            let entry = match entry {
                Ok(entry) => entry,
                // The first entry is the target itself.
                Err(source) if index == 0 => {
                    return Err(DiscoveryError::Walk {
                        path: target.to_path_buf(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
                tracing::warn!("skipping non-UTF-8 path");
                continue;
            };
            if !is_markdown(&path) {
                continue;
            }
            let relative = path.strip_prefix(target).unwrap_or(&path);
            if self.exclude.is_match(relative.as_std_path()) {
                tracing::debug!(%path, "excluded");
                continue;
            }
            files.push(path);
        }

        files.sort();
        tracing::debug!(count = files.len(), "discovered documents");
        Ok(files)
    }
}

/// Returns `true` if the path has a Markdown extension.
pub fn is_markdown(path: &Utf8Path) -> bool {
    path.extension().is_some_and(|ext| {
        MARKDOWN_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}
