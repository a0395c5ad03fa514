use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::metrics::{self, PartitionSummary};
use crate::profile::{is_non_blank, LanguageProfile};
use crate::types::RepositoryMetrics;

/// One repository of the corpus: an immediate subdirectory of the root.
#[derive(Debug, Clone)]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
}

/// Counts for one `strip` run.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripReport {
    pub written: usize,
    pub skipped: usize,
}

/// Optional newline-delimited URL list. A repository keys by the URL's last
/// path segment; repositories without an entry fall back to their name.
#[derive(Debug, Default)]
pub struct UrlManifest {
    urls: HashMap<String, String>,
}

impl UrlManifest {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::RepositoryAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let mut urls = HashMap::new();
        for line in content.lines() {
            let url = line.trim();
            if url.is_empty() {
                continue;
            }
            if let Some(name) = url.trim_end_matches('/').rsplit('/').next() {
                urls.insert(name.to_string(), url.to_string());
            }
        }
        Ok(Self { urls })
    }

    pub fn url_for(&self, repository: &str) -> Option<&str> {
        self.urls.get(repository).map(String::as_str)
    }
}

/// Discover the repositories of a corpus: every immediate subdirectory of
/// the root, sorted by name.
pub fn discover_repositories(root: &Path) -> Result<Vec<Repository>, Error> {
    let entries = std::fs::read_dir(root).map_err(|source| Error::RepositoryAccess {
        path: root.to_path_buf(),
        source,
    })?;

    let mut repositories = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::RepositoryAccess {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            repositories.push(Repository { name, path });
        }
    }
    repositories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(repositories)
}

/// Artifact file name for a stripped source file: directory separators of
/// the relative path flattened to `_`, then `_stripped_`, then the original
/// file name. Consumers must treat the result as opaque.
pub fn artifact_name(rel_path: &Path) -> String {
    let file_name = rel_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let flat = rel_path
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("_")
        })
        .unwrap_or_default();
    format!("{flat}_stripped_{file_name}")
}

/// Corpus analysis pipeline shared by the CLI subcommands.
///
/// Partitions are processed without shared mutable state; only the final
/// summary merge reduces across them, and that merge is associative and
/// commutative, so partition granularity never changes the merged totals.
pub struct CorpusPipeline {
    profile: Box<dyn LanguageProfile>,
    config: Config,
}

impl CorpusPipeline {
    pub fn new(profile: Box<dyn LanguageProfile>, config: Config) -> Self {
        Self { profile, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze every repository under the corpus root. A failed repository
    /// is logged and skipped; the run continues.
    pub fn analyze_corpus(&self, root: &Path) -> Result<Vec<RepositoryMetrics>> {
        let repositories = discover_repositories(root)?;
        let manifest = self.load_manifest(root);

        let mut records = Vec::new();
        for repo in &repositories {
            let url = manifest
                .url_for(&repo.name)
                .unwrap_or(&repo.name)
                .to_string();
            match self.analyze_repository(repo, &url) {
                Ok(metrics) => records.push(metrics),
                Err(e) => {
                    eprintln!("Warning: skipping repository '{}': {e}", repo.name);
                }
            }
        }
        Ok(records)
    }

    /// Analyze one repository: normalize its files, partition the non-blank
    /// line stream, summarize partitions in parallel, merge, finalize.
    pub fn analyze_repository(
        &self,
        repo: &Repository,
        url: &str,
    ) -> Result<RepositoryMetrics, Error> {
        let stream = self.normalized_stream(&repo.path);
        let partitions = metrics::partition_lines(&stream, self.config.partition.max_lines);

        let merged = partitions
            .par_iter()
            .map(|partition| metrics::summarize_partition(partition, self.profile.as_ref()))
            .reduce(PartitionSummary::default, PartitionSummary::merge);

        metrics::build_metrics(&repo.name, url, merged)
    }

    /// Write one comment-free artifact per source file under
    /// `<out_dir>/<repository>/`. Unreadable or malformed files are logged
    /// and skipped.
    pub fn strip_corpus(&self, root: &Path, out_dir: &Path) -> Result<StripReport> {
        let repositories = discover_repositories(root)?;
        let mut report = StripReport::default();

        for repo in &repositories {
            let dest_dir = out_dir.join(&repo.name);
            for file_path in self.source_files(&repo.path) {
                let lines = match self.normalize_file(&file_path) {
                    Some(lines) => lines,
                    None => {
                        report.skipped += 1;
                        continue;
                    }
                };

                let rel = file_path.strip_prefix(&repo.path).unwrap_or(&file_path);
                let dest = dest_dir.join(artifact_name(rel));
                std::fs::create_dir_all(&dest_dir).map_err(|source| Error::RepositoryAccess {
                    path: dest_dir.clone(),
                    source,
                })?;
                let mut content = lines.join("\n");
                content.push('\n');
                if let Err(e) = std::fs::write(&dest, content) {
                    eprintln!("Warning: failed to write {}: {e}", dest.display());
                    report.skipped += 1;
                    continue;
                }
                report.written += 1;
            }
        }
        Ok(report)
    }

    /// Normalized, non-blank line stream of a repository, in file order.
    fn normalized_stream(&self, dir: &Path) -> Vec<String> {
        let files = self.source_files(dir);
        let per_file: Vec<Vec<String>> = files
            .par_iter()
            .filter_map(|file_path| self.normalize_file(file_path))
            .collect();

        per_file
            .into_iter()
            .flatten()
            .filter(|line| is_non_blank(line))
            .collect()
    }

    /// Read and normalize one file, logging and skipping on failure.
    fn normalize_file(&self, file_path: &Path) -> Option<Vec<String>> {
        let content = match std::fs::read_to_string(file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: failed to read {}: {e}", file_path.display());
                return None;
            }
        };
        match self.profile.normalize(file_path, &content) {
            Ok(lines) => Some(lines),
            Err(e) => {
                eprintln!("Warning: failed to normalize {}: {e}", file_path.display());
                None
            }
        }
    }

    /// Source files of a repository, filtered by the profile's extensions
    /// and the configured exclusion substrings, sorted for determinism.
    fn source_files(&self, dir: &Path) -> Vec<PathBuf> {
        let extensions = self.profile.file_extensions();
        let excludes = &self.config.corpus.exclude_patterns;

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let p = e.path();
                let matches_ext = p
                    .extension()
                    .is_some_and(|ext| extensions.iter().any(|e| ext == *e));
                if !matches_ext {
                    return false;
                }
                let path_str = p.to_string_lossy();
                !excludes.iter().any(|pat| path_str.contains(pat.as_str()))
            })
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }

    fn load_manifest(&self, root: &Path) -> UrlManifest {
        let Some(ref manifest_path) = self.config.corpus.url_manifest else {
            return UrlManifest::default();
        };
        let path = Path::new(manifest_path);
        let path = if path.is_relative() {
            root.join(path)
        } else {
            path.to_path_buf()
        };
        match UrlManifest::load(&path) {
            Ok(manifest) => manifest,
            Err(e) => {
                eprintln!("Warning: failed to load url manifest: {e}. Using repository names.");
                UrlManifest::default()
            }
        }
    }
}
