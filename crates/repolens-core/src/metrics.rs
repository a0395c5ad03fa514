use std::collections::HashSet;

use crate::dedup;
use crate::error::Error;
use crate::nesting;
use crate::profile::LanguageProfile;
use crate::types::RepositoryMetrics;

/// Partial result for one partition of a repository's non-blank line stream.
///
/// Summaries carry no shared state and merge associatively and
/// commutatively, so partition granularity never changes the merged totals.
#[derive(Debug, Clone, Default)]
pub struct PartitionSummary {
    pub line_count: usize,
    pub distinct_chunks: usize,
    pub function_count: usize,
    pub parameter_count: usize,
    pub packages: HashSet<String>,
    pub variables: HashSet<String>,
    pub nesting_samples: Vec<usize>,
}

impl PartitionSummary {
    /// Merge two partition summaries: sums, unions, sample concatenation.
    pub fn merge(mut self, other: Self) -> Self {
        self.line_count += other.line_count;
        self.distinct_chunks += other.distinct_chunks;
        self.function_count += other.function_count;
        self.parameter_count += other.parameter_count;
        self.packages.extend(other.packages);
        self.variables.extend(other.variables);
        self.nesting_samples.extend(other.nesting_samples);
        self
    }
}

/// Split a repository's non-blank line stream into contiguous,
/// non-overlapping partitions of at most `max_lines` lines. Order is
/// preserved; the partitions cover the stream exactly once.
pub fn partition_lines(lines: &[String], max_lines: usize) -> Vec<&[String]> {
    if lines.is_empty() {
        return Vec::new();
    }
    lines.chunks(max_lines.max(1)).collect()
}

/// Compute one partition's summary. The deduplicator sees every line of the
/// partition; the nesting estimator sees only its loop-introducing lines.
pub fn summarize_partition(lines: &[String], profile: &dyn LanguageProfile) -> PartitionSummary {
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    let mut summary = PartitionSummary {
        line_count: lines.len(),
        distinct_chunks: dedup::distinct_chunk_count(&refs),
        ..Default::default()
    };

    for line in &refs {
        if profile.is_function(line) {
            summary.function_count += 1;
            summary.parameter_count += profile.extract_parameters(line).count();
        }
        if profile.is_import(line) {
            summary.packages.extend(profile.extract_packages(line).into_names());
        }
        summary
            .variables
            .extend(profile.extract_variables(line).into_names());
    }

    let loop_lines: Vec<&str> = refs
        .iter()
        .copied()
        .filter(|line| profile.is_loop(line))
        .collect();
    summary.nesting_samples = nesting::nesting_samples(&loop_lines);

    summary
}

/// Fold a merged summary into the repository's immutable metrics record.
/// A repository with an empty line stream gets no record.
pub fn build_metrics(
    repository: &str,
    url: &str,
    summary: PartitionSummary,
) -> Result<RepositoryMetrics, Error> {
    let Some(duplication) =
        dedup::duplication_percentage(summary.line_count, summary.distinct_chunks)
    else {
        return Err(Error::EmptyRepository {
            repository: repository.to_string(),
        });
    };

    let lines = summary.line_count as f64;

    let avg_parameters = if summary.function_count == 0 {
        0.0
    } else {
        summary.parameter_count as f64 / summary.function_count as f64
    };

    let mut libraries: Vec<String> = summary.packages.into_iter().collect();
    libraries.sort();

    Ok(RepositoryMetrics {
        repository: repository.to_string(),
        url: url.to_string(),
        line_count: summary.line_count,
        libraries,
        nesting_factor: nesting::nesting_factor(&summary.nesting_samples),
        duplication,
        avg_parameters,
        avg_variables: summary.variables.len() as f64 / lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Extraction;
    use std::path::Path;

    /// Minimal profile for metrics tests: functions are `def` lines with one
    /// parameter per trailing `(n)` digit, loops are `for` lines, imports
    /// are `import` lines, variables come from `name =` pairs.
    struct StubProfile;

    impl LanguageProfile for StubProfile {
        fn language(&self) -> &'static str {
            "stub"
        }
        fn file_extensions(&self) -> &[&str] {
            &["stub"]
        }
        fn normalize(&self, _path: &Path, content: &str) -> anyhow::Result<Vec<String>> {
            Ok(content.lines().map(str::to_string).collect())
        }
        fn is_function(&self, line: &str) -> bool {
            line.contains("def ") && line.contains('(') && line.contains(')')
        }
        fn is_loop(&self, line: &str) -> bool {
            line.split_whitespace().any(|tok| tok == "for")
        }
        fn is_import(&self, line: &str) -> bool {
            line.trim_start().starts_with("import")
        }
        fn extract_packages(&self, line: &str) -> Extraction {
            match line.split_whitespace().nth(1) {
                Some(name) => Extraction::Names(vec![name.to_string()]),
                None => Extraction::Ambiguous,
            }
        }
        fn extract_parameters(&self, line: &str) -> Extraction {
            let inner = line
                .split_once('(')
                .and_then(|(_, rest)| rest.split_once(')'))
                .map(|(inner, _)| inner);
            match inner {
                Some(inner) if inner.trim().is_empty() => Extraction::Names(Vec::new()),
                Some(inner) => Extraction::Names(
                    inner.split(',').map(|p| p.trim().to_string()).collect(),
                ),
                None => Extraction::Ambiguous,
            }
        }
        fn extract_variables(&self, line: &str) -> Extraction {
            let toks: Vec<&str> = line.split_whitespace().collect();
            let mut names = Vec::new();
            for pair in toks.windows(2) {
                if pair[1] == "=" && pair[0] != "=" {
                    names.push(pair[0].to_string());
                }
            }
            Extraction::Names(names)
        }
    }

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partition_lines_covers_stream_without_overlap() {
        let stream = lines(&["a", "b", "c", "d", "e"]);
        let parts = partition_lines(&stream, 2);
        assert_eq!(parts.len(), 3);
        let rejoined: Vec<&String> = parts.iter().flat_map(|p| p.iter()).collect();
        assert_eq!(rejoined.len(), 5);
        assert_eq!(rejoined[0], "a");
        assert_eq!(rejoined[4], "e");
    }

    #[test]
    fn test_partition_lines_empty_stream() {
        assert!(partition_lines(&[], 4).is_empty());
    }

    #[test]
    fn test_merge_is_associative_and_commutative_on_totals() {
        let stream = lines(&[
            "import os",
            "def f(a, b):",
            "x = 1",
            "for i in xs:",
            "import sys",
            "def g(c):",
            "y = 2",
            "for j in ys:",
        ]);

        let one = partition_lines(&stream, 8)
            .into_iter()
            .map(|p| summarize_partition(p, &StubProfile))
            .fold(PartitionSummary::default(), PartitionSummary::merge);

        let many = partition_lines(&stream, 2)
            .into_iter()
            .map(|p| summarize_partition(p, &StubProfile))
            .fold(PartitionSummary::default(), PartitionSummary::merge);

        assert_eq!(one.line_count, many.line_count);
        assert_eq!(one.function_count, many.function_count);
        assert_eq!(one.parameter_count, many.parameter_count);
        assert_eq!(one.packages, many.packages);
        assert_eq!(one.variables, many.variables);
    }

    #[test]
    fn test_partition_granularity_bounds_duplication_drift() {
        // All 8 lines identical: one partition sees 2 identical chunks.
        let stream = lines(&["x = 1"; 8]);

        let coarse = partition_lines(&stream, 8)
            .into_iter()
            .map(|p| summarize_partition(p, &StubProfile))
            .fold(PartitionSummary::default(), PartitionSummary::merge);
        let fine = partition_lines(&stream, 4)
            .into_iter()
            .map(|p| summarize_partition(p, &StubProfile))
            .fold(PartitionSummary::default(), PartitionSummary::merge);

        // Boundary-crossing duplicates go undetected, so the fine-grained
        // distinct sum may exceed the coarse one, but never by more than the
        // partition count.
        assert_eq!(coarse.distinct_chunks, 1);
        assert_eq!(fine.distinct_chunks, 2);
        assert!(fine.distinct_chunks - coarse.distinct_chunks <= 2);
    }

    #[test]
    fn test_build_metrics_empty_stream_is_unavailable() {
        let err = build_metrics("demo", "demo", PartitionSummary::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyRepository { .. }));
    }

    #[test]
    fn test_build_metrics_averages() {
        let stream = lines(&[
            "def f(a, b):",
            "x = 1",
            "y = 2",
            "def g(c):",
        ]);
        let summary = summarize_partition(&stream, &StubProfile);
        let metrics = build_metrics("demo", "https://example.com/demo", summary).unwrap();
        assert_eq!(metrics.line_count, 4);
        // 3 parameters over 2 functions
        assert!((metrics.avg_parameters - 1.5).abs() < f64::EPSILON);
        // 2 distinct variables over 4 lines
        assert!((metrics.avg_variables - 0.5).abs() < f64::EPSILON);
        assert_eq!(metrics.nesting_factor, 0.0);
    }

    #[test]
    fn test_build_metrics_no_functions_zero_average() {
        let stream = lines(&["x = 1", "y = 2"]);
        let summary = summarize_partition(&stream, &StubProfile);
        let metrics = build_metrics("demo", "demo", summary).unwrap();
        assert_eq!(metrics.avg_parameters, 0.0);
    }
}
