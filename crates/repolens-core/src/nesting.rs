//! Loop-nesting estimation from indentation alone.
//!
//! The estimator never sees the loop bodies, only the loop-introducing lines
//! of one partition, so the depth it reports is a coarse proxy: runs of
//! non-decreasing indentation count as one nested run.

/// Leading-whitespace width of a line.
pub fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Walk a partition of loop-introducing lines and collect indentation-run
/// samples.
///
/// An indent increase or repeat extends the current run; a decrease closes
/// it (recording the run if positive). The final run is always recorded at
/// partition end, even when 0.
pub fn nesting_samples<S: AsRef<str>>(lines: &[S]) -> Vec<usize> {
    let mut samples = Vec::new();
    let mut prev_indent: Option<usize> = None;
    let mut count = 0usize;

    for line in lines {
        let indent = indent_width(line.as_ref());
        if let Some(prev) = prev_indent {
            if indent > prev || indent == prev {
                count += 1;
            } else {
                if count > 0 {
                    samples.push(count);
                }
                count = 0;
            }
        }
        prev_indent = Some(indent);
    }
    samples.push(count);
    samples
}

/// Mean of the positive samples, or 0.0 when none exist.
///
/// The 0.0 default conflates "no loops" with "uniformly flat loops"; that
/// ambiguity is part of the heuristic and deliberately not resolved.
pub fn nesting_factor(samples: &[usize]) -> f64 {
    let positive: Vec<usize> = samples.iter().copied().filter(|&s| s > 0).collect();
    if positive.is_empty() {
        return 0.0;
    }
    positive.iter().sum::<usize>() as f64 / positive.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("for x in y:"), 0);
        assert_eq!(indent_width("    for x in y:"), 4);
        assert_eq!(indent_width("\t\tfor x in y:"), 2);
    }

    #[test]
    fn test_ascending_run_then_drop() {
        // Strictly increasing across 3 lines, then back to 0: one positive
        // sample equal to 2, plus the mandatory trailing 0.
        let lines = vec![
            "for a in b:",
            "    for c in d:",
            "        for e in f:",
            "for g in h:",
        ];
        assert_eq!(nesting_samples(&lines), vec![2, 0]);
    }

    #[test]
    fn test_equal_indent_counts_as_continuation() {
        let lines = vec!["for a in b:", "for c in d:", "for e in f:"];
        // Two repeats extend a single run; it is recorded at partition end.
        assert_eq!(nesting_samples(&lines), vec![2]);
    }

    #[test]
    fn test_single_line_partition_yields_zero_sample() {
        let lines = vec!["for a in b:"];
        assert_eq!(nesting_samples(&lines), vec![0]);
    }

    #[test]
    fn test_empty_partition_yields_zero_sample() {
        let lines: Vec<&str> = vec![];
        assert_eq!(nesting_samples(&lines), vec![0]);
    }

    #[test]
    fn test_nesting_factor_ignores_zero_samples() {
        assert_eq!(nesting_factor(&[2, 0]), 2.0);
        assert_eq!(nesting_factor(&[2, 0, 1, 0]), 1.5);
    }

    #[test]
    fn test_nesting_factor_defaults_to_zero() {
        assert_eq!(nesting_factor(&[]), 0.0);
        assert_eq!(nesting_factor(&[0, 0, 0]), 0.0);
    }

    #[test]
    fn test_samples_combine_across_partitions_as_flat_list() {
        // Two partitions, each an ascending run: the mean is computed over
        // the combined sample list, never per-partition-then-averaged.
        let p1 = vec!["for a in b:", "    for c in d:", "        for e in f:"];
        let p2 = vec!["for a in b:", "    for c in d:"];
        let mut samples = nesting_samples(&p1);
        samples.extend(nesting_samples(&p2));
        assert_eq!(samples, vec![2, 1]);
        assert_eq!(nesting_factor(&samples), 1.5);
    }
}
