use colored::Colorize;

use repolens_core::types::RepositoryMetrics;

/// Format the corpus metrics for terminal output.
pub fn format_report(records: &[RepositoryMetrics]) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "repolens - Corpus Metrics".bold()));
    out.push_str(&format!("{}\n", "=".repeat(40)));

    if records.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            "No repositories produced metrics.".yellow()
        ));
        return out;
    }

    for m in records {
        out.push_str(&format!("\n{} ({})\n", m.repository.bold(), m.url));
        out.push_str(&format!("  Lines:              {}\n", m.line_count));
        out.push_str(&format!(
            "  Code duplication:   {}\n",
            format_percentage(m.duplication)
        ));
        out.push_str(&format!("  Nesting factor:     {:.2}\n", m.nesting_factor));
        out.push_str(&format!(
            "  Avg parameters:     {:.2}\n",
            m.avg_parameters
        ));
        out.push_str(&format!("  Avg variables:      {:.2}\n", m.avg_variables));
        if m.libraries.is_empty() {
            out.push_str("  Libraries:          (none)\n");
        } else {
            out.push_str(&format!(
                "  Libraries:          {}\n",
                m.libraries.join(", ")
            ));
        }
    }

    let total_lines: usize = records.iter().map(|m| m.line_count).sum();
    out.push_str(&format!(
        "\n{}: {} repositories, {} lines\n",
        "Summary".bold(),
        records.len(),
        total_lines,
    ));

    out
}

fn format_percentage(value: f64) -> String {
    let text = format!("{value:.1}%");
    if value >= 50.0 {
        text.red().to_string()
    } else if value >= 20.0 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}
