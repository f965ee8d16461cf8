//! Terminal output formatting with colors.

use colored::Colorize;

use crate::result::TimingReport;

/// Outlier fraction above which the report is flagged as noisy.
const NOISY_OUTLIER_FRACTION: f64 = 0.05;

/// Format a TimingReport for human-readable terminal output.
pub fn format_report(name: &str, report: &TimingReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str(&format!("{}\n", name.bold()));
    output.push_str(&sep);
    output.push('\n');

    output.push_str(&format!(
        "  Calls:   {} timed, {} warm-up\n",
        report.count(),
        report.metadata().warmup_runs
    ));
    output.push_str(&format!(
        "  Mean:    {} \u{00B1} {} (cv {:.1}%)\n",
        format_ns(report.mean_ns()).green().bold(),
        format_ns(report.std_dev_ns()),
        report.summary().coefficient_of_variation() * 100.0
    ));
    output.push_str(&format!(
        "  Best:    {}\n",
        format_ns(report.min_ns()).cyan()
    ));
    output.push_str(&format!(
        "  Median:  {}   p95: {}   max: {}\n",
        format_ns(report.median_ns()),
        format_ns(report.p95_ns()),
        format_ns(report.max_ns())
    ));

    let outliers = report.outliers();
    if outliers.outlier_fraction > NOISY_OUTLIER_FRACTION {
        output.push_str(&format!(
            "  {}\n",
            format!(
                "\u{26A0} {} of {} calls are outliers ({:.1}%)",
                outliers.count(),
                outliers.total_samples,
                outliers.outlier_fraction * 100.0
            )
            .yellow()
        ));
    }

    if report.mean_ns() < report.metadata().timer_resolution_ns * 10.0 {
        output.push_str(&format!(
            "  {}\n",
            format!(
                "\u{26A0} Calls are near the clock resolution ({:.0} ns); consider batching",
                report.metadata().timer_resolution_ns
            )
            .yellow()
        ));
    }

    output.push_str(&sep);
    output.push('\n');
    output
}

/// Format a comparison line between two reports.
pub fn format_speedup(name: &str, candidate: &TimingReport, baseline: &TimingReport) -> String {
    let speedup = candidate.speedup_over(baseline);
    let text = format!("{:.1}x", speedup);
    let colored = if speedup >= 1.0 {
        text.green().bold()
    } else {
        text.red().bold()
    };
    format!(
        "{}: {} ({} vs {})\n",
        name,
        colored,
        format_ns(candidate.mean_ns()),
        format_ns(baseline.mean_ns())
    )
}

/// Render nanoseconds with a unit suited to the magnitude.
pub fn format_ns(ns: f64) -> String {
    if ns >= 1e9 {
        format!("{:.2} s", ns / 1e9)
    } else if ns >= 1e6 {
        format!("{:.2} ms", ns / 1e6)
    } else if ns >= 1e3 {
        format!("{:.2} \u{00B5}s", ns / 1e3)
    } else {
        format!("{:.0} ns", ns)
    }
}
