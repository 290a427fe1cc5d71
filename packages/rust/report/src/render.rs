//! Text renderers for report fragments.
//!
//! Every function here is pure: it turns pipeline output into the exact
//! bytes the [`Reporter`](crate::Reporter) commits. The layout of these
//! fragments is parsed by downstream tooling, so field labels and widths
//! must not drift.

use std::fmt::Write as _;

use catchlog_shared::{CatchlogError, Catchword, ClusterSummary, Result, SLAB_SIZE};

/// Significant digits used for every floating-point value in a report.
const PRECISION: i32 = 6;

/// Format a float with six significant digits, dropping trailing zeros.
///
/// Values whose decimal exponent is below -4 or at least 6 switch to
/// scientific notation with a signed two-digit exponent (`1.23457e+06`).
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".into() } else { "0".into() };
    }

    // Round to the target precision first; the exponent after rounding
    // decides the notation.
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

// ---------------------------------------------------------------------------
// Catchwords
// ---------------------------------------------------------------------------

/// Render the catchword block of one topic.
///
/// ```text
/// Catchwords:
/// c:2(0.3) a:0(0.1)
/// ```
pub fn render_catchwords(catchwords: &[Catchword]) -> String {
    let mut out = String::from("Catchwords:\n");
    for word in catchwords {
        let _ = write!(
            out,
            "{}:{}({}) ",
            word.term,
            word.index,
            format_general(word.threshold)
        );
    }
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Cluster summary
// ---------------------------------------------------------------------------

/// Render one line per cluster, smallest cluster first, followed by the
/// count of topics without catchwords.
///
/// Clusters of equal size are listed by topic id, so the output does not
/// depend on the order of `clusters`.
pub fn render_cluster_summary(clusters: &[ClusterSummary]) -> String {
    let mut sorted: Vec<&ClusterSummary> = clusters.iter().collect();
    sorted.sort_by_key(|c| (c.size, c.topic));

    let mut out = String::new();
    for c in &sorted {
        let _ = writeln!(
            out,
            "{:<12}{}{:<12}{}{:<15}{}{:<15}{}{:<15}{}  #catchwords: {}",
            "Cluster",
            c.topic,
            "  size:",
            c.size,
            "  distsq_sum:",
            format_general(c.distsq_sum),
            "  raw_coh:",
            format_general(c.raw_coherence),
            "  flt_coh:",
            format_general(c.filtered_coherence),
            c.catchword_count,
        );
    }

    let catchless = clusters.iter().filter(|c| c.catchword_count == 0).count();
    let _ = writeln!(
        out,
        "#Topics with no catchwords: {catchless}({})",
        clusters.len()
    );
    out
}

// ---------------------------------------------------------------------------
// Eigen spectrum
// ---------------------------------------------------------------------------

/// Render the square roots of the first `num_topics` squared eigenvalues,
/// then the running total over every complete slab of [`SLAB_SIZE`].
///
/// Negative or NaN eigenvalues are rejected rather than rendered.
pub fn render_eigen_spectrum(eigenvalues: &[f64], num_topics: usize) -> Result<String> {
    let values = eigenvalues.get(..num_topics).ok_or_else(|| {
        CatchlogError::invalid_input(format!(
            "requested {num_topics} eigenvalues, only {} available",
            eigenvalues.len()
        ))
    })?;
    if let Some((index, value)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| v.is_nan() || **v < 0.0)
    {
        return Err(CatchlogError::invalid_input(format!(
            "eigenvalue {index} is {value}, expected a non-negative number"
        )));
    }

    let mut out = String::from("Eigvals:  ");
    for (t, value) in values.iter().enumerate() {
        let _ = write!(out, "({t}): {}\t", format_general(value.sqrt()));
    }
    out.push('\n');

    let mut running = 0.0;
    for (slab, chunk) in values.chunks_exact(SLAB_SIZE).enumerate() {
        running += chunk.iter().sum::<f64>();
        let _ = writeln!(
            out,
            "Sum of Top-{} eig vals: {}",
            (slab + 1) * SLAB_SIZE,
            format_general(running)
        );
    }

    Ok(out)
}
