//! Diagnostic reporting for the clustering pipeline.
//!
//! [`Reporter`] renders cluster statistics, catchwords and eigenvalue
//! spectra into a durable log, mirrored on the console.

pub mod render;
pub mod reporter;

pub use render::{format_general, render_catchwords, render_cluster_summary, render_eigen_spectrum};
pub use reporter::Reporter;
