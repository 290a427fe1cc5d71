//! Domain types handed from the clustering pipeline to the reporter.

use serde::{Deserialize, Serialize};

use crate::error::{CatchlogError, Result};

/// Number of consecutive eigenvalue indices summed per slab.
pub const SLAB_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Catchword
// ---------------------------------------------------------------------------

/// A distinguishing term of one topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Catchword {
    /// Vocabulary index of the term.
    pub index: usize,
    /// Display string from the vocabulary.
    pub term: String,
    /// The topic's threshold value for this vocabulary index.
    pub threshold: f64,
}

impl Catchword {
    /// Resolve catchword indices against the vocabulary and the topic's
    /// threshold table.
    ///
    /// Thresholds are indexed by vocabulary index, not by position in
    /// `indices`.
    pub fn resolve(
        thresholds: &[f64],
        indices: &[usize],
        vocabulary: &[String],
    ) -> Result<Vec<Self>> {
        indices
            .iter()
            .map(|&index| {
                let term = vocabulary.get(index).ok_or_else(|| {
                    CatchlogError::invalid_input(format!(
                        "catchword index {index} outside vocabulary of {} words",
                        vocabulary.len()
                    ))
                })?;
                let threshold = *thresholds.get(index).ok_or_else(|| {
                    CatchlogError::invalid_input(format!(
                        "catchword index {index} outside threshold table of {} entries",
                        thresholds.len()
                    ))
                })?;
                Ok(Self {
                    index,
                    term: term.clone(),
                    threshold,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ClusterSummary
// ---------------------------------------------------------------------------

/// Per-cluster statistics rendered as one line of the cluster summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    /// Topic index.
    pub topic: usize,
    /// Number of documents closest to this cluster.
    pub size: usize,
    /// Sum of squared distances of members to the center.
    pub distsq_sum: f64,
    /// Raw coherence.
    pub raw_coherence: f64,
    /// Filtered coherence.
    pub filtered_coherence: f64,
    /// Number of catchwords found for the topic.
    pub catchword_count: usize,
}

impl ClusterSummary {
    /// Build one record per topic from parallel per-topic sequences.
    ///
    /// Every sequence must hold exactly `num_topics` entries, all indexed by
    /// topic id.
    pub fn from_parallel<C, D>(
        num_topics: usize,
        distances: &[f64],
        catchwords: &[C],
        closest_docs: &[D],
        coherences: &[f64],
        nl_coherences: &[f64],
    ) -> Result<Vec<Self>>
    where
        C: AsRef<[usize]>,
        D: AsRef<[usize]>,
    {
        let lengths = [
            ("distances", distances.len()),
            ("catchwords", catchwords.len()),
            ("closest_docs", closest_docs.len()),
            ("coherences", coherences.len()),
            ("nl_coherences", nl_coherences.len()),
        ];
        if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != num_topics) {
            return Err(CatchlogError::invalid_input(format!(
                "{name} has {len} entries, expected {num_topics}"
            )));
        }

        Ok((0..num_topics)
            .map(|topic| Self {
                topic,
                size: closest_docs[topic].as_ref().len(),
                distsq_sum: distances[topic],
                raw_coherence: nl_coherences[topic],
                filtered_coherence: coherences[topic],
                catchword_count: catchwords[topic].as_ref().len(),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// PipelineSnapshot
// ---------------------------------------------------------------------------

/// Outputs of one clustering run, as exported to JSON by the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    /// Display string for each vocabulary index.
    #[serde(default)]
    pub vocabulary: Vec<String>,
    /// Per-topic results, indexed by topic id.
    #[serde(default)]
    pub topics: Vec<TopicSnapshot>,
    /// Squared eigenvalues in rank order.
    #[serde(default)]
    pub eigenvalues: Vec<f64>,
}

/// Results for a single topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicSnapshot {
    /// Vocabulary indices of the topic's catchwords.
    #[serde(default)]
    pub catchwords: Vec<usize>,
    /// Threshold per vocabulary index.
    #[serde(default)]
    pub catch_thresholds: Vec<f64>,
    /// Documents assigned to this cluster.
    #[serde(default)]
    pub closest_docs: Vec<usize>,
    /// Sum of squared distances.
    #[serde(default)]
    pub distsq: f64,
    /// Filtered coherence.
    #[serde(default)]
    pub coherence: f64,
    /// Raw coherence.
    #[serde(default)]
    pub nl_coherence: f64,
}

impl PipelineSnapshot {
    /// Parse a snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CatchlogError::parse(format!("invalid snapshot: {e}")))
    }

    /// Look up a topic by id.
    pub fn topic(&self, id: usize) -> Result<&TopicSnapshot> {
        self.topics.get(id).ok_or_else(|| {
            CatchlogError::invalid_input(format!(
                "topic {id} out of range ({} topics)",
                self.topics.len()
            ))
        })
    }

    /// One summary record per topic, built from the per-topic columns.
    pub fn cluster_summaries(&self) -> Result<Vec<ClusterSummary>> {
        let distances: Vec<f64> = self.topics.iter().map(|t| t.distsq).collect();
        let catchwords: Vec<&[usize]> = self.topics.iter().map(|t| &t.catchwords[..]).collect();
        let closest_docs: Vec<&[usize]> =
            self.topics.iter().map(|t| &t.closest_docs[..]).collect();
        let coherences: Vec<f64> = self.topics.iter().map(|t| t.coherence).collect();
        let nl_coherences: Vec<f64> = self.topics.iter().map(|t| t.nl_coherence).collect();

        ClusterSummary::from_parallel(
            self.topics.len(),
            &distances,
            &catchwords,
            &closest_docs,
            &coherences,
            &nl_coherences,
        )
    }
}
