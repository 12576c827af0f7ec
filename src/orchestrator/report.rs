//! Energy distribution comparison between two backends

use serde::{Deserialize, Serialize};

/// Bins of the shared histogram.
pub const HISTOGRAM_BINS: usize = 100;

/// Summary of one backend's sample energies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    /// Backend label
    pub backend: String,
    /// Number of finite samples
    pub samples: usize,
    /// Lowest energy
    pub min: f64,
    /// Mean energy
    pub mean: f64,
    /// Highest energy
    pub max: f64,
    /// Samples per histogram bin
    pub counts: Vec<u64>,
}

/// Two energy distributions binned over their combined range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyComparison {
    /// Left edge of the first bin
    pub range_start: f64,
    /// Bin width (0 when every sample has the same energy)
    pub bin_width: f64,
    /// Per-backend summaries, in input order
    pub summaries: Vec<EnergySummary>,
}

impl EnergyComparison {
    /// Compare two labelled energy samples with [`HISTOGRAM_BINS`] shared bins.
    /// Non-finite energies are ignored.
    #[must_use]
    pub fn new(first: (&str, &[f64]), second: (&str, &[f64])) -> Self {
        Self::with_bins(&[first, second], HISTOGRAM_BINS)
    }

    /// Compare any number of labelled samples with `bins` shared bins.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    pub fn with_bins(series: &[(&str, &[f64])], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite = |energies: &[f64]| -> Vec<f64> {
            energies.iter().copied().filter(|e| e.is_finite()).collect()
        };

        let all: Vec<f64> = series.iter().flat_map(|(_, e)| finite(e)).collect();
        let lo = all.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (range_start, bin_width) = if all.is_empty() {
            (0.0, 0.0)
        } else {
            (lo, (hi - lo) / bins as f64)
        };

        let summaries = series
            .iter()
            .map(|(backend, energies)| {
                let values = finite(energies);
                let mut counts = vec![0_u64; bins];
                for &e in &values {
                    let bin = if bin_width > 0.0 {
                        (((e - range_start) / bin_width) as usize).min(bins - 1)
                    } else {
                        0
                    };
                    counts[bin] += 1;
                }

                let (min, mean, max) = if values.is_empty() {
                    (f64::NAN, f64::NAN, f64::NAN)
                } else {
                    (
                        values.iter().copied().fold(f64::INFINITY, f64::min),
                        values.iter().sum::<f64>() / values.len() as f64,
                        values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    )
                };

                EnergySummary {
                    backend: (*backend).to_owned(),
                    samples: values.len(),
                    min,
                    mean,
                    max,
                    counts,
                }
            })
            .collect();

        Self {
            range_start,
            bin_width,
            summaries,
        }
    }
}
