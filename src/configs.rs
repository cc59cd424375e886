use std::cmp::Ordering;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT: &str = "hifiasm.asm";

/// Accumulators owned by a single processing round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCounters {
    pub total_bases: i64,
    pub corrected_bases: i64,
    pub recorrected_bases: i64,
    pub memory_budget: i64,
    pub round_id: i32,
}

/// Run configuration for the assembler.
///
/// Built once with [`Default`], filled in by [`crate::cli::dispatch`] and
/// [`crate::inputs::resolve_read_files`], then checked by
/// [`crate::validate::check_options`] before any stage reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsmConfig {
    pub output_prefix: String,
    pub thread_count: i32,
    pub correction_rounds: i32,
    pub cleaning_rounds: i32,

    // k-mer indexing
    pub kmer_length: i32,
    pub minimizer_window: i32,
    pub bloom_filter_bits: i32,
    pub no_homopolymer_compression: bool,
    pub skip_kmer_filter: bool,
    pub high_coverage_factor: f64,
    pub max_chain_count: i32,
    pub kmer_min_freq: i32,
    pub kmer_max_freq: i32,
    pub load_index_from_disk: bool,
    pub write_index_to_disk: bool,

    // overlaps and graph cleaning
    pub adapter_length: i32,
    pub small_bubble_size: i64,
    pub large_bubble_size: i64,
    pub min_drop_rate: f64,
    pub max_drop_rate: f64,
    pub max_hang_length: i32,
    pub max_hang_rate: f64,
    pub gap_fuzz: i32,
    pub min_overlap_length: i32,
    pub min_overlap_coverage: i32,
    pub max_short_tip: i32,

    // trio binning
    pub min_trio_count: i32,
    pub mid_trio_count: i32,
    pub paternal_index_path: Option<PathBuf>,
    pub maternal_index_path: Option<PathBuf>,

    pub required_read_name: Option<String>,
    pub read_file_paths: Vec<PathBuf>,
    pub verbose_gfa_output: bool,

    /// Homozygous coverage estimate, unknown until the pipeline measures it.
    pub coverage: Option<i32>,
    pub round: RoundCounters,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            output_prefix: DEFAULT_OUTPUT.to_string(),
            thread_count: 1,
            correction_rounds: 2,
            cleaning_rounds: 4,
            kmer_length: 51,
            minimizer_window: 51,
            bloom_filter_bits: 37,
            no_homopolymer_compression: false,
            skip_kmer_filter: false,
            high_coverage_factor: 5.0,
            max_chain_count: 100,
            kmer_min_freq: 3,
            kmer_max_freq: 66,
            load_index_from_disk: true,
            write_index_to_disk: true,
            adapter_length: 0,
            small_bubble_size: 100_000,
            large_bubble_size: 10_000_000,
            min_drop_rate: 0.2,
            max_drop_rate: 0.8,
            max_hang_length: 1000,
            max_hang_rate: 0.8,
            gap_fuzz: 1000,
            min_overlap_length: 50,
            min_overlap_coverage: 0,
            max_short_tip: 3,
            min_trio_count: 2,
            mid_trio_count: 5,
            paternal_index_path: None,
            maternal_index_path: None,
            required_read_name: None,
            read_file_paths: Vec::new(),
            verbose_gfa_output: false,
            coverage: None,
            round: RoundCounters::default(),
        }
    }
}

impl AsmConfig {
    /// Zero the per-round accumulators and start round `round_id`.
    /// Must run between rounds, when no worker holds a reference.
    pub fn reset_to_round(&mut self, round_id: i32) {
        self.round = RoundCounters {
            round_id,
            ..RoundCounters::default()
        };
    }

    /// Raise `max_chain_count` to `round(hom_cov * high_coverage_factor)` when
    /// that exceeds the current bound. The bound never goes down.
    ///
    /// Returns `true` if the bound changed.
    pub fn update_coverage(&mut self, hom_cov: i32) -> bool {
        let candidate = (f64::from(hom_cov) * self.high_coverage_factor).round();
        // NaN is unordered and never raises; the cast saturates at i32::MAX
        let raised = match candidate.partial_cmp(&f64::from(self.max_chain_count)) {
            Some(Ordering::Greater) => candidate as i32,
            _ => self.max_chain_count,
        };
        if raised == self.max_chain_count {
            tracing::debug!(
                hom_cov,
                max_n_chain = self.max_chain_count,
                "max_n_chain unchanged"
            );
            return false;
        }

        self.max_chain_count = raised;
        self.coverage = Some(hom_cov);
        tracing::info!("updated max_n_chain to {}", self.max_chain_count);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AsmConfig::default();
        assert_eq!(cfg.output_prefix, "hifiasm.asm");
        assert_eq!(cfg.thread_count, 1);
        assert_eq!(cfg.kmer_length, 51);
        assert_eq!(cfg.max_chain_count, 100);
        assert_eq!(cfg.small_bubble_size, 100_000);
        assert_eq!(cfg.large_bubble_size, 10_000_000);
        assert!(cfg.load_index_from_disk && cfg.write_index_to_disk);
        assert!(cfg.read_file_paths.is_empty());
        assert_eq!(cfg.round, RoundCounters::default());
    }

    #[test]
    fn reset_zeroes_counters_and_sets_round() {
        let mut cfg = AsmConfig::default();
        cfg.round = RoundCounters {
            total_bases: 10,
            corrected_bases: 20,
            recorrected_bases: 30,
            memory_budget: 40,
            round_id: 1,
        };
        cfg.reset_to_round(3);
        assert_eq!(
            cfg.round,
            RoundCounters {
                round_id: 3,
                ..RoundCounters::default()
            }
        );
    }

    #[test]
    fn coverage_bound_only_goes_up() {
        let mut cfg = AsmConfig::default();

        // 10 * 5.0 = 50 < 100
        assert!(!cfg.update_coverage(10));
        assert_eq!(cfg.max_chain_count, 100);
        assert_eq!(cfg.coverage, None);

        // 20 * 5.0 = 100, equal is not an increase
        assert!(!cfg.update_coverage(20));
        assert_eq!(cfg.max_chain_count, 100);

        assert!(cfg.update_coverage(33));
        assert_eq!(cfg.max_chain_count, 165);
        assert_eq!(cfg.coverage, Some(33));

        assert!(!cfg.update_coverage(21));
        assert_eq!(cfg.max_chain_count, 165);
    }

    #[test]
    fn coverage_bound_rounds_candidate() {
        let mut cfg = AsmConfig {
            high_coverage_factor: 2.6,
            max_chain_count: 10,
            ..AsmConfig::default()
        };
        // 7 * 2.6 = 18.2
        assert!(cfg.update_coverage(7));
        assert_eq!(cfg.max_chain_count, 18);
        // 8 * 2.6 = 20.8
        assert!(cfg.update_coverage(8));
        assert_eq!(cfg.max_chain_count, 21);
    }

    #[test]
    fn nan_factor_never_moves_the_bound() {
        let mut cfg = AsmConfig {
            high_coverage_factor: f64::NAN,
            ..AsmConfig::default()
        };
        assert!(!cfg.update_coverage(30));
        assert_eq!(cfg.max_chain_count, 100);
        assert_eq!(cfg.coverage, None);
    }

    #[test]
    fn oversized_candidate_saturates() {
        for factor in [f64::INFINITY, 1e300] {
            let mut cfg = AsmConfig {
                high_coverage_factor: factor,
                ..AsmConfig::default()
            };
            assert!(cfg.update_coverage(30));
            assert_eq!(cfg.max_chain_count, i32::MAX);
            assert!(!cfg.update_coverage(40));
            assert_eq!(cfg.max_chain_count, i32::MAX);
        }

        let mut cfg = AsmConfig {
            high_coverage_factor: f64::INFINITY,
            ..AsmConfig::default()
        };
        // -inf is below any bound
        assert!(!cfg.update_coverage(-3));
        assert_eq!(cfg.max_chain_count, 100);
    }
}
