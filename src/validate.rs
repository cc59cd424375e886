use std::path::Path;

use crate::configs::AsmConfig;
use crate::error::ValidationError;
use crate::utils::is_readable_file;

type Check = fn(&AsmConfig) -> Result<(), ValidationError>;

fn ensure(ok: bool, err: ValidationError) -> Result<(), ValidationError> {
    if ok { Ok(()) } else { Err(err) }
}

fn in_unit_interval(rate: f64) -> bool {
    (0.0..1.0).contains(&rate)
}

fn non_negative(rate: f64) -> bool {
    rate >= 0.0
}

fn trio_index(path: Option<&Path>, err: impl FnOnce(&Path) -> ValidationError) -> Result<(), ValidationError> {
    match path {
        Some(p) if !is_readable_file(p) => Err(err(p)),
        _ => Ok(()),
    }
}

// Only the first failure is reported, so the order here is user-visible.
const CHECKS: &[Check] = &[
    |c| ensure(!c.read_file_paths.is_empty(), ValidationError::MissingInput),
    |c| ensure(!c.output_prefix.is_empty(), ValidationError::MissingOutput),
    |c| ensure(c.thread_count >= 1, ValidationError::ThreadCount),
    |c| ensure(c.correction_rounds >= 1, ValidationError::CorrectionRounds),
    |c| ensure(c.cleaning_rounds >= 1, ValidationError::CleaningRounds),
    |c| ensure(c.adapter_length >= 0, ValidationError::AdapterLength),
    |c| ensure(c.kmer_length < 64, ValidationError::KmerLength),
    |c| ensure(in_unit_interval(c.max_drop_rate), ValidationError::MaxDropRate),
    |c| ensure(in_unit_interval(c.min_drop_rate), ValidationError::MinDropRate),
    |c| ensure(c.max_drop_rate > c.min_drop_rate, ValidationError::DropRateOrder),
    |c| ensure(c.small_bubble_size >= 0, ValidationError::SmallBubbleSize),
    |c| ensure(c.large_bubble_size >= 0, ValidationError::LargeBubbleSize),
    |c| ensure(c.max_hang_length >= 0, ValidationError::MaxHangLength),
    |c| ensure(non_negative(c.max_hang_rate), ValidationError::MaxHangRate),
    |c| ensure(c.gap_fuzz >= 0, ValidationError::GapFuzz),
    |c| ensure(c.min_overlap_length >= 0, ValidationError::MinOverlapLength),
    |c| ensure(c.min_overlap_coverage >= 0, ValidationError::MinOverlapCoverage),
    |c| ensure(c.max_short_tip >= 0, ValidationError::MaxShortTip),
    |c| trio_index(c.paternal_index_path.as_deref(), |p| ValidationError::PaternalIndex(p.to_path_buf())),
    |c| trio_index(c.maternal_index_path.as_deref(), |p| ValidationError::MaternalIndex(p.to_path_buf())),
];

/// Run every cross-field check in order and stop at the first failure.
pub fn check_options(cfg: &AsmConfig) -> Result<(), ValidationError> {
    CHECKS.iter().try_for_each(|check| check(cfg))?;

    tracing::info!(
        reads = cfg.read_file_paths.len(),
        output = %cfg.output_prefix,
        threads = cfg.thread_count,
        correction_rounds = cfg.correction_rounds,
        cleaning_rounds = cfg.cleaning_rounds,
        k = cfg.kmer_length,
        min_drop = cfg.min_drop_rate,
        max_drop = cfg.max_drop_rate,
        trio = cfg.paternal_index_path.is_some() || cfg.maternal_index_path.is_some(),
        "options accepted"
    );
    Ok(())
}
