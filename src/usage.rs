use std::fmt::Write;

use crate::cli::{Flag, OPTIONS, OptSpec, Section};
use crate::configs::AsmConfig;

fn default_of(flag: Flag, cfg: &AsmConfig) -> Option<String> {
    let shown = match flag {
        Flag::OutputPrefix => cfg.output_prefix.clone(),
        Flag::Threads => cfg.thread_count.to_string(),
        Flag::CorrectionRounds => cfg.correction_rounds.to_string(),
        Flag::CleaningRounds => cfg.cleaning_rounds.to_string(),
        Flag::KmerLength => cfg.kmer_length.to_string(),
        Flag::MinimizerWindow => cfg.minimizer_window.to_string(),
        Flag::BloomFilterBits => cfg.bloom_filter_bits.to_string(),
        Flag::HighCoverageFactor => format!("{:.1}", cfg.high_coverage_factor),
        Flag::MaxChainCount => cfg.max_chain_count.to_string(),
        Flag::AdapterLength => cfg.adapter_length.to_string(),
        Flag::LargeBubbleSize => cfg.large_bubble_size.to_string(),
        Flag::SmallBubbleSize => cfg.small_bubble_size.to_string(),
        Flag::MaxShortTip => cfg.max_short_tip.to_string(),
        Flag::MaxDropRate => cfg.max_drop_rate.to_string(),
        Flag::MinDropRate => cfg.min_drop_rate.to_string(),
        Flag::MinTrioCount => cfg.min_trio_count.to_string(),
        Flag::MidTrioCount => cfg.mid_trio_count.to_string(),
        Flag::PaternalIndex | Flag::MaternalIndex => String::new(),
        _ => return None,
    };
    Some(shown)
}

fn option_line(spec: &OptSpec, cfg: &AsmConfig) -> String {
    let mut left = match (spec.short, spec.long) {
        (Some(c), Some(long)) => format!("-{c}, --{long}"),
        _ => spec.token(),
    };
    if let Some(value) = spec.value {
        left.push(' ');
        left.push_str(value);
    }
    match default_of(spec.flag, cfg) {
        Some(default) => format!("    {left:<13} {} [{default}]", spec.help),
        None => format!("    {left:<13} {}", spec.help),
    }
}

/// Help screen, with the values in `cfg` shown as defaults.
pub fn render(cfg: &AsmConfig) -> String {
    let mut out = String::from("Usage: hifiasm [options] <in_1.fq> <in_2.fq> <...>\nOptions:\n");
    for (section, title) in [
        (Section::Assembly, "Assembly"),
        (Section::Trio, "Trio-partition"),
        (Section::Extra, "Debugging"),
    ] {
        let _ = writeln!(out, "  {title}:");
        for spec in OPTIONS.iter().filter(|s| s.section == section) {
            let _ = writeln!(out, "{}", option_line(spec, cfg));
        }
    }
    out.push_str("Example: ./hifiasm -o NA12878.asm -t 32 NA12878.fq.gz\n");
    out.push_str("See `man ./hifiasm.1' for detailed description of these command-line options.\n");
    out
}
