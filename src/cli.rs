//! Option schema and the argument dispatcher.
//!
//! [`OPTIONS`] is the single table of recognized flags. The tokenizer is a
//! `clap::Command` generated from it, and every parsed flag is applied to the
//! [`AsmConfig`] through one `match` on its [`Flag`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::configs::AsmConfig;
use crate::error::{CliError, Result};

const READS: &str = "reads";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Help,
    Version,
    OutputPrefix,
    Threads,
    CorrectionRounds,
    CleaningRounds,
    KmerLength,
    MinimizerWindow,
    BloomFilterBits,
    HighCoverageFactor,
    MaxChainCount,
    IgnoreSavedIndex,
    AdapterLength,
    LargeBubbleSize,
    SmallBubbleSize,
    MaxShortTip,
    MaxDropRate,
    MinDropRate,
    PaternalIndex,
    MaternalIndex,
    MinTrioCount,
    MidTrioCount,
    RequiredReadName,
    NoKmerFilter,
    DebugGfa,
}

/// Where a flag is listed in the usage screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Assembly,
    Trio,
    Extra,
}

pub struct OptSpec {
    pub flag: Flag,
    pub id: &'static str,
    pub short: Option<char>,
    pub long: Option<&'static str>,
    /// Value placeholder, `None` for switches.
    pub value: Option<&'static str>,
    pub section: Section,
    pub help: &'static str,
}

impl OptSpec {
    const fn switch(flag: Flag, id: &'static str, short: char, section: Section, help: &'static str) -> Self {
        Self { flag, id, short: Some(short), long: None, value: None, section, help }
    }

    const fn valued(
        flag: Flag,
        id: &'static str,
        short: char,
        value: &'static str,
        section: Section,
        help: &'static str,
    ) -> Self {
        Self { flag, id, short: Some(short), long: None, value: Some(value), section, help }
    }

    const fn with_long(mut self, long: &'static str) -> Self {
        self.long = Some(long);
        self
    }

    /// The flag as a user types it, e.g. `-t` or `--dbg-gfa`.
    pub fn token(&self) -> String {
        match (self.short, self.long) {
            (Some(c), _) => format!("-{c}"),
            (None, Some(long)) => format!("--{long}"),
            (None, None) => self.id.to_string(),
        }
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.id);
        if let Some(c) = self.short {
            arg = arg.short(c);
        }
        if let Some(long) = self.long {
            arg = arg.long(long);
        }
        match self.value {
            // the next token is the value even when it starts with '-'
            Some(name) => arg
                .value_name(name)
                .num_args(1)
                .allow_hyphen_values(true)
                .action(ArgAction::Set),
            None => arg.action(ArgAction::SetTrue),
        }
    }
}

use Section::{Assembly, Extra, Trio};

pub const OPTIONS: &[OptSpec] = &[
    OptSpec::valued(Flag::OutputPrefix, "output", 'o', "FILE", Assembly, "prefix of output files"),
    OptSpec::valued(Flag::Threads, "threads", 't', "INT", Assembly, "number of threads"),
    OptSpec::valued(Flag::CorrectionRounds, "correction-rounds", 'r', "INT", Assembly, "round of correction"),
    OptSpec::valued(Flag::CleaningRounds, "cleaning-rounds", 'a', "INT", Assembly, "round of assembly cleaning"),
    OptSpec::valued(Flag::KmerLength, "kmer", 'k', "INT", Assembly, "k-mer length (must be <64)"),
    OptSpec::valued(Flag::MinimizerWindow, "window", 'w', "INT", Assembly, "minimizer window size"),
    OptSpec::valued(Flag::BloomFilterBits, "bloom-bits", 'f', "INT", Assembly, "number of bits for bloom filter"),
    OptSpec::valued(
        Flag::HighCoverageFactor,
        "high-factor",
        'D',
        "FLOAT",
        Assembly,
        "drop k-mers occurring >FLOAT*coverage times",
    ),
    OptSpec::valued(
        Flag::MaxChainCount,
        "max-chain",
        'N',
        "INT",
        Assembly,
        "consider up to max(-D*coverage,-N) overlaps for each oriented read",
    ),
    OptSpec::switch(Flag::IgnoreSavedIndex, "ignore-saved", 'i', Assembly, "ignore saved overlaps in *.ovlp* files"),
    OptSpec::valued(Flag::AdapterLength, "adapter-len", 'z', "INT", Assembly, "length of adapters that should be removed"),
    OptSpec::valued(
        Flag::LargeBubbleSize,
        "large-bubble",
        'm',
        "INT",
        Assembly,
        "size of popped large bubbles for contig graph",
    ),
    OptSpec::valued(
        Flag::SmallBubbleSize,
        "small-bubble",
        'p',
        "INT",
        Assembly,
        "size of popped small bubbles for haplotype-resolved unitig graph",
    ),
    OptSpec::valued(Flag::MaxShortTip, "short-tip", 'n', "INT", Assembly, "small removed unitig threshold"),
    OptSpec::valued(Flag::MaxDropRate, "max-drop", 'x', "FLOAT", Assembly, "max overlap drop ratio"),
    OptSpec::valued(Flag::MinDropRate, "min-drop", 'y', "FLOAT", Assembly, "min overlap drop ratio"),
    OptSpec::valued(Flag::RequiredReadName, "read-name", 'b', "STR", Assembly, "only debug the read with this name"),
    OptSpec::switch(Flag::NoKmerFilter, "no-kmer-filter", 'F', Assembly, "skip k-mer frequency filtering"),
    OptSpec::switch(Flag::Version, "version", 'v', Assembly, "show version number").with_long("version"),
    OptSpec::switch(Flag::Help, "help", 'h', Assembly, "show help information"),
    OptSpec::valued(
        Flag::PaternalIndex,
        "paternal",
        'P',
        "FILE",
        Trio,
        "paternal trio index generated by \"yak count\"",
    ),
    OptSpec::valued(
        Flag::MaternalIndex,
        "maternal",
        'M',
        "FILE",
        Trio,
        "maternal trio index generated by \"yak count\"",
    ),
    OptSpec::valued(Flag::MinTrioCount, "min-count", 'c', "INT", Trio, "lower bound of the binned k-mer's frequency"),
    OptSpec::valued(Flag::MidTrioCount, "mid-count", 'd', "INT", Trio, "upper bound of the binned k-mer's frequency"),
    OptSpec {
        flag: Flag::DebugGfa,
        id: "dbg-gfa",
        short: None,
        long: Some("dbg-gfa"),
        value: None,
        section: Extra,
        help: "write verbose graph output",
    },
];

/// What the caller should do once the argument vector has been scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// All options applied; these positionals remain, in command-line order.
    Continue(Vec<PathBuf>),
    HelpRequested,
    VersionRequested,
}

/// Tokenizer generated from [`OPTIONS`]. Positionals may sit anywhere.
pub fn command() -> Command {
    let base = Command::new("hifiasm")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .infer_long_args(true)
        .arg(
            Arg::new(READS)
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf)),
        );
    OPTIONS.iter().fold(base, |cmd, spec| cmd.arg(spec.to_arg()))
}

fn short_spec(c: char) -> Option<&'static OptSpec> {
    OPTIONS.iter().find(|s| s.short == Some(c))
}

/// Exact long name, or a prefix naming exactly one long option.
fn long_spec(name: &str) -> Option<&'static OptSpec> {
    if let Some(exact) = OPTIONS.iter().find(|s| s.long == Some(name)) {
        return Some(exact);
    }
    let mut hits = OPTIONS
        .iter()
        .filter(|s| !name.is_empty() && s.long.is_some_and(|long| long.starts_with(name)));
    match (hits.next(), hits.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// First help/version flag reached scanning left to right, with the tokens
/// that precede it. Scanning gives up at `--` or at a token clap would reject,
/// so an earlier error still wins.
fn first_terminal(args: &[OsString]) -> Option<(Flag, Vec<OsString>)> {
    let mut i = 1;
    while i < args.len() {
        let Some(token) = args[i].to_str() else {
            i += 1;
            continue;
        };
        if token == "--" {
            return None;
        }
        if let Some(long) = token.strip_prefix("--") {
            let (name, attached) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            let spec = long_spec(name)?;
            if matches!(spec.flag, Flag::Help | Flag::Version) {
                return Some((spec.flag, args[..i].to_vec()));
            }
            if spec.value.is_some() && !attached {
                i += 1;
            }
        } else if let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) {
            for (at, c) in cluster.char_indices() {
                let spec = short_spec(c)?;
                if matches!(spec.flag, Flag::Help | Flag::Version) {
                    let mut before = args[..i].to_vec();
                    if at > 0 {
                        before.push(format!("-{}", &cluster[..at]).into());
                    }
                    return Some((spec.flag, before));
                }
                if spec.value.is_some() {
                    // rest of the cluster is the value, else the next token is
                    if at + c.len_utf8() == cluster.len() {
                        i += 1;
                    }
                    break;
                }
            }
        }
        i += 1;
    }
    None
}

/// Scan `args` (program name first) and apply every recognized option to `cfg`.
///
/// A help or version flag ends the scan where it stands: options before it
/// are applied, anything after it is ignored.
pub fn dispatch<I, T>(args: I, cfg: &mut AsmConfig) -> Result<Dispatch>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        return Ok(Dispatch::HelpRequested);
    }

    let (terminal, scanned) = match first_terminal(&args) {
        Some((flag, before)) => (Some(flag), before),
        None => (None, args),
    };

    let matches = command().try_get_matches_from(&scanned).map_err(from_clap)?;
    let seen_at = |id: &str| matches.get_flag(id).then(|| matches.index_of(id).unwrap_or(0));
    let (help, version) = (seen_at("help"), seen_at("version"));
    let terminal = terminal.or(match (help, version) {
        (Some(h), Some(v)) if v < h => Some(Flag::Version),
        (Some(_), _) => Some(Flag::Help),
        (None, Some(_)) => Some(Flag::Version),
        (None, None) => None,
    });

    for spec in OPTIONS {
        if spec.value.is_some() {
            if let Some(value) = matches.get_one::<String>(spec.id) {
                apply(spec, Some(value), cfg)?;
            }
        } else if matches.get_flag(spec.id) {
            apply(spec, None, cfg)?;
        }
    }

    Ok(match terminal {
        Some(Flag::Version) => Dispatch::VersionRequested,
        Some(_) => Dispatch::HelpRequested,
        None => Dispatch::Continue(positionals(&matches)),
    })
}

fn positionals(matches: &ArgMatches) -> Vec<PathBuf> {
    matches
        .get_many::<PathBuf>(READS)
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default()
}

fn apply(spec: &OptSpec, value: Option<&str>, cfg: &mut AsmConfig) -> Result<()> {
    match spec.flag {
        Flag::OutputPrefix => cfg.output_prefix = text(spec, value)?,
        Flag::Threads => cfg.thread_count = number(spec, value)?,
        Flag::CorrectionRounds => cfg.correction_rounds = number(spec, value)?,
        Flag::CleaningRounds => cfg.cleaning_rounds = number(spec, value)?,
        Flag::KmerLength => cfg.kmer_length = number(spec, value)?,
        Flag::MinimizerWindow => cfg.minimizer_window = number(spec, value)?,
        Flag::BloomFilterBits => cfg.bloom_filter_bits = number(spec, value)?,
        Flag::HighCoverageFactor => cfg.high_coverage_factor = finite(spec, value)?,
        Flag::MaxChainCount => cfg.max_chain_count = number(spec, value)?,
        Flag::IgnoreSavedIndex => cfg.load_index_from_disk = false,
        Flag::AdapterLength => cfg.adapter_length = number(spec, value)?,
        Flag::LargeBubbleSize => cfg.large_bubble_size = number(spec, value)?,
        Flag::SmallBubbleSize => cfg.small_bubble_size = number(spec, value)?,
        Flag::MaxShortTip => cfg.max_short_tip = number(spec, value)?,
        Flag::MaxDropRate => cfg.max_drop_rate = number(spec, value)?,
        Flag::MinDropRate => cfg.min_drop_rate = number(spec, value)?,
        Flag::PaternalIndex => cfg.paternal_index_path = Some(text(spec, value)?.into()),
        Flag::MaternalIndex => cfg.maternal_index_path = Some(text(spec, value)?.into()),
        Flag::MinTrioCount => cfg.min_trio_count = number(spec, value)?,
        Flag::MidTrioCount => cfg.mid_trio_count = number(spec, value)?,
        Flag::RequiredReadName => cfg.required_read_name = Some(text(spec, value)?),
        Flag::NoKmerFilter => cfg.skip_kmer_filter = true,
        Flag::DebugGfa => cfg.verbose_gfa_output = true,
        // terminal flags never reach here
        Flag::Help | Flag::Version => return Ok(()),
    }
    tracing::debug!(option = %spec.token(), value = value.unwrap_or(""), "option set");
    Ok(())
}

fn text(spec: &OptSpec, value: Option<&str>) -> Result<String> {
    value
        .map(str::to_string)
        .ok_or_else(|| CliError::MissingArgument(spec.token()))
}

fn number<T: FromStr>(spec: &OptSpec, value: Option<&str>) -> Result<T> {
    let raw = value.ok_or_else(|| CliError::MissingArgument(spec.token()))?;
    raw.trim().parse().map_err(|_| CliError::InvalidValue {
        flag: spec.token(),
        value: raw.to_string(),
    })
}

fn finite(spec: &OptSpec, value: Option<&str>) -> Result<f64> {
    let x: f64 = number(spec, value)?;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(CliError::InvalidValue {
            flag: spec.token(),
            value: value.unwrap_or_default().to_string(),
        })
    }
}

fn from_clap(err: clap::Error) -> CliError {
    // clap reports the arg as e.g. "-t <INT>"; keep the flag itself
    let token = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg.split_whitespace().next().unwrap_or(arg).to_string(),
        _ => String::new(),
    };
    match err.kind() {
        ErrorKind::UnknownArgument => CliError::UnknownOption(token),
        ErrorKind::InvalidValue | ErrorKind::TooFewValues => CliError::MissingArgument(token),
        _ => {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            CliError::Usage(first.trim_start_matches("error: ").to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> (Result<Dispatch>, AsmConfig) {
        let mut cfg = AsmConfig::default();
        let argv = std::iter::once("hifiasm").chain(args.iter().copied());
        let out = dispatch(argv, &mut cfg);
        (out, cfg)
    }

    fn expect_only(args: &[&str], edit: impl FnOnce(&mut AsmConfig)) {
        let (out, cfg) = run(args);
        assert_eq!(out.unwrap(), Dispatch::Continue(Vec::new()), "{args:?}");
        let mut expected = AsmConfig::default();
        edit(&mut expected);
        assert_eq!(cfg, expected, "{args:?}");
    }

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn each_flag_sets_exactly_one_field() {
        expect_only(&["-o", "run1"], |c| c.output_prefix = "run1".into());
        expect_only(&["-t", "8"], |c| c.thread_count = 8);
        expect_only(&["-r", "3"], |c| c.correction_rounds = 3);
        expect_only(&["-a", "6"], |c| c.cleaning_rounds = 6);
        expect_only(&["-k", "41"], |c| c.kmer_length = 41);
        expect_only(&["-w", "19"], |c| c.minimizer_window = 19);
        expect_only(&["-f", "0"], |c| c.bloom_filter_bits = 0);
        expect_only(&["-D", "10.5"], |c| c.high_coverage_factor = 10.5);
        expect_only(&["-N", "200"], |c| c.max_chain_count = 200);
        expect_only(&["-i"], |c| c.load_index_from_disk = false);
        expect_only(&["-z", "20"], |c| c.adapter_length = 20);
        expect_only(&["-m", "5000000000"], |c| c.large_bubble_size = 5_000_000_000);
        expect_only(&["-p", "0"], |c| c.small_bubble_size = 0);
        expect_only(&["-n", "5"], |c| c.max_short_tip = 5);
        expect_only(&["-x", "0.7"], |c| c.max_drop_rate = 0.7);
        expect_only(&["-y", "0.1"], |c| c.min_drop_rate = 0.1);
        expect_only(&["-P", "pat.yak"], |c| c.paternal_index_path = Some("pat.yak".into()));
        expect_only(&["-M", "mat.yak"], |c| c.maternal_index_path = Some("mat.yak".into()));
        expect_only(&["-c", "1"], |c| c.min_trio_count = 1);
        expect_only(&["-d", "9"], |c| c.mid_trio_count = 9);
        expect_only(&["-b", "read_42"], |c| c.required_read_name = Some("read_42".into()));
        expect_only(&["-F"], |c| c.skip_kmer_filter = true);
        expect_only(&["--dbg-gfa"], |c| c.verbose_gfa_output = true);
    }

    #[test]
    fn attached_values_are_accepted() {
        expect_only(&["-t4"], |c| c.thread_count = 4);
        expect_only(&["-orun2"], |c| c.output_prefix = "run2".into());
    }

    #[test]
    fn value_may_start_with_a_dash() {
        expect_only(&["-z", "-5"], |c| c.adapter_length = -5);
    }

    #[test]
    fn repeated_flag_keeps_last_value() {
        expect_only(&["-t", "2", "-t", "16"], |c| c.thread_count = 16);
    }

    #[test]
    fn positionals_are_collected_in_order() {
        let (out, cfg) = run(&["-t", "4", "a.fq", "b.fq.gz", "a.fq"]);
        assert_eq!(
            out.unwrap(),
            Dispatch::Continue(vec!["a.fq".into(), "b.fq.gz".into(), "a.fq".into()])
        );
        assert_eq!(cfg.thread_count, 4);
    }

    #[test]
    fn options_may_follow_positionals() {
        let (out, cfg) = run(&["a.fq", "-k", "31"]);
        assert_eq!(out.unwrap(), Dispatch::Continue(vec!["a.fq".into()]));
        assert_eq!(cfg.kmer_length, 31);

        let (out, cfg) = run(&["a.fq", "-k", "31", "b.fq"]);
        assert_eq!(out.unwrap(), Dispatch::Continue(vec!["a.fq".into(), "b.fq".into()]));
        assert_eq!(cfg.kmer_length, 31);
    }

    #[test]
    fn no_arguments_requests_help() {
        let (out, cfg) = run(&[]);
        assert_eq!(out.unwrap(), Dispatch::HelpRequested);
        assert_eq!(cfg, AsmConfig::default());
    }

    #[test]
    fn help_and_version_are_terminal() {
        assert_eq!(run(&["-h"]).0.unwrap(), Dispatch::HelpRequested);
        assert_eq!(run(&["-t", "4", "-h", "a.fq"]).0.unwrap(), Dispatch::HelpRequested);
        assert_eq!(run(&["-v"]).0.unwrap(), Dispatch::VersionRequested);
        assert_eq!(run(&["--version"]).0.unwrap(), Dispatch::VersionRequested);
    }

    #[test]
    fn first_terminal_flag_wins() {
        assert_eq!(run(&["-h", "-Q"]).0.unwrap(), Dispatch::HelpRequested);
        assert_eq!(run(&["-h", "-t"]).0.unwrap(), Dispatch::HelpRequested);
        assert_eq!(run(&["-v", "-h"]).0.unwrap(), Dispatch::VersionRequested);
        assert_eq!(run(&["-h", "-v"]).0.unwrap(), Dispatch::HelpRequested);
        assert_eq!(run(&["--version", "-k", "abc"]).0.unwrap(), Dispatch::VersionRequested);
    }

    #[test]
    fn errors_before_a_terminal_flag_still_win() {
        assert!(matches!(run(&["-Q", "-h"]).0, Err(CliError::UnknownOption(_))));
        assert!(matches!(run(&["-k", "abc", "-h"]).0, Err(CliError::InvalidValue { .. })));
    }

    #[test]
    fn options_before_help_are_applied_and_later_ones_are_not() {
        let (out, cfg) = run(&["-t", "8", "-ih", "-k", "21"]);
        assert_eq!(out.unwrap(), Dispatch::HelpRequested);
        assert_eq!(cfg.thread_count, 8);
        assert!(!cfg.load_index_from_disk);
        assert_eq!(cfg.kmer_length, 51);
    }

    #[test]
    fn help_token_taken_as_a_value_is_not_terminal() {
        let (out, cfg) = run(&["-o", "-h", "a.fq"]);
        assert_eq!(out.unwrap(), Dispatch::Continue(vec!["a.fq".into()]));
        assert_eq!(cfg.output_prefix, "-h");
    }

    #[test]
    fn long_options_may_be_abbreviated() {
        expect_only(&["--dbg"], |c| c.verbose_gfa_output = true);
        assert_eq!(run(&["--ver"]).0.unwrap(), Dispatch::VersionRequested);
    }

    #[test]
    fn non_finite_coverage_factor_is_rejected() {
        for bad in ["nan", "inf", "-inf"] {
            match run(&["-D", bad, "r.fq"]).0 {
                Err(CliError::InvalidValue { flag, value }) => {
                    assert_eq!(flag, "-D");
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected for {bad}: {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_option_is_reported_with_token() {
        match run(&["-Q", "a.fq"]).0 {
            Err(CliError::UnknownOption(token)) => assert_eq!(token, "-Q"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_value_is_reported_with_token() {
        match run(&["a.fq", "-t"]).0 {
            Err(CliError::MissingArgument(token)) => assert_eq!(token, "-t"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_number_is_rejected() {
        match run(&["-k", "abc"]).0 {
            Err(CliError::InvalidValue { flag, value }) => {
                assert_eq!(flag, "-k");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn tokens_render_short_and_long_forms() {
        let tokens: Vec<String> = OPTIONS.iter().map(OptSpec::token).collect();
        assert!(tokens.contains(&"-P".to_string()));
        assert!(tokens.contains(&"--dbg-gfa".to_string()));
    }
}
