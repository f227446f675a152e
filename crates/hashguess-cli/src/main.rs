//! Offline password recovery CLI
//!
//! Usage:
//!   hashguess crack <BANK> [--dict <PATH>] [--log [PATH]] [--resume <PATH>] [--save-resume <PATH>]
//!   hashguess print <COUNT> [--dict <PATH>] [--strategies <LIST>]
//!   hashguess verify <CANDIDATES> <BANK> [--log [PATH]]
//!
//! Example:
//!   hashguess crack pwd6sha256 --dict words.txt --log found.txt --stop-when-done
//!   hashguess print 1000 --dict words.txt | head
//!   hashguess crack pwd6sha256 --strategies dictionary,substitution,brute:full
//!
//! Candidates and matches go to stdout, diagnostics to stderr.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use hashguess_engine::constants::{DEFAULT_DICT_FILE, DEFAULT_RESULTS_LOG, MAX_PWD_LEN, MAX_SUBS, PROGRESS_INTERVAL};
use hashguess_engine::domain::resume_format::ResumeFormatError;
use hashguess_engine::infra::dictionary_io::load_dictionary;
use hashguess_engine::infra::resume_io::{apply_resume_state, get_resume_path, save_resume_state};
use hashguess_engine::{
    DigestBank, GuessConfig, GuessError, Guesser, MatchSink, PrintSink, ResultsLog, Strategy, verify_candidates,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mmap")]
use hashguess_engine::infra::digest_io::load_digest_bank_mapped as load_bank;

#[cfg(not(feature = "mmap"))]
use hashguess_engine::infra::digest_io::load_digest_bank as load_bank;

/// Recover short passwords from a bank of SHA-256 digests
#[derive(Parser, Debug)]
#[command(name = "hashguess", author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every strategy against a digest bank
    Crack {
        /// Digest bank file (raw 32-byte SHA-256 digests)
        bank: PathBuf,

        #[command(flatten)]
        guess: GuessArgs,

        /// Append matches to a results log
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_RESULTS_LOG)]
        log: Option<PathBuf>,

        /// Pre-mark digests matched by an earlier run
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Save matched digests when the run ends (default path: <BANK>.hgrs)
        #[arg(long, num_args = 0..=1)]
        save_resume: Option<Option<PathBuf>>,

        /// Stop as soon as every digest is matched
        #[arg(long)]
        stop_when_done: bool,

        /// Candidates between progress log lines (0 disables)
        #[arg(long, default_value_t = PROGRESS_INTERVAL)]
        progress_interval: u64,
    },

    /// Print the first COUNT candidates without hashing
    Print {
        /// Number of candidates to print
        count: u64,

        #[command(flatten)]
        guess: GuessArgs,
    },

    /// Check a candidate list against a digest bank
    Verify {
        /// Candidate file, one candidate per line
        candidates: PathBuf,

        /// Digest bank file
        bank: PathBuf,

        /// Append matches to a results log
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_RESULTS_LOG)]
        log: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct GuessArgs {
    /// Dictionary file, one word per line
    #[arg(short, long, default_value = DEFAULT_DICT_FILE)]
    dict: PathBuf,

    /// Candidate length
    #[arg(short = 'l', long, default_value_t = MAX_PWD_LEN)]
    max_len: usize,

    /// Maximum simultaneous substitutions per word
    #[arg(long, default_value_t = MAX_SUBS)]
    max_subs: usize,

    /// Strategies to run, in order: dictionary, substitution, suffix:<ALPHABET>,
    /// brute:<ALPHABET> (alphabets: digits, lower, full, frequency)
    #[arg(long, value_delimiter = ',', default_values_t = Strategy::SEQUENCE)]
    strategies: Vec<Strategy>,
}

impl GuessArgs {
    fn config(&self) -> GuessConfig {
        GuessConfig {
            max_len: self.max_len,
            max_subs: self.max_subs,
            strategies: self.strategies.clone(),
            ..GuessConfig::default()
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn format_resume_error(path: &Path, err: &ResumeFormatError) -> String {
    match err {
        ResumeFormatError::InvalidMagic => {
            format!("'{}' is not a resume state file", path.display())
        }
        ResumeFormatError::DigestCountMismatch { .. } | ResumeFormatError::BankMismatch { .. } => format!(
            "resume state '{}' was written for a different digest bank: {}",
            path.display(),
            err
        ),
        _ => format!("cannot read resume state '{}': {}", path.display(), err),
    }
}

fn is_broken_pipe(err: &GuessError) -> bool {
    matches!(err, GuessError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
}

fn open_log(path: &Path) -> Result<ResultsLog> {
    let log = ResultsLog::open(path).with_context(|| format!("failed to open results log '{}'", path.display()))?;
    info!(path = %log.path().display(), "appending matches to results log");
    Ok(log)
}

fn load_words(path: &Path) -> Result<Vec<Vec<u8>>> {
    let words = load_dictionary(path).with_context(|| format!("failed to load dictionary '{}'", path.display()))?;
    info!(path = %path.display(), words = words.len(), "dictionary loaded");
    Ok(words)
}

fn load_digests(path: &Path) -> Result<DigestBank> {
    let bank = load_bank(path).with_context(|| format!("failed to load digest bank '{}'", path.display()))?;
    if bank.is_empty() {
        warn!(path = %path.display(), "digest bank is empty");
    }
    info!(path = %path.display(), digests = bank.len(), "digest bank loaded");
    Ok(bank)
}

fn run_crack(
    bank_path: &Path,
    guess: &GuessArgs,
    log: Option<&Path>,
    resume: Option<&Path>,
    save_resume: Option<Option<&Path>>,
    stop_when_done: bool,
    progress_interval: u64,
) -> Result<()> {
    let words = load_words(&guess.dict)?;
    let mut bank = load_digests(bank_path)?;

    if let Some(path) = resume {
        match apply_resume_state(path, &mut bank) {
            Ok(_) => {}
            Err(GuessError::Resume(e)) => bail!(format_resume_error(path, &e)),
            Err(e) => return Err(e).with_context(|| format!("failed to apply resume state '{}'", path.display())),
        }
    }

    let config = GuessConfig {
        stop_when_all_matched: stop_when_done,
        progress_interval,
        ..guess.config()
    };

    let stdout = io::stdout();
    let mut sink = MatchSink::new(&mut bank, stdout.lock()).configure(&config);
    if let Some(path) = log {
        sink = sink.with_log(open_log(path)?);
    }

    let start = Instant::now();
    let summary = Guesser::new(config, &words).run(&mut sink)?;
    let found = sink.into_matches().len();
    let elapsed = start.elapsed();

    info!(
        candidates = summary.candidates,
        found,
        matched = bank.matched_count(),
        total = bank.len(),
        elapsed = ?elapsed,
        "crack finished"
    );

    if let Some(path) = save_resume {
        let path = path.map_or_else(|| get_resume_path(bank_path), Path::to_path_buf);
        save_resume_state(&path, &bank)
            .map_err(|e| anyhow::anyhow!(format_resume_error(&path, &e)))?;
        info!(path = %path.display(), matched = bank.matched_count(), "resume state saved");
    }

    Ok(())
}

fn run_print(count: u64, guess: &GuessArgs) -> Result<()> {
    let words = load_words(&guess.dict)?;
    let stdout = io::stdout();
    let mut sink = PrintSink::new(BufWriter::new(stdout.lock()), count);

    let result = Guesser::new(guess.config(), &words)
        .run(&mut sink)
        .and_then(|summary| sink.finish().map(|_| summary));

    match result {
        Ok(summary) => {
            info!(printed = summary.candidates, "print finished");
            Ok(())
        }
        // reader closed the pipe early (e.g. `| head`)
        Err(e) if is_broken_pipe(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn run_verify(candidates: &Path, bank_path: &Path, log: Option<&Path>) -> Result<()> {
    let mut bank = load_digests(bank_path)?;
    let file =
        File::open(candidates).with_context(|| format!("failed to open candidate file '{}'", candidates.display()))?;

    let mut log = log.map(open_log).transpose()?;

    let stdout = io::stdout();
    let found = verify_candidates(BufReader::new(file), &mut bank, stdout.lock(), log.as_mut())?;
    info!(found = found.len(), "verify finished");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Crack {
            bank,
            guess,
            log,
            resume,
            save_resume,
            stop_when_done,
            progress_interval,
        } => run_crack(
            bank,
            guess,
            log.as_deref(),
            resume.as_deref(),
            save_resume.as_ref().map(Option::as_deref),
            *stop_when_done,
            *progress_interval,
        ),
        Command::Print { count, guess } => run_print(*count, guess),
        Command::Verify { candidates, bank, log } => run_verify(candidates, bank, log.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use hashguess_engine::Alphabet;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_strategies() {
        let cli = Cli::try_parse_from(["hashguess", "print", "10"]).unwrap();
        let Command::Print { count, guess } = cli.command else {
            panic!("expected print");
        };
        assert_eq!(count, 10);
        assert_eq!(guess.config().strategies, Strategy::SEQUENCE);
    }

    #[test]
    fn test_strategies_by_name() {
        let cli = Cli::try_parse_from([
            "hashguess",
            "crack",
            "bank.bin",
            "--strategies",
            "dictionary,suffix:digits,brute:full",
        ])
        .unwrap();
        let Command::Crack { guess, .. } = cli.command else {
            panic!("expected crack");
        };
        assert_eq!(
            guess.strategies,
            vec![
                Strategy::Dictionary,
                Strategy::Suffix(Alphabet::Digits),
                Strategy::BruteForce(Alphabet::Full),
            ]
        );
    }

    #[test]
    fn test_unknown_alphabet_rejected() {
        let err = Cli::try_parse_from(["hashguess", "print", "5", "--strategies", "brute:greek"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("unknown alphabet 'greek'"));
    }
}
