//! Guessing workflow implementation
//!
//! Runs the guessing strategies in a fixed order over one candidate buffer and
//! hands every candidate to a sink. Two sinks exist: `PrintSink` writes
//! candidates out under a guess budget (generation mode), `MatchSink` hashes
//! them against a digest bank (matching mode).

use crate::constants::{MAX_CONFIG_LEN, MAX_PWD_LEN, MAX_SUBS, PROGRESS_INTERVAL};
use crate::domain::alphabet::{Alphabet, UnknownAlphabet};
use crate::domain::candidate::CandidateBuffer;
use crate::domain::digest::{Digest, DigestBank, Match};
use crate::domain::hash::{digest_hex, sha256};
use crate::domain::odometer::{enumerate_suffix, suffix_space};
use crate::domain::substitution::{SubstitutionExpander, SubstitutionTable};
use crate::error::{GuessError, Result};
use crate::infra::results_log::ResultsLog;
use std::fmt;
use std::io::Write;
use std::ops::ControlFlow;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// One candidate-producing strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Dictionary words of at least `L` bytes, truncated to `L`
    Dictionary,
    /// Substitution variants of the truncated dictionary words
    Substitution,
    /// Dictionary words shorter than `L`, completed over an alphabet
    Suffix(Alphabet),
    /// Every `L`-byte string over an alphabet
    BruteForce(Alphabet),
}

impl Strategy {
    /// The full strategy sequence, most likely candidates first
    pub const SEQUENCE: [Strategy; 6] = [
        Strategy::Dictionary,
        Strategy::Substitution,
        Strategy::Suffix(Alphabet::Digits),
        Strategy::Suffix(Alphabet::Lowercase),
        Strategy::BruteForce(Alphabet::Lowercase),
        Strategy::BruteForce(Alphabet::Frequency),
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Dictionary => f.write_str("dictionary"),
            Strategy::Substitution => f.write_str("substitution"),
            Strategy::Suffix(a) => write!(f, "suffix:{}", a),
            Strategy::BruteForce(a) => write!(f, "brute:{}", a),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyParseError {
    #[error("unknown strategy '{0}' (expected dictionary, substitution, suffix:<alphabet> or brute:<alphabet>)")]
    Unknown(String),

    #[error(transparent)]
    Alphabet(#[from] UnknownAlphabet),
}

/// Parses the names printed by `Display`
impl FromStr for Strategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "dictionary" => Ok(Strategy::Dictionary),
            None if s == "substitution" => Ok(Strategy::Substitution),
            Some(("suffix", alphabet)) => Ok(Strategy::Suffix(alphabet.parse()?)),
            Some(("brute", alphabet)) => Ok(Strategy::BruteForce(alphabet.parse()?)),
            _ => Err(StrategyParseError::Unknown(s.to_string())),
        }
    }
}

/// Run options
#[derive(Clone, Debug)]
pub struct GuessConfig {
    /// Candidate length `L`
    pub max_len: usize,
    /// Maximum simultaneous substitutions
    pub max_subs: usize,
    /// Stop matching once every bank entry is matched
    pub stop_when_all_matched: bool,
    /// Candidates between two progress log lines (0 = never)
    pub progress_interval: u64,
    /// Strategies to run, in order
    pub strategies: Vec<Strategy>,
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            max_len: MAX_PWD_LEN,
            max_subs: MAX_SUBS,
            stop_when_all_matched: false,
            progress_interval: PROGRESS_INTERVAL,
            strategies: Strategy::SEQUENCE.to_vec(),
        }
    }
}

impl GuessConfig {
    /// Check the options before a run
    pub fn validate(&self) -> Result<()> {
        if self.max_len == 0 || self.max_len > MAX_CONFIG_LEN {
            return Err(GuessError::InvalidLength {
                max: MAX_CONFIG_LEN,
                found: self.max_len,
            });
        }
        if self.max_subs > MAX_CONFIG_LEN {
            return Err(GuessError::InvalidSubstitutions {
                max: MAX_CONFIG_LEN,
                found: self.max_subs,
            });
        }
        Ok(())
    }
}

/// Receiver of generated candidates
pub trait GuessSink {
    /// Handle one candidate; `Break` ends the run
    fn guess(&mut self, candidate: &[u8]) -> Result<ControlFlow<()>>;

    /// True when the sink cannot accept any candidate
    fn is_done(&self) -> bool {
        false
    }
}

/// Outcome of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Candidates handed to the sink
    pub candidates: u64,
    /// Whether the sink ended the run before every strategy was exhausted
    pub stopped_early: bool,
}

// =============================================================================
// Sinks
// =============================================================================

/// Generation mode: print up to `budget` candidates, one per line
pub struct PrintSink<W> {
    out: W,
    remaining: u64,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W, budget: u64) -> Self {
        Self {
            out,
            remaining: budget,
        }
    }

    /// Guesses left in the budget
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Flush the writer and hand it back
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> GuessSink for PrintSink<W> {
    fn guess(&mut self, candidate: &[u8]) -> Result<ControlFlow<()>> {
        if self.remaining == 0 {
            return Ok(ControlFlow::Break(()));
        }

        self.out.write_all(candidate)?;
        self.out.write_all(b"\n")?;
        self.remaining -= 1;

        if self.remaining == 0 {
            self.out.flush()?;
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

/// Matching mode: hash every candidate and match it against a bank
pub struct MatchSink<'b, W> {
    bank: &'b mut DigestBank,
    out: W,
    log: Option<ResultsLog>,
    matches: Vec<Match>,
    stop_when_all_matched: bool,
    progress_interval: u64,
    seen: u64,
}

impl<'b, W: Write> MatchSink<'b, W> {
    pub fn new(bank: &'b mut DigestBank, out: W) -> Self {
        Self {
            bank,
            out,
            log: None,
            matches: Vec::new(),
            stop_when_all_matched: false,
            progress_interval: 0,
            seen: 0,
        }
    }

    /// Also append every match to `log`
    pub fn with_log(mut self, log: ResultsLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Take `stop_when_all_matched` and `progress_interval` from `config`
    pub fn configure(mut self, config: &GuessConfig) -> Self {
        self.stop_when_all_matched = config.stop_when_all_matched;
        self.progress_interval = config.progress_interval;
        self
    }

    /// Matches found so far, in discovery order
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }

    fn report(&mut self, candidate: &[u8], digest: &Digest, index: usize) -> Result<()> {
        let m = Match {
            candidate: candidate.to_vec(),
            index,
        };

        self.out.write_all(candidate)?;
        writeln!(self.out, " {}", m.record())?;
        self.out.flush()?;
        if let Some(log) = self.log.as_mut() {
            log.record(&m)?;
        }

        info!(
            candidate = %String::from_utf8_lossy(candidate),
            index,
            digest = %digest_hex(digest),
            matched = self.bank.matched_count(),
            total = self.bank.len(),
            "digest matched"
        );
        self.matches.push(m);
        Ok(())
    }
}

impl<W: Write> GuessSink for MatchSink<'_, W> {
    fn guess(&mut self, candidate: &[u8]) -> Result<ControlFlow<()>> {
        self.seen += 1;

        let digest = sha256(candidate);
        if let Some(index) = self.bank.match_digest(&digest) {
            self.report(candidate, &digest, index)?;
        }

        if self.progress_interval > 0 && self.seen % self.progress_interval == 0 {
            info!(
                candidates = self.seen,
                current = %String::from_utf8_lossy(candidate),
                matched = self.bank.matched_count(),
                total = self.bank.len(),
                "progress"
            );
        }

        if self.is_done() {
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn is_done(&self) -> bool {
        self.stop_when_all_matched && self.bank.all_matched()
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Forwards buffer states to a sink, keeping the first sink error
struct Emitter<'s, S> {
    sink: &'s mut S,
    scratch: Vec<u8>,
    candidates: u64,
    error: Option<GuessError>,
}

impl<S: GuessSink> Emitter<'_, S> {
    fn emit(&mut self, buf: &CandidateBuffer) -> ControlFlow<()> {
        buf.write_bytes(&mut self.scratch);
        self.candidates += 1;
        match self.sink.guess(&self.scratch) {
            Ok(flow) => flow,
            Err(e) => {
                self.error = Some(e);
                ControlFlow::Break(())
            }
        }
    }
}

/// Strategy sequencer over a dictionary
pub struct Guesser<'w> {
    config: GuessConfig,
    words: &'w [Vec<u8>],
    table: SubstitutionTable,
}

impl<'w> Guesser<'w> {
    pub fn new(config: GuessConfig, words: &'w [Vec<u8>]) -> Self {
        Self {
            config,
            words,
            table: SubstitutionTable::leet(),
        }
    }

    pub fn config(&self) -> &GuessConfig {
        &self.config
    }

    /// Run every configured strategy in order
    ///
    /// Each strategy runs until it is exhausted; the run ends early only when
    /// the sink breaks (budget spent, or every digest matched when configured).
    pub fn run<S: GuessSink>(&self, sink: &mut S) -> Result<RunSummary> {
        self.config.validate()?;

        let len = self.config.max_len;
        let mut buf = CandidateBuffer::new(len);
        let mut em = Emitter {
            sink,
            scratch: vec![0u8; len],
            candidates: 0,
            error: None,
        };

        let mut stopped_early = false;
        for &strategy in &self.config.strategies {
            if em.sink.is_done() {
                stopped_early = true;
                break;
            }

            info!(%strategy, candidates = em.candidates, "starting strategy");
            let flow = self.run_strategy(strategy, &mut buf, &mut em);

            if let Some(e) = em.error.take() {
                return Err(e);
            }
            if flow.is_break() {
                stopped_early = true;
                break;
            }
        }

        info!(candidates = em.candidates, stopped_early, "run finished");
        Ok(RunSummary {
            candidates: em.candidates,
            stopped_early,
        })
    }

    fn run_strategy<S: GuessSink>(
        &self,
        strategy: Strategy,
        buf: &mut CandidateBuffer,
        em: &mut Emitter<'_, S>,
    ) -> ControlFlow<()> {
        let len = buf.len();

        match strategy {
            Strategy::Dictionary => {
                for word in self.words.iter().filter(|w| w.len() >= len) {
                    buf.load_prefix(word);
                    em.emit(buf)?;
                }
            }
            Strategy::Substitution => {
                let expander = SubstitutionExpander::with_max_subs(&self.table, self.config.max_subs);
                for word in self.words.iter().filter(|w| w.len() >= len) {
                    buf.load_prefix(word);
                    debug!(
                        word = %String::from_utf8_lossy(&word[..len]),
                        variants = expander.variant_count(&word[..len]),
                        "expanding substitutions"
                    );
                    expander.expand(buf, |b| em.emit(b))?;
                }
            }
            Strategy::Suffix(alphabet) => {
                for word in self.words.iter().filter(|w| w.len() < len) {
                    let offset = buf.load_prefix(word);
                    debug!(
                        word = %String::from_utf8_lossy(word),
                        %alphabet,
                        space = suffix_space(len, offset, alphabet),
                        "completing suffix"
                    );
                    enumerate_suffix(buf, offset, alphabet, |b| em.emit(b))?;
                }
            }
            Strategy::BruteForce(alphabet) => {
                debug!(%alphabet, space = suffix_space(len, 0, alphabet), "brute force");
                enumerate_suffix(buf, 0, alphabet, |b| em.emit(b))?;
            }
        }

        ControlFlow::Continue(())
    }
}
