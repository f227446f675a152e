use hashguess_engine::app::guesser::Strategy;
use hashguess_engine::infra::dictionary_io::load_dictionary;
use hashguess_engine::infra::digest_io::{load_digest_bank, save_digests};
use hashguess_engine::{
    Alphabet, DigestBank, GuessConfig, Guesser, Match, MatchSink, PrintSink, ResultsLog, sha256,
    verify_candidates,
};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tempfile::TempDir;

fn write_dictionary(path: &Path, words: &[&str]) {
    let mut text = words.join("\n");
    text.push('\n');
    fs::write(path, text).unwrap();
}

/// Strategies that cover dictionary-derived candidates only
fn dictionary_strategies() -> Vec<Strategy> {
    vec![
        Strategy::Dictionary,
        Strategy::Substitution,
        Strategy::Suffix(Alphabet::Digits),
        Strategy::Suffix(Alphabet::Lowercase),
    ]
}

#[test]
fn test_single_match_from_suffix_strategy() {
    let dir = TempDir::new().unwrap();
    let dict_path = dir.path().join("dict.txt");
    let bank_path = dir.path().join("bank.bin");
    let log_path = dir.path().join("found.txt");

    write_dictionary(&dict_path, &["test"]);
    save_digests(&bank_path, &[sha256(b"test00")]).unwrap();

    let words = load_dictionary(&dict_path).unwrap();
    let mut bank = load_digest_bank(&bank_path).unwrap();
    let config = GuessConfig {
        strategies: dictionary_strategies(),
        ..GuessConfig::default()
    };

    let mut out = Vec::new();
    let mut sink = MatchSink::new(&mut bank, &mut out)
        .configure(&config)
        .with_log(ResultsLog::open(&log_path).unwrap());
    let summary = Guesser::new(config, &words).run(&mut sink).unwrap();
    let matches = sink.into_matches();

    // 10^2 digit suffixes, then 26^2 lowercase suffixes
    assert_eq!(summary.candidates, 100 + 676);
    assert_eq!(
        matches,
        vec![Match {
            candidate: b"test00".to_vec(),
            index: 0
        }]
    );
    assert_eq!(String::from_utf8(out).unwrap(), "test00 1\n");
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "test00 1\n");
    assert!(bank.all_matched());
}

#[test]
fn test_matches_across_strategies_in_order() {
    let words: Vec<Vec<u8>> = vec![b"password".to_vec(), b"abc".to_vec()];
    let targets = [
        sha256(b"abcqz"),   // suffix, lowercase
        sha256(b"passwo"),  // dictionary
        sha256(b"abc123"),  // suffix, digits
        sha256(b"p@ssw0"),  // substitution
    ];
    let mut bank = DigestBank::new(targets.to_vec());

    let config = GuessConfig {
        max_len: 6,
        strategies: dictionary_strategies(),
        ..GuessConfig::default()
    };
    let mut sink = MatchSink::new(&mut bank, std::io::sink()).configure(&config);
    Guesser::new(config, &words).run(&mut sink).unwrap();

    let found: Vec<(String, usize)> = sink
        .into_matches()
        .into_iter()
        .map(|m| (String::from_utf8(m.candidate).unwrap(), m.index))
        .collect();

    // "abcqz" is five bytes and can never be produced at length 6
    assert_eq!(
        found,
        vec![
            ("passwo".to_string(), 1),
            ("p@ssw0".to_string(), 3),
            ("abc123".to_string(), 2),
        ]
    );
    assert_eq!(bank.matched_count(), 3);
}

#[test]
fn test_stop_when_all_matched_on_full_sequence() {
    let words: Vec<Vec<u8>> = vec![b"test".to_vec()];
    let mut bank = DigestBank::new(vec![sha256(b"test00"), sha256(b"test99")]);

    let config = GuessConfig {
        stop_when_all_matched: true,
        ..GuessConfig::default()
    };
    let mut sink = MatchSink::new(&mut bank, std::io::sink()).configure(&config);
    let summary = Guesser::new(config, &words).run(&mut sink).unwrap();

    assert_eq!(summary.candidates, 100);
    assert!(summary.stopped_early);
    assert_eq!(sink.into_matches().len(), 2);
}

#[test]
fn test_print_budget_from_dictionary_file() {
    let dir = TempDir::new().unwrap();
    let dict_path = dir.path().join("dict.txt");
    write_dictionary(&dict_path, &["letmein", "", "qwerty", "abc"]);
    let words = load_dictionary(&dict_path).unwrap();

    let mut sink = PrintSink::new(Vec::new(), 5);
    let summary = Guesser::new(GuessConfig::default(), &words).run(&mut sink).unwrap();
    assert_eq!(sink.remaining(), 0);
    let text = String::from_utf8(sink.into_inner()).unwrap();

    assert_eq!(summary.candidates, 5);
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec!["letmei", "qwerty", "letmeI", "letme1", "letme|"]
    );
}

#[test]
fn test_print_zero_budget() {
    let words: Vec<Vec<u8>> = vec![b"letmein".to_vec()];
    let mut sink = PrintSink::new(Vec::new(), 0);
    let summary = Guesser::new(GuessConfig::default(), &words).run(&mut sink).unwrap();

    assert_eq!(summary.candidates, 0);
    assert!(sink.into_inner().is_empty());
}

#[test]
fn test_verify_candidate_file() {
    let dir = TempDir::new().unwrap();
    let bank_path = dir.path().join("bank.bin");
    let cand_path = dir.path().join("candidates.txt");
    let log_path = dir.path().join("found.txt");

    save_digests(&bank_path, &[sha256(b"qwerty"), sha256(b"abc123")]).unwrap();
    write_dictionary(&cand_path, &["letmein", "abc123", "qwerty", "abc123"]);

    let mut bank = load_digest_bank(&bank_path).unwrap();
    let mut log = ResultsLog::open(&log_path).unwrap();
    let mut out = Vec::new();
    let reader = BufReader::new(File::open(&cand_path).unwrap());
    let found = verify_candidates(reader, &mut bank, &mut out, Some(&mut log)).unwrap();

    let lines: Vec<usize> = found.iter().map(|v| v.line).collect();
    assert_eq!(lines, vec![2, 3]);
    assert_eq!(String::from_utf8(out).unwrap(), "2 abc123 2\n3 qwerty 1\n");
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "abc123 2\nqwerty 1\n");
    assert!(bank.all_matched());
}
