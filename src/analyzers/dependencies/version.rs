//! Ordering for Python-style version strings.
//!
//! Release segments compare numerically with missing segments treated as
//! zero, so `1.0 == 1.0.0` and `1.9 < 1.10`. Pre-releases sort before
//! their release, post-releases after it. Epochs and local labels are
//! ignored.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Dev,
    Alpha,
    Beta,
    Candidate,
    Final,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    release: Vec<u64>,
    phase: Phase,
    phase_number: u64,
}

impl Version {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().trim_start_matches(['v', 'V']);
        let text = text.split_once('!').map(|(_, v)| v).unwrap_or(text);
        let text = text.split('+').next().unwrap_or(text);

        let release_end = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(text.len());
        let release: Vec<u64> = text[..release_end]
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().ok())
            .collect::<Option<_>>()?;
        if release.is_empty() {
            return None;
        }

        let suffix = text[release_end..]
            .trim_start_matches(['.', '-', '_'])
            .to_ascii_lowercase();
        let (phase, rest) = split_phase(&suffix);
        let phase_number = rest
            .trim_start_matches(['.', '-', '_'])
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap_or(0);

        Some(Self {
            release,
            phase,
            phase_number,
        })
    }
}

fn split_phase(suffix: &str) -> (Phase, &str) {
    const PREFIXES: [(&str, Phase); 11] = [
        ("dev", Phase::Dev),
        ("alpha", Phase::Alpha),
        ("a", Phase::Alpha),
        ("beta", Phase::Beta),
        ("b", Phase::Beta),
        ("preview", Phase::Candidate),
        ("pre", Phase::Candidate),
        ("rc", Phase::Candidate),
        ("c", Phase::Candidate),
        ("post", Phase::Post),
        ("rev", Phase::Post),
    ];
    PREFIXES
        .iter()
        .find_map(|(prefix, phase)| suffix.strip_prefix(prefix).map(|rest| (*phase, rest)))
        .unwrap_or((Phase::Final, ""))
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        self.phase
            .cmp(&other.phase)
            .then(self.phase_number.cmp(&other.phase_number))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two version strings. `None` when either does not parse.
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    Some(Version::parse(a)?.cmp(&Version::parse(b)?))
}

/// Declared is older than installed. Unparseable versions are never outdated.
pub fn is_outdated(declared: &str, installed: &str) -> bool {
    compare_versions(declared, installed) == Some(Ordering::Less)
}
