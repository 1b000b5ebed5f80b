//! Parallel rewriting and post-rule substitution.
//!
//! Every pass builds a fresh string from the previous one, so the result of a
//! pass never depends on the order in which symbols are visited.

use crate::error::LsysError;
use crate::grammar::GrammarSpec;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

/// An immutable string of single-character symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SymbolString {
    text: String,
    len: usize,
}

impl SymbolString {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self { text, len }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of symbols (not bytes).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn symbols(&self) -> std::str::Chars<'_> {
        self.text.chars()
    }

    /// Number of occurrences of `symbol`.
    pub fn count(&self, symbol: char) -> usize {
        self.text.chars().filter(|&c| c == symbol).count()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for SymbolString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for SymbolString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Exact length of `expand(spec, generations)`, computed from symbol counts
/// without building any string. Saturates at `u64::MAX`.
///
/// One pass is a linear map on per-symbol counts, so `generations` passes
/// are evaluated by repeated squaring in `O(k³ log generations)` for an
/// alphabet of `k` symbols.
pub fn projected_len(spec: &GrammarSpec, generations: u32) -> u64 {
    let alphabet: Vec<char> = spec
        .start()
        .chars()
        .chain(spec.rules().keys().copied())
        .chain(spec.rules().values().flat_map(|body| body.chars()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index = |c: char| alphabet.binary_search(&c).ok();

    // step[i][j]: copies of symbol j produced by one symbol i in one pass.
    let k = alphabet.len();
    let mut step = vec![vec![0u64; k]; k];
    for (i, &c) in alphabet.iter().enumerate() {
        match spec.rule(c) {
            Some(body) => {
                for j in body.chars().filter_map(index) {
                    step[i][j] = step[i][j].saturating_add(1);
                }
            }
            None => step[i][i] = 1,
        }
    }

    let mut counts = vec![0u64; k];
    for i in spec.start().chars().filter_map(index) {
        counts[i] += 1;
    }

    let mut remaining = generations;
    while remaining > 0 {
        if remaining & 1 == 1 {
            counts = apply_counts(&counts, &step);
        }
        remaining >>= 1;
        if remaining > 0 {
            step = compose_counts(&step, &step);
        }
    }

    counts.iter().fold(0u64, |acc, &n| acc.saturating_add(n))
}

fn apply_counts(counts: &[u64], step: &[Vec<u64>]) -> Vec<u64> {
    let mut next = vec![0u64; counts.len()];
    for (&n, row) in counts.iter().zip(step) {
        if n == 0 {
            continue;
        }
        for (slot, &m) in next.iter_mut().zip(row) {
            *slot = slot.saturating_add(n.saturating_mul(m));
        }
    }
    next
}

fn compose_counts(a: &[Vec<u64>], b: &[Vec<u64>]) -> Vec<Vec<u64>> {
    a.iter().map(|row| apply_counts(row, b)).collect()
}

/// Applies the rewrite rules of `spec` to its start string `generations` times.
///
/// Fails with [`LsysError::ResourceLimit`] before allocating anything when the
/// result would exceed `max_symbols`.
///
/// A string that comes back to an earlier state repeats from there on, so
/// once such a cycle is found the remaining passes are reduced modulo its
/// period. The check keeps a single snapshot that is refreshed at
/// power-of-two distances (Brent's cycle detection).
pub fn expand(
    spec: &GrammarSpec,
    generations: u32,
    max_symbols: u64,
) -> Result<SymbolString, LsysError> {
    let projected = projected_len(spec, generations);
    if projected > max_symbols {
        return Err(LsysError::ResourceLimit {
            projected,
            limit: max_symbols,
        });
    }

    let rewrite = |s: &str| substitute(s, |c| spec.rule(c));
    let mut current = spec.start().to_string();
    let mut snapshot = current.clone();
    let mut snapshot_pass = 0u32;
    let mut power = 1u32;
    let mut pass = 0u32;

    while pass < generations {
        if !current.chars().any(|c| spec.rule(c).is_some()) {
            // Identity from here on.
            break;
        }
        current = rewrite(&current);
        pass += 1;
        trace!(title = spec.title(), pass, bytes = current.len(), "rewrite pass");

        if current == snapshot {
            let period = pass - snapshot_pass;
            let left = (generations - pass) % period;
            debug!(title = spec.title(), pass, period, left, "rewrite cycle");
            for _ in 0..left {
                current = rewrite(&current);
            }
            break;
        }
        if pass - snapshot_pass == power {
            snapshot.clone_from(&current);
            snapshot_pass = pass;
            power = power.saturating_mul(2);
        }
    }

    Ok(SymbolString::new(current))
}

/// Replaces each symbol by its post-rule once. Post-rules are never re-applied.
pub fn terminalize(spec: &GrammarSpec, s: SymbolString) -> SymbolString {
    if spec.post_rules().is_empty() {
        return s;
    }
    SymbolString::new(substitute(s.as_str(), |c| spec.post_rule(c)))
}

/// One parallel substitution pass into a buffer sized by a pre-pass.
fn substitute<'a>(input: &str, lookup: impl Fn(char) -> Option<&'a str>) -> String {
    let capacity = input
        .chars()
        .map(|c| lookup(c).map_or(c.len_utf8(), str::len))
        .sum();
    let mut out = String::with_capacity(capacity);
    for c in input.chars() {
        match lookup(c) {
            Some(body) => out.push_str(body),
            None => out.push(c),
        }
    }
    out
}
