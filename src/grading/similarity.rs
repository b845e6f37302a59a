//! Token-level similarity primitives used by the text and speech strategies.

use std::collections::HashMap;

/// Max words listed per side in a rendered word diff.
const DIFF_LIST_CAP: usize = 10;

/// Levenshtein distance over token sequences (insert, delete and substitute all cost 1).
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
  let (m, n) = (a.len(), b.len());
  if m == 0 {
    return n;
  }
  if n == 0 {
    return m;
  }

  let mut dp = vec![vec![0usize; n + 1]; m + 1];
  for (i, row) in dp.iter_mut().enumerate() {
    row[0] = i;
  }
  for j in 0..=n {
    dp[0][j] = j;
  }
  for i in 1..=m {
    for j in 1..=n {
      let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
      dp[i][j] = (dp[i - 1][j] + 1)
        .min(dp[i][j - 1] + 1)
        .min(dp[i - 1][j - 1] + cost);
    }
  }
  dp[m][n]
}

/// Word error rate of `said` against `target`. An empty target counts as length 1.
pub fn word_error_rate<T: PartialEq>(said: &[T], target: &[T]) -> f64 {
  edit_distance(said, target) as f64 / target.len().max(1) as f64
}

/// `round(100 * hits / total)`, with `total` floored at 1 and the result capped at 100.
pub fn percent(hits: usize, total: usize) -> u8 {
  let ratio = hits as f64 / total.max(1) as f64;
  (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Multiset difference between two word lists, rendered as
/// `"Missing: a, b | Extra: c"`. Empty when the lists hold the same words.
pub fn word_diff<S: AsRef<str>>(target: &[S], said: &[S]) -> String {
  let target_counts = counts(target);
  let said_counts = counts(said);

  let missing = surplus(&target_counts, &said_counts);
  let extra = surplus(&said_counts, &target_counts);

  let mut parts = Vec::with_capacity(2);
  if !missing.is_empty() {
    parts.push(format!("Missing: {}", capped(&missing)));
  }
  if !extra.is_empty() {
    parts.push(format!("Extra: {}", capped(&extra)));
  }
  parts.join(" | ")
}

/// Per-word counts, keeping first-seen order so the diff renders deterministically.
fn counts<S: AsRef<str>>(words: &[S]) -> Vec<(&str, usize)> {
  let mut order: Vec<(&str, usize)> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();
  for w in words {
    let w = w.as_ref();
    match index.get(w) {
      Some(&i) => order[i].1 += 1,
      None => {
        index.insert(w, order.len());
        order.push((w, 1));
      }
    }
  }
  order
}

/// Words occurring more often in `left` than in `right`, repeated by the surplus.
fn surplus<'a>(left: &[(&'a str, usize)], right: &[(&'a str, usize)]) -> Vec<&'a str> {
  let mut out = Vec::new();
  for (word, count) in left {
    let other = right.iter().find(|(w, _)| w == word).map(|(_, c)| *c).unwrap_or(0);
    for _ in other..*count {
      out.push(*word);
    }
  }
  out
}

fn capped(words: &[&str]) -> String {
  words.iter().take(DIFF_LIST_CAP).copied().collect::<Vec<_>>().join(", ")
}
