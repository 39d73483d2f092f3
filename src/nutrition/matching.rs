//! Fuzzy food-name matching.
//!
//! Similarity is the Ratcliff/Obershelp "gestalt" ratio: find the longest
//! common block, recurse on both sides of it, and score `2*M / T` where `M`
//! is the number of matched characters and `T` the combined length.

use std::collections::HashMap;

/// Candidate side of a comparison, with its character positions indexed.
struct Indexed {
    chars: Vec<char>,
    positions: HashMap<char, Vec<usize>>,
}

impl Indexed {
    fn new(s: &str) -> Self {
        let chars: Vec<char> = s.chars().collect();
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in chars.iter().enumerate() {
            positions.entry(*c).or_default().push(j);
        }
        Self { chars, positions }
    }
}

/// Longest block `a[i..i+k] == b[j..j+k]` within the given bounds. Ties go
/// to the earliest start in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &Indexed,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut run: HashMap<usize, usize> = HashMap::new();
    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = b.positions.get(c) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j.checked_sub(1).and_then(|p| run.get(&p)).copied().unwrap_or(0) + 1;
                next.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        run = next;
    }
    (best_i, best_j, best_k)
}

fn matched_chars(a: &[char], b: &Indexed) -> usize {
    let mut total = 0;
    let mut queue = vec![((0, a.len()), (0, b.chars.len()))];
    while let Some(((alo, ahi), (blo, bhi))) = queue.pop() {
        let (i, j, k) = longest_match(a, b, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push(((alo, i), (blo, j)));
        }
        if i + k < ahi && j + k < bhi {
            queue.push(((i + k, ahi), (j + k, bhi)));
        }
    }
    total
}

fn score(matches: usize, len: usize) -> f64 {
    if len == 0 {
        1.0
    } else {
        2.0 * matches as f64 / len as f64
    }
}

/// Upper bound from lengths alone.
fn length_bound(a: usize, b: usize) -> f64 {
    score(a.min(b), a + b)
}

/// Upper bound from the character multisets.
fn multiset_bound(a: &[char], b: &Indexed) -> f64 {
    let mut avail: HashMap<char, usize> =
        b.positions.iter().map(|(c, js)| (*c, js.len())).collect();
    let mut matches = 0;
    for c in a {
        if let Some(n) = avail.get_mut(c) {
            if *n > 0 {
                *n -= 1;
                matches += 1;
            }
        }
    }
    score(matches, a.len() + b.chars.len())
}

/// Similarity of `candidate` to `word`, in `0.0..=1.0`.
pub fn similarity(candidate: &str, word: &str) -> f64 {
    let a: Vec<char> = candidate.chars().collect();
    let b = Indexed::new(word);
    score(matched_chars(&a, &b), a.len() + b.chars.len())
}

/// Up to `n` candidates scoring at least `cutoff` against `word`, best
/// first; equal scores order by name, descending.
pub fn close_matches<'a, I>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 {
        return Vec::new();
    }
    let b = Indexed::new(word);
    let mut scored: Vec<(f64, &str)> = Vec::new();
    for cand in candidates {
        let a: Vec<char> = cand.chars().collect();
        if length_bound(a.len(), b.chars.len()) < cutoff || multiset_bound(&a, &b) < cutoff {
            continue;
        }
        let ratio = score(matched_chars(&a, &b), a.len() + b.chars.len());
        if ratio >= cutoff {
            scored.push((ratio, cand));
        }
    }
    scored.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| y.1.cmp(x.1)));
    scored.into_iter().take(n).map(|(_, s)| s.to_string()).collect()
}

/// Sorted in-memory list of catalog names used for fuzzy search.
#[derive(Debug, Clone, Default)]
pub struct FoodIndex {
    names: Vec<String>,
}

impl FoodIndex {
    pub fn new(mut names: Vec<String>) -> Self {
        names.sort();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn close_matches(&self, word: &str, n: usize, cutoff: f64) -> Vec<String> {
        close_matches(word, self.names.iter().map(String::as_str), n, cutoff)
    }
}
