//! Sequence similarity between the typed text and the target sentence.
//!
//! The score is the classic matching-blocks ratio: find the longest common
//! run of characters, recurse on the pieces to the left and right of it, and
//! sum the sizes of every block found. With `M` matched characters and `T`
//! characters in both strings together the ratio is `2 * M / T`.

use std::collections::HashMap;

/// Below this length of `b` every element may seed a match
const AUTOJUNK_MIN_LEN: usize = 200;

/// A run of `size` equal elements at `a[a_start..]` and `b[b_start..]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Matching-blocks matcher over two character sequences
#[derive(Debug)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// positions of each non-popular element of `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let b2j = Self::index_b(&b);
        Self { a, b, b2j }
    }

    fn index_b(b: &[char]) -> HashMap<char, Vec<usize>> {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        // very common elements in long sequences do not seed matches
        if b.len() >= AUTOJUNK_MIN_LEN {
            let popular_threshold = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= popular_threshold);
        }

        b2j
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block that starts earliest in `a`, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // popular elements never seed a match but may still extend one
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All non-overlapping matching blocks, ordered by position, with
    /// adjacent blocks merged.
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
            blocks.push(m);
        }

        blocks.sort_by_key(|m| (m.a_start, m.b_start));

        let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }

        merged
    }

    /// Similarity in `[0, 1]`; two empty sequences are identical.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

/// Similarity ratio of `typed` against `target`
pub fn similarity_ratio(typed: &str, target: &str) -> f64 {
    SequenceMatcher::new(typed, target).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        let s = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(similarity_ratio(s, s), 1.0);
        assert_eq!(similarity_ratio("a", "a"), 1.0);
    }

    proptest::proptest! {
        // kept below 200 chars: past that, characters seen in more than 1%
        // of positions are junked and long repetitive strings no longer match
        #[test]
        fn any_string_matches_itself(s in "\\PC{1,199}") {
            proptest::prop_assert_eq!(similarity_ratio(&s, &s), 1.0);
        }

        #[test]
        fn ratio_stays_in_unit_range(a in "\\PC{0,60}", b in "\\PC{0,60}") {
            let r = similarity_ratio(&a, &b);
            proptest::prop_assert!((0.0..=1.0).contains(&r), "ratio {} for {:?} / {:?}", r, a, b);
        }
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn empty_against_non_empty_is_zero() {
        assert_eq!(similarity_ratio("", "abc"), 0.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn both_empty_is_one() {
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn classic_ratio_example() {
        // "abcd" vs "bcde": one block "bcd" of size 3 -> 6 / 8
        assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn prefix_is_partially_similar() {
        // "hello" inside "hello world": 2*5 / 16
        assert_eq!(similarity_ratio("hello", "hello world"), 10.0 / 16.0);
    }

    #[test]
    fn longest_match_prefers_earliest_block() {
        let m = SequenceMatcher::new(" abcd", "abcd abcd");
        let block = m.find_longest_match(0, 5, 0, 9);
        assert_eq!(
            block,
            MatchBlock {
                a_start: 0,
                b_start: 4,
                size: 5
            }
        );
    }

    #[test]
    fn matching_blocks_are_ordered_and_merged() {
        let m = SequenceMatcher::new("abxcd", "abcd");
        let blocks = m.matching_blocks();
        assert_eq!(
            blocks,
            vec![
                MatchBlock {
                    a_start: 0,
                    b_start: 0,
                    size: 2
                },
                MatchBlock {
                    a_start: 3,
                    b_start: 2,
                    size: 2
                },
            ]
        );
        assert_eq!(m.ratio(), 8.0 / 9.0);
    }

    #[test]
    fn ratio_counts_unicode_scalars() {
        assert_eq!(similarity_ratio("héllo", "héllo"), 1.0);
        // one substituted char out of five on each side
        assert_eq!(similarity_ratio("héllo", "hello"), 0.8);
    }

    #[test]
    fn long_sequences_still_match_popular_characters() {
        let target = "a".repeat(300);
        assert_eq!(similarity_ratio(&target, &target), 1.0);
    }
}
