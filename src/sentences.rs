use rand::Rng;

/// Sentences offered for a typing attempt
pub const SENTENCES: [&str; 3] = [
    "The quick brown fox jumps over the lazy dog.",
    "Streamlit makes data apps incredibly fast to build.",
    "Practice makes perfect, so keep typing to improve.",
];

/// Which of the fixed sentences is currently chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentenceChoice {
    index: usize,
}

impl SentenceChoice {
    /// Any index is accepted and wraps around the list
    pub fn new(index: usize) -> Self {
        Self {
            index: index % SENTENCES.len(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &'static str {
        SENTENCES[self.index]
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1)
    }

    pub fn previous(self) -> Self {
        Self::new(self.index + SENTENCES.len() - 1)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(0..SENTENCES.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_is_first_sentence() {
        assert_eq!(SentenceChoice::default().text(), SENTENCES[0]);
    }

    #[test]
    fn index_wraps() {
        assert_eq!(SentenceChoice::new(4).index(), 1);
    }

    #[test]
    fn next_and_previous_cycle() {
        let first = SentenceChoice::new(0);
        assert_eq!(first.previous().index(), 2);
        assert_eq!(first.previous().next(), first);
        assert_eq!(first.next().next().next(), first);
    }

    #[test]
    fn random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(SentenceChoice::random(&mut rng).index() < SENTENCES.len());
        }
    }
}
