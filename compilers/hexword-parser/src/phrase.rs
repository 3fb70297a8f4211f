use hexword_protocol::{Direction, HexCoord, Word};

/// Words read along a path of adjacent cells, first word first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Phrase {
    words: Vec<Word>,
    cells: Vec<HexCoord>,
}

/// One hop inside a phrase: from `cell`, the next word lies in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub index: usize,
    pub cell: HexCoord,
    pub direction: Direction,
}

impl Phrase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: Word, cell: HexCoord) {
        self.words.push(word);
        self.cells.push(cell);
    }

    pub fn pop(&mut self) -> Option<(Word, HexCoord)> {
        let word = self.words.pop()?;
        let cell = self.cells.pop()?;
        Some((word, cell))
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn cells(&self) -> &[HexCoord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn start(&self) -> Option<HexCoord> {
        self.cells.first().copied()
    }

    pub fn contains_cell(&self, cell: HexCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Hops between consecutive words. The last word has no successor and
    /// therefore no link.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.cells.windows(2).enumerate().filter_map(|(index, pair)| {
            pair[0]
                .direction_to(pair[1])
                .map(|direction| Link { index, cell: pair[0], direction })
        })
    }

    /// Order-sensitive polynomial hash of the word sequence. Cells do not
    /// take part, so the same sentence laid out elsewhere hashes equal.
    pub fn hash_words(&self) -> u64 {
        hash_words(&self.words)
    }
}

pub fn hash_words(words: &[Word]) -> u64 {
    words
        .iter()
        .fold(0u64, |h, w| h.wrapping_mul(31).wrapping_add(*w as u64 + 1))
}

impl std::fmt::Display for Phrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}
