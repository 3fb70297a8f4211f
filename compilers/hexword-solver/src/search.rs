use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use hexword_ecs::components::PhraseElement;
use hexword_ecs::Board;
use hexword_parser::{parse_phrase, Phrase, Verdict};
use hexword_protocol::{Direction, GroupId, HexCoord, PhraseId, Word};

/// Arrow metadata for one cell of one phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionRecord {
    pub phrase: PhraseId,
    /// Where the next word of the phrase lies.
    pub direction: Direction,
    pub element: PhraseElement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPhrase {
    pub id: PhraseId,
    pub group: GroupId,
    pub phrase: Phrase,
}

/// Everything one search pass found on the board.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub phrases: Vec<DiscoveredPhrase>,
    pub directions: BTreeMap<HexCoord, Vec<DirectionRecord>>,
}

impl Discovery {
    /// Word-sequence hashes of every discovered phrase.
    pub fn hashes(&self) -> BTreeSet<u64> {
        self.phrases.iter().map(|p| p.phrase.hash_words()).collect()
    }

    pub fn records_at(&self, cell: HexCoord) -> &[DirectionRecord] {
        self.directions.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `cell` already belongs to a phrase heading in `direction`.
    fn heads(&self, cell: HexCoord, direction: Direction) -> bool {
        self.records_at(cell).iter().any(|r| r.direction == direction)
    }
}

/// Find every valid phrase spelled by the word tiles on `board`.
pub fn discover(board: &Board) -> Discovery {
    let mut search = Search {
        discovery: Discovery::default(),
        recorded: HashSet::new(),
    };
    let mut visited = HashSet::new();
    let mut next_group = 0u32;

    for cell in board.cells() {
        if visited.contains(&cell) || board.word_at(cell).is_none() {
            continue;
        }

        let mut group = collect_group(board, cell, &mut visited);
        group.sort_by_key(|(cell, _)| (cell.q, cell.r));

        let group_id = GroupId(next_group);
        next_group += 1;

        // Per-group lookup, dropped before the next group is collected.
        let words: HashMap<HexCoord, Word> = group.iter().copied().collect();
        for (start, word) in &group {
            if word.is_object() {
                let mut phrase = Phrase::new();
                search.grow(&words, *start, &mut phrase, group_id);
            }
        }
    }

    tracing::trace!(
        phrases = search.discovery.phrases.len(),
        groups = next_group,
        "phrase search finished"
    );
    search.discovery
}

/// Flood fill from `origin` through cells holding exactly one word tile.
fn collect_group(
    board: &Board,
    origin: HexCoord,
    visited: &mut HashSet<HexCoord>,
) -> Vec<(HexCoord, Word)> {
    let mut group = Vec::new();
    let mut stack = vec![origin];

    while let Some(cell) = stack.pop() {
        if !visited.insert(cell) {
            continue;
        }
        // Empty or ambiguous cells end the flood here.
        let Some(word) = board.word_at(cell) else {
            continue;
        };
        group.push((cell, word));
        stack.extend(Direction::ALL.iter().map(|d| cell.neighbor(*d)));
    }

    group
}

struct Search {
    discovery: Discovery,
    recorded: HashSet<(Vec<Word>, HexCoord)>,
}

impl Search {
    /// Append the word at `cell` to `phrase` and keep extending while the
    /// grammar allows. The phrase's own cells act as its visited set, so a
    /// path never loops back on itself while other phrases may still reuse
    /// those cells.
    fn grow(
        &mut self,
        words: &HashMap<HexCoord, Word>,
        cell: HexCoord,
        phrase: &mut Phrase,
        group: GroupId,
    ) {
        let Some(&word) = words.get(&cell) else {
            return;
        };
        phrase.push(word, cell);

        let verdict = parse_phrase(phrase);
        if verdict == Verdict::Valid {
            self.record(phrase, group);
        }
        if verdict != Verdict::Invalid {
            for direction in Direction::ALL {
                let next = cell.neighbor(direction);
                if phrase.contains_cell(next) {
                    continue;
                }
                // A phrase already reads from `next` back into `cell`.
                if self.discovery.heads(next, direction.opposite()) {
                    continue;
                }
                self.grow(words, next, phrase, group);
            }
        }

        phrase.pop();
    }

    fn record(&mut self, phrase: &Phrase, group: GroupId) {
        let Some(start) = phrase.start() else {
            return;
        };
        if !self.recorded.insert((phrase.words().to_vec(), start)) {
            return;
        }

        let id = PhraseId(self.discovery.phrases.len() as u32);
        for link in phrase.links() {
            let element = if link.index == 0 {
                PhraseElement::Start
            } else {
                PhraseElement::Middle
            };
            self.discovery
                .directions
                .entry(link.cell)
                .or_default()
                .push(DirectionRecord {
                    phrase: id,
                    direction: link.direction,
                    element,
                });
        }

        tracing::trace!(%id, %phrase, "phrase discovered");
        self.discovery.phrases.push(DiscoveredPhrase {
            id,
            group,
            phrase: phrase.clone(),
        });
    }
}
