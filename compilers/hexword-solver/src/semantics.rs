use hexword_protocol::{NounType, Word};

use crate::rules::{Assignment, RuleSet};

/// What the words after the latest verb assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// After `AM`: objects only.
    Noun,
    /// After `IS`: objects or properties, typed by the word itself.
    NounOrProperty,
    /// After `CAN`: abilities.
    Ability,
}

impl Target {
    fn assignment(self, word: Word) -> Option<Assignment> {
        match self {
            Target::Noun => word
                .noun()
                .filter(|noun| *noun != NounType::I)
                .map(Assignment::Noun),
            Target::NounOrProperty => match (word.noun(), word.property()) {
                (Some(noun), _) if noun != NounType::I => Some(Assignment::Noun(noun)),
                (_, Some(property)) => Some(Assignment::Property(property)),
                _ => None,
            },
            Target::Ability => word.ability().map(Assignment::Ability),
        }
    }
}

/// Turn one grammatically valid sentence into rule assignments.
///
/// The grammar fixes the word order this relies on; a word that does not fit
/// it is an internal error, asserted in debug builds and skipped otherwise.
pub fn extract(words: &[Word]) -> RuleSet {
    let mut rules = RuleSet::new();
    match words.split_first() {
        Some((Word::I, rest)) => extract_i(rest, &mut rules),
        Some((first, rest)) => extract_object(*first, rest, &mut rules),
        None => {}
    }
    rules
}

fn extract_i(rest: &[Word], rules: &mut RuleSet) {
    let mut target = None;
    let mut words = rest.iter().copied().peekable();

    while let Some(word) = words.next() {
        match word {
            Word::Am => target = Some(Target::Noun),
            Word::Can => target = Some(Target::Ability),
            Word::And => {
                // Restating the subject is a no-op.
                let _ = words.next_if_eq(&Word::I);
            }
            _ => insert_all(rules, &[NounType::I], target, word),
        }
    }
}

fn extract_object(first: Word, rest: &[Word], rules: &mut RuleSet) {
    let mut subjects: Vec<NounType> = first.noun().into_iter().collect();
    debug_assert!(!subjects.is_empty(), "sentence starts with non-noun {first}");
    let mut target = None;

    for word in rest.iter().copied() {
        match word {
            Word::Is => target = Some(Target::NounOrProperty),
            Word::Can => target = Some(Target::Ability),
            Word::And => {}
            // Before the first verb, `AND <object>` adds another subject.
            _ if target.is_none() => {
                let subject = word.noun();
                debug_assert!(subject.is_some(), "subject list holds non-noun {word}");
                subjects.extend(subject);
            }
            _ => insert_all(rules, &subjects, target, word),
        }
    }
}

fn insert_all(rules: &mut RuleSet, subjects: &[NounType], target: Option<Target>, word: Word) {
    let assignment = target.and_then(|t| t.assignment(word));
    debug_assert!(assignment.is_some(), "{word} does not fit {target:?}");
    if let Some(assignment) = assignment {
        for subject in subjects {
            rules.insert(*subject, assignment);
        }
    }
}
