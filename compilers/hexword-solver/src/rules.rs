use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use hexword_protocol::{AbilityFlags, AbilityType, NounType, PropertyFlags, PropertyType};

/// One effect a rule grants its subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Assignment {
    /// Transform into another object type (`I AM X` makes X controllable).
    Noun(NounType),
    Property(PropertyType),
    Ability(AbilityType),
}

impl Assignment {
    pub fn noun(&self) -> Option<NounType> {
        match self {
            Assignment::Noun(noun) => Some(*noun),
            _ => None,
        }
    }
}

/// Subject noun to the set of effects granted to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeMap<NounType, BTreeSet<Assignment>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the subject already had this assignment.
    pub fn insert(&mut self, subject: NounType, assignment: Assignment) -> bool {
        self.rules.entry(subject).or_default().insert(assignment)
    }

    /// Union `other` into `self`, subject by subject.
    pub fn merge(&mut self, other: RuleSet) {
        for (subject, assignments) in other.rules {
            self.rules.entry(subject).or_default().extend(assignments);
        }
    }

    pub fn assignments(&self, subject: NounType) -> Option<&BTreeSet<Assignment>> {
        self.rules.get(&subject)
    }

    pub fn contains(&self, subject: NounType, assignment: Assignment) -> bool {
        self.rules
            .get(&subject)
            .map_or(false, |set| set.contains(&assignment))
    }

    pub fn subjects(&self) -> impl Iterator<Item = NounType> + '_ {
        self.rules.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NounType, &BTreeSet<Assignment>)> {
        self.rules.iter().map(|(subject, set)| (*subject, set))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of (subject, assignment) pairs.
    pub fn len(&self) -> usize {
        self.rules.values().map(BTreeSet::len).sum()
    }
}

impl FromIterator<RuleSet> for RuleSet {
    fn from_iter<T: IntoIterator<Item = RuleSet>>(iter: T) -> Self {
        let mut merged = RuleSet::new();
        for rules in iter {
            merged.merge(rules);
        }
        merged
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (subject, assignments) in self.iter() {
            let verb = if subject == NounType::I { "AM" } else { "IS" };
            for assignment in assignments {
                match assignment {
                    Assignment::Noun(noun) => writeln!(f, "{} {verb} {}", subject.word(), noun.word())?,
                    Assignment::Property(p) => {
                        writeln!(f, "{} IS {}", subject.word(), format!("{p:?}").to_uppercase())?
                    }
                    Assignment::Ability(a) => {
                        writeln!(f, "{} CAN {}", subject.word(), format!("{a:?}").to_uppercase())?
                    }
                }
            }
        }
        Ok(())
    }
}

/// Fold a subject's property and ability assignments into flag sets.
pub fn flags_of(assignments: &BTreeSet<Assignment>) -> (PropertyFlags, AbilityFlags) {
    assignments.iter().fold(
        (PropertyFlags::empty(), AbilityFlags::empty()),
        |(props, abilities), assignment| match assignment {
            Assignment::Property(p) => (props | PropertyFlags::from(*p), abilities),
            Assignment::Ability(a) => (props, abilities | AbilityFlags::from(*a)),
            Assignment::Noun(_) => (props, abilities),
        },
    )
}
