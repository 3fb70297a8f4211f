use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Directed;

use hexword_protocol::NounType;

use crate::rules::RuleSet;

/// Noun-to-noun transforms as a directed graph, `A -> B` for `A IS B`.
pub struct TransformGraph {
    graph: Graph<NounType, (), Directed>,
    index_map: HashMap<NounType, NodeIndex>,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            index_map: HashMap::new(),
        }
    }

    /// Every `Noun` assignment in `rules`, the `I` subject excluded
    /// since it names control rather than a type change.
    pub fn from_rules(rules: &RuleSet) -> Self {
        let mut graph = Self::new();
        for (subject, assignments) in rules.iter() {
            if subject == NounType::I {
                continue;
            }
            for target in assignments.iter().filter_map(|a| a.noun()) {
                graph.add_transform(subject, target);
            }
        }
        graph
    }

    fn node(&mut self, noun: NounType) -> NodeIndex {
        let graph = &mut self.graph;
        *self.index_map.entry(noun).or_insert_with(|| graph.add_node(noun))
    }

    pub fn add_transform(&mut self, from: NounType, to: NounType) {
        if from == to {
            return;
        }
        let from_idx = self.node(from);
        let to_idx = self.node(to);
        self.graph.update_edge(from_idx, to_idx, ());
    }

    pub fn targets(&self, subject: NounType) -> Vec<NounType> {
        let mut targets: Vec<NounType> = match self.index_map.get(&subject) {
            Some(idx) => self.graph.neighbors(*idx).map(|n| self.graph[n]).collect(),
            None => Vec::new(),
        };
        targets.sort();
        targets
    }

    /// Sets of nouns that transform into one another, each sorted.
    pub fn cycles(&self) -> Vec<Vec<NounType>> {
        let mut cycles: Vec<Vec<NounType>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut nouns: Vec<NounType> = component.into_iter().map(|n| self.graph[n]).collect();
                nouns.sort();
                nouns
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for TransformGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Assignment;
    use hexword_protocol::PropertyType;

    #[test]
    fn test_swap_is_a_cycle() {
        let mut rules = RuleSet::new();
        rules.insert(NounType::Rock, Assignment::Noun(NounType::Wall));
        rules.insert(NounType::Wall, Assignment::Noun(NounType::Rock));
        rules.insert(NounType::Red, Assignment::Noun(NounType::Blue));

        let graph = TransformGraph::from_rules(&rules);
        assert_eq!(graph.cycles(), vec![vec![NounType::Wall, NounType::Rock]]);
    }

    #[test]
    fn test_chain_is_not_a_cycle() {
        let mut graph = TransformGraph::new();
        graph.add_transform(NounType::Red, NounType::Blue);
        graph.add_transform(NounType::Blue, NounType::Green);
        graph.add_transform(NounType::Green, NounType::Green);

        assert!(graph.cycles().is_empty());
        assert_eq!(graph.targets(NounType::Red), vec![NounType::Blue]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_i_and_properties_are_ignored() {
        let mut rules = RuleSet::new();
        rules.insert(NounType::I, Assignment::Noun(NounType::Red));
        rules.insert(NounType::Red, Assignment::Property(PropertyType::Stop));

        let graph = TransformGraph::from_rules(&rules);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.targets(NounType::I).is_empty());
    }

    #[test]
    fn test_three_way_rotation() {
        let mut graph = TransformGraph::new();
        graph.add_transform(NounType::Red, NounType::Blue);
        graph.add_transform(NounType::Blue, NounType::Green);
        graph.add_transform(NounType::Green, NounType::Red);
        graph.add_transform(NounType::Green, NounType::Red);

        assert_eq!(
            graph.cycles(),
            vec![vec![NounType::Red, NounType::Blue, NounType::Green]]
        );
        assert_eq!(graph.edge_count(), 3);
    }
}
