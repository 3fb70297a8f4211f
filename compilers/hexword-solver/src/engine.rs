use std::collections::BTreeSet;
use std::time::Duration;

use hecs::Entity;
use serde::Serialize;

use hexword_ecs::components::PhraseDirection;
use hexword_ecs::systems::capabilities::{collect_capabilities, CapabilitySets};
use hexword_ecs::systems::reset::reset_rule_state;
use hexword_ecs::Board;
use hexword_protocol::HexCoord;

use crate::apply::apply_rules;
use crate::config::EngineConfig;
use crate::graph::TransformGraph;
use crate::rules::RuleSet;
use crate::search::{discover, DiscoveredPhrase, Discovery};
use crate::semantics::extract;

/// Notification sink for everything a recompute changes.
///
/// Every method defaults to doing nothing.
pub trait RuleEvents {
    fn entity_updated(&mut self, _entity: Entity) {}
    fn entity_added(&mut self, _entity: Entity) {}
    fn entity_removed(&mut self, _entity: Entity) {}
    fn goal_set_changed(&mut self, _goals: &BTreeSet<Entity>) {}
    fn i_set_changed(&mut self, _controlled: &BTreeSet<Entity>) {}
    fn new_phrase_cell(&mut self, _cell: HexCoord) {}
    fn hint(&mut self, _text: &str, _duration: Duration) {}
}

pub struct NullEvents;

impl RuleEvents for NullEvents {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecomputeReport {
    /// Search/apply passes run.
    pub passes: usize,
    /// False when the pass cap cut the loop short.
    pub stabilized: bool,
    pub phrases: usize,
    /// Phrases whose word sequence was absent from the previous frame.
    pub new_phrases: usize,
}

/// Rederives every rule from the board whenever the board changes.
pub struct RuleEngine {
    config: EngineConfig,
    pending: bool,
    rules: RuleSet,
    discovery: Discovery,
    markers: Vec<Entity>,
    phrase_hashes: BTreeSet<u64>,
    capabilities: CapabilitySets,
    since_hint: Duration,
}

impl RuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        // The first hint may fire as soon as it is needed.
        let since_hint = config.hint_cooldown();
        Self {
            config,
            pending: false,
            rules: RuleSet::new(),
            discovery: Discovery::default(),
            markers: Vec::new(),
            phrase_hashes: BTreeSet::new(),
            capabilities: CapabilitySets::default(),
            since_hint,
        }
    }

    /// Schedule a recompute for the next [`update`](Self::update).
    pub fn signal_state_change(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Advance the hint clock by `dt` and recompute if a change is pending.
    pub fn update(
        &mut self,
        board: &mut Board,
        dt: Duration,
        events: &mut dyn RuleEvents,
    ) -> Option<RecomputeReport> {
        self.since_hint = self.since_hint.saturating_add(dt);
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(self.recompute(board, events))
    }

    /// Run search, extraction and application until the discovered phrases
    /// stop changing, then publish markers and notifications.
    pub fn recompute(&mut self, board: &mut Board, events: &mut dyn RuleEvents) -> RecomputeReport {
        for marker in self.markers.drain(..) {
            if board.despawn(marker).is_ok() {
                events.entity_removed(marker);
            }
        }

        // Rule state is rederived from scratch even when no pass gets to run.
        reset_rule_state(board.inner_mut());

        let mut passes = 0;
        let mut previous: Option<BTreeSet<u64>> = None;
        let mut transformed = BTreeSet::new();
        let (discovery, stabilized) = loop {
            let discovery = discover(board);
            let hashes = discovery.hashes();
            if previous.as_ref() == Some(&hashes) {
                break (discovery, true);
            }
            if passes >= self.config.max_passes {
                tracing::warn!(passes, "rules did not stabilize, keeping the last pass");
                break (discovery, false);
            }
            if passes > 0 {
                reset_rule_state(board.inner_mut());
            }
            passes += 1;

            let rules: RuleSet = discovery
                .phrases
                .iter()
                .map(|p| extract(p.phrase.words()))
                .collect();
            let applied = apply_rules(board, &rules);
            tracing::debug!(
                pass = passes,
                phrases = discovery.phrases.len(),
                rules = rules.len(),
                transformed = applied.transformed.len(),
                "rule pass"
            );
            transformed.extend(applied.transformed);
            self.rules = rules;
            previous = Some(hashes);
        };

        for cycle in TransformGraph::from_rules(&self.rules).cycles() {
            tracing::warn!(?cycle, "transform cycle");
        }

        self.spawn_markers(board, &discovery, events);
        for entity in transformed {
            events.entity_updated(entity);
        }
        self.publish_capabilities(collect_capabilities(board.inner()), events);

        let mut new_phrases = 0;
        for found in &discovery.phrases {
            if self.phrase_hashes.contains(&found.phrase.hash_words()) {
                continue;
            }
            new_phrases += 1;
            for cell in found.phrase.cells() {
                events.new_phrase_cell(*cell);
            }
        }
        self.phrase_hashes = discovery.hashes();

        if stabilized && self.capabilities.i.is_empty() && self.since_hint >= self.config.hint_cooldown() {
            events.hint(&self.config.undo_hint, self.config.hint_duration());
            self.since_hint = Duration::ZERO;
        }

        let report = RecomputeReport {
            passes,
            stabilized,
            phrases: discovery.phrases.len(),
            new_phrases,
        };
        tracing::debug!(?report, "recompute finished");
        self.discovery = discovery;
        report
    }

    fn spawn_markers(&mut self, board: &mut Board, discovery: &Discovery, events: &mut dyn RuleEvents) {
        for (cell, records) in &discovery.directions {
            for record in records {
                let marker = PhraseDirection {
                    phrase: record.phrase,
                    direction: record.direction,
                    element: record.element,
                };
                match board.spawn_phrase_direction(*cell, marker) {
                    Ok(entity) => {
                        self.markers.push(entity);
                        events.entity_added(entity);
                    }
                    Err(err) => tracing::debug!(%cell, %err, "marker skipped"),
                }
            }
        }
    }

    fn publish_capabilities(&mut self, current: CapabilitySets, events: &mut dyn RuleEvents) {
        let previous = std::mem::replace(&mut self.capabilities, current);
        let current = &self.capabilities;

        for entity in previous.i.symmetric_difference(&current.i) {
            events.entity_updated(*entity);
        }
        if previous.i != current.i {
            events.i_set_changed(&current.i);
        }

        for entity in previous.goal.symmetric_difference(&current.goal) {
            events.entity_updated(*entity);
        }
        if previous.goal != current.goal {
            events.goal_set_changed(&current.goal);
        }

        for entity in previous.send.symmetric_difference(&current.send) {
            events.entity_updated(*entity);
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rules from the last pass of the last recompute.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn phrases(&self) -> &[DiscoveredPhrase] {
        &self.discovery.phrases
    }

    pub fn i_entities(&self) -> &BTreeSet<Entity> {
        &self.capabilities.i
    }

    pub fn goal_entities(&self) -> &BTreeSet<Entity> {
        &self.capabilities.goal
    }

    pub fn send_entities(&self) -> &BTreeSet<Entity> {
        &self.capabilities.send
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexword_protocol::{AbilityFlags, Direction, NounType, PropertyFlags, Word};
    use hexword_protocol::Word::{Am, And, Blue, Can, Goal, Is, Push, Red, Send, Stop, Wall, Yellow, I};

    #[derive(Default)]
    struct Recorder {
        updated: Vec<Entity>,
        added: Vec<Entity>,
        removed: Vec<Entity>,
        goal_changes: Vec<BTreeSet<Entity>>,
        i_changes: Vec<BTreeSet<Entity>>,
        new_cells: Vec<HexCoord>,
        hints: Vec<(String, Duration)>,
    }

    impl RuleEvents for Recorder {
        fn entity_updated(&mut self, entity: Entity) {
            self.updated.push(entity);
        }
        fn entity_added(&mut self, entity: Entity) {
            self.added.push(entity);
        }
        fn entity_removed(&mut self, entity: Entity) {
            self.removed.push(entity);
        }
        fn goal_set_changed(&mut self, goals: &BTreeSet<Entity>) {
            self.goal_changes.push(goals.clone());
        }
        fn i_set_changed(&mut self, controlled: &BTreeSet<Entity>) {
            self.i_changes.push(controlled.clone());
        }
        fn new_phrase_cell(&mut self, cell: HexCoord) {
            self.new_cells.push(cell);
        }
        fn hint(&mut self, text: &str, duration: Duration) {
            self.hints.push((text.to_string(), duration));
        }
    }

    fn lay(board: &mut Board, start: HexCoord, dir: Direction, words: &[Word]) -> Vec<Entity> {
        let mut cell = start;
        let mut tiles = Vec::new();
        for word in words {
            tiles.push(board.spawn_word(cell, *word).unwrap());
            cell = cell.neighbor(dir);
        }
        tiles
    }

    fn run(engine: &mut RuleEngine, board: &mut Board, events: &mut Recorder) -> RecomputeReport {
        engine.signal_state_change();
        engine.update(board, Duration::ZERO, events).unwrap()
    }

    #[test]
    fn test_nothing_happens_without_a_signal() {
        let mut board = Board::new(3, 1);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Wall, Is, Stop]);
        let mut engine = RuleEngine::default();

        assert!(!engine.is_pending());
        assert_eq!(engine.update(&mut board, Duration::from_secs(1), &mut NullEvents), None);
        assert!(engine.rules().is_empty());

        engine.signal_state_change();
        assert!(engine.is_pending());
        assert!(engine.update(&mut board, Duration::ZERO, &mut NullEvents).is_some());
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_wall_is_stop_marks_walls() {
        let mut board = Board::new(6, 3);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Wall, Is, Stop]);
        let wall = board.spawn_object(HexCoord::new(2, 2), NounType::Wall).unwrap();
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        let report = run(&mut engine, &mut board, &mut events);

        assert_eq!(report, RecomputeReport { passes: 1, stabilized: true, phrases: 1, new_phrases: 1 });
        assert_eq!(board.properties_of(wall), PropertyFlags::STOP);
        // Two arrows: WALL and IS point on, STOP ends the phrase.
        assert_eq!(events.added.len(), 2);
        assert_eq!(events.new_cells.len(), 3);
    }

    #[test]
    fn test_markers_are_replaced_each_recompute() {
        let mut board = Board::new(4, 1);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Wall, Is, Stop]);
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        run(&mut engine, &mut board, &mut events);
        let first = events.added.clone();
        let report = run(&mut engine, &mut board, &mut events);

        assert_eq!(events.removed, first);
        assert_eq!(events.added.len(), 4);
        assert!(first.iter().all(|m| !board.contains(*m)));
        // Same phrase again is not new.
        assert_eq!(report.new_phrases, 0);
        assert_eq!(events.new_cells.len(), 3);
    }

    #[test]
    fn test_lone_i_emits_the_undo_hint() {
        let mut board = Board::new(3, 3);
        board.spawn_word(HexCoord::new(1, 1), I).unwrap();
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        let report = run(&mut engine, &mut board, &mut events);

        assert_eq!(report.phrases, 0);
        assert!(engine.rules().is_empty());
        assert_eq!(events.hints.len(), 1);
        assert_eq!(events.hints[0].0, engine.config().undo_hint);
        assert_eq!(events.hints[0].1, engine.config().hint_duration());
    }

    #[test]
    fn test_hint_cooldown() {
        let mut board = Board::new(2, 1);
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        run(&mut engine, &mut board, &mut events);
        assert_eq!(events.hints.len(), 1);

        engine.update(&mut board, Duration::from_secs(19), &mut events);
        run(&mut engine, &mut board, &mut events);
        assert_eq!(events.hints.len(), 1);

        engine.update(&mut board, Duration::from_secs(1), &mut events);
        run(&mut engine, &mut board, &mut events);
        assert_eq!(events.hints.len(), 2);
    }

    #[test]
    fn test_no_hint_while_something_is_controlled() {
        let mut board = Board::new(4, 2);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[I, Am, Red]);
        board.spawn_object(HexCoord::new(0, 1), NounType::Red).unwrap();
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        run(&mut engine, &mut board, &mut events);
        assert!(events.hints.is_empty());
    }

    #[test]
    fn test_merged_subject_transforms_and_gains_ability() {
        let mut board = Board::new(5, 3);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Red, Is, Blue]);
        lay(&mut board, HexCoord::new(0, 2), Direction::East, &[Red, Can, Push]);
        let red = board.spawn_object(HexCoord::new(4, 1), NounType::Red).unwrap();
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        let report = run(&mut engine, &mut board, &mut events);

        assert!(report.stabilized);
        assert_eq!(report.phrases, 2);
        assert_eq!(engine.rules().to_string(), "RED IS BLUE\nRED CAN PUSH\n");
        assert_eq!(board.object_of(red), Some(NounType::Blue));
        assert_eq!(board.abilities_of(red), AbilityFlags::PUSH);
        assert!(events.updated.contains(&red));
    }

    #[test]
    fn test_i_and_goal_set_diffs() {
        let mut board = Board::new(6, 4);
        let control = lay(&mut board, HexCoord::new(0, 0), Direction::East, &[I, Am, Red]);
        lay(&mut board, HexCoord::new(0, 2), Direction::East, &[Yellow, Is, Goal]);
        let me = board.spawn_object(HexCoord::new(5, 3), NounType::Red).unwrap();
        let flag = board.spawn_object(HexCoord::new(4, 3), NounType::Yellow).unwrap();
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        run(&mut engine, &mut board, &mut events);
        assert_eq!(events.i_changes, vec![BTreeSet::from([me])]);
        assert_eq!(events.goal_changes, vec![BTreeSet::from([flag])]);
        assert!(events.updated.contains(&me) && events.updated.contains(&flag));
        assert!(board.is_input_controlled(me));

        // Unchanged sets fire nothing.
        events = Recorder::default();
        run(&mut engine, &mut board, &mut events);
        assert!(events.i_changes.is_empty());
        assert!(events.goal_changes.is_empty());
        assert!(events.updated.is_empty());

        // Breaking the I sentence releases control.
        board.move_entity(control[2], HexCoord::new(5, 0)).unwrap();
        run(&mut engine, &mut board, &mut events);
        assert_eq!(events.i_changes, vec![BTreeSet::new()]);
        assert_eq!(events.updated, vec![me]);
        assert!(!board.is_input_controlled(me));
        assert!(engine.i_entities().is_empty());
        assert_eq!(engine.goal_entities(), &BTreeSet::from([flag]));
    }

    #[test]
    fn test_send_set_has_no_set_callback() {
        let mut board = Board::new(6, 3);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Wall, Can, Send]);
        let wall = board.spawn_object(HexCoord::new(0, 2), NounType::Wall).unwrap();
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        run(&mut engine, &mut board, &mut events);

        assert_eq!(engine.send_entities(), &BTreeSet::from([wall]));
        assert_eq!(events.updated, vec![wall]);
        assert!(events.goal_changes.is_empty());
        assert!(events.i_changes.is_empty());
    }

    #[test]
    fn test_i_abilities_count_toward_send() {
        let mut board = Board::new(8, 3);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[I, Am, Red, And, Can, Send]);
        let me = board.spawn_object(HexCoord::new(0, 2), NounType::Red).unwrap();
        let mut engine = RuleEngine::default();

        run(&mut engine, &mut board, &mut Recorder::default());

        assert_eq!(engine.i_entities(), &BTreeSet::from([me]));
        assert_eq!(engine.send_entities(), &BTreeSet::from([me]));
    }

    #[test]
    fn test_swap_runs_once_and_stabilizes() {
        let mut board = Board::new(4, 4);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Wall, Is, Red]);
        lay(&mut board, HexCoord::new(0, 2), Direction::East, &[Red, Is, Wall]);
        let wall = board.spawn_object(HexCoord::new(3, 3), NounType::Wall).unwrap();
        let red = board.spawn_object(HexCoord::new(2, 3), NounType::Red).unwrap();
        let mut engine = RuleEngine::default();

        let report = run(&mut engine, &mut board, &mut Recorder::default());

        assert_eq!(report.passes, 1);
        assert!(report.stabilized);
        assert_eq!(board.object_of(wall), Some(NounType::Red));
        assert_eq!(board.object_of(red), Some(NounType::Wall));
    }

    #[test]
    fn test_pass_cap_clears_old_rules_without_hinting() {
        let mut board = Board::new(5, 5);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Wall, Is, Stop]);
        lay(&mut board, HexCoord::new(0, 2), Direction::East, &[I, Am, Red]);
        let wall = board.spawn_object(HexCoord::new(0, 4), NounType::Wall).unwrap();
        let me = board.spawn_object(HexCoord::new(1, 4), NounType::Red).unwrap();

        run(&mut RuleEngine::default(), &mut board, &mut Recorder::default());
        assert_eq!(board.properties_of(wall), PropertyFlags::STOP);
        assert!(board.is_input_controlled(me));

        let config = EngineConfig { max_passes: 0, ..EngineConfig::default() };
        let mut capped = RuleEngine::new(config);
        let mut events = Recorder::default();
        let report = run(&mut capped, &mut board, &mut events);

        assert!(!report.stabilized);
        assert_eq!(report.passes, 0);
        assert!(board.properties_of(wall).is_empty());
        assert!(board.properties_of(me).is_empty());
        assert!(!board.is_input_controlled(me));
        assert!(capped.i_entities().is_empty());
        assert!(events.hints.is_empty());
    }

    #[test]
    fn test_recompute_twice_keeps_transformed_grants() {
        let mut board = Board::new(5, 5);
        lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Red, Is, Blue]);
        lay(&mut board, HexCoord::new(0, 2), Direction::East, &[Red, Can, Push]);
        let red = board.spawn_object(HexCoord::new(0, 4), NounType::Red).unwrap();
        let mut engine = RuleEngine::default();

        run(&mut engine, &mut board, &mut Recorder::default());
        let first = (board.object_of(red), board.properties_of(red), board.abilities_of(red));
        let mut events = Recorder::default();
        run(&mut engine, &mut board, &mut events);
        let second = (board.object_of(red), board.properties_of(red), board.abilities_of(red));

        assert_eq!(first, (Some(NounType::Blue), PropertyFlags::empty(), AbilityFlags::PUSH));
        assert_eq!(second, first);
        // Nothing changed, so nothing is reported as transformed.
        assert!(events.updated.is_empty());
    }

    #[test]
    fn test_rules_reset_when_sentence_breaks() {
        let mut board = Board::new(5, 2);
        let tiles = lay(&mut board, HexCoord::new(0, 0), Direction::East, &[Wall, Is, Stop]);
        let wall = board.spawn_object(HexCoord::new(0, 1), NounType::Wall).unwrap();
        let mut engine = RuleEngine::default();
        let mut events = Recorder::default();

        run(&mut engine, &mut board, &mut events);
        assert_eq!(board.properties_of(wall), PropertyFlags::STOP);

        board.move_entity(tiles[0], HexCoord::new(4, 1)).unwrap();
        let report = run(&mut engine, &mut board, &mut events);

        assert_eq!(report.phrases, 0);
        assert!(board.properties_of(wall).is_empty());
        assert!(engine.phrases().is_empty());
    }
}
