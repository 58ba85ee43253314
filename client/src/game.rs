//! Client-side view of the round.
//!
//! The client never decides anything: it mirrors what the server announces
//! and marks its own card. Marks come from one place, [`ClientGameState::mark`],
//! whether the number arrived live or as part of the initial state batch.

use log::debug;
use rand::Rng;
use shared::{has_win, Card, GamePhase, InitialState, Number};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ClientGameState {
    card: Card,
    history: Vec<Number>,
    drawn: HashSet<Number>,
    phase: GamePhase,
    players: Vec<String>,
    winner: Option<String>,
    registered: bool,
}

impl ClientGameState {
    pub fn new(card: Card) -> Self {
        Self {
            card,
            history: Vec::new(),
            drawn: HashSet::new(),
            phase: GamePhase::Idle,
            players: Vec::new(),
            winner: None,
            registered: false,
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn history(&self) -> &[Number] {
        &self.history
    }

    pub fn last_drawn(&self) -> Option<Number> {
        self.history.last().copied()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// True once the server knows this client as a player, by name or by card.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }

    /// Numbers on our card that have been drawn, in draw order.
    pub fn marked_numbers(&self) -> Vec<Number> {
        self.history
            .iter()
            .copied()
            .filter(|&n| self.card.contains(n))
            .collect()
    }

    /// Local hint only; the server re-checks every claim.
    pub fn has_bingo(&self) -> bool {
        has_win(&self.card, &self.drawn)
    }

    /// Records a draw. Returns true if it marks our card.
    fn mark(&mut self, number: Number) -> bool {
        if !self.drawn.insert(number) {
            return false;
        }
        self.history.push(number);
        self.card.contains(number)
    }

    /// Replaces local state with the server's snapshot.
    ///
    /// The history is applied as a batch of ordinary marks; nothing here
    /// assumes the client saw those draws live.
    pub fn apply_initial_state(&mut self, state: InitialState) {
        self.history.clear();
        self.drawn.clear();
        for number in state.history {
            self.mark(number);
        }
        debug!(
            "Caught up with {} draws, {} on our card",
            self.history.len(),
            self.marked_numbers().len()
        );

        self.phase = state.phase;
        self.players = state.players;
        self.winner = state.winner;
    }

    pub fn apply_number_drawn(&mut self, number: Number) -> bool {
        self.mark(number)
    }

    pub fn apply_phase_changed(&mut self, running: bool) {
        if running {
            // Every start is a fresh round.
            self.history.clear();
            self.drawn.clear();
            self.winner = None;
            self.phase = GamePhase::Running;
        } else if self.phase.is_running() {
            self.phase = GamePhase::Idle;
        }
    }

    pub fn apply_player_list(&mut self, names: Vec<String>) {
        self.players = names;
    }

    pub fn apply_round_won(&mut self, winner_name: String) {
        self.winner = Some(winner_name);
        self.phase = GamePhase::Won;
    }

    pub fn apply_round_exhausted(&mut self) {
        self.phase = GamePhase::Exhausted;
    }

    /// The server dropped every card on reset. Returns true when this client
    /// is a player and must submit a new card.
    pub fn apply_reset(&mut self) -> bool {
        self.history.clear();
        self.drawn.clear();
        self.winner = None;
        self.phase = GamePhase::Idle;
        self.registered
    }

    /// Swaps in a freshly generated card; marks follow the current history.
    pub fn regenerate_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Card {
        self.card = Card::generate(rng);
        self.card.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::card::FREE_CELL;

    fn fixed_card() -> Card {
        Card::from_columns(vec![
            vec![1, 2, 3, 4, 5],
            vec![16, 17, 18, 19, 20],
            vec![31, 32, FREE_CELL, 34, 35],
            vec![46, 47, 48, 49, 50],
            vec![61, 62, 63, 64, 65],
        ])
    }

    fn initial(history: Vec<Number>, phase: GamePhase) -> InitialState {
        InitialState {
            last_drawn: history.last().copied(),
            running: phase.is_running(),
            history,
            phase,
            winner: None,
            players: vec!["Alice".to_string()],
        }
    }

    #[test]
    fn test_initial_state_batch_marks() {
        let mut state = ClientGameState::new(fixed_card());
        state.apply_initial_state(initial(vec![7, 1, 70, 16], GamePhase::Running));

        assert_eq!(state.history(), &[7, 1, 70, 16]);
        assert_eq!(state.marked_numbers(), vec![1, 16]);
        assert_eq!(state.last_drawn(), Some(16));
        assert!(state.is_running());
        assert_eq!(state.players(), &["Alice".to_string()]);
    }

    #[test]
    fn test_batch_and_live_marks_agree() {
        let draws = vec![3, 18, 48, 63, 22];

        let mut live = ClientGameState::new(fixed_card());
        live.apply_phase_changed(true);
        for &n in &draws {
            live.apply_number_drawn(n);
        }

        let mut caught_up = ClientGameState::new(fixed_card());
        caught_up.apply_initial_state(initial(draws, GamePhase::Running));

        assert_eq!(live.history(), caught_up.history());
        assert_eq!(live.marked_numbers(), caught_up.marked_numbers());
        assert!(live.has_bingo());
        assert!(caught_up.has_bingo());
    }

    #[test]
    fn test_repeated_draw_ignored() {
        let mut state = ClientGameState::new(fixed_card());
        assert!(state.apply_number_drawn(1));
        assert!(!state.apply_number_drawn(1));
        assert!(!state.apply_number_drawn(70));
        assert_eq!(state.history(), &[1, 70]);
    }

    #[test]
    fn test_initial_state_replaces_stale_history() {
        let mut state = ClientGameState::new(fixed_card());
        state.apply_number_drawn(1);
        state.apply_number_drawn(2);

        state.apply_initial_state(initial(vec![16], GamePhase::Running));
        assert_eq!(state.history(), &[16]);
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = ClientGameState::new(fixed_card());
        state.apply_phase_changed(true);
        state.apply_number_drawn(5);
        assert!(state.is_running());

        state.apply_round_won("Bob".to_string());
        state.apply_phase_changed(false);
        assert_eq!(state.phase(), GamePhase::Won);
        assert_eq!(state.winner(), Some("Bob"));

        state.apply_phase_changed(true);
        assert!(state.history().is_empty());
        assert!(state.winner().is_none());

        state.apply_round_exhausted();
        assert_eq!(state.phase(), GamePhase::Exhausted);

        assert!(!state.apply_reset());
        assert_eq!(state.phase(), GamePhase::Idle);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_reset_asks_registered_player_for_card() {
        let mut state = ClientGameState::new(fixed_card());
        assert!(!state.apply_reset());

        // Registered through a card alone, without a name.
        state.set_registered(true);
        assert!(state.apply_reset());

        state.set_registered(false);
        assert!(!state.apply_reset());
    }

    #[test]
    fn test_regenerated_card_marks_from_history() {
        let mut state = ClientGameState::new(fixed_card());
        state.apply_initial_state(initial((1..=75).collect(), GamePhase::Running));

        let mut rng = StdRng::seed_from_u64(4);
        let card = state.regenerate_card(&mut rng);

        assert_eq!(state.card(), &card);
        assert_eq!(state.marked_numbers().len(), 24);
        assert!(state.has_bingo());
    }
}
