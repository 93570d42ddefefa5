//! Rules of the memory-matching game ("Box Misteri").
//!
//! A deck holds `level.pairs()` animal pairs face down. The child reveals two
//! cards per attempt; equal labels stay matched, different labels are turned
//! back. Delays between the reveal and its resolution are owned by the caller,
//! which calls [`MemoryGame::resolve`] once the delay has elapsed.

use super::models::Level;
use rand::Rng;
use rand::seq::SliceRandom;

/// Animals available for the deck, in dealing order.
pub const ANIMALS: [&str; 8] = [
    "Beruang", "Kucing", "Anjing", "Tikus", "Hamster", "Kelinci", "Rubah", "Panda",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: usize,
    pub label: &'static str,
    pub face: Face,
}

impl Card {
    pub fn is_visible(&self) -> bool {
        !matches!(self.face, Face::Hidden)
    }
}

/// What a single card click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// A pair is still being resolved; the click is dropped without counting
    Busy,
    /// The card was already face up or matched (or does not exist)
    Repeated,
    /// First card of an attempt is now face up
    Revealed,
    Match {
        first: usize,
        second: usize,
        label: &'static str,
    },
    Mismatch {
        first: usize,
        second: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPair {
    first: usize,
    second: usize,
    matched: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    level: Level,
    cards: Vec<Card>,
    first: Option<usize>,
    pending: Option<PendingPair>,
    pub attempts: u32,
    pub wrong_clicks: u32,
    pub repeated_clicks: u32,
}

impl MemoryGame {
    /// Deals a shuffled deck for `level`.
    pub fn deal<R: Rng + ?Sized>(level: Level, rng: &mut R) -> Self {
        let mut labels: Vec<&'static str> = ANIMALS[..level.pairs()]
            .iter()
            .chain(ANIMALS[..level.pairs()].iter())
            .copied()
            .collect();
        labels.shuffle(rng);
        Self::with_layout(level, labels)
    }

    /// Builds a game with the cards laid out exactly as `labels`.
    pub fn with_layout(level: Level, labels: Vec<&'static str>) -> Self {
        let cards = labels
            .into_iter()
            .enumerate()
            .map(|(id, label)| Card {
                id,
                label,
                face: Face::Hidden,
            })
            .collect();

        Self {
            level,
            cards,
            first: None,
            pending: None,
            attempts: 0,
            wrong_clicks: 0,
            repeated_clicks: 0,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// True while a revealed pair waits for [`MemoryGame::resolve`].
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_won(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.face == Face::Matched)
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.face == Face::Matched).count() / 2
    }

    /// Indices of the cards carrying `label`.
    pub fn positions_of(&self, label: &str) -> Vec<usize> {
        self.cards
            .iter()
            .filter(|c| c.label == label)
            .map(|c| c.id)
            .collect()
    }

    /// Turns card `id` face up and compares it when it completes a pair.
    pub fn flip(&mut self, id: usize) -> FlipOutcome {
        if self.pending.is_some() {
            return FlipOutcome::Busy;
        }

        let label = match self.cards.get(id) {
            Some(card) if card.face == Face::Hidden => card.label,
            _ => {
                self.repeated_clicks += 1;
                return FlipOutcome::Repeated;
            }
        };
        self.cards[id].face = Face::Revealed;

        let Some(first) = self.first else {
            self.first = Some(id);
            return FlipOutcome::Revealed;
        };

        self.attempts += 1;
        let matched = self.cards[first].label == label;
        self.pending = Some(PendingPair {
            first,
            second: id,
            matched,
        });

        if matched {
            FlipOutcome::Match {
                first,
                second: id,
                label,
            }
        } else {
            self.wrong_clicks += 1;
            FlipOutcome::Mismatch { first, second: id }
        }
    }

    /// Settles the pending pair: matched cards stay up, others turn back.
    ///
    /// Returns `true` when there was a pair to settle.
    pub fn resolve(&mut self) -> bool {
        let Some(pair) = self.pending.take() else {
            return false;
        };
        let face = if pair.matched {
            Face::Matched
        } else {
            Face::Hidden
        };
        self.cards[pair.first].face = face;
        self.cards[pair.second].face = face;
        self.first = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_pair_game() -> MemoryGame {
        MemoryGame::with_layout(
            Level::Two,
            vec!["Beruang", "Kucing", "Anjing", "Beruang", "Kucing", "Anjing"],
        )
    }

    #[test]
    fn test_deal_sizes_per_level() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(MemoryGame::deal(Level::One, &mut rng).cards().len(), 2);
        assert_eq!(MemoryGame::deal(Level::Two, &mut rng).cards().len(), 6);
        assert_eq!(MemoryGame::deal(Level::Three, &mut rng).cards().len(), 8);
    }

    #[test]
    fn test_deal_contains_each_animal_twice() {
        let mut rng = StdRng::seed_from_u64(42);
        let game = MemoryGame::deal(Level::Three, &mut rng);
        for animal in &ANIMALS[..4] {
            assert_eq!(game.positions_of(animal).len(), 2);
        }
        assert!(game.cards().iter().all(|c| c.face == Face::Hidden));
    }

    #[test]
    fn test_match_then_resolve() {
        let mut game = two_pair_game();
        assert_eq!(game.flip(0), FlipOutcome::Revealed);
        assert_eq!(
            game.flip(3),
            FlipOutcome::Match {
                first: 0,
                second: 3,
                label: "Beruang"
            }
        );
        assert!(game.is_busy());
        assert!(game.resolve());
        assert_eq!(game.cards()[0].face, Face::Matched);
        assert_eq!(game.cards()[3].face, Face::Matched);
        assert_eq!(game.attempts, 1);
        assert_eq!(game.wrong_clicks, 0);
        assert_eq!(game.matched_pairs(), 1);
    }

    #[test]
    fn test_mismatch_turns_cards_back() {
        let mut game = two_pair_game();
        game.flip(0);
        assert_eq!(
            game.flip(1),
            FlipOutcome::Mismatch {
                first: 0,
                second: 1
            }
        );
        assert_eq!(game.wrong_clicks, 1);
        game.resolve();
        assert!(game.cards().iter().all(|c| c.face == Face::Hidden));
    }

    #[test]
    fn test_clicks_while_busy_are_ignored() {
        let mut game = two_pair_game();
        game.flip(0);
        game.flip(1);
        assert_eq!(game.flip(2), FlipOutcome::Busy);
        assert_eq!(game.repeated_clicks, 0);
        assert_eq!(game.cards()[2].face, Face::Hidden);
    }

    #[test]
    fn test_repeated_clicks_are_counted() {
        let mut game = two_pair_game();
        game.flip(0);
        assert_eq!(game.flip(0), FlipOutcome::Repeated);
        assert_eq!(game.flip(99), FlipOutcome::Repeated);
        assert_eq!(game.repeated_clicks, 2);
        game.flip(3);
        game.resolve();
        assert_eq!(game.flip(3), FlipOutcome::Repeated);
        assert_eq!(game.repeated_clicks, 3);
    }

    #[test]
    fn test_two_mismatches_then_a_match() {
        let mut game = two_pair_game();
        game.flip(0);
        game.flip(1);
        game.resolve();
        game.flip(2);
        game.flip(4);
        game.resolve();
        game.flip(1);
        game.flip(4);
        game.resolve();

        assert_eq!(game.wrong_clicks, 2);
        assert_eq!(game.attempts, 3);
        assert_eq!(game.matched_pairs(), 1);
        assert!(!game.is_won());
    }

    #[test]
    fn test_win_after_all_pairs() {
        let mut game = MemoryGame::with_layout(Level::One, vec!["Panda", "Panda"]);
        game.flip(1);
        game.flip(0);
        assert!(!game.is_won());
        game.resolve();
        assert!(game.is_won());
        assert!(!game.resolve());
    }
}
