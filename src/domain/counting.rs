//! Rules of the drag-and-count game ("Keranjang Angka").
//!
//! Each question asks for an exact number of items to be moved into one zone.
//! The pool always holds two more items than needed, so the child has to
//! count rather than empty the pool.

/// Where items can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Kandang,
    Taman,
    Ember,
    Kelinci,
}

impl Zone {
    /// Zones in on-screen order.
    pub const ALL: [Zone; 4] = [Zone::Kandang, Zone::Taman, Zone::Ember, Zone::Kelinci];

    pub fn label(self) -> &'static str {
        match self {
            Zone::Kandang => "Kandang",
            Zone::Taman => "Taman",
            Zone::Ember => "Ember",
            Zone::Kelinci => "Kelinci",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Zone::Kandang => "🏠",
            Zone::Taman => "🌳",
            Zone::Ember => "🪣",
            Zone::Kelinci => "🐰",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Singa,
    Wortel,
    Kucing,
    Katak,
}

impl ItemKind {
    pub fn icon(self) -> &'static str {
        match self {
            ItemKind::Singa => "🦁",
            ItemKind::Wortel => "🥕",
            ItemKind::Kucing => "🐱",
            ItemKind::Katak => "🐸",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub target_count: usize,
    pub item: ItemKind,
    pub zone: Zone,
}

pub const QUESTIONS: [Question; 4] = [
    Question {
        id: 1,
        text: "Masukkan 2 singa ke dalam kandang 🦁",
        target_count: 2,
        item: ItemKind::Singa,
        zone: Zone::Kandang,
    },
    Question {
        id: 2,
        text: "Berikan 3 wortel kepada kelinci 🐰",
        target_count: 3,
        item: ItemKind::Wortel,
        zone: Zone::Kelinci,
    },
    Question {
        id: 3,
        text: "Pindahkan 2 kucing ke taman 🌳",
        target_count: 2,
        item: ItemKind::Kucing,
        zone: Zone::Taman,
    },
    Question {
        id: 4,
        text: "Masukan 5 katak kedalam ember 🪣",
        target_count: 5,
        item: ItemKind::Katak,
        zone: Zone::Ember,
    },
];

/// Points lost for every wrong check.
pub const CHECK_PENALTY: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Accepted,
    WrongZone,
    PoolEmpty,
    /// The answer was already confirmed; the board no longer changes
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Nothing has been dropped yet
    Nothing,
    Correct,
    TooFew,
    TooMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Answer not confirmed yet
    NotReady,
    NextQuestion,
    Finished,
}

#[derive(Debug, Clone)]
pub struct CountingGame {
    index: usize,
    pool: Vec<Item>,
    dropped: Vec<Item>,
    verdict: Option<CheckOutcome>,
    wrong_checks: u32,
    finished: bool,
}

impl Default for CountingGame {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingGame {
    pub fn new() -> Self {
        let mut game = Self {
            index: 0,
            pool: Vec::new(),
            dropped: Vec::new(),
            verdict: None,
            wrong_checks: 0,
            finished: false,
        };
        game.load_question();
        game
    }

    fn load_question(&mut self) {
        let question = self.question();
        self.pool = (0..question.target_count + 2)
            .map(|i| Item {
                id: format!("item-{}-{}", question.id, i),
                kind: question.item,
            })
            .collect();
        self.dropped.clear();
        self.verdict = None;
    }

    pub fn question(&self) -> &'static Question {
        &QUESTIONS[self.index]
    }

    /// Zero-based position of the current question.
    pub fn question_index(&self) -> usize {
        self.index
    }

    pub fn question_count(&self) -> usize {
        QUESTIONS.len()
    }

    pub fn pool(&self) -> &[Item] {
        &self.pool
    }

    pub fn dropped(&self) -> &[Item] {
        &self.dropped
    }

    pub fn verdict(&self) -> Option<CheckOutcome> {
        self.verdict
    }

    pub fn is_locked(&self) -> bool {
        self.verdict == Some(CheckOutcome::Correct)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn wrong_checks(&self) -> u32 {
        self.wrong_checks
    }

    /// Score out of 100 for the round so far.
    pub fn score(&self) -> u32 {
        100u32.saturating_sub(self.wrong_checks.saturating_mul(CHECK_PENALTY))
    }

    /// Stars shown during play: ten per solved question.
    pub fn stars(&self) -> u32 {
        self.index as u32 * 10
    }

    /// Moves one pool item into `zone` if it is the zone the question asks for.
    pub fn drop_into(&mut self, zone: Zone) -> DropOutcome {
        if self.is_locked() || self.finished {
            return DropOutcome::Locked;
        }
        if zone != self.question().zone {
            return DropOutcome::WrongZone;
        }
        match self.pool.pop() {
            Some(item) => {
                self.dropped.push(item);
                self.verdict = None;
                DropOutcome::Accepted
            }
            None => DropOutcome::PoolEmpty,
        }
    }

    /// Moves the most recently dropped item back to the pool.
    pub fn return_one(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        match self.dropped.pop() {
            Some(item) => {
                self.pool.push(item);
                self.verdict = None;
                true
            }
            None => false,
        }
    }

    /// Moves every dropped item back to the pool.
    pub fn return_all(&mut self) {
        if self.is_locked() {
            return;
        }
        self.pool.append(&mut self.dropped);
        self.verdict = None;
    }

    /// Compares the number of dropped items with the target.
    pub fn check(&mut self) -> CheckOutcome {
        if self.is_locked() {
            return CheckOutcome::Correct;
        }
        let target = self.question().target_count;
        let outcome = match self.dropped.len() {
            0 => return CheckOutcome::Nothing,
            n if n == target => CheckOutcome::Correct,
            n if n < target => CheckOutcome::TooFew,
            _ => CheckOutcome::TooMany,
        };
        if outcome != CheckOutcome::Correct {
            self.wrong_checks = self.wrong_checks.saturating_add(1);
        }
        self.verdict = Some(outcome);
        outcome
    }

    /// Moves on once the current answer has been confirmed.
    pub fn advance(&mut self) -> Advance {
        if self.finished {
            return Advance::Finished;
        }
        if !self.is_locked() {
            return Advance::NotReady;
        }
        if self.index + 1 < QUESTIONS.len() {
            self.index += 1;
            self.load_question();
            Advance::NextQuestion
        } else {
            self.finished = true;
            Advance::Finished
        }
    }
}
