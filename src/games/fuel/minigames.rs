//! Daily spin wheel and slot machine.
//!
//! Both are small state machines with no randomness of their own: `logic`
//! rolls the LCG and hands the outcome in, then drives the phase changes
//! from the timer queue.

use super::state::RewardType;

// ── Daily spin ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinSegment {
    pub label: &'static str,
    pub value: u64,
    /// Only `Coins` or `Xp`.
    pub reward_type: RewardType,
}

pub const SPIN_SEGMENTS: [SpinSegment; 6] = [
    SpinSegment { label: "50 Coins", value: 50, reward_type: RewardType::Coins },
    SpinSegment { label: "100 XP", value: 100, reward_type: RewardType::Xp },
    SpinSegment { label: "20 Coins", value: 20, reward_type: RewardType::Coins },
    SpinSegment { label: "JACKPOT", value: 500, reward_type: RewardType::Coins },
    SpinSegment { label: "50 XP", value: 50, reward_type: RewardType::Xp },
    SpinSegment { label: "10 Coins", value: 10, reward_type: RewardType::Coins },
];

pub const SPIN_LAND_MS: u32 = 3000;
pub const SPIN_COLLECT_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinPhase {
    Ready,
    Spinning { target: usize },
    Landed(usize),
    /// Collect pressed; the reward is credited when the delay elapses.
    Collecting(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailySpin {
    pub visible: bool,
    pub phase: SpinPhase,
}

impl DailySpin {
    pub fn new() -> Self {
        Self {
            visible: false,
            phase: SpinPhase::Ready,
        }
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.phase = SpinPhase::Ready;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.phase = SpinPhase::Ready;
    }

    pub fn can_start(&self) -> bool {
        self.visible && self.phase == SpinPhase::Ready
    }

    /// Start spinning toward `target`. Refused unless the wheel is open and
    /// has not spun yet this opening.
    pub fn start(&mut self, target: usize) -> bool {
        if !self.can_start() || target >= SPIN_SEGMENTS.len() {
            return false;
        }
        self.phase = SpinPhase::Spinning { target };
        true
    }

    pub fn land(&mut self) -> Option<usize> {
        match self.phase {
            SpinPhase::Spinning { target } => {
                self.phase = SpinPhase::Landed(target);
                Some(target)
            }
            _ => None,
        }
    }

    pub fn collect(&mut self) -> bool {
        match self.phase {
            SpinPhase::Landed(idx) => {
                self.phase = SpinPhase::Collecting(idx);
                true
            }
            _ => false,
        }
    }

    pub fn collect_pending(&self) -> bool {
        matches!(self.phase, SpinPhase::Collecting(_))
    }

    /// Finish collecting: returns the won segment and closes the wheel.
    pub fn take_reward(&mut self) -> Option<SpinSegment> {
        match self.phase {
            SpinPhase::Collecting(idx) => {
                self.close();
                SPIN_SEGMENTS.get(idx).copied()
            }
            _ => None,
        }
    }
}

impl Default for DailySpin {
    fn default() -> Self {
        Self::new()
    }
}

// ── Slot machine ────────────────────────────────────────────────

pub const SLOT_SPIN_COST: u64 = 100;
pub const SLOT_STOP_MS: u32 = 2000;
/// Tutorial spins close themselves this long after the win.
pub const SLOT_TUTORIAL_CLOSE_MS: u32 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotSymbol {
    Cherry,
    Lemon,
    Diamond,
    Seven,
    Bell,
    Grapes,
}

pub const SLOT_SYMBOLS: [SlotSymbol; 6] = [
    SlotSymbol::Cherry,
    SlotSymbol::Lemon,
    SlotSymbol::Diamond,
    SlotSymbol::Seven,
    SlotSymbol::Bell,
    SlotSymbol::Grapes,
];

/// Coins paid for a final reel line.
pub fn payout(reels: [SlotSymbol; 3]) -> u64 {
    let [a, b, c] = reels;
    if a == b && b == c {
        match a {
            SlotSymbol::Seven => 1000,
            SlotSymbol::Diamond => 500,
            _ => 300,
        }
    } else if a == b || b == c || a == c {
        50
    } else {
        0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotMachine {
    pub visible: bool,
    pub spinning: bool,
    pub reels: [SlotSymbol; 3],
    pub last_win: u64,
    pub message: String,
}

impl SlotMachine {
    pub fn new() -> Self {
        Self {
            visible: false,
            spinning: false,
            reels: [SlotSymbol::Cherry, SlotSymbol::Lemon, SlotSymbol::Diamond],
            last_win: 0,
            message: String::new(),
        }
    }

    pub fn open(&mut self, tutorial: bool) {
        self.visible = true;
        self.spinning = false;
        self.last_win = 0;
        self.message = if tutorial {
            "Tutorial: Free Spin!".to_string()
        } else {
            "Spin to Win!".to_string()
        };
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.spinning = false;
    }

    /// Settle the reels and return the payout.
    pub fn stop(&mut self, reels: [SlotSymbol; 3]) -> u64 {
        self.spinning = false;
        self.reels = reels;
        self.last_win = payout(reels);
        self.message = if self.last_win > 0 {
            format!("WINNER! +{} FC", self.last_win)
        } else {
            "Better luck next time!".to_string()
        };
        self.last_win
    }
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self::new()
    }
}
