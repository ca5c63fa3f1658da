//! Fuel Quest game state.
//!
//! Catalog types derive serde so the same structs back JSON catalogs and
//! snapshots. `FuelState` owns everything; logic borrows it mutably.

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::contact::ContactGate;
use super::minigames::{DailySpin, SlotMachine};
use super::tutorial::TutorialStep;
use crate::time::ms_to_ticks;

/// Paid membership level. Drives the checkout reward multiplier and the
/// delivery fee waiver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipTier {
    #[default]
    Free,
    Gold,
    Platinum,
}

impl MembershipTier {
    /// Reward multiplier as `(numerator, denominator)`, keeping checkout
    /// arithmetic in integers.
    pub fn multiplier_ratio(self) -> (u64, u64) {
        match self {
            MembershipTier::Free => (1, 1),
            MembershipTier::Gold => (3, 2),
            MembershipTier::Platinum => (2, 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MembershipTier::Free => "FREE",
            MembershipTier::Gold => "GOLD",
            MembershipTier::Platinum => "PLATINUM",
        }
    }
}

/// Tag carried by menu items and the objective type of a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestType {
    Protein,
    Time,
    Healthy,
    Indian,
    Cheat,
    /// Wildcard: an item tagged ANY satisfies every quest.
    Any,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: u64,
    pub carbs: u64,
    pub fats: u64,
    pub fibre: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: u64,
    pub xp_value: u64,
    #[serde(default)]
    pub tags: Vec<QuestType>,
    #[serde(default)]
    pub is_junk: bool,
    #[serde(default)]
    pub calories: u64,
    #[serde(default)]
    pub macros: Macros,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub is_veg: bool,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub votes: u32,
}

impl MenuItem {
    pub fn has_tag(&self, tag: QuestType) -> bool {
        self.tags.contains(&tag)
    }

    /// Counts toward `healthy_orders` at checkout.
    pub fn is_healthy(&self) -> bool {
        self.has_tag(QuestType::Healthy) || self.has_tag(QuestType::Protein)
    }
}

/// One cart line. The cart holds at most one line per menu item id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_price(&self) -> u64 {
        self.item.price * self.quantity as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreItemKind {
    Digital,
    Physical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub name: String,
    pub cost: u64,
    pub kind: StoreItemKind,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    Coins,
    Xp,
    Item,
}

impl RewardType {
    pub fn label(self) -> &'static str {
        match self {
            RewardType::Coins => "COINS",
            RewardType::Xp => "XP",
            RewardType::Item => "ITEM",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LadderStep {
    pub id: String,
    pub threshold: u64,
    #[serde(default)]
    pub reward_description: Option<String>,
    #[serde(default)]
    pub reward_value: u64,
    pub reward_type: RewardType,
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default)]
    pub is_milestone: bool,
}

impl LadderStep {
    /// Whether this step can be claimed when the ladder's metric reads `value`.
    pub fn is_claimable(&self, value: u64) -> bool {
        self.is_milestone && !self.is_claimed && value >= self.threshold
    }

    pub fn description(&self) -> String {
        self.reward_description
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.reward_value, self.reward_type.label()))
    }
}

/// The stat a ladder climbs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Streak,
    TotalProtein,
    TotalFibre,
    HealthyOrders,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub metric: Metric,
    #[serde(default)]
    pub unit: String,
    pub steps: Vec<LadderStep>,
}

impl Ladder {
    /// Steps claimable right now, in ladder order.
    pub fn claimable_steps<'a>(
        &'a self,
        stats: &UserStats,
    ) -> impl Iterator<Item = &'a LadderStep> + 'a {
        let value = stats.get(self.metric);
        self.steps.iter().filter(move |s| s.is_claimable(value))
    }

    pub fn step(&self, step_id: &str) -> Option<&LadderStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }
}

/// Lifetime counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub streak: u64,
    pub total_protein: u64,
    pub total_fibre: u64,
    pub healthy_orders: u64,
}

impl UserStats {
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Streak => self.streak,
            Metric::TotalProtein => self.total_protein,
            Metric::TotalFibre => self.total_fibre,
            Metric::HealthyOrders => self.healthy_orders,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    Active,
    VeryActive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessGoal {
    LoseWeight,
    Maintain,
    BuildMuscle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalStats {
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: FitnessGoal,
}

impl Default for PhysicalStats {
    fn default() -> Self {
        Self {
            weight: 75.0,
            height: 178.0,
            age: 24,
            gender: Gender::Male,
            activity_level: ActivityLevel::Active,
            goal: FitnessGoal::BuildMuscle,
        }
    }
}

impl PhysicalStats {
    pub fn bmi(&self) -> f64 {
        let metres = self.height / 100.0;
        self.weight / (metres * metres)
    }

    pub fn bmi_category(&self) -> BmiCategory {
        let bmi = self.bmi();
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub xp_reward: u64,
    pub coin_reward: u64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
}

impl Quest {
    /// Whether a cart containing `item` satisfies this quest.
    pub fn matches(&self, item: &MenuItem) -> bool {
        item.has_tag(self.quest_type) || item.has_tag(QuestType::Any)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaderboardScope {
    Global,
    Regional,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardUser {
    pub id: String,
    pub name: String,
    pub xp: u64,
    pub rank: u32,
    pub tier: MembershipTier,
    pub streak: u64,
}

/// Row id of the player on the regional board.
pub const SELF_LEADERBOARD_ID: &str = "u_me";

/// The player's progression ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub level: u32,
    pub current_xp: u64,
    pub max_xp: u64,
    pub coins: u64,
    pub membership_tier: MembershipTier,
    /// Store item ids owned.
    pub inventory: Vec<String>,
    pub stats: UserStats,
    pub physical_stats: PhysicalStats,
    pub ladders: Vec<Ladder>,
    pub has_spun_daily_wheel: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Profile {
    /// Fresh-install profile: level 1, 0/500 XP, no coins.
    pub fn new(ladders: Vec<Ladder>) -> Self {
        Self {
            level: 1,
            current_xp: 0,
            max_xp: 500,
            coins: 0,
            membership_tier: MembershipTier::Free,
            inventory: Vec::new(),
            stats: UserStats::default(),
            physical_stats: PhysicalStats::default(),
            ladders,
            has_spun_daily_wheel: false,
            email: None,
            phone: None,
        }
    }

    pub fn has_contact(&self) -> bool {
        self.email.is_some() && self.phone.is_some()
    }

    /// Progress bar fill, capped at 100.
    pub fn xp_percent(&self) -> f64 {
        if self.max_xp == 0 {
            return 100.0;
        }
        (self.current_xp as f64 / self.max_xp as f64 * 100.0).min(100.0)
    }

    pub fn ladder(&self, ladder_id: &str) -> Option<&Ladder> {
        self.ladders.iter().find(|l| l.id == ladder_id)
    }

    pub fn owns(&self, store_item_id: &str) -> bool {
        self.inventory.iter().any(|id| id == store_item_id)
    }

    /// Milestones reached but not yet claimed, across all ladders.
    pub fn unclaimed_reward_count(&self) -> usize {
        self.ladders
            .iter()
            .map(|l| l.claimable_steps(&self.stats).count())
            .sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Menu,
    Store,
    Cart,
    Profile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileTab {
    Dashboard,
    TrophyRoad,
    Leaderboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    Delivery,
    Takeaway,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    Upi,
    Card,
    Cod,
}

/// Where the cart screen is in the payment flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutStep {
    Cart,
    Payment,
    /// Payment submitted; checkout runs when the processing delay elapses.
    Processing,
}

/// Badge flags for the bottom navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Notifications {
    pub profile: bool,
    pub store: bool,
}

/// Something the game does later, after a tick countdown.
#[derive(Clone, Debug, PartialEq)]
pub enum TimedEvent {
    CompletePayment,
    OrderCompleteToast { coins: u64 },
    OpenSlotMachine,
    StopSlotReels,
    CloseSlotMachine,
    LandDailySpin,
    CollectDailySpin,
    OpenDailySpin,
    ShowSimulationButton,
    ApplySimulation,
    Toast(String),
    /// A tutorial event that only applies if the tutorial is still at `from`.
    Tutorial {
        from: TutorialStep,
        event: super::tutorial::TutorialEvent,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Timer {
    pub ticks_left: u32,
    pub event: TimedEvent,
}

/// The transient message banner.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub text: String,
    pub ticks_left: u32,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

pub const TOAST_TICKS: u32 = ms_to_ticks(4000);
const MAX_LOG: usize = 50;

/// Full state of a Fuel Quest session.
pub struct FuelState {
    /// Static tables the session was started with.
    pub catalog: Catalog,
    pub profile: Profile,
    pub quests: Vec<Quest>,
    pub cart: Vec<CartItem>,
    pub view: View,
    pub profile_tab: ProfileTab,
    pub delivery_mode: DeliveryMode,
    pub checkout_step: CheckoutStep,
    pub payment_method: PaymentMethod,
    pub tutorial: TutorialStep,
    pub show_simulation_button: bool,
    pub show_membership: bool,
    /// One-shot level-up overlay; cleared by the player.
    pub show_level_up: bool,
    pub contact: ContactGate,
    pub daily_spin: DailySpin,
    pub slot_machine: SlotMachine,
    pub leaderboard_scope: LeaderboardScope,
    /// Leaderboard rows cheered this session.
    pub cheered: Vec<String>,
    /// Remaining ticks of the confetti celebration.
    pub confetti_ticks: u32,
    pub toast: Option<Toast>,
    pub log: Vec<LogEntry>,
    /// Pending delayed events, in scheduling order.
    pub timers: Vec<Timer>,
    pub total_ticks: u64,
    pub rng_seed: u64,
}

impl FuelState {
    pub fn new() -> Self {
        Self::with_catalog(Catalog::default())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        let profile = Profile::new(catalog.ladders.clone());
        let quests = catalog.quests.clone();
        Self {
            catalog,
            profile,
            quests,
            cart: Vec::new(),
            view: View::Menu,
            profile_tab: ProfileTab::Dashboard,
            delivery_mode: DeliveryMode::Delivery,
            checkout_step: CheckoutStep::Cart,
            payment_method: PaymentMethod::Upi,
            tutorial: TutorialStep::Welcome,
            show_simulation_button: false,
            show_membership: false,
            show_level_up: false,
            contact: ContactGate::new(),
            daily_spin: DailySpin::new(),
            slot_machine: SlotMachine::new(),
            leaderboard_scope: LeaderboardScope::Regional,
            cheered: Vec::new(),
            confetti_ticks: 0,
            toast: None,
            log: Vec::new(),
            timers: Vec::new(),
            total_ticks: 0,
            rng_seed: 42,
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Show a toast and keep it in the log.
    pub fn notify(&mut self, text: &str) {
        self.toast = Some(Toast {
            text: text.to_string(),
            ticks_left: TOAST_TICKS,
        });
        self.add_log(text, true);
    }

    /// Start (or extend) the confetti celebration.
    pub fn celebrate(&mut self, ms: u32) {
        self.confetti_ticks = self.confetti_ticks.max(ms_to_ticks(ms));
    }

    /// Queue `event` to fire after `ms` milliseconds (at least one tick).
    pub fn schedule(&mut self, ms: u32, event: TimedEvent) {
        self.timers.push(Timer {
            ticks_left: ms_to_ticks(ms).max(1),
            event,
        });
    }

    pub fn is_scheduled(&self, pred: impl Fn(&TimedEvent) -> bool) -> bool {
        self.timers.iter().any(|t| pred(&t.event))
    }

    pub fn cart_count(&self) -> u32 {
        self.cart.iter().map(|c| c.quantity).sum()
    }

    pub fn can_afford_any_store_item(&self) -> bool {
        self.catalog
            .store
            .iter()
            .any(|item| self.profile.coins >= item.cost)
    }

    pub fn notifications(&self) -> Notifications {
        Notifications {
            profile: self.profile.unclaimed_reward_count() > 0,
            store: self.can_afford_any_store_item(),
        }
    }
}

impl Default for FuelState {
    fn default() -> Self {
        Self::new()
    }
}
