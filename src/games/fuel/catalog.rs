//! Static tables: menu, store, ladders, quests, leaderboards.
//!
//! A session starts from a [`Catalog`]. The built-in one mirrors the shipped
//! app; hosts can supply their own as JSON via [`Catalog::from_json`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::actions::{MAX_LADDERS, RANGE_CAPACITY};
use super::state::{
    Ladder, LadderStep, LeaderboardScope, LeaderboardUser, Macros, MembershipTier, MenuItem,
    Metric, Quest, QuestType, RewardType, StoreItem, StoreItemKind,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("ladder `{ladder}` thresholds must be strictly increasing (step `{step}`)")]
    UnorderedLadder { ladder: String, step: String },
    #[error("menu item `{0}` has a zero price")]
    FreeMenuItem(String),
    #[error("{count} {kind} entries exceed the limit of {max}")]
    TooMany {
        kind: &'static str,
        count: usize,
        max: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub menu: Vec<MenuItem>,
    pub store: Vec<StoreItem>,
    pub ladders: Vec<Ladder>,
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub global_leaderboard: Vec<LeaderboardUser>,
    #[serde(default)]
    pub regional_leaderboard: Vec<LeaderboardUser>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            menu: default_menu(),
            store: default_store(),
            ladders: default_ladders(),
            quests: default_quests(),
            global_leaderboard: global_leaderboard(),
            regional_leaderboard: regional_leaderboard(),
        }
    }
}

impl Catalog {
    /// Parse and validate a catalog. Claim flags and quest completion in the
    /// input are reset so a session always starts clean.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        for ladder in &mut catalog.ladders {
            for step in &mut ladder.steps {
                step.is_claimed = false;
            }
        }
        for quest in &mut catalog.quests {
            quest.is_completed = false;
        }
        log::debug!(
            "catalog loaded: {} menu items, {} store items, {} ladders",
            catalog.menu.len(),
            catalog.store.len(),
            catalog.ladders.len()
        );
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        within("menu item", self.menu.len(), RANGE_CAPACITY)?;
        within("store item", self.store.len(), RANGE_CAPACITY)?;
        within("global leaderboard", self.global_leaderboard.len(), RANGE_CAPACITY)?;
        within("regional leaderboard", self.regional_leaderboard.len(), RANGE_CAPACITY)?;
        within("ladder", self.ladders.len(), MAX_LADDERS)?;
        for ladder in &self.ladders {
            within("ladder step", ladder.steps.len(), RANGE_CAPACITY)?;
        }

        unique_ids("menu item", self.menu.iter().map(|m| m.id.as_str()))?;
        unique_ids("store item", self.store.iter().map(|s| s.id.as_str()))?;
        unique_ids("ladder", self.ladders.iter().map(|l| l.id.as_str()))?;
        unique_ids("quest", self.quests.iter().map(|q| q.id.as_str()))?;

        if let Some(item) = self.menu.iter().find(|m| m.price == 0) {
            return Err(CatalogError::FreeMenuItem(item.id.clone()));
        }

        for ladder in &self.ladders {
            unique_ids("ladder step", ladder.steps.iter().map(|s| s.id.as_str()))?;
            for pair in ladder.steps.windows(2) {
                if pair[1].threshold <= pair[0].threshold {
                    return Err(CatalogError::UnorderedLadder {
                        ladder: ladder.id.clone(),
                        step: pair[1].id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu.iter().find(|m| m.id == id)
    }

    pub fn store_item(&self, id: &str) -> Option<&StoreItem> {
        self.store.iter().find(|s| s.id == id)
    }

    pub fn leaderboard(&self, scope: LeaderboardScope) -> &[LeaderboardUser] {
        match scope {
            LeaderboardScope::Global => &self.global_leaderboard,
            LeaderboardScope::Regional => &self.regional_leaderboard,
        }
    }
}

/// Every list is addressed by click ranges of fixed width.
fn within(kind: &'static str, count: usize, max: usize) -> Result<(), CatalogError> {
    if count > max {
        return Err(CatalogError::TooMany { kind, count, max });
    }
    Ok(())
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

// ── Menu queries ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DietFilter {
    #[default]
    All,
    Veg,
    NonVeg,
}

#[derive(Clone, Debug, Default)]
pub struct MenuFilter {
    pub diet: DietFilter,
    pub query: String,
}

fn matches_query(query: &str, name: &str, description: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    name.to_lowercase().contains(&q) || description.to_lowercase().contains(&q)
}

/// Items passing `filter`, grouped by category. Categories keep the order in
/// which they first appear in the menu; empty categories are omitted.
pub fn filter_menu<'a>(menu: &'a [MenuItem], filter: &MenuFilter) -> Vec<(&'a str, Vec<&'a MenuItem>)> {
    let mut groups: Vec<(&str, Vec<&MenuItem>)> = Vec::new();
    let visible = menu.iter().filter(|m| {
        let diet_ok = match filter.diet {
            DietFilter::All => true,
            DietFilter::Veg => m.is_veg,
            DietFilter::NonVeg => !m.is_veg,
        };
        diet_ok && matches_query(&filter.query, &m.name, &m.description)
    });
    for item in visible {
        match groups.iter_mut().find(|(cat, _)| *cat == item.category) {
            Some((_, items)) => items.push(item),
            None => groups.push((item.category.as_str(), vec![item])),
        }
    }
    groups
}

// ── Store queries ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreSort {
    #[default]
    Relevant,
    PriceLow,
    PriceHigh,
}

#[derive(Clone, Debug, Default)]
pub struct StoreQuery {
    pub query: String,
    pub kind: Option<StoreItemKind>,
    pub sort: StoreSort,
}

pub fn query_store<'a>(store: &'a [StoreItem], q: &StoreQuery) -> Vec<&'a StoreItem> {
    let mut items: Vec<&StoreItem> = store
        .iter()
        .filter(|s| q.kind.map_or(true, |k| s.kind == k))
        .filter(|s| matches_query(&q.query, &s.name, &s.description))
        .collect();
    match q.sort {
        StoreSort::Relevant => {}
        StoreSort::PriceLow => items.sort_by_key(|s| s.cost),
        StoreSort::PriceHigh => items.sort_by_key(|s| std::cmp::Reverse(s.cost)),
    }
    items
}

// ── Built-in tables ─────────────────────────────────────────────

const JUNK_CATEGORIES: [&str; 3] = ["Burgers", "Pizzas", "Desserts"];
const INDIAN_CATEGORIES: [&str; 2] = ["Biryani", "Indian Breads"];

/// Build a menu item, deriving XP, calories and quest tags from its macros
/// and category.
fn dish(id: u32, name: &str, category: &str, price: u64, is_veg: bool, m: Macros) -> MenuItem {
    let is_junk = JUNK_CATEGORIES.contains(&category);
    let mut tags = Vec::new();
    if m.protein > 25 {
        tags.push(QuestType::Protein);
    }
    if !is_junk && m.carbs < 40 {
        tags.push(QuestType::Healthy);
    }
    if INDIAN_CATEGORIES.contains(&category) {
        tags.push(QuestType::Indian);
    }
    if is_junk {
        tags.push(QuestType::Cheat);
    }
    MenuItem {
        id: format!("m{id}"),
        name: name.to_string(),
        description: format!(
            "Delicious {name} prepared with fresh ingredients and chef's secret spices."
        ),
        category: category.to_string(),
        price,
        xp_value: price / 3,
        tags,
        is_junk,
        calories: m.protein * 4 + m.carbs * 4 + m.fats * 9,
        macros: m,
        ingredients: Vec::new(),
        is_veg,
        rating: 4.2,
        votes: 1200,
    }
}

const fn macros(protein: u64, carbs: u64, fats: u64, fibre: u64) -> Macros {
    Macros {
        protein,
        carbs,
        fats,
        fibre,
    }
}

fn default_menu() -> Vec<MenuItem> {
    vec![
        dish(1, "Spicy Chicken Biryani", "Biryani", 320, false, macros(38, 55, 18, 2)),
        dish(2, "Roasted Paneer Biryani", "Biryani", 280, true, macros(22, 58, 16, 9)),
        dish(3, "Grilled Tofu Bowl", "Bowls", 260, true, macros(24, 32, 12, 11)),
        dish(4, "Zesty Egg Bowl", "Bowls", 240, false, macros(30, 35, 14, 2)),
        dish(5, "Grilled Chicken Bowl", "Bowls", 350, false, macros(45, 30, 15, 2)),
        dish(6, "Crispy Chicken Burger", "Burgers", 290, false, macros(28, 70, 35, 2)),
        dish(7, "Cheesy Mushroom Burger", "Burgers", 230, true, macros(14, 65, 30, 8)),
        dish(8, "Double Paneer Pizza", "Pizzas", 450, true, macros(24, 90, 40, 7)),
        dish(9, "Spicy Mutton Pizza", "Pizzas", 520, false, macros(35, 85, 42, 2)),
        dish(10, "Butter Paneer Naan", "Indian Breads", 180, true, macros(12, 48, 14, 6)),
        dish(11, "Roasted Soya Kulcha", "Indian Breads", 160, true, macros(26, 38, 10, 12)),
        dish(12, "Grilled Chicken Tikka", "Starters", 300, false, macros(42, 12, 16, 2)),
        dish(13, "Crispy Mushroom Starter", "Starters", 210, true, macros(11, 36, 18, 10)),
        dish(14, "Vegan Tofu Brownie", "Desserts", 190, true, macros(10, 60, 22, 5)),
        dish(15, "Butter Egg Shake", "Beverages", 150, false, macros(18, 30, 8, 2)),
        dish(16, "Zesty Soya Smoothie", "Beverages", 170, true, macros(20, 28, 6, 9)),
    ]
}

fn default_store() -> Vec<StoreItem> {
    let products: [(&str, StoreItemKind, u64); 12] = [
        ("Running Shoes", StoreItemKind::Physical, 3000),
        ("Gym T-Shirt", StoreItemKind::Physical, 800),
        ("Smart Watch", StoreItemKind::Physical, 2500),
        ("Wireless Buds", StoreItemKind::Physical, 1500),
        ("Gaming Mouse", StoreItemKind::Physical, 2000),
        ("Whey Protein (1kg)", StoreItemKind::Physical, 2800),
        ("Yoga Mat", StoreItemKind::Physical, 1200),
        ("Gift Card (500 INR)", StoreItemKind::Digital, 2500),
        ("Spotify Premium", StoreItemKind::Digital, 800),
        ("Netflix Mobile", StoreItemKind::Digital, 900),
        ("Pro Badge", StoreItemKind::Digital, 5000),
        ("XP Booster 2x", StoreItemKind::Digital, 400),
    ];
    let mut items: Vec<StoreItem> = products
        .iter()
        .enumerate()
        .map(|(i, (name, kind, cost))| StoreItem {
            id: format!("store_{}", i + 1),
            name: name.to_string(),
            cost: *cost,
            kind: *kind,
            description: format!("Official merchandise. High quality {}.", name.to_lowercase()),
        })
        .collect();
    items.push(StoreItem {
        id: "store_special_1".into(),
        name: "PlayStation 5 Slim".into(),
        cost: 50_000,
        kind: StoreItemKind::Physical,
        description: "The ultimate gaming console. Ultra-rare stock.".into(),
    });
    items
}

fn reward(
    id: String,
    threshold: u64,
    reward_type: RewardType,
    reward_value: u64,
    milestone: Option<&str>,
) -> LadderStep {
    LadderStep {
        id,
        threshold,
        reward_description: milestone.map(str::to_string),
        reward_value,
        reward_type,
        is_claimed: false,
        is_milestone: milestone.is_some(),
    }
}

/// 30 daily steps, 10 FC each, with five milestones.
fn streak_steps() -> Vec<LadderStep> {
    (1..=30)
        .map(|day| {
            let (kind, value, desc) = match day {
                3 => (RewardType::Coins, 100, Some("Starter Fund (100 FC)")),
                7 => (RewardType::Xp, 500, Some("Week Warrior Boost (500 XP)")),
                14 => (RewardType::Coins, 1000, Some("Fortnight Fortune (1000 FC)")),
                21 => (RewardType::Xp, 2000, Some("Habit Hero (2000 XP)")),
                30 => (RewardType::Item, 1, Some("FREE MEAL VOUCHER")),
                _ => (RewardType::Coins, 10, None),
            };
            reward(format!("s{day}"), day, kind, value, desc)
        })
        .collect()
}

fn protein_steps() -> Vec<LadderStep> {
    const TARGETS: [u64; 10] = [50, 150, 300, 500, 800, 1200, 1600, 2000, 2500, 3000];
    TARGETS
        .iter()
        .enumerate()
        .map(|(index, &t)| {
            let (kind, value, desc) = match t {
                300 => (RewardType::Coins, 500, Some("Muscle Starter Kit (500 FC)")),
                1200 => (RewardType::Xp, 1500, Some("Anabolic Boost (1500 XP)")),
                2500 => (RewardType::Item, 1, Some("PRO SHAKER BOTTLE")),
                3000 => (RewardType::Item, 1, Some("1KG WHEY PROTEIN")),
                _ => (RewardType::Coins, 50 + index as u64 * 20, None),
            };
            reward(format!("p{t}"), t, kind, value, desc)
        })
        .collect()
}

fn fibre_steps() -> Vec<LadderStep> {
    const TARGETS: [u64; 8] = [20, 50, 100, 200, 350, 500, 700, 900];
    TARGETS
        .iter()
        .enumerate()
        .map(|(index, &t)| {
            let (kind, value, desc) = match t {
                100 => (RewardType::Coins, 300, Some("Digestive Aid (300 FC)")),
                500 => (RewardType::Xp, 800, Some("Gut Guardian (800 XP)")),
                900 => (RewardType::Item, 1, Some("ORGANIC FRUIT BASKET")),
                _ => (RewardType::Xp, 30 + index as u64 * 15, None),
            };
            reward(format!("f{t}"), t, kind, value, desc)
        })
        .collect()
}

pub fn default_ladders() -> Vec<Ladder> {
    vec![
        Ladder {
            id: "l_streak".into(),
            title: "Streak Master".into(),
            description: "Login and order daily. Consistency is key.".into(),
            metric: Metric::Streak,
            unit: "Day".into(),
            steps: streak_steps(),
        },
        Ladder {
            id: "l_protein".into(),
            title: "Iron Pumping".into(),
            description: "Accumulate protein intake across all your orders.".into(),
            metric: Metric::TotalProtein,
            unit: "g".into(),
            steps: protein_steps(),
        },
        Ladder {
            id: "l_fibre".into(),
            title: "Fibre Focus".into(),
            description: "Hit your dietary fibre targets for gut health.".into(),
            metric: Metric::TotalFibre,
            unit: "g".into(),
            steps: fibre_steps(),
        },
    ]
}

fn quest(id: &str, title: &str, xp: u64, coins: u64, quest_type: QuestType) -> Quest {
    Quest {
        id: id.into(),
        title: title.into(),
        xp_reward: xp,
        coin_reward: coins,
        is_completed: false,
        quest_type,
    }
}

pub fn default_quests() -> Vec<Quest> {
    vec![
        quest("q1", "Desi Gains (Order Indian)", 100, 20, QuestType::Indian),
        quest("q2", "Protein Packer (>30g)", 50, 10, QuestType::Protein),
        quest("q3", "Clean Fuel Only", 80, 15, QuestType::Healthy),
    ]
}

fn player(id: &str, name: &str, xp: u64, rank: u32, tier: MembershipTier, streak: u64) -> LeaderboardUser {
    LeaderboardUser {
        id: id.into(),
        name: name.into(),
        xp,
        rank,
        tier,
        streak,
    }
}

fn global_leaderboard() -> Vec<LeaderboardUser> {
    use MembershipTier::*;
    vec![
        player("u1", "GigaChad_99", 45_000, 1, Platinum, 45),
        player("u2", "FitQueen_X", 42_300, 2, Platinum, 32),
        player("u3", "IronPump", 41_000, 3, Gold, 28),
        player("u4", "MealPrepper", 38_500, 4, Gold, 12),
        player("u5", "ZenMaster", 36_000, 5, Free, 60),
    ]
}

fn regional_leaderboard() -> Vec<LeaderboardUser> {
    use MembershipTier::*;
    vec![
        player("r1", "Hitech_Hero", 12_000, 1, Gold, 15),
        player("r2", "CyberFoodie", 11_500, 2, Free, 10),
        player("r3", "CodeNChew", 10_200, 3, Platinum, 22),
        player("u_me", "CyberAthlete_99", 5_800, 4, Free, 15),
        player("r5", "LateNightDev", 4_000, 5, Free, 3),
    ]
}
