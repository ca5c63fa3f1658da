//! Progress snapshots.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format that still loads. Adding fields
//!   keeps it unchanged (`#[serde(default)]` fills the gaps); only a change
//!   in meaning or a removal raises it.
//!
//! Only persistent progress is captured. Timers, open prompts, cheers and the
//! mid-tour tutorial position are session state and start fresh on import:
//! an unfinished tour restarts at `Welcome`.
//!
//! A snapshot is always normalized (`current_xp < max_xp`); one that is not
//! is rejected rather than levelled up on load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::contact::ContactGate;
use super::logic;
use super::state::{
    CartItem, CheckoutStep, FuelState, MembershipTier, PhysicalStats, UserStats,
};
use super::tutorial::TutorialStep;

const SAVE_VERSION: u32 = 1;
const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot version {0} is not supported")]
    Incompatible(u32),
    #[error("snapshot xp {current_xp} is not below its level threshold {max_xp}")]
    XpOverThreshold { current_xp: u64, max_xp: u64 },
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: FuelSave,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct LadderClaims {
    ladder_id: String,
    claimed: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CartLine {
    item_id: String,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
struct FuelSave {
    level: u32,
    current_xp: u64,
    max_xp: u64,
    coins: u64,
    membership_tier: MembershipTier,
    inventory: Vec<String>,
    stats: UserStats,
    physical_stats: PhysicalStats,
    ladder_claims: Vec<LadderClaims>,
    has_spun_daily_wheel: bool,
    email: Option<String>,
    phone: Option<String>,
    completed_quests: Vec<String>,
    cart: Vec<CartLine>,
    tutorial_complete: bool,
    rng_seed: u64,
}

impl Default for FuelSave {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            max_xp: 500,
            coins: 0,
            membership_tier: MembershipTier::Free,
            inventory: Vec::new(),
            stats: UserStats::default(),
            physical_stats: PhysicalStats::default(),
            ladder_claims: Vec::new(),
            has_spun_daily_wheel: false,
            email: None,
            phone: None,
            completed_quests: Vec::new(),
            cart: Vec::new(),
            tutorial_complete: false,
            rng_seed: 42,
        }
    }
}

fn extract_save(state: &FuelState) -> SaveData {
    let p = &state.profile;
    SaveData {
        version: SAVE_VERSION,
        game: FuelSave {
            level: p.level,
            current_xp: p.current_xp,
            max_xp: p.max_xp,
            coins: p.coins,
            membership_tier: p.membership_tier,
            inventory: p.inventory.clone(),
            stats: p.stats,
            physical_stats: p.physical_stats,
            ladder_claims: p
                .ladders
                .iter()
                .map(|l| LadderClaims {
                    ladder_id: l.id.clone(),
                    claimed: l
                        .steps
                        .iter()
                        .filter(|s| s.is_claimed)
                        .map(|s| s.id.clone())
                        .collect(),
                })
                .collect(),
            has_spun_daily_wheel: p.has_spun_daily_wheel,
            email: p.email.clone(),
            phone: p.phone.clone(),
            completed_quests: state
                .quests
                .iter()
                .filter(|q| q.is_completed)
                .map(|q| q.id.clone())
                .collect(),
            cart: state
                .cart
                .iter()
                .map(|c| CartLine {
                    item_id: c.item.id.clone(),
                    quantity: c.quantity,
                })
                .collect(),
            tutorial_complete: state.tutorial == TutorialStep::Done,
            rng_seed: state.rng_seed,
        },
    }
}

fn apply_save(state: &mut FuelState, save: &FuelSave) {
    let p = &mut state.profile;
    p.level = save.level.max(1);
    p.current_xp = save.current_xp;
    p.max_xp = save.max_xp.max(1);
    p.coins = save.coins;
    p.membership_tier = save.membership_tier;
    p.inventory = save.inventory.clone();
    p.stats = save.stats;
    p.physical_stats = save.physical_stats;
    p.has_spun_daily_wheel = save.has_spun_daily_wheel;
    p.email = save.email.clone();
    p.phone = save.phone.clone();

    // Ladders and quests come from the catalog; ids it no longer has are dropped.
    p.ladders = state.catalog.ladders.clone();
    for ladder in &mut p.ladders {
        let claimed = save
            .ladder_claims
            .iter()
            .find(|c| c.ladder_id == ladder.id)
            .map(|c| c.claimed.as_slice())
            .unwrap_or_default();
        for step in &mut ladder.steps {
            step.is_claimed = claimed.contains(&step.id);
        }
    }
    state.quests = state.catalog.quests.clone();
    for quest in &mut state.quests {
        quest.is_completed = save.completed_quests.contains(&quest.id);
    }
    state.cart = save
        .cart
        .iter()
        .filter(|line| line.quantity > 0)
        .filter_map(|line| {
            state.catalog.menu_item(&line.item_id).map(|item| CartItem {
                item: item.clone(),
                quantity: line.quantity,
            })
        })
        .collect();

    state.rng_seed = save.rng_seed;
    state.timers.clear();
    state.checkout_step = CheckoutStep::Cart;
    state.contact = ContactGate::new();
    state.daily_spin.close();
    state.slot_machine.close();
    state.show_simulation_button = false;
    state.show_membership = false;
    state.show_level_up = false;
    state.cheered.clear();
    state.toast = None;
    state.confetti_ticks = 0;
    if save.tutorial_complete {
        state.tutorial = TutorialStep::Done;
        logic::offer_daily_spin(state);
    } else {
        state.tutorial = TutorialStep::Welcome;
    }
}

/// Serialize the player's progress.
pub fn export(state: &FuelState) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(state))?)
}

/// Load a snapshot into `state`. On error `state` is left untouched.
pub fn import(state: &mut FuelState, json: &str) -> Result<(), SaveError> {
    let data: SaveData = serde_json::from_str(json).map_err(|e| {
        log::warn!("snapshot rejected: {e}");
        SaveError::Parse(e)
    })?;
    if data.version < MIN_COMPATIBLE_VERSION || data.version > SAVE_VERSION {
        log::warn!("snapshot version {} not supported", data.version);
        return Err(SaveError::Incompatible(data.version));
    }
    let game = &data.game;
    if game.current_xp >= game.max_xp.max(1) {
        log::warn!("snapshot xp {}/{} not normalized", game.current_xp, game.max_xp);
        return Err(SaveError::XpOverThreshold {
            current_xp: game.current_xp,
            max_xp: game.max_xp,
        });
    }
    apply_save(state, &data.game);
    log::info!(
        "snapshot v{} loaded: level {}, {} FC",
        data.version,
        state.profile.level,
        state.profile.coins
    );
    Ok(())
}
