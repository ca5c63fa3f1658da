//! Semantic action IDs for Fuel Quest click targets.
//!
//! The front end tags each button with one of these and reports it through
//! `InputEvent::Click`. `*_BASE` ranges take an index into the matching
//! catalog (or cart / leaderboard) list.

// ── Navigation ──────────────────────────────────────────────────
pub const NAV_MENU: u16 = 0;
pub const NAV_STORE: u16 = 1;
pub const NAV_CART: u16 = 2;
pub const NAV_PROFILE: u16 = 3;
/// Streak badge in the header.
pub const OPEN_TROPHY_ROAD: u16 = 4;

pub const TAB_DASHBOARD: u16 = 10;
pub const TAB_TROPHY_ROAD: u16 = 11;
pub const TAB_LEADERBOARD: u16 = 12;
pub const SCOPE_GLOBAL: u16 = 13;
pub const SCOPE_REGIONAL: u16 = 14;

pub const TUTORIAL_NEXT: u16 = 20;

// ── Menu (base + menu index) ────────────────────────────────────
pub const ADD_TO_CART_BASE: u16 = 100;
pub const SHARE_PRODUCT_BASE: u16 = 300;

// ── Cart (base + cart line index) ───────────────────────────────
pub const REMOVE_FROM_CART_BASE: u16 = 200;

// ── Checkout ────────────────────────────────────────────────────
pub const PROCEED_TO_PAYMENT: u16 = 400;
pub const BACK_TO_CART: u16 = 401;
pub const PLACE_ORDER: u16 = 402;
pub const PAY_UPI: u16 = 403;
pub const PAY_CARD: u16 = 404;
pub const PAY_COD: u16 = 405;
pub const MODE_DELIVERY: u16 = 406;
pub const MODE_TAKEAWAY: u16 = 407;

// ── Store (base + store index) ──────────────────────────────────
pub const BUY_STORE_ITEM_BASE: u16 = 500;

// ── Membership ──────────────────────────────────────────────────
pub const OPEN_MEMBERSHIP: u16 = 700;
pub const CHOOSE_GOLD: u16 = 701;
pub const CHOOSE_PLATINUM: u16 = 702;
pub const CLOSE_MEMBERSHIP: u16 = 703;

// ── Mini-games ──────────────────────────────────────────────────
pub const DAILY_SPIN_OPEN: u16 = 710;
pub const DAILY_SPIN_SPIN: u16 = 711;
pub const DAILY_SPIN_COLLECT: u16 = 712;
pub const DAILY_SPIN_CLOSE: u16 = 713;
pub const SLOT_SPIN: u16 = 720;
pub const SLOT_CLOSE: u16 = 721;
pub const SIMULATE_DAYS: u16 = 730;

// ── Overlays ────────────────────────────────────────────────────
pub const DISMISS_LEVEL_UP: u16 = 740;
pub const DISMISS_CONTACT: u16 = 750;

// ── Leaderboard (base + row index in the shown board) ───────────
pub const CHEER_BASE: u16 = 800;

// ── Ladders ─────────────────────────────────────────────────────
/// `CLAIM_STEP_BASE + ladder index * LADDER_STRIDE + step index`
pub const CLAIM_STEP_BASE: u16 = 1000;
pub const LADDER_STRIDE: u16 = 100;
/// Base + ladder index.
pub const CLAIM_ALL_BASE: u16 = 1900;

// ── Range capacity ──────────────────────────────────────────────
/// Entries one indexed range can address. Catalog lists longer than this
/// would spill into the next range.
pub const RANGE_CAPACITY: usize = (REMOVE_FROM_CART_BASE - ADD_TO_CART_BASE) as usize;
/// Ladders addressable before `CLAIM_ALL_BASE`.
pub const MAX_LADDERS: usize = ((CLAIM_ALL_BASE - CLAIM_STEP_BASE) / LADDER_STRIDE) as usize;
