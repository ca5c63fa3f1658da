//! Fuel Quest: order healthy food, level up, climb reward ladders.

pub mod actions;
pub mod catalog;
pub mod contact;
pub mod logic;
pub mod minigames;
pub mod save;
pub mod state;
pub mod tutorial;

use crate::games::Game;
use crate::input::InputEvent;
use crate::time::GameTime;

use actions::*;
use catalog::Catalog;
use contact::ContactError;
use state::{
    DeliveryMode, FuelState, LeaderboardScope, MembershipTier, PaymentMethod, ProfileTab, View,
};

pub struct FuelGame {
    pub state: FuelState,
    clock: GameTime,
}

impl FuelGame {
    pub fn new() -> Self {
        Self::with_catalog(Catalog::default())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            state: FuelState::with_catalog(catalog),
            clock: GameTime::new(),
        }
    }

    /// Feed the host's wall clock; runs however many ticks have elapsed.
    pub fn advance_to(&mut self, now_ms: f64) {
        let ticks = self.clock.update(now_ms);
        if ticks > 0 {
            self.tick(ticks);
        }
    }

    /// Contact details typed into the prompt. Text input has no click id.
    pub fn submit_contact(&mut self, email: &str, phone: &str) -> Result<bool, ContactError> {
        logic::submit_contact(&mut self.state, email, phone)
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        let s = &mut self.state;
        match action_id {
            NAV_MENU => logic::set_view(s, View::Menu),
            NAV_STORE => logic::set_view(s, View::Store),
            NAV_CART => logic::set_view(s, View::Cart),
            NAV_PROFILE => logic::set_view(s, View::Profile),
            OPEN_TROPHY_ROAD => logic::open_trophy_road(s),
            TAB_DASHBOARD => logic::set_profile_tab(s, ProfileTab::Dashboard),
            TAB_TROPHY_ROAD => logic::set_profile_tab(s, ProfileTab::TrophyRoad),
            TAB_LEADERBOARD => logic::set_profile_tab(s, ProfileTab::Leaderboard),
            SCOPE_GLOBAL => logic::set_leaderboard_scope(s, LeaderboardScope::Global),
            SCOPE_REGIONAL => logic::set_leaderboard_scope(s, LeaderboardScope::Regional),
            TUTORIAL_NEXT => return logic::tutorial_next(s),

            PROCEED_TO_PAYMENT => return logic::proceed_to_payment(s),
            BACK_TO_CART => return logic::back_to_cart(s),
            PLACE_ORDER => return logic::place_order(s),
            PAY_UPI => return logic::select_payment_method(s, PaymentMethod::Upi),
            PAY_CARD => return logic::select_payment_method(s, PaymentMethod::Card),
            PAY_COD => return logic::select_payment_method(s, PaymentMethod::Cod),
            MODE_DELIVERY => logic::set_delivery_mode(s, DeliveryMode::Delivery),
            MODE_TAKEAWAY => logic::set_delivery_mode(s, DeliveryMode::Takeaway),

            OPEN_MEMBERSHIP => logic::open_membership(s),
            CHOOSE_GOLD => return logic::upgrade_membership(s, MembershipTier::Gold),
            CHOOSE_PLATINUM => return logic::upgrade_membership(s, MembershipTier::Platinum),
            CLOSE_MEMBERSHIP => return logic::close_membership(s),

            DAILY_SPIN_OPEN => return logic::open_daily_spin(s),
            DAILY_SPIN_SPIN => return logic::spin_daily_wheel(s),
            DAILY_SPIN_COLLECT => return logic::collect_daily_spin(s),
            DAILY_SPIN_CLOSE => return logic::close_daily_spin(s),
            SLOT_SPIN => return logic::spin_slot_machine(s),
            SLOT_CLOSE => return logic::close_slot_machine(s),
            SIMULATE_DAYS => return logic::start_simulation(s),

            DISMISS_LEVEL_UP => return logic::dismiss_level_up(s),
            DISMISS_CONTACT => return logic::dismiss_contact(s),

            id if (ADD_TO_CART_BASE..REMOVE_FROM_CART_BASE).contains(&id) => {
                let idx = (id - ADD_TO_CART_BASE) as usize;
                return match s.catalog.menu.get(idx).map(|m| m.id.clone()) {
                    Some(item_id) => logic::add_to_cart(s, &item_id),
                    None => false,
                };
            }
            id if (REMOVE_FROM_CART_BASE..SHARE_PRODUCT_BASE).contains(&id) => {
                let idx = (id - REMOVE_FROM_CART_BASE) as usize;
                return match s.cart.get(idx).map(|c| c.item.id.clone()) {
                    Some(item_id) => logic::remove_from_cart(s, &item_id),
                    None => false,
                };
            }
            id if (SHARE_PRODUCT_BASE..PROCEED_TO_PAYMENT).contains(&id) => {
                let idx = (id - SHARE_PRODUCT_BASE) as usize;
                return match s.catalog.menu.get(idx).map(|m| m.id.clone()) {
                    Some(item_id) => logic::share_product(s, &item_id),
                    None => false,
                };
            }
            id if (BUY_STORE_ITEM_BASE..OPEN_MEMBERSHIP).contains(&id) => {
                let idx = (id - BUY_STORE_ITEM_BASE) as usize;
                return match s.catalog.store.get(idx).map(|i| i.id.clone()) {
                    Some(item_id) => matches!(
                        logic::purchase(s, &item_id),
                        logic::PurchaseOutcome::Purchased | logic::PurchaseOutcome::AwaitingContact
                    ),
                    None => false,
                };
            }
            id if (CHEER_BASE..CLAIM_STEP_BASE).contains(&id) => {
                let idx = (id - CHEER_BASE) as usize;
                let board = s.catalog.leaderboard(s.leaderboard_scope);
                return match board.get(idx).map(|u| u.id.clone()) {
                    Some(user_id) => logic::cheer(s, &user_id),
                    None => false,
                };
            }
            id if (CLAIM_STEP_BASE..CLAIM_ALL_BASE).contains(&id) => {
                let offset = id - CLAIM_STEP_BASE;
                let ladder_idx = (offset / LADDER_STRIDE) as usize;
                let step_idx = (offset % LADDER_STRIDE) as usize;
                let ids = s.profile.ladders.get(ladder_idx).and_then(|l| {
                    l.steps.get(step_idx).map(|st| (l.id.clone(), st.id.clone()))
                });
                return match ids {
                    Some((ladder_id, step_id)) => {
                        logic::claim_step(s, &ladder_id, &step_id)
                            != logic::ClaimOutcome::NotClaimable
                    }
                    None => false,
                };
            }
            id if id >= CLAIM_ALL_BASE => {
                let idx = (id - CLAIM_ALL_BASE) as usize;
                return match s.profile.ladders.get(idx).map(|l| l.id.clone()) {
                    Some(ladder_id) => logic::claim_all(s, &ladder_id).is_some(),
                    None => false,
                };
            }
            _ => return false,
        }
        true
    }

    fn handle_key(&mut self, key: char) -> bool {
        let s = &mut self.state;
        match key {
            'n' | ' ' => logic::tutorial_next(s),
            '1'..='4' => {
                let view = match key {
                    '1' => View::Menu,
                    '2' => View::Store,
                    '3' => View::Cart,
                    _ => View::Profile,
                };
                logic::set_view(s, view);
                true
            }
            'p' => logic::proceed_to_payment(s),
            'o' => logic::place_order(s),
            'b' => logic::back_to_cart(s),
            'd' => {
                let mode = match s.delivery_mode {
                    DeliveryMode::Delivery => DeliveryMode::Takeaway,
                    DeliveryMode::Takeaway => DeliveryMode::Delivery,
                };
                logic::set_delivery_mode(s, mode);
                true
            }
            'm' => {
                logic::open_membership(s);
                true
            }
            // spin whichever game is open
            's' => {
                if s.daily_spin.visible {
                    logic::spin_daily_wheel(s)
                } else {
                    logic::spin_slot_machine(s)
                }
            }
            'c' => logic::collect_daily_spin(s),
            'f' => logic::start_simulation(s),
            // close the topmost overlay
            'x' => {
                if s.contact.is_prompting() {
                    logic::dismiss_contact(s)
                } else if s.slot_machine.visible {
                    logic::close_slot_machine(s)
                } else if s.daily_spin.visible {
                    logic::close_daily_spin(s)
                } else if s.show_membership {
                    logic::close_membership(s)
                } else {
                    logic::dismiss_level_up(s)
                }
            }
            _ => false,
        }
    }
}

impl Default for FuelGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for FuelGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks);
    }
}
