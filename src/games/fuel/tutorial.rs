//! Onboarding tutorial as a pure, forward-only state machine.
//!
//! [`TutorialStep::on`] maps (step, event) to an optional [`Transition`].
//! Side effects of entering a step (switching views, opening prompts,
//! toasts) live in `logic`.

/// Steps in tour order. Every transition moves to a later variant; `Done`
/// is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TutorialStep {
    Welcome,
    HudIntro,
    QuestIntro,
    MenuXpIntro,
    TriggerMembership,
    OrderGuide,
    CheckoutGuide,
    SlotMachineIntro,
    ProfileIntro,
    /// First part of the tour finished; the player explores until they start
    /// the fifteen-day simulation.
    FreeRoam,
    WaitingForSpin,
    SimulationReady,
    LadderIntro,
    StoreIntro,
    LeaderboardIntro,
    Done,
}

pub const ALL_STEPS: [TutorialStep; 16] = [
    TutorialStep::Welcome,
    TutorialStep::HudIntro,
    TutorialStep::QuestIntro,
    TutorialStep::MenuXpIntro,
    TutorialStep::TriggerMembership,
    TutorialStep::OrderGuide,
    TutorialStep::CheckoutGuide,
    TutorialStep::SlotMachineIntro,
    TutorialStep::ProfileIntro,
    TutorialStep::FreeRoam,
    TutorialStep::WaitingForSpin,
    TutorialStep::SimulationReady,
    TutorialStep::LadderIntro,
    TutorialStep::StoreIntro,
    TutorialStep::LeaderboardIntro,
    TutorialStep::Done,
];

/// Things that can move the tutorial along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TutorialEvent {
    /// The player pressed "next" on the overlay.
    Next,
    MembershipChosen,
    MembershipDismissed,
    AddedToCart,
    CheckoutCompleted,
    SlotMachineClosed,
    SimulationApplied,
    DailySpinClosed,
    /// Claim-all pressed on a ladder.
    RewardsClaimed,
    StorePurchase,
    /// Internal: the trophy road is on screen after the simulation.
    LadderShown,
}

pub const ALL_EVENTS: [TutorialEvent; 11] = [
    TutorialEvent::Next,
    TutorialEvent::MembershipChosen,
    TutorialEvent::MembershipDismissed,
    TutorialEvent::AddedToCart,
    TutorialEvent::CheckoutCompleted,
    TutorialEvent::SlotMachineClosed,
    TutorialEvent::SimulationApplied,
    TutorialEvent::DailySpinClosed,
    TutorialEvent::RewardsClaimed,
    TutorialEvent::StorePurchase,
    TutorialEvent::LadderShown,
];

/// Facts about the rest of the game the branch points need.
#[derive(Clone, Copy, Debug, Default)]
pub struct TutorialContext {
    pub can_afford_store_item: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Goto(TutorialStep),
    /// Re-deliver `event` after `ms`, provided the step has not changed.
    Defer { ms: u32, event: TutorialEvent },
}

impl TutorialStep {
    pub fn on(self, event: TutorialEvent, ctx: TutorialContext) -> Option<Transition> {
        use Transition::*;
        use TutorialEvent as E;
        use TutorialStep as S;

        let after_ladders = if ctx.can_afford_store_item {
            S::StoreIntro
        } else {
            S::LeaderboardIntro
        };

        match (self, event) {
            (S::Welcome, E::Next) => Some(Goto(S::HudIntro)),
            (S::HudIntro, E::Next) => Some(Goto(S::QuestIntro)),
            (S::QuestIntro, E::Next) => Some(Goto(S::MenuXpIntro)),
            (S::MenuXpIntro, E::Next) => Some(Goto(S::TriggerMembership)),
            (S::TriggerMembership, E::MembershipChosen | E::MembershipDismissed) => {
                Some(Goto(S::OrderGuide))
            }
            (S::OrderGuide, E::AddedToCart) => Some(Goto(S::CheckoutGuide)),
            (S::CheckoutGuide, E::CheckoutCompleted) => Some(Goto(S::SlotMachineIntro)),
            (S::SlotMachineIntro, E::SlotMachineClosed) => Some(Goto(S::ProfileIntro)),
            (S::ProfileIntro, E::Next) => Some(Goto(S::FreeRoam)),
            (S::FreeRoam, E::SimulationApplied) => Some(Goto(S::WaitingForSpin)),
            (S::WaitingForSpin, E::DailySpinClosed) => Some(Goto(S::SimulationReady)),
            (S::SimulationReady, E::Next) => Some(Defer {
                ms: 500,
                event: E::LadderShown,
            }),
            (S::SimulationReady, E::LadderShown) => Some(Goto(S::LadderIntro)),
            (S::LadderIntro, E::Next) => Some(Goto(after_ladders)),
            (S::LadderIntro, E::RewardsClaimed) => Some(Defer {
                ms: 1500,
                event: E::Next,
            }),
            (S::StoreIntro, E::Next) => Some(Goto(S::LeaderboardIntro)),
            (S::StoreIntro, E::StorePurchase) => Some(Defer {
                ms: 1500,
                event: E::Next,
            }),
            (S::LeaderboardIntro, E::Next) => Some(Goto(S::Done)),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        self != TutorialStep::Done
    }

    /// Whether the overlay card is on screen.
    pub fn shows_overlay(self) -> bool {
        !matches!(
            self,
            TutorialStep::SlotMachineIntro
                | TutorialStep::FreeRoam
                | TutorialStep::WaitingForSpin
                | TutorialStep::Done
        )
    }

    /// Blocking steps dim the app and advance on any tap; the others point
    /// at a real control and wait for the player to use it.
    pub fn is_blocking(self) -> bool {
        self.shows_overlay()
            && !matches!(
                self,
                TutorialStep::TriggerMembership
                    | TutorialStep::OrderGuide
                    | TutorialStep::CheckoutGuide
                    | TutorialStep::LadderIntro
                    | TutorialStep::StoreIntro
                    | TutorialStep::LeaderboardIntro
            )
    }
}
