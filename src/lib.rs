//! fuel-quest: the state engine behind a gamified food-ordering app.
//!
//! Everything lives in one owned [`games::fuel::state::FuelState`]. A front end
//! feeds it [`input::InputEvent`]s and wall-clock time through the
//! [`games::Game`] trait, or calls the functions in [`games::fuel::logic`]
//! directly. Nothing here renders.

pub mod games;
pub mod input;
pub mod time;

pub use games::fuel::FuelGame;
pub use games::Game;
