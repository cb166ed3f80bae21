use rand::RngCore;
use rand::seq::SliceRandom;

use crate::game::action::Action;
use crate::game::game::GameView;
use crate::players::Policy;

/// Builds the most valuable thing available: a city, then a settlement, then
/// a road. Ties are broken at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

fn rank(action: &Action) -> u8 {
    match action {
        Action::BuildCity(_) => 3,
        Action::BuildSettlement(_) => 2,
        Action::BuildRoad(_) => 1,
    }
}

impl Policy for GreedyPolicy {
    fn choose_action(&self, view: &GameView<'_>, rng: &mut dyn RngCore) -> Option<Action> {
        let best = view.legal_actions.iter().map(rank).max()?;
        let top: Vec<Action> = view
            .legal_actions
            .iter()
            .filter(|a| rank(a) == best)
            .copied()
            .collect();
        top.choose(rng).copied()
    }
}
