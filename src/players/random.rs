use rand::RngCore;
use rand::seq::SliceRandom;

use crate::game::action::Action;
use crate::game::game::GameView;
use crate::players::Policy;

/// Uniform choice over the legal actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn choose_action(&self, view: &GameView<'_>, rng: &mut dyn RngCore) -> Option<Action> {
        view.legal_actions.choose(rng).copied()
    }
}
