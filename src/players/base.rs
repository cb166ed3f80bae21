use rand::RngCore;

use crate::game::action::Action;
use crate::game::game::GameView;

/// A decision policy. Returning `None` passes.
///
/// Implementations should pick from `view.legal_actions`, but the engine
/// re-validates whatever comes back, so an illegal choice is simply refused.
pub trait Policy {
    fn choose_action(&self, view: &GameView<'_>, rng: &mut dyn RngCore) -> Option<Action>;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn choose_action(&self, view: &GameView<'_>, rng: &mut dyn RngCore) -> Option<Action> {
        (**self).choose_action(view, rng)
    }
}
