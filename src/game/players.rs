use serde::{Deserialize, Serialize};

use crate::game::resources::{ResourceBundle, ResourceError};
use crate::types::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub resources: ResourceBundle,
    pub victory_points: u32,
    pub settlements: u32,
    pub cities: u32,
    pub roads: u32,
}

impl PlayerState {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            resources: ResourceBundle::zero(),
            victory_points: 0,
            settlements: 0,
            cities: 0,
            roads: 0,
        }
    }

    pub fn add_resources(&mut self, bundle: &ResourceBundle) {
        self.resources.add_bundle(bundle);
    }

    pub fn remove_resources(&mut self, bundle: &ResourceBundle) -> Result<(), ResourceError> {
        self.resources.subtract_bundle(bundle)
    }

    pub fn card_count(&self) -> u32 {
        self.resources.total()
    }

    pub(crate) fn record_settlement(&mut self) {
        self.settlements += 1;
        self.victory_points += 1;
    }

    pub(crate) fn record_city(&mut self) {
        self.settlements = self.settlements.saturating_sub(1);
        self.cities += 1;
        self.victory_points += 1;
    }

    pub(crate) fn record_road(&mut self) {
        self.roads += 1;
    }
}
