use rand::RngCore;

use crate::game::action::Action;
use crate::game::game::GameView;
use crate::players::{GreedyPolicy, Policy, RandomPolicy};

pub struct CliPolicy {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_POLICIES: &[CliPolicy] = &[
    CliPolicy {
        code: "R",
        name: "RandomPolicy",
        description: "Chooses uniformly among the legal actions.",
    },
    CliPolicy {
        code: "G",
        name: "GreedyPolicy",
        description: "Prefers cities, then settlements, then roads. Random tie-break.",
    },
];

#[derive(Debug, Clone, Copy)]
pub enum PolicyInstance {
    Random(RandomPolicy),
    Greedy(GreedyPolicy),
}

impl PolicyInstance {
    pub fn name(&self) -> &'static str {
        match self {
            PolicyInstance::Random(_) => "Random",
            PolicyInstance::Greedy(_) => "Greedy",
        }
    }
}

impl Policy for PolicyInstance {
    fn choose_action(&self, view: &GameView<'_>, rng: &mut dyn RngCore) -> Option<Action> {
        match self {
            PolicyInstance::Random(p) => p.choose_action(view, rng),
            PolicyInstance::Greedy(p) => p.choose_action(view, rng),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy code `{0}`")]
pub struct UnknownPolicy(pub String);

pub fn create_policy(code: &str) -> Option<PolicyInstance> {
    match code.trim().to_ascii_uppercase().as_str() {
        "R" => Some(PolicyInstance::Random(RandomPolicy)),
        "G" => Some(PolicyInstance::Greedy(GreedyPolicy)),
        _ => None,
    }
}

/// Parses a comma-separated lineup such as `R,G,R`.
pub fn parse_lineup(codes: &str) -> Result<Vec<PolicyInstance>, UnknownPolicy> {
    codes
        .split(',')
        .map(|code| create_policy(code).ok_or_else(|| UnknownPolicy(code.trim().to_string())))
        .collect()
}

pub fn print_policy_help() {
    println!("Policy Legend:");
    println!("{:<5} {:<15} DESCRIPTION", "CODE", "POLICY");
    println!("{}", "-".repeat(80));
    for policy in CLI_POLICIES {
        println!("{:<5} {:<15} {}", policy.code, policy.name, policy.description);
    }
}
