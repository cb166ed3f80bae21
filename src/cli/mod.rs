pub mod players;
pub mod stats;

pub use players::{
    CLI_POLICIES, CliPolicy, PolicyInstance, UnknownPolicy, create_policy, parse_lineup,
    print_policy_help,
};
pub use stats::GameStats;
