pub mod base;
pub mod greedy;
pub mod random;

pub use base::Policy;
pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;
