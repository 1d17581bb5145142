pub mod rules;
pub mod types;

pub use rules::{
    bind_entropy, is_expired, is_old_enough, round_publish_time, target_round, ticket_wins,
    EXPIRY_HORIZON_BLOCKS, RESOLVE_DELAY_BLOCKS, WIN_MODULUS,
};
pub use types::{BeaconResponse, EntropyQueryMsg, TicketStatus};
