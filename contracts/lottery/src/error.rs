use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid amount paid for ticket: expected {expected}, received {received}")]
    InvalidPayment { expected: String, received: String },

    #[error("ticket {ticket_id} not found")]
    TicketNotFound { ticket_id: u64 },

    #[error("ticket {ticket_id} not ready yet, check again at height {ready_at}")]
    NotReadyYet { ticket_id: u64, ready_at: u64 },

    #[error("ticket {ticket_id} expired")]
    TicketExpired { ticket_id: u64 },

    #[error("ticket {ticket_id}: drand round {round} not available yet")]
    EntropyUnavailable { ticket_id: u64, round: u64 },

    #[error("ticket {ticket_id}: oracle answered round {got}, expected {expected}")]
    EntropyRoundMismatch {
        ticket_id: u64,
        expected: u64,
        got: u64,
    },

    #[error("insufficient custody: need {needed}, have {available}")]
    InsufficientCustody { needed: String, available: String },

    #[error("no forfeited stake to sweep")]
    NothingToSweep,

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}
