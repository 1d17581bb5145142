use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};
use rolling_lottery_common::TicketStatus;

pub const CONFIG: Item<LotteryConfig> = Item::new("config");
pub const LOTTERY_STATE: Item<LotteryState> = Item::new("lottery_state");
pub const TICKETS: Map<u64, Ticket> = Map::new("tickets");

/// Owner index: (owner, ticket_id) -> (). One write per purchase.
pub const OWNER_TICKETS: Map<(&Addr, u64), ()> = Map::new("owner_tickets");

/// Prizes owed to owners whose winning ticket was resolved by someone else.
pub const PENDING_BALANCES: Map<&Addr, Uint128> = Map::new("pending");

#[cw_serde]
pub struct LotteryConfig {
    pub admin: Addr,
    pub entropy_oracle: Addr,
    /// Fixed for the lifetime of the contract
    pub ticket_price: Uint128,
    pub denom: String,
    /// Receives forfeited stake of expired tickets
    pub treasury: Addr,
    /// Genesis time of the drand network the oracle relays (unix seconds)
    pub drand_genesis_time: u64,
    pub drand_period_seconds: u64,
}

#[cw_serde]
pub struct LotteryState {
    pub next_ticket_id: u64,
    /// Garbage-collection frontier: every ticket below it is terminal.
    pub first_valid_ticket: u64,
    /// Prize units in the pool. Starts at 1 (the winner's own stake) and
    /// grows by one per losing ticket.
    pub pool_units: u64,
    /// Funds held on behalf of the ledger
    pub total_custody: Uint128,
    /// Sum of all PENDING_BALANCES
    pub total_pending: Uint128,
    /// Stake of tickets that expired without being resolved
    pub forfeited_stake: Uint128,
    pub total_wins: u64,
    pub total_losses: u64,
    pub total_expired: u64,
    pub total_paid_out: Uint128,
}

#[cw_serde]
pub struct Ticket {
    pub id: u64,
    pub owner: Addr,
    pub issued_at_height: u64,
    /// drand round committed at purchase: the first one published after the
    /// purchase block. Only this round can settle the ticket.
    pub target_round: u64,
    pub status: TicketStatus,
    pub prize: Option<Uint128>,
    pub resolved_at_height: Option<u64>,
}
