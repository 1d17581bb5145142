use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Uint128};
use rolling_lottery_common::TicketStatus;

use crate::state::{LotteryConfig, LotteryState, Ticket};

#[cw_serde]
pub struct InstantiateMsg {
    pub entropy_oracle: String,
    /// Price of one ticket in `denom`; cannot be changed later
    pub ticket_price: Uint128,
    pub denom: String,
    pub treasury: String,
    /// Must match the drand network the oracle verifies against
    pub drand_genesis_time: u64,
    pub drand_period_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Buy one ticket for `owner`. Attach exactly the ticket price.
    BuyTicket { owner: String },
    /// Resolve a ticket. Anyone can call; a win is credited to the ticket owner.
    CheckIfWinning { ticket_id: u64 },
    /// Sweep tickets up to `ticket_id` and pay `owner` everything owed.
    /// Anyone can call; funds always go to `owner`.
    WithdrawPrize { owner: String, ticket_id: u64 },
    /// Send forfeited stake of expired tickets to the treasury. Admin only.
    SweepForfeited {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LotteryConfig)]
    Config {},
    #[returns(LotteryState)]
    State {},
    #[returns(TicketPriceResponse)]
    TicketPrice {},
    #[returns(u64)]
    FirstValidTicket {},
    #[returns(PendingBalanceResponse)]
    PendingBalance { address: String },
    #[returns(bool)]
    IsOldEnough { ticket_id: u64 },
    #[returns(bool)]
    IsExpired { ticket_id: u64 },
    #[returns(Ticket)]
    Ticket { ticket_id: u64 },
    #[returns(TicketsResponse)]
    TicketsByOwner {
        owner: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Read-only view of what `CheckIfWinning` would report.
    #[returns(OutcomePreviewResponse)]
    PreviewOutcome { ticket_id: u64 },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct BuyTicketResponse {
    pub ticket_id: u64,
}

#[cw_serde]
pub struct CheckIfWinningResponse {
    pub ticket_id: u64,
    pub won: bool,
}

#[cw_serde]
pub struct WithdrawPrizeResponse {
    pub owner: Addr,
    pub amount: Uint128,
    pub first_valid_ticket: u64,
}

#[cw_serde]
pub struct TicketPriceResponse {
    pub price: Coin,
}

#[cw_serde]
pub struct PendingBalanceResponse {
    pub address: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct TicketsResponse {
    pub tickets: Vec<Ticket>,
}

#[cw_serde]
pub struct OutcomePreviewResponse {
    pub ticket_id: u64,
    pub status: TicketStatus,
    pub is_old_enough: bool,
    pub is_expired: bool,
    /// Known once the ticket is resolved, or resolvable with entropy available
    pub would_win: Option<bool>,
}
