use cosmwasm_std::{to_json_binary, Binary, Coin, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use rolling_lottery_common::{is_expired, is_old_enough, ticket_wins, TicketStatus};

use crate::engine::fetch_entropy;
use crate::msg::{OutcomePreviewResponse, PendingBalanceResponse, TicketPriceResponse, TicketsResponse};
use crate::state::{CONFIG, LOTTERY_STATE, OWNER_TICKETS, PENDING_BALANCES, TICKETS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_state(deps: Deps) -> StdResult<Binary> {
    let state = LOTTERY_STATE.load(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_ticket_price(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&TicketPriceResponse {
        price: Coin::new(config.ticket_price, config.denom),
    })
}

pub fn query_first_valid_ticket(deps: Deps) -> StdResult<Binary> {
    let state = LOTTERY_STATE.load(deps.storage)?;
    to_json_binary(&state.first_valid_ticket)
}

pub fn query_pending_balance(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let amount = PENDING_BALANCES
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    to_json_binary(&PendingBalanceResponse { address, amount })
}

pub fn query_is_old_enough(deps: Deps, env: Env, ticket_id: u64) -> StdResult<Binary> {
    let ticket = TICKETS.load(deps.storage, ticket_id)?;
    to_json_binary(&is_old_enough(ticket.issued_at_height, env.block.height))
}

pub fn query_is_expired(deps: Deps, env: Env, ticket_id: u64) -> StdResult<Binary> {
    let ticket = TICKETS.load(deps.storage, ticket_id)?;
    to_json_binary(&is_expired(ticket.issued_at_height, env.block.height))
}

pub fn query_ticket(deps: Deps, ticket_id: u64) -> StdResult<Binary> {
    let ticket = TICKETS.load(deps.storage, ticket_id)?;
    to_json_binary(&ticket)
}

pub fn query_tickets_by_owner(
    deps: Deps,
    owner: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let owner = deps.api.addr_validate(&owner)?;
    let limit = limit.unwrap_or(30).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let tickets: Vec<_> = OWNER_TICKETS
        .prefix(&owner)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .filter_map(|(ticket_id, _)| TICKETS.load(deps.storage, ticket_id).ok())
        .collect();

    to_json_binary(&TicketsResponse { tickets })
}

/// What a client would see from `CheckIfWinning`, without resolving anything.
pub fn query_preview_outcome(deps: Deps, env: Env, ticket_id: u64) -> StdResult<Binary> {
    let ticket = TICKETS.load(deps.storage, ticket_id)?;
    let height = env.block.height;
    let old_enough = is_old_enough(ticket.issued_at_height, height);
    let expired = is_expired(ticket.issued_at_height, height);

    let would_win = match ticket.status {
        TicketStatus::Won => Some(true),
        TicketStatus::Lost => Some(false),
        TicketStatus::Expired => None,
        TicketStatus::Pending if old_enough && !expired => {
            let config = CONFIG.load(deps.storage)?;
            fetch_entropy(&deps.querier, &config.entropy_oracle, &ticket)
                .map_err(|e| StdError::generic_err(e.to_string()))?
                .map(|entropy| ticket_wins(&entropy, ticket.id))
        }
        TicketStatus::Pending => None,
    };

    to_json_binary(&OutcomePreviewResponse {
        ticket_id,
        status: ticket.status,
        is_old_enough: old_enough,
        is_expired: expired,
        would_win,
    })
}
