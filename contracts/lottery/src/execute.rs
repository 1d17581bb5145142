use cosmwasm_std::{
    coins, to_json_binary, BankMsg, Coin, DepsMut, Env, Event, MessageInfo, Response, Uint128,
};
use rolling_lottery_common::{
    is_expired, is_old_enough, target_round, TicketStatus, RESOLVE_DELAY_BLOCKS,
};

use crate::engine::{self, Outcome};
use crate::error::ContractError;
use crate::msg::{BuyTicketResponse, CheckIfWinningResponse, WithdrawPrizeResponse};
use crate::state::{Ticket, CONFIG, LOTTERY_STATE, OWNER_TICKETS, TICKETS};

fn describe_funds(funds: &[Coin]) -> String {
    if funds.is_empty() {
        return "nothing".to_string();
    }
    funds
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Buy one ticket for `owner`. Exactly the ticket price must be attached,
/// in the configured denom and nothing else.
pub fn buy_ticket(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let exact = match info.funds.as_slice() {
        [coin] => coin.denom == config.denom && coin.amount == config.ticket_price,
        _ => false,
    };
    if !exact {
        return Err(ContractError::InvalidPayment {
            expected: Coin::new(config.ticket_price, config.denom.clone()).to_string(),
            received: describe_funds(&info.funds),
        });
    }

    let owner = deps.api.addr_validate(&owner)?;
    let round = target_round(
        config.drand_genesis_time,
        config.drand_period_seconds,
        env.block.time.seconds(),
    )
    .ok_or(ContractError::InvalidConfig {
        reason: "drand_period_seconds must be > 0".to_string(),
    })?;

    let mut state = LOTTERY_STATE.load(deps.storage)?;
    let ticket_id = state.next_ticket_id;
    state.next_ticket_id += 1;
    state.total_custody = state.total_custody.checked_add(config.ticket_price)?;

    let ticket = Ticket {
        id: ticket_id,
        owner: owner.clone(),
        issued_at_height: env.block.height,
        target_round: round,
        status: TicketStatus::Pending,
        prize: None,
        resolved_at_height: None,
    };
    TICKETS.save(deps.storage, ticket_id, &ticket)?;
    OWNER_TICKETS.save(deps.storage, (&owner, ticket_id), &())?;
    LOTTERY_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .set_data(to_json_binary(&BuyTicketResponse { ticket_id })?)
        .add_attribute("action", "buy_ticket")
        .add_attribute("ticket_id", ticket_id.to_string())
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("owner", owner.to_string())
        .add_event(
            Event::new("lottery_ticket_bought")
                .add_attribute("owner", owner.to_string())
                .add_attribute("ticket_id", ticket_id.to_string())
                .add_attribute("height", env.block.height.to_string())
                .add_attribute("target_round", round.to_string()),
        ))
}

/// Resolve a single ticket. Anyone can call (keeper pattern).
///
/// A win is credited to the ticket owner's pending balance, never to the
/// caller. Calling again on a resolved ticket returns the recorded outcome
/// without touching state, until the ticket ages past the horizon.
pub fn check_if_winning(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    ticket_id: u64,
) -> Result<Response, ContractError> {
    let mut ticket = TICKETS
        .may_load(deps.storage, ticket_id)?
        .ok_or(ContractError::TicketNotFound { ticket_id })?;

    let height = env.block.height;
    if ticket.status == TicketStatus::Expired || is_expired(ticket.issued_at_height, height) {
        return Err(ContractError::TicketExpired { ticket_id });
    }

    // Won or Lost: report what was recorded
    if ticket.status.is_terminal() {
        let won = ticket.status == TicketStatus::Won;
        return Ok(Response::new()
            .set_data(to_json_binary(&CheckIfWinningResponse { ticket_id, won })?)
            .add_attribute("action", "check_if_winning")
            .add_attribute("ticket_id", ticket_id.to_string())
            .add_attribute("won", won.to_string())
            .add_attribute("already_resolved", "true"));
    }

    if !is_old_enough(ticket.issued_at_height, height) {
        return Err(ContractError::NotReadyYet {
            ticket_id,
            ready_at: ticket.issued_at_height + RESOLVE_DELAY_BLOCKS,
        });
    }

    let config = CONFIG.load(deps.storage)?;
    let entropy = engine::fetch_entropy(&deps.querier, &config.entropy_oracle, &ticket)?.ok_or(
        ContractError::EntropyUnavailable {
            ticket_id,
            round: ticket.target_round,
        },
    )?;

    let mut state = LOTTERY_STATE.load(deps.storage)?;
    let (outcome, resolved_event) = engine::settle(
        deps.storage,
        &config,
        &mut state,
        &mut ticket,
        &entropy,
        height,
    )?;
    if let Outcome::Won { prize } = outcome {
        engine::credit_pending(deps.storage, &mut state, &ticket.owner, prize)?;
    }

    let expired_events = engine::advance_frontier(deps.storage, &config, &mut state, height)?;
    LOTTERY_STATE.save(deps.storage, &state)?;

    let won = matches!(outcome, Outcome::Won { .. });
    Ok(Response::new()
        .set_data(to_json_binary(&CheckIfWinningResponse { ticket_id, won })?)
        .add_attribute("action", "check_if_winning")
        .add_attribute("ticket_id", ticket_id.to_string())
        .add_attribute("resolver", info.sender.to_string())
        .add_attribute("won", won.to_string())
        .add_attribute("first_valid_ticket", state.first_valid_ticket.to_string())
        .add_event(resolved_event)
        .add_events(expired_events))
}

/// Sweep every ticket from the frontier through `ticket_id`, then pay `owner`
/// what the sweep won for them plus their pending balance.
///
/// Paying twice is impossible: pending balances are zeroed and swept tickets
/// are terminal, so a repeated call finds nothing and sends nothing.
pub fn withdraw_prize(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    ticket_id: u64,
) -> Result<Response, ContractError> {
    let owner = deps.api.addr_validate(&owner)?;
    let config = CONFIG.load(deps.storage)?;
    let mut state = LOTTERY_STATE.load(deps.storage)?;

    if ticket_id >= state.next_ticket_id {
        return Err(ContractError::TicketNotFound { ticket_id });
    }

    let height = env.block.height;
    let sweep = engine::sweep_through(
        deps.storage,
        &deps.querier,
        &config,
        &mut state,
        &owner,
        ticket_id,
        height,
    )?;
    let expired_events = engine::advance_frontier(deps.storage, &config, &mut state, height)?;

    let pending = engine::take_pending(deps.storage, &mut state, &owner)?;
    let amount = sweep.payable.checked_add(pending)?;

    state.total_custody = state.total_custody.checked_sub(amount).map_err(|_| {
        ContractError::InsufficientCustody {
            needed: amount.to_string(),
            available: state.total_custody.to_string(),
        }
    })?;
    state.total_paid_out = state.total_paid_out.checked_add(amount)?;
    LOTTERY_STATE.save(deps.storage, &state)?;

    let mut response = Response::new()
        .set_data(to_json_binary(&WithdrawPrizeResponse {
            owner: owner.clone(),
            amount,
            first_valid_ticket: state.first_valid_ticket,
        })?)
        .add_attribute("action", "withdraw_prize")
        .add_attribute("owner", owner.to_string())
        .add_attribute("caller", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("resolved", sweep.resolved.to_string())
        .add_attribute("expired", sweep.expired.to_string())
        .add_events(sweep.events)
        .add_events(expired_events);

    if !amount.is_zero() {
        response = response
            .add_message(BankMsg::Send {
                to_address: owner.to_string(),
                amount: coins(amount.u128(), &config.denom),
            })
            .add_event(
                Event::new("lottery_prize_withdrawn")
                    .add_attribute("owner", owner.to_string())
                    .add_attribute("amount", amount.to_string())
                    .add_attribute("from_pending", pending.to_string())
                    .add_attribute("swept_to", state.first_valid_ticket.to_string()),
            );
    }

    Ok(response)
}

/// Send the forfeited stake of expired tickets to the treasury. Admin only.
pub fn sweep_forfeited(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can sweep forfeited stake".to_string(),
        });
    }

    let mut state = LOTTERY_STATE.load(deps.storage)?;
    let amount = state.forfeited_stake;
    if amount.is_zero() {
        return Err(ContractError::NothingToSweep);
    }

    state.total_custody = state.total_custody.checked_sub(amount)?;
    state.forfeited_stake = Uint128::zero();
    LOTTERY_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: config.treasury.to_string(),
            amount: coins(amount.u128(), &config.denom),
        })
        .add_attribute("action", "sweep_forfeited")
        .add_attribute("amount", amount.to_string())
        .add_attribute("treasury", config.treasury.to_string()))
}
