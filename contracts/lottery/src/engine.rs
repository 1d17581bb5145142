//! Ticket resolution and pool accounting.
//!
//! Every function here mutates the `LotteryState` it is handed; callers load
//! it once per message and save it once at the end, so a failing message
//! leaves nothing behind.

use cosmwasm_std::{Addr, Event, QuerierWrapper, StdResult, Storage, Uint128};
use rolling_lottery_common::{
    bind_entropy, is_expired, is_old_enough, ticket_wins, BeaconResponse, EntropyQueryMsg,
    TicketStatus,
};

use crate::error::ContractError;
use crate::state::{LotteryConfig, LotteryState, Ticket, PENDING_BALANCES, TICKETS};

/// Upper bound on tickets visited by one frontier advance or withdrawal sweep.
/// Remaining work is picked up by the next call.
pub const MAX_SWEEP_PER_CALL: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Won { prize: Uint128 },
    Lost,
}

#[derive(Debug, Default)]
pub struct Sweep {
    /// Prizes won by the withdrawing owner during the sweep
    pub payable: Uint128,
    pub events: Vec<Event>,
    pub resolved: u64,
    pub expired: u64,
}

/// Entropy for `ticket`: the beacon of its committed round, bound to its
/// issuance height. `None` until the round has been relayed to the oracle.
pub fn fetch_entropy(
    querier: &QuerierWrapper,
    oracle: &Addr,
    ticket: &Ticket,
) -> Result<Option<[u8; 32]>, ContractError> {
    let round = ticket.target_round;
    let response: Option<BeaconResponse> =
        querier.query_wasm_smart(oracle.to_string(), &EntropyQueryMsg::Beacon { round })?;

    match response {
        None => Ok(None),
        Some(beacon) if beacon.round != round => Err(ContractError::EntropyRoundMismatch {
            ticket_id: ticket.id,
            expected: round,
            got: beacon.round,
        }),
        Some(beacon) => Ok(Some(bind_entropy(
            beacon.randomness.as_slice(),
            ticket.issued_at_height,
        ))),
    }
}

/// Resolve a pending ticket against its entropy and record the result.
///
/// A win empties the pool into the prize; a loss adds one unit to it. Where
/// the prize goes is up to the caller.
pub fn settle(
    storage: &mut dyn Storage,
    config: &LotteryConfig,
    state: &mut LotteryState,
    ticket: &mut Ticket,
    entropy: &[u8],
    height: u64,
) -> Result<(Outcome, Event), ContractError> {
    let outcome = if ticket_wins(entropy, ticket.id) {
        let prize = take_pool(config, state)?;
        ticket.status = TicketStatus::Won;
        ticket.prize = Some(prize);
        Outcome::Won { prize }
    } else {
        accrue_loss(state);
        ticket.status = TicketStatus::Lost;
        Outcome::Lost
    };
    ticket.resolved_at_height = Some(height);
    TICKETS.save(storage, ticket.id, ticket)?;

    let prize = match &outcome {
        Outcome::Won { prize } => *prize,
        Outcome::Lost => Uint128::zero(),
    };
    let event = Event::new("lottery_ticket_resolved")
        .add_attribute("ticket_id", ticket.id.to_string())
        .add_attribute("owner", ticket.owner.to_string())
        .add_attribute("status", ticket.status.as_str())
        .add_attribute("won", matches!(outcome, Outcome::Won { .. }).to_string())
        .add_attribute("prize", prize.to_string())
        .add_attribute("pool_units", state.pool_units.to_string())
        .add_attribute("round", ticket.target_round.to_string())
        .add_attribute("entropy", hex::encode(entropy));

    Ok((outcome, event))
}

/// Convert the pool into a prize: `ticket_price * pool_units`, then reset the
/// pool to the base unit.
pub fn take_pool(config: &LotteryConfig, state: &mut LotteryState) -> Result<Uint128, ContractError> {
    let prize = config
        .ticket_price
        .checked_mul(Uint128::from(state.pool_units))?;
    state.pool_units = 1;
    state.total_wins += 1;
    Ok(prize)
}

pub fn accrue_loss(state: &mut LotteryState) {
    state.pool_units += 1;
    state.total_losses += 1;
}

/// Owe `amount` to `owner`, payable on their next withdrawal.
pub fn credit_pending(
    storage: &mut dyn Storage,
    state: &mut LotteryState,
    owner: &Addr,
    amount: Uint128,
) -> Result<(), ContractError> {
    PENDING_BALANCES.update(storage, owner, |balance| -> StdResult<_> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })?;
    state.total_pending = state.total_pending.checked_add(amount)?;
    Ok(())
}

/// Remove and return everything owed to `owner`.
pub fn take_pending(
    storage: &mut dyn Storage,
    state: &mut LotteryState,
    owner: &Addr,
) -> Result<Uint128, ContractError> {
    let balance = PENDING_BALANCES
        .may_load(storage, owner)?
        .unwrap_or_default();
    if !balance.is_zero() {
        PENDING_BALANCES.remove(storage, owner);
        state.total_pending = state.total_pending.checked_sub(balance)?;
    }
    Ok(balance)
}

/// Retire a ticket that aged past the horizon without being resolved.
/// Its stake is forfeited: it never reaches the pool and is not refunded.
pub fn reconcile_expired(
    storage: &mut dyn Storage,
    config: &LotteryConfig,
    state: &mut LotteryState,
    ticket: &mut Ticket,
    height: u64,
) -> Result<Event, ContractError> {
    ticket.status = TicketStatus::Expired;
    ticket.resolved_at_height = Some(height);
    TICKETS.save(storage, ticket.id, ticket)?;

    state.forfeited_stake = state.forfeited_stake.checked_add(config.ticket_price)?;
    state.total_expired += 1;

    Ok(Event::new("lottery_ticket_expired")
        .add_attribute("ticket_id", ticket.id.to_string())
        .add_attribute("owner", ticket.owner.to_string())
        .add_attribute("status", ticket.status.as_str())
        .add_attribute("issued_at_height", ticket.issued_at_height.to_string()))
}

/// Move the frontier past terminal tickets, expiring stale ones on the way.
/// Stops at the first ticket that may still be resolved.
pub fn advance_frontier(
    storage: &mut dyn Storage,
    config: &LotteryConfig,
    state: &mut LotteryState,
    height: u64,
) -> Result<Vec<Event>, ContractError> {
    let mut events = vec![];
    let mut steps = 0;

    while state.first_valid_ticket < state.next_ticket_id && steps < MAX_SWEEP_PER_CALL {
        let mut ticket = TICKETS.load(storage, state.first_valid_ticket)?;
        if !ticket.status.is_terminal() {
            if !is_expired(ticket.issued_at_height, height) {
                break;
            }
            events.push(reconcile_expired(storage, config, state, &mut ticket, height)?);
        }
        state.first_valid_ticket += 1;
        steps += 1;
    }

    Ok(events)
}

/// Resolve tickets in id order from the frontier up to `last_id`.
///
/// Wins of `owner` become immediately payable; wins of anyone else go to
/// their pending balance. Stops without error at the first ticket that is
/// not old enough or whose entropy has not been published yet.
pub fn sweep_through(
    storage: &mut dyn Storage,
    querier: &QuerierWrapper,
    config: &LotteryConfig,
    state: &mut LotteryState,
    owner: &Addr,
    last_id: u64,
    height: u64,
) -> Result<Sweep, ContractError> {
    let mut sweep = Sweep::default();
    let mut steps = 0;

    while state.first_valid_ticket <= last_id
        && state.first_valid_ticket < state.next_ticket_id
        && steps < MAX_SWEEP_PER_CALL
    {
        let mut ticket = TICKETS.load(storage, state.first_valid_ticket)?;

        if !ticket.status.is_terminal() {
            if is_expired(ticket.issued_at_height, height) {
                sweep
                    .events
                    .push(reconcile_expired(storage, config, state, &mut ticket, height)?);
                sweep.expired += 1;
            } else if !is_old_enough(ticket.issued_at_height, height) {
                break;
            } else {
                let Some(entropy) = fetch_entropy(querier, &config.entropy_oracle, &ticket)?
                else {
                    break;
                };
                let (outcome, event) = settle(storage, config, state, &mut ticket, &entropy, height)?;
                sweep.events.push(event);
                sweep.resolved += 1;

                if let Outcome::Won { prize } = outcome {
                    if ticket.owner == *owner {
                        sweep.payable = sweep.payable.checked_add(prize)?;
                    } else {
                        credit_pending(storage, state, &ticket.owner, prize)?;
                    }
                }
            }
        }

        state.first_valid_ticket += 1;
        steps += 1;
    }

    Ok(sweep)
}
