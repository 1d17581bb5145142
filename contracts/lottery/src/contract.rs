use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{LotteryConfig, LotteryState, CONFIG, LOTTERY_STATE};

const CONTRACT_NAME: &str = "crates.io:rolling-lottery";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.ticket_price.is_zero() {
        return Err(ContractError::InvalidConfig {
            reason: "ticket_price must be > 0".to_string(),
        });
    }
    if msg.denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must not be empty".to_string(),
        });
    }
    if msg.drand_period_seconds == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "drand_period_seconds must be > 0".to_string(),
        });
    }

    let config = LotteryConfig {
        admin: info.sender.clone(),
        entropy_oracle: deps.api.addr_validate(&msg.entropy_oracle)?,
        ticket_price: msg.ticket_price,
        denom: msg.denom,
        treasury: deps.api.addr_validate(&msg.treasury)?,
        drand_genesis_time: msg.drand_genesis_time,
        drand_period_seconds: msg.drand_period_seconds,
    };
    CONFIG.save(deps.storage, &config)?;

    let state = LotteryState {
        next_ticket_id: 0,
        first_valid_ticket: 0,
        pool_units: 1,
        total_custody: Uint128::zero(),
        total_pending: Uint128::zero(),
        forfeited_stake: Uint128::zero(),
        total_wins: 0,
        total_losses: 0,
        total_expired: 0,
        total_paid_out: Uint128::zero(),
    };
    LOTTERY_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "rolling-lottery")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("ticket_price", config.ticket_price.to_string())
        .add_attribute("denom", config.denom))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::BuyTicket { owner } => execute::buy_ticket(deps, env, info, owner),
        ExecuteMsg::CheckIfWinning { ticket_id } => {
            execute::check_if_winning(deps, env, info, ticket_id)
        }
        ExecuteMsg::WithdrawPrize { owner, ticket_id } => {
            execute::withdraw_prize(deps, env, info, owner, ticket_id)
        }
        ExecuteMsg::SweepForfeited {} => execute::sweep_forfeited(deps, env, info),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::State {} => query::query_state(deps),
        QueryMsg::TicketPrice {} => query::query_ticket_price(deps),
        QueryMsg::FirstValidTicket {} => query::query_first_valid_ticket(deps),
        QueryMsg::PendingBalance { address } => query::query_pending_balance(deps, address),
        QueryMsg::IsOldEnough { ticket_id } => query::query_is_old_enough(deps, env, ticket_id),
        QueryMsg::IsExpired { ticket_id } => query::query_is_expired(deps, env, ticket_id),
        QueryMsg::Ticket { ticket_id } => query::query_ticket(deps, ticket_id),
        QueryMsg::TicketsByOwner {
            owner,
            start_after,
            limit,
        } => query::query_tickets_by_owner(deps, owner, start_after, limit),
        QueryMsg::PreviewOutcome { ticket_id } => {
            query::query_preview_outcome(deps, env, ticket_id)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
