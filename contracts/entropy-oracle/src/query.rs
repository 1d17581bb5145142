use cosmwasm_std::{to_json_binary, Binary, Deps, StdResult};
use rolling_lottery_common::BeaconResponse;

use crate::state::{BEACONS, CONFIG, LATEST_ROUND};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_beacon(deps: Deps, round: u64) -> StdResult<Binary> {
    let response = BEACONS
        .may_load(deps.storage, round)?
        .map(|stored| BeaconResponse {
            round: stored.round,
            randomness: stored.randomness.into(),
        });
    to_json_binary(&response)
}

pub fn query_latest_round(deps: Deps) -> StdResult<Binary> {
    let round = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    to_json_binary(&round)
}
