use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response};
use rolling_lottery_common::round_publish_time;

use crate::error::ContractError;
use crate::state::{StoredBeacon, BEACONS, CONFIG, LATEST_ROUND};
use crate::verify::verify_quicknet_beacon;

/// Store a verified drand beacon. Permissionless: the BLS check against the
/// configured public key is what makes a beacon trustworthy, so the relayer
/// cannot choose or alter any value.
pub fn submit_beacon(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let published_at = round_publish_time(config.genesis_time, config.period_seconds, round)
        .ok_or(ContractError::InvalidRound { round })?;

    if BEACONS.has(deps.storage, round) {
        return Err(ContractError::BeaconAlreadyExists { round });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;

    let randomness = verify_quicknet_beacon(&config.quicknet_pubkey, round, &signature)
        .map_err(|e| ContractError::VerificationFailed {
            reason: e.to_string(),
        })?;

    let beacon = StoredBeacon {
        round,
        randomness: randomness.to_vec(),
        signature,
        published_at,
        submitted_at: env.block.time,
        submitted_by: info.sender.clone(),
    };
    BEACONS.save(deps.storage, round, &beacon)?;

    let latest = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    if round > latest {
        LATEST_ROUND.save(deps.storage, &round)?;
    }

    Ok(Response::new()
        .add_attribute("action", "submit_beacon")
        .add_attribute("round", round.to_string())
        .add_attribute("submitted_by", info.sender.to_string())
        .add_event(
            Event::new("entropy_beacon_submitted")
                .add_attribute("round", round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("published_at", published_at.to_string())
                .add_attribute("submitted_by", info.sender.to_string())
                .add_attribute("submitted_at_height", env.block.height.to_string()),
        ))
}
