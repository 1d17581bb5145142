use cosmwasm_schema::{cw_serde, QueryResponses};
use rolling_lottery_common::BeaconResponse;

use crate::state::OracleConfig;

#[cw_serde]
pub struct InstantiateMsg {
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Store a drand beacon. Anyone can relay one; only BLS-valid
    /// signatures are accepted.
    SubmitBeacon {
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(OracleConfig)]
    Config {},

    /// `None` until someone relays the round.
    #[returns(Option<BeaconResponse>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},
}

#[cw_serde]
pub struct MigrateMsg {}
