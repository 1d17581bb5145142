use cosmwasm_schema::cw_serde;
use cosmwasm_std::Binary;

/// The lifecycle status of a ticket.
///
/// `Resolvable` is not stored: it is derived from the issuance height and the
/// current block height while the ticket is still `Pending`.
#[cw_serde]
pub enum TicketStatus {
    Pending,
    Won,
    Lost,
    Expired,
}

impl TicketStatus {
    /// Won, Lost and Expired tickets are retired and never resolved again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TicketStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Won => "won",
            TicketStatus::Lost => "lost",
            TicketStatus::Expired => "expired",
        }
    }
}

/// Query message understood by the entropy oracle contract.
/// The lottery only ever sends this one variant.
#[cw_serde]
pub enum EntropyQueryMsg {
    Beacon { round: u64 },
}

/// A verified drand beacon.
#[cw_serde]
pub struct BeaconResponse {
    pub round: u64,
    /// sha256(signature), 32 bytes
    pub randomness: Binary,
}
