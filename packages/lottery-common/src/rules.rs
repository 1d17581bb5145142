use sha2::{Digest, Sha256};

/// Blocks that must pass after issuance before a ticket can be resolved.
pub const RESOLVE_DELAY_BLOCKS: u64 = 3;

/// A ticket older than this many blocks can no longer be resolved.
pub const EXPIRY_HORIZON_BLOCKS: u64 = 256;

/// One in `WIN_MODULUS` tickets wins on average.
pub const WIN_MODULUS: u64 = 10;

/// `true` once at least `RESOLVE_DELAY_BLOCKS` blocks have passed since issuance.
pub fn is_old_enough(issued_at_height: u64, current_height: u64) -> bool {
    current_height.saturating_sub(issued_at_height) >= RESOLVE_DELAY_BLOCKS
}

/// `true` once more than `EXPIRY_HORIZON_BLOCKS` blocks have passed since issuance.
pub fn is_expired(issued_at_height: u64, current_height: u64) -> bool {
    current_height.saturating_sub(issued_at_height) > EXPIRY_HORIZON_BLOCKS
}

/// Derive a ticket's outcome from the entropy bound to its issuance height.
///
/// `digest = sha256( entropy || ticket_id_u64_be )`; the last 8 bytes are read
/// as a big-endian u64 and the ticket wins when that value is divisible by
/// `WIN_MODULUS`. Mixing in the id keeps tickets bought in the same block
/// independent of each other.
pub fn ticket_wins(entropy: &[u8], ticket_id: u64) -> bool {
    let mut hasher = Sha256::new();
    hasher.update(entropy);
    hasher.update(ticket_id.to_be_bytes());
    let digest: [u8; 32] = hasher.finalize().into();

    let mut low = [0u8; 8];
    low.copy_from_slice(&digest[24..32]);
    u64::from_be_bytes(low) % WIN_MODULUS == 0
}

/// Unix time at which drand `round` is published. Round 1 is emitted at
/// genesis. Returns `None` for round 0, which drand never produces.
pub fn round_publish_time(genesis_time: u64, period_seconds: u64, round: u64) -> Option<u64> {
    let elapsed_rounds = round.checked_sub(1)?;
    elapsed_rounds
        .checked_mul(period_seconds)
        .and_then(|secs| secs.checked_add(genesis_time))
}

/// First drand round published strictly after `now_seconds`.
///
/// A ticket bought at `now_seconds` is settled with this round, so its
/// randomness did not exist when the ticket was issued. `None` when
/// `period_seconds` is zero.
pub fn target_round(genesis_time: u64, period_seconds: u64, now_seconds: u64) -> Option<u64> {
    if now_seconds < genesis_time {
        return Some(1);
    }
    (now_seconds - genesis_time)
        .checked_div(period_seconds)
        .and_then(|elapsed| elapsed.checked_add(2))
}

/// Bind beacon randomness to a block height:
/// `sha256( randomness || height_u64_be )`.
pub fn bind_entropy(randomness: &[u8], height: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(randomness);
    hasher.update(height.to_be_bytes());
    hasher.finalize().into()
}
