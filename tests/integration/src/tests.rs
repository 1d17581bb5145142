//! Integration tests for the rolling lottery.
//!
//! These tests exercise the contract entry points directly using
//! `cosmwasm_std::testing` mocks. The entropy oracle runs for real with a
//! genuine quicknet beacon; the lottery reaches it through
//! `MockQuerier::update_wasm`, which serves the exact bytes the oracle's own
//! `query` entry point returned.
//!
//! Run:
//! ```bash
//! cargo test -p rolling-lottery-integration-tests
//! ```

use std::collections::HashMap;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, to_json_binary, BankMsg, Binary, ContractResult, CosmosMsg, Env,
    MemoryStorage, OwnedDeps, Response, SystemError, SystemResult, Timestamp, Uint128, WasmQuery,
};
use rolling_lottery_common::{
    bind_entropy, ticket_wins, BeaconResponse, EntropyQueryMsg, TicketStatus,
};

// ─── Constants ───

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";
const QUICKNET_GENESIS: u64 = 1692803367;
const QUICKNET_PERIOD: u64 = 3;

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";
const ROUND_1000_TIME: u64 = 1692806364;

/// Block time at which round 1000 is the next round to be published
const BEFORE_ROUND_1000: u64 = ROUND_1000_TIME - 2;
/// Block time at which round 1000 is already public (next is 1002)
const AFTER_ROUND_1000: u64 = ROUND_1000_TIME + 4;

const DENOM: &str = "inj";
const PRICE: u128 = 1_000_000;
const START: u64 = 12_345;

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn env_at(height: u64, time: u64) -> Env {
    let mut env = mock_env();
    env.block.height = height;
    env.block.time = Timestamp::from_seconds(time);
    env
}

fn randomness() -> Vec<u8> {
    hex::decode(TEST_RANDOMNESS_HEX).unwrap()
}

fn paid_to(res: &Response, to: &str) -> u128 {
    res.messages
        .iter()
        .filter_map(|sub| match &sub.msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) if to_address == to => {
                Some(amount.iter().map(|c| c.amount.u128()).sum::<u128>())
            }
            _ => None,
        })
        .sum()
}

// ─── Oracle helpers ───

fn setup_oracle() -> TestDeps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    let msg = rolling_entropy_oracle::msg::InstantiateMsg {
        quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
        chain_hash: "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971".to_string(),
        genesis_time: QUICKNET_GENESIS,
        period_seconds: QUICKNET_PERIOD,
    };
    rolling_entropy_oracle::contract::instantiate(
        deps.as_mut(),
        env_at(START, BEFORE_ROUND_1000),
        message_info(&admin, &[]),
        msg,
    )
    .unwrap();
    deps
}

/// Relay round 1000 from an arbitrary account.
fn relay_round_1000(oracle: &mut TestDeps) -> Response {
    let relayer = oracle.api.addr_make("relayer");
    rolling_entropy_oracle::contract::execute(
        oracle.as_mut(),
        env_at(START, ROUND_1000_TIME + 1),
        message_info(&relayer, &[]),
        rolling_entropy_oracle::msg::ExecuteMsg::SubmitBeacon {
            round: TEST_ROUND,
            signature_hex: TEST_SIG_HEX.to_string(),
        },
    )
    .unwrap()
}

/// Raw oracle answers for `rounds`, as the lottery would receive them.
fn oracle_answers(oracle: &TestDeps, rounds: &[u64]) -> HashMap<u64, Binary> {
    rounds
        .iter()
        .map(|&round| {
            let res = rolling_entropy_oracle::contract::query(
                oracle.as_ref(),
                mock_env(),
                rolling_entropy_oracle::msg::QueryMsg::Beacon { round },
            )
            .unwrap();
            (round, res)
        })
        .collect()
}

// ─── Lottery helpers ───

fn setup_lottery(answers: HashMap<u64, Binary>) -> TestDeps {
    let mut deps = mock_dependencies();
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => match from_json::<EntropyQueryMsg>(msg) {
            Ok(EntropyQueryMsg::Beacon { round }) => {
                let binary = match answers.get(&round) {
                    Some(binary) => binary.clone(),
                    None => to_json_binary(&None::<BeaconResponse>).unwrap(),
                };
                SystemResult::Ok(ContractResult::Ok(binary))
            }
            Err(e) => SystemResult::Err(SystemError::InvalidRequest {
                error: e.to_string(),
                request: msg.clone(),
            }),
        },
        _ => SystemResult::Err(SystemError::InvalidRequest {
            error: "Only smart queries supported".to_string(),
            request: Default::default(),
        }),
    });

    let admin = deps.api.addr_make("admin");
    let msg = rolling_lottery::msg::InstantiateMsg {
        entropy_oracle: deps.api.addr_make("oracle").to_string(),
        ticket_price: Uint128::new(PRICE),
        denom: DENOM.to_string(),
        treasury: deps.api.addr_make("treasury").to_string(),
        drand_genesis_time: QUICKNET_GENESIS,
        drand_period_seconds: QUICKNET_PERIOD,
    };
    rolling_lottery::contract::instantiate(
        deps.as_mut(),
        env_at(START, BEFORE_ROUND_1000),
        message_info(&admin, &[]),
        msg,
    )
    .unwrap();
    deps
}

fn buy(lottery: &mut TestDeps, height: u64, time: u64, owner: &str) -> u64 {
    let buyer = lottery.api.addr_make("buyer");
    let res = rolling_lottery::contract::execute(
        lottery.as_mut(),
        env_at(height, time),
        message_info(&buyer, &coins(PRICE, DENOM)),
        rolling_lottery::msg::ExecuteMsg::BuyTicket {
            owner: owner.to_string(),
        },
    )
    .unwrap();
    let resp: rolling_lottery::msg::BuyTicketResponse = from_json(res.data.unwrap()).unwrap();
    resp.ticket_id
}

fn check(
    lottery: &mut TestDeps,
    height: u64,
    ticket_id: u64,
) -> Result<Response, rolling_lottery::ContractError> {
    let keeper = lottery.api.addr_make("keeper");
    rolling_lottery::contract::execute(
        lottery.as_mut(),
        env_at(height, AFTER_ROUND_1000),
        message_info(&keeper, &[]),
        rolling_lottery::msg::ExecuteMsg::CheckIfWinning { ticket_id },
    )
}

fn withdraw(lottery: &mut TestDeps, height: u64, owner: &str, ticket_id: u64) -> Response {
    let keeper = lottery.api.addr_make("keeper");
    rolling_lottery::contract::execute(
        lottery.as_mut(),
        env_at(height, AFTER_ROUND_1000),
        message_info(&keeper, &[]),
        rolling_lottery::msg::ExecuteMsg::WithdrawPrize {
            owner: owner.to_string(),
            ticket_id,
        },
    )
    .unwrap()
}

fn ticket(lottery: &TestDeps, ticket_id: u64) -> rolling_lottery::state::Ticket {
    let res = rolling_lottery::contract::query(
        lottery.as_ref(),
        mock_env(),
        rolling_lottery::msg::QueryMsg::Ticket { ticket_id },
    )
    .unwrap();
    from_json(res).unwrap()
}

fn lottery_state(lottery: &TestDeps) -> rolling_lottery::state::LotteryState {
    let res = rolling_lottery::contract::query(
        lottery.as_ref(),
        mock_env(),
        rolling_lottery::msg::QueryMsg::State {},
    )
    .unwrap();
    from_json(res).unwrap()
}

fn pending_of(lottery: &TestDeps, address: &str) -> u128 {
    let res = rolling_lottery::contract::query(
        lottery.as_ref(),
        mock_env(),
        rolling_lottery::msg::QueryMsg::PendingBalance {
            address: address.to_string(),
        },
    )
    .unwrap();
    let resp: rolling_lottery::msg::PendingBalanceResponse = from_json(res).unwrap();
    resp.amount.u128()
}

// ─── Tests ───

#[test]
fn test_oracle_serves_relayed_beacon() {
    let mut oracle = setup_oracle();
    relay_round_1000(&mut oracle);

    let answers = oracle_answers(&oracle, &[TEST_ROUND, TEST_ROUND + 1]);
    let resp: Option<BeaconResponse> = from_json(&answers[&TEST_ROUND]).unwrap();
    let resp = resp.expect("beacon stored");
    assert_eq!(resp.round, TEST_ROUND);
    assert_eq!(resp.randomness.to_vec(), randomness());

    let missing: Option<BeaconResponse> = from_json(&answers[&(TEST_ROUND + 1)]).unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_full_round_with_oracle_entropy() {
    let mut oracle = setup_oracle();
    let accounts = MockApi::default();
    let alice = accounts.addr_make("alice").to_string();
    let bob = accounts.addr_make("bob").to_string();

    relay_round_1000(&mut oracle);
    let mut lottery = setup_lottery(oracle_answers(&oracle, &[TEST_ROUND]));

    // 40 tickets over 40 blocks, all bought while round 1000 was still ahead
    let n = 40u64;
    let owner_of = |i: u64| if i % 2 == 0 { alice.clone() } else { bob.clone() };
    for i in 0..n {
        let id = buy(&mut lottery, START + i, BEFORE_ROUND_1000, &owner_of(i));
        assert_eq!(id, i);
        assert_eq!(ticket(&lottery, id).target_round, TEST_ROUND);
    }

    // Replay the pool model off-chain
    let mut pool_units = 1u128;
    let mut owed: HashMap<String, u128> = HashMap::new();
    for i in 0..n {
        let entropy = bind_entropy(&randomness(), START + i);
        if ticket_wins(&entropy, i) {
            *owed.entry(owner_of(i)).or_default() += PRICE * pool_units;
            pool_units = 1;
        } else {
            pool_units += 1;
        }
    }

    let settle_height = START + n + 5;
    let res = withdraw(&mut lottery, settle_height, &alice, n - 1);
    assert_eq!(paid_to(&res, &alice), owed.get(&alice).copied().unwrap_or(0));
    assert_eq!(pending_of(&lottery, &bob), owed.get(&bob).copied().unwrap_or(0));

    for i in 0..n {
        let t = ticket(&lottery, i);
        let expected = if ticket_wins(&bind_entropy(&randomness(), START + i), i) {
            TicketStatus::Won
        } else {
            TicketStatus::Lost
        };
        assert_eq!(t.status, expected, "ticket {}", i);
    }

    let state = lottery_state(&lottery);
    assert_eq!(state.first_valid_ticket, n);
    assert_eq!(state.pool_units as u128, pool_units);

    // Bob collects through a keeper
    let res = withdraw(&mut lottery, settle_height, &bob, n - 1);
    assert_eq!(paid_to(&res, &bob), owed.get(&bob).copied().unwrap_or(0));

    let state = lottery_state(&lottery);
    assert_eq!(state.total_custody.u128(), PRICE * (pool_units - 1));
    assert!(state.total_pending.is_zero());
}

#[test]
fn test_round_public_at_purchase_cannot_settle_ticket() {
    let mut oracle = setup_oracle();
    let accounts = MockApi::default();
    let alice = accounts.addr_make("alice").to_string();

    // Round 1000 is public and relayed before the ticket is bought
    relay_round_1000(&mut oracle);
    let mut lottery = setup_lottery(oracle_answers(&oracle, &[TEST_ROUND]));

    let id = buy(&mut lottery, START, AFTER_ROUND_1000, &alice);
    assert_eq!(ticket(&lottery, id).target_round, TEST_ROUND + 2);

    let err = check(&mut lottery, START + 3, id).unwrap_err();
    assert!(matches!(
        err,
        rolling_lottery::ContractError::EntropyUnavailable { ticket_id: 0, round: 1002 }
    ));

    let res = withdraw(&mut lottery, START + 3, &alice, id);
    assert!(res.messages.is_empty());
    assert_eq!(ticket(&lottery, id).status, TicketStatus::Pending);
}

#[test]
fn test_unrelayed_round_blocks_then_expires() {
    let accounts = MockApi::default();
    let alice = accounts.addr_make("alice").to_string();

    // Nobody relays round 1000
    let mut lottery = setup_lottery(HashMap::new());
    let t0 = buy(&mut lottery, START, BEFORE_ROUND_1000, &alice);
    let t1 = buy(&mut lottery, START + 1, BEFORE_ROUND_1000, &alice);

    let res = withdraw(&mut lottery, START + 5, &alice, t1);
    assert!(res.messages.is_empty());
    assert_eq!(ticket(&lottery, t0).status, TicketStatus::Pending);
    assert_eq!(lottery_state(&lottery).first_valid_ticket, 0);

    let err = check(&mut lottery, START + 5, t0).unwrap_err();
    assert!(matches!(
        err,
        rolling_lottery::ContractError::EntropyUnavailable { ticket_id: 0, round: 1000 }
    ));

    // Past the horizon both are retired and their stake is forfeited
    let res = withdraw(&mut lottery, START + 258, &alice, t1);
    assert!(res.messages.is_empty());
    let expired = res
        .events
        .iter()
        .filter(|e| e.ty == "lottery_ticket_expired")
        .count();
    assert_eq!(expired, 2);

    let state = lottery_state(&lottery);
    assert_eq!(state.first_valid_ticket, 2);
    assert_eq!(state.forfeited_stake.u128(), 2 * PRICE);
    assert_eq!(ticket(&lottery, t1).status, TicketStatus::Expired);

    let err = check(&mut lottery, START + 258, t1).unwrap_err();
    assert!(matches!(
        err,
        rolling_lottery::ContractError::TicketExpired { ticket_id: 1 }
    ));
}

#[test]
fn test_oracle_rejects_signature_for_other_round() {
    let mut oracle = setup_oracle();
    let relayer = oracle.api.addr_make("relayer");

    let err = rolling_entropy_oracle::contract::execute(
        oracle.as_mut(),
        env_at(START, AFTER_ROUND_1000),
        message_info(&relayer, &[]),
        rolling_entropy_oracle::msg::ExecuteMsg::SubmitBeacon {
            round: TEST_ROUND + 2,
            signature_hex: TEST_SIG_HEX.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        rolling_entropy_oracle::ContractError::VerificationFailed { .. }
    ));

    let answers = oracle_answers(&oracle, &[TEST_ROUND + 2]);
    let resp: Option<BeaconResponse> = from_json(&answers[&(TEST_ROUND + 2)]).unwrap();
    assert!(resp.is_none());
}
