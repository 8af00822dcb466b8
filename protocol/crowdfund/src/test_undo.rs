//! Apply/undo symmetry for every transaction kind.
//!
//! Each test snapshots the committed accounts, applies one transaction,
//! undoes it, and compares the result to the snapshot. Claims run against
//! the staging store directly, which also pins the collect-errors-but-
//! mutate-anyway handler contract.

use crate::address::Address;
use crate::amount::Amount;
use crate::invariants::assert_pristine;
use crate::params::ProtocolParams;
use crate::processor::TransactionProcessor;
use crate::store::{MemoryAccounts, StateStore};
use crate::testutil::*;
use crate::transactions::CrowdfundTransaction;
use crate::types::{
    Account, FundraiserData, FundraiserStatus, Investment, PaymentKind, VoteChoice,
};

fn snapshot(processor: &TransactionProcessor<MemoryAccounts>, address: &Address) -> Account {
    processor.backend().get(address).unwrap().clone()
}

#[test]
fn register_undo_restores_the_pristine_account() {
    let mut processor = processor_with(vec![account_with_balance("carol", 5_000)]);
    let register = register_tx("reg-1", "carol", 1_000, 4, 2);
    let address = register.fundraiser_address();
    let tx = CrowdfundTransaction::Register(register);

    processor.apply(T_REGISTER, &tx).unwrap();
    processor.undo(T_REGISTER, &tx).unwrap();

    assert_pristine(processor.backend().get(&address).unwrap());
    assert_eq!(
        snapshot(&processor, &addr_of("carol")).balance,
        Amount::from(5_000u64)
    );
}

#[test]
fn fund_undo_is_an_exact_inverse() {
    let mut processor = processor_with(vec![account_with_balance("carol", 5_000)]);
    let register = register_tx("reg-1", "carol", 1_000, 4, 2);
    let address = register.fundraiser_address();
    processor
        .apply(T_REGISTER, &CrowdfundTransaction::Register(register))
        .unwrap();

    let fundraiser_before = snapshot(&processor, &address);
    let carol_before = snapshot(&processor, &addr_of("carol"));

    let tx = CrowdfundTransaction::Fund(fund_tx("fund-1", "carol", &address, 1_000));
    processor.apply(T_REGISTER + 10, &tx).unwrap();
    processor.undo(T_REGISTER + 10, &tx).unwrap();

    assert_eq!(snapshot(&processor, &address), fundraiser_before);
    assert_eq!(snapshot(&processor, &addr_of("carol")), carol_before);
}

#[test]
fn fund_undo_removes_only_the_most_recent_matching_investment() {
    let mut processor = processor_with(vec![
        account_with_balance("carol", 5_000),
        account_with_balance("alice", 5_000),
    ]);
    let register = register_tx("reg-1", "carol", 1_000, 4, 2);
    let address = register.fundraiser_address();
    processor
        .apply(T_REGISTER, &CrowdfundTransaction::Register(register))
        .unwrap();
    processor
        .apply(
            T_REGISTER + 10,
            &CrowdfundTransaction::Fund(fund_tx("fund-1", "alice", &address, 300)),
        )
        .unwrap();
    let second = CrowdfundTransaction::Fund(fund_tx("fund-2", "alice", &address, 300));
    processor.apply(T_REGISTER + 15, &second).unwrap();

    processor.undo(T_REGISTER + 15, &second).unwrap();

    let data = snapshot(&processor, &address).fundraiser.unwrap();
    assert_eq!(data.investments.len(), 1);
    // Same sender and amount, so removal must pick the later timestamp.
    assert_eq!(data.investments[0].timestamp, T_REGISTER + 10);
}

#[test]
fn start_undo_returns_the_campaign_to_funded() {
    let mut processor = processor_with(vec![account_with_balance("carol", 5_000)]);
    let register = register_tx("reg-1", "carol", 1_000, 4, 2);
    let key = register.fundraiser_public_key();
    let address = register.fundraiser_address();
    processor
        .apply(T_REGISTER, &CrowdfundTransaction::Register(register))
        .unwrap();
    processor
        .apply(
            T_REGISTER + 10,
            &CrowdfundTransaction::Fund(fund_tx("fund-1", "carol", &address, 1_000)),
        )
        .unwrap();

    let before = snapshot(&processor, &address);
    assert_eq!(
        before.fundraiser.as_ref().unwrap().status,
        FundraiserStatus::Funded
    );

    let tx = CrowdfundTransaction::Start(start_tx("start-1", "carol", &key, T_START));
    processor.apply(T_REGISTER + 20, &tx).unwrap();
    processor.undo(T_REGISTER + 20, &tx).unwrap();

    assert_eq!(snapshot(&processor, &address), before);
}

#[test]
fn vote_undo_removes_the_vote_and_reruns_the_threshold() {
    let mut campaign = active_campaign_sole_investor();
    let address = campaign.fundraiser_address.clone();
    let before = snapshot(&campaign.processor, &address);

    let tx = CrowdfundTransaction::Vote(vote_tx(
        "vote-1",
        "carol",
        &address,
        2,
        VoteChoice::Refund,
    ));
    campaign.processor.apply(period_two_end(), &tx).unwrap();
    assert_eq!(
        snapshot(&campaign.processor, &address)
            .fundraiser
            .unwrap()
            .status,
        FundraiserStatus::Refund
    );

    campaign.processor.undo(period_two_end(), &tx).unwrap();
    assert_eq!(snapshot(&campaign.processor, &address), before);
}

#[test]
fn refund_undo_restores_balances_but_not_the_status() {
    let mut processor = processor_with(vec![
        account_with_balance("carol", 5_000),
        account_with_balance("alice", 5_000),
    ]);
    let register = register_tx("reg-1", "carol", 1_000, 4, 2);
    let key = register.fundraiser_public_key();
    let address = register.fundraiser_address();
    processor
        .apply(T_REGISTER, &CrowdfundTransaction::Register(register))
        .unwrap();
    processor
        .apply(
            T_REGISTER + 10,
            &CrowdfundTransaction::Fund(fund_tx("fund-1", "alice", &address, 400)),
        )
        .unwrap();

    let before = snapshot(&processor, &address);
    let tx = CrowdfundTransaction::Refund(refund_tx("refund-1", "alice", &key, 400));
    processor.apply(T_REGISTER + 100, &tx).unwrap();
    processor.undo(T_REGISTER + 100, &tx).unwrap();

    let after = snapshot(&processor, &address);
    assert_eq!(after.balance, before.balance);
    let data = after.fundraiser.as_ref().unwrap();
    assert!(data.payments.is_empty());
    assert_eq!(
        snapshot(&processor, &addr_of("alice")).balance,
        Amount::from(4_600u64)
    );
    // The inverse does not roll the status back to FUNDING; a reorg over a
    // refund leaves the record in REFUND.
    assert_eq!(data.status, FundraiserStatus::Refund);
}

#[test]
fn comment_leaves_accounts_unchanged_in_both_directions() {
    let mut campaign = active_campaign_sole_investor();
    let address = campaign.fundraiser_address.clone();
    let before = snapshot(&campaign.processor, &address);
    let carol_before = snapshot(&campaign.processor, &addr_of("carol"));

    let tx = CrowdfundTransaction::Comment(comment_tx(
        "comment-1",
        "carol",
        &address,
        0,
        "pumps arrived on site",
    ));
    campaign.processor.apply(T_START + 50, &tx).unwrap();
    assert_eq!(snapshot(&campaign.processor, &address), before);

    campaign.processor.undo(T_START + 50, &tx).unwrap();
    assert_eq!(snapshot(&campaign.processor, &address), before);
    assert_eq!(snapshot(&campaign.processor, &addr_of("carol")), carol_before);
}

/// An ACTIVE campaign seeded straight into a backend, for store-level
/// claim tests.
fn active_backend() -> (MemoryAccounts, Address) {
    let mut fundraiser = Account::new(addr_of("campaign"));
    fundraiser.public_key = Some(pk("campaign"));
    fundraiser.balance = Amount::from(1_000u64);
    fundraiser.fundraiser = Some(FundraiserData {
        owner: pk("carol"),
        status: FundraiserStatus::Active,
        goal: Amount::from(1_000u64),
        periods: 4,
        vote_time: 2,
        start_funding: T_REGISTER,
        start_project: T_START,
        investments: vec![Investment {
            address: addr_of("carol"),
            amount: Amount::from(1_000u64),
            timestamp: T_REGISTER + 10,
            message: String::new(),
        }],
        payments: Vec::new(),
        votes: Vec::new(),
        title: "Solar water pumps".to_string(),
        description: String::new(),
        site: String::new(),
        image: String::new(),
        category: "infrastructure".to_string(),
    });

    let mut backend = MemoryAccounts::new();
    let address = fundraiser.address.clone();
    backend.insert(fundraiser);
    backend.insert(account_with_balance("carol", 4_000));
    (backend, address)
}

#[test]
fn claim_mutates_the_staging_layer_even_while_collecting_errors() {
    let (mut backend, address) = active_backend();
    let params = ProtocolParams::default();
    let tx = claim_tx("claim-1", "carol", &address, 1, 250);

    let mut store = StateStore::new(&mut backend, T_START + 100);
    store.cache(&tx.working_set());
    let errors = tx.apply(&mut store, &params);
    assert!(errors
        .iter()
        .any(|e| e.message == "You are not allowed to claim anything at this moment"));
    store.commit();

    // The handler keeps mutating after the timing error; only the
    // processor's discard protects the backend.
    let fundraiser = backend.get(&address).unwrap();
    assert_eq!(fundraiser.balance, Amount::from(750u64));
    let data = fundraiser.fundraiser.as_ref().unwrap();
    assert_eq!(data.payments.len(), 1);
    assert_eq!(data.payments[0].kind, PaymentKind::Claim);
    assert_eq!(data.payments[0].period, 1);
    assert_eq!(
        backend.get(&addr_of("carol")).unwrap().balance,
        Amount::from(4_250u64)
    );
}

#[test]
fn claim_undo_inverts_a_committed_claim() {
    let (mut backend, address) = active_backend();
    let params = ProtocolParams::default();
    let before_fundraiser = backend.get(&address).unwrap().clone();
    let before_carol = backend.get(&addr_of("carol")).unwrap().clone();
    let tx = claim_tx("claim-1", "carol", &address, 1, 250);

    let mut store = StateStore::new(&mut backend, T_START + 100);
    store.cache(&tx.working_set());
    tx.apply(&mut store, &params);
    store.commit();

    let mut store = StateStore::new(&mut backend, T_START + 100);
    store.cache(&tx.working_set());
    let errors = tx.undo(&mut store);
    assert!(errors.is_empty());
    store.commit();

    assert_eq!(backend.get(&address).unwrap(), &before_fundraiser);
    assert_eq!(backend.get(&addr_of("carol")).unwrap(), &before_carol);
}

#[test]
fn claiming_the_final_period_ends_the_campaign() {
    let (mut backend, address) = active_backend();
    let params = ProtocolParams::default();
    let tx = claim_tx("claim-4", "carol", &address, 4, 250);

    let mut store = StateStore::new(&mut backend, T_START + 100);
    store.cache(&tx.working_set());
    tx.apply(&mut store, &params);
    store.commit();

    assert_eq!(
        backend.get(&address).unwrap().fundraiser.as_ref().unwrap().status,
        FundraiserStatus::Ended
    );
}
