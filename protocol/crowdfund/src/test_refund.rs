//! Pro-rata refunds after a passed vote or a failed funding round.

use crate::amount::Amount;
use crate::invariants::{assert_conservation, assert_unique_payment_ids};
use crate::testutil::*;
use crate::transactions::CrowdfundTransaction;
use crate::types::{
    Account, FundraiserData, FundraiserStatus, Investment, Payment, PaymentKind, VoteChoice,
};

/// A campaign already voted into REFUND, with a partial owner claim on
/// record: alice invested 600, bob 400, and 200 was claimed.
fn refund_state_accounts() -> (Vec<Account>, crate::PublicKey) {
    let key = pk("campaign");
    let mut fundraiser = Account::new(crate::Address::from_public_key(&key));
    fundraiser.public_key = Some(key.clone());
    fundraiser.balance = Amount::from(800u64);
    fundraiser.fundraiser = Some(FundraiserData {
        owner: pk("carol"),
        status: FundraiserStatus::Refund,
        goal: Amount::from(1_000u64),
        periods: 4,
        vote_time: 2,
        start_funding: T_REGISTER,
        start_project: T_START,
        investments: vec![
            Investment {
                address: addr_of("alice"),
                amount: Amount::from(600u64),
                timestamp: T_REGISTER + 10,
                message: String::new(),
            },
            Investment {
                address: addr_of("bob"),
                amount: Amount::from(400u64),
                timestamp: T_REGISTER + 15,
                message: String::new(),
            },
        ],
        payments: vec![Payment {
            transaction: "claim-0".to_string(),
            period: 1,
            recipient: addr_of("carol"),
            amount: Amount::from(200u64),
            kind: PaymentKind::Claim,
        }],
        votes: Vec::new(),
        title: "Solar water pumps".to_string(),
        description: String::new(),
        site: String::new(),
        image: String::new(),
        category: "infrastructure".to_string(),
    });

    let accounts = vec![
        fundraiser,
        account_with_balance("alice", 0),
        account_with_balance("bob", 0),
        account_with_balance("mallory", 0),
    ];
    (accounts, key)
}

#[test]
fn refund_succeeds_after_vote_pass_and_claim_is_blocked() {
    let mut campaign = active_campaign_sole_investor();
    let address = campaign.fundraiser_address.clone();
    campaign
        .processor
        .apply(
            period_two_end(),
            &CrowdfundTransaction::Vote(vote_tx("vote-1", "carol", &address, 2, VoteChoice::Refund)),
        )
        .unwrap();

    campaign
        .processor
        .apply(
            period_two_end() + 10,
            &CrowdfundTransaction::Refund(refund_tx(
                "refund-1",
                "carol",
                &campaign.fundraiser_key,
                1_000,
            )),
        )
        .unwrap();

    let fundraiser = campaign.processor.backend().get(&address).unwrap();
    assert_eq!(fundraiser.balance, Amount::zero());
    let data = fundraiser.fundraiser.as_ref().unwrap();
    assert_eq!(data.payments.len(), 1);
    assert_eq!(data.payments[0].kind, PaymentKind::Refund);
    assert_eq!(data.payments[0].period, -1);
    assert_conservation(fundraiser);
    assert_unique_payment_ids(fundraiser);

    let carol = campaign.processor.backend().get(&addr_of("carol")).unwrap();
    assert_eq!(carol.balance, Amount::from(5_000u64));

    // The owner can no longer claim out of a refunding campaign.
    let errors = campaign
        .processor
        .apply(
            period_two_end() + 20,
            &CrowdfundTransaction::Claim(claim_tx("claim-1", "carol", &address, 1, 250)),
        )
        .unwrap_err();
    assert!(errors
        .iter()
        .any(|e| e.message == "Stakeholders voted not to support this project anymore"));
}

#[test]
fn refunds_are_pro_rata_net_of_owner_claims() {
    let (accounts, key) = refund_state_accounts();
    let address = crate::Address::from_public_key(&key);
    let mut processor = processor_with(accounts);

    // (1000 - 200) * 600 / 1000 = 480 for alice.
    processor
        .apply(
            T_START + 100,
            &CrowdfundTransaction::Refund(refund_tx("refund-1", "alice", &key, 480)),
        )
        .unwrap();
    // (1000 - 200) * 400 / 1000 = 320 for bob.
    processor
        .apply(
            T_START + 110,
            &CrowdfundTransaction::Refund(refund_tx("refund-2", "bob", &key, 320)),
        )
        .unwrap();

    let fundraiser = processor.backend().get(&address).unwrap();
    assert_eq!(fundraiser.balance, Amount::zero());
    assert_conservation(fundraiser);
    assert_unique_payment_ids(fundraiser);
    assert_eq!(
        processor.backend().get(&addr_of("alice")).unwrap().balance,
        Amount::from(480u64)
    );
    assert_eq!(
        processor.backend().get(&addr_of("bob")).unwrap().balance,
        Amount::from(320u64)
    );

    // alice has drawn her full share; a second attempt computes to zero.
    let errors = processor
        .apply(
            T_START + 120,
            &CrowdfundTransaction::Refund(refund_tx("refund-3", "alice", &key, 0)),
        )
        .unwrap_err();
    assert!(errors.iter().any(|e| e.message == "Amount to claim is incorrect"));
}

#[test]
fn refund_with_mismatched_amount_is_rejected() {
    let (accounts, key) = refund_state_accounts();
    let mut processor = processor_with(accounts);

    let errors = processor
        .apply(
            T_START + 100,
            &CrowdfundTransaction::Refund(refund_tx("refund-1", "alice", &key, 100)),
        )
        .unwrap_err();
    assert!(errors.iter().any(|e| e.message == "Amount to claim is incorrect"));
    assert!(errors.iter().any(|e| e.expected.as_deref() == Some("480")));
}

#[test]
fn refund_by_non_investor_is_rejected() {
    let (accounts, key) = refund_state_accounts();
    let mut processor = processor_with(accounts);

    let errors = processor
        .apply(
            T_START + 100,
            &CrowdfundTransaction::Refund(refund_tx("refund-1", "mallory", &key, 0)),
        )
        .unwrap_err();
    assert!(errors
        .iter()
        .any(|e| e.message == "You are not a donor of this fundraiser"));
}

#[test]
fn underfunded_campaign_refunds_inside_the_funding_window() {
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

    // Sole investor of an underfunded round: the full contribution comes
    // back, and the record moves to REFUND.
    processor
        .apply(
            T_REGISTER + 100,
            &CrowdfundTransaction::Refund(refund_tx("refund-1", "alice", &key, 400)),
        )
        .unwrap();

    let fundraiser = processor.backend().get(&address).unwrap();
    assert_eq!(fundraiser.balance, Amount::zero());
    assert_eq!(
        fundraiser.fundraiser.as_ref().unwrap().status,
        FundraiserStatus::Refund
    );
    assert_eq!(
        processor.backend().get(&addr_of("alice")).unwrap().balance,
        Amount::from(5_000u64)
    );
}

#[test]
fn underfunded_campaign_refund_is_rejected_after_the_window() {
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

    let late = T_REGISTER + crate::ProtocolParams::default().fund_window + 1;
    let errors = processor
        .apply(
            late,
            &CrowdfundTransaction::Refund(refund_tx("refund-1", "alice", &key, 400)),
        )
        .unwrap_err();
    assert!(errors.iter().any(|e| e.message == "Fundraiser is not finished yet"));
}
