//! End-to-end redemption scenarios against in-memory assets.

use std::sync::Arc;
use std::thread;

use iou_assets::{FungibleAsset, MemoryAsset};
use iou_nullables::{NullAsset, NullClock};
use iou_redemption::{AccountStatus, LedgerConfig, RedemptionError, RedemptionLedger};
use iou_types::{AccountId, Clock, TokenAmount};

fn acct(name: &str) -> AccountId {
    AccountId::new(name)
}

fn units(n: u64) -> TokenAmount {
    TokenAmount::from_units(n)
}

struct World {
    rhegic: Arc<MemoryAsset>,
    hegic: Arc<MemoryAsset>,
    clock: Arc<NullClock>,
    ledger: Arc<RedemptionLedger>,
    custody: AccountId,
}

/// rHEGIC and HEGIC each mint 100 to `owner`; the owner funds the reserve
/// with all 100 HEGIC, approves 100 rHEGIC and deposits 50.
fn deployed(blocks_to_release: u64) -> World {
    let owner = acct("owner");
    let custody = acct("iou_redemption");
    let rhegic = Arc::new(MemoryAsset::new("rHEGIC", owner.clone(), units(100)));
    let hegic = Arc::new(MemoryAsset::new("HEGIC", owner.clone(), units(100)));
    let clock = Arc::new(NullClock::new(12));
    let ledger = RedemptionLedger::new(
        LedgerConfig::new(custody.clone(), blocks_to_release),
        rhegic.clone(),
        hegic.clone(),
        clock.clone(),
    )
    .unwrap();

    hegic.transfer(&owner, &custody, units(100)).unwrap();
    rhegic.approve(&owner, &custody, units(100));
    ledger.deposit(&owner, units(50)).unwrap();

    World {
        rhegic,
        hegic,
        clock,
        ledger: Arc::new(ledger),
        custody,
    }
}

#[test]
fn deposit_is_taken_into_custody_and_recorded() {
    let w = deployed(5);
    assert_eq!(w.rhegic.balance_of(&w.custody).unwrap(), units(50));
    assert_eq!(w.ledger.get_deposit(&acct("owner")).amount_deposited, units(50));
}

#[test]
fn second_deposit_is_rejected() {
    let w = deployed(5);
    let err = w.ledger.deposit(&acct("owner"), units(50)).unwrap_err();
    assert_eq!(err.to_string(), "This account has already deposited");
}

#[test]
fn redeem_pays_proportional_amount() {
    let w = deployed(5);
    let owner = acct("owner");
    // One block is mined by the redeem transaction itself.
    w.clock.advance(1);
    w.ledger.redeem(&owner).unwrap();

    let record = w.ledger.get_deposit(&owner);
    let elapsed = record.block_deposited.blocks_since(w.clock.now()) as u128;
    let expected = record.amount_deposited.raw() * elapsed / w.ledger.release_window() as u128;
    assert_eq!(w.hegic.balance_of(&owner).unwrap().raw(), expected);
    assert_eq!(w.hegic.balance_of(&owner).unwrap(), units(10));
}

#[test]
fn fifty_over_five_blocks() {
    let w = deployed(5);
    let owner = acct("owner");

    w.clock.advance(2);
    assert_eq!(w.ledger.redeem(&owner).unwrap(), units(20));

    w.clock.advance(3);
    assert_eq!(w.ledger.redeem(&owner).unwrap(), units(30));

    w.clock.advance(5);
    assert_eq!(w.ledger.redeem(&owner).unwrap(), TokenAmount::ZERO);

    assert_eq!(w.hegic.balance_of(&owner).unwrap(), units(50));
    assert_eq!(w.ledger.reserve().unwrap(), units(50));
    assert_eq!(w.ledger.status(&owner), AccountStatus::FullyRedeemed);
}

#[test]
fn late_first_redeem_pays_exactly_principal() {
    let w = deployed(5);
    let owner = acct("owner");
    w.clock.advance(1_000);
    assert_eq!(w.ledger.redeem(&owner).unwrap(), units(50));
    assert_eq!(w.ledger.get_deposit(&owner).amount_redeemed, units(50));
}

#[test]
fn many_depositors_vest_independently() {
    let owner = acct("owner");
    let custody = acct("vault");
    let rhegic = Arc::new(MemoryAsset::new("rHEGIC", owner.clone(), units(1_000)));
    let hegic = Arc::new(MemoryAsset::new("HEGIC", custody.clone(), units(1_000)));
    let clock = Arc::new(NullClock::new(0));
    let ledger = RedemptionLedger::new(
        LedgerConfig::new(custody.clone(), 10),
        rhegic.clone(),
        hegic.clone(),
        clock.clone(),
    )
    .unwrap();

    for i in 0..4u64 {
        let user = acct(&format!("user_{i}"));
        rhegic.transfer(&owner, &user, units(100)).unwrap();
        rhegic.approve(&user, &custody, units(100));
        ledger.deposit(&user, units(100)).unwrap();
        clock.advance(2);
    }
    // user_0 deposited at 0, user_3 at 6; now at 8.
    assert_eq!(ledger.redeem(&acct("user_0")).unwrap(), units(80));
    assert_eq!(ledger.redeem(&acct("user_3")).unwrap(), units(20));
    assert_eq!(ledger.depositor_count(), 4);
    assert_eq!(ledger.held_input().unwrap(), units(400));
}

#[test]
fn zero_payable_moves_no_funds() {
    let rhegic = Arc::new(MemoryAsset::new("rHEGIC", acct("owner"), units(100)));
    let hegic = Arc::new(NullAsset::new("HEGIC"));
    let clock = Arc::new(NullClock::new(0));
    let ledger = RedemptionLedger::new(
        LedgerConfig::new(acct("vault"), 5),
        rhegic.clone(),
        hegic.clone(),
        clock.clone(),
    )
    .unwrap();
    hegic.set_balance(&acct("vault"), units(100));
    rhegic.approve(&acct("owner"), &acct("vault"), units(50));
    ledger.deposit(&acct("owner"), units(50)).unwrap();

    clock.advance(1);
    ledger.redeem(&acct("owner")).unwrap();
    assert_eq!(hegic.transfer_count(), 1);
    ledger.redeem(&acct("owner")).unwrap();
    assert_eq!(hegic.transfer_count(), 1);
}

#[test]
fn concurrent_redeems_never_double_pay() {
    let w = deployed(5);
    let owner = acct("owner");
    w.clock.advance(3);

    let paid: Vec<TokenAmount> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&w.ledger);
                let owner = owner.clone();
                s.spawn(move || ledger.redeem(&owner).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let total = paid.iter().fold(TokenAmount::ZERO, |acc, p| acc + *p);
    assert_eq!(total, units(30));
    assert_eq!(paid.iter().filter(|p| !p.is_zero()).count(), 1);
    assert_eq!(w.hegic.balance_of(&owner).unwrap(), units(30));
}

#[test]
fn concurrent_deposits_accept_exactly_one() {
    let owner = acct("owner");
    let custody = acct("vault");
    let rhegic = Arc::new(MemoryAsset::new("rHEGIC", owner.clone(), units(100)));
    let hegic = Arc::new(MemoryAsset::new("HEGIC", custody.clone(), units(100)));
    let ledger = RedemptionLedger::new(
        LedgerConfig::new(custody.clone(), 5),
        rhegic.clone(),
        hegic,
        Arc::new(NullClock::new(0)),
    )
    .unwrap();
    rhegic.approve(&owner, &custody, units(100));

    let results: Vec<Result<_, RedemptionError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..6)
            .map(|_| s.spawn(|| ledger.deposit(&owner, units(10))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, RedemptionError::AlreadyDeposited(_))));
    assert_eq!(rhegic.balance_of(&custody).unwrap(), units(10));
}
