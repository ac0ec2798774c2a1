use chrono::NaiveDate;
use std::sync::Arc;

use chorekeeper_domain::entitlement::{
    EntitlementLedger, EntitlementLedgerRepository, DEFAULT_DAILY_QUOTA,
};
use chorekeeper_infrastructure::persistence::repositories::SqliteEntitlementLedgerRepository;


#[tokio::test]
async fn entitlement_repo_single_row_round_trip_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteEntitlementLedgerRepository::new(Arc::new(pool));

    // Fresh install: no ledger row yet.
    assert!(repo.find().await.expect("find empty").is_none());

    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let mut ledger = EntitlementLedger::new(DEFAULT_DAILY_QUOTA, today).expect("create ledger");
    ledger.add_purchased(30).expect("add credits");
    ledger.consume(today).expect("consume");

    repo.save(&ledger).await.expect("save ledger");

    let fetched = repo
        .find()
        .await
        .expect("find")
        .expect("ledger should exist");
    assert_eq!(fetched, ledger);
    assert_eq!(fetched.purchased_balance(), 29);
    assert_eq!(fetched.daily_remaining(), DEFAULT_DAILY_QUOTA);

    // Saving again updates the single row in place.
    ledger.consume(today).expect("consume again");
    repo.save(&ledger).await.expect("save updated ledger");

    let updated = repo
        .find()
        .await
        .expect("find updated")
        .expect("ledger should exist");
    assert_eq!(updated.purchased_balance(), 28);
    assert_eq!(updated.last_reset_date(), today);
}
