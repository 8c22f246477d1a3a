//! Integration tests for statement reads, payments, and settlement.

mod common;

use leasehold_core::billing::{
    BillingError, BillingStore, BillingTx, LeaseStatus, StatementStatus, UtilityType,
};
use leasehold_db::{
    CreateLeaseInput, SeaBillingStore, StatementError, StatementRepository, TenancyRepository,
    UtilityRateError, UtilityRateRepository,
};
use leasehold_shared::BillingConfig;
use leasehold_shared::types::{PageRequest, PropertyId};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{billing_service, create_lease, create_unit, date, request, set_rate, setup_db};

#[tokio::test]
async fn test_get_statement_detail() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    create_lease(&db, fixture.unit_id, LeaseStatus::Active, date(2024, 1, 1), dec!(10000)).await;
    set_rate(&db, fixture.property_id, UtilityType::Water, date(2024, 3, 1), dec!(20)).await;
    let saved = billing_service(&db, BillingConfig::default())
        .save_or_update_billing(request(
            fixture.unit_id,
            json!({
                "readingDate": "2024-03-15",
                "dueDate": "2024-03-25",
                "waterPrevReading": 5,
                "waterCurrentReading": 15,
                "electricityPrevReading": 100,
                "electricityCurrentReading": 130,
                "totalElectricityAmount": 300,
                "totalAmountDue": 10750,
                "additionalCharges": [
                    { "type": "Parking", "amount": 500 },
                    { "type": "Promo", "amount": 250, "category": "discount" }
                ]
            }),
        ))
        .await
        .unwrap();

    let repo = StatementRepository::new(db.clone());
    let before_due = repo
        .get_statement(&saved.billing_id, date(2024, 3, 20))
        .await
        .unwrap();

    assert_eq!(before_due.statement.base_rent, dec!(10000));
    assert_eq!(before_due.statement.water_cost, dec!(200));
    assert_eq!(before_due.statement.electricity_cost, dec!(300));
    assert_eq!(before_due.statement.computed_total, dec!(10750));
    assert_eq!(before_due.effective_status, StatementStatus::Unpaid);
    assert_eq!(
        before_due
            .charges
            .iter()
            .map(|c| c.label().to_string())
            .collect::<Vec<_>>(),
        vec!["Parking", "Promo"]
    );
    assert_eq!(before_due.readings.len(), 2);

    let after_due = repo
        .get_statement(&saved.billing_id, date(2024, 3, 26))
        .await
        .unwrap();
    assert_eq!(after_due.effective_status, StatementStatus::Overdue);
    assert_eq!(after_due.statement.status, StatementStatus::Unpaid);
}

#[tokio::test]
async fn test_get_missing_statement() {
    let db = setup_db().await;
    let repo = StatementRepository::new(db);

    let err = repo
        .get_statement("BILL-NOPE0000", date(2024, 3, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, StatementError::NotFound(_)));
}

#[tokio::test]
async fn test_list_statements_newest_first() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    create_lease(&db, fixture.unit_id, LeaseStatus::Active, date(2024, 1, 1), dec!(1000)).await;
    let service = billing_service(&db, BillingConfig::default());

    for month in 1..=3 {
        service
            .save_or_update_billing(request(
                fixture.unit_id,
                json!({
                    "readingDate": format!("2024-0{month}-10"),
                    "dueDate": format!("2024-0{month}-20"),
                    "totalAmountDue": 1000
                }),
            ))
            .await
            .unwrap();
    }

    let repo = StatementRepository::new(db.clone());
    let page = repo
        .list_statements(
            fixture.unit_id,
            &PageRequest {
                page: 1,
                per_page: 2,
            },
            date(2024, 3, 15),
        )
        .await
        .unwrap();

    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].statement.period_start, date(2024, 3, 1));
    assert_eq!(page.data[0].effective_status, StatementStatus::Unpaid);
    assert_eq!(page.data[1].statement.period_start, date(2024, 2, 1));
    assert_eq!(page.data[1].effective_status, StatementStatus::Overdue);
}

#[tokio::test]
async fn test_list_overdue_excludes_paid_and_future() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    create_lease(&db, fixture.unit_id, LeaseStatus::Active, date(2024, 1, 1), dec!(1000)).await;
    let service = billing_service(&db, BillingConfig::default());

    let mut ids = Vec::new();
    for month in 1..=3 {
        let saved = service
            .save_or_update_billing(request(
                fixture.unit_id,
                json!({
                    "readingDate": format!("2024-0{month}-10"),
                    "dueDate": format!("2024-0{month}-20"),
                    "totalAmountDue": 1000
                }),
            ))
            .await
            .unwrap();
        ids.push(saved.billing_id);
    }
    let repo = StatementRepository::new(db.clone());
    repo.confirm_payment(&ids[0], dec!(1000)).await.unwrap();

    let overdue = repo.list_overdue(date(2024, 3, 15)).await.unwrap();

    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].statement.id, ids[1]);
    assert_eq!(overdue[0].effective_status, StatementStatus::Overdue);
}

#[tokio::test]
async fn test_confirm_payment_partial_then_full() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    create_lease(&db, fixture.unit_id, LeaseStatus::Active, date(2024, 1, 1), dec!(5000)).await;
    let saved = billing_service(&db, BillingConfig::default())
        .save_or_update_billing(request(
            fixture.unit_id,
            json!({ "readingDate": "2024-03-15", "dueDate": "2024-03-25", "totalAmountDue": 5000 }),
        ))
        .await
        .unwrap();
    let repo = StatementRepository::new(db.clone());

    let partial = repo.confirm_payment(&saved.billing_id, dec!(2000)).await.unwrap();
    assert_eq!(partial.status, StatementStatus::Unpaid);
    assert_eq!(partial.amount_paid, dec!(2000));

    let full = repo.confirm_payment(&saved.billing_id, dec!(3000)).await.unwrap();
    assert_eq!(full.status, StatementStatus::Paid);
    assert!(full.paid_at.is_some());

    let stored = repo
        .get_statement(&saved.billing_id, date(2024, 4, 1))
        .await
        .unwrap();
    assert_eq!(stored.effective_status, StatementStatus::Paid);
    assert_eq!(stored.statement.amount_paid, dec!(5000));
}

#[tokio::test]
async fn test_statement_update_keeps_amount_paid() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    create_lease(&db, fixture.unit_id, LeaseStatus::Active, date(2024, 1, 1), dec!(5000)).await;
    let saved = billing_service(&db, BillingConfig::default())
        .save_or_update_billing(request(
            fixture.unit_id,
            json!({ "readingDate": "2024-03-15", "dueDate": "2024-03-25", "totalAmountDue": 5000 }),
        ))
        .await
        .unwrap();

    let repo = StatementRepository::new(db.clone());
    repo.confirm_payment(&saved.billing_id, dec!(2000)).await.unwrap();

    let tx = SeaBillingStore::new(db.clone()).begin().await.unwrap();
    let mut snapshot = tx
        .find_statement(fixture.unit_id, date(2024, 3, 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.amount_paid, dec!(2000));

    // Stale copy from before the payment.
    snapshot.amount_paid = dec!(0);
    snapshot.due_date = date(2024, 3, 28);
    tx.update_statement(&snapshot).await.unwrap();
    tx.commit().await.unwrap();

    let stored = repo
        .get_statement(&saved.billing_id, date(2024, 3, 20))
        .await
        .unwrap();
    assert_eq!(stored.statement.due_date, date(2024, 3, 28));
    assert_eq!(stored.statement.amount_paid, dec!(2000));
}

#[tokio::test]
async fn test_confirm_payment_rejects_non_positive() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    create_lease(&db, fixture.unit_id, LeaseStatus::Active, date(2024, 1, 1), dec!(5000)).await;
    let saved = billing_service(&db, BillingConfig::default())
        .save_or_update_billing(request(
            fixture.unit_id,
            json!({ "readingDate": "2024-03-15", "dueDate": "2024-03-25", "totalAmountDue": 5000 }),
        ))
        .await
        .unwrap();
    let repo = StatementRepository::new(db.clone());

    let err = repo.confirm_payment(&saved.billing_id, dec!(0)).await.unwrap_err();
    assert!(matches!(
        err,
        StatementError::Billing(BillingError::InvalidPayment(_))
    ));

    let missing = repo.confirm_payment("BILL-NOPE0000", dec!(10)).await.unwrap_err();
    assert!(matches!(missing, StatementError::NotFound(_)));
}

#[tokio::test]
async fn test_settle_applies_advance_then_deposit() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    let tenancy = TenancyRepository::new(db.clone());
    let lease = tenancy
        .create_lease(CreateLeaseInput {
            unit_id: fixture.unit_id,
            status: LeaseStatus::Completed,
            start_date: date(2023, 4, 1),
            end_date: Some(date(2024, 3, 31)),
            monthly_rent: dec!(5000),
            advance_balance: dec!(2000),
            deposit_balance: dec!(10000),
        })
        .await
        .unwrap();
    let saved = billing_service(&db, BillingConfig::default())
        .save_or_update_billing(request(
            fixture.unit_id,
            json!({ "readingDate": "2024-03-15", "dueDate": "2024-03-25", "totalAmountDue": 5000 }),
        ))
        .await
        .unwrap();
    let repo = StatementRepository::new(db.clone());

    // Without move-out only the advance is used.
    let partial = repo.settle(&saved.billing_id, false).await.unwrap();
    assert_eq!(partial.plan.from_advance, dec!(2000));
    assert_eq!(partial.plan.from_deposit, dec!(0));
    assert_eq!(partial.plan.remaining, dec!(3000));
    assert_eq!(partial.statement.status, StatementStatus::Unpaid);
    assert_eq!(partial.advance_balance, dec!(0));

    // Move-out: the deposit covers the rest.
    let settled = repo.settle(&saved.billing_id, true).await.unwrap();
    assert_eq!(settled.plan.from_advance, dec!(0));
    assert_eq!(settled.plan.from_deposit, dec!(3000));
    assert!(settled.plan.is_settled());
    assert_eq!(settled.statement.status, StatementStatus::Paid);
    assert_eq!(settled.statement.amount_paid, dec!(5000));

    let lease = tenancy.find_lease(lease.id).await.unwrap().unwrap();
    assert_eq!(lease.advance_balance, dec!(0));
    assert_eq!(lease.deposit_balance, dec!(7000));
}

#[tokio::test]
async fn test_set_rate_upserts_per_month() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    let repo = UtilityRateRepository::new(db.clone());

    repo.set_rate(fixture.property_id, UtilityType::Water, date(2024, 3, 1), dec!(18))
        .await
        .unwrap();
    let updated = repo
        .set_rate(fixture.property_id, UtilityType::Water, date(2024, 3, 20), dec!(20))
        .await
        .unwrap();
    repo.set_rate(fixture.property_id, UtilityType::Electricity, date(2024, 3, 1), dec!(11))
        .await
        .unwrap();

    assert_eq!(updated.period_start, date(2024, 3, 1));
    let rates = repo.list_rates(fixture.property_id).await.unwrap();
    assert_eq!(rates.len(), 2);
    let water = rates
        .iter()
        .find(|r| r.utility == UtilityType::Water)
        .unwrap();
    assert_eq!(water.rate, dec!(20));
}

#[tokio::test]
async fn test_set_rate_validation() {
    let db = setup_db().await;
    let fixture = create_unit(&db).await;
    let repo = UtilityRateRepository::new(db.clone());

    let negative = repo
        .set_rate(fixture.property_id, UtilityType::Water, date(2024, 3, 1), dec!(-1))
        .await
        .unwrap_err();
    assert!(matches!(negative, UtilityRateError::NegativeRate));

    for rate in [dec!(1000000000000), dec!(0.00005)] {
        let unstorable = repo
            .set_rate(fixture.property_id, UtilityType::Water, date(2024, 3, 1), rate)
            .await
            .unwrap_err();
        assert!(matches!(unstorable, UtilityRateError::UnstorableRate(_)));
    }

    let missing = repo
        .set_rate(PropertyId::new(), UtilityType::Water, date(2024, 3, 1), dec!(1))
        .await
        .unwrap_err();
    assert!(matches!(missing, UtilityRateError::PropertyNotFound(_)));
}
