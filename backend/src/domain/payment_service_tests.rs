//! Tests for the payment service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::MockPaymentRepository;
use crate::domain::test_fixtures::{caller, fixture_clock, fixture_timestamp};
use crate::domain::{ErrorCode, InvoiceRecord};

fn payment(payer_id: Uuid, payee_id: Uuid) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        load_id: Uuid::new_v4(),
        payer_id,
        payee_id,
        amount: 5000.0,
        status: PaymentStatus::Pending,
        method: DEFAULT_PAYMENT_METHOD.to_owned(),
        created_at: fixture_timestamp(),
    }
}

fn service(repo: MockPaymentRepository) -> PaymentService {
    PaymentService::new(Arc::new(repo), fixture_clock())
}

#[tokio::test]
async fn created_payment_is_pending_with_invoice_number() {
    let shipper = caller(Role::Shipper);
    let shipper_id = shipper.id;
    let mut repo = MockPaymentRepository::new();
    repo.expect_create_payment()
        .withf(move |payment| payment.payer_id == shipper_id && payment.method == "pending")
        .return_once(|_| Ok(()));

    let receipt = service(repo)
        .create_payment(
            &shipper,
            PaymentDraft {
                load_id: Uuid::new_v4(),
                payee_id: Uuid::new_v4(),
                amount: 5000.0,
                method: None,
            },
        )
        .await
        .expect("payment recorded");

    assert_eq!(receipt.payment.status, PaymentStatus::Pending);
    assert!(receipt.invoice_number.starts_with("INV-"));
    assert_eq!(receipt.invoice_number.len(), 12);
}

#[tokio::test]
async fn non_payer_cannot_confirm() {
    let payee = caller(Role::Driver);
    let record = payment(Uuid::new_v4(), payee.id);
    let id = record.id;
    let mut repo = MockPaymentRepository::new();
    repo.expect_find_payment()
        .return_once(move |_| Ok(Some(record)));
    repo.expect_mark_paid().times(0);

    let err = service(repo)
        .confirm_payment(&payee, id)
        .await
        .expect_err("payee may not confirm");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn payer_or_admin_confirms(#[case] as_admin: bool) {
    let user = caller(if as_admin { Role::Admin } else { Role::Shipper });
    let payer_id = if as_admin { Uuid::new_v4() } else { user.id };
    let record = payment(payer_id, Uuid::new_v4());
    let id = record.id;
    let paid = Payment {
        status: PaymentStatus::Paid,
        ..record.clone()
    };
    let mut repo = MockPaymentRepository::new();
    repo.expect_find_payment()
        .return_once(move |_| Ok(Some(record)));
    repo.expect_mark_paid()
        .times(1)
        .return_once(move |_| Ok(Some(paid)));

    let confirmed = service(repo)
        .confirm_payment(&user, id)
        .await
        .expect("confirmed");

    assert_eq!(confirmed.status, PaymentStatus::Paid);
}

#[tokio::test]
async fn strangers_see_payment_as_absent() {
    let stranger = caller(Role::Driver);
    let record = payment(Uuid::new_v4(), Uuid::new_v4());
    let id = record.id;
    let mut repo = MockPaymentRepository::new();
    repo.expect_find_payment()
        .return_once(move |_| Ok(Some(record)));

    let err = service(repo)
        .get_payment(&stranger, id)
        .await
        .expect_err("hidden");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn invoice_joins_party_emails() {
    let payee = caller(Role::Driver);
    let record = payment(Uuid::new_v4(), payee.id);
    let id = record.id;
    let expected_number = record.invoice_number();
    let mut repo = MockPaymentRepository::new();
    repo.expect_invoice().return_once(move |_| {
        Ok(Some(InvoiceRecord {
            payment: record,
            payer_email: "shipper@test.com".to_owned(),
            payee_email: "driver@test.com".to_owned(),
            load_title: "Steel coils".to_owned(),
            load_weight_tons: 12.0,
        }))
    });

    let invoice = service(repo).invoice(&payee, id).await.expect("invoice");

    assert_eq!(invoice.invoice_number, expected_number);
    assert_eq!(invoice.payer, "shipper@test.com");
    assert_eq!(invoice.load, "Steel coils");
}

#[tokio::test]
async fn listing_scopes_non_admins_to_their_payments() {
    let user = caller(Role::Shipper);
    let user_id = user.id;
    let mut repo = MockPaymentRepository::new();
    repo.expect_list_payments()
        .withf(move |scope| *scope == PaymentScope::Party(user_id))
        .return_once(|_| Ok(Vec::new()));

    service(repo).list_payments(&user).await.expect("listed");
}
