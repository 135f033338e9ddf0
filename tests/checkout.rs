//! End-to-end checkout against the bundled catalog.
//!
//! One "Na Brasa Clássico" (R$ 25,00) with two eggs (R$ 3,00 each) costs
//! R$ 31,00; two of them cost R$ 62,00 for pickup and R$ 65,00 with the
//! R$ 3,00 delivery fee.

use std::sync::Arc;

use rusty_money::{Money, iso::BRL};
use testresult::TestResult;

use storefront::{prelude::*, recording::MockOrderRecorder};

fn details(delivery_type: DeliveryType) -> OrderDetails {
    OrderDetails {
        delivery_type,
        payment_method: PaymentMethod::Pix,
        customer_name: "Ana".to_string(),
        customer_phone: "(11) 99999-0000".to_string(),
        address: Some("Rua das Flores, 10".to_string()),
        notes: None,
    }
}

fn fill(session: &mut Session, catalog: &Catalog) -> TestResult<LineItemId> {
    let item = LineItemBuilder::new(catalog).build_by_id(
        "1",
        &[SelectedAddOn::new("ovo", 2)],
        2,
        Some("sem picles"),
    )?;

    Ok(session.cart_mut().add(item))
}

fn session(recorder: Arc<dyn OrderRecorder>) -> Session {
    let composer = OrderComposer::new(recorder, &StorefrontConfig::default());

    Session::new(Arc::new(composer))
}

#[test]
fn line_item_and_cart_prices_compose() -> TestResult {
    let catalog = Catalog::bundled()?;
    let mut session = session(Arc::new(InMemoryOrderRecorder::new()));

    let id = fill(&mut session, &catalog)?;
    let item = session.cart().get(id).ok_or("line item missing")?;

    assert_eq!(item.unit_price(), Money::from_minor(31_00, BRL));
    assert_eq!(item.total_price(), Money::from_minor(62_00, BRL));

    let pickup = session.totals(DeliveryType::Pickup)?;
    let delivery = session.totals(DeliveryType::Delivery)?;

    assert_eq!(pickup.total, Money::from_minor(62_00, BRL));
    assert_eq!(delivery.delivery_fee, Money::from_minor(3_00, BRL));
    assert_eq!(delivery.total, Money::from_minor(65_00, BRL));

    Ok(())
}

#[tokio::test]
async fn delivery_checkout_records_order_and_clears_cart() -> TestResult {
    let catalog = Catalog::bundled()?;
    let recorder = Arc::new(InMemoryOrderRecorder::new());
    let mut session = session(recorder.clone());

    fill(&mut session, &catalog)?;

    let preview = session.preview(&details(DeliveryType::Delivery))?;
    let order = session.submit(&details(DeliveryType::Delivery)).await?;

    assert!(session.cart().is_empty());
    assert_eq!(order.order_number(), 1);
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.totals().total, Money::from_minor(65_00, BRL));
    assert_eq!(order.summary("Na Brasa Burguer"), preview);

    assert!(preview.contains("💰 *TOTAL GERAL: R$ 65,00*"));
    assert!(preview.contains("🛵 *Taxa de Entrega:* R$ 3,00"));
    assert!(preview.contains("Rua das Flores, 10"));

    let record = recorder.record(order.uuid()).await.ok_or("record missing")?;

    assert_eq!(record.total, 65_00);
    assert_eq!(record.items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn pickup_checkout_has_no_delivery_fee() -> TestResult {
    let catalog = Catalog::bundled()?;
    let mut session = session(Arc::new(InMemoryOrderRecorder::new()));

    fill(&mut session, &catalog)?;

    let order = session.submit(&details(DeliveryType::Pickup)).await?;
    let summary = order.summary("Na Brasa Burguer");

    assert_eq!(order.totals().total, Money::from_minor(62_00, BRL));
    assert!(!order.totals().has_delivery_fee());
    assert!(!summary.contains("Taxa de Entrega"));
    assert!(!summary.contains("Rua das Flores"));

    Ok(())
}

#[tokio::test]
async fn missing_name_keeps_cart() -> TestResult {
    let catalog = Catalog::bundled()?;
    let recorder = Arc::new(InMemoryOrderRecorder::new());
    let mut session = session(recorder.clone());

    fill(&mut session, &catalog)?;

    let incomplete = OrderDetails {
        customer_name: "   ".to_string(),
        ..details(DeliveryType::Pickup)
    };

    let result = session.submit(&incomplete).await;

    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::MissingCustomerInfo))
    ));
    assert_eq!(session.cart().len(), 1);
    assert!(recorder.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn delivery_without_address_is_rejected() -> TestResult {
    let catalog = Catalog::bundled()?;
    let mut session = session(Arc::new(InMemoryOrderRecorder::new()));

    fill(&mut session, &catalog)?;

    let no_address = OrderDetails {
        address: None,
        ..details(DeliveryType::Delivery)
    };

    let result = session.submit(&no_address).await;

    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::MissingAddress))
    ));
    assert_eq!(session.cart().len(), 1);

    Ok(())
}

#[tokio::test]
async fn storage_failure_keeps_cart_for_retry() -> TestResult {
    let catalog = Catalog::bundled()?;

    let mut failing = MockOrderRecorder::new();
    failing
        .expect_persist()
        .times(1)
        .returning(|_| Err(RecordingError::Storage("connection refused".to_string())));

    let mut session = session(Arc::new(failing));
    let id = fill(&mut session, &catalog)?;

    let result = session.submit(&details(DeliveryType::Delivery)).await;

    assert!(matches!(result, Err(SubmitError::Recording(RecordingError::Storage(_)))));
    assert!(session.cart().contains(id));
    assert_eq!(session.cart().total_price()?, Money::from_minor(62_00, BRL));

    Ok(())
}

#[tokio::test]
async fn order_numbers_increase_across_sessions() -> TestResult {
    let catalog = Catalog::bundled()?;
    let recorder = Arc::new(InMemoryOrderRecorder::new());
    let composer = Arc::new(OrderComposer::new(recorder.clone(), &StorefrontConfig::default()));

    let mut numbers = Vec::new();

    for _ in 0..3 {
        let mut session = Session::new(composer.clone());

        fill(&mut session, &catalog)?;

        numbers.push(session.submit(&details(DeliveryType::Pickup)).await?.order_number());
    }

    assert_eq!(numbers, [1, 2, 3]);
    assert_eq!(recorder.list_pending(10).await?.len(), 3);

    Ok(())
}
