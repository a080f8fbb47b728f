use super::*;
use crate::db::DbService;
use crate::db::models::{BillingStatus, RoomType};
use crate::db::repository::NotificationRepository;
use crate::notify::EventPublisher;
use crate::payments::PaymentIntent;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Gateway double: intents are seeded per test, refunds recorded
#[derive(Default)]
struct MockGateway {
    intents: Mutex<HashMap<String, PaymentIntent>>,
    refunds: Mutex<Vec<String>>,
    fail_refunds: bool,
    already_refunded: bool,
}

impl MockGateway {
    fn with_succeeded(intent_id: &str, amount_cents: i64) -> Self {
        let gw = Self::default();
        gw.seed(intent_id, amount_cents, "succeeded");
        gw
    }

    fn seed(&self, intent_id: &str, amount_cents: i64, status: &str) {
        self.intents.lock().unwrap().insert(
            intent_id.to_string(),
            PaymentIntent {
                id: intent_id.to_string(),
                amount: amount_cents,
                currency: "usd".to_string(),
                status: status.to_string(),
                client_secret: None,
            },
        );
    }

    fn refund_count(&self) -> usize {
        self.refunds.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        _metadata: &[(&str, String)],
    ) -> AppResult<PaymentIntent> {
        let intent = PaymentIntent {
            id: format!("pi_test_{amount_cents}"),
            amount: amount_cents,
            currency: currency.to_string(),
            status: "requires_payment_method".to_string(),
            client_secret: Some("cs_test".to_string()),
        };
        self.intents
            .lock()
            .unwrap()
            .insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        self.intents
            .lock()
            .unwrap()
            .get(intent_id)
            .cloned()
            .ok_or_else(|| AppError::upstream(format!("No such intent: {intent_id}")))
    }

    async fn refund(&self, intent_id: &str) -> AppResult<RefundOutcome> {
        if self.fail_refunds {
            return Err(AppError::upstream("refund declined"));
        }
        self.refunds.lock().unwrap().push(intent_id.to_string());
        if self.already_refunded {
            Ok(RefundOutcome::AlreadyRefunded)
        } else {
            Ok(RefundOutcome::Refunded)
        }
    }

    async fn search_intents(&self, _key: &str, _value: &str) -> AppResult<Vec<PaymentIntent>> {
        Ok(self
            .intents
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.is_succeeded())
            .cloned()
            .collect())
    }
}

/// Publisher double: records every published event name
#[derive(Default)]
struct MockPublisher {
    events: Mutex<Vec<String>>,
}

#[async_trait]
impl EventPublisher for MockPublisher {
    async fn publish(
        &self,
        _channel: &str,
        event: &str,
        _payload: &serde_json::Value,
    ) -> AppResult<()> {
        self.events.lock().unwrap().push(event.to_string());
        Ok(())
    }

    fn authorize_channel(&self, _socket_id: &str, _channel: &str) -> AppResult<String> {
        Ok("mock:auth".to_string())
    }
}

struct Fixture {
    db: DbService,
    manager: BookingManager,
    gateway: Arc<MockGateway>,
    publisher: Arc<MockPublisher>,
}

async fn fixture(gateway: MockGateway) -> Fixture {
    let db = DbService::memory().await.expect("in-memory db");
    let gateway = Arc::new(gateway);
    let publisher = Arc::new(MockPublisher::default());
    let notifier = Notifier::new(
        publisher.clone(),
        NotificationRepository::new(db.db.clone()),
    );
    let manager = BookingManager::new(
        gateway.clone(),
        notifier,
        BookingRepository::new(db.db.clone()),
        BillingRepository::new(db.db.clone()),
        RoomRepository::new(db.db.clone()),
    );
    Fixture {
        db,
        manager,
        gateway,
        publisher,
    }
}

async fn seed_room(db: &DbService, number: &str, rate: f64) -> Room {
    RoomRepository::new(db.db.clone())
        .create(Room {
            id: None,
            room_number: number.to_string(),
            room_type: RoomType::Double,
            price_per_night: rate,
            discount: 0.0,
            status: RoomStatus::Available,
            description: None,
            amenities: vec![],
            images: vec![],
            created_at: chrono::Utc::now(),
        })
        .await
        .expect("seed room")
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("test date")
}

fn guest(key: &str) -> RecordId {
    RecordId::from_table_key("user", key)
}

fn extras(price: f64) -> Vec<BookingExtra> {
    vec![BookingExtra {
        name: "Airport pickup".to_string(),
        price,
    }]
}

fn create_req(room: &Room, check_in: &str, check_out: &str, intent: &str) -> BookingCreate {
    BookingCreate {
        room: room.id.as_ref().unwrap().to_string(),
        check_in_date: date(check_in),
        check_out_date: date(check_out),
        guests: Some(2),
        extras: vec![],
        special_requests: None,
        payment_intent_id: Some(intent.to_string()),
    }
}

#[test]
fn quote_three_nights_plus_extra() {
    let room = Room {
        id: None,
        room_number: "101".to_string(),
        room_type: RoomType::Double,
        price_per_night: 100.0,
        discount: 0.0,
        status: RoomStatus::Available,
        description: None,
        amenities: vec![],
        images: vec![],
        created_at: chrono::Utc::now(),
    };
    let q = BookingManager::quote(&room, date("2024-01-01"), date("2024-01-04"), &extras(20.0))
        .expect("quote");
    assert_eq!(q.nights, 3);
    assert_eq!(q.room_total, 300.0);
    assert_eq!(q.total_amount, 320.0);
}

#[test]
fn quote_rejects_non_positive_stay() {
    let room = Room {
        id: None,
        room_number: "101".to_string(),
        room_type: RoomType::Single,
        price_per_night: 100.0,
        discount: 0.0,
        status: RoomStatus::Available,
        description: None,
        amenities: vec![],
        images: vec![],
        created_at: chrono::Utc::now(),
    };
    let same_day = BookingManager::quote(&room, date("2024-01-01"), date("2024-01-01"), &[]);
    assert!(matches!(same_day, Err(AppError::Validation(_))));

    let backwards = BookingManager::quote(&room, date("2024-01-04"), date("2024-01-01"), &[]);
    assert!(matches!(backwards, Err(AppError::Validation(_))));
}

#[test]
fn quote_applies_room_discount() {
    let room = Room {
        id: None,
        room_number: "101".to_string(),
        room_type: RoomType::Suite,
        price_per_night: 200.0,
        discount: 10.0,
        status: RoomStatus::Available,
        description: None,
        amenities: vec![],
        images: vec![],
        created_at: chrono::Utc::now(),
    };
    let q = BookingManager::quote(&room, date("2024-01-01"), date("2024-01-03"), &[]).expect("quote");
    assert_eq!(q.total_amount, 360.0);
}

#[tokio::test]
async fn reserve_creates_confirmed_booking_with_paid_bill() {
    let f = fixture(MockGateway::with_succeeded("pi_1", 20000)).await;
    let room = seed_room(&f.db, "201", 100.0).await;

    let booking = f
        .manager
        .reserve(guest("alice"), create_req(&room, "2024-03-01", "2024-03-03", "pi_1"))
        .await
        .expect("reserve");

    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total_amount, 200.0);

    let bill = BillingRepository::new(f.db.db.clone())
        .find_by_booking_record(booking.id.as_ref().unwrap())
        .await
        .expect("bill query")
        .expect("bill exists");
    assert_eq!(bill.status, BillingStatus::Paid);
    assert_eq!(bill.paid_amount, 200.0);
    assert_eq!(bill.items.len(), 1);
    assert!(bill.items[0].description.contains("2 nights"));

    assert_eq!(
        f.publisher.events.lock().unwrap().as_slice(),
        ["new_booking"]
    );
}

#[tokio::test]
async fn reserve_rejects_unverified_payment() {
    let f = fixture(MockGateway::default()).await;
    f.gateway.seed("pi_pending", 20000, "requires_payment_method");
    let room = seed_room(&f.db, "202", 100.0).await;

    let err = f
        .manager
        .reserve(
            guest("alice"),
            create_req(&room, "2024-03-01", "2024-03-03", "pi_pending"),
        )
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::BusinessRule(_)));

    // Nothing persisted
    let bookings = BookingRepository::new(f.db.db.clone())
        .find_all()
        .await
        .expect("list");
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn reserve_rejects_overlapping_dates() {
    let f = fixture(MockGateway::with_succeeded("pi_1", 50000)).await;
    f.gateway.seed("pi_2", 40000, "succeeded");
    let room = seed_room(&f.db, "203", 100.0).await;

    f.manager
        .reserve(guest("alice"), create_req(&room, "2024-02-10", "2024-02-15", "pi_1"))
        .await
        .expect("first reservation");

    let err = f
        .manager
        .reserve(guest("bob"), create_req(&room, "2024-02-14", "2024-02-18", "pi_2"))
        .await
        .expect_err("overlap must be rejected");
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn reserve_allows_back_to_back_stays() {
    let f = fixture(MockGateway::with_succeeded("pi_1", 50000)).await;
    f.gateway.seed("pi_2", 40000, "succeeded");
    let room = seed_room(&f.db, "204", 100.0).await;

    f.manager
        .reserve(guest("alice"), create_req(&room, "2024-02-10", "2024-02-15", "pi_1"))
        .await
        .expect("first reservation");

    // Half-open intervals: checkout day equals next check-in day
    f.manager
        .reserve(guest("bob"), create_req(&room, "2024-02-15", "2024-02-18", "pi_2"))
        .await
        .expect("adjacent reservation");
}

#[tokio::test]
async fn reserve_rejects_second_active_booking_for_same_guest() {
    let f = fixture(MockGateway::with_succeeded("pi_1", 50000)).await;
    f.gateway.seed("pi_2", 40000, "succeeded");
    let room = seed_room(&f.db, "205", 100.0).await;

    f.manager
        .reserve(guest("alice"), create_req(&room, "2024-02-10", "2024-02-15", "pi_1"))
        .await
        .expect("first reservation");

    let err = f
        .manager
        .reserve(guest("alice"), create_req(&room, "2024-05-01", "2024-05-03", "pi_2"))
        .await
        .expect_err("second active booking must be rejected");
    assert!(matches!(err, AppError::Duplicate(_)));
}

#[tokio::test]
async fn cancel_refunds_and_frees_room() {
    let f = fixture(MockGateway::with_succeeded("pi_1", 20000)).await;
    let room = seed_room(&f.db, "206", 100.0).await;

    let booking = f
        .manager
        .reserve(guest("alice"), create_req(&room, "2024-03-01", "2024-03-03", "pi_1"))
        .await
        .expect("reserve");
    let booking_id = booking.id.as_ref().unwrap().to_string();

    let updated = f
        .manager
        .transition(&booking_id, BookingStatus::Cancelled, &guest("alice").to_string(), true)
        .await
        .expect("cancel");
    assert_eq!(updated.status, BookingStatus::Cancelled);
    assert_eq!(f.gateway.refund_count(), 1);

    let bill = BillingRepository::new(f.db.db.clone())
        .find_by_booking_record(booking.id.as_ref().unwrap())
        .await
        .expect("bill query")
        .expect("bill exists");
    assert_eq!(bill.status, BillingStatus::Refunded);
    assert_eq!(bill.paid_amount, 0.0);

    let room = RoomRepository::new(f.db.db.clone())
        .find_by_number("206")
        .await
        .expect("room query")
        .expect("room exists");
    assert_eq!(room.status, RoomStatus::Available);
}

#[tokio::test]
async fn refund_failure_does_not_block_cancellation() {
    let f = fixture(MockGateway {
        fail_refunds: true,
        ..MockGateway::default()
    })
    .await;
    f.gateway.seed("pi_1", 20000, "succeeded");
    let room = seed_room(&f.db, "207", 100.0).await;

    let booking = f
        .manager
        .reserve(guest("alice"), create_req(&room, "2024-03-01", "2024-03-03", "pi_1"))
        .await
        .expect("reserve");
    let booking_id = booking.id.as_ref().unwrap().to_string();

    let updated = f
        .manager
        .transition(&booking_id, BookingStatus::Rejected, "user:staff", false)
        .await
        .expect("rejection proceeds despite refund failure");
    assert_eq!(updated.status, BookingStatus::Rejected);

    // Billing untouched on refund failure
    let bill = BillingRepository::new(f.db.db.clone())
        .find_by_booking_record(booking.id.as_ref().unwrap())
        .await
        .expect("bill query")
        .expect("bill exists");
    assert_eq!(bill.status, BillingStatus::Paid);
}

#[tokio::test]
async fn cancel_without_intent_skips_refund() {
    let f = fixture(MockGateway::default()).await;
    let room = seed_room(&f.db, "210", 100.0).await;

    // Walk-in style record with no online payment behind it
    let booking = BookingRepository::new(f.db.db.clone())
        .create(Booking {
            id: None,
            user: guest("alice"),
            room: room.id.clone().unwrap(),
            check_in_date: date("2024-03-01"),
            check_out_date: date("2024-03-03"),
            total_amount: 200.0,
            payment_intent_id: None,
            status: BookingStatus::Confirmed,
            guests: 1,
            extras: vec![],
            special_requests: None,
            created_at: chrono::Utc::now(),
        })
        .await
        .expect("seed booking");
    let booking_id = booking.id.as_ref().unwrap().to_string();

    let updated = f
        .manager
        .transition(&booking_id, BookingStatus::Cancelled, "user:staff", false)
        .await
        .expect("cancel");
    assert_eq!(updated.status, BookingStatus::Cancelled);
    assert_eq!(f.gateway.refund_count(), 0);
}

#[tokio::test]
async fn already_refunded_reconciles_local_state() {
    let f = fixture(MockGateway {
        already_refunded: true,
        ..MockGateway::default()
    })
    .await;
    f.gateway.seed("pi_1", 20000, "succeeded");
    let room = seed_room(&f.db, "208", 100.0).await;

    let booking = f
        .manager
        .reserve(guest("alice"), create_req(&room, "2024-03-01", "2024-03-03", "pi_1"))
        .await
        .expect("reserve");
    let booking_id = booking.id.as_ref().unwrap().to_string();

    f.manager
        .transition(&booking_id, BookingStatus::Cancelled, "user:staff", false)
        .await
        .expect("cancel");

    let bill = BillingRepository::new(f.db.db.clone())
        .find_by_booking_record(booking.id.as_ref().unwrap())
        .await
        .expect("bill query")
        .expect("bill exists");
    assert_eq!(bill.status, BillingStatus::Refunded);
}

#[tokio::test]
async fn guest_cannot_touch_someone_elses_booking() {
    let f = fixture(MockGateway::with_succeeded("pi_1", 20000)).await;
    let room = seed_room(&f.db, "209", 100.0).await;

    let booking = f
        .manager
        .reserve(guest("alice"), create_req(&room, "2024-03-01", "2024-03-03", "pi_1"))
        .await
        .expect("reserve");
    let booking_id = booking.id.as_ref().unwrap().to_string();

    let err = f
        .manager
        .transition(&booking_id, BookingStatus::Cancelled, &guest("mallory").to_string(), true)
        .await
        .expect_err("other guests refused");
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = f
        .manager
        .transition(&booking_id, BookingStatus::CheckedIn, &guest("alice").to_string(), true)
        .await
        .expect_err("guests cannot check themselves in");
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn unavailable_ranges_lists_active_bookings() {
    let f = fixture(MockGateway::with_succeeded("pi_1", 50000)).await;
    f.gateway.seed("pi_2", 30000, "succeeded");
    let room = seed_room(&f.db, "210", 100.0).await;

    f.manager
        .reserve(guest("alice"), create_req(&room, "2024-02-10", "2024-02-15", "pi_1"))
        .await
        .expect("first reservation");
    f.manager
        .reserve(guest("bob"), create_req(&room, "2024-03-01", "2024-03-04", "pi_2"))
        .await
        .expect("second reservation");

    let mut ranges = f
        .manager
        .unavailable_ranges(&room.id.as_ref().unwrap().to_string())
        .await
        .expect("ranges");
    ranges.sort_by_key(|r| r.check_in_date);
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].check_in_date, date("2024-02-10"));
    assert_eq!(ranges[1].check_out_date, date("2024-03-04"));
}
