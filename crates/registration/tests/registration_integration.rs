//! Integration tests for the shop-owner registration saga.

use domain::{Category, Role, ShopStatus};
use registration::{
    BcryptHasher, InMemoryCompensationLog, JwtTokenIssuer, ManualSagaStrategy,
    ProvisionAccountAndShop, RegisterShopOwner, RegistrationError, SagaCoordinator, SigningKeys,
    TransactionalStrategy,
};
use store::{AccountStore, CategoryStore, MemoryStore};

struct TestHarness<P: ProvisionAccountAndShop> {
    store: MemoryStore,
    log: InMemoryCompensationLog,
    coordinator: SagaCoordinator<MemoryStore, P, BcryptHasher, JwtTokenIssuer>,
}

fn issuer() -> JwtTokenIssuer {
    let keys = SigningKeys::new("it-access-secret", "it-refresh-secret").unwrap();
    JwtTokenIssuer::new(&keys)
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .insert_category(Category::new("Cafe & Coffee Shop", "Cafes"))
        .await
        .unwrap();
    store
}

async fn manual_harness() -> TestHarness<ManualSagaStrategy<MemoryStore, InMemoryCompensationLog>> {
    let store = seeded_store().await;
    let log = InMemoryCompensationLog::new();
    let coordinator = SagaCoordinator::new(
        store.clone(),
        ManualSagaStrategy::new(store.clone(), log.clone()),
        BcryptHasher::new(),
        issuer(),
    );
    TestHarness {
        store,
        log,
        coordinator,
    }
}

async fn transactional_harness() -> TestHarness<TransactionalStrategy<MemoryStore>> {
    let store = seeded_store().await;
    let coordinator = SagaCoordinator::new(
        store.clone(),
        TransactionalStrategy::new(store.clone()),
        BcryptHasher::new(),
        issuer(),
    );
    TestHarness {
        store,
        log: InMemoryCompensationLog::new(),
        coordinator,
    }
}

fn request(email: &str) -> RegisterShopOwner {
    RegisterShopOwner {
        shop_name: "The Morning Bean".to_string(),
        owner_name: "Linh Tran".to_string(),
        email: email.to_string(),
        password: "s3cret-pw".to_string(),
        phone: "0901234567".to_string(),
        address: "12 Nguyen Hue".to_string(),
        city: "Ho Chi Minh City".to_string(),
        city_code: "79".to_string(),
        district: "District 1".to_string(),
        district_code: "760".to_string(),
        ward: "Ben Nghe".to_string(),
        description: "Specialty coffee".to_string(),
        category_name: "Cafe & Coffee Shop".to_string(),
        website: Some("https://morningbean.example".to_string()),
        location: None,
    }
}

#[tokio::test]
async fn test_happy_path_manual_saga() {
    let h = manual_harness().await;

    let outcome = h
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await
        .unwrap();

    // Account and shop are linked and in their initial states.
    assert_eq!(outcome.account.role, Role::ShopOwner);
    assert!(outcome.account.active);
    assert_eq!(outcome.shop.owner_id, outcome.account.id);
    assert_eq!(outcome.shop.status, ShopStatus::Pending);

    // Both tokens decode under their own key and carry the identity.
    let iss = issuer();
    let access = iss.decode_access(&outcome.tokens.access_token).unwrap();
    let refresh = iss.decode_refresh(&outcome.tokens.refresh_token).unwrap();
    assert_eq!(access.sub, outcome.account.id.to_string());
    assert_eq!(access.shop_id, Some(outcome.shop.id.to_string()));
    assert_eq!(refresh.sub, access.sub);
    assert!(refresh.exp > access.exp);

    // No compensations ran on the happy path.
    assert!(h.log.is_empty());
    assert_eq!(h.store.account_count().await, 1);
    assert_eq!(h.store.shop_count().await, 1);
}

#[tokio::test]
async fn test_happy_path_transactional() {
    let h = transactional_harness().await;

    let outcome = h
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await
        .unwrap();

    assert_eq!(outcome.shop.owner_id, outcome.account.id);
    assert_eq!(h.store.account_count().await, 1);
    assert_eq!(h.store.shop_count().await, 1);
}

#[tokio::test]
async fn test_credential_stored_as_bcrypt_hash() {
    let h = manual_harness().await;
    h.coordinator
        .register_shop_owner(request("linh@example.com"))
        .await
        .unwrap();

    let account = h
        .store
        .find_account_by_email("linh@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(account.password_hash.starts_with("$2"));
    assert!(bcrypt::verify("s3cret-pw", &account.password_hash).unwrap());
}

#[tokio::test]
async fn test_unknown_category_writes_nothing() {
    let h = manual_harness().await;
    let mut req = request("linh@example.com");
    req.category_name = "Nonexistent".to_string();

    let result = h.coordinator.register_shop_owner(req).await;
    assert!(matches!(
        result,
        Err(RegistrationError::CategoryNotFound(_))
    ));
    assert_eq!(h.store.account_count().await, 0);
    assert_eq!(h.store.shop_count().await, 0);
}

#[tokio::test]
async fn test_shop_failure_compensates_manual_saga() {
    let h = manual_harness().await;
    h.store.set_fail_on_shop_insert(true).await;

    let result = h
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await;

    assert!(matches!(
        result,
        Err(RegistrationError::ShopCreationFailed(_))
    ));
    // The account created before the failure was rolled back.
    assert_eq!(h.store.account_count().await, 0);
    assert_eq!(h.log.len(), 1);
    assert!(!h.log.entries()[0].failed());
}

#[tokio::test]
async fn test_shop_failure_aborts_transaction() {
    let h = transactional_harness().await;
    h.store.set_fail_on_shop_insert(true).await;

    let result = h
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await;

    assert!(matches!(
        result,
        Err(RegistrationError::ShopCreationFailed(_))
    ));
    assert_eq!(h.store.account_count().await, 0);
    assert_eq!(h.store.shop_count().await, 0);
}

#[tokio::test]
async fn test_duplicate_email_both_strategies() {
    let manual = manual_harness().await;
    manual
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await
        .unwrap();
    let result = manual
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await;
    assert!(matches!(result, Err(RegistrationError::DuplicateEmail(_))));
    assert_eq!(manual.store.account_count().await, 1);

    let tx = transactional_harness().await;
    tx.coordinator
        .register_shop_owner(request("linh@example.com"))
        .await
        .unwrap();
    let result = tx
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await;
    assert!(matches!(result, Err(RegistrationError::DuplicateEmail(_))));
    assert_eq!(tx.store.account_count().await, 1);
}

#[tokio::test]
async fn test_concurrent_registrations_one_winner() {
    let h = manual_harness().await;

    let (a, b) = tokio::join!(
        h.coordinator
            .register_shop_owner(request("linh@example.com")),
        h.coordinator
            .register_shop_owner(request("linh@example.com")),
    );

    assert_eq!(a.is_ok() as usize + b.is_ok() as usize, 1);
    assert_eq!(h.store.account_count().await, 1);
    assert_eq!(h.store.shop_count().await, 1);
}

#[tokio::test]
async fn test_distinct_emails_register_independently() {
    let h = transactional_harness().await;

    let first = h
        .coordinator
        .register_shop_owner(request("a@example.com"))
        .await
        .unwrap();
    let second = h
        .coordinator
        .register_shop_owner(request("b@example.com"))
        .await
        .unwrap();

    assert_ne!(first.account.id, second.account.id);
    assert_ne!(first.shop.id, second.shop.id);
    assert_eq!(h.store.account_count().await, 2);
    assert_eq!(h.store.shop_count().await, 2);
}

#[tokio::test]
async fn test_reissue_tokens_for_registered_owner() {
    let h = manual_harness().await;
    let outcome = h
        .coordinator
        .register_shop_owner(request("linh@example.com"))
        .await
        .unwrap();

    let tokens = h
        .coordinator
        .reissue_tokens("Linh@Example.com", "s3cret-pw")
        .await
        .unwrap();

    let claims = issuer().decode_access(&tokens.access_token).unwrap();
    assert_eq!(claims.sub, outcome.account.id.to_string());
    assert_eq!(claims.shop_id, Some(outcome.shop.id.to_string()));
}
