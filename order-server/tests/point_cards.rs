//! 点卡生命周期与兑换竞争测试

use order_server::db::repository::restaurant;
use order_server::{CardService, DbService};
use shared::models::CardStatus;

async fn setup() -> (tempfile::TempDir, DbService) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("order.db");
    let db = DbService::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("db init");
    (dir, db)
}

async fn seed_restaurant(db: &DbService, name: &str) -> String {
    restaurant::create(db.write(), name)
        .await
        .expect("create restaurant")
        .id
}

async fn points_of(db: &DbService, restaurant_id: &str) -> i64 {
    sqlx::query_scalar("SELECT points FROM restaurant WHERE id = ?")
        .bind(restaurant_id)
        .fetch_one(db.read())
        .await
        .expect("read points")
}

#[tokio::test]
async fn minting_creates_new_cards_with_the_requested_value() {
    let (_dir, db) = setup().await;
    let cards = CardService::new(db.clone());

    let minted = cards.create_cards(3, 500).await.expect("mint");
    assert_eq!(minted.len(), 3);
    assert!(minted.iter().all(|c| c.points == 500));
    assert!(minted.iter().all(|c| c.status == CardStatus::New));

    assert_eq!(cards.list_new().await.expect("list new").len(), 3);
    assert!(cards.list_used().await.expect("list used").is_empty());
}

#[tokio::test]
async fn mint_input_is_validated() {
    let (_dir, db) = setup().await;
    let cards = CardService::new(db.clone());

    assert!(cards.create_cards(0, 100).await.is_err());
    assert!(cards.create_cards(501, 100).await.is_err());
    assert!(cards.create_cards(5, 0).await.is_err());
    assert!(cards.create_cards(5, -10).await.is_err());
}

#[tokio::test]
async fn redeeming_adds_points_and_appends_one_recharge_log() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, "充值测试").await;
    let cards = CardService::new(db.clone());

    let before = points_of(&db, &restaurant_id).await;
    let minted = cards.create_cards(1, 800).await.expect("mint");

    let log = cards
        .redeem(&minted[0].id, &restaurant_id)
        .await
        .expect("redeem");
    assert_eq!(log.card_id, minted[0].id);
    assert_eq!(log.points_added, 800);

    assert_eq!(points_of(&db, &restaurant_id).await, before + 800);
    let logs = cards.recharge_logs(&restaurant_id).await.expect("logs");
    assert_eq!(logs.len(), 1);

    let used = cards.list_used().await.expect("used");
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].used_by.as_deref(), Some(restaurant_id.as_str()));
}

#[tokio::test]
async fn a_card_can_only_be_redeemed_once() {
    let (_dir, db) = setup().await;
    let restaurant_a = seed_restaurant(&db, "餐馆A").await;
    let restaurant_b = seed_restaurant(&db, "餐馆B").await;
    let cards = CardService::new(db.clone());
    let minted = cards.create_cards(1, 300).await.expect("mint");

    assert!(cards.redeem(&minted[0].id, &restaurant_a).await.is_ok());
    let second = cards.redeem(&minted[0].id, &restaurant_b).await;
    let err = second.expect_err("second redeem must fail");
    assert!(err.message.contains("已被"), "message: {}", err.message);

    // 输家不拿点
    let base: i64 = points_of(&db, &restaurant_b).await;
    assert_eq!(base, 1000);
}

#[tokio::test]
async fn concurrent_redeems_have_exactly_one_winner() {
    let (_dir, db) = setup().await;
    let cards = std::sync::Arc::new(CardService::new(db.clone()));
    let minted = cards.create_cards(1, 300).await.expect("mint");
    let card_id = minted[0].id.clone();

    let mut restaurant_ids = Vec::new();
    for i in 0..4 {
        restaurant_ids.push(seed_restaurant(&db, &format!("并发餐馆{i}")).await);
    }

    let mut handles = Vec::new();
    for restaurant_id in &restaurant_ids {
        let cards = cards.clone();
        let card_id = card_id.clone();
        let restaurant_id = restaurant_id.clone();
        handles.push(tokio::spawn(
            async move { cards.redeem(&card_id, &restaurant_id).await },
        ));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.expect("task join").is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    // 总点数只多了一张卡的面值
    let mut total = 0;
    for restaurant_id in &restaurant_ids {
        total += points_of(&db, restaurant_id).await;
    }
    assert_eq!(total, 4 * 1000 + 300);

    let log_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recharge_log")
        .fetch_one(db.read())
        .await
        .expect("log count");
    assert_eq!(log_count, 1);
}

#[tokio::test]
async fn only_unused_cards_can_be_deleted() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, "删卡测试").await;
    let cards = CardService::new(db.clone());
    let minted = cards.create_cards(2, 100).await.expect("mint");

    cards.delete_card(&minted[0].id).await.expect("delete new card");

    cards
        .redeem(&minted[1].id, &restaurant_id)
        .await
        .expect("redeem");
    let err = cards
        .delete_card(&minted[1].id)
        .await
        .expect_err("used card must be refused");
    assert_eq!(err.message, "不能删除已使用的点卡。");

    let missing = cards.delete_card("no-such-card").await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn unknown_card_is_a_not_found_error() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, "查无此卡").await;
    let cards = CardService::new(db.clone());

    let err = cards
        .redeem("missing-card", &restaurant_id)
        .await
        .expect_err("must fail");
    assert_eq!(err.message, "点卡代码无效或不存在。");
}
