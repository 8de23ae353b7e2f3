//! 下单引擎集成测试
//!
//! 临时文件 SQLite 上跑完整事务路径：扣点竞争、原子性、
//! 打烊优先级、幂等重放和改单隔离。

use order_server::db::repository::restaurant;
use order_server::{DbService, OrderEngine, SettingsService};
use shared::models::{Dish, OrderItem, PlaceOrderInput};

const TZ: chrono_tz::Tz = chrono_tz::Asia::Shanghai;

async fn setup() -> (tempfile::TempDir, DbService) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("order.db");
    let db = DbService::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("db init");
    (dir, db)
}

fn engine(db: &DbService) -> OrderEngine {
    // 缓存 TTL 取 0，设置改动立即可见
    OrderEngine::new(db.clone(), SettingsService::new(db.clone(), 0), TZ)
}

/// 新建餐馆并把自动打烊窗口设为空（start == end），测试不受跑测时刻影响
async fn seed_restaurant(db: &DbService, points: i64) -> String {
    let row = restaurant::create(db.write(), "测试餐馆")
        .await
        .expect("create restaurant");
    sqlx::query("UPDATE restaurant SET points = ? WHERE id = ?")
        .bind(points)
        .bind(&row.id)
        .execute(db.write())
        .await
        .expect("set points");
    sqlx::query(
        "UPDATE app_settings SET auto_close_start_time = '00:00', auto_close_end_time = '00:00' \
         WHERE restaurant_id = ?",
    )
    .bind(&row.id)
    .execute(db.write())
    .await
    .expect("neutralize window");
    row.id
}

fn sample_dish(restaurant_id: &str, id: &str, name: &str) -> Dish {
    Dish {
        id: id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        name: name.to_string(),
        price: 28.0,
        category: "热菜".to_string(),
        sort_order: 0,
        is_recommended: false,
    }
}

fn order_input(restaurant_id: &str, request_id: Option<&str>) -> PlaceOrderInput {
    PlaceOrderInput {
        restaurant_id: restaurant_id.to_string(),
        table_id: "t-5".to_string(),
        table_number: "5".to_string(),
        order: vec![OrderItem {
            dish: sample_dish(restaurant_id, "dish-1", "麻婆豆腐"),
            quantity: 2,
        }],
        total: 56.0,
        client_request_id: request_id.map(str::to_string),
    }
}

async fn points_of(db: &DbService, restaurant_id: &str) -> i64 {
    sqlx::query_scalar("SELECT points FROM restaurant WHERE id = ?")
        .bind(restaurant_id)
        .fetch_one(db.read())
        .await
        .expect("read points")
}

async fn order_count(db: &DbService, restaurant_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM placed_order WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .fetch_one(db.read())
        .await
        .expect("count orders")
}

#[tokio::test]
async fn placing_an_order_charges_one_point_and_writes_both_ledgers() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    let engine = engine(&db);

    let result = engine.place_order(order_input(&restaurant_id, None)).await;
    assert!(result.error.is_none(), "unexpected error: {:?}", result.error);
    let order = result.order.expect("order present");
    assert_eq!(order.restaurant_id, restaurant_id);
    assert_eq!(order.table_number, "5");

    assert_eq!(points_of(&db, &restaurant_id).await, 999);

    let point_count: i64 =
        sqlx::query_scalar("SELECT count FROM point_log WHERE restaurant_id = ?")
            .bind(&restaurant_id)
            .fetch_one(db.read())
            .await
            .expect("point log row");
    assert_eq!(point_count, 1);

    let counts_json: String =
        sqlx::query_scalar("SELECT counts FROM dish_order_log WHERE restaurant_id = ?")
            .bind(&restaurant_id)
            .fetch_one(db.read())
            .await
            .expect("dish log row");
    let counts: std::collections::HashMap<String, i64> =
        serde_json::from_str(&counts_json).expect("counts json");
    assert_eq!(counts.get("dish-1"), Some(&2));
}

#[tokio::test]
async fn last_point_race_has_exactly_one_winner() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1).await;
    let engine = std::sync::Arc::new(engine(&db));

    let mut handles = Vec::new();
    for i in 0..5 {
        let engine = engine.clone();
        let restaurant_id = restaurant_id.clone();
        handles.push(tokio::spawn(async move {
            let request_id = format!("race-{i}");
            engine
                .place_order(order_input(&restaurant_id, Some(&request_id)))
                .await
        }));
    }

    let mut winners = 0;
    let mut exhausted = 0;
    for handle in handles {
        let result = handle.await.expect("task join");
        if result.order.is_some() && result.error.is_none() {
            winners += 1;
        } else {
            assert_eq!(result.error_code, Some(4003), "loser must be a points rejection");
            exhausted += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(exhausted, 4);
    assert_eq!(points_of(&db, &restaurant_id).await, 0);
    assert_eq!(order_count(&db, &restaurant_id).await, 1);
}

#[tokio::test]
async fn rejection_writes_nothing() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    sqlx::query("UPDATE app_settings SET is_restaurant_closed = 1 WHERE restaurant_id = ?")
        .bind(&restaurant_id)
        .execute(db.write())
        .await
        .expect("close restaurant");
    let engine = engine(&db);

    let result = engine.place_order(order_input(&restaurant_id, None)).await;
    assert_eq!(result.error_code, Some(4004));
    assert!(result.is_rejection());
    assert!(result.order.is_none());

    assert_eq!(points_of(&db, &restaurant_id).await, 1000);
    assert_eq!(order_count(&db, &restaurant_id).await, 0);
    let ledger_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM point_log")
        .fetch_one(db.read())
        .await
        .expect("ledger count");
    assert_eq!(ledger_rows, 0);
}

#[tokio::test]
async fn manual_closure_wins_over_the_auto_close_window() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    // 全天候窗口 + 手动打烊同时生效，应报打烊而不是休息时间
    sqlx::query(
        "UPDATE app_settings SET is_restaurant_closed = 1, \
         auto_close_start_time = '00:00', auto_close_end_time = '23:59' \
         WHERE restaurant_id = ?",
    )
    .bind(&restaurant_id)
    .execute(db.write())
    .await
    .expect("close + window");
    let engine = engine(&db);

    let result = engine.place_order(order_input(&restaurant_id, None)).await;
    assert_eq!(result.error_code, Some(4004));
    assert_eq!(result.error.as_deref(), Some("抱歉，本店已打烊，暂时无法下单。"));
}

#[tokio::test]
async fn a_failing_late_write_rolls_back_the_whole_transaction() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;

    // 让事务尾部的菜品日账本写入撞上缺失的表
    sqlx::query("DROP TABLE dish_order_log")
        .execute(db.write())
        .await
        .expect("drop ledger table");

    let result = engine(&db).place_order(order_input(&restaurant_id, None)).await;
    assert_eq!(result.error_code, Some(9001));
    assert!(!result.is_rejection());
    assert!(result.order.is_none());

    // 此前已执行的订单插入和扣点必须一并回滚
    assert_eq!(points_of(&db, &restaurant_id).await, 1000);
    assert_eq!(order_count(&db, &restaurant_id).await, 0);
    let point_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM point_log WHERE restaurant_id = ?")
            .bind(&restaurant_id)
            .fetch_one(db.read())
            .await
            .expect("count point logs");
    assert_eq!(point_rows, 0);
}

#[tokio::test]
async fn auto_close_window_rejection_names_both_times() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;

    // 围绕当前时刻织一个小窗口，跨午夜也由分钟运算兜住
    let now_min = {
        use chrono::Timelike;
        let now = chrono::Utc::now().with_timezone(&TZ);
        now.hour() * 60 + now.minute()
    };
    let start = (now_min + 1440 - 2) % 1440;
    let end = (now_min + 3) % 1440;
    let start_str = format!("{:02}:{:02}", start / 60, start % 60);
    let end_str = format!("{:02}:{:02}", end / 60, end % 60);

    sqlx::query(
        "UPDATE app_settings SET auto_close_start_time = ?, auto_close_end_time = ? \
         WHERE restaurant_id = ?",
    )
    .bind(&start_str)
    .bind(&end_str)
    .bind(&restaurant_id)
    .execute(db.write())
    .await
    .expect("set window");

    let result = engine(&db).place_order(order_input(&restaurant_id, None)).await;
    assert_eq!(result.error_code, Some(4006));
    let message = result.error.expect("rejection message");
    assert!(message.contains(&start_str), "message: {message}");
    assert!(message.contains(&end_str), "message: {message}");
    assert_eq!(order_count(&db, &restaurant_id).await, 0);
}

#[tokio::test]
async fn online_ordering_switch_rejects_with_its_own_code() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    sqlx::query("UPDATE app_settings SET is_online_ordering_disabled = 1 WHERE restaurant_id = ?")
        .bind(&restaurant_id)
        .execute(db.write())
        .await
        .expect("disable online");
    let engine = engine(&db);

    let result = engine.place_order(order_input(&restaurant_id, None)).await;
    assert_eq!(result.error_code, Some(4005));
}

#[tokio::test]
async fn duplicate_request_id_replays_the_original_order() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    let engine = engine(&db);

    let first = engine
        .place_order(order_input(&restaurant_id, Some("req-1")))
        .await;
    let second = engine
        .place_order(order_input(&restaurant_id, Some("req-1")))
        .await;

    let first_order = first.order.expect("first order");
    let second_order = second.order.expect("replayed order");
    assert_eq!(first_order.id, second_order.id);
    // 重放不再扣点
    assert_eq!(points_of(&db, &restaurant_id).await, 999);
    assert_eq!(order_count(&db, &restaurant_id).await, 1);
}

#[tokio::test]
async fn daily_ledger_accumulates_across_orders() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    let engine = engine(&db);

    for i in 0..3 {
        let request_id = format!("day-{i}");
        let result = engine
            .place_order(order_input(&restaurant_id, Some(&request_id)))
            .await;
        assert!(result.error.is_none());
    }

    let (rows, count): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), MAX(count) FROM point_log WHERE restaurant_id = ?",
    )
    .bind(&restaurant_id)
    .fetch_one(db.read())
    .await
    .expect("ledger row");
    assert_eq!(rows, 1, "same day shares one ledger row");
    assert_eq!(count, 3);

    let counts_json: String =
        sqlx::query_scalar("SELECT counts FROM dish_order_log WHERE restaurant_id = ?")
            .bind(&restaurant_id)
            .fetch_one(db.read())
            .await
            .expect("dish log row");
    let counts: std::collections::HashMap<String, i64> =
        serde_json::from_str(&counts_json).expect("counts json");
    assert_eq!(counts.get("dish-1"), Some(&6));
}

#[tokio::test]
async fn updating_an_order_never_touches_points_or_ledgers() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    let engine = engine(&db);

    let placed = engine
        .place_order(order_input(&restaurant_id, None))
        .await
        .order
        .expect("placed");

    let mut items = placed.order.clone();
    items.push(OrderItem {
        dish: sample_dish(&restaurant_id, "dish-2", "宫保鸡丁"),
        quantity: 1,
    });
    let updated = engine
        .update_order(&restaurant_id, &placed.id, &items, 90.0)
        .await;
    let updated_order = updated.order.expect("updated order");
    assert_eq!(updated_order.order.len(), 2);
    assert_eq!(updated_order.total, 90.0);

    // 一单一点在下单时已结清
    assert_eq!(points_of(&db, &restaurant_id).await, 999);
    let point_count: i64 =
        sqlx::query_scalar("SELECT count FROM point_log WHERE restaurant_id = ?")
            .bind(&restaurant_id)
            .fetch_one(db.read())
            .await
            .expect("point log row");
    assert_eq!(point_count, 1);
}

#[tokio::test]
async fn updating_a_missing_order_is_a_structured_rejection() {
    let (_dir, db) = setup().await;
    let restaurant_id = seed_restaurant(&db, 1000).await;
    let engine = engine(&db);

    let result = engine
        .update_order(
            &restaurant_id,
            "no-such-order",
            &order_input(&restaurant_id, None).order,
            56.0,
        )
        .await;
    assert_eq!(result.error_code, Some(4001));
    assert!(result.is_rejection());
}

#[tokio::test]
async fn input_validation_rejects_before_touching_the_store() {
    let (_dir, db) = setup().await;
    let engine = engine(&db);

    let missing = engine.place_order(order_input("", None)).await;
    assert_eq!(missing.error_code, Some(3002));

    let mut empty = order_input("some-restaurant", None);
    empty.order.clear();
    let empty = engine.place_order(empty).await;
    assert_eq!(empty.error_code, Some(4002));

    let unknown = engine.place_order(order_input("ghost", None)).await;
    assert_eq!(unknown.error_code, Some(3001));
    assert_eq!(unknown.error.as_deref(), Some("餐馆不存在。"));
}
