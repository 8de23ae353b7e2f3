//! 资源版本键集成测试
//!
//! 写路径提交后按餐馆粒度递增版本号；轮询客户端只凭这些键
//! 判断哪些缓存需要重拉，漏掉的键就是永远不刷新的面板。

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use order_server::core::ResourceVersions;
use order_server::db::repository::restaurant;
use order_server::{
    CardService, Config, DbService, JwtService, OrderEngine, Role, ServerState, SettingsService,
};

async fn setup() -> (tempfile::TempDir, ServerState) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("order.db");
    let db = DbService::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("db init");

    let config = Config::from_env();
    let settings = SettingsService::new(db.clone(), 0);
    let state = ServerState {
        jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
        orders: OrderEngine::new(db.clone(), settings.clone(), config.business_timezone),
        cards: CardService::new(db.clone()),
        settings,
        db,
        config,
        resource_versions: Arc::new(ResourceVersions::new()),
    };
    (dir, state)
}

fn app(state: &ServerState) -> axum::Router {
    order_server::api::router(state.clone()).layer(axum::middleware::from_fn_with_state(
        state.clone(),
        order_server::auth::authenticate,
    ))
}

fn admin_request(method: &str, uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn redeeming_a_card_bumps_the_restaurant_and_its_recharge_logs() {
    let (_dir, state) = setup().await;
    let restaurant_id = restaurant::create(state.db.write(), "测试餐馆")
        .await
        .expect("create restaurant")
        .id;
    let card = state
        .cards
        .create_cards(1, 300)
        .await
        .expect("mint card")
        .remove(0);
    let token = state
        .jwt_service
        .generate_token(&restaurant_id, Role::Admin)
        .expect("token");

    let response = app(&state)
        .oneshot(admin_request(
            "POST",
            &format!("/api/restaurants/{restaurant_id}/recharge"),
            &token,
            &format!(r#"{{"card_id":"{}"}}"#, card.id),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let versions = &state.resource_versions;
    assert_eq!(versions.get(&format!("restaurant:{restaurant_id}")), 1);
    assert_eq!(versions.get(&format!("recharge_logs:{restaurant_id}")), 1);
    assert_eq!(versions.get("point_cards"), 1);
    assert_eq!(versions.get("restaurants"), 1);
}

#[tokio::test]
async fn dish_and_settings_writes_bump_per_restaurant_keys() {
    let (_dir, state) = setup().await;
    let restaurant_id = restaurant::create(state.db.write(), "测试餐馆")
        .await
        .expect("create restaurant")
        .id;
    let token = state
        .jwt_service
        .generate_token(&restaurant_id, Role::Admin)
        .expect("token");

    let response = app(&state)
        .oneshot(admin_request(
            "POST",
            &format!("/api/restaurants/{restaurant_id}/dishes"),
            &token,
            r#"{"name":"麻婆豆腐","price":28.0,"category":"热菜"}"#,
        ))
        .await
        .expect("dish response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state)
        .oneshot(admin_request(
            "PUT",
            &format!("/api/restaurants/{restaurant_id}/settings"),
            &token,
            r#"{"is_restaurant_closed":true}"#,
        ))
        .await
        .expect("settings response");
    assert_eq!(response.status(), StatusCode::OK);

    let versions = &state.resource_versions;
    assert_eq!(versions.get(&format!("dishes:{restaurant_id}")), 1);
    assert_eq!(versions.get(&format!("settings:{restaurant_id}")), 1);
    // 粗粒度键不再使用
    assert_eq!(versions.get("dishes"), 0);
    assert_eq!(versions.get("settings"), 0);
}
