use std::sync::Arc;

use axum::{ body::Body, http::{ header, Method, Request, StatusCode }, Router };
use serde_json::{ json, Value };
use tower::ServiceExt;

use trading_sim::api::{ router, AppState };
use trading_sim::crypto::SessionSigner;
use trading_sim::db::{ LedgerRepository, SessionRepository, UserRepository };
use trading_sim::enums::AdminRole;
use trading_sim::services::{ AuthService, SessionService };

const ADMIN_EMAIL: &str = "ops@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestApp {
    router: Router,
}

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    body: Value,
}

impl TestApp {
    async fn new() -> Self {
        let db = trading_sim::db::connect("sqlite::memory:").await.unwrap();

        AuthService::new(
            Arc::new(UserRepository::new(db.clone())),
            Arc::new(LedgerRepository::new(db.clone()))
        )
            .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD, AdminRole::Admin).await
            .unwrap();

        let sessions = SessionService::new(
            Arc::new(SessionRepository::new(db.clone())),
            SessionSigner::new(b"integration-secret-integration-secret").unwrap(),
            3600,
            false
        );

        Self { router: router(AppState::new(db, sessions)) }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>
    ) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) =>
                request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Reply { status, cookie, body }
    }

    async fn register(&self, username: &str) -> (String, String) {
        let reply = self.send(
            Method::POST,
            "/api/register",
            None,
            Some(
                json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "secret-pass",
            })
            )
        ).await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);

        let id = reply.body["id"].as_str().unwrap().to_string();
        (reply.cookie.unwrap(), id)
    }

    async fn admin_login(&self) -> String {
        let reply = self.send(
            Method::POST,
            "/api/admin/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        ).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);

        reply.cookie.unwrap()
    }

    async fn place_trade(&self, cookie: &str, symbol: &str, asset_type: &str) -> String {
        let reply = self.send(
            Method::POST,
            "/api/trades",
            Some(cookie),
            Some(
                json!({
                "symbol": symbol,
                "assetType": asset_type,
                "side": "buy",
                "orderType": "market",
                "quantity": 1,
                "price": 100,
            })
            )
        ).await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);

        reply.body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_place_trade_then_admin_approves() {
    let app = TestApp::new().await;
    let (user_cookie, _) = app.register("alice").await;
    let trade_id = app.place_trade(&user_cookie, "AAPL", "stock").await;

    let listed = app.send(Method::GET, "/api/trades", Some(&user_cookie), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let trades = listed.body.as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["id"], trade_id.as_str());
    assert_eq!(trades[0]["adminApproval"], "pending");
    assert_eq!(trades[0]["totalAmount"], "100");

    let admin_cookie = app.admin_login().await;
    let all = app.send(Method::GET, "/api/admin/trades", Some(&admin_cookie), None).await;
    assert_eq!(all.body[0]["username"], "alice");
    assert_eq!(all.body[0]["email"], "alice@example.com");

    let approved = app.send(
        Method::PATCH,
        &format!("/api/admin/trades/{}/approve", trade_id),
        Some(&admin_cookie),
        None
    ).await;
    assert_eq!(approved.status, StatusCode::OK, "{}", approved.body);

    let listed = app.send(Method::GET, "/api/trades", Some(&user_cookie), None).await;
    assert_eq!(listed.body[0]["adminApproval"], "approved");
    assert_eq!(listed.body[0]["status"], "approved");

    let holdings = app.send(Method::GET, "/api/holdings", Some(&user_cookie), None).await;
    assert_eq!(holdings.body[0]["symbol"], "AAPL");
    assert_eq!(holdings.body[0]["quantity"], "1");

    let again = app.send(
        Method::PATCH,
        &format!("/api/admin/trades/{}/approve", trade_id),
        Some(&admin_cookie),
        None
    ).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["error"]["code"], "INVALID_STATE");

    let holdings = app.send(Method::GET, "/api/holdings", Some(&user_cookie), None).await;
    assert_eq!(holdings.body[0]["quantity"], "1");
}

#[tokio::test]
async fn test_bulk_approve_reports_each_trade() {
    let app = TestApp::new().await;
    let (owner_cookie, owner_id) = app.register("bruno").await;
    let (other_cookie, _) = app.register("carla").await;

    let t1 = app.place_trade(&owner_cookie, "BTC", "crypto").await;
    let t2 = app.place_trade(&other_cookie, "BTC", "crypto").await;
    let t3 = app.place_trade(&owner_cookie, "MSFT", "stock").await;

    let admin_cookie = app.admin_login().await;
    let reply = app.send(
        Method::POST,
        &format!("/api/admin/user/{}/trades/approve", owner_id),
        Some(&admin_cookie),
        Some(json!({ "tradeIds": [t1, t2, t3] }))
    ).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["approved"], 2);

    let outcomes: Vec<&str> = reply.body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["outcome"].as_str().unwrap())
        .collect();
    assert_eq!(outcomes, vec!["approved", "notFound", "approved"]);

    let other_trades = app.send(Method::GET, "/api/trades", Some(&other_cookie), None).await;
    assert_eq!(other_trades.body[0]["adminApproval"], "pending");
}

#[tokio::test]
async fn test_bulk_approve_reports_failed_sell() {
    let app = TestApp::new().await;
    let (cookie, user_id) = app.register("dario").await;

    let buy = app.place_trade(&cookie, "ETH", "crypto").await;
    let sell = app.send(
        Method::POST,
        "/api/trades",
        Some(&cookie),
        Some(
            json!({
            "symbol": "DOGE",
            "assetType": "crypto",
            "side": "sell",
            "quantity": "3",
            "price": "0.2",
        })
        )
    ).await;
    assert_eq!(sell.status, StatusCode::CREATED, "{}", sell.body);
    let sell = sell.body["id"].as_str().unwrap().to_string();
    let stock = app.place_trade(&cookie, "IBM", "stock").await;

    let admin_cookie = app.admin_login().await;
    let reply = app.send(
        Method::POST,
        &format!("/api/admin/user/{}/trades/approve", user_id),
        Some(&admin_cookie),
        Some(json!({ "tradeIds": [buy, sell, stock] }))
    ).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["approved"], 2);

    let failed = &reply.body["results"][1];
    assert_eq!(failed["id"], sell.as_str());
    assert_eq!(failed["outcome"], "error");
    assert_eq!(failed["code"], "INSUFFICIENT_HOLDINGS");

    let trades = app.send(Method::GET, "/api/trades", Some(&cookie), None).await;
    let pending: Vec<&str> = trades.body
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["adminApproval"] == "pending")
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(pending, vec![sell.as_str()]);
}

#[tokio::test]
async fn test_deposit_rejection_requires_reason() {
    let app = TestApp::new().await;
    let (user_cookie, _) = app.register("dora").await;
    let admin_cookie = app.admin_login().await;

    let address = app.send(
        Method::POST,
        "/api/admin/crypto-addresses",
        Some(&admin_cookie),
        Some(
            json!({
            "symbol": "BTC",
            "name": "Bitcoin",
            "address": "bc1qplatform",
            "network": "Bitcoin",
        })
        )
    ).await;
    assert_eq!(address.status, StatusCode::CREATED, "{}", address.body);

    let public = app.send(Method::GET, "/api/crypto-addresses", Some(&user_cookie), None).await;
    assert_eq!(public.body.as_array().unwrap().len(), 1);

    let deposit = app.send(
        Method::POST,
        "/api/deposit-requests",
        Some(&user_cookie),
        Some(json!({ "cryptoType": "BTC", "amount": "0.5", "usdValue": "30000" }))
    ).await;
    assert_eq!(deposit.status, StatusCode::CREATED, "{}", deposit.body);
    assert_eq!(deposit.body["depositAddress"], "bc1qplatform");
    let deposit_id = deposit.body["id"].as_str().unwrap().to_string();
    let reject_uri = format!("/api/admin/deposit-requests/{}/reject", deposit_id);

    let no_body = app.send(Method::PATCH, &reject_uri, Some(&admin_cookie), None).await;
    assert_eq!(no_body.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_body.body["error"]["field"], "rejectionReason");

    let blank = app.send(
        Method::PATCH,
        &reject_uri,
        Some(&admin_cookie),
        Some(json!({ "rejectionReason": "" }))
    ).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let rejected = app.send(
        Method::PATCH,
        &reject_uri,
        Some(&admin_cookie),
        Some(json!({ "rejectionReason": "Transaction not found on chain" }))
    ).await;
    assert_eq!(rejected.status, StatusCode::OK, "{}", rejected.body);
    assert_eq!(rejected.body["status"], "rejected");

    let pending = app.send(
        Method::GET,
        "/api/admin/deposit-requests?status=pending",
        Some(&admin_cookie),
        None
    ).await;
    assert!(pending.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deposit_approval_credits_wallet() {
    let app = TestApp::new().await;
    let (user_cookie, _) = app.register("eddie").await;
    let admin_cookie = app.admin_login().await;

    app.send(
        Method::POST,
        "/api/admin/crypto-addresses",
        Some(&admin_cookie),
        Some(json!({ "symbol": "ETH", "name": "Ether", "address": "0xplatform", "network": "ERC20" }))
    ).await;
    let deposit = app.send(
        Method::POST,
        "/api/deposit-requests",
        Some(&user_cookie),
        Some(json!({ "cryptoType": "eth", "amount": 2, "usdValue": 6000 }))
    ).await;
    let deposit_id = deposit.body["id"].as_str().unwrap().to_string();

    let approved = app.send(
        Method::PATCH,
        &format!("/api/admin/deposit-requests/{}/approve", deposit_id),
        Some(&admin_cookie),
        Some(json!({ "notes": "confirmed" }))
    ).await;
    assert_eq!(approved.status, StatusCode::OK, "{}", approved.body);
    assert_eq!(approved.body["status"], "approved");

    let wallets = app.send(Method::GET, "/api/wallets", Some(&user_cookie), None).await;
    assert_eq!(wallets.body[0]["symbol"], "ETH");
    assert_eq!(wallets.body[0]["balance"], "2");
    assert_eq!(wallets.body[0]["usdValue"], "6000");

    let logs = app.send(Method::GET, "/api/admin/logs?limit=10", Some(&admin_cookie), None).await;
    let actions: Vec<&str> = logs.body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"approve_deposit"));
    assert!(actions.contains(&"create_crypto_address"));
}

#[tokio::test]
async fn test_admin_balance_adjustment() {
    let app = TestApp::new().await;
    let (user_cookie, user_id) = app.register("fiona").await;
    let admin_cookie = app.admin_login().await;
    let uri = format!("/api/admin/users/{}/balance", user_id);

    let added = app.send(
        Method::PATCH,
        &uri,
        Some(&admin_cookie),
        Some(json!({ "amount": 100, "type": "add" }))
    ).await;
    assert_eq!(added.status, StatusCode::OK, "{}", added.body);
    assert_eq!(added.body["totalBalance"], "100");

    let profit = app.send(
        Method::PATCH,
        &uri,
        Some(&admin_cookie),
        Some(json!({ "amount": "25.5", "type": "profit" }))
    ).await;
    assert_eq!(profit.body["totalBalance"], "125.5");
    assert_eq!(profit.body["totalProfitLoss"], "25.5");

    let removed = app.send(
        Method::PATCH,
        &uri,
        Some(&admin_cookie),
        Some(json!({ "amount": 1000, "type": "remove" }))
    ).await;
    assert_eq!(removed.body["totalBalance"], "0");

    let portfolio = app.send(Method::GET, "/api/portfolio", Some(&user_cookie), None).await;
    assert_eq!(portfolio.body["totalBalance"], "0");

    let stats = app.send(Method::GET, "/api/admin/stats", Some(&admin_cookie), None).await;
    assert_eq!(stats.body["totalUsers"], 1);
    assert_eq!(stats.body["totalBalance"], "0");
}

#[tokio::test]
async fn test_malformed_bodies_get_error_envelope() {
    let app = TestApp::new().await;
    let (cookie, _) = app.register("hilda").await;

    let wrong_type = app.send(
        Method::POST,
        "/api/trades",
        Some(&cookie),
        Some(json!({ "symbol": "AAPL", "side": "buy", "quantity": "abc", "price": 10 }))
    ).await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["error"]["code"], "INVALID_INPUT");
    assert!(wrong_type.body["error"]["message"].as_str().unwrap().contains("quantity"));

    let oversized = app.send(
        Method::POST,
        "/api/trades",
        Some(&cookie),
        Some(
            json!({
            "symbol": "AAPL",
            "side": "buy",
            "quantity": "100000000000000000000",
            "price": "100000000000000000000",
        })
        )
    ).await;
    assert_eq!(oversized.status, StatusCode::BAD_REQUEST);
    assert_eq!(oversized.body["error"]["message"], "Amount out of range");

    let trade_id = app.place_trade(&cookie, "AAPL", "stock").await;
    let admin_cookie = app.admin_login().await;
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/api/admin/trades/{}/approve", trade_id))
        .header(header::COOKIE, admin_cookie.as_str())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"notes\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let trades = app.send(Method::GET, "/api/trades", Some(&cookie), None).await;
    assert_eq!(trades.body[0]["adminApproval"], "pending");
}

#[tokio::test]
async fn test_access_control() {
    let app = TestApp::new().await;
    let (user_cookie, user_id) = app.register("gus").await;

    let anonymous = app.send(Method::GET, "/api/trades", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forged = app.send(Method::GET, "/api/user", Some("sid=deadbeef.00"), None).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    let not_admin = app.send(Method::GET, "/api/admin/trades", Some(&user_cookie), None).await;
    assert_eq!(not_admin.status, StatusCode::UNAUTHORIZED);

    let admin_cookie = app.admin_login().await;
    let admin_only = app.send(Method::GET, "/api/user", Some(&admin_cookie), None).await;
    assert_eq!(admin_only.status, StatusCode::UNAUTHORIZED);

    let deactivated = app.send(
        Method::PATCH,
        &format!("/api/admin/users/{}/status", user_id),
        Some(&admin_cookie),
        Some(json!({ "isActive": false }))
    ).await;
    assert_eq!(deactivated.status, StatusCode::OK, "{}", deactivated.body);

    let locked_out = app.send(Method::GET, "/api/user", Some(&user_cookie), None).await;
    assert_eq!(locked_out.status, StatusCode::FORBIDDEN);

    let logout = app.send(Method::POST, "/api/logout", Some(&admin_cookie), None).await;
    assert_eq!(logout.status, StatusCode::OK);
    let after = app.send(Method::GET, "/api/admin/me", Some(&admin_cookie), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_attaches_admin_for_shared_email() {
    let app = TestApp::new().await;

    let registered = app.send(
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "ops", "email": ADMIN_EMAIL, "password": "user-password" }))
    ).await;
    assert_eq!(registered.status, StatusCode::CREATED);

    let login = app.send(
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "ops", "password": "user-password" }))
    ).await;
    assert_eq!(login.status, StatusCode::OK, "{}", login.body);
    assert_eq!(login.body["isAdmin"], true);
    let cookie = login.cookie.unwrap();

    let me = app.send(Method::GET, "/api/admin/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], ADMIN_EMAIL);

    app.send(Method::POST, "/api/admin/logout", Some(&cookie), None).await;
    let me = app.send(Method::GET, "/api/admin/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    let user = app.send(Method::GET, "/api/user", Some(&cookie), None).await;
    assert_eq!(user.status, StatusCode::OK);

    let bad = app.send(
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "ops", "password": "wrong" }))
    ).await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
}
