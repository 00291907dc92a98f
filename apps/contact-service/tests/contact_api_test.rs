//! # Contact API の統合テスト
//!
//! ルーター全体（レイヤー込み）に `oneshot` でリクエストを送り、
//! ステータス・エンベロープ・送信されたメールを検証する。

mod helpers;

use std::net::SocketAddr;

use axum::{
    body::{Body, to_bytes},
    extract::ConnectInfo,
};
use helpers::{FROM_ADDRESS, INTERNAL_RECIPIENT, TestAppBuilder};
use http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn contact_body() -> Value {
    json!({
        "name": "Priya Raman",
        "email": "priya@example.com",
        "subject": "Sales",
        "message": "Please send a quote.\nThanks!"
    })
}

#[tokio::test]
async fn test_問い合わせを受け付けて2通送信する() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/contact", contact_body().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Your message has been sent successfully. We will contact you soon!",
            "data": { "internal": "delivered", "auto_reply": "delivered" }
        })
    );

    let sent = sender.sent_emails();
    assert_eq!(sent.len(), 2);
    let internal = sent
        .iter()
        .find(|email| email.to == vec![INTERNAL_RECIPIENT.to_string()])
        .unwrap();
    assert_eq!(internal.subject, "New Contact Form Submission: Sales");
    assert_eq!(internal.reply_to.as_deref(), Some("priya@example.com"));
    assert!(internal.html_body.contains("Please send a quote.<br>Thanks!"));
    assert!(internal.html_body.contains("January 05, 2026 at 03:04 PM"));
    let auto_reply = sent
        .iter()
        .find(|email| email.to == vec!["priya@example.com".to_string()])
        .unwrap();
    assert_eq!(auto_reply.subject, "Thank you for contacting SysDak - Sales");
}

#[tokio::test]
async fn test_自動返信が失敗しても成功を返す() {
    let builder = TestAppBuilder::new();
    builder.sender().fail_for("priya@example.com");

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/contact", contact_body().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"],
        json!({ "internal": "delivered", "auto_reply": "failed" })
    );
}

#[tokio::test]
async fn test_社内通知が失敗したら500を返す() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();
    sender.fail_for(INTERNAL_RECIPIENT);

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/contact", contact_body().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to send email. Please try again." })
    );
    assert_eq!(sender.attempts().len(), 2);
}

#[rstest]
#[case(
    json!({ "name": "", "email": "priya@example.com", "subject": "Sales" }),
    "name is required; message is required"
)]
#[case(
    json!({ "name": "Priya", "email": "priya@", "subject": "Sales", "message": "Hi" }),
    "Invalid email format"
)]
#[case(
    json!({ "name": "Priya", "email": "priya@example.com", "subject": "Sales", "message": "<script>alert(1)</script>" }),
    "Invalid content detected in message"
)]
#[tokio::test]
async fn test_検証エラーは400で違反を返し送信しない(
    #[case] request: Value,
    #[case] expected: &str,
) {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/contact", request.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": expected }));
    assert!(sender.attempts().is_empty());
}

#[tokio::test]
async fn test_nullのフィールドは必須エラーとして400を返す() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();
    let body = json!({
        "name": null,
        "email": "priya@example.com",
        "subject": "Sales",
        "message": "Hi"
    });

    let (status, _, body) = send(builder.build(), post_json("/api/contact", body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "name is required" }));
    assert!(sender.attempts().is_empty());
}

#[tokio::test]
async fn test_jsonでないボディは400を返す() {
    let (status, _, body) = send(
        TestAppBuilder::new().build(),
        post_json("/api/contact", "name=Priya"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");
}

#[tokio::test]
async fn test_16kibを超えるボディは413を返す() {
    let oversized = json!({
        "name": "Priya",
        "email": "priya@example.com",
        "subject": "Sales",
        "message": "a".repeat(17 * 1024)
    });

    let (status, _, body) = send(
        TestAppBuilder::new().build(),
        post_json("/api/contact", oversized.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Request too large" })
    );
}

#[tokio::test]
async fn test_送信設定がなければ500を返す() {
    let builder = TestAppBuilder::new().without_email_config();

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/contact", contact_body().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Email service not configured" })
    );
}

#[tokio::test]
async fn test_テストメールは指定アドレスへ送信する() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/test-email", json!({ "email": "ops@sysdak.com" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Test email sent successfully to ops@sysdak.com" })
    );
    let sent = sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "SysDak Email Service Test");
}

#[tokio::test]
async fn test_テストメールの宛先を省略すると送信元へ送る() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();

    let (status, _, body) = send(builder.build(), post_json("/api/test-email", "{}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Test email sent successfully to {FROM_ADDRESS}")
    );
    assert_eq!(sender.sent_emails()[0].to, vec![FROM_ADDRESS.to_string()]);
}

#[rstest]
#[case::no_domain(json!({ "email": "ops" }))]
#[case::empty(json!({ "email": "" }))]
#[case::blank(json!({ "email": "   " }))]
#[case::padded(json!({ "email": " ops@sysdak.com " }))]
#[case::null(json!({ "email": null }))]
#[tokio::test]
async fn test_テストメールの宛先が不正なら400を返し送信元へは送らない(#[case] request: Value) {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/test-email", request.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email address");
    assert!(sender.attempts().is_empty());
}

#[tokio::test]
async fn test_テストメールの送信失敗は500を返す() {
    let builder = TestAppBuilder::new();
    builder.sender().fail_for("ops@sysdak.com");

    let (status, _, body) = send(
        builder.build(),
        post_json("/api/test-email", json!({ "email": "ops@sysdak.com" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to send test email");
}

#[tokio::test]
async fn test_ヘルスチェックは送信設定の有無を返す() {
    let request = || {
        Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap()
    };

    let (status, _, body) = send(TestAppBuilder::new().build(), request()).await;
    let (_, _, unconfigured) = send(
        TestAppBuilder::new().without_email_config().build(),
        request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Service is healthy",
            "data": {
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": "2026-01-05T15:04:00+00:00",
                "email_configured": true
            }
        })
    );
    assert_eq!(unconfigured["data"]["email_configured"], false);
}

#[tokio::test]
async fn test_未定義のルートは404を返す() {
    let (status, _, body) = send(
        TestAppBuilder::new().build(),
        Request::builder()
            .uri("/api/unknown")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Resource not found" })
    );
}

#[tokio::test]
async fn test_レスポンスにセキュリティヘッダーとリクエストidが付与される() {
    let (_, headers, _) = send(
        TestAppBuilder::new().build(),
        Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_許可されたオリジンにのみcorsヘッダーを返す() {
    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/contact")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    };

    let (_, allowed, _) = send(TestAppBuilder::new().build(), preflight("https://sysdak.com")).await;
    let (_, denied, _) = send(TestAppBuilder::new().build(), preflight("https://evil.example")).await;

    assert_eq!(
        allowed[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://sysdak.com"
    );
    assert!(!denied.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

fn from_client(mut request: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40_000))));
    request
}

#[tokio::test]
async fn test_テストメールは1時間に3回を超えると429を返す() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();
    let app = builder.build();
    let request = || {
        from_client(
            post_json("/api/test-email", json!({ "email": "victim@example.com" }).to_string()),
            [203, 0, 113, 7],
        )
    };

    let mut statuses = Vec::new();
    for _ in 0..3 {
        statuses.push(send(app.clone(), request()).await.0);
    }
    let (status, headers, body) = send(app.clone(), request()).await;

    assert_eq!(statuses, vec![StatusCode::OK; 3]);
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Too many requests. Please try again later." })
    );
    assert!(headers.contains_key(header::RETRY_AFTER));
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(sender.sent_emails().len(), 3);
}

#[tokio::test]
async fn test_問い合わせは送信元ipごとに1時間5回までに制限する() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();
    let app = builder.build();
    let request = |ip| from_client(post_json("/api/contact", contact_body().to_string()), ip);

    for _ in 0..5 {
        let (status, _, _) = send(app.clone(), request([203, 0, 113, 7])).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (limited, _, _) = send(app.clone(), request([203, 0, 113, 7])).await;
    let (other, _, _) = send(app.clone(), request([198, 51, 100, 1])).await;

    assert_eq!(limited, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(other, StatusCode::OK);
    // 社内通知と自動返信で 1 件あたり 2 通
    assert_eq!(sender.sent_emails().len(), 12);
}

#[tokio::test]
async fn test_レート制限は環境変数で無効化できる() {
    let app = TestAppBuilder::new()
        .with_env("RATE_LIMIT_ENABLED", "false")
        .build();

    for _ in 0..5 {
        let (status, _, _) = send(
            app.clone(),
            post_json("/api/test-email", json!({ "email": "ops@sysdak.com" }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
