//! # Contact Client ↔ Contact Service の結合テスト
//!
//! Contact Service を `127.0.0.1:0` で起動し、実際の HTTP 越しに
//! クライアントとフォームコントローラーから問い合わせを送信する。

mod helpers;

use std::{net::SocketAddr, sync::Arc};

use helpers::{INTERNAL_RECIPIENT, TestAppBuilder};
use pretty_assertions::assert_eq;
use sysdak_contact_client::{
    ClientConfig,
    ContactApiClient,
    ContactApiClientImpl,
    ContactFormController,
    FormStatus,
    StatusKind,
    SubmitOutcome,
};
use sysdak_domain::contact::{ContactForm, ContactSubmission};
use tokio::net::TcpListener;

/// サービスを起動してクライアントを返す
async fn spawn_service(builder: &TestAppBuilder) -> ContactApiClientImpl {
    let app = builder.build();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    ContactApiClientImpl::new(&ClientConfig::new(format!("http://{addr}/api"))).unwrap()
}

fn make_form() -> ContactForm {
    ContactForm {
        name:    "Priya Raman".to_string(),
        email:   "priya@example.com".to_string(),
        subject: "Project Discussion".to_string(),
        message: "Let's talk about a mobile app.".to_string(),
    }
}

#[tokio::test]
async fn test_クライアントから送信した問い合わせがメールになる() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();
    let client = spawn_service(&builder).await;
    let submission = ContactSubmission::try_from(make_form()).unwrap();

    let response = client.submit_contact_form(&submission).await.unwrap();

    assert!(response.success);
    assert_eq!(
        response.message,
        "Your message has been sent successfully. We will contact you soon!"
    );
    assert_eq!(
        response.data,
        Some(serde_json::json!({ "internal": "delivered", "auto_reply": "delivered" }))
    );

    let sent = sender.sent_emails();
    assert_eq!(sent.len(), 2);
    assert!(
        sent.iter()
            .any(|email| email.to == vec![INTERNAL_RECIPIENT.to_string()]
                && email.text_body.contains("Let's talk about a mobile app."))
    );
}

#[tokio::test]
async fn test_サービスの失敗メッセージがクライアントのエラーになる() {
    let builder = TestAppBuilder::new().without_email_config();
    let client = spawn_service(&builder).await;
    let submission = ContactSubmission::try_from(make_form()).unwrap();

    let err = client.submit_contact_form(&submission).await.unwrap_err();

    assert_eq!(err.to_string(), "Email service not configured");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_フォームコントローラーから送信すると成功メッセージを表示する() {
    let builder = TestAppBuilder::new();
    let client = spawn_service(&builder).await;
    let controller = ContactFormController::new(Arc::new(client));

    let outcome = controller.submit(make_form(), Some("captcha-token")).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Completed(FormStatus {
            kind:    StatusKind::Success,
            message: "Your message has been sent successfully. We will contact you soon!"
                .to_string(),
        })
    );
}

#[tokio::test]
async fn test_ヘルスチェックとテストメールが往復する() {
    let builder = TestAppBuilder::new();
    let sender = builder.sender();
    let client = spawn_service(&builder).await;

    let health = client.health_check().await.unwrap().data.unwrap();
    let test_email = client.test_email("ops@sysdak.com").await.unwrap();

    assert_eq!(health.status, "healthy");
    assert!(health.email_configured);
    assert_eq!(
        test_email.message,
        "Test email sent successfully to ops@sysdak.com"
    );
    assert_eq!(sender.sent_emails().len(), 1);
}
