//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! `secure = true` は接続直後から TLS（465 番ポート想定）、
//! `secure = false` はサーバーが対応していれば STARTTLS に昇格する。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use sysdak_domain::notification::{EmailMessage, MailTransportConfig, NotificationError};

use super::NotificationSender;

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// 接続は送信時に確立されるため、生成時点では認証情報を検証しない。
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotificationSender {
    /// 送信設定から SMTP 送信インスタンスを作成する
    ///
    /// # エラー
    ///
    /// ホスト名から TLS パラメータを構築できない場合は
    /// `NotificationError::ConnectionFailed` を返す。
    pub fn new(config: &MailTransportConfig) -> Result<Self, NotificationError> {
        let tls_parameters = TlsParameters::new(config.host.clone())
            .map_err(|e| NotificationError::ConnectionFailed(format!("TLS 設定の構築失敗: {e}")))?;
        let tls = if config.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport:    builder.build(),
            from_address: config.from_address.clone(),
        })
    }

    /// `EmailMessage` から multipart/alternative のメッセージを構築する
    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from_address, "送信元")?)
            .subject(&email.subject);

        for to in &email.to {
            builder = builder.to(parse_mailbox(to, "宛先")?);
        }

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to, "返信先")?);
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

fn parse_mailbox(address: &str, role: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e| NotificationError::SendFailed(format!("{role}アドレス不正: {e}")))
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }

    async fn verify_connection(&self) -> Result<(), NotificationError> {
        let connected = self
            .transport
            .test_connection()
            .await
            .map_err(|e| NotificationError::ConnectionFailed(e.to_string()))?;

        if !connected {
            return Err(NotificationError::ConnectionFailed(
                "SMTP サーバーが応答しません".to_string(),
            ));
        }

        Ok(())
    }
}
