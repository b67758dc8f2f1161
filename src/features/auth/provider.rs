//! The identity-provider seam. The session store only talks to this trait, so
//! the hosted client can be swapped for an in-memory fake in tests.
//!
//! Auth-change notifications are message passing: the provider owns an
//! `AuthEventHub` and every subscriber gets its own unbounded channel.

use super::types::{
    AuthChangeEvent, OAuthRedirect, OAuthRequest, ProviderError, Session, SignUpOutcome, User,
};
use crate::app_lib::AppError;
use async_trait::async_trait;
use futures::Stream;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use secrecy::SecretString;
use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use thiserror::Error;

/// Failure at the identity-provider boundary.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Structured failure reported by the provider.
    #[error("{0}")]
    Provider(ProviderError),
    /// Transport, storage or decoding failure.
    #[error("Unexpected auth failure: {0}")]
    Unexpected(String),
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Http {
                status,
                code,
                message,
                provider_payload: true,
            } => Self::Provider(ProviderError {
                message,
                status: Some(status),
                code,
            }),
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

/// Operations consumed from the hosted identity service.
#[async_trait(?Send)]
pub trait IdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &SecretString)
    -> Result<SignUpOutcome, AuthError>;

    /// Starts a redirect-based sign-in. On success the page is about to leave.
    async fn sign_in_with_oauth(&self, request: &OAuthRequest) -> Result<OAuthRedirect, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Fetches the user behind the current session, `None` when signed out.
    async fn current_user(&self) -> Result<Option<User>, AuthError>;

    /// Opens a standing subscription to auth-change events.
    fn subscribe(&self) -> Subscription;
}

/// Fans auth-change events out to every live subscription.
#[derive(Clone, Default)]
pub struct AuthEventHub {
    senders: Rc<RefCell<Vec<UnboundedSender<AuthChangeEvent>>>>,
}

impl AuthEventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = unbounded();
        self.senders.borrow_mut().push(sender);
        Subscription { receiver }
    }

    /// Delivers `event` to every subscriber and prunes closed ones.
    pub fn emit(&self, event: &AuthChangeEvent) {
        tracing::debug!(kind = %event.kind, "auth change event");
        self.senders
            .borrow_mut()
            .retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.senders
            .borrow_mut()
            .retain(|sender| !sender.is_closed());
        self.senders.borrow().len()
    }
}

/// Receiving end of an auth-change subscription. Dropping it (or calling
/// `unsubscribe`) detaches it from the hub.
pub struct Subscription {
    receiver: UnboundedReceiver<AuthChangeEvent>,
}

impl Subscription {
    /// Stops delivery. Events already queued are discarded.
    pub fn unsubscribe(mut self) {
        self.receiver.close();
    }
}

impl Stream for Subscription {
    type Item = AuthChangeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthEventHub};
    use crate::app_lib::AppError;
    use crate::app_lib::errors::http_error;
    use crate::features::auth::types::fixtures::session;
    use crate::features::auth::types::{AuthChangeEvent, AuthEventKind, ProviderError};
    use futures::StreamExt;

    #[test]
    fn http_errors_become_provider_errors() {
        let err = AuthError::from(AppError::Http {
            status: 400,
            code: Some("invalid_grant".to_string()),
            message: "Invalid login credentials".to_string(),
            provider_payload: true,
        });
        assert_eq!(
            err,
            AuthError::Provider(ProviderError {
                message: "Invalid login credentials".to_string(),
                status: Some(400),
                code: Some("invalid_grant".to_string()),
            })
        );
    }

    #[test]
    fn gateway_pages_become_unexpected() {
        let err = AuthError::from(http_error(
            502,
            "<html><body>502 Bad Gateway</body></html>",
        ));
        assert!(matches!(err, AuthError::Unexpected(message) if message.contains("502")));
    }

    #[test]
    fn parsed_error_bodies_become_provider_errors() {
        let err = AuthError::from(http_error(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        ));
        assert!(matches!(
            err,
            AuthError::Provider(ProviderError { status: Some(400), .. })
        ));
    }

    #[test]
    fn transport_errors_become_unexpected() {
        let err = AuthError::from(AppError::Timeout("Request timed out.".to_string()));
        assert!(matches!(err, AuthError::Unexpected(message) if message.contains("timed out")));
    }

    #[tokio::test]
    async fn hub_delivers_to_every_subscriber() {
        let hub = AuthEventHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        let event = AuthChangeEvent::new(
            AuthEventKind::SignedIn,
            Some(session("u1", "a@example.com")),
        );
        hub.emit(&event);

        assert_eq!(first.next().await, Some(event.clone()));
        assert_eq!(second.next().await, Some(event));
    }

    #[tokio::test]
    async fn hub_prunes_dropped_subscriptions() {
        let hub = AuthEventHub::new();
        let kept = hub.subscribe();
        let dropped = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        drop(dropped);
        hub.emit(&AuthChangeEvent::new(AuthEventKind::SignedOut, None));
        assert_eq!(hub.subscriber_count(), 1);

        kept.unsubscribe();
        assert_eq!(hub.subscriber_count(), 0);
    }
}
