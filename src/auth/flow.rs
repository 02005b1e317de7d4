use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AuthPolicy;

use super::password::{hash_password, verify_password};
use super::repo::{StoreError, UserStore};
use super::repo_types::User;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed submission; nothing was looked up or written.
    #[error("{0}")]
    Invalid(&'static str),

    /// Credentials did not check out. Silent about whether the email or the
    /// password was the wrong half.
    #[error("invalid credentials")]
    Rejected,

    /// Store or hasher failure. Kept distinct from `Rejected` so callers
    /// never report an outage as a bad password.
    #[error("credential check unavailable")]
    Unavailable(#[source] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::Unavailable(e.into())
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Per-attempt sign-in decision.
///
/// Sign-in and sign-up are one operation: a never-seen email provisions a new
/// account (when the policy allows it), a known email verifies the submitted
/// password against the stored digest. The policy arrives through the
/// constructor; there is no process-wide auth state.
pub struct CredentialFlow {
    store: Arc<dyn UserStore>,
    policy: AuthPolicy,
}

impl CredentialFlow {
    pub fn new(store: Arc<dyn UserStore>, policy: AuthPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AuthError::Invalid("invalid email"));
        }
        if password.is_empty() {
            return Err(AuthError::Invalid("password must not be empty"));
        }

        match self.store.find_by_email(&email).await? {
            Some(user) => self.verify_existing(user, password),
            None if self.policy.auto_provision => self.provision(&email, password).await,
            None => {
                warn!(email = %email, "unknown email and auto-provision is off");
                Err(AuthError::Rejected)
            }
        }
    }

    fn verify_existing(&self, user: User, password: &str) -> Result<User, AuthError> {
        let Some(digest) = user.password_hash.as_deref() else {
            // externally-provisioned account, no local password to check
            warn!(user_id = %user.id, "password sign-in against account without a digest");
            return Err(AuthError::Rejected);
        };
        if verify_password(password, digest).map_err(AuthError::Unavailable)? {
            Ok(user)
        } else {
            warn!(user_id = %user.id, "password mismatch");
            Err(AuthError::Rejected)
        }
    }

    async fn provision(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let digest = hash_password(password).map_err(AuthError::Unavailable)?;
        match self.store.insert(email, &digest).await {
            Ok(user) => {
                info!(user_id = %user.id, email = %email, "provisioned account on first sign-in");
                Ok(user)
            }
            // Lost a race with a concurrent first sign-in. Whoever won owns
            // the row now, so re-attempt the lookup and verify against it.
            Err(StoreError::DuplicateEmail) => match self.store.find_by_email(email).await? {
                Some(user) => self.verify_existing(user, password),
                None => Err(AuthError::Rejected),
            },
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    struct MemStore {
        users: Mutex<Vec<User>>,
        fail_lookups: bool,
        /// Pretend the row does not exist on the next lookup; simulates the
        /// window where a concurrent request provisions the same email.
        hide_next_lookup: Mutex<bool>,
    }

    fn user(email: &str, password_hash: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[async_trait]
    impl UserStore for MemStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            if self.fail_lookups {
                return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
            }
            let mut hide = self.hide_next_lookup.lock().unwrap();
            if *hide {
                *hide = false;
                return Ok(None);
            }
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
            let created = user(email, Some(password_hash));
            users.push(created.clone());
            Ok(created)
        }
    }

    fn flow_over(store: Arc<MemStore>) -> CredentialFlow {
        CredentialFlow::new(
            store,
            AuthPolicy {
                auto_provision: true,
            },
        )
    }

    #[tokio::test]
    async fn first_sign_in_provisions_then_authenticates() {
        let store = Arc::new(MemStore::default());
        let flow = flow_over(store.clone());

        let created = flow
            .sign_in("a@x.com", "secret1")
            .await
            .expect("first attempt should provision");
        assert_eq!(created.email, "a@x.com");

        {
            let users = store.users.lock().unwrap();
            assert_eq!(users.len(), 1);
            let digest = users[0].password_hash.as_deref().expect("digest stored");
            assert!(!digest.is_empty());
            assert_ne!(digest, "secret1");
        }

        let again = flow
            .sign_in("a@x.com", "secret1")
            .await
            .expect("same password should verify");
        assert_eq!(again.id, created.id);

        let err = flow.sign_in("a@x.com", "secret2").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected));
        assert_eq!(store.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_input_is_rejected_without_side_effect() {
        let store = Arc::new(MemStore::default());
        let flow = flow_over(store.clone());

        for (email, password) in [("", "pw"), ("a@x.com", ""), ("not-an-email", "pw")] {
            let err = flow.sign_in(email, password).await.unwrap_err();
            assert!(matches!(err, AuthError::Invalid(_)), "{email:?}/{password:?}");
        }
        assert!(store.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn email_is_normalized_before_lookup_and_provisioning() {
        let store = Arc::new(MemStore::default());
        let flow = flow_over(store.clone());

        flow.sign_in("  Trip@Example.COM ", "secret1")
            .await
            .expect("should provision");
        assert_eq!(store.users.lock().unwrap()[0].email, "trip@example.com");

        flow.sign_in("trip@example.com", "secret1")
            .await
            .expect("normalized email should match");
        assert_eq!(store.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn account_without_digest_is_rejected() {
        let store = Arc::new(MemStore::default());
        store
            .users
            .lock()
            .unwrap()
            .push(user("sso@x.com", None));
        let flow = flow_over(store);

        let err = flow.sign_in("sso@x.com", "whatever").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected));
    }

    #[tokio::test]
    async fn lost_provisioning_race_retries_as_lookup() {
        let digest = hash_password("pw1").unwrap();
        let store = Arc::new(MemStore::default());
        store
            .users
            .lock()
            .unwrap()
            .push(user("racer@x.com", Some(&digest)));
        *store.hide_next_lookup.lock().unwrap() = true;

        let flow = flow_over(store.clone());
        let signed_in = flow
            .sign_in("racer@x.com", "pw1")
            .await
            .expect("loser resolves via retry, not an error");
        assert_eq!(signed_in.email, "racer@x.com");
        assert_eq!(store.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lost_race_with_wrong_password_is_rejected() {
        let digest = hash_password("pw1").unwrap();
        let store = Arc::new(MemStore::default());
        store
            .users
            .lock()
            .unwrap()
            .push(user("racer@x.com", Some(&digest)));
        *store.hide_next_lookup.lock().unwrap() = true;

        let flow = flow_over(store);
        let err = flow.sign_in("racer@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected));
    }

    #[tokio::test]
    async fn store_outage_is_not_a_rejection() {
        let store = Arc::new(MemStore {
            fail_lookups: true,
            ..Default::default()
        });
        let flow = flow_over(store);

        let err = flow.sign_in("a@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Unavailable(_)));
    }

    #[tokio::test]
    async fn auto_provision_off_rejects_unknown_email() {
        let store = Arc::new(MemStore::default());
        let flow = CredentialFlow::new(
            store.clone(),
            AuthPolicy {
                auto_provision: false,
            },
        );

        let err = flow.sign_in("new@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected));
        assert!(store.users.lock().unwrap().is_empty());
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(!is_valid_email("no-at-sign.com"));
    }
}
