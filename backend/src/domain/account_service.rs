//! Account registration, login, and maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, CredentialHashError, CredentialHasher, TokenLifecycle,
    UserCredentialsRecord, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, LoginCredentials, Password, TokenPair, User, UserId, UserSession};

/// Message returned for any failed login, whichever credential was wrong.
pub const LOGIN_REJECTED: &str = "incorrect email or password";

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenLifecycle>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenLifecycle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    /// Mint an access token and persist a refresh token for `user`.
    async fn open_session(&self, user: User) -> Result<UserSession, Error> {
        let access_token = self.tokens.issue_access_token(&user.id)?;
        let refresh_token = self.tokens.issue_refresh_token(&user.id).await?;
        Ok(UserSession {
            user,
            tokens: TokenPair {
                access_token,
                refresh_token,
            },
        })
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail => Error::forbidden("email already taken"),
    }
}

fn map_hash_error(error: CredentialHashError) -> Error {
    Error::internal(error.to_string())
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, credentials: LoginCredentials) -> Result<UserSession, Error> {
        let existing = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(Error::forbidden("email already taken"));
        }

        let password_hash = self
            .hasher
            .hash(credentials.password())
            .map_err(map_hash_error)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            email: credentials.email().clone(),
            created_at: now,
            updated_at: now,
        };
        let record = UserCredentialsRecord {
            user: user.clone(),
            password_hash,
        };
        self.users.create(&record).await.map_err(map_user_error)?;
        self.open_session(user).await
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<UserSession, Error> {
        let record = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(LOGIN_REJECTED))?;
        let matches = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(LOGIN_REJECTED));
        }

        self.open_session(record.user).await
    }

    async fn change_password(&self, user_id: &UserId, password: Password) -> Result<(), Error> {
        let password_hash = self.hasher.hash(&password).map_err(map_hash_error)?;
        let updated = self
            .users
            .update_password_hash(user_id, &password_hash, self.clock.utc())
            .await
            .map_err(map_user_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }

    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error> {
        let deleted = self.users.delete(user_id).await.map_err(map_user_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCredentialHasher, MockTokenLifecycle, MockUserRepository};
    use crate::test_support::{InMemoryUserRepository, PlainTextHasher};
    use chrono::{TimeZone, Utc};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid credentials")
    }

    fn token_double() -> MockTokenLifecycle {
        let mut tokens = MockTokenLifecycle::new();
        tokens
            .expect_issue_access_token()
            .returning(|_| Ok("access".to_owned()));
        tokens
            .expect_issue_refresh_token()
            .returning(|_| Ok("refresh".to_owned()));
        tokens
    }

    fn service(
        users: Arc<InMemoryUserRepository>,
    ) -> AccountService<InMemoryUserRepository> {
        AccountService::new(
            users,
            Arc::new(PlainTextHasher),
            Arc::new(token_double()),
            Arc::new(DefaultClock),
        )
    }

    #[tokio::test]
    async fn register_then_login_issues_token_pair() {
        let users = Arc::new(InMemoryUserRepository::default());
        let service = service(Arc::clone(&users));

        let registered = service
            .register(credentials("cook@example.com", "correct horse"))
            .await
            .expect("register");
        let stored = users.get(&registered.user.id).expect("stored user");
        assert_ne!(stored.password_hash, "correct horse");
        assert_eq!(registered.tokens.access_token, "access");
        assert_eq!(registered.tokens.refresh_token, "refresh");

        let session = service
            .login(credentials("COOK@example.com", "correct horse"))
            .await
            .expect("login");
        assert_eq!(session.user, registered.user);
        assert_eq!(session.tokens.access_token, "access");
        assert_eq!(session.tokens.refresh_token, "refresh");
    }

    #[tokio::test]
    async fn registration_mints_credentials_for_the_new_user() {
        let mut tokens = MockTokenLifecycle::new();
        tokens
            .expect_issue_access_token()
            .times(1)
            .returning(|user_id| Ok(format!("access-{user_id}")));
        tokens
            .expect_issue_refresh_token()
            .times(1)
            .returning(|user_id| Ok(format!("refresh-{user_id}")));
        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(PlainTextHasher),
            Arc::new(tokens),
            Arc::new(DefaultClock),
        );

        let session = service
            .register(credentials("cook@example.com", "password1"))
            .await
            .expect("register");

        let id = session.user.id;
        assert_eq!(session.tokens.access_token, format!("access-{id}"));
        assert_eq!(session.tokens.refresh_token, format!("refresh-{id}"));
    }

    #[tokio::test]
    async fn duplicate_email_is_forbidden() {
        let service = service(Arc::new(InMemoryUserRepository::default()));
        service
            .register(credentials("cook@example.com", "password1"))
            .await
            .expect("first registration");

        let err = service
            .register(credentials("cook@example.com", "password2"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "email already taken");
    }

    #[tokio::test]
    async fn racing_duplicate_insert_is_forbidden() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_create()
            .return_once(|_| Err(UserRepositoryError::duplicate_email()));
        let service = AccountService::new(
            Arc::new(users),
            Arc::new(PlainTextHasher),
            Arc::new(MockTokenLifecycle::new()),
            Arc::new(DefaultClock),
        );

        let err = service
            .register(credentials("cook@example.com", "password1"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case("stranger@example.com", "correct horse")]
    #[case("cook@example.com", "wrong horse")]
    #[tokio::test]
    async fn bad_login_is_rejected_uniformly(#[case] email: &str, #[case] password: &str) {
        let service = service(Arc::new(InMemoryUserRepository::default()));
        service
            .register(credentials("cook@example.com", "correct horse"))
            .await
            .expect("register");

        let err = service
            .login(credentials(email, password))
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), LOGIN_REJECTED);
    }

    #[tokio::test]
    async fn hash_failure_is_internal() {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Err(CredentialHashError::hash("out of memory")));
        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(hasher),
            Arc::new(MockTokenLifecycle::new()),
            Arc::new(DefaultClock),
        );

        let err = service
            .register(credentials("cook@example.com", "password1"))
            .await
            .expect_err("hash failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn change_password_replaces_hash() {
        let users = Arc::new(InMemoryUserRepository::default());
        let service = service(Arc::clone(&users));
        let user = service
            .register(credentials("cook@example.com", "password1"))
            .await
            .expect("register")
            .user;

        service
            .change_password(&user.id, Password::new("password2").expect("valid"))
            .await
            .expect("change password");

        service
            .login(credentials("cook@example.com", "password2"))
            .await
            .expect("new password works");
        let err = service
            .login(credentials("cook@example.com", "password1"))
            .await
            .expect_err("old password rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn delete_account_removes_user_once() {
        let users = Arc::new(InMemoryUserRepository::default());
        let service = service(Arc::clone(&users));
        let user = service
            .register(credentials("cook@example.com", "password1"))
            .await
            .expect("register")
            .user;

        service.delete_account(&user.id).await.expect("delete");
        assert!(users.get(&user.id).is_none());

        let err = service
            .delete_account(&user.id)
            .await
            .expect_err("already gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn registration_stamps_clock_time() {
        let now = Utc
            .with_ymd_and_hms(2026, 5, 4, 3, 2, 1)
            .single()
            .expect("timestamp");
        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(PlainTextHasher),
            Arc::new(token_double()),
            Arc::new(crate::test_support::MutableClock::new(now)),
        );

        let user = service
            .register(credentials("cook@example.com", "password1"))
            .await
            .expect("register")
            .user;
        assert_eq!(user.created_at, now);
        assert_eq!(user.updated_at, now);
    }
}
