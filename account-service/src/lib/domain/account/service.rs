use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticatedContext;
use auth::Authenticator;

use crate::account::errors::AccountError;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::ports::NotificationQueue;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountChanges;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthenticatedSession;
use crate::domain::account::models::CreateAccountCommand;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::PageRequest;
use crate::domain::account::models::UpdateAccountCommand;
use crate::domain::account::notifications::Notification;

/// Domain service implementation for account operations.
///
/// Composes the account store, the notification queue and the authenticator
/// (password hasher + token issuer) behind `AccountServicePort`.
pub struct AccountService<AR, NQ>
where
    AR: AccountRepository,
    NQ: NotificationQueue,
{
    repository: Arc<AR>,
    notifications: Arc<NQ>,
    authenticator: Arc<Authenticator>,
}

impl<AR, NQ> AccountService<AR, NQ>
where
    AR: AccountRepository,
    NQ: NotificationQueue,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `notifications` - Queue for outbound emails
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(
        repository: Arc<AR>,
        notifications: Arc<NQ>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            notifications,
            authenticator,
        }
    }

    /// Hash the password and persist the account.
    async fn insert_account(&self, command: CreateAccountCommand) -> Result<Account, AccountError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())?;

        self.repository
            .create(NewAccount {
                name: command.name,
                email: command.email,
                password_hash,
            })
            .await
    }

    fn send_welcome(&self, account: &Account) {
        if let Err(e) = self.notifications.enqueue(Notification::welcome(account)) {
            tracing::error!(
                account_id = %account.id,
                error = %e,
                "Failed to enqueue welcome notification"
            );
        }
    }

    fn issue_session(&self, account: Account) -> Result<AuthenticatedSession, AccountError> {
        let token = self
            .authenticator
            .issue_token(account.id.0, account.email.as_str())?;
        Ok(AuthenticatedSession { account, token })
    }
}

#[async_trait]
impl<AR, NQ> AccountServicePort for AccountService<AR, NQ>
where
    AR: AccountRepository,
    NQ: NotificationQueue,
{
    async fn register(
        &self,
        command: CreateAccountCommand,
    ) -> Result<AuthenticatedSession, AccountError> {
        let account = self.insert_account(command).await?;
        let session = self.issue_session(account)?;
        self.send_welcome(&session.account);

        tracing::info!(account_id = %session.account.id, "Account registered");
        Ok(session)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedSession, AccountError> {
        let email = EmailAddress::normalize(&command.email);

        let Some(account) = self.repository.find_by_email(&email).await? else {
            tracing::warn!(reason = "unknown_email", "Login rejected");
            return Err(self
                .authenticator
                .reject_unknown(command.password.as_str())
                .into());
        };

        let result = self
            .authenticator
            .authenticate(
                command.password.as_str(),
                &account.password_hash,
                account.id.0,
                account.email.as_str(),
            )
            .map_err(|e| {
                if matches!(e, auth::AuthenticationError::InvalidCredentials) {
                    tracing::warn!(
                        account_id = %account.id,
                        reason = "wrong_password",
                        "Login rejected"
                    );
                }
                AccountError::from(e)
            })?;

        tracing::info!(account_id = %account.id, "Login succeeded");
        Ok(AuthenticatedSession {
            account,
            token: result.access_token,
        })
    }

    async fn get_profile(&self, context: &AuthenticatedContext) -> Result<Account, AccountError> {
        self.get_account(&AccountId(context.subject_id())).await
    }

    async fn create_account(&self, command: CreateAccountCommand) -> Result<Account, AccountError> {
        let account = self.insert_account(command).await?;
        self.send_welcome(&account);

        Ok(account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        self.repository.list_all().await
    }

    async fn paginate_accounts(&self, page: PageRequest) -> Result<Vec<Account>, AccountError> {
        self.repository.paginate(page).await
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn update_account(
        &self,
        id: &AccountId,
        command: UpdateAccountCommand,
    ) -> Result<Account, AccountError> {
        let password_hash = command
            .password
            .map(|password| self.authenticator.hash_password(password.as_str()))
            .transpose()?;

        let changes = AccountChanges {
            name: command.name,
            email: command.email,
            password_hash,
        };

        self.repository.update(id, changes).await
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), AccountError> {
        self.repository.delete(id).await?;

        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}
