use async_trait::async_trait;
use auth::AuthenticatedContext;

use crate::account::errors::AccountError;
use crate::account::errors::NotificationError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountChanges;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthenticatedSession;
use crate::domain::account::models::CreateAccountCommand;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::PageRequest;
use crate::domain::account::models::UpdateAccountCommand;
use crate::domain::account::notifications::Notification;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Create an account and sign it in.
    ///
    /// # Arguments
    /// * `command` - Validated name, email and password
    ///
    /// # Returns
    /// Created account with a freshly issued access token
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered (no token is issued)
    /// * `Hashing` - Password hashing failed
    /// * `Signing` - Token issuance failed
    /// * `Store` - Store operation failed
    async fn register(&self, command: CreateAccountCommand)
        -> Result<AuthenticatedSession, AccountError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Signing` - Token issuance failed
    /// * `Store` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedSession, AccountError>;

    /// Account of the caller identified by the gate.
    ///
    /// # Errors
    /// * `NotFound` - Account was deleted after the token was issued
    async fn get_profile(&self, context: &AuthenticatedContext) -> Result<Account, AccountError>;

    /// Create an account without issuing a token.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `Store` - Store operation failed
    async fn create_account(&self, command: CreateAccountCommand) -> Result<Account, AccountError>;

    /// All accounts ordered by id.
    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError>;

    /// One page of accounts ordered by id.
    async fn paginate_accounts(&self, page: PageRequest) -> Result<Vec<Account>, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Store` - Store operation failed
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;

    /// Update an account with optional fields. A new password is re-hashed.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DuplicateEmail` - New email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `Store` - Store operation failed
    async fn update_account(
        &self,
        id: &AccountId,
        command: UpdateAccountCommand,
    ) -> Result<Account, AccountError>;

    /// Delete an account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Store` - Store operation failed
    async fn delete_account(&self, id: &AccountId) -> Result<(), AccountError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account; the store assigns id and creation time.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Store` - Store operation failed
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;

    async fn list_all(&self) -> Result<Vec<Account>, AccountError>;

    async fn paginate(&self, page: PageRequest) -> Result<Vec<Account>, AccountError>;

    /// Apply changes in a single write and return the stored result.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DuplicateEmail` - New email is already registered
    /// * `Store` - Store operation failed
    async fn update(&self, id: &AccountId, changes: AccountChanges)
        -> Result<Account, AccountError>;

    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Store` - Store operation failed
    async fn delete(&self, id: &AccountId) -> Result<(), AccountError>;
}

/// Hand-off point for notifications. Must not block the caller.
pub trait NotificationQueue: Send + Sync + 'static {
    /// # Errors
    /// * `QueueFull` - No capacity left; the notification is dropped
    /// * `QueueClosed` - The delivery worker has stopped
    fn enqueue(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Delivery of a single notification to its recipient.
#[async_trait]
pub trait NotificationSender: Send + Sync + 'static {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}
