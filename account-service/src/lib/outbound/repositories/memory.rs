use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountChanges;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::PageRequest;
use crate::domain::account::ports::AccountRepository;

/// Process-local account store.
///
/// Used when `database.backend = "memory"` and by the integration tests.
/// Ids are assigned sequentially from 1 and iteration is in id order.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    accounts: BTreeMap<i64, Account>,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.accounts
            .values()
            .any(|a| a.email.as_str() == email && Some(a.id.0) != except)
    }
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
        let mut state = self.state.write().await;

        if state.email_taken(account.email.as_str(), None) {
            return Err(AccountError::DuplicateEmail(account.email.to_string()));
        }

        state.last_id += 1;
        let created = Account {
            id: AccountId(state.last_id),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        state.accounts.insert(created.id.0, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.state.read().await.accounts.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.state.read().await.accounts.values().cloned().collect())
    }

    async fn paginate(&self, page: PageRequest) -> Result<Vec<Account>, AccountError> {
        let state = self.state.read().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(0);

        Ok(state
            .accounts
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<Account, AccountError> {
        let mut state = self.state.write().await;

        if let Some(email) = &changes.email {
            if state.email_taken(email.as_str(), Some(id.0)) {
                return Err(AccountError::DuplicateEmail(email.to_string()));
            }
        }

        let account = state
            .accounts
            .get_mut(&id.0)
            .ok_or(AccountError::NotFound(id.to_string()))?;

        if let Some(name) = changes.name {
            account.name = name;
        }
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }

        Ok(account.clone())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountError> {
        self.state
            .write()
            .await
            .accounts
            .remove(&id.0)
            .map(|_| ())
            .ok_or(AccountError::NotFound(id.to_string()))
    }
}
