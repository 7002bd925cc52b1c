use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::domain::account::models::PageRequest;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Query string for `/api/users/paginate`. Both parameters are optional.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

impl PaginationQuery {
    fn try_into_page(self) -> Result<PageRequest, AccountError> {
        let default = PageRequest::default();
        Ok(PageRequest::new(
            self.page.unwrap_or(default.page()),
            self.page_size.unwrap_or(default.page_size()),
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountPageData {
    pub page: u32,
    pub page_size: u32,
    pub accounts: Vec<AccountData>,
}

pub async fn paginate_accounts<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Query(query): Query<PaginationQuery>,
) -> Result<ApiSuccess<AccountPageData>, ApiError> {
    let page = query.try_into_page()?;

    state
        .account_service
        .paginate_accounts(page)
        .await
        .map_err(ApiError::from)
        .map(|accounts| {
            ApiSuccess::new(
                StatusCode::OK,
                AccountPageData {
                    page: page.page(),
                    page_size: page.page_size(),
                    accounts: accounts.iter().map(AccountData::from).collect(),
                },
            )
        })
}
