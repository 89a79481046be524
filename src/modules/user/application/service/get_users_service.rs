use std::sync::Arc;

use async_trait::async_trait;

use crate::modules::storage::application::domain::{Collection, Filter, Page, PageRequest};
use crate::modules::storage::application::ports::outgoing::StorageAdapter;
use crate::modules::user::application::domain::entities::{User, UserView};
use crate::modules::user::application::ports::incoming::use_cases::{GetUsersError, GetUsersUseCase};

pub struct GetUsersService {
    storage: Arc<dyn StorageAdapter>,
}

impl GetUsersService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl GetUsersUseCase for GetUsersService {
    async fn execute(&self, page: PageRequest) -> Result<Page<UserView>, GetUsersError> {
        let (records, total) = self
            .storage
            .find_many(Collection::Users, &Filter::all(), page)
            .await
            .map_err(|e| GetUsersError::RepositoryError(e.to_string()))?;

        let users = records
            .iter()
            .map(|r| User::from_record(r).map(|u| u.view()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GetUsersError::RepositoryError(e.to_string()))?;

        Ok(Page::new(users, page, total))
    }
}
