use std::sync::Arc;

use crate::modules::ticket::application::ports::incoming::use_cases::{
    CreateTicketUseCase, DeleteTicketUseCase, GetTicketUseCase, ListTicketsUseCase,
    UpdateTicketUseCase,
};

#[derive(Clone)]
pub struct TicketUseCases {
    pub create: Arc<dyn CreateTicketUseCase + Send + Sync>,
    pub get_list: Arc<dyn ListTicketsUseCase + Send + Sync>,
    pub get_single: Arc<dyn GetTicketUseCase + Send + Sync>,
    pub update: Arc<dyn UpdateTicketUseCase + Send + Sync>,
    pub delete: Arc<dyn DeleteTicketUseCase + Send + Sync>,
}
