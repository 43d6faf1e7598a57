//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    AuthenticateUseCase, ConnectClientUseCase, DisconnectClientUseCase, ManageFriendsUseCase,
    MatchmakingUseCase, RelayUseCase,
};

/// Use cases shared by every connection handler
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub authenticate_usecase: Arc<AuthenticateUseCase>,
    pub manage_friends_usecase: Arc<ManageFriendsUseCase>,
    pub matchmaking_usecase: Arc<MatchmakingUseCase>,
    pub relay_usecase: Arc<RelayUseCase>,
}
