//! Dependency wiring.
//!
//! Builds the layers in order: Repository → MessagePusher → UseCases → Server.

use std::sync::Arc;

use duelhub_shared::time::Clock;

use crate::{
    domain::{
        DEFAULT_ROOM_CODE_LENGTH, Lobby, LobbyRepository, PairingMode, RandomRoomCodeFactory,
        RoomCodeFactory,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryLobbyRepository,
    },
    ui::Server,
    usecase::{
        AuthenticateUseCase, ConnectClientUseCase, DisconnectClientUseCase, ManageFriendsUseCase,
        MatchmakingUseCase, RelayUseCase,
    },
};

/// Startup options of one server instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub pairing_mode: PairingMode,
    pub room_code_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            pairing_mode: PairingMode::default(),
            room_code_length: DEFAULT_ROOM_CODE_LENGTH,
        }
    }
}

/// Builds a server with random room codes.
pub fn build_server(config: ServerConfig, clock: Arc<dyn Clock>) -> Server {
    let code_factory = Box::new(RandomRoomCodeFactory::new(config.room_code_length));
    build_server_with(config.pairing_mode, code_factory, clock)
}

/// Builds a server with the given room code source.
pub fn build_server_with(
    pairing_mode: PairingMode,
    code_factory: Box<dyn RoomCodeFactory>,
    clock: Arc<dyn Clock>,
) -> Server {
    // 1. Repository (in-memory lobby behind a single lock)
    let repository = Arc::new(InMemoryLobbyRepository::new(Lobby::new(
        pairing_mode,
        code_factory,
    )));

    build_server_on(repository, clock)
}

/// Builds a server on top of an existing repository.
pub fn build_server_on(repository: Arc<dyn LobbyRepository>, clock: Arc<dyn Clock>) -> Server {
    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let authenticate_usecase = Arc::new(AuthenticateUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let manage_friends_usecase = Arc::new(ManageFriendsUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let matchmaking_usecase = Arc::new(MatchmakingUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let relay_usecase = Arc::new(RelayUseCase::new(repository, message_pusher, clock));

    // 4. Server
    Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        authenticate_usecase,
        manage_friends_usecase,
        matchmaking_usecase,
        relay_usecase,
    )
}
