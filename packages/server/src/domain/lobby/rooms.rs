//! Room Manager: ルーム作成・参加と匿名マッチング

use crate::domain::{
    entity::GameRoom,
    error::RoomError,
    event::{Outbox, PlayerSeat, ServerEvent},
    registry::QueueOutcome,
    value_object::{ConnectionId, RoomCode},
};

use super::{Lobby, MAX_ROOM_CODE_ATTEMPTS, PairingMode};

impl Lobby {
    /// 新しいコードでルームを作り、作成者を一席目に座らせる
    pub fn create_room(&mut self, connection_id: &ConnectionId) -> Result<Outbox, RoomError> {
        self.require_pairing_mode(PairingMode::Code)?;
        self.require_connection(connection_id)?;

        let code = self.allocate_room_code()?;
        self.rooms.open(code.clone(), connection_id.clone())?;
        tracing::debug!("Room '{}' opened by '{}'", code, connection_id);

        let mut outbox = Outbox::new();
        outbox.send(connection_id.clone(), ServerEvent::RoomCreated { room: code });
        Ok(outbox)
    }

    /// 既存ルームの二席目に座り、両者へ `Start` を送る
    pub fn join_room(
        &mut self,
        connection_id: &ConnectionId,
        code: RoomCode,
    ) -> Result<Outbox, RoomError> {
        self.require_pairing_mode(PairingMode::Code)?;
        self.require_connection(connection_id)?;

        let room = self.rooms.join(&code, connection_id.clone())?.clone();
        Ok(self.start_game(&room))
    }

    /// 匿名マッチングの待機列に入る
    pub fn join_queue(&mut self, connection_id: &ConnectionId) -> Result<Outbox, RoomError> {
        self.require_pairing_mode(PairingMode::Queue)?;
        self.require_connection(connection_id)?;
        if self.rooms.is_seated(connection_id) {
            return Err(RoomError::AlreadySeated);
        }

        match self.rooms.enqueue(connection_id.clone()) {
            QueueOutcome::Waiting => {
                let mut outbox = Outbox::new();
                outbox.send(connection_id.clone(), ServerEvent::QueueWaiting);
                Ok(outbox)
            }
            QueueOutcome::Paired(room) => Ok(self.start_game(&room)),
        }
    }

    /// 満席になったルームの全員へ席順付きの `Start` を送る
    ///
    /// 表示名が無い席は "Player 1" / "Player 2" と名付ける。
    fn start_game(&self, room: &GameRoom) -> Outbox {
        let players = room
            .occupants()
            .iter()
            .enumerate()
            .map(|(index, id)| PlayerSeat {
                id: id.clone(),
                name: self
                    .identity
                    .display_name(id)
                    .map(|name| name.as_str().to_string())
                    .unwrap_or_else(|| format!("Player {}", index + 1)),
            })
            .collect();

        tracing::debug!("Room '{}' is full, starting game", room.code);
        let mut outbox = Outbox::new();
        outbox.multicast(
            room.occupants().to_vec(),
            ServerEvent::Start {
                room: room.code.clone(),
                players,
            },
        );
        outbox
    }

    fn allocate_room_code(&self) -> Result<RoomCode, RoomError> {
        (0..MAX_ROOM_CODE_ATTEMPTS)
            .map(|_| self.code_factory.generate())
            .find(|code| !self.rooms.contains(code))
            .ok_or(RoomError::CodeUnavailable)
    }

    fn require_pairing_mode(&self, expected: PairingMode) -> Result<(), RoomError> {
        match (self.pairing_mode, expected) {
            (actual, expected) if actual == expected => Ok(()),
            (_, PairingMode::Code) => Err(RoomError::CodeModeDisabled),
            (_, PairingMode::Queue) => Err(RoomError::QueueModeDisabled),
        }
    }

    fn require_connection(&self, connection_id: &ConnectionId) -> Result<(), RoomError> {
        if self.identity.contains(connection_id) {
            Ok(())
        } else {
            Err(RoomError::UnknownConnection)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::value_object::DisplayName;

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_create_and_join_scenario_with_default_names() {
        // テスト項目: 作成者にコードが届き、参加で両者に既定名入りの start が届く
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Code, &["X", "Y"]);

        // when (操作):
        let created = lobby.create_room(&conn("X")).unwrap();
        let joined = lobby.join_room(&conn("Y"), code("ab12cd")).unwrap();

        // then (期待する結果):
        assert_eq!(
            created.events_for(&conn("X")),
            vec![&ServerEvent::RoomCreated {
                room: code("ab12cd")
            }]
        );
        let expected = ServerEvent::Start {
            room: code("ab12cd"),
            players: vec![
                PlayerSeat {
                    id: conn("X"),
                    name: "Player 1".to_string(),
                },
                PlayerSeat {
                    id: conn("Y"),
                    name: "Player 2".to_string(),
                },
            ],
        };
        assert_eq!(joined.events_for(&conn("X")), vec![&expected]);
        assert_eq!(joined.events_for(&conn("Y")), vec![&expected]);
    }

    #[test]
    fn test_start_uses_display_names() {
        // テスト項目: 表示名を設定していれば start にその名前が入る
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Code, &["X", "Y"]);
        lobby
            .set_nickname(&conn("Y"), DisplayName::new("trinity".to_string()).unwrap())
            .unwrap();
        lobby.create_room(&conn("X")).unwrap();

        // when (操作):
        let joined = lobby.join_room(&conn("Y"), code("ab12cd")).unwrap();

        // then (期待する結果):
        let ServerEvent::Start { players, .. } = joined.events_for(&conn("X"))[0] else {
            panic!("expected start");
        };
        assert_eq!(players[0].name, "Player 1");
        assert_eq!(players[1].name, "trinity");
    }

    #[test]
    fn test_join_full_room_fails() {
        // テスト項目: 満席のルームへの参加は RoomFull
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Code, &["X", "Y", "Z"]);
        lobby.create_room(&conn("X")).unwrap();
        lobby.join_room(&conn("Y"), code("ab12cd")).unwrap();

        // when (操作):
        let result = lobby.join_room(&conn("Z"), code("ab12cd")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomFull));
        assert_eq!(
            lobby.rooms().get(&code("ab12cd")).unwrap().occupants().len(),
            2
        );
    }

    #[test]
    fn test_join_unknown_room_fails() {
        // テスト項目: 存在しないコードへの参加は RoomNotFound
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Code, &["Y"]);

        // when (操作):
        let result = lobby.join_room(&conn("Y"), code("zzzzzz")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomNotFound));
    }

    #[test]
    fn test_create_room_skips_codes_in_use() {
        // テスト項目: 生成されたコードが使用中なら別のコードを使う
        // given (前提条件):
        let mut lobby = Lobby::new(
            PairingMode::Code,
            Box::new(crate::domain::factory::SequenceRoomCodeFactory::new([
                "ab12cd", "ab12cd", "cd34ef",
            ])),
        );
        lobby.connect(conn("X"), crate::domain::value_object::Timestamp::new(0));
        lobby.create_room(&conn("X")).unwrap();

        // when (操作):
        let outbox = lobby.create_room(&conn("X")).unwrap();

        // then (期待する結果):
        assert_eq!(
            outbox.events_for(&conn("X")),
            vec![&ServerEvent::RoomCreated {
                room: code("cd34ef")
            }]
        );
        assert_eq!(lobby.rooms().len(), 2);
    }

    #[test]
    fn test_room_codes_disabled_in_queue_mode() {
        // テスト項目: 匿名マッチングモードではコードでのルーム作成ができない
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Queue, &["X"]);

        // when (操作):
        let result = lobby.create_room(&conn("X")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::CodeModeDisabled));
    }

    #[test]
    fn test_queue_disabled_in_code_mode() {
        // テスト項目: コードモードでは待機列に入れない
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Code, &["X"]);

        // when (操作):
        let result = lobby.join_queue(&conn("X")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::QueueModeDisabled));
    }

    #[test]
    fn test_queue_pairs_two_connections() {
        // テスト項目: 二人目が並ぶとペアになり、待機中だった接続が席 0 になる
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Queue, &["X", "Y"]);

        // when (操作):
        let waiting = lobby.join_queue(&conn("X")).unwrap();
        let paired = lobby.join_queue(&conn("Y")).unwrap();

        // then (期待する結果):
        assert_eq!(
            waiting.events_for(&conn("X")),
            vec![&ServerEvent::QueueWaiting]
        );
        let ServerEvent::Start { room, players } = paired.events_for(&conn("Y"))[0] else {
            panic!("expected start");
        };
        assert_eq!(room.as_str(), "X_Y");
        assert_eq!(players[0].id, conn("X"));
        assert_eq!(players[1].id, conn("Y"));
        assert!(lobby.rooms().waiting().is_none());
    }

    #[test]
    fn test_seated_connection_cannot_queue_again() {
        // テスト項目: 匿名マッチングでは一つの接続は一つのルームにしか座れない
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Queue, &["X", "Y"]);
        lobby.join_queue(&conn("X")).unwrap();
        lobby.join_queue(&conn("Y")).unwrap();

        // when (操作):
        let result = lobby.join_queue(&conn("X")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::AlreadySeated));
        assert!(lobby.rooms().waiting().is_none());
    }

    #[test]
    fn test_unknown_connection_cannot_create_room() {
        // テスト項目: 未登録の接続はルームを作れない
        // given (前提条件):
        let mut lobby = lobby_with(PairingMode::Code, &[]);

        // when (操作):
        let result = lobby.create_room(&conn("ghost")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::UnknownConnection));
        assert!(lobby.rooms().is_empty());
    }
}
