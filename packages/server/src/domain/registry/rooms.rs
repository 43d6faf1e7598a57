//! Room Manager のストレージ
//!
//! ルームコード → GameRoom と、匿名マッチングの待機枠（最大一接続）を持つ。
//! ルームは互いに独立しており、一つの解体が他のルームに影響することはない。

use std::collections::HashMap;

use crate::domain::{
    entity::GameRoom,
    error::RoomError,
    value_object::{ConnectionId, RoomCode},
};

/// 待機列への参加結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOutcome {
    /// 対戦相手待ちになった（または既に待っていた）
    Waiting,
    /// 待機中の接続とペアになった
    Paired(GameRoom),
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, GameRoom>,
    waiting: Option<ConnectionId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn get(&self, code: &RoomCode) -> Option<&GameRoom> {
        self.rooms.get(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// 一席を埋めた新しいルームを登録する
    pub fn open(&mut self, code: RoomCode, host: ConnectionId) -> Result<&GameRoom, RoomError> {
        if self.rooms.contains_key(&code) {
            return Err(RoomError::CodeUnavailable);
        }
        let room = self
            .rooms
            .entry(code.clone())
            .or_insert_with(|| GameRoom::open(code, host));
        Ok(&*room)
    }

    /// 既存ルームの二席目に座る
    pub fn join(&mut self, code: &RoomCode, guest: ConnectionId) -> Result<&GameRoom, RoomError> {
        let room = self.rooms.get_mut(code).ok_or(RoomError::RoomNotFound)?;
        room.seat(guest)?;
        Ok(&*room)
    }

    pub fn waiting(&self) -> Option<&ConnectionId> {
        self.waiting.as_ref()
    }

    /// 指定の接続がどこかのルームに座っているか
    pub fn is_seated(&self, connection_id: &ConnectionId) -> bool {
        self.rooms.values().any(|room| room.contains(connection_id))
    }

    /// 匿名マッチングの待機列に入る
    ///
    /// 待機中の接続がいればペアにしてルームを作り、待機枠を空にする。
    pub fn enqueue(&mut self, connection_id: ConnectionId) -> QueueOutcome {
        match self.waiting.take() {
            None => {
                self.waiting = Some(connection_id);
                QueueOutcome::Waiting
            }
            Some(waiting) if waiting == connection_id => {
                self.waiting = Some(waiting);
                QueueOutcome::Waiting
            }
            Some(waiting) => {
                let code = RoomCode::paired(&waiting, &connection_id);
                let room = GameRoom::paired(code.clone(), waiting, connection_id);
                self.rooms.insert(code, room.clone());
                QueueOutcome::Paired(room)
            }
        }
    }

    /// 切断された接続を全ルームと待機枠から取り除く。何度呼んでも安全。
    ///
    /// 一人でも抜けたルームはその場で解体し、解体時点の残りの在室者付きで返す。
    pub fn purge(&mut self, connection_id: &ConnectionId) -> Vec<GameRoom> {
        if self.waiting.as_ref() == Some(connection_id) {
            self.waiting = None;
        }

        let affected: Vec<RoomCode> = self
            .rooms
            .values()
            .filter(|room| room.contains(connection_id))
            .map(|room| room.code.clone())
            .collect();

        let mut torn_down = Vec::with_capacity(affected.len());
        for code in affected {
            if let Some(mut room) = self.rooms.remove(&code) {
                room.vacate(connection_id);
                torn_down.push(room);
            }
        }
        torn_down.sort_by(|a, b| a.code.cmp(&b.code));
        torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn code(value: &str) -> RoomCode {
        RoomCode::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_open_rejects_code_collision() {
        // テスト項目: 使用中のコードでルームは作れない
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.open(code("ab12cd"), conn("x")).unwrap();

        // when (操作):
        let result = registry.open(code("ab12cd"), conn("y")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::CodeUnavailable));
        assert_eq!(registry.get(&code("ab12cd")).unwrap().occupants(), &[conn("x")]);
    }

    #[test]
    fn test_join_unknown_room() {
        // テスト項目: 存在しないコードへの参加は RoomNotFound
        // given (前提条件):
        let mut registry = RoomRegistry::new();

        // when (操作):
        let result = registry.join(&code("nope"), conn("y")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomNotFound));
    }

    #[test]
    fn test_join_full_room_keeps_two_occupants() {
        // テスト項目: 満席のルームへの参加は RoomFull で、在室者数は 2 のまま
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.open(code("ab12cd"), conn("x")).unwrap();
        registry.join(&code("ab12cd"), conn("y")).unwrap();

        // when (操作):
        let result = registry.join(&code("ab12cd"), conn("z")).map(|_| ());

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomFull));
        assert_eq!(registry.get(&code("ab12cd")).unwrap().occupants().len(), 2);
    }

    #[test]
    fn test_enqueue_pairs_waiting_connection() {
        // テスト項目: 二人目が待機列に入るとペアのルームができ、待機枠が空く
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let first = registry.enqueue(conn("x"));

        // when (操作):
        let second = registry.enqueue(conn("y"));

        // then (期待する結果):
        assert_eq!(first, QueueOutcome::Waiting);
        let QueueOutcome::Paired(room) = second else {
            panic!("expected a paired room");
        };
        assert_eq!(room.code.as_str(), "x_y");
        assert_eq!(room.occupants(), &[conn("x"), conn("y")]);
        assert!(registry.waiting().is_none());
        assert!(registry.contains(&room.code));
    }

    #[test]
    fn test_enqueue_same_connection_twice_keeps_waiting() {
        // テスト項目: 待機中の接続が再度並んでも自分とはペアにならない
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.enqueue(conn("x"));

        // when (操作):
        let outcome = registry.enqueue(conn("x"));

        // then (期待する結果):
        assert_eq!(outcome, QueueOutcome::Waiting);
        assert_eq!(registry.waiting(), Some(&conn("x")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_purge_clears_waiting_slot() {
        // テスト項目: 待機中の接続が切断されると待機枠が空く
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.enqueue(conn("x"));

        // when (操作):
        let torn_down = registry.purge(&conn("x"));

        // then (期待する結果):
        assert!(torn_down.is_empty());
        assert!(registry.waiting().is_none());
    }

    #[test]
    fn test_purge_tears_down_room_when_any_seat_leaves() {
        // テスト項目: 一人でも抜けたルームは解体され、他のルームは影響を受けない
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.open(code("room1"), conn("x")).unwrap();
        registry.join(&code("room1"), conn("y")).unwrap();
        registry.open(code("room2"), conn("z")).unwrap();

        // when (操作):
        let torn_down = registry.purge(&conn("x"));

        // then (期待する結果):
        assert_eq!(torn_down.len(), 1);
        assert_eq!(torn_down[0].code, code("room1"));
        assert_eq!(torn_down[0].occupants(), &[conn("y")]);
        assert!(!registry.contains(&code("room1")));
        assert!(registry.contains(&code("room2")));
        assert!(!registry.is_seated(&conn("x")));
    }

    #[test]
    fn test_purge_removes_every_room_of_connection() {
        // テスト項目: 複数ルームに座っている接続の切断で全ルームが消える
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.open(code("room1"), conn("x")).unwrap();
        registry.open(code("room2"), conn("x")).unwrap();

        // when (操作):
        let torn_down = registry.purge(&conn("x"));
        let again = registry.purge(&conn("x"));

        // then (期待する結果):
        assert_eq!(torn_down.len(), 2);
        assert!(torn_down.iter().all(GameRoom::is_empty));
        assert!(again.is_empty());
        assert!(registry.is_empty());
    }
}
