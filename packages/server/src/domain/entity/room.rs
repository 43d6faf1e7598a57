//! GameRoom エンティティ
//!
//! 最大二席の対戦ルーム。席順はペアリング時に固定され、席 0 が "X" になる。

use crate::domain::{
    error::RoomError,
    value_object::{ConnectionId, RoomCode},
};

/// 一つのルームに座れる接続数
pub const ROOM_CAPACITY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRoom {
    pub code: RoomCode,
    seats: Vec<ConnectionId>,
}

impl GameRoom {
    /// 一席目を埋めた状態でルームを開く
    pub fn open(code: RoomCode, host: ConnectionId) -> Self {
        Self {
            code,
            seats: vec![host],
        }
    }

    /// 二席を埋めた状態でルームを作る（匿名マッチング用）
    pub fn paired(code: RoomCode, first: ConnectionId, second: ConnectionId) -> Self {
        Self {
            code,
            seats: vec![first, second],
        }
    }

    /// 空いている席に座る
    pub fn seat(&mut self, guest: ConnectionId) -> Result<(), RoomError> {
        if self.contains(&guest) {
            return Err(RoomError::AlreadySeated);
        }
        if self.is_full() {
            return Err(RoomError::RoomFull);
        }
        self.seats.push(guest);
        Ok(())
    }

    /// 席を空ける。座っていなかった場合は `false`。
    pub fn vacate(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.seats.len();
        self.seats.retain(|seat| seat != connection_id);
        before != self.seats.len()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.seats.contains(connection_id)
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= ROOM_CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// 席順の接続一覧
    pub fn occupants(&self) -> &[ConnectionId] {
        &self.seats
    }

    /// 指定の接続以外の在室者
    pub fn others(&self, connection_id: &ConnectionId) -> Vec<ConnectionId> {
        self.seats
            .iter()
            .filter(|seat| *seat != connection_id)
            .cloned()
            .collect()
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
    fn test_open_room_has_one_seat() {
        // テスト項目: 作成直後のルームは一席だけ埋まっている
        // given (前提条件):

        // when (操作):
        let room = GameRoom::open(code("ab12cd"), conn("x"));

        // then (期待する結果):
        assert_eq!(room.occupants(), &[conn("x")]);
        assert!(!room.is_full());
    }

    #[test]
    fn test_seat_fills_second_seat_in_order() {
        // テスト項目: 二人目は二席目に座り、席順が保たれる
        // given (前提条件):
        let mut room = GameRoom::open(code("ab12cd"), conn("x"));

        // when (操作):
        let result = room.seat(conn("y"));

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(room.is_full());
        assert_eq!(room.occupants(), &[conn("x"), conn("y")]);
    }

    #[test]
    fn test_seat_rejects_third_connection() {
        // テスト項目: 満席のルームには三人目が座れない
        // given (前提条件):
        let mut room = GameRoom::open(code("ab12cd"), conn("x"));
        room.seat(conn("y")).unwrap();

        // when (操作):
        let result = room.seat(conn("z"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomFull));
        assert_eq!(room.occupants().len(), ROOM_CAPACITY);
    }

    #[test]
    fn test_seat_rejects_same_connection_twice() {
        // テスト項目: 同じ接続が二席を占めることはできない
        // given (前提条件):
        let mut room = GameRoom::open(code("ab12cd"), conn("x"));

        // when (操作):
        let result = room.seat(conn("x"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::AlreadySeated));
    }

    #[test]
    fn test_vacate_and_others() {
        // テスト項目: 退席後は残りの在室者だけが残る
        // given (前提条件):
        let mut room = GameRoom::paired(code("x_y"), conn("x"), conn("y"));

        // when (操作):
        let others_before = room.others(&conn("x"));
        let removed = room.vacate(&conn("x"));
        let removed_again = room.vacate(&conn("x"));

        // then (期待する結果):
        assert_eq!(others_before, vec![conn("y")]);
        assert!(removed);
        assert!(!removed_again);
        assert_eq!(room.occupants(), &[conn("y")]);
    }
}
