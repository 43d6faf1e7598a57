//! サーバーから接続へ送る通知
//!
//! Lobby は状態を変更した結果として `Outbox` を返す。配送は UseCase 層が
//! ロックを解放した後に `MessagePusher` 経由で行う（fire-and-forget）。

use crate::domain::value_object::{
    BoardPayload, ChatText, ConnectionId, DisplayName, RoomCode, Timestamp, Username,
};

/// `start` で通知する一席分の情報
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeat {
    pub id: ConnectionId,
    pub name: String,
}

/// 接続へ送るドメインイベント
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    NicknameAck {
        success: bool,
    },
    AuthSuccess {
        username: Username,
    },
    AuthError {
        message: String,
    },
    LoggedOut {
        username: Username,
    },
    RoomCreated {
        room: RoomCode,
    },
    JoinError {
        message: String,
    },
    QueueWaiting,
    Start {
        room: RoomCode,
        players: Vec<PlayerSeat>,
    },
    Update {
        board: BoardPayload,
    },
    Restart,
    OpponentLeft {
        room: RoomCode,
    },
    Chat {
        sender: DisplayName,
        message: ChatText,
        timestamp: Timestamp,
    },
    ChatError {
        message: String,
    },
    FriendRequestReceived {
        from: Username,
    },
    FriendListUpdate {
        friends: Vec<Username>,
    },
    FriendStatusUpdate {
        friend: Username,
        is_online: bool,
    },
}

/// 一件の配送指示
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Unicast {
        to: ConnectionId,
        event: ServerEvent,
    },
    Multicast {
        to: Vec<ConnectionId>,
        event: ServerEvent,
    },
}

impl Delivery {
    pub fn is_for(&self, connection_id: &ConnectionId) -> bool {
        match self {
            Delivery::Unicast { to, .. } => to == connection_id,
            Delivery::Multicast { to, .. } => to.contains(connection_id),
        }
    }

    pub fn event(&self) -> &ServerEvent {
        match self {
            Delivery::Unicast { event, .. } | Delivery::Multicast { event, .. } => event,
        }
    }
}

/// 一つのイベント処理で発生した配送指示の列（生成順）
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outbox {
    deliveries: Vec<Delivery>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, to: ConnectionId, event: ServerEvent) {
        self.deliveries.push(Delivery::Unicast { to, event });
    }

    /// 宛先が空の場合は何も積まない
    pub fn multicast(&mut self, to: Vec<ConnectionId>, event: ServerEvent) {
        if to.is_empty() {
            return;
        }
        self.deliveries.push(Delivery::Multicast { to, event });
    }

    pub fn append(&mut self, other: Outbox) {
        self.deliveries.extend(other.deliveries);
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn into_deliveries(self) -> Vec<Delivery> {
        self.deliveries
    }

    /// 指定の接続が受け取るイベント（配送順）
    pub fn events_for(&self, connection_id: &ConnectionId) -> Vec<&ServerEvent> {
        self.deliveries
            .iter()
            .filter(|delivery| delivery.is_for(connection_id))
            .map(Delivery::event)
            .collect()
    }
}
