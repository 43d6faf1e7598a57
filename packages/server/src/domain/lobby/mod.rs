//! Lobby 集約
//!
//! Identity Registry・アカウント台帳・Room Manager をまとめて所有する唯一の調整境界。
//! 各イベントのハンドラは `&mut Lobby` に対して最後まで実行され、途中で他のイベントの
//! 変更が割り込むことはない（排他は `LobbyRepository` 実装が一つのロックで行う）。
//!
//! 振る舞いはコンポーネントごとにファイルを分けている:
//!
//! - `identity`: ニックネーム、サインアップ、ログイン、ログアウト
//! - `social`: フレンド申請・応答・削除、プレゼンスのファンアウト
//! - `rooms`: ルーム作成・参加、匿名マッチング
//! - `relay`: ルーム内中継とグローバルチャット
//!
//! 接続のライフサイクル（接続・切断）はこのファイルに置く。

mod identity;
mod relay;
mod rooms;
mod social;

use super::{
    event::{Outbox, ServerEvent},
    factory::RoomCodeFactory,
    registry::{AccountDirectory, IdentityRegistry, RoomRegistry},
    value_object::{ConnectionId, Timestamp},
};

/// ルームのペアリング方式（サーバー起動時に一つだけ選ぶ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingMode {
    /// 作成者が受け取ったコードを相手が入力して参加する
    #[default]
    Code,
    /// 待機中の接続と先着順で自動的にペアにする
    Queue,
}

/// 空きコードを探す試行回数の上限
const MAX_ROOM_CODE_ATTEMPTS: usize = 32;

/// 接続・アカウント・ルームのインメモリ状態
pub struct Lobby {
    pairing_mode: PairingMode,
    code_factory: Box<dyn RoomCodeFactory>,
    identity: IdentityRegistry,
    accounts: AccountDirectory,
    rooms: RoomRegistry,
}

impl Lobby {
    pub fn new(pairing_mode: PairingMode, code_factory: Box<dyn RoomCodeFactory>) -> Self {
        Self {
            pairing_mode,
            code_factory,
            identity: IdentityRegistry::new(),
            accounts: AccountDirectory::new(),
            rooms: RoomRegistry::new(),
        }
    }

    pub fn pairing_mode(&self) -> PairingMode {
        self.pairing_mode
    }

    pub fn identity(&self) -> &IdentityRegistry {
        &self.identity
    }

    pub fn accounts(&self) -> &AccountDirectory {
        &self.accounts
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// 新しい接続を匿名状態で登録する。既に登録済みなら `false`。
    pub fn connect(&mut self, connection_id: ConnectionId, connected_at: Timestamp) -> bool {
        self.identity.register(connection_id, connected_at)
    }

    /// 切断された接続を全コンポーネントから取り除く
    ///
    /// 1. Identity Registry: 表示名とアカウントの紐づけを外し、オンラインだった場合はフレンドへ通知
    /// 2. Room Manager: 座っていた全ルームを解体し、残った在室者へ `OpponentLeft` を通知
    ///
    /// 二つの手順は互いに独立しており、どちらも既に実行済みでも問題ない。
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Outbox {
        let mut outbox = Outbox::new();

        if let Some(released) = self.identity.disconnect(connection_id) {
            if released.was_online {
                outbox.append(self.fan_out_presence(&released.username));
            }
        }

        for room in self.rooms.purge(connection_id) {
            outbox.multicast(
                room.occupants().to_vec(),
                ServerEvent::OpponentLeft {
                    room: room.code.clone(),
                },
            );
        }

        outbox
    }
}
