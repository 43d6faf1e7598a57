//! Session エンティティ
//!
//! 一つの生存中の接続に対するサーバー側の記録。

use crate::domain::value_object::{ConnectionId, DisplayName, Timestamp, Username};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    /// 表示名（未設定なら匿名）
    pub display_name: Option<DisplayName>,
    /// サインアップまたはログインで紐づいたアカウント
    pub account: Option<Username>,
}

impl Session {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            display_name: None,
            account: None,
        }
    }

    pub fn is_named(&self) -> bool {
        self.display_name.is_some()
    }
}
