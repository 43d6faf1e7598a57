//! Identity Registry
//!
//! 接続 → セッション（表示名・アカウント）の対応と、
//! アカウント名 → 接続の逆引き索引、オンライン集合を管理する。
//!
//! 逆引き索引はサインアップ／ログインで紐づいたアカウント名だけを対象にする。
//! 一つのアカウント名を同時に紐づけられる接続は一つまで。

use std::collections::{HashMap, HashSet};

use crate::domain::{
    entity::Session,
    error::AuthError,
    value_object::{ConnectionId, DisplayName, Timestamp, Username},
};

/// アカウントの紐づけを外したときの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Released {
    pub username: Username,
    /// 解除直前にオンラインだったか
    pub was_online: bool,
}

#[derive(Debug, Default)]
pub struct IdentityRegistry {
    sessions: HashMap<ConnectionId, Session>,
    bindings: HashMap<Username, ConnectionId>,
    online: HashSet<Username>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続を登録する。既に登録済みなら `false`。
    pub fn register(&mut self, connection_id: ConnectionId, connected_at: Timestamp) -> bool {
        if self.sessions.contains_key(&connection_id) {
            return false;
        }
        self.sessions.insert(
            connection_id.clone(),
            Session::new(connection_id, connected_at),
        );
        true
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.sessions.contains_key(connection_id)
    }

    pub fn session(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(connection_id)
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// 表示名を上書きする（一意性は確認しない）
    pub fn set_display_name(
        &mut self,
        connection_id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), AuthError> {
        let session = self
            .sessions
            .get_mut(connection_id)
            .ok_or(AuthError::UnknownConnection)?;
        session.display_name = Some(name);
        Ok(())
    }

    pub fn display_name(&self, connection_id: &ConnectionId) -> Option<&DisplayName> {
        self.sessions
            .get(connection_id)
            .and_then(|session| session.display_name.as_ref())
    }

    pub fn account_of(&self, connection_id: &ConnectionId) -> Option<&Username> {
        self.sessions
            .get(connection_id)
            .and_then(|session| session.account.as_ref())
    }

    /// 既に他の接続へ紐づいているアカウント名か
    pub fn is_bound_elsewhere(&self, username: &Username, connection_id: &ConnectionId) -> bool {
        self.bindings
            .get(username)
            .is_some_and(|bound| bound != connection_id)
    }

    /// アカウントを接続に紐づけ、表示名をアカウント名にする。
    ///
    /// 接続が別のアカウントに紐づいていた場合は先に解除し、その情報を返す。
    pub fn bind_account(
        &mut self,
        connection_id: &ConnectionId,
        username: Username,
        online: bool,
    ) -> Result<Option<Released>, AuthError> {
        if !self.sessions.contains_key(connection_id) {
            return Err(AuthError::UnknownConnection);
        }
        if self.is_bound_elsewhere(&username, connection_id) {
            return Err(AuthError::AlreadySignedIn);
        }

        let switching = self
            .account_of(connection_id)
            .is_some_and(|current| current != &username);
        let previous = if switching {
            self.release_account(connection_id)
        } else {
            None
        };

        if let Some(session) = self.sessions.get_mut(connection_id) {
            session.display_name = Some(DisplayName::from(&username));
            session.account = Some(username.clone());
        }
        self.bindings.insert(username.clone(), connection_id.clone());
        if online {
            self.online.insert(username);
        }
        Ok(previous)
    }

    /// 接続からアカウントと表示名を外す
    pub fn release_account(&mut self, connection_id: &ConnectionId) -> Option<Released> {
        let session = self.sessions.get_mut(connection_id)?;
        let username = session.account.take()?;
        session.display_name = None;
        Some(self.unindex(&username, connection_id))
    }

    /// アカウント名 → 接続の逆引き
    pub fn resolve(&self, username: &Username) -> Option<&ConnectionId> {
        self.bindings.get(username)
    }

    pub fn is_online(&self, username: &Username) -> bool {
        self.online.contains(username)
    }

    pub fn online_count(&self) -> usize {
        self.online.len()
    }

    /// 切断された接続を取り除く。何度呼んでも安全。
    ///
    /// 紐づいていたアカウントがあればその情報を返す。
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Option<Released> {
        let session = self.sessions.remove(connection_id)?;
        let username = session.account?;
        Some(self.unindex(&username, connection_id))
    }

    fn unindex(&mut self, username: &Username, connection_id: &ConnectionId) -> Released {
        if self.bindings.get(username) == Some(connection_id) {
            self.bindings.remove(username);
        }
        let was_online = self.online.remove(username);
        Released {
            username: username.clone(),
            was_online,
        }
    }
}
