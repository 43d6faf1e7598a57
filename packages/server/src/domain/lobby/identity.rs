//! Identity: ニックネーム・サインアップ・ログイン・ログアウト

use crate::domain::{
    error::AuthError,
    event::{Outbox, ServerEvent},
    registry::Released,
    value_object::{ConnectionId, Credential, DisplayName, Username},
};

use super::Lobby;

impl Lobby {
    /// 表示名を設定する（一意性は確認しない）。成功は呼び出し元にのみ返す。
    pub fn set_nickname(
        &mut self,
        connection_id: &ConnectionId,
        name: DisplayName,
    ) -> Result<Outbox, AuthError> {
        self.identity.set_display_name(connection_id, name)?;

        let mut outbox = Outbox::new();
        outbox.send(
            connection_id.clone(),
            ServerEvent::NicknameAck { success: true },
        );
        Ok(outbox)
    }

    /// アカウントを作成し、接続の表示名をユーザー名にする（オンラインにはしない）
    pub fn signup(
        &mut self,
        connection_id: &ConnectionId,
        username: Username,
        credential: Credential,
    ) -> Result<Outbox, AuthError> {
        if !self.identity.contains(connection_id) {
            return Err(AuthError::UnknownConnection);
        }
        self.accounts.register(username.clone(), credential)?;
        let previous = self
            .identity
            .bind_account(connection_id, username.clone(), false)?;

        let mut outbox = self.release_outbox(previous);
        outbox.send(connection_id.clone(), ServerEvent::AuthSuccess { username });
        Ok(outbox)
    }

    /// 認証してオンラインにし、フレンドへプレゼンスを通知する
    ///
    /// 呼び出し元には `AuthSuccess` に続けて、フレンド一覧・オンライン中のフレンドの状態・
    /// 未処理の申請を送る。
    pub fn login(
        &mut self,
        connection_id: &ConnectionId,
        username: Username,
        credential: Credential,
    ) -> Result<Outbox, AuthError> {
        if !self.identity.contains(connection_id) {
            return Err(AuthError::UnknownConnection);
        }
        let (friends, pending) = {
            let account = self.accounts.authenticate(&username, &credential)?;
            (account.friends(), account.pending_requests().to_vec())
        };
        let previous = self
            .identity
            .bind_account(connection_id, username.clone(), true)?;

        let mut outbox = self.release_outbox(previous);
        outbox.send(
            connection_id.clone(),
            ServerEvent::AuthSuccess {
                username: username.clone(),
            },
        );
        let online_friends: Vec<Username> = friends
            .iter()
            .filter(|friend| self.identity.is_online(friend))
            .cloned()
            .collect();
        outbox.send(
            connection_id.clone(),
            ServerEvent::FriendListUpdate { friends },
        );
        for friend in online_friends {
            outbox.send(
                connection_id.clone(),
                ServerEvent::FriendStatusUpdate {
                    friend,
                    is_online: true,
                },
            );
        }
        for from in pending {
            outbox.send(
                connection_id.clone(),
                ServerEvent::FriendRequestReceived { from },
            );
        }
        outbox.append(self.fan_out_presence(&username));
        Ok(outbox)
    }

    /// アカウントの紐づけと表示名を外し、オフラインとして通知する
    pub fn logout(&mut self, connection_id: &ConnectionId) -> Result<Outbox, AuthError> {
        if !self.identity.contains(connection_id) {
            return Err(AuthError::UnknownConnection);
        }
        let released = self
            .identity
            .release_account(connection_id)
            .ok_or(AuthError::NotSignedIn)?;
        let username = released.username.clone();

        let mut outbox = self.release_outbox(Some(released));
        outbox.send(connection_id.clone(), ServerEvent::LoggedOut { username });
        Ok(outbox)
    }

    /// ユーザー名 → 接続の逆引き（アカウントに紐づいた名前のみ）
    pub fn resolve_connection(&self, username: &Username) -> Option<&ConnectionId> {
        self.identity.resolve(username)
    }

    fn release_outbox(&self, released: Option<Released>) -> Outbox {
        match released {
            Some(released) if released.was_online => self.fan_out_presence(&released.username),
            _ => Outbox::new(),
        }
    }
}
