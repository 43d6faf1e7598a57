//! Presence & Social Graph: フレンド申請・応答・削除とプレゼンスのファンアウト
//!
//! 操作者を名乗るユーザー名（`from` / `to` / `username`）は、呼び出し元の接続に
//! 紐づいたアカウントと一致しなければならない。

use crate::domain::{
    error::SocialError,
    event::{Outbox, ServerEvent},
    value_object::{ConnectionId, Username},
};

use super::Lobby;

impl Lobby {
    /// `from` から `to` へフレンド申請を送る
    ///
    /// `to` のアカウントが無い、既にフレンド、同じ申請が未処理のいずれかなら何もしない。
    pub fn send_friend_request(
        &mut self,
        connection_id: &ConnectionId,
        from: Username,
        to: Username,
    ) -> Result<Outbox, SocialError> {
        self.ensure_acting_as(connection_id, &from)?;
        if from == to {
            return Err(SocialError::SelfRequest);
        }

        let mut outbox = Outbox::new();
        let Some(target) = self.accounts.get_mut(&to) else {
            return Ok(outbox);
        };
        if target.is_friend(&from) || !target.receive_request(from.clone()) {
            return Ok(outbox);
        }

        if let Some(target_connection) = self.identity.resolve(&to) {
            outbox.send(
                target_connection.clone(),
                ServerEvent::FriendRequestReceived { from },
            );
        }
        Ok(outbox)
    }

    /// `to` が `from` からの申請に応答する
    ///
    /// 申請は無条件に取り除く。承認なら申請の有無にかかわらず双方向のフレンド関係を作る。
    /// どちらの場合も両者へ最新のフレンド一覧を送る。
    pub fn respond_friend_request(
        &mut self,
        connection_id: &ConnectionId,
        from: Username,
        to: Username,
        accept: bool,
    ) -> Result<Outbox, SocialError> {
        self.ensure_acting_as(connection_id, &to)?;

        if let Some(account) = self.accounts.get_mut(&to) {
            account.withdraw_request(&from);
        }
        let befriended = accept && self.link(&from, &to);

        let mut outbox = Outbox::new();
        outbox.append(self.friend_list_snapshot(&from));
        outbox.append(self.friend_list_snapshot(&to));
        if befriended {
            outbox.append(self.status_of(&from, &to));
            outbox.append(self.status_of(&to, &from));
        }
        Ok(outbox)
    }

    /// 双方向のフレンド関係を外す（無ければ何もしない）
    pub fn remove_friend(
        &mut self,
        connection_id: &ConnectionId,
        username: Username,
        target: Username,
    ) -> Result<Outbox, SocialError> {
        self.ensure_acting_as(connection_id, &username)?;

        if let Some(account) = self.accounts.get_mut(&username) {
            account.remove_friend(&target);
        }
        if let Some(account) = self.accounts.get_mut(&target) {
            account.remove_friend(&username);
        }

        let mut outbox = self.friend_list_snapshot(&username);
        outbox.append(self.friend_list_snapshot(&target));
        Ok(outbox)
    }

    /// `username` の現在のオンライン状態を、接続中のフレンド全員へ通知する
    pub fn fan_out_presence(&self, username: &Username) -> Outbox {
        let mut outbox = Outbox::new();
        for friend in self.accounts.friends_of(username) {
            outbox.append(self.status_of(username, &friend));
        }
        outbox
    }

    fn ensure_acting_as(
        &self,
        connection_id: &ConnectionId,
        claimed: &Username,
    ) -> Result<(), SocialError> {
        match self.identity.account_of(connection_id) {
            None => Err(SocialError::NotSignedIn),
            Some(actual) if actual != claimed => Err(SocialError::Impersonation {
                claimed: claimed.to_string(),
                actual: actual.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// 双方のアカウントにフレンド関係を追加する。どちらかが変化したら `true`。
    fn link(&mut self, a: &Username, b: &Username) -> bool {
        if !self.accounts.contains(a) || !self.accounts.contains(b) {
            return false;
        }
        let mut changed = false;
        if let Some(account) = self.accounts.get_mut(a) {
            changed |= account.add_friend(b.clone());
        }
        if let Some(account) = self.accounts.get_mut(b) {
            changed |= account.add_friend(a.clone());
        }
        changed
    }

    /// `username` の接続へフレンド一覧を送る（接続が無ければ空）
    fn friend_list_snapshot(&self, username: &Username) -> Outbox {
        let mut outbox = Outbox::new();
        if let Some(connection_id) = self.identity.resolve(username) {
            outbox.send(
                connection_id.clone(),
                ServerEvent::FriendListUpdate {
                    friends: self.accounts.friends_of(username),
                },
            );
        }
        outbox
    }

    /// `subject` のオンライン状態を `observer` の接続へ送る
    fn status_of(&self, subject: &Username, observer: &Username) -> Outbox {
        let mut outbox = Outbox::new();
        if let Some(connection_id) = self.identity.resolve(observer) {
            outbox.send(
                connection_id.clone(),
                ServerEvent::FriendStatusUpdate {
                    friend: subject.clone(),
                    is_online: self.identity.is_online(subject),
                },
            );
        }
        outbox
    }
}
