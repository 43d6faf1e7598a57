//! Account エンティティ
//!
//! ユーザー名をキーとするアカウント。フレンド関係と未処理のフレンド申請を保持する。
//! 削除フローは存在しないため、一度作られたアカウントはプロセス終了まで残る。

use std::collections::BTreeSet;

use crate::domain::value_object::{Credential, Username};

#[derive(Debug, Clone)]
pub struct Account {
    pub username: Username,
    credential: Credential,
    friends: BTreeSet<Username>,
    /// 受信したフレンド申請（受信順）
    pending_requests: Vec<Username>,
}

impl Account {
    pub fn new(username: Username, credential: Credential) -> Self {
        Self {
            username,
            credential,
            friends: BTreeSet::new(),
            pending_requests: Vec::new(),
        }
    }

    pub fn verify(&self, credential: &Credential) -> bool {
        &self.credential == credential
    }

    pub fn is_friend(&self, other: &Username) -> bool {
        self.friends.contains(other)
    }

    /// フレンド一覧（名前順）
    pub fn friends(&self) -> Vec<Username> {
        self.friends.iter().cloned().collect()
    }

    pub fn pending_requests(&self) -> &[Username] {
        &self.pending_requests
    }

    pub fn has_pending_request_from(&self, from: &Username) -> bool {
        self.pending_requests.contains(from)
    }

    /// 申請を受け付ける。同じ送信者からの重複は無視して `false` を返す。
    pub fn receive_request(&mut self, from: Username) -> bool {
        if self.has_pending_request_from(&from) {
            return false;
        }
        self.pending_requests.push(from);
        true
    }

    /// 申請を取り除く。存在しなかった場合は `false`。
    pub fn withdraw_request(&mut self, from: &Username) -> bool {
        let before = self.pending_requests.len();
        self.pending_requests.retain(|pending| pending != from);
        before != self.pending_requests.len()
    }

    pub fn add_friend(&mut self, other: Username) -> bool {
        self.friends.insert(other)
    }

    pub fn remove_friend(&mut self, other: &Username) -> bool {
        self.friends.remove(other)
    }
}
