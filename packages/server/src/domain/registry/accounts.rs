//! アカウント台帳
//!
//! ユーザー名 → Account。永続化はせず、プロセスが生きている間だけ保持する。

use std::collections::HashMap;

use crate::domain::{
    entity::Account,
    error::AuthError,
    value_object::{Credential, Username},
};

#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: HashMap<Username, Account>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, username: Username, credential: Credential) -> Result<(), AuthError> {
        if self.accounts.contains_key(&username) {
            return Err(AuthError::DuplicateAccount);
        }
        self.accounts
            .insert(username.clone(), Account::new(username, credential));
        Ok(())
    }

    pub fn authenticate(
        &self,
        username: &Username,
        credential: &Credential,
    ) -> Result<&Account, AuthError> {
        let account = self
            .accounts
            .get(username)
            .ok_or(AuthError::UnknownAccount)?;
        if !account.verify(credential) {
            return Err(AuthError::BadCredential);
        }
        Ok(account)
    }

    pub fn contains(&self, username: &Username) -> bool {
        self.accounts.contains_key(username)
    }

    pub fn get(&self, username: &Username) -> Option<&Account> {
        self.accounts.get(username)
    }

    pub fn get_mut(&mut self, username: &Username) -> Option<&mut Account> {
        self.accounts.get_mut(username)
    }

    /// フレンド一覧（アカウントが無ければ空）
    pub fn friends_of(&self, username: &Username) -> Vec<Username> {
        self.accounts
            .get(username)
            .map(Account::friends)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
