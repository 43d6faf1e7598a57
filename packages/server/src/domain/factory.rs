//! ルームコードの生成
//!
//! テストで決定的なコードを使えるよう、生成器は trait で差し替え可能にしている。

use std::{collections::VecDeque, sync::Mutex};

use rand::Rng;

use super::value_object::RoomCode;

/// ルームコードに使う文字（英小文字 + 数字）
pub const ROOM_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// 既定のルームコード長
pub const DEFAULT_ROOM_CODE_LENGTH: usize = 6;

pub trait RoomCodeFactory: Send + Sync {
    fn generate(&self) -> RoomCode;
}

/// `rand` による英数字コード生成器
#[derive(Debug, Clone, Copy)]
pub struct RandomRoomCodeFactory {
    length: usize,
}

impl RandomRoomCodeFactory {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl Default for RandomRoomCodeFactory {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_CODE_LENGTH)
    }
}

impl RoomCodeFactory for RandomRoomCodeFactory {
    fn generate(&self) -> RoomCode {
        let mut rng = rand::thread_rng();
        let code: String = (0..self.length)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        RoomCode::from_trusted(code)
    }
}

/// 事前に与えたコードを順番に返す生成器
///
/// 使い切った後は `room-<n>` を連番で返す。
#[derive(Debug, Default)]
pub struct SequenceRoomCodeFactory {
    codes: Mutex<VecDeque<String>>,
    fallback: Mutex<u64>,
}

impl SequenceRoomCodeFactory {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: Mutex::new(codes.into_iter().map(Into::into).collect()),
            fallback: Mutex::new(0),
        }
    }
}

impl RoomCodeFactory for SequenceRoomCodeFactory {
    fn generate(&self) -> RoomCode {
        let next = self
            .codes
            .lock()
            .ok()
            .and_then(|mut codes| codes.pop_front());
        if let Some(code) = next.and_then(|code| RoomCode::new(code).ok()) {
            return code;
        }

        let mut counter = self.fallback.lock().unwrap_or_else(|e| e.into_inner());
        *counter += 1;
        RoomCode::from_trusted(format!("room-{}", *counter))
    }
}
