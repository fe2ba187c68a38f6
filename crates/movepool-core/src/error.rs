//! プールのエラー型

use std::collections::TryReserveError;

use thiserror::Error;

/// プール操作のエラー
#[derive(Debug, Error)]
pub enum PoolError {
    /// 設定値が不正（確保を試みる前に検出する）
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(&'static str),

    /// `depth_capacity × max_moves_per_position` が usize に収まらない
    #[error("pool size overflows usize: {slots} slots x {moves_per_slot} moves")]
    SizeOverflow { slots: usize, moves_per_slot: usize },

    /// バッキングストレージを確保できなかった
    #[error("failed to allocate {bytes} bytes for move list pool")]
    Allocation {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    /// 全スロットが使用中（`depth_capacity` が実際の再帰深さより小さい）
    #[error("move list pool exhausted: all {depth_capacity} slots are in use")]
    Exhausted { depth_capacity: usize },

    /// 未初期化（または destroy 済み）のプールから取得しようとした
    #[error("move list pool is not initialized")]
    Uninitialized,
}

pub type Result<T> = std::result::Result<T, PoolError>;
