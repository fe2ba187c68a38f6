//! プール設定
//!
//! 起動時（およびスレッド数変更時）にレジストリへ渡す設定。
//! `serde` で TOML 等から読み込める。省略したフィールドは既定値になる。

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};
use crate::movegen::{ExtMove, MAX_MOVES};
use crate::types::{AUX_LISTS_PER_THREAD, MAX_PLY};

/// 既定の探索スレッド数
pub const DEFAULT_THREAD_COUNT: usize = 1;

/// 既定の深さ容量（最大 ply + 補助リスト分）
pub const DEFAULT_DEPTH_CAPACITY: usize = MAX_PLY + AUX_LISTS_PER_THREAD;

/// 指し手リストプールの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// 探索スレッド数（= プール数）
    pub thread_count: usize,
    /// 1スレッドが同時に保持できる指し手リスト数（最大再帰深さ以上にする）
    pub depth_capacity: usize,
    /// 1スロットに格納できる指し手数（1局面の最大合法手数以上にする）
    pub max_moves_per_position: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            thread_count: DEFAULT_THREAD_COUNT,
            depth_capacity: DEFAULT_DEPTH_CAPACITY,
            max_moves_per_position: MAX_MOVES,
        }
    }
}

impl PoolConfig {
    pub const fn new(
        thread_count: usize,
        depth_capacity: usize,
        max_moves_per_position: usize,
    ) -> Self {
        Self {
            thread_count,
            depth_capacity,
            max_moves_per_position,
        }
    }

    pub const fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub const fn with_depth_capacity(mut self, depth_capacity: usize) -> Self {
        self.depth_capacity = depth_capacity;
        self
    }

    pub const fn with_max_moves_per_position(mut self, max_moves_per_position: usize) -> Self {
        self.max_moves_per_position = max_moves_per_position;
        self
    }

    /// 設定値を検証する
    pub fn validate(&self) -> Result<()> {
        if self.thread_count == 0 {
            return Err(PoolError::InvalidConfig("thread_count must be at least 1"));
        }
        validate_pool_shape(self.depth_capacity, self.max_moves_per_position)?;
        self.footprint_bytes().map(|_| ())
    }

    /// 1スロットのバイト数
    #[inline]
    pub const fn slot_bytes(&self) -> usize {
        self.max_moves_per_position.saturating_mul(std::mem::size_of::<ExtMove>())
    }

    /// 1プールのバイト数（`depth_capacity × max_moves_per_position × sizeof(ExtMove)`）
    pub fn pool_bytes(&self) -> Result<usize> {
        pool_bytes(self.depth_capacity, self.max_moves_per_position)
    }

    /// 全スレッド分のバイト数
    pub fn footprint_bytes(&self) -> Result<usize> {
        let per_pool = self.pool_bytes()?;
        per_pool.checked_mul(self.thread_count).ok_or(PoolError::SizeOverflow {
            slots: self.depth_capacity.saturating_mul(self.thread_count),
            moves_per_slot: self.max_moves_per_position,
        })
    }
}

/// 1プール分の形状（スロット数・スロット長）を検証する
pub(crate) fn validate_pool_shape(depth_capacity: usize, max_moves_per_position: usize) -> Result<()> {
    if depth_capacity == 0 {
        return Err(PoolError::InvalidConfig("depth_capacity must be at least 1"));
    }
    // スロット番号は u32 で持つ
    if depth_capacity > u32::MAX as usize {
        return Err(PoolError::InvalidConfig("depth_capacity must fit in u32"));
    }
    if max_moves_per_position == 0 {
        return Err(PoolError::InvalidConfig("max_moves_per_position must be at least 1"));
    }
    Ok(())
}

pub(crate) fn pool_bytes(depth_capacity: usize, max_moves_per_position: usize) -> Result<usize> {
    depth_capacity
        .checked_mul(max_moves_per_position)
        .and_then(|n| n.checked_mul(std::mem::size_of::<ExtMove>()))
        .ok_or(PoolError::SizeOverflow {
            slots: depth_capacity,
            moves_per_slot: max_moves_per_position,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.thread_count, 1);
        assert_eq!(config.depth_capacity, MAX_PLY + AUX_LISTS_PER_THREAD);
        assert_eq!(config.max_moves_per_position, MAX_MOVES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_fields() {
        for config in [
            PoolConfig::new(0, 4, 8),
            PoolConfig::new(1, 0, 8),
            PoolConfig::new(1, 4, 0),
        ] {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, PoolError::InvalidConfig(_)), "{config:?}: {err}");
        }
    }

    #[test]
    fn test_validate_rejects_overflowing_size() {
        let config = PoolConfig::new(1, 1 << 20, usize::MAX / 2);
        assert!(matches!(config.validate(), Err(PoolError::SizeOverflow { .. })));

        let config = PoolConfig::new(usize::MAX, 1024, 1024);
        assert!(matches!(config.validate(), Err(PoolError::SizeOverflow { .. })));
    }

    #[test]
    fn test_footprint_bytes() {
        let config = PoolConfig::new(3, 4, 8);
        let ext = std::mem::size_of::<ExtMove>();
        assert_eq!(config.slot_bytes(), 8 * ext);
        assert_eq!(config.pool_bytes().unwrap(), 4 * 8 * ext);
        assert_eq!(config.footprint_bytes().unwrap(), 3 * 4 * 8 * ext);
    }

    #[test]
    fn test_builder_setters() {
        let config = PoolConfig::default()
            .with_thread_count(4)
            .with_depth_capacity(64)
            .with_max_moves_per_position(218);
        assert_eq!(config, PoolConfig::new(4, 64, 218));
    }
}
