//! スレッド別プールのレジストリ
//!
//! ワーカースレッド番号 `0..thread_count` からそのスレッド専用の
//! `MoveListPool` を引く。グローバル変数ではなく、探索エンジンが所有して
//! 参照で渡す。
//!
//! 並列探索では `worker_pools()` で各スレッドへ `&mut` を1つずつ貸す。
//! プールの形状はプールごとに持つ（`resize_pool` で個別に変えられる）。
//! `initialize` / `shutdown` / `reconfigure` は `&mut self` を取るので、
//! ワーカーがプールを借りている間は呼べない（全スレッド停止後にのみ実行される）。

use std::slice;

use super::alloc::allocation_error;
use super::slot_pool::MoveListPool;
use crate::config::PoolConfig;
use crate::error::Result;

/// スレッド別プールのレジストリ
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: Vec<MoveListPool>,
}

impl PoolRegistry {
    /// 空（未初期化）のレジストリ
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期化済みのレジストリを作成する
    pub fn with_config(config: &PoolConfig) -> Result<Self> {
        let mut registry = Self::new();
        registry.initialize(config)?;
        Ok(registry)
    }

    /// スレッド数分のプールを作成する
    ///
    /// 初期化済みなら先に shutdown する。途中で失敗した場合は作成済みのプールも
    /// 解放し、レジストリは未初期化のまま返る。
    pub fn initialize(&mut self, config: &PoolConfig) -> Result<()> {
        self.shutdown();
        config.validate()?;
        let footprint = config.footprint_bytes()?;

        let mut pools = Vec::new();
        pools
            .try_reserve_exact(config.thread_count)
            .map_err(|e| allocation_error::<MoveListPool>(config.thread_count, e))?;
        for thread_id in 0..config.thread_count {
            let pool = MoveListPool::new(config.depth_capacity, config.max_moves_per_position)
                .inspect_err(|e| {
                    log::error!("failed to create move list pool for thread {thread_id}: {e}")
                })?;
            pools.push(pool);
        }

        self.pools = pools;
        log::info!(
            "move list pools initialized: {} thread(s) x {} slots x {} moves ({} KiB total)",
            config.thread_count,
            config.depth_capacity,
            config.max_moves_per_position,
            footprint / 1024
        );
        Ok(())
    }

    /// 全プールを destroy し、レジストリを未初期化に戻す
    pub fn shutdown(&mut self) {
        if self.pools.is_empty() {
            return;
        }
        for pool in &mut self.pools {
            pool.destroy();
        }
        self.pools = Vec::new();
        log::debug!("move list pools shut down");
    }

    /// 設定を変えて作り直す（全探索スレッドが停止しているときのみ）
    pub fn reconfigure(&mut self, config: &PoolConfig) -> Result<()> {
        let previous = self.thread_count();
        self.shutdown();
        self.initialize(config)?;
        log::debug!(
            "move list pools reconfigured: {previous} -> {} thread(s)",
            config.thread_count
        );
        Ok(())
    }

    /// 1スレッド分のプールだけサイズを変更する
    ///
    /// 形状が不正なら何も変えずに `PoolError::InvalidConfig` を返す。
    /// 確保に失敗した場合はそのプールが未初期化になり、`is_initialized()` も
    /// false を返すようになる（`resize_pool` か `reconfigure` で復旧する）。
    ///
    /// # Panics
    ///
    /// `thread_id` が範囲外の場合。
    pub fn resize_pool(
        &mut self,
        thread_id: usize,
        depth_capacity: usize,
        max_moves_per_position: usize,
    ) -> Result<()> {
        self.pool_for_mut(thread_id).resize(depth_capacity, max_moves_per_position)?;
        log::debug!(
            "move list pool for thread {thread_id} resized: {depth_capacity} slots x {max_moves_per_position} moves"
        );
        Ok(())
    }

    /// スレッド番号に対応するプール
    ///
    /// # Panics
    ///
    /// `thread_id` が範囲外の場合。
    #[inline]
    #[track_caller]
    pub fn pool_for(&self, thread_id: usize) -> &MoveListPool {
        match self.pools.get(thread_id) {
            Some(pool) => pool,
            None => out_of_range(thread_id, self.pools.len()),
        }
    }

    /// スレッド番号に対応するプール（可変）
    #[inline]
    #[track_caller]
    pub fn pool_for_mut(&mut self, thread_id: usize) -> &mut MoveListPool {
        let len = self.pools.len();
        match self.pools.get_mut(thread_id) {
            Some(pool) => pool,
            None => out_of_range(thread_id, len),
        }
    }

    /// `(thread_id, &mut pool)` の列（ワーカースレッドへ1つずつ渡す用）
    pub fn worker_pools(&mut self) -> impl Iterator<Item = (usize, &mut MoveListPool)> {
        self.pools.iter_mut().enumerate()
    }

    /// 全スレッド分のプールが確保済みか
    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.pools.is_empty() && self.pools.iter().all(MoveListPool::is_initialized)
    }

    #[inline]
    pub fn thread_count(&self) -> usize {
        self.pools.len()
    }

    /// 全プールで貸し出し中のスロット数の合計
    pub fn total_in_use(&self) -> usize {
        self.pools.iter().map(MoveListPool::in_use).sum()
    }

    /// 全プールのバッキングストレージのバイト数
    pub fn footprint_bytes(&self) -> usize {
        self.pools.iter().map(MoveListPool::footprint_bytes).sum()
    }
}

impl<'a> IntoIterator for &'a PoolRegistry {
    type Item = &'a MoveListPool;
    type IntoIter = slice::Iter<'a, MoveListPool>;

    fn into_iter(self) -> Self::IntoIter {
        self.pools.iter()
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn out_of_range(thread_id: usize, thread_count: usize) -> ! {
    panic!("thread id {thread_id} is out of range (thread_count = {thread_count})");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoolError;

    #[test]
    fn test_initialize_creates_one_pool_per_thread() {
        let config = PoolConfig::new(3, 4, 8);
        let registry = PoolRegistry::with_config(&config).unwrap();
        assert!(registry.is_initialized());
        assert_eq!(registry.thread_count(), 3);
        for pool in &registry {
            assert_eq!(pool.depth_capacity(), 4);
            assert_eq!(pool.max_moves_per_position(), 8);
            assert_eq!(pool.in_use(), 0);
        }
        assert_eq!(registry.footprint_bytes(), config.footprint_bytes().unwrap());
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let mut registry = PoolRegistry::with_config(&PoolConfig::new(2, 4, 8)).unwrap();
        let err = registry.initialize(&PoolConfig::new(0, 4, 8)).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
        // 失敗後は未初期化
        assert!(!registry.is_initialized());
        assert_eq!(registry.thread_count(), 0);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut registry = PoolRegistry::with_config(&PoolConfig::new(2, 4, 8)).unwrap();
        registry.shutdown();
        assert!(!registry.is_initialized());
        assert_eq!(registry.thread_count(), 0);
        assert_eq!(registry.footprint_bytes(), 0);
        registry.shutdown();
        assert!(!registry.is_initialized());
    }

    #[test]
    fn test_reconfigure_changes_thread_count() {
        let mut registry = PoolRegistry::with_config(&PoolConfig::new(2, 4, 8)).unwrap();
        let handle = registry.pool_for(1).acquire();
        registry.pool_for(1).release(handle);

        registry.reconfigure(&PoolConfig::new(5, 16, 32)).unwrap();
        assert_eq!(registry.thread_count(), 5);
        assert_eq!(registry.pool_for(4).depth_capacity(), 16);
        assert_eq!(registry.pool_for(4).max_moves_per_position(), 32);
        assert_eq!(registry.pool_for(1).high_water(), 0);
    }

    #[test]
    fn test_resize_single_pool() {
        let mut registry = PoolRegistry::with_config(&PoolConfig::new(2, 4, 8)).unwrap();
        registry.resize_pool(1, 10, 3).unwrap();
        assert!(registry.is_initialized());
        assert_eq!(registry.pool_for(0).depth_capacity(), 4);
        assert_eq!(registry.pool_for(0).max_moves_per_position(), 8);
        assert_eq!(registry.pool_for(1).depth_capacity(), 10);
        assert_eq!(registry.pool_for(1).max_moves_per_position(), 3);
        let ext = std::mem::size_of::<crate::movegen::ExtMove>();
        assert_eq!(registry.footprint_bytes(), (4 * 8 + 10 * 3) * ext);
    }

    #[test]
    fn test_resize_rejected_shape_keeps_pool() {
        let mut registry = PoolRegistry::with_config(&PoolConfig::new(2, 4, 8)).unwrap();
        let err = registry.resize_pool(0, 0, 3).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
        // 元のプールがそのまま使える
        assert!(registry.is_initialized());
        let pool = registry.pool_for(0);
        assert!(pool.is_initialized());
        assert_eq!(pool.depth_capacity(), 4);
        assert_eq!(pool.max_moves_per_position(), 8);
        let handle = pool.acquire();
        pool.release(handle);
    }

    #[test]
    fn test_resize_allocation_failure_marks_registry_uninitialized() {
        let mut registry = PoolRegistry::with_config(&PoolConfig::new(2, 4, 8)).unwrap();
        // バイト数は usize に収まるが isize::MAX を超えるので確保に失敗する
        let err = registry.resize_pool(1, 4, usize::MAX / 32).unwrap_err();
        assert!(matches!(err, PoolError::Allocation { .. }));
        assert!(!registry.pool_for(1).is_initialized());
        assert!(registry.pool_for(0).is_initialized());
        assert!(!registry.is_initialized());

        // 作り直せば元に戻る
        registry.resize_pool(1, 4, 8).unwrap();
        assert!(registry.is_initialized());
        registry.reconfigure(&PoolConfig::new(1, 2, 2)).unwrap();
        assert_eq!(registry.thread_count(), 1);
        assert!(registry.is_initialized());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_pool_for_out_of_range_panics() {
        let registry = PoolRegistry::with_config(&PoolConfig::new(2, 4, 8)).unwrap();
        let _ = registry.pool_for(2);
    }

    #[test]
    fn test_worker_pools_are_distinct() {
        let mut registry = PoolRegistry::with_config(&PoolConfig::new(3, 2, 2)).unwrap();
        let ids: Vec<usize> = registry.worker_pools().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        for (_, pool) in registry.worker_pools() {
            let handle = pool.acquire();
            pool.release(handle);
        }
        assert_eq!(registry.total_in_use(), 0);
    }
}
