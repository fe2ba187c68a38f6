//! 指し手リストのスロットプール本体
//!
//! - `MoveListPool`: `depth_capacity` 個のスロットと空きスロット番号の LIFO スタック
//! - `SlotHandle`: 貸し出し中のスロットを表すトークン
//!
//! スロットは1本の連続領域から切り出す。スタックの `[top, depth_capacity)` が
//! 空きスロット、それ以外が貸し出し中。acquire / release はどちらも O(1)。
//!
//! プールは `Send` だが `Sync` ではない。1つのプールは常に1スレッドからしか
//! 触られないので、ホットパスでロックもアトミック操作も使わない。

use std::cell::{Cell, UnsafeCell};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::alloc::{allocation_error, try_boxed_slice};
use crate::config::{pool_bytes, validate_pool_shape};
use crate::error::{PoolError, Result};
use crate::movegen::ExtMove;

/// 未初期化プールの ID
const UNINITIALIZED: u64 = 0;

/// プール ID の払い出し元。create のたびに新しい ID を振る
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

fn next_pool_id() -> u64 {
    NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)
}

/// 貸し出し中スロットのトークン
///
/// `Clone` できないので二重返却は起こらない。発行したプール（と世代）を覚えており、
/// 別のプールや resize 後のプールへ返却すると panic する。
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an acquired slot must be released back to its pool"]
pub struct SlotHandle {
    pool_id: u64,
    index: u32,
}

impl SlotHandle {
    /// スロット番号（0..depth_capacity）
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// 指し手リストのスロットプール
pub struct MoveListPool {
    /// create ごとに変わる ID（0 = 未初期化）
    id: u64,
    /// 全スロットのバッキングストレージ（`depth_capacity × max_moves` 要素）
    storage: Box<[UnsafeCell<ExtMove>]>,
    /// 空きスロット番号のスタック（長さ = depth_capacity）
    stack: Box<[Cell<u32>]>,
    /// 貸し出し中のスロット数
    top: Cell<usize>,
    /// create 以降の `top` の最大値
    high_water: Cell<usize>,
    /// 1スロットの要素数
    max_moves: usize,
}

impl Default for MoveListPool {
    /// 未初期化（空）のプール
    fn default() -> Self {
        Self {
            id: UNINITIALIZED,
            storage: Box::new([]),
            stack: Box::new([]),
            top: Cell::new(0),
            high_water: Cell::new(0),
            max_moves: 0,
        }
    }
}

impl MoveListPool {
    /// 確保済みのプールを作成する
    pub fn new(depth_capacity: usize, max_moves_per_position: usize) -> Result<Self> {
        let mut pool = Self::default();
        pool.create(depth_capacity, max_moves_per_position)?;
        Ok(pool)
    }

    /// バッキングストレージを確保して初期化する
    ///
    /// 形状が不正（`InvalidConfig` / `SizeOverflow`）なら何も変えずに返す。
    /// 形状が正しければ既存のストレージを destroy してから確保し、確保に失敗した
    /// 場合は未初期化状態のまま返る（部分的に確保された状態は残らない）。
    pub fn create(&mut self, depth_capacity: usize, max_moves_per_position: usize) -> Result<()> {
        validate_pool_shape(depth_capacity, max_moves_per_position)?;
        let bytes = pool_bytes(depth_capacity, max_moves_per_position)?;
        self.destroy();
        let len = depth_capacity * max_moves_per_position;

        let storage = try_boxed_slice(len, |_| UnsafeCell::new(ExtMove::NONE))
            .map_err(|e| allocation_error::<ExtMove>(len, e))?;
        // スロット 0 から順に貸し出す
        let stack = try_boxed_slice(depth_capacity, |i| Cell::new(i as u32))
            .map_err(|e| allocation_error::<u32>(depth_capacity, e))?;

        self.id = next_pool_id();
        self.storage = storage;
        self.stack = stack;
        self.top.set(0);
        self.high_water.set(0);
        self.max_moves = max_moves_per_position;

        log::debug!(
            "move list pool #{} created: {depth_capacity} slots x {max_moves_per_position} moves ({bytes} bytes)",
            self.id
        );
        Ok(())
    }

    /// バッキングストレージを解放し、未初期化状態に戻す（未初期化なら何もしない）
    ///
    /// 貸し出し中の `SlotHandle` は無効になり、以後の返却は panic する。
    pub fn destroy(&mut self) {
        if !self.is_initialized() {
            return;
        }
        let in_use = self.top.get();
        if in_use != 0 {
            log::warn!("move list pool #{} destroyed with {in_use} slot(s) still in use", self.id);
        }
        log::debug!("move list pool #{} destroyed", self.id);
        *self = Self::default();
    }

    /// サイズを変更する（destroy → create と等価）
    pub fn resize(&mut self, depth_capacity: usize, max_moves_per_position: usize) -> Result<()> {
        self.create(depth_capacity, max_moves_per_position)
    }

    /// スロットを1つ借りる
    ///
    /// 全スロット使用中なら `PoolError::Exhausted`、未初期化なら
    /// `PoolError::Uninitialized` を返す。
    #[inline]
    pub fn try_acquire(&self) -> Result<SlotHandle> {
        if !self.is_initialized() {
            return Err(PoolError::Uninitialized);
        }
        let top = self.top.get();
        let Some(entry) = self.stack.get(top) else {
            return Err(PoolError::Exhausted {
                depth_capacity: self.stack.len(),
            });
        };
        let top = top + 1;
        self.top.set(top);
        if top > self.high_water.get() {
            self.high_water.set(top);
        }
        Ok(SlotHandle {
            pool_id: self.id,
            index: entry.get(),
        })
    }

    /// スロットを1つ借りる
    ///
    /// # Panics
    ///
    /// 枯渇（`depth_capacity` が実際の再帰深さより小さい）または未初期化の場合。
    /// どちらも設定の誤りなので、回復させずに止める。
    #[inline]
    #[track_caller]
    pub fn acquire(&self) -> SlotHandle {
        match self.try_acquire() {
            Ok(handle) => handle,
            Err(err) => acquire_failed(err),
        }
    }

    /// スロットを返却する
    ///
    /// 直近に借りたものから順に返すこと（LIFO）。順序は検査しない。
    ///
    /// # Panics
    ///
    /// このプール（の現在の世代）が発行していないハンドルを渡した場合。
    #[inline]
    #[track_caller]
    pub fn release(&self, handle: SlotHandle) {
        self.check_owner(&handle);
        // 有効なハンドルが存在する限り top >= 1
        let top = self.top.get() - 1;
        self.top.set(top);
        self.stack[top].set(handle.index);
    }

    /// 借りているスロットの中身（全 `max_moves_per_position` 要素）
    #[inline]
    #[track_caller]
    pub fn slot<'a>(&'a self, handle: &'a SlotHandle) -> &'a [ExtMove] {
        let start = self.slot_start(handle);
        // SAFETY: start + max_moves <= storage.len()（index < depth_capacity）。
        // 同じスロットを指すハンドルは高々1つで、ハンドルの借用規則により
        // このスライスと同じスロットへの可変スライスは同時に存在しない。
        unsafe {
            let ptr = UnsafeCell::raw_get(self.storage.as_ptr().add(start));
            std::slice::from_raw_parts(ptr, self.max_moves)
        }
    }

    /// 借りているスロットへの書き込み用スライス
    #[inline]
    #[track_caller]
    #[allow(clippy::mut_from_ref)]
    pub fn slot_mut<'a>(&'a self, handle: &'a mut SlotHandle) -> &'a mut [ExtMove] {
        let start = self.slot_start(handle);
        // SAFETY: slot() と同じ。ハンドルを &mut で借りているので、
        // このスロットへの他の参照は存在しない。
        unsafe {
            let ptr = UnsafeCell::raw_get(self.storage.as_ptr().add(start));
            std::slice::from_raw_parts_mut(ptr, self.max_moves)
        }
    }

    /// このプールの現在の世代が発行したハンドルか
    #[inline]
    pub fn owns(&self, handle: &SlotHandle) -> bool {
        self.is_initialized() && handle.pool_id == self.id
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.id != UNINITIALIZED
    }

    /// 同時に貸し出せるスロット数
    #[inline]
    pub fn depth_capacity(&self) -> usize {
        self.stack.len()
    }

    /// 1スロットの要素数
    #[inline]
    pub fn max_moves_per_position(&self) -> usize {
        self.max_moves
    }

    /// 貸し出し中のスロット数（スタックの `top`）
    #[inline]
    pub fn in_use(&self) -> usize {
        self.top.get()
    }

    /// 空きスロット数
    #[inline]
    pub fn available(&self) -> usize {
        self.depth_capacity() - self.in_use()
    }

    /// create 以降に同時に貸し出したスロット数の最大値
    #[inline]
    pub fn high_water(&self) -> usize {
        self.high_water.get()
    }

    /// バッキングストレージのバイト数
    #[inline]
    pub fn footprint_bytes(&self) -> usize {
        self.storage.len() * std::mem::size_of::<ExtMove>()
    }

    #[inline]
    #[track_caller]
    fn slot_start(&self, handle: &SlotHandle) -> usize {
        self.check_owner(handle);
        handle.index as usize * self.max_moves
    }

    #[inline]
    #[track_caller]
    fn check_owner(&self, handle: &SlotHandle) {
        assert!(
            self.owns(handle),
            "slot handle from pool #{} used with pool #{}",
            handle.pool_id,
            self.id
        );
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn acquire_failed(err: PoolError) -> ! {
    log::error!("{err}");
    panic!("{err}");
}

impl fmt::Debug for MoveListPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveListPool")
            .field("id", &self.id)
            .field("depth_capacity", &self.depth_capacity())
            .field("max_moves_per_position", &self.max_moves)
            .field("in_use", &self.in_use())
            .field("high_water", &self.high_water())
            .finish()
    }
}
