//! スコープ付き指し手リスト
//!
//! 構築時にプールからスロットを借りて生成器で埋め、drop でスロットを返す。
//! 探索の1ノード（1回の再帰呼び出し）の間だけ生きる。早期 return でも
//! panic による巻き戻しでも drop は必ず走るので、入れ子のリストは常に
//! LIFO 順に返却される。

use std::fmt;

use super::generator::{MoveGenerator, ThreadIdentity};
use super::types::{ExtMove, GenType};
use crate::pool::{MoveListPool, PoolRegistry, SlotHandle};
use crate::types::Move;

/// スコープ付き指し手リスト
pub struct ScopedMoveList<'p> {
    pool: &'p MoveListPool,
    /// 借りているスロット（drop で返却した後は None）
    slot: Option<SlotHandle>,
    /// 生成器が書き込んだ指し手数
    len: usize,
    kind: GenType,
}

impl<'p> ScopedMoveList<'p> {
    /// `pool` からスロットを借り、`generator` で `kind` の指し手を生成する
    ///
    /// # Panics
    ///
    /// プールが枯渇している場合、または生成器がスロット長を超える数を返した場合。
    /// 生成器の中で panic した場合も借りたスロットは返却される。
    #[track_caller]
    pub fn new<P, G>(pool: &'p MoveListPool, generator: &G, kind: GenType, pos: &P) -> Self
    where
        P: ?Sized,
        G: MoveGenerator<P> + ?Sized,
    {
        // 生成器が panic してもスロットを返せるよう、先に list へ持たせる
        let mut list = Self {
            pool,
            slot: None,
            len: 0,
            kind,
        };
        let slot = list.slot.insert(pool.acquire());
        let buffer = pool.slot_mut(slot);
        let capacity = buffer.len();
        let written = generator.generate(kind, pos, buffer);
        assert!(
            written <= capacity,
            "move generator reported {written} moves for a slot of {capacity}"
        );
        list.len = written;
        list
    }

    /// 局面のスレッド番号からプールを引いて生成する
    #[track_caller]
    pub fn from_registry<P, G>(
        registry: &'p PoolRegistry,
        generator: &G,
        kind: GenType,
        pos: &P,
    ) -> Self
    where
        P: ThreadIdentity + ?Sized,
        G: MoveGenerator<P> + ?Sized,
    {
        Self::new(registry.pool_for(pos.thread_id()), generator, kind, pos)
    }

    /// 生成された指し手（読み取り専用）
    #[inline]
    pub fn as_slice(&self) -> &[ExtMove] {
        match &self.slot {
            Some(slot) => &self.pool.slot(slot)[..self.len],
            None => &[],
        }
    }

    /// イテレータを取得
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ExtMove> {
        self.as_slice().iter()
    }

    /// 指し手だけを列挙する
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.iter().map(|ext| ext.mv)
    }

    /// 指し手の数
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 指定された指し手が含まれているか（スコアは無視）
    pub fn contains(&self, mv: Move) -> bool {
        self.iter().any(|ext| ext.mv == mv)
    }

    /// 生成タイプ
    #[inline]
    pub fn kind(&self) -> GenType {
        self.kind
    }

    /// 借りているスロット番号
    #[inline]
    pub fn slot_index(&self) -> Option<usize> {
        self.slot.as_ref().map(SlotHandle::index)
    }
}

impl Drop for ScopedMoveList<'_> {
    #[inline]
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.pool.release(slot);
        }
    }
}

impl std::ops::Index<usize> for ScopedMoveList<'_> {
    type Output = ExtMove;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a ScopedMoveList<'_> {
    type Item = &'a ExtMove;
    type IntoIter = std::slice::Iter<'a, ExtMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for ScopedMoveList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedMoveList")
            .field("kind", &self.kind)
            .field("slot", &self.slot_index())
            .field("moves", &self.as_slice())
            .finish()
    }
}
