//! 指し手生成器・スレッド識別との境界
//!
//! 盤面表現と指し手生成アルゴリズムは本クレートの外にある。
//! ここではプールが呼び出す側のインターフェースだけを定義する。

use super::types::{ExtMove, GenType};

/// 指し手生成器
///
/// `buffer` の先頭から指し手を書き込み、書き込んだ数を返す。
/// `buffer.len()` はプールの `max_moves_per_position` に等しい。
/// 1つの `ScopedMoveList` につき、ちょうど1回だけ呼ばれる。
pub trait MoveGenerator<P: ?Sized> {
    fn generate(&self, kind: GenType, pos: &P, buffer: &mut [ExtMove]) -> usize;
}

impl<P, F> MoveGenerator<P> for F
where
    P: ?Sized,
    F: Fn(GenType, &P, &mut [ExtMove]) -> usize,
{
    #[inline]
    fn generate(&self, kind: GenType, pos: &P, buffer: &mut [ExtMove]) -> usize {
        self(kind, pos, buffer)
    }
}

/// いま探索しているワーカースレッドの番号を返す
///
/// 局面や探索コンテキストが実装する。返す番号が正しいことは呼び出し側の責任で、
/// プールは検証しない（範囲外なら `PoolRegistry::pool_for` が panic する）。
pub trait ThreadIdentity {
    fn thread_id(&self) -> usize;
}

impl<T: ThreadIdentity + ?Sized> ThreadIdentity for &T {
    #[inline]
    fn thread_id(&self) -> usize {
        (**self).thread_id()
    }
}
