//! 指し手生成まわりの型定義

use std::fmt;

use crate::types::Move;

/// 1局面での最大合法手数
/// 将棋の理論上の最大は593手だが、余裕を持たせる
pub const MAX_MOVES: usize = 600;

/// 指し手生成のタイプ
///
/// プール自身は解釈せず、そのまま生成器へ渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenType {
    /// 駒を取る指し手
    Captures,
    /// 駒を取らない指し手
    Quiets,
    /// 駒を取らない王手
    QuietChecks,
    /// 王手回避手
    Evasions,
    /// 王手がかかっていない全ての手
    NonEvasions,
    /// 合法手すべて
    Legal,
}

impl GenType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Captures => "captures",
            Self::Quiets => "quiets",
            Self::QuietChecks => "quiet_checks",
            Self::Evasions => "evasions",
            Self::NonEvasions => "non_evasions",
            Self::Legal => "legal",
        }
    }
}

impl fmt::Display for GenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 指し手とスコアのペア（オーダリング用）
///
/// 比較（`==`, `<`）はスコアのみで行う。指し手同士を比べたいときは `mv` を見ること。
#[derive(Debug, Clone, Copy)]
pub struct ExtMove {
    /// 指し手
    pub mv: Move,
    /// オーダリング用スコア
    pub value: i32,
}

impl ExtMove {
    /// スロットの初期値
    pub const NONE: ExtMove = ExtMove::new(Move::NONE, 0);

    /// 新しいExtMoveを作成
    #[inline]
    pub const fn new(mv: Move, value: i32) -> Self {
        Self { mv, value }
    }
}

impl Default for ExtMove {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Move> for ExtMove {
    #[inline]
    fn from(mv: Move) -> Self {
        Self { mv, value: 0 }
    }
}

impl From<ExtMove> for Move {
    #[inline]
    fn from(ext: ExtMove) -> Self {
        ext.mv
    }
}

impl PartialOrd for ExtMove {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtMove {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialEq for ExtMove {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ExtMove {}
