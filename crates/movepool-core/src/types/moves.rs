//! 指し手（Move）

/// 指し手（32bit）
///
/// プールは指し手の中身を解釈しない。生成器が書き込んだ値を
/// そのまま運ぶだけなので、エンコードは生成器側が決める。
/// `0` は「指し手なし」として予約する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Move(u32);

impl Move {
    /// 無効な指し手
    pub const NONE: Move = Move(0);

    /// 生の32bit値から作成
    #[inline]
    pub const fn from_u32(raw: u32) -> Move {
        Move(raw)
    }

    /// 生の32bit値を取得
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// 無効な指し手か
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl From<u32> for Move {
    #[inline]
    fn from(raw: u32) -> Self {
        Move(raw)
    }
}
