//! 指し手リストプール
//!
//! - `MoveListPool`: 1スレッド分のスロットプール（acquire / release / resize）
//! - `SlotHandle`: 貸し出し中スロットのトークン
//! - `PoolRegistry`: スレッド番号 → プールの対応表とライフサイクル管理
//!
//! メモリ使用量は `depth_capacity × max_moves_per_position × sizeof(ExtMove)` で
//! 頭打ちになり、探索したノード数には依存しない。

mod alloc;
mod registry;
mod slot_pool;

pub use registry::PoolRegistry;
pub use slot_pool::{MoveListPool, SlotHandle};
