//! 指し手生成との境界とスコープ付き指し手リスト
//!
//! - `ExtMove` / `GenType` / `MAX_MOVES`: 生成器と共有する型
//! - `MoveGenerator` / `ThreadIdentity`: 外部の生成器・探索コンテキストが実装するトレイト
//! - `ScopedMoveList`: プールからスロットを借りて生成結果を保持し、drop で返却する

mod generator;
mod movelist;
mod types;

pub use generator::{MoveGenerator, ThreadIdentity};
pub use movelist::ScopedMoveList;
pub use types::{ExtMove, GenType, MAX_MOVES};
