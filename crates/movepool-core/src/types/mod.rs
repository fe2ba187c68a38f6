//! 基本型モジュール
//!
//! - `Move`: 指し手（32bit の不透明な識別子）
//! - `MAX_PLY` / `AUX_LISTS_PER_THREAD`: 既定の深さ容量を決める定数

mod depth;
mod moves;

pub use depth::*;
pub use moves::Move;
