//! # movepool-core
//!
//! 探索スレッドごとに持つ指し手リスト用 LIFO プール。
//!
//! 再帰探索は各ノードで指し手リストを生成し、ノードを抜けるときに捨てる。
//! これを毎回ヒープ確保すると遅く、最大手数の配列をスタックに積むと
//! メモリを食う。本クレートはスレッドごとに固定サイズのバッファを
//! `depth_capacity` 個だけ確保しておき、呼び出し/復帰の順序どおりに
//! O(1) で貸し出し・回収する。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Move, MAX_PLY）
//! - `config`: プール設定（スレッド数・深さ容量・1局面の最大手数）
//! - `error`: エラー型
//! - `pool`: スロットプール本体とスレッド別レジストリ
//! - `movegen`: 指し手生成器との境界（ExtMove, GenType, 生成器トレイト）と
//!   スコープ付き指し手リスト
//!
//! ## 使い方
//!
//! ```
//! use movepool_core::movegen::{ExtMove, GenType, ScopedMoveList};
//! use movepool_core::pool::PoolRegistry;
//! use movepool_core::types::Move;
//! use movepool_core::PoolConfig;
//!
//! let config = PoolConfig::new(1, 4, 8);
//! let registry = PoolRegistry::with_config(&config).unwrap();
//!
//! let generate = |_kind: GenType, _pos: &(), buf: &mut [ExtMove]| {
//!     buf[0] = ExtMove::new(Move::from_u32(7), 10);
//!     1
//! };
//!
//! let pool = registry.pool_for(0);
//! {
//!     let list = ScopedMoveList::new(pool, &generate, GenType::Legal, &());
//!     assert_eq!(list.len(), 1);
//!     assert!(list.contains(Move::from_u32(7)));
//!     assert_eq!(pool.in_use(), 1);
//! }
//! assert_eq!(pool.in_use(), 0);
//! ```

pub mod config;
pub mod error;
pub mod movegen;
pub mod pool;
pub mod types;

pub use config::PoolConfig;
pub use error::{PoolError, Result};
