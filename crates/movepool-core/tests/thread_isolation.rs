//! スレッドごとのプールが互いに干渉しないことの確認
//!
//! レジストリから各ワーカーへ `&mut MoveListPool` を1つずつ貸し、
//! `std::thread::scope` の中で独立に acquire / release を繰り返す。

use std::thread;

use movepool_core::movegen::{ExtMove, GenType, ScopedMoveList};
use movepool_core::pool::{MoveListPool, PoolRegistry};
use movepool_core::types::Move;
use movepool_core::PoolConfig;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const THREADS: usize = 8;

/// スレッド番号をスコアに書き込む生成器
fn tag_thread(_kind: GenType, thread_id: &usize, buffer: &mut [ExtMove]) -> usize {
    let n = (thread_id % buffer.len()) + 1;
    for slot in &mut buffer[..n] {
        *slot = ExtMove::new(Move::from_u32(*thread_id as u32 + 1), *thread_id as i32);
    }
    n
}

fn storm(pool: &MoveListPool, thread_id: usize, iterations: usize, leave_open: usize) -> usize {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(thread_id as u64 * 7919 + 1);
    let mut live = Vec::new();
    let mut acquired = 0;
    let mut released = 0;

    for _ in 0..iterations {
        if live.is_empty() || (live.len() < pool.depth_capacity() && rng.random_bool(0.5)) {
            let mut handle = pool.acquire();
            pool.slot_mut(&mut handle)[0] = ExtMove::new(Move::from_u32(1), thread_id as i32);
            live.push(handle);
            acquired += 1;
        } else if let Some(handle) = live.pop() {
            assert_eq!(pool.slot(&handle)[0].value, thread_id as i32);
            pool.release(handle);
            released += 1;
        }
        assert_eq!(pool.in_use(), acquired - released);
    }

    while live.len() < leave_open {
        live.push(pool.acquire());
        acquired += 1;
    }
    while live.len() > leave_open {
        if let Some(handle) = live.pop() {
            pool.release(handle);
            released += 1;
        }
    }
    assert_eq!(pool.in_use(), acquired - released);
    // 残したハンドルは返却しない（top がこのスレッドの呼び出しだけで決まることを見る）
    std::mem::forget(live);
    acquired - released
}

#[test]
fn concurrent_storms_only_affect_own_pool() {
    let mut registry = PoolRegistry::with_config(&PoolConfig::new(THREADS, 24, 4)).unwrap();

    let nets: Vec<usize> = thread::scope(|s| {
        let workers: Vec<_> = registry
            .worker_pools()
            .map(|(thread_id, pool)| {
                s.spawn(move || storm(pool, thread_id, 20_000, thread_id % 5))
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    for (thread_id, net) in nets.iter().enumerate() {
        assert_eq!(*net, thread_id % 5);
        assert_eq!(registry.pool_for(thread_id).in_use(), *net);
    }
    assert_eq!(registry.total_in_use(), nets.iter().sum::<usize>());

    // 貸し出し中のスロットが残っていても reconfigure で作り直せる
    registry.reconfigure(&PoolConfig::new(2, 4, 4)).unwrap();
    assert_eq!(registry.total_in_use(), 0);
}

#[test]
fn concurrent_recursive_lists_see_only_their_own_moves() {
    fn search(pool: &MoveListPool, thread_id: usize, depth: usize) -> u64 {
        let list = ScopedMoveList::new(pool, &tag_thread, GenType::Legal, &thread_id);
        assert!(list.moves().all(|mv| mv == Move::from_u32(thread_id as u32 + 1)));
        let mut nodes = 1;
        if depth > 0 {
            for _ in 0..2 {
                nodes += search(pool, thread_id, depth - 1);
            }
        }
        assert!(list.iter().all(|e| e.value == thread_id as i32));
        nodes
    }

    let mut registry = PoolRegistry::with_config(&PoolConfig::new(THREADS, 12, 16)).unwrap();

    thread::scope(|s| {
        for (thread_id, pool) in registry.worker_pools() {
            s.spawn(move || {
                let nodes = search(pool, thread_id, 10);
                assert_eq!(nodes, (1 << 11) - 1);
                assert_eq!(pool.in_use(), 0);
                assert_eq!(pool.high_water(), 11);
            });
        }
    });

    assert_eq!(registry.total_in_use(), 0);
    registry.shutdown();
}
