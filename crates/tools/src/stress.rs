//! 合成探索木によるプールの stress 実行
//!
//! 実際の盤面・指し手生成の代わりに、局面キーから決定的に手数とスコアを
//! 決める合成生成器を使う。各ワーカーはレジストリから借りた自分専用の
//! プールで深さ優先に再帰し、ノードごとに `ScopedMoveList` を1本作る。

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, ensure, Context, Result};
use movepool_core::movegen::{ExtMove, GenType, MoveGenerator, ScopedMoveList, ThreadIdentity};
use movepool_core::pool::{MoveListPool, PoolRegistry};
use movepool_core::types::Move;
use movepool_core::PoolConfig;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 設定
// ---------------------------------------------------------------------------

/// stress 実行の設定（TOML から読み込む）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// プール設定（スレッド数もここから取る）
    pub pool: PoolConfig,
    /// 探索の最大深さ（ルートを 0 とする）
    pub search_depth: usize,
    /// 各ノードで展開する子の数の上限
    pub branching: usize,
    /// スレッドごとのノード数上限
    pub nodes_per_thread: u64,
    /// 合成木の seed
    pub seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default().with_thread_count(4),
            search_depth: 32,
            branching: 4,
            nodes_per_thread: 200_000,
            seed: 0x9E37_79B9_7F4A_7C15,
        }
    }
}

impl StressConfig {
    /// 実行前の検証
    ///
    /// 探索深さがプールの深さ容量を超えると必ず枯渇するので、ここで弾く。
    pub fn validate(&self) -> Result<()> {
        self.pool.validate().context("invalid pool configuration")?;
        ensure!(
            self.search_depth < self.pool.depth_capacity,
            "search_depth {} needs {} slots but depth_capacity is {}",
            self.search_depth,
            self.search_depth + 1,
            self.pool.depth_capacity
        );
        ensure!(self.branching > 0, "branching must be at least 1");
        Ok(())
    }
}

/// TOML ファイルから設定を読み込む
pub fn load_config(path: &Path) -> Result<StressConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config file {}", path.display()))
}

// ---------------------------------------------------------------------------
// 合成局面と生成器
// ---------------------------------------------------------------------------

/// 合成局面（キーとスレッド番号だけを持つ）
#[derive(Debug, Clone, Copy)]
pub struct SyntheticPosition {
    pub thread_id: usize,
    pub key: u64,
    pub ply: usize,
}

impl SyntheticPosition {
    pub fn root(thread_id: usize, seed: u64) -> Self {
        Self {
            thread_id,
            key: mix(seed ^ thread_id as u64),
            ply: 0,
        }
    }

    pub fn child(&self, mv: Move) -> Self {
        Self {
            thread_id: self.thread_id,
            key: mix(self.key ^ u64::from(mv.raw()).rotate_left(17)),
            ply: self.ply + 1,
        }
    }
}

impl ThreadIdentity for SyntheticPosition {
    #[inline]
    fn thread_id(&self) -> usize {
        self.thread_id
    }
}

/// 局面キーから手数・指し手・スコアを決定的に作る生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGenerator;

impl MoveGenerator<SyntheticPosition> for SyntheticGenerator {
    fn generate(&self, kind: GenType, pos: &SyntheticPosition, buffer: &mut [ExtMove]) -> usize {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(pos.key ^ kind as u64);
        let count = match kind {
            // 取る手は少なめ
            GenType::Captures | GenType::Evasions => rng.random_range(0..=buffer.len() / 8),
            _ => rng.random_range(0..=buffer.len()),
        };
        for slot in &mut buffer[..count] {
            *slot = ExtMove::new(Move::from_u32(rng.random::<u32>() | 1), rng.random_range(-2000..2000));
        }
        count
    }
}

/// SplitMix64 の最終段
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ---------------------------------------------------------------------------
// 実行と結果
// ---------------------------------------------------------------------------

/// スレッドごとの結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadReport {
    pub thread_id: usize,
    pub nodes: u64,
    pub moves_generated: u64,
    /// 同時に借りたスロット数の最大値
    pub peak_in_use: usize,
    /// 終了時に借りたままのスロット数（正常なら 0）
    pub final_in_use: usize,
}

/// 実行結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressReport {
    pub config: StressConfig,
    pub threads: Vec<ThreadReport>,
    pub total_nodes: u64,
    pub elapsed_ms: u64,
    pub nodes_per_sec: u64,
    pub footprint_bytes: usize,
}

struct Walker<'a> {
    pool: &'a MoveListPool,
    config: &'a StressConfig,
    report: ThreadReport,
}

impl Walker<'_> {
    fn search(&mut self, pos: &SyntheticPosition) {
        if self.report.nodes >= self.config.nodes_per_thread {
            return;
        }
        self.report.nodes += 1;

        // 3 ply ごとに静止探索もどき（取る手だけ）を挟む
        let kind = if pos.ply % 3 == 2 {
            GenType::Captures
        } else {
            GenType::Legal
        };
        let list = ScopedMoveList::new(self.pool, &SyntheticGenerator, kind, pos);
        self.report.moves_generated += list.len() as u64;

        if pos.ply >= self.config.search_depth {
            return;
        }
        for ext in list.iter().take(self.config.branching) {
            self.search(&pos.child(ext.mv));
        }
    }
}

fn run_worker(pool: &MoveListPool, thread_id: usize, config: &StressConfig) -> ThreadReport {
    let mut walker = Walker {
        pool,
        config,
        report: ThreadReport {
            thread_id,
            ..ThreadReport::default()
        },
    };
    let mut root_seed = config.seed;
    // ノード上限に達するまでルートを取り替えて繰り返す
    while walker.report.nodes < config.nodes_per_thread {
        let before = walker.report.nodes;
        walker.search(&SyntheticPosition::root(thread_id, root_seed));
        root_seed = mix(root_seed);
        if walker.report.nodes == before {
            break;
        }
    }
    walker.report.peak_in_use = pool.high_water();
    walker.report.final_in_use = pool.in_use();
    log::debug!(
        "thread {thread_id}: {} nodes, peak {} slots",
        walker.report.nodes,
        walker.report.peak_in_use
    );
    walker.report
}

/// 設定に従ってプールを作り、全スレッドで合成探索を走らせる
pub fn run_stress(config: &StressConfig) -> Result<StressReport> {
    config.validate()?;
    let mut registry =
        PoolRegistry::with_config(&config.pool).context("failed to initialize move list pools")?;
    let footprint_bytes = registry.footprint_bytes();

    log::info!(
        "stress: {} thread(s), depth {}, branching {}, {} nodes/thread",
        config.pool.thread_count,
        config.search_depth,
        config.branching,
        config.nodes_per_thread
    );

    let start = Instant::now();
    let threads = thread::scope(|s| {
        let handles: Vec<_> = registry
            .worker_pools()
            .map(|(thread_id, pool)| {
                let handle = s.spawn(move || run_worker(pool, thread_id, config));
                (thread_id, handle)
            })
            .collect();
        handles
            .into_iter()
            .map(|(thread_id, handle)| {
                handle.join().map_err(|_| anyhow!("worker thread {thread_id} panicked"))
            })
            .collect::<Result<Vec<_>>>()
    })?;
    let elapsed = start.elapsed();

    registry.shutdown();

    let total_nodes: u64 = threads.iter().map(|t| t.nodes).sum();
    let elapsed_ms = elapsed.as_millis() as u64;
    let nodes_per_sec = if elapsed.as_secs_f64() > 0.0 {
        (total_nodes as f64 / elapsed.as_secs_f64()) as u64
    } else {
        0
    };

    Ok(StressReport {
        config: config.clone(),
        threads,
        total_nodes,
        elapsed_ms,
        nodes_per_sec,
        footprint_bytes,
    })
}
