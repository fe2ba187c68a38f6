/// 指し手リストプールの stress 実行。
///
/// スレッドごとに合成探索木を深さ優先でたどり、ノードごとにプールから
/// 指し手リストを借りて返す。終了時に各プールの使用中スロット数が 0 に
/// 戻っていることを JSON レポートで確認できる。
///
/// # 使用例
///
/// ```shell
/// cargo run -p tools --release --bin pool_stress -- \
///   --threads 8 --depth 64 --branching 3 --nodes 1000000 --pretty
///
/// cargo run -p tools --release --bin pool_stress -- \
///   --config crates/tools/configs/pool_stress.toml
/// ```
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser as _;

use tools::{load_config, run_stress, StressConfig};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(clap::Parser, Debug)]
#[command(about = "stress test for per-thread move list pools")]
struct Cli {
    /// TOML config file (command line options override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of worker threads (= number of pools)
    #[arg(long)]
    threads: Option<usize>,

    /// Move lists each thread can hold at once
    #[arg(long)]
    depth_capacity: Option<usize>,

    /// Moves per list slot
    #[arg(long)]
    max_moves: Option<usize>,

    /// Maximum search depth of the synthetic tree
    #[arg(long)]
    depth: Option<usize>,

    /// Children expanded per node
    #[arg(long)]
    branching: Option<usize>,

    /// Node budget per thread
    #[arg(long)]
    nodes: Option<u64>,

    /// Seed of the synthetic tree
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn build_config(&self) -> Result<StressConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => StressConfig::default(),
        };
        if let Some(v) = self.threads {
            config.pool.thread_count = v;
        }
        if let Some(v) = self.depth_capacity {
            config.pool.depth_capacity = v;
        }
        if let Some(v) = self.max_moves {
            config.pool.max_moves_per_position = v;
        }
        if let Some(v) = self.depth {
            config.search_depth = v;
        }
        if let Some(v) = self.branching {
            config.branching = v;
        }
        if let Some(v) = self.nodes {
            config.nodes_per_thread = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        Ok(config)
    }
}

fn init_logger(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        })
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr);
    builder.init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.build_config()?;
    let report = run_stress(&config)?;

    log::info!(
        "done: {} nodes in {} ms ({} nps), {} KiB of pools",
        report.total_nodes,
        report.elapsed_ms,
        report.nodes_per_sec,
        report.footprint_bytes / 1024
    );

    // stdout にはレポートだけを出す
    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.debug);

    if let Err(e) = run(&cli) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}
