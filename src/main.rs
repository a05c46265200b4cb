use slice_recycling::config::Config;
use slice_recycling::pool::{BufferPool, Pool};
use slice_recycling::workload::{run_bench, Workload};

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration
    let config = Config::parse_args();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(config.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Invalid settings are fatal at startup
    let pool_config = config.pool_config()?;
    let options = config.bench_options()?;

    info!("slice-recycling v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Benchmarking with pool type '{}', start capacity {}",
        config.pool_type,
        pool_config.start_capacity()
    );

    let workload = Workload::generate(config.seed);
    let pool = Pool::new(config.pool_type, &pool_config);

    let report = run_bench(&pool, &workload, &options)?;

    info!(
        "{} cycles, {} records, {} bytes in {:.3}s ({:.0} cycles/s)",
        report.cycles,
        report.records,
        report.bytes,
        report.elapsed.as_secs_f64(),
        report.ops_per_sec()
    );
    info!("Cycle latency: {}", report.latency);

    let stats = pool.stats();
    info!(
        "Pool '{}': hits={} misses={} grows={} returns={} drops={} held={} hit_rate={:.3}",
        pool.kind(),
        stats.hits,
        stats.misses,
        stats.grows,
        stats.returns,
        stats.drops,
        stats.held,
        stats.hit_rate()
    );

    Ok(())
}
