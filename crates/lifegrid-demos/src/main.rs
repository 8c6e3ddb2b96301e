mod args;
mod demo;
mod demos;
mod harness;
mod registry;

use anyhow::Result;
use lifegrid_engine::device::GpuInit;
use lifegrid_engine::logging::{LoggingConfig, init_logging};
use lifegrid_engine::window::{Runtime, RuntimeConfig};

use args::{HarnessConfig, USAGE};
use harness::Harness;
use registry::DemoRegistry;

fn main() -> Result<()> {
    let args = HarnessConfig::parse(std::env::args().skip(1))?;
    init_logging(LoggingConfig {
        env_filter: args.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let registry = DemoRegistry::builtin();

    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    if args.list {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let harness = Harness::new(registry, args.demo.as_deref(), args.sim)?;
    Runtime::run(RuntimeConfig::default(), GpuInit::default(), harness)
}
