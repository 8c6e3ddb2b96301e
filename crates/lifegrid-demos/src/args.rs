use std::time::Duration;

use anyhow::{Context, Result, bail};
use lifegrid_engine::paint::Color;
use lifegrid_sim::SimConfig;
use lifegrid_sim::seed::validate_probability;

pub const USAGE: &str = "\
usage: lifegrid-demos [options]

  --example NAME     demo to start with (see --list)
  --cell-size PX     cell edge in logical pixels (default 10)
  --probability P    initial live probability in [0, 1] (default 0.35)
  --interval-ms MS   minimum time between generations (default 100)
  --seed N           fixed seed for the initial fill
  --live-color HEX   live cell color, #rrggbb (default #000000)
  --dead-color HEX   dead cell color, #rrggbb (default #ffffff)
  --log FILTER       env_logger filter, e.g. lifegrid_sim=debug (default: RUST_LOG, then info)
  --list             print the available demos and exit
  -h, --help         print this help and exit";

/// Command-line settings for the demo harness.
#[derive(Debug, Clone, Default)]
pub struct HarnessConfig {
    pub demo: Option<String>,
    pub sim: SimConfig,
    pub log_filter: Option<String>,
    pub list: bool,
    pub help: bool,
}

impl HarnessConfig {
    /// Parses arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cfg = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
                _ => (arg.clone(), None),
            };
            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .with_context(|| format!("{flag} expects a value"))
            };

            match flag.as_str() {
                "--example" => cfg.demo = Some(value()?),
                "--cell-size" => {
                    let px: f32 = value()?.parse().context("--cell-size")?;
                    if !(px.is_finite() && px >= 1.0) {
                        bail!("--cell-size must be at least 1, got {px}");
                    }
                    cfg.sim.cell_size = px;
                }
                "--probability" => {
                    let p: f64 = value()?.parse().context("--probability")?;
                    cfg.sim.live_probability = validate_probability(p)?;
                }
                "--interval-ms" => {
                    let ms: u64 = value()?.parse().context("--interval-ms")?;
                    cfg.sim.tick_interval = Duration::from_millis(ms);
                }
                "--seed" => cfg.sim.seed = Some(value()?.parse::<u64>().context("--seed")?),
                "--live-color" => cfg.sim.live_color = parse_color(&flag, &value()?)?,
                "--dead-color" => cfg.sim.dead_color = parse_color(&flag, &value()?)?,
                "--log" => cfg.log_filter = Some(value()?),
                "--list" => cfg.list = true,
                "-h" | "--help" => cfg.help = true,
                other => bail!("unknown argument '{other}'\n\n{USAGE}"),
            }
        }

        Ok(cfg)
    }
}

fn parse_color(flag: &str, value: &str) -> Result<Color> {
    let expected = "#rrggbb or #rrggbbaa";
    Color::from_hex(value).with_context(|| format!("{flag} expects {expected}, got '{value}'"))
}
