use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = rain_machine::config::Config::parse();
    if cfg.print_layout {
        println!("{}", rain_machine::layout::ControlLayout::default().to_text());
        return Ok(());
    }

    rain_machine::app::run(cfg)
}
