use clap::Parser;
use gesture_demo::{demo_surface, replay, scenarios, Driver};

#[derive(Parser, Debug)]
#[command(
    name = "gesture-demo",
    about = "Replays scripted pointer traces through a fully attached gesture surface"
)]
struct Args {
    /// Play on the wall clock instead of virtual time
    #[arg(long)]
    realtime: bool,

    /// Print the scenario names and exit
    #[arg(long)]
    list: bool,

    /// Play only the named scenario
    scenario: Option<String>,
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    if args.list {
        for scenario in scenarios() {
            println!("{}", scenario.name);
        }
        return Ok(());
    }

    let only = args.scenario;
    let driver = if args.realtime {
        Driver::realtime()
    } else {
        Driver::virtual_time()
    };
    let surface = demo_surface(driver.handle())?;

    let mut played = 0;
    for scenario in scenarios() {
        if only.as_deref().is_some_and(|name| name != scenario.name) {
            continue;
        }
        let events = replay(&driver, &surface, &scenario)?;
        println!(
            "{:<22} {} event(s), {} discrete",
            scenario.name,
            events.len(),
            events.iter().filter(|event| !event.is_continuous()).count()
        );
        played += 1;
    }
    if played == 0 {
        anyhow::bail!("no scenario named {:?}; try --list", only.unwrap_or_default());
    }

    surface.dispose();
    Ok(())
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
