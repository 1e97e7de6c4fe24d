use anyhow::Result;
use everclock::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    // 2. Load the update cadence: defaults, then everclock.toml, then
    //    EVERCLOCK_* environment variables.
    let config = load_config()?;

    // 3. Create the WorldClock instance.
    let clock = WorldClock::new(config);
    info!(
        "Starting {} v{} (update every {}ms, moon every {}ms).",
        everclock::ENGINE_NAME,
        everclock::VERSION,
        clock.config().update_interval_ms,
        clock.config().moon_update_interval_ms
    );
    info!("Right now it is {} on {}.", clock.clock(), clock.date());

    // 4. Register listeners that log each update category.
    register_listeners(&clock)?;

    // 5. Run until Ctrl-C.
    tokio::signal::ctrl_c().await?;
    info!("Shutting down.");
    clock.remove_calendar("demo-calendar")?;
    clock.remove_clock("demo-clock")?;
    clock.remove_moon("demo-moon")?;

    Ok(())
}

/// Layers the clock configuration from file and environment.
fn load_config() -> Result<ClockConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("everclock").required(false))
        .add_source(config::Environment::with_prefix("EVERCLOCK"))
        .build()?;
    Ok(settings.try_deserialize()?)
}

/// Registers one listener per update category to demonstrate dispatch.
fn register_listeners(clock: &WorldClock) -> Result<()> {
    clock.on_calendar("demo-calendar", |time, date| {
        if time.minute == 0 && time.second == 0 {
            info!("[CALENDAR] The hour turns: {} on {}", time, date);
        }
    })?;

    clock.on_clock("demo-clock", |time| {
        if time.hour == 0 && time.minute == 0 && time.second == 0 {
            info!("[CLOCK] Midnight. A new day begins.");
        }
    })?;

    clock.on_moon("demo-moon", |moon| {
        info!("[MOON] {}", moon);
    })?;

    Ok(())
}
