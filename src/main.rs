use zoneclock::ClockConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ClockConfig::builder().build();
    zoneclock::run(config)?;
    Ok(())
}
