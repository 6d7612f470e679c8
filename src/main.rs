use anyhow::{Context, Result};
use skycast_core::Config;
use skycast_notify::{spawn_notifier, NotificationTiming, TerminalSurface};
use skycast_weather::WeatherProvider;
use skycast_widget::{TextPage, WeatherWidget};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _validation) = Config::load_validated()
        .inspect_err(|e| tracing::error!("{}", e.user_message()))?;
    if !config.weather.is_configured() {
        tracing::warn!(
            "No OpenWeatherMap API key set; add one to {} or export SKYCAST_API_KEY",
            Config::config_path()?.display()
        );
    }

    let provider =
        WeatherProvider::new(&config.weather).context("Failed to build weather client")?;
    let (notifier, notifier_task) = spawn_notifier(
        TerminalSurface::stdout(),
        NotificationTiming::from(&config.notifications),
        config.notifications.policy,
    );

    tracing::info!("Skycast started");

    let mut widget = WeatherWidget::new(
        provider,
        notifier,
        TextPage::stdout(),
        config.weather.default_city.clone(),
    );

    // Failures have already been reported through the notifier.
    let initial = match std::env::args().nth(1) {
        Some(city) => widget.submit(&city).await,
        None => widget.start().await,
    };
    if let Err(e) = initial {
        tracing::debug!("Initial lookup failed: {}", e);
    }

    println!("Enter a city name to search (Ctrl-D to quit):");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Err(e) = widget.submit(&line).await {
            tracing::debug!("Search for {:?} failed: {}", line, e);
        }
    }

    // Dropping the widget drops the last notifier handle.
    drop(widget);
    notifier_task.await.context("Notifier task failed")?;

    tracing::info!("Skycast stopped");
    Ok(())
}
