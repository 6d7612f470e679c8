//! Weather lookup pipeline: form submission in, card and notifications out.

use chrono::{Datelike, Local};
use skycast_core::{AppError, ValidationError, WeatherError};
use skycast_notify::{Category, Notify};
use skycast_weather::WeatherProvider;

use crate::form::validate_city_input;
use crate::page::{Page, WeatherView};

pub const LOADING_MESSAGE: &str = "Loading weather data...";

/// Ties the provider, the notifier and the page together.
///
/// Every lookup announces itself with one info notification and ends with
/// exactly one success or error notification.
pub struct WeatherWidget<N: Notify, P: Page> {
    provider: WeatherProvider,
    notifier: N,
    page: P,
    current_city: String,
}

impl<N: Notify, P: Page> WeatherWidget<N, P> {
    pub fn new(
        provider: WeatherProvider,
        notifier: N,
        mut page: P,
        default_city: impl Into<String>,
    ) -> Self {
        page.render_footer(Local::now().year());
        Self {
            provider,
            notifier,
            page,
            current_city: default_city.into(),
        }
    }

    pub fn current_city(&self) -> &str {
        &self.current_city
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Show weather for the current city.
    pub async fn start(&mut self) -> Result<WeatherView, AppError> {
        let city = self.current_city.clone();
        self.display_weather(&city).await
    }

    /// Handle a search form submission.
    ///
    /// Invalid input raises one warning and never reaches the network.
    pub async fn submit(&mut self, raw: &str) -> Result<WeatherView, AppError> {
        let city = validate_city_input(raw).map_err(|e| self.reject(e))?;
        self.current_city = city.clone();
        self.page.clear_input();
        self.display_weather(&city).await
    }

    /// Look up `city`, render it, and report the outcome.
    pub async fn display_weather(&mut self, city: &str) -> Result<WeatherView, AppError> {
        self.notifier.notify(LOADING_MESSAGE, Category::Info);

        match self.lookup(city).await {
            Ok(view) => {
                self.page.render(&view);
                self.notifier.notify(
                    &format!("Weather updated for {}", view.location),
                    Category::Success,
                );
                Ok(view)
            }
            Err(e) => {
                tracing::error!("Weather lookup for {:?} failed: {}", city, e);
                self.notifier.notify(&e.user_message(), Category::Error);
                Err(e.into())
            }
        }
    }

    async fn lookup(&self, city: &str) -> Result<WeatherView, WeatherError> {
        let location = self.provider.resolve_city(city).await?;
        let reading = self
            .provider
            .fetch_weather(location.lat, location.lon)
            .await?;
        tracing::debug!(?reading, "Fetched weather for {}", location.display_name());
        Ok(WeatherView::build(
            &location,
            &reading,
            Local::now().date_naive(),
        ))
    }

    fn reject(&self, error: ValidationError) -> AppError {
        tracing::debug!("Rejected search input: {}", error);
        self.notifier.notify(error.user_message(), Category::Warning);
        error.into()
    }
}
