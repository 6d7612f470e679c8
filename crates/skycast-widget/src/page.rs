//! The weather card: what gets written where.

use std::io::Write;

use chrono::NaiveDate;
use skycast_weather::{City, WeatherReading};

/// A value plus the text read out by assistive technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledText {
    pub text: String,
    pub aria_label: String,
}

/// Display strings for every field of the weather card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub location: String,
    pub date: String,
    pub icon_src: String,
    pub icon_alt: String,
    pub temperature: LabelledText,
    pub description: String,
    pub wind: LabelledText,
    pub humidity: LabelledText,
    pub clouds: LabelledText,
}

impl WeatherView {
    pub fn build(city: &City, reading: &WeatherReading, today: NaiveDate) -> Self {
        let temperature = format!("{:.2}", reading.temperature_c);
        let wind = format!("{:.1}", reading.wind_kph);

        Self {
            location: city.display_name(),
            date: format_display_date(today),
            icon_src: reading.icon_url.clone(),
            icon_alt: format!("Weather condition: {}", reading.description),
            temperature: LabelledText {
                text: format!("{}°C", temperature),
                aria_label: format!("Current temperature is {} degrees Celsius", temperature),
            },
            description: reading.description.clone(),
            wind: LabelledText {
                text: format!("{} km/h", wind),
                aria_label: format!("Wind speed is {} kilometers per hour", wind),
            },
            humidity: LabelledText {
                text: format!("{}%", reading.humidity_pct),
                aria_label: format!("Humidity is {} percent", reading.humidity_pct),
            },
            clouds: LabelledText {
                text: format!("{}%", reading.cloud_pct),
                aria_label: format!("Cloud coverage is {} percent", reading.cloud_pct),
            },
        }
    }
}

/// British long date with a comma after the weekday: "Friday, 13 Jun 2025".
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%A, %-d %b %Y").to_string()
}

/// Where the weather card is drawn.
pub trait Page {
    fn render(&mut self, view: &WeatherView);

    /// Copyright year in the footer. Written once at startup.
    fn render_footer(&mut self, year: i32);

    /// Empty the search input after an accepted submission.
    fn clear_input(&mut self) {}
}

/// Plain-text weather card.
pub struct TextPage<W: Write> {
    out: W,
}

impl<W: Write> TextPage<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &WeatherView) -> std::io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "  {}", view.location)?;
        writeln!(self.out, "  {}", view.date)?;
        writeln!(self.out, "  {}  {}", view.temperature.text, view.description)?;
        writeln!(
            self.out,
            "  Wind {}  Humidity {}  Clouds {}",
            view.wind.text, view.humidity.text, view.clouds.text
        )?;
        writeln!(self.out, "  {}", view.icon_src)?;
        self.out.flush()
    }
}

impl TextPage<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Page for TextPage<W> {
    fn render(&mut self, view: &WeatherView) {
        if let Err(e) = self.write_view(view) {
            tracing::warn!("Failed to write weather card: {}", e);
        }
    }

    fn render_footer(&mut self, year: i32) {
        if let Err(e) = writeln!(self.out, "© {} Skycast", year) {
            tracing::warn!("Failed to write footer: {}", e);
        }
    }
}
