//! Skycast weather widget
//!
//! Search form, weather card and the lookup pipeline that drives them.

pub mod form;
pub mod page;
pub mod widget;

pub use form::{input_hint, validate_city_input, MIN_CITY_LEN, WARNING_BORDER};
pub use page::{format_display_date, LabelledText, Page, TextPage, WeatherView};
pub use widget::{WeatherWidget, LOADING_MESSAGE};
