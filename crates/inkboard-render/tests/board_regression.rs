//! End-to-end layout regression over a full board composition.

use chrono::{TimeZone, Utc};
use inkboard::{FeedEntry, WeatherReport, WeatherSnapshot};
use inkboard_render::{
    wrap_words, BoardComposer, BoardConfig, FontRole, IconId, IconTable, TextMeasurer, TextSize,
};

/// Code-point grid measurer: deterministic stand-in for a font backend.
struct GridMeasurer {
    advance: u32,
    line_height: u32,
}

impl TextMeasurer for GridMeasurer {
    fn measure(&self, text: &str, _role: FontRole) -> TextSize {
        TextSize {
            width: text.chars().count() as u32 * self.advance,
            height: self.line_height,
        }
    }
}

fn measurer() -> GridMeasurer {
    GridMeasurer {
        advance: 8,
        line_height: 18,
    }
}

fn icon_table() -> IconTable {
    let mut table = IconTable::new(IconId(0));
    for (idx, key) in ["01d", "02d", "03d", "04d", "09d", "10d", "11d", "13d", "50d"]
        .iter()
        .enumerate()
    {
        table.insert(*key, IconId(idx + 1));
    }
    table
}

fn feed_entry(idx: usize, title: &str, body: &str) -> FeedEntry {
    FeedEntry {
        published: Utc
            .with_ymd_and_hms(2026, 8, 24, 6, 0, idx as u32 % 60)
            .unwrap(),
        title: title.to_string(),
        body: body.to_string(),
    }
}

fn report(forecast_len: usize) -> WeatherReport {
    let current = WeatherSnapshot {
        icon_key: "10d".to_string(),
        conditions: "light rain and broken clouds across the region".to_string(),
        current_temp: 17.4,
        min_temp: 12.1,
        max_temp: 19.8,
        humidity_pct: 82,
        observed: Utc.with_ymd_and_hms(2026, 8, 24, 6, 0, 0).unwrap(),
    };
    let forecast = (0..forecast_len)
        .map(|step| WeatherSnapshot {
            icon_key: if step % 3 == 0 {
                "no-such-code".to_string()
            } else {
                "01d".to_string()
            },
            conditions: "clear sky".to_string(),
            current_temp: 15.0 + step as f32,
            min_temp: 10.0,
            max_temp: 16.0 + step as f32,
            humidity_pct: 60,
            observed: Utc.with_ymd_and_hms(2026, 8, 24, 9 + step as u32 % 12, 0, 0).unwrap(),
        })
        .collect();
    WeatherReport { current, forecast }
}

#[test]
fn commands_stay_inside_their_columns() {
    let m = measurer();
    let icons = icon_table();
    let composer = BoardComposer::new(BoardConfig::default(), &m, &icons);
    let entries: Vec<_> = (0..6)
        .map(|i| {
            feed_entry(
                i,
                "Headline with several words in it",
                "A body sentence that wraps over more than one line on the panel.",
            )
        })
        .collect();
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap();
    let page = composer.compose(now, &entries, &report(8));

    let news = composer.news_region();
    let weather = composer.weather_region();

    for text in page.texts() {
        match text.role {
            FontRole::EntryHeader | FontRole::EntryBody => assert_eq!(text.x, news.x),
            FontRole::PanelText | FontRole::CardText => {
                assert!(text.x >= weather.x && text.x < weather.right());
            }
            // The clock is right-aligned in the news column; the current
            // temperature sits in the panel.
            FontRole::Heading => assert!(text.x >= 0),
        }
    }
    for icon in page.icons() {
        assert!(icon.x >= weather.x);
        assert!(icon.x + icon.width as i32 <= weather.right());
    }
}

#[test]
fn news_entries_keep_source_order_and_prefix_timestamps() {
    let m = measurer();
    let icons = icon_table();
    let composer = BoardComposer::new(BoardConfig::default(), &m, &icons);
    let entries = vec![
        feed_entry(1, "Alpha", "first body"),
        feed_entry(2, "Beta", "second body"),
    ];
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap();
    let page = composer.compose(now, &entries, &report(0));

    let headers: Vec<_> = page
        .texts()
        .filter(|t| t.role == FontRole::EntryHeader)
        .collect();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].text, "06:00:01 24.08.2026 Alpha");
    assert_eq!(headers[1].text, "06:00:02 24.08.2026 Beta");
    assert!(headers[0].baseline_y < headers[1].baseline_y);
}

#[test]
fn title_at_the_char_budget_gains_the_ellipsis() {
    let m = measurer();
    let icons = icon_table();
    let cfg = BoardConfig {
        title_max_chars: 5,
        ..BoardConfig::default()
    };
    let composer = BoardComposer::new(cfg, &m, &icons);
    let entries = vec![feed_entry(0, "abcde", "x")];
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap();
    let page = composer.compose(now, &entries, &report(0));
    assert!(page
        .texts()
        .any(|t| t.role == FontRole::EntryHeader && t.text.ends_with("abcde...")));
}

#[test]
fn wrapped_lines_respect_the_column_width() {
    let m = measurer();
    let long_body = "one two three four five six seven eight nine ten eleven twelve \
                     thirteen fourteen fifteen sixteen seventeen eighteen nineteen twenty";
    let max_width = 200;
    let lines = wrap_words(&m, long_body, FontRole::EntryBody, max_width);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(m.measure(line, FontRole::EntryBody).width <= max_width);
    }
}

#[test]
fn forecast_overflow_is_discarded_and_fallback_icons_are_used() {
    let m = measurer();
    let icons = icon_table();
    let composer = BoardComposer::new(BoardConfig::default(), &m, &icons);
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap();
    let page = composer.compose(now, &[], &report(64));

    // Panel icon plus at most as many cards as the grid region can hold.
    let card_icons: Vec<_> = page
        .icons()
        .filter(|icon| icon.width == composer.config().card_icon_size)
        .collect();
    assert!(!card_icons.is_empty());
    assert!(card_icons.len() < 64);
    // Every third forecast step used an unknown condition code.
    assert!(card_icons.iter().any(|icon| icon.icon == icons.fallback()));
    // And no card row starts below the canvas.
    let cell_h = composer.config().cell_height as i32;
    assert!(card_icons
        .iter()
        .all(|icon| icon.y + cell_h <= composer.config().canvas_height as i32));
}

#[test]
fn composing_twice_is_deterministic() {
    let m = measurer();
    let icons = icon_table();
    let composer = BoardComposer::new(BoardConfig::default(), &m, &icons);
    let entries = vec![feed_entry(0, "Stable", "output")];
    let now = Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap();
    let first = composer.compose(now, &entries, &report(4));
    let second = composer.compose(now, &entries, &report(4));
    assert_eq!(first, second);
}
