//! Board composition: news-column vertical flow, weather panel, and the
//! forecast grid packer.
//!
//! One composition is a single pure pass over already-fetched data. Cursors
//! are local to the pass, so independent boards can be composed in parallel.

use chrono::{DateTime, Utc};
use inkboard::{FeedEntry, ForecastEntry, WeatherReport, WeatherSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board_ir::{
    BoardPage, DrawCommand, FontRole, IconCommand, IconTable, Region, RuleCommand, TextCommand,
};
use crate::board_text::{format_range, format_temperature, truncate_chars, wrap_words, TextMeasurer};

/// Clock string in the board's top-right corner.
const HEADER_CLOCK_FORMAT: &str = "%d.%m.%Y %H:%M";
/// Timestamp prefixed to each news entry title.
const ENTRY_TIMESTAMP_FORMAT: &str = "%H:%M:%S %d.%m.%Y";
const CARD_DATE_FORMAT: &str = "%d.%m";
const CARD_TIME_FORMAT: &str = "%H:%M";
const RULE_THICKNESS: u32 = 1;

/// Policy for entries near the bottom bound of the news column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Draw-then-check: the terminal entry is emitted in full even when its
    /// last lines fall outside the region. This reproduces the historical
    /// board output bit-exactly and is the default.
    #[default]
    SoftOverflow,
    /// Pre-clip: an entry that would not fit entirely is dropped and the
    /// flow stops there.
    Clip,
}

/// Board layout configuration.
///
/// All pixel values describe a fixed canvas known in advance; nothing here
/// is responsive. A partial JSON profile deserializes over the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Canvas width.
    pub canvas_width: u32,
    /// Canvas height.
    pub canvas_height: u32,
    /// Width of the weather column; the news column takes the rest.
    pub weather_column_width: u32,
    /// Padding between the column divider and news text.
    pub padding: u32,
    /// Gap under the clock header.
    pub date_gap: u32,
    /// Gap after each news entry's separator rule.
    pub entry_gap: u32,
    /// Cursor step back before the separator rule is drawn.
    pub separator_pullback: u32,
    /// Title truncation bound in code points.
    pub title_max_chars: usize,
    /// Body truncation bound in code points.
    pub body_max_chars: usize,
    /// Forecast card cell width.
    pub cell_width: u32,
    /// Forecast card cell height.
    pub cell_height: u32,
    /// Current-conditions icon edge length.
    pub panel_icon_size: u32,
    /// Forecast card icon edge length.
    pub card_icon_size: u32,
    /// Bottom-bound policy for the news flow.
    pub overflow: OverflowPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 480,
            weather_column_width: 400,
            padding: 5,
            date_gap: 10,
            entry_gap: 15,
            separator_pullback: 5,
            title_max_chars: 120,
            body_max_chars: 320,
            cell_width: 100,
            cell_height: 96,
            panel_icon_size: 64,
            card_icon_size: 32,
            overflow: OverflowPolicy::SoftOverflow,
        }
    }
}

impl BoardConfig {
    /// Convenience for a canvas size with the column split at midwidth.
    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            weather_column_width: width / 2,
            ..Self::default()
        }
    }

    /// Load a layout profile from JSON bytes over the defaults.
    pub fn from_profile_json(bytes: &[u8]) -> Result<Self, ProfileError> {
        let mut cfg: Self = serde_json::from_slice(bytes)
            .map_err(|err| ProfileError::new(format!("layout profile: {}", err)))?;
        if cfg.canvas_width == 0 || cfg.canvas_height == 0 {
            return Err(ProfileError::new("layout profile: zero canvas dimension"));
        }
        // Keep the columns disjoint even for hand-edited profiles.
        cfg.weather_column_width = cfg.weather_column_width.min(cfg.canvas_width);
        Ok(cfg)
    }
}

/// Layout profile error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileError {
    message: String,
}

impl ProfileError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProfileError {}

/// Deterministic board composer.
///
/// Holds only borrowed capabilities; every [`compose`](Self::compose) call
/// is stateless with respect to previous calls.
pub struct BoardComposer<'a> {
    cfg: BoardConfig,
    measurer: &'a dyn TextMeasurer,
    icons: &'a IconTable,
}

impl fmt::Debug for BoardComposer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardComposer")
            .field("cfg", &self.cfg)
            .field("icon_count", &self.icons.len())
            .finish()
    }
}

impl<'a> BoardComposer<'a> {
    /// Create a composer over a measurer capability and an icon table.
    pub fn new(cfg: BoardConfig, measurer: &'a dyn TextMeasurer, icons: &'a IconTable) -> Self {
        Self {
            cfg,
            measurer,
            icons,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.cfg
    }

    /// Full-height weather column region.
    pub fn weather_region(&self) -> Region {
        Region::new(
            0,
            0,
            self.cfg.weather_column_width,
            self.cfg.canvas_height,
        )
    }

    /// Full-height news column region, right of the divider padding.
    pub fn news_region(&self) -> Region {
        let x = (self.cfg.weather_column_width + self.cfg.padding).min(self.cfg.canvas_width);
        Region::new(
            x as i32,
            0,
            self.cfg.canvas_width - x,
            self.cfg.canvas_height,
        )
    }

    /// Compose one board page.
    ///
    /// Emission order: canvas frame, column divider, clock header, news
    /// flow, weather panel, forecast grid. Empty inputs yield zero commands
    /// for their section; composition itself never fails.
    pub fn compose(
        &self,
        now: DateTime<Utc>,
        entries: &[FeedEntry],
        weather: &WeatherReport,
    ) -> BoardPage {
        let cfg = &self.cfg;
        let mut page = BoardPage::new();

        self.emit_frame(&mut page);
        page.push(DrawCommand::Rule(RuleCommand {
            x: cfg.weather_column_width as i32,
            y: 0,
            length: cfg.canvas_height,
            thickness: RULE_THICKNESS,
            horizontal: false,
        }));

        let header_bottom = self.emit_clock(&mut page, now);

        let news = self.news_region();
        let flow_top = header_bottom + (cfg.date_gap + cfg.entry_gap) as i32;
        let flow = Region::new(
            news.x,
            flow_top,
            news.width,
            (news.bottom() - flow_top).max(0) as u32,
        );
        self.flow_entries(&mut page, flow, entries);

        let column = self.weather_region();
        let panel_bottom = self.weather_panel(&mut page, column, &weather.current);
        let grid = Region::new(
            column.x,
            panel_bottom,
            column.width,
            (column.bottom() - panel_bottom).max(0) as u32,
        );
        self.pack_forecast(&mut page, grid, &weather.forecast);

        log::debug!(
            "composed board: {} commands, {} entries offered, {} forecast steps offered",
            page.commands.len(),
            entries.len(),
            weather.forecast.len()
        );
        page
    }

    /// Hairline frame along all four canvas edges.
    fn emit_frame(&self, page: &mut BoardPage) {
        let cfg = &self.cfg;
        let right = cfg.canvas_width as i32 - 1;
        let bottom = cfg.canvas_height as i32 - 1;
        for (x, y, length, horizontal) in [
            (0, 0, cfg.canvas_width, true),
            (0, bottom, cfg.canvas_width, true),
            (0, 0, cfg.canvas_height, false),
            (right, 0, cfg.canvas_height, false),
        ] {
            page.push(DrawCommand::Rule(RuleCommand {
                x,
                y,
                length,
                thickness: RULE_THICKNESS,
                horizontal,
            }));
        }
    }

    /// Right-aligned clock header. Returns the header baseline y.
    fn emit_clock(&self, page: &mut BoardPage, now: DateTime<Utc>) -> i32 {
        let clock = now.format(HEADER_CLOCK_FORMAT).to_string();
        let size = self.measurer.measure(&clock, FontRole::Heading);
        let baseline_y = size.height as i32;
        page.push(DrawCommand::Text(TextCommand {
            x: self.cfg.canvas_width as i32 - size.width as i32 - self.cfg.date_gap as i32,
            baseline_y,
            text: clock,
            role: FontRole::Heading,
        }));
        baseline_y
    }

    /// Vertical flow of news entries inside `region`.
    ///
    /// Per entry: truncated, timestamp-prefixed title wrapped with the
    /// header role; truncated body wrapped with the body role; a separator
    /// rule; then the gap. Baselines sit at the cursor before each advance,
    /// so `region.y` must already account for the first line's ascent.
    ///
    /// Under [`OverflowPolicy::SoftOverflow`] the bottom bound is checked
    /// only after an entry is fully emitted, so exactly the terminal entry
    /// may spill past `region.bottom()`.
    pub fn flow_entries(&self, page: &mut BoardPage, region: Region, entries: &[FeedEntry]) {
        let cfg = &self.cfg;
        let mut cursor_y = region.y;
        let mut placed = 0usize;

        for entry in entries {
            let title = truncate_chars(&entry.title, cfg.title_max_chars);
            let header = format!(
                "{} {}",
                entry.published.format(ENTRY_TIMESTAMP_FORMAT),
                title
            );
            let header_lines =
                wrap_words(self.measurer, &header, FontRole::EntryHeader, region.width);
            let body = truncate_chars(&entry.body, cfg.body_max_chars);
            let body_lines = wrap_words(self.measurer, &body, FontRole::EntryBody, region.width);

            if cfg.overflow == OverflowPolicy::Clip {
                let text_height: i32 = header_lines
                    .iter()
                    .map(|line| self.measurer.measure(line, FontRole::EntryHeader).height as i32)
                    .chain(
                        body_lines
                            .iter()
                            .map(|line| {
                                self.measurer.measure(line, FontRole::EntryBody).height as i32
                            }),
                    )
                    .sum();
                if cursor_y + text_height - cfg.separator_pullback as i32 > region.bottom() {
                    break;
                }
            }

            for line in header_lines {
                let height = self.measurer.measure(&line, FontRole::EntryHeader).height;
                page.push(DrawCommand::Text(TextCommand {
                    x: region.x,
                    baseline_y: cursor_y,
                    text: line,
                    role: FontRole::EntryHeader,
                }));
                cursor_y += height as i32;
            }
            for line in body_lines {
                let height = self.measurer.measure(&line, FontRole::EntryBody).height;
                page.push(DrawCommand::Text(TextCommand {
                    x: region.x,
                    baseline_y: cursor_y,
                    text: line,
                    role: FontRole::EntryBody,
                }));
                cursor_y += height as i32;
            }

            cursor_y -= cfg.separator_pullback as i32;
            page.push(DrawCommand::Rule(RuleCommand {
                x: region.x,
                y: cursor_y,
                length: region.width,
                thickness: RULE_THICKNESS,
                horizontal: true,
            }));
            cursor_y += cfg.entry_gap as i32;
            placed += 1;

            if cursor_y >= region.bottom() {
                break;
            }
        }

        if placed < entries.len() {
            log::debug!(
                "news column full after {} of {} entries",
                placed,
                entries.len()
            );
        }
    }

    /// Current-conditions panel at the top of the weather column.
    ///
    /// Returns the y where the forecast grid starts.
    fn weather_panel(&self, page: &mut BoardPage, region: Region, current: &WeatherSnapshot) -> i32 {
        let cfg = &self.cfg;
        let pad = cfg.padding as i32;

        page.push(DrawCommand::Icon(IconCommand {
            icon: self.icons.resolve(&current.icon_key),
            x: region.x + pad,
            y: region.y + pad,
            width: cfg.panel_icon_size,
            height: cfg.panel_icon_size,
        }));

        let text_x = region.x + pad + cfg.panel_icon_size as i32 + pad;
        let text_width = (region.right() - text_x - pad).max(0) as u32;
        let mut cursor_y = region.y + pad;

        let temp = format_temperature(current.current_temp);
        let temp_size = self.measurer.measure(&temp, FontRole::Heading);
        cursor_y += temp_size.height as i32;
        page.push(DrawCommand::Text(TextCommand {
            x: text_x,
            baseline_y: cursor_y,
            text: temp,
            role: FontRole::Heading,
        }));

        for line in wrap_words(
            self.measurer,
            &current.conditions,
            FontRole::PanelText,
            text_width,
        ) {
            let height = self.measurer.measure(&line, FontRole::PanelText).height;
            cursor_y += height as i32;
            page.push(DrawCommand::Text(TextCommand {
                x: text_x,
                baseline_y: cursor_y,
                text: line,
                role: FontRole::PanelText,
            }));
        }

        let humidity = format!("humidity {}%", current.humidity_pct);
        let range = format_range(current.min_temp, current.max_temp);
        for text in [humidity, range] {
            let height = self.measurer.measure(&text, FontRole::PanelText).height;
            cursor_y += height as i32;
            page.push(DrawCommand::Text(TextCommand {
                x: text_x,
                baseline_y: cursor_y,
                text,
                role: FontRole::PanelText,
            }));
        }

        let icon_bottom = region.y + pad + cfg.panel_icon_size as i32;
        let rule_y = cursor_y.max(icon_bottom) + pad;
        page.push(DrawCommand::Rule(RuleCommand {
            x: region.x,
            y: rule_y,
            length: region.width,
            thickness: RULE_THICKNESS,
            horizontal: true,
        }));
        rule_y + cfg.entry_gap as i32
    }

    /// Row-wise grid packer for forecast cards inside `region`.
    ///
    /// Fixed-size cells from the region's top-left, left to right. The wrap
    /// check is authoritative: placement stops before any card would start
    /// in a row whose bottom edge exceeds the region, and the remainder of
    /// the forecast sequence is discarded.
    pub fn pack_forecast(&self, page: &mut BoardPage, region: Region, forecast: &[ForecastEntry]) {
        let cfg = &self.cfg;
        let cell_w = cfg.cell_width as i32;
        let cell_h = cfg.cell_height as i32;
        let mut x = region.x;
        let mut y = region.y;
        let mut placed = 0usize;

        for entry in forecast {
            self.forecast_card(page, entry, x, y);
            placed += 1;

            x += cell_w;
            if x + cell_w > region.right() {
                x = region.x;
                y += cell_h;
            }
            if y + cell_h > region.bottom() {
                break;
            }
        }

        if placed < forecast.len() {
            log::debug!(
                "forecast grid full after {} of {} steps",
                placed,
                forecast.len()
            );
        }
    }

    /// One forecast card: icon plus date, time, and range lines, each
    /// centered horizontally within the cell.
    fn forecast_card(&self, page: &mut BoardPage, entry: &ForecastEntry, cell_x: i32, cell_y: i32) {
        let cfg = &self.cfg;
        page.push(DrawCommand::Icon(IconCommand {
            icon: self.icons.resolve(&entry.icon_key),
            x: cell_x + (cfg.cell_width.saturating_sub(cfg.card_icon_size) / 2) as i32,
            y: cell_y,
            width: cfg.card_icon_size,
            height: cfg.card_icon_size,
        }));

        let mut baseline_y = cell_y + cfg.card_icon_size as i32;
        let lines = [
            entry.observed.format(CARD_DATE_FORMAT).to_string(),
            entry.observed.format(CARD_TIME_FORMAT).to_string(),
            format_range(entry.min_temp, entry.max_temp),
        ];
        for text in lines {
            let size = self.measurer.measure(&text, FontRole::CardText);
            baseline_y += size.height as i32;
            page.push(DrawCommand::Text(TextCommand {
                x: cell_x + (cfg.cell_width.saturating_sub(size.width) / 2) as i32,
                baseline_y,
                text,
                role: FontRole::CardText,
            }));
        }
    }
}
