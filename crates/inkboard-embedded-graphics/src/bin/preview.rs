//! Compose a board from local fixture files and write a PGM snapshot.
//!
//! Fetching stays outside the repo: feed XML and weather JSON are read from
//! disk exactly as a fetch collaborator would hand them over.

use std::env;
use std::process::ExitCode;

use chrono::Utc;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use inkboard::{parse_current, parse_feed, parse_forecast, WeatherReport};
use inkboard_embedded_graphics::{
    draw_board, BitmapDisplay, BoardFonts, IconAssets, IconRaster, MonoMeasurer,
};
use inkboard_render::{BoardComposer, BoardConfig, IconId, IconTable};

#[derive(Clone, Debug)]
struct Args {
    feed_path: String,
    weather_path: String,
    forecast_path: String,
    profile_path: Option<String>,
    out_path: String,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cfg = parse_args(args)?;

    let layout = match &cfg.profile_path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
            BoardConfig::from_profile_json(&bytes).map_err(|e| e.to_string())?
        }
        None => BoardConfig::default(),
    };

    let feed_bytes = std::fs::read(&cfg.feed_path).map_err(|e| e.to_string())?;
    let entries = parse_feed(&feed_bytes).map_err(|e| e.to_string())?;

    let current_bytes = std::fs::read(&cfg.weather_path).map_err(|e| e.to_string())?;
    let current = parse_current(&current_bytes).map_err(|e| e.to_string())?;
    let forecast_bytes = std::fs::read(&cfg.forecast_path).map_err(|e| e.to_string())?;
    let forecast = parse_forecast(&forecast_bytes).map_err(|e| e.to_string())?;
    let report = WeatherReport { current, forecast };

    let fonts = BoardFonts::default();
    let measurer = MonoMeasurer::new(fonts);
    let (table, assets) = builtin_icons();

    let composer = BoardComposer::new(layout, &measurer, &table);
    let page = composer.compose(Utc::now(), &entries, &report);

    let mut display = BitmapDisplay::new(layout.canvas_width, layout.canvas_height);
    display
        .clear(BinaryColor::Off)
        .map_err(|e| e.to_string())?;
    draw_board(&mut display, &page, &fonts, &assets).map_err(|e| e.to_string())?;
    display.save_pgm(&cfg.out_path)?;

    println!(
        "wrote {} ({} commands, {} feed entries, {} forecast steps)",
        cfg.out_path,
        page.commands.len(),
        entries.len(),
        report.forecast.len()
    );
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    let mut feed_path = None;
    let mut weather_path = None;
    let mut forecast_path = None;
    let mut profile_path = None;
    let mut out_path = "board.pgm".to_string();

    let mut iter = args.into_iter().skip(1);
    while let Some(flag) = iter.next() {
        let mut value_for = |name: &str| {
            iter.next()
                .ok_or_else(|| format!("missing value for {}", name))
        };
        match flag.as_str() {
            "--feed" => feed_path = Some(value_for("--feed")?),
            "--weather" => weather_path = Some(value_for("--weather")?),
            "--forecast" => forecast_path = Some(value_for("--forecast")?),
            "--profile" => profile_path = Some(value_for("--profile")?),
            "--out" => out_path = value_for("--out")?,
            "--help" | "-h" => return Err("usage".to_string()),
            other => return Err(format!("unknown flag: {}", other)),
        }
    }

    Ok(Args {
        feed_path: feed_path.ok_or("--feed is required")?,
        weather_path: weather_path.ok_or("--weather is required")?,
        forecast_path: forecast_path.ok_or("--forecast is required")?,
        profile_path,
        out_path,
    })
}

fn help_text() -> &'static str {
    r#"USAGE:
  preview --feed <rss-or-atom.xml> --weather <current.json> --forecast <forecast.json> [OPTIONS]

OPTIONS:
  --profile <layout.json>  partial BoardConfig overrides (JSON)
  --out <path.pgm>         output path (default: board.pgm)
"#
}

const ICON_SIZE: u32 = 16;

/// Build the built-in icon set: generated 16x16 glyphs per condition group
/// plus the reserved fallback.
fn builtin_icons() -> (IconTable, IconAssets) {
    let fallback = IconId(0);
    let mut table = IconTable::new(fallback);
    let mut assets = IconAssets::new();

    assets.insert(fallback, glyph(|x, y| outline(x, y) || diagonal(x, y)));
    assets.set_fallback(fallback);

    let sun = IconId(1);
    assets.insert(sun, glyph(disc));
    let clouds = IconId(2);
    assets.insert(clouds, glyph(cloud_bar));
    let rain = IconId(3);
    assets.insert(rain, glyph(|x, y| cloud_bar(x, y) || rain_drops(x, y)));
    let snow = IconId(4);
    assets.insert(snow, glyph(|x, y| cloud_bar(x, y) || snow_dots(x, y)));
    let mist = IconId(5);
    assets.insert(mist, glyph(mist_lines));

    for code in ["01d", "01n"] {
        table.insert(code, sun);
    }
    for code in ["02d", "02n", "03d", "03n", "04d", "04n"] {
        table.insert(code, clouds);
    }
    for code in ["09d", "09n", "10d", "10n", "11d", "11n"] {
        table.insert(code, rain);
    }
    for code in ["13d", "13n"] {
        table.insert(code, snow);
    }
    for code in ["50d", "50n"] {
        table.insert(code, mist);
    }

    (table, assets)
}

/// Rasterize a pixel predicate into a 1bpp row-padded glyph.
fn glyph(pixel_on: impl Fn(u32, u32) -> bool) -> IconRaster {
    let stride = (ICON_SIZE as usize).div_ceil(8);
    let mut data = vec![0u8; stride * ICON_SIZE as usize];
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            if pixel_on(x, y) {
                let idx = y as usize * stride + x as usize / 8;
                data[idx] |= 0x80 >> (x % 8);
            }
        }
    }
    // The buffer is sized from the stride above, so this cannot fail.
    IconRaster::new(data, ICON_SIZE, ICON_SIZE).expect("glyph buffer matches its stride")
}

fn outline(x: u32, y: u32) -> bool {
    x == 0 || y == 0 || x == ICON_SIZE - 1 || y == ICON_SIZE - 1
}

fn diagonal(x: u32, y: u32) -> bool {
    x == y
}

fn disc(x: u32, y: u32) -> bool {
    let dx = x as i32 - 8;
    let dy = y as i32 - 8;
    dx * dx + dy * dy <= 25
}

fn cloud_bar(x: u32, y: u32) -> bool {
    (4..=9).contains(&y) && (1..ICON_SIZE - 1).contains(&x)
}

fn rain_drops(x: u32, y: u32) -> bool {
    (11..ICON_SIZE).contains(&y) && x % 4 == (y % 2) * 2 + 1
}

fn snow_dots(x: u32, y: u32) -> bool {
    (11..ICON_SIZE).contains(&y) && y % 2 == 1 && x % 4 == 1
}

fn mist_lines(x: u32, y: u32) -> bool {
    y % 3 == 1 && (1..ICON_SIZE - 1).contains(&x)
}
