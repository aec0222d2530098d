//! embedded-graphics backend for `inkboard-render` board pages.
//!
//! Maps [`FontRole`]s onto monospaced faces, measures text for the layout
//! engine, holds pre-decoded 1bpp icon rasters, and executes draw commands
//! onto any `DrawTarget<Color = BinaryColor>`.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod framebuffer;

pub use framebuffer::BitmapDisplay;

use embedded_graphics::{
    image::{Image, ImageRaw},
    mono_font::{
        ascii::{FONT_10X20, FONT_6X13, FONT_6X9, FONT_7X13_BOLD, FONT_8X13},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use inkboard_render::{
    BoardPage, DrawCommand, FontRole, IconCommand, IconId, RuleCommand, TextCommand, TextMeasurer,
    TextSize,
};
use std::fmt;

/// Monospaced face per text role.
#[derive(Clone, Copy)]
pub struct BoardFonts {
    pub heading: &'static MonoFont<'static>,
    pub entry_header: &'static MonoFont<'static>,
    pub entry_body: &'static MonoFont<'static>,
    pub panel: &'static MonoFont<'static>,
    pub card: &'static MonoFont<'static>,
}

impl BoardFonts {
    fn face(&self, role: FontRole) -> &'static MonoFont<'static> {
        match role {
            FontRole::Heading => self.heading,
            FontRole::EntryHeader => self.entry_header,
            FontRole::EntryBody => self.entry_body,
            FontRole::PanelText => self.panel,
            FontRole::CardText => self.card,
        }
    }
}

impl Default for BoardFonts {
    fn default() -> Self {
        Self {
            heading: &FONT_10X20,
            entry_header: &FONT_7X13_BOLD,
            entry_body: &FONT_6X13,
            panel: &FONT_8X13,
            card: &FONT_6X9,
        }
    }
}

impl fmt::Debug for BoardFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardFonts").finish_non_exhaustive()
    }
}

/// Text measurer over monospaced glyph boxes.
///
/// Width is `code points * glyph width`; height is the glyph box height.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoMeasurer {
    fonts: BoardFonts,
}

impl MonoMeasurer {
    pub fn new(fonts: BoardFonts) -> Self {
        Self { fonts }
    }
}

impl TextMeasurer for MonoMeasurer {
    fn measure(&self, text: &str, role: FontRole) -> TextSize {
        let size = self.fonts.face(role).character_size;
        TextSize {
            width: text.chars().count() as u32 * size.width,
            height: size.height,
        }
    }
}

/// Error returned when an icon raster cannot be registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconAssetError {
    InvalidDimensions,
    InvalidPixelData,
}

impl fmt::Display for IconAssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions => f.write_str("icon raster has zero dimensions"),
            Self::InvalidPixelData => f.write_str("icon raster data does not match dimensions"),
        }
    }
}

impl std::error::Error for IconAssetError {}

/// One pre-decoded 1bpp icon raster, rows padded to byte boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconRaster {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl IconRaster {
    /// Validate and wrap raw 1bpp row-padded pixel data.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, IconAssetError> {
        if width == 0 || height == 0 {
            return Err(IconAssetError::InvalidDimensions);
        }
        let stride = width.div_ceil(8) as usize;
        if data.len() != stride * height as usize {
            return Err(IconAssetError::InvalidPixelData);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }
}

/// Icon rasters keyed by [`IconId`].
///
/// An id without a registered raster draws the fallback raster; if even the
/// fallback is missing the backend degrades to an outlined placeholder box,
/// so an icon command never fails to produce output.
#[derive(Clone, Debug, Default)]
pub struct IconAssets {
    rasters: Vec<Option<IconRaster>>,
    fallback: Option<IconId>,
}

impl IconAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raster for an id, growing the table as needed.
    pub fn insert(&mut self, id: IconId, raster: IconRaster) {
        if self.rasters.len() <= id.0 {
            self.rasters.resize(id.0 + 1, None);
        }
        self.rasters[id.0] = Some(raster);
    }

    /// Mark an id as the fallback raster for unregistered ids.
    pub fn set_fallback(&mut self, id: IconId) {
        self.fallback = Some(id);
    }

    fn raster(&self, id: IconId) -> Option<&IconRaster> {
        let direct = self.rasters.get(id.0).and_then(|slot| slot.as_ref());
        direct.or_else(|| {
            self.fallback
                .and_then(|fb| self.rasters.get(fb.0))
                .and_then(|slot| slot.as_ref())
        })
    }
}

/// Draw one composed board page onto a binary display.
pub fn draw_board<D>(
    display: &mut D,
    page: &BoardPage,
    fonts: &BoardFonts,
    icons: &IconAssets,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for cmd in &page.commands {
        match cmd {
            DrawCommand::Text(text) => draw_text(display, fonts, text)?,
            DrawCommand::Rule(rule) => draw_rule(display, rule)?,
            DrawCommand::Icon(icon) => draw_icon(display, icons, icon)?,
        }
    }
    Ok(())
}

fn draw_text<D>(display: &mut D, fonts: &BoardFonts, cmd: &TextCommand) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(fonts.face(cmd.role), BinaryColor::On);
    Text::with_baseline(
        &cmd.text,
        Point::new(cmd.x, cmd.baseline_y),
        style,
        Baseline::Alphabetic,
    )
    .draw(display)?;
    Ok(())
}

fn draw_rule<D>(display: &mut D, cmd: &RuleCommand) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    // A zero-length rule has no pixels; the end-point math below would
    // otherwise stroke one pixel before the start.
    if cmd.length == 0 {
        return Ok(());
    }
    let start = Point::new(cmd.x, cmd.y);
    let end = if cmd.horizontal {
        Point::new(cmd.x + cmd.length as i32 - 1, cmd.y)
    } else {
        Point::new(cmd.x, cmd.y + cmd.length as i32 - 1)
    };
    Line::new(start, end)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, cmd.thickness))
        .draw(display)
}

fn draw_icon<D>(display: &mut D, icons: &IconAssets, cmd: &IconCommand) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match icons.raster(cmd.icon) {
        Some(raster) => {
            let raw = ImageRaw::<BinaryColor>::new(&raster.data, raster.width);
            // Center the raster inside the commanded box; no scaling.
            let x = cmd.x + (cmd.width.saturating_sub(raster.width) / 2) as i32;
            let y = cmd.y + (cmd.height.saturating_sub(raster.height) / 2) as i32;
            Image::new(&raw, Point::new(x, y)).draw(display)
        }
        None => {
            log::warn!("no raster for icon id {}; drawing placeholder", cmd.icon.0);
            Rectangle::new(
                Point::new(cmd.x, cmd.y),
                Size::new(cmd.width, cmd.height),
            )
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(display)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_render::{BoardPage, DrawCommand, IconCommand, RuleCommand, TextCommand};

    fn lit_pixels(display: &BitmapDisplay) -> usize {
        display.pixels().filter(|on| *on).count()
    }

    #[test]
    fn mono_measurer_scales_with_code_points() {
        let m = MonoMeasurer::default();
        let a = m.measure("abc", FontRole::EntryBody);
        let b = m.measure("abcdef", FontRole::EntryBody);
        assert_eq!(b.width, 2 * a.width);
        assert_eq!(a.height, b.height);
        // Code points, not bytes.
        let cyr = m.measure("абв", FontRole::EntryBody);
        assert_eq!(cyr.width, a.width);
    }

    #[test]
    fn icon_raster_validates_stride() {
        assert!(IconRaster::new(vec![0u8; 32], 16, 16).is_ok());
        assert_eq!(
            IconRaster::new(vec![0u8; 31], 16, 16),
            Err(IconAssetError::InvalidPixelData)
        );
        assert_eq!(
            IconRaster::new(Vec::new(), 0, 16),
            Err(IconAssetError::InvalidDimensions)
        );
    }

    #[test]
    fn missing_raster_falls_back_then_degrades_to_placeholder() {
        let mut display = BitmapDisplay::new(64, 64);
        let icons = IconAssets::new();
        let page = BoardPage {
            commands: vec![DrawCommand::Icon(IconCommand {
                icon: IconId(3),
                x: 8,
                y: 8,
                width: 32,
                height: 32,
            })],
        };
        draw_board(&mut display, &page, &BoardFonts::default(), &icons).unwrap();
        // Placeholder outline drew something.
        assert!(lit_pixels(&display) > 0);

        let mut with_fallback = IconAssets::new();
        with_fallback.insert(IconId(0), IconRaster::new(vec![0xFF; 32], 16, 16).unwrap());
        with_fallback.set_fallback(IconId(0));
        let mut display2 = BitmapDisplay::new(64, 64);
        draw_board(&mut display2, &page, &BoardFonts::default(), &with_fallback).unwrap();
        // 16x16 solid raster centered in the 32x32 box.
        assert_eq!(lit_pixels(&display2), 256);
    }

    #[test]
    fn draw_board_executes_all_command_kinds() {
        let mut display = BitmapDisplay::new(128, 64);
        let mut icons = IconAssets::new();
        icons.insert(IconId(0), IconRaster::new(vec![0xFF; 32], 16, 16).unwrap());
        icons.set_fallback(IconId(0));
        let page = BoardPage {
            commands: vec![
                DrawCommand::Text(TextCommand {
                    x: 2,
                    baseline_y: 20,
                    text: "hi".to_string(),
                    role: FontRole::Heading,
                }),
                DrawCommand::Rule(RuleCommand {
                    x: 0,
                    y: 30,
                    length: 128,
                    thickness: 1,
                    horizontal: true,
                }),
                DrawCommand::Icon(IconCommand {
                    icon: IconId(0),
                    x: 100,
                    y: 40,
                    width: 16,
                    height: 16,
                }),
            ],
        };
        draw_board(&mut display, &page, &BoardFonts::default(), &icons).unwrap();
        // Rule spans the full row.
        assert!(display.pixel(0, 30).unwrap() && display.pixel(127, 30).unwrap());
        // Icon raster is solid.
        assert!(display.pixel(100, 40).unwrap());
        assert!(lit_pixels(&display) > 128 + 256);
    }

    #[test]
    fn zero_length_rule_draws_no_pixels() {
        let mut display = BitmapDisplay::new(8, 8);
        let page = BoardPage {
            commands: vec![DrawCommand::Rule(RuleCommand {
                x: 4,
                y: 4,
                length: 0,
                thickness: 1,
                horizontal: true,
            })],
        };
        draw_board(&mut display, &page, &BoardFonts::default(), &IconAssets::new()).unwrap();
        assert_eq!(lit_pixels(&display), 0);
    }

    #[test]
    fn clipped_commands_do_not_error() {
        let mut display = BitmapDisplay::new(32, 32);
        let page = BoardPage {
            commands: vec![DrawCommand::Text(TextCommand {
                x: -5,
                baseline_y: 100,
                text: "offscreen".to_string(),
                role: FontRole::EntryBody,
            })],
        };
        draw_board(&mut display, &page, &BoardFonts::default(), &IconAssets::new()).unwrap();
    }
}
