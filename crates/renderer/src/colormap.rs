//! Colour scales for data tiles and tile status.

use std::f32::consts::PI;

use image::Rgba;

use basemap::TileStatus;
use tile_common::{TileRecord, TileTable};

use crate::{RenderError, RenderResult};

/// Column whose values are drawn with the discrete palette.
pub const CLASS_COLUMN: &str = "class";

/// Opacity of data rectangles.
pub const TILE_ALPHA: f32 = 0.5;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    /// Matplotlib's `'b'`
    pub const BLUE: Color = Color::new(0, 0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b, 255))
    }

    /// Colour from components in `[0, 1]`.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b), 255)
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Composite this colour at `alpha` over an opaque background.
    pub fn over(self, background: Color, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;
        Self::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
            255,
        )
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Matplotlib's `rainbow` colormap for `t` in `[0, 1]`.
pub fn rainbow(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::from_unit(
        (2.0 * t - 0.5).abs(),
        (PI * t).sin(),
        (PI * t / 2.0).cos(),
    )
}

/// Tableau-10 palette, matplotlib's default colour cycle `C0`..`C9`.
pub const TAB10: [Color; 10] = [
    Color::new(0x1f, 0x77, 0xb4, 255),
    Color::new(0xff, 0x7f, 0x0e, 255),
    Color::new(0x2c, 0xa0, 0x2c, 255),
    Color::new(0xd6, 0x27, 0x28, 255),
    Color::new(0x94, 0x67, 0xbd, 255),
    Color::new(0x8c, 0x56, 0x4b, 255),
    Color::new(0xe3, 0x77, 0xc2, 255),
    Color::new(0x7f, 0x7f, 0x7f, 255),
    Color::new(0xbc, 0xbd, 0x22, 255),
    Color::new(0x17, 0xbe, 0xcf, 255),
];

/// `C{n}` for an integer-valued label; the palette repeats every ten.
pub fn discrete(value: f64) -> Color {
    let index = (value.trunc() as i64).rem_euclid(TAB10.len() as i64) as usize;
    TAB10[index]
}

/// Viridis at its two ends and middle, used for fetch status.
pub fn status_color(status: TileStatus) -> Color {
    match status {
        TileStatus::Failed => Color::new(68, 1, 84, 255),
        TileStatus::Cached => Color::new(33, 145, 140, 255),
        TileStatus::Fresh => Color::new(253, 231, 37, 255),
    }
}

/// Linear map of `[min, max]` onto `[0, 1]`, clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub min: f64,
    pub max: f64,
}

impl Normalizer {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range of `column` over the whole table.
    pub fn for_column(table: &TileTable, column: &str) -> RenderResult<Self> {
        if table.is_empty() {
            return Err(RenderError::EmptyTable);
        }
        table
            .column_range(column)
            .map(|(min, max)| Self::new(min, max))
            .ok_or_else(|| RenderError::UnknownColumn(column.to_string()))
    }

    /// A degenerate range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }
}

/// How a record's fill colour is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRule {
    /// Same colour for every record.
    Uniform(Color),
    /// `C{value}` from the named column.
    Discrete(String),
    /// Rainbow over the normalized value of the named column.
    Continuous { column: String, norm: Normalizer },
}

impl ColorRule {
    /// Rule for colouring `table` by `column`: blue without a column,
    /// discrete for [`CLASS_COLUMN`], rainbow otherwise.
    pub fn for_column(table: &TileTable, column: Option<&str>) -> RenderResult<Self> {
        let Some(column) = column else {
            return Ok(ColorRule::Uniform(Color::BLUE));
        };
        let norm = Normalizer::for_column(table, column)?;
        if column == CLASS_COLUMN {
            Ok(ColorRule::Discrete(column.to_string()))
        } else {
            Ok(ColorRule::Continuous {
                column: column.to_string(),
                norm,
            })
        }
    }

    /// Fill colour of a record, `None` when it lacks the column.
    pub fn color_for(&self, record: &TileRecord) -> Option<Color> {
        match self {
            ColorRule::Uniform(color) => Some(*color),
            ColorRule::Discrete(column) => record.value(column).map(discrete),
            ColorRule::Continuous { column, norm } => record
                .value(column)
                .filter(|v| v.is_finite())
                .map(|v| rainbow(norm.normalize(v))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_common::BoundingBox;

    #[test]
    fn test_rainbow_ends() {
        // rainbow(0) = (0.5, 0, 1), rainbow(1) = (1, 0, 0)
        assert_eq!(rainbow(0.0), Color::new(128, 0, 255, 255));
        let red = rainbow(1.0);
        assert_eq!((red.r, red.g, red.b), (255, 0, 0));
        // Middle is green-ish
        let mid = rainbow(0.5);
        assert!(mid.g == 255 && mid.r < 200);
    }

    #[test]
    fn test_discrete_cycle() {
        assert_eq!(discrete(0.0), Color::from_hex("#1f77b4").unwrap());
        assert_eq!(discrete(3.0), Color::from_hex("#d62728").unwrap());
        assert_eq!(discrete(13.0), discrete(3.0));
        assert_eq!(discrete(2.9), discrete(2.0));
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(Color::from_hex("1f77b4"), Some(Color::new(0x1f, 0x77, 0xb4, 255)));
        assert_eq!(Color::from_hex("#1f77b"), None);
        assert_eq!(Color::from_hex("#1f77bz"), None);
        // Six bytes, but not six hex digits
        assert_eq!(Color::from_hex("#aéé1"), None);
    }

    #[test]
    fn test_normalizer() {
        let norm = Normalizer::new(10.0, 20.0);
        assert_eq!(norm.normalize(10.0), 0.0);
        assert_eq!(norm.normalize(15.0), 0.5);
        assert_eq!(norm.normalize(30.0), 1.0);
        assert_eq!(Normalizer::new(5.0, 5.0).normalize(5.0), 0.0);
    }

    #[test]
    fn test_color_rule_selection() {
        let bounds = BoundingBox::new(8.5, 8.51, 47.3, 47.31);
        let table = TileTable::from_records(vec![
            TileRecord::new(1, bounds).with_value("class", 2.0).with_value("score", 1.0),
            TileRecord::new(2, bounds).with_value("score", 3.0),
        ]);

        assert_eq!(
            ColorRule::for_column(&table, None).unwrap(),
            ColorRule::Uniform(Color::BLUE)
        );
        assert!(matches!(
            ColorRule::for_column(&table, Some("class")).unwrap(),
            ColorRule::Discrete(_)
        ));

        let rule = ColorRule::for_column(&table, Some("score")).unwrap();
        assert_eq!(rule.color_for(&table.records()[0]), Some(rainbow(0.0)));
        assert_eq!(rule.color_for(&table.records()[1]), Some(rainbow(1.0)));

        let class = ColorRule::for_column(&table, Some("class")).unwrap();
        assert_eq!(class.color_for(&table.records()[1]), None);

        assert!(matches!(
            ColorRule::for_column(&table, Some("nope")),
            Err(RenderError::UnknownColumn(_))
        ));
        assert!(matches!(
            ColorRule::for_column(&TileTable::new(), Some("score")),
            Err(RenderError::EmptyTable)
        ));
    }

    #[test]
    fn test_over_white() {
        let c = Color::new(0, 0, 0, 255).over(Color::WHITE, 0.5);
        assert_eq!((c.r, c.g, c.b, c.a), (128, 128, 128, 255));
        assert_eq!(Color::BLUE.over(Color::WHITE, 1.0), Color::BLUE);
    }
}
