/// Packed ARGB color as stored in the `colorValue` column (`0xAARRGGBB`
/// reinterpreted as a signed 32-bit integer).
pub type ColorValue = i32;

const fn opaque(rgb: u32) -> ColorValue {
    (0xFF00_0000 | rgb) as ColorValue
}

/// Colors offered when creating or re-coloring a category.
pub const PALETTE: &[ColorValue] = &[
    opaque(0x3F51B5),
    opaque(0x3949AB),
    opaque(0x7986CB),
    opaque(0xE91E63),
    opaque(0xFFC107),
    opaque(0x4CAF50),
    opaque(0x2196F3),
    opaque(0x9C27B0),
    opaque(0xFF9800),
    opaque(0xF44336),
];

pub const DEFAULT_COLOR: ColorValue = opaque(0x3F51B5);
pub const DEFAULT_ICON: &str = "receipt";

/// Seed data for an empty store: (name, icon, color).
pub const DEFAULT_CATEGORIES: &[(&str, &str, ColorValue)] = &[
    ("Food", "restaurant", opaque(0x3F51B5)),
    ("Transports", "bus", opaque(0x7986CB)),
    ("Bills", "receipt", opaque(0x303F9F)),
    ("Health", "heart", opaque(0xE91E63)),
    ("Entertainment", "celebration", opaque(0xFFC107)),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon_name: String,
    pub color_value: ColorValue,
}

impl Category {
    pub fn new(name: String, icon_name: String, color_value: ColorValue) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            icon_name,
            color_value,
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.id == id)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        rgb_of(self.color_value)
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn hex_color(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

pub fn rgb_of(color: ColorValue) -> (u8, u8, u8) {
    let packed = color as u32;
    (
        ((packed >> 16) & 0xFF) as u8,
        ((packed >> 8) & 0xFF) as u8,
        (packed & 0xFF) as u8,
    )
}

/// Parse `#RRGGBB` or `RRGGBB` into an opaque color value.
pub fn parse_hex_color(s: &str) -> Option<ColorValue> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(opaque)
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
