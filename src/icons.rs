use crate::models::DEFAULT_ICON;

/// Icon keys a category can use, with the glyph drawn for each.
pub(crate) const ICONS: &[(&str, &str)] = &[
    ("restaurant", "🍴"),
    ("bus", "🚌"),
    ("receipt", "🧾"),
    ("heart", "❤"),
    ("celebration", "🎉"),
    ("shopping_cart", "🛒"),
    ("home", "🏠"),
    ("work", "💼"),
    ("school", "🎓"),
    ("sports", "⚽"),
    ("flight", "✈"),
    ("gas_station", "⛽"),
    ("phone", "📱"),
    ("wifi", "📶"),
    ("fitness", "🏋"),
    ("movie", "🎬"),
    ("music", "🎵"),
    ("book", "📖"),
    ("pets", "🐾"),
];

const FALLBACK_GLYPH: &str = "🧾";

/// Glyph for an icon key; unknown keys get the receipt.
pub(crate) fn glyph(icon_name: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(key, _)| *key == icon_name)
        .map(|(_, g)| *g)
        .unwrap_or(FALLBACK_GLYPH)
}

pub(crate) fn is_known(icon_name: &str) -> bool {
    ICONS.iter().any(|(key, _)| *key == icon_name)
}

/// Normalize a user-typed icon key, falling back to the default icon.
pub(crate) fn resolve_key(input: &str) -> &'static str {
    let wanted = input.trim().to_lowercase().replace(['-', ' '], "_");
    ICONS
        .iter()
        .find(|(key, _)| *key == wanted)
        .map(|(key, _)| *key)
        .unwrap_or(DEFAULT_ICON)
}

pub(crate) fn keys() -> impl Iterator<Item = &'static str> {
    ICONS.iter().map(|(key, _)| *key)
}
