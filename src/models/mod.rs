mod category;
mod expense;

pub use category::{
    parse_hex_color, rgb_of, Category, ColorValue, DEFAULT_CATEGORIES, DEFAULT_COLOR,
    DEFAULT_ICON, PALETTE,
};
pub use expense::ExpenseEntry;

#[cfg(test)]
mod tests;
