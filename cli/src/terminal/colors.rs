use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 138, g: 226, b: 52 };
pub const SECONDARY: Color = Color::TrueColor { r: 114, g: 159, b: 207 };
pub const ACCENT: Color = Color::TrueColor { r: 252, g: 175, b: 62 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 211, g: 215, b: 207 };

pub const NETWORK: Color = Color::TrueColor { r: 173, g: 127, b: 168 };
pub const IPV4_ADDR: Color = Color::TrueColor { r: 114, g: 159, b: 207 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 52, g: 226, b: 226 };
pub const PORT: Color = Color::TrueColor { r: 252, g: 233, b: 79 };
pub const FULLY_OPEN: Color = Color::TrueColor { r: 239, g: 41, b: 41 };
