//! Shared UI icons.
//!
//! Each icon falls back to a plain-text marker on terminals without emoji
//! support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "[..]");

// Entities
pub static BOARD: Emoji<'_, '_> = Emoji("📋 ", "#");
pub static COLUMN: Emoji<'_, '_> = Emoji("📂 ", ">");
pub static DOCUMENT: Emoji<'_, '_> = Emoji("📄 ", "*");
pub static PERSON: Emoji<'_, '_> = Emoji("👤 ", "@");
pub static CALENDAR: Emoji<'_, '_> = Emoji("📅 ", "");
pub static STAR: Emoji<'_, '_> = Emoji("⭐", "*");
