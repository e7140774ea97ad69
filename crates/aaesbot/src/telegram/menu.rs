//! Inline menus and their callback data.
//!
//! Menu buttons carry `menu:<screen>` or `level:<digits>`; file buttons are
//! handled in [`super::materials`].

use aaescore::drive::Level;
use strum::IntoEnumIterator;
use teloxide::types::InlineKeyboardMarkup;

use super::cb;

/// A pressed menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Main,
    Materials,
    Slides,
    PastQuestions,
    SearchAll,
    Gpa,
    Level(Level),
}

impl MenuAction {
    /// Callback payload for this button.
    pub fn data(&self) -> String {
        match self {
            MenuAction::Main => "menu:main".to_string(),
            MenuAction::Materials => "menu:materials".to_string(),
            MenuAction::Slides => "menu:slides".to_string(),
            MenuAction::PastQuestions => "menu:pastq".to_string(),
            MenuAction::SearchAll => "menu:all".to_string(),
            MenuAction::Gpa => "menu:gpa".to_string(),
            MenuAction::Level(level) => format!("level:{}", level_digits(*level)),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        if let Some(digits) = data.strip_prefix("level:") {
            return Level::normalize(digits).map(MenuAction::Level);
        }
        match data.strip_prefix("menu:")? {
            "main" => Some(MenuAction::Main),
            "materials" => Some(MenuAction::Materials),
            "slides" => Some(MenuAction::Slides),
            "pastq" => Some(MenuAction::PastQuestions),
            "all" => Some(MenuAction::SearchAll),
            "gpa" => Some(MenuAction::Gpa),
            _ => None,
        }
    }
}

fn level_digits(level: Level) -> &'static str {
    match level {
        Level::L100 => "100",
        Level::L200 => "200",
        Level::L300 => "300",
        Level::L400 => "400",
    }
}

pub const MAIN_MENU_TEXT: &str = "Choose an option:";
pub const MATERIALS_MENU_TEXT: &str = "Choose resource type";

pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("📚 Materials", MenuAction::Materials.data())],
        vec![cb("📊 GPA Calculator", MenuAction::Gpa.data())],
    ])
}

pub fn materials_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("📑 Slides", MenuAction::Slides.data())],
        vec![cb("📝 Past Questions", MenuAction::PastQuestions.data())],
        vec![cb("🔎 Search All", MenuAction::SearchAll.data())],
        vec![cb("⬅️ Back", MenuAction::Main.data())],
    ])
}

/// One button per level, two per row, plus Back.
pub fn level_keyboard() -> InlineKeyboardMarkup {
    let levels: Vec<_> = Level::iter()
        .map(|level| cb(format!("{} Level", level_digits(level)), MenuAction::Level(level).data()))
        .collect();
    let mut rows: Vec<Vec<_>> = levels.chunks(2).map(<[_]>::to_vec).collect();
    rows.push(vec![cb("⬅️ Back", MenuAction::Materials.data())]);
    InlineKeyboardMarkup::new(rows)
}
