//! Extraction units
//!
//! A unit is everything between a declarator line and its `end` line. Its
//! keyword decides the category, and the category decides the file name.

use serde::Serialize;
use std::fmt;

/// Leading keyword of a declarator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Program,
    Subroutine,
    Function,
    Block,
}

impl Keyword {
    /// Match a token case-insensitively against the declarator keywords.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "program" => Some(Keyword::Program),
            "subroutine" => Some(Keyword::Subroutine),
            "function" => Some(Keyword::Function),
            "block" => Some(Keyword::Block),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Program => "program",
            Keyword::Subroutine => "subroutine",
            Keyword::Function => "function",
            Keyword::Block => "block",
        }
    }

    /// Subroutine and function names carry their argument list glued on.
    pub fn strips_arguments(&self) -> bool {
        matches!(self, Keyword::Subroutine | Keyword::Function)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of unit being extracted. Functions share the subroutine category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Program,
    BlockData,
    Subroutine,
}

impl From<Keyword> for Category {
    fn from(keyword: Keyword) -> Self {
        match keyword {
            Keyword::Program => Category::Program,
            Keyword::Block => Category::BlockData,
            Keyword::Subroutine | Keyword::Function => Category::Subroutine,
        }
    }
}

impl Category {
    /// Output file name for a unit of this category.
    ///
    /// Programs get an upper-case `.F` so they go through the preprocessor.
    pub fn filename(&self, name: &str) -> String {
        match self {
            Category::Program => format!("prog_{}.F", name),
            Category::BlockData => format!("block_{}.f", name),
            Category::Subroutine => format!("{}.f", name),
        }
    }

    /// Only subroutines and functions are listed in the manifest.
    pub fn is_listed(&self) -> bool {
        matches!(self, Category::Subroutine)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Program => write!(f, "program"),
            Category::BlockData => write!(f, "block data"),
            Category::Subroutine => write!(f, "subroutine"),
        }
    }
}

/// A recognized declarator: the keyword and the unit name it introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub keyword: Keyword,
    pub name: String,
}

impl Declarator {
    pub fn new(keyword: Keyword, name: impl Into<String>) -> Self {
        Self {
            keyword,
            name: name.into(),
        }
    }

    pub fn category(&self) -> Category {
        Category::from(self.keyword)
    }

    pub fn filename(&self) -> String {
        self.category().filename(&self.name)
    }
}

/// What was written for one closed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSummary {
    pub name: String,
    pub category: Category,
    pub filename: String,
    /// Source lines copied into the unit, declarator and terminator included.
    pub lines: usize,
}
