//! Generated banners
//!
//! Every extracted file starts with a header naming the file, its author and
//! the GPLv3 notice, and ends with a footer closing the file and setting the
//! editor mode. Both are fixed-form comment lines.

use fsplit_config::BannerConfig;

const LICENSE_NOTICE: &[&str] = &[
    "This program is free software; you can redistribute it and/or modify",
    "it under the terms of the GNU General Public License as published by",
    "the Free Software Foundation; either version 3 of the License, or (at",
    "your option) any later version.",
    "",
    "This program is distributed in the hope that it will be useful, but",
    "WITHOUT ANY WARRANTY; without even the implied warranty of",
    "MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU",
    "General Public License for more details.",
    "",
    "You should have received a copy of the GNU General Public License",
    "along with this program; if not, write to the Free Software",
    "Foundation, Inc., 51 Franklin Street, Fifth Floor,",
    "Boston, MA 02110-1301, USA.",
];

/// Header and footer generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub author: String,
    pub copyright: String,
    pub comment_marker: String,
    pub editor_mode: String,
}

impl Banner {
    /// Lines written before the declarator of `filename`.
    pub fn header(&self, filename: &str) -> Vec<String> {
        let mut lines = vec![
            self.comment(filename),
            self.comment(""),
            self.comment(&format!("Author: {}", self.author)),
            self.comment(&format!("Copyright (C) {}", self.copyright)),
            self.comment(""),
        ];
        lines.extend(LICENSE_NOTICE.iter().map(|text| self.comment(text)));
        lines.push(self.comment(""));
        lines
    }

    /// Lines written after the terminator of `filename`.
    pub fn footer(&self, filename: &str) -> Vec<String> {
        vec![
            self.comment(""),
            self.comment(&format!("end of {}", filename)),
            self.comment(""),
            self.comment("Local Variables: --"),
            self.comment(&format!("mode: {} --", self.editor_mode)),
            self.comment("End: --"),
        ]
    }

    fn comment(&self, text: &str) -> String {
        if text.is_empty() {
            self.comment_marker.clone()
        } else {
            format!("{} {}", self.comment_marker, text)
        }
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self {
            author: "Francois Mauger <mauger@lpccaen.in2p3.fr>".to_string(),
            copyright: "2011-2013 Francois Mauger <mauger@lpccaen.in2p3.fr>".to_string(),
            comment_marker: "c".to_string(),
            editor_mode: "fortran".to_string(),
        }
    }
}

impl From<&BannerConfig> for Banner {
    fn from(config: &BannerConfig) -> Self {
        Self {
            author: config.author.clone(),
            copyright: config.copyright.clone(),
            comment_marker: config.comment_marker.clone(),
            editor_mode: config.editor_mode.clone(),
        }
    }
}
