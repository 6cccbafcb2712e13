//! Cleaner configuration
//!
//! Defaults reproduce the built-in legal-memo profile. A `.memo-template.toml`
//! file can override any field; omitted fields keep their defaults:
//!
//! ```toml
//! input = "templates/legal-memo-template.dotx"
//! output = "templates/legal-memo-carbone.dotx"
//! strict = true
//! literals = ["示例客户有限公司", "2025年3月1日"]
//!
//! [[rules]]
//! pattern = "致：.*公司"
//! replacement = "致：{d.client_name}"
//! ```

use crate::error::{Result, TemplateError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name looked up in the working and home directories
pub const CONFIG_FILE_NAME: &str = ".memo-template.toml";

/// Input template used when nothing else is configured
pub const DEFAULT_INPUT: &str = "legal-memo-template.dotx";

/// Output template used when nothing else is configured
pub const DEFAULT_OUTPUT: &str = "legal-memo-carbone.dotx";

/// Example strings that mark a paragraph for pattern replacement
pub const DEFAULT_LITERALS: [&str; 8] = [
    "中翼航空投资有限公司",
    "旅客投诉餐食异物相关事宜",
    "国浩律师（北京）事务所",
    "林大荣",
    "香港籍",
    "顺义区医院",
    "2026年1月8日",
    "2026年1月19日",
];

/// Ordered `(pattern, replacement)` pairs applied to marked paragraphs
pub const DEFAULT_RULES: [(&str, &str); 7] = [
    // Heading
    (r"致：.*公司", "致：{d.client_name}"),
    (r"关于.*之法律备忘录", "关于 {d.case_title} 之法律备忘录"),
    // Opening boilerplate
    (r"我们，.*律师.*事务所.*，接受.*委托", "我们接受委托"),
    (r"就.*相关事宜", "就相关事宜"),
    // Dates
    (r"\d{4}年\d{1,2}月\d{1,2}日", "{d.event_date}"),
    (
        r"二〇[〇一二三四五六七八九]{2}年[〇一二三四五六七八九十]{1,2}月[〇一二三四五六七八九十]{1,3}日",
        "{d.date}",
    ),
    // Client reference
    (r"贵司", "委托方"),
];

/// A replacement rule as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Regular expression to search for
    pub pattern: String,
    /// Literal text substituted for every match
    pub replacement: String,
}

/// Settings for one cleaning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanerConfig {
    /// Sample document to clean
    pub input: PathBuf,
    /// Where the template is written
    pub output: PathBuf,
    /// Example strings marking paragraphs for pattern replacement
    pub literals: Vec<String>,
    /// Ordered replacement rules
    pub rules: Vec<RuleConfig>,
    /// Treat a missing section or signature block as an error
    pub strict: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            literals: DEFAULT_LITERALS.iter().map(|s| (*s).to_string()).collect(),
            rules: DEFAULT_RULES
                .iter()
                .map(|(pattern, replacement)| RuleConfig {
                    pattern: (*pattern).to_string(),
                    replacement: (*replacement).to_string(),
                })
                .collect(),
            strict: false,
        }
    }
}

impl CleanerConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML for this structure.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| TemplateError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TemplateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content, path)
    }

    /// Locate a configuration file: project directory first, then home
    #[must_use]
    pub fn discover(project_dir: &Path) -> Option<PathBuf> {
        let project = project_dir.join(CONFIG_FILE_NAME);
        if project.is_file() {
            return Some(project);
        }
        let user = dirs::home_dir()?.join(CONFIG_FILE_NAME);
        user.is_file().then_some(user)
    }

    /// Load the explicit file if given, otherwise a discovered one, otherwise defaults
    ///
    /// # Errors
    ///
    /// Returns `Config` if a selected file cannot be read or parsed.
    pub fn resolve(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::discover(project_dir) {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }
}
