use crate::controller::SharedEditorState;
use crate::document_model::FormatSettings;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const RC_NAME: &str = ".wsrusrc";
/// Widest margin accepted from the rc file.
const MAX_MARGIN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcConfig {
    pub format: FormatSettings,
    pub auto_indent: bool,
    pub insert_mode: bool,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            format: FormatSettings::default(),
            auto_indent: false,
            insert_mode: true,
            case_sensitive: true,
            whole_word: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_in(value: &str, range: std::ops::RangeInclusive<usize>) -> Option<usize> {
    value.parse::<usize>().ok().filter(|n| range.contains(n))
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .wsrusrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.wsrusrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load and parse the RC file. A missing or unreadable file gives the
    /// defaults.
    pub fn load_config() -> RcConfig {
        let mut config = RcConfig::default();

        if let Some(rc_path) = Self::get_rc_path() {
            match fs::read_to_string(&rc_path) {
                Ok(content) => {
                    Self::parse_config_content(&content, &mut config);
                    debug!(path = %rc_path.display(), "loaded rc file");
                }
                Err(e) => warn!(path = %rc_path.display(), error = %e, "cannot read rc file"),
            }
        }

        config
    }

    fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            Self::parse_config_line(line, config);
        }
        Self::check_margins(config);
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();
        let format = &mut config.format;

        // WordStar dot commands
        if let Some(rest) = line.strip_prefix('.') {
            let (cmd, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let value = value.trim();
            match cmd.to_ascii_lowercase().as_str() {
                "lm" => Self::set(&mut format.left_margin, parse_in(value, 1..=MAX_MARGIN), line),
                "rm" => Self::set(&mut format.right_margin, parse_in(value, 2..=MAX_MARGIN), line),
                "pm" => Self::set(&mut format.paragraph_margin, parse_in(value, 1..=MAX_MARGIN), line),
                "ls" => Self::set(&mut format.line_spacing, parse_in(value, 1..=9), line),
                _ => warn!(line, "unknown dot command"),
            }
        } else if let Some(setting) = line.strip_prefix("set ") {
            match setting.trim() {
                "wrap" => format.word_wrap = true,
                "nowrap" => format.word_wrap = false,
                "autoindent" => config.auto_indent = true,
                "noautoindent" => config.auto_indent = false,
                _ => warn!(line, "unknown setting"),
            }
        } else if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            match key.trim() {
                "left_margin" => {
                    Self::set(&mut format.left_margin, parse_in(value, 1..=MAX_MARGIN), line)
                }
                "right_margin" => {
                    Self::set(&mut format.right_margin, parse_in(value, 2..=MAX_MARGIN), line)
                }
                "paragraph_margin" => {
                    Self::set(&mut format.paragraph_margin, parse_in(value, 1..=MAX_MARGIN), line)
                }
                "tab_width" => Self::set(&mut format.tab_width, parse_in(value, 1..=16), line),
                "line_spacing" => Self::set(&mut format.line_spacing, parse_in(value, 1..=9), line),
                "word_wrap" => Self::set(&mut format.word_wrap, parse_flag(value), line),
                "justify" => Self::set(&mut format.justify, parse_flag(value), line),
                "auto_indent" => Self::set(&mut config.auto_indent, parse_flag(value), line),
                "insert_mode" => Self::set(&mut config.insert_mode, parse_flag(value), line),
                "case_sensitive" => Self::set(&mut config.case_sensitive, parse_flag(value), line),
                "whole_word" => Self::set(&mut config.whole_word, parse_flag(value), line),
                _ => warn!(line, "unknown setting"),
            }
        } else {
            warn!(line, "unrecognized rc line");
        }
    }

    fn set<T>(slot: &mut T, value: Option<T>, line: &str) {
        match value {
            Some(value) => *slot = value,
            None => warn!(line, "invalid value ignored"),
        }
    }

    /// Margins that contradict each other fall back to the defaults.
    fn check_margins(config: &mut RcConfig) {
        let defaults = FormatSettings::default();
        let format = &mut config.format;
        if format.left_margin >= format.right_margin {
            warn!(
                left = format.left_margin,
                right = format.right_margin,
                "left margin must be less than right margin"
            );
            format.left_margin = defaults.left_margin;
            format.right_margin = defaults.right_margin;
        }
        if format.paragraph_margin >= format.right_margin {
            warn!(
                paragraph = format.paragraph_margin,
                "paragraph margin must be less than right margin"
            );
            format.paragraph_margin = defaults.paragraph_margin;
        }
    }

    pub fn apply_config_to_shared_state(shared_state: &mut SharedEditorState, config: &RcConfig) {
        let doc = &mut shared_state.document;
        doc.format = config.format;
        doc.auto_indent = config.auto_indent;
        doc.insert_mode = config.insert_mode;

        let options = &mut shared_state.find_replace.options;
        options.case_sensitive = config.case_sensitive;
        options.whole_word = config.whole_word;
    }
}
