//! Dictionary file naming and the initial file template

use crate::error::{DictError, DictResult};
use crate::grammar::{DEF_DIVIDER, NAME_DIVIDER};
use regex::Regex;
use std::sync::LazyLock;

static DICT_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)_(.+)_(.+)\.dict$").expect("valid dictionary filename regex"));
static META_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*series_title\s*:.*$").expect("valid title regex"));
static META_ABBR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*series_abbr\s*:.*$").expect("valid abbr regex"));

/// Filename of the dictionary shared by every series
pub const COMMON_DICT_FNAME: &str = "common_dict.dict";

/// The parts of a `<abbr>_<host>_<code>.dict` filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictFileName {
    pub series_abbr: String,
    pub host: String,
    pub series_code: String,
}

impl DictFileName {
    pub fn new(series_abbr: &str, host: &str, series_code: &str) -> Self {
        DictFileName {
            series_abbr: series_abbr.to_string(),
            host: host.to_string(),
            series_code: series_code.to_string(),
        }
    }
}

impl std::fmt::Display for DictFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}.dict", self.series_abbr, self.host, self.series_code)
    }
}

impl std::str::FromStr for DictFileName {
    type Err = DictError;

    fn from_str(s: &str) -> DictResult<Self> {
        splice_dict_name(s).ok_or_else(|| DictError::InvalidFileName(s.to_string()))
    }
}

/// Split a dictionary filename into series abbreviation, host and code
pub fn splice_dict_name(fname: &str) -> Option<DictFileName> {
    let caps = DICT_FILE_NAME.captures(fname)?;
    Some(DictFileName::new(&caps[1], &caps[2], &caps[3]))
}

/// Contents of a freshly created dictionary file
pub fn default_dictionary(series_title: &str, series_abbr: &str, series_link: &str) -> String {
    let banner = |name: &str| format!("\n\n//{:=^72}", format!("[ {} ]", name));
    let mut out = String::new();
    out.push_str(&format!("// series_title :  {}\n", series_title));
    out.push_str(&format!("// series_abbr  :  {}\n", series_abbr));
    out.push_str(&format!("// series_link  :  {}\n", series_link));
    out.push_str(&banner("Names"));
    out.push_str(&format!(
        "\n@name{{ナルト{0}うずまき, Naruto{0}Uzumaki}}\t\t// Main character of a popular manga",
        NAME_DIVIDER
    ));
    for section in ["Places", "Skills", "Monsters", "Terminology"] {
        out.push_str(&banner(section));
    }
    out.push_str(&format!("\n九尾の狐 {} Nine Tailed Fox", DEF_DIVIDER));
    out.push_str(&banner("Misc"));
    out.push_str("\n\n// END OF FILE");
    out
}

/// Rewrite the title and abbreviation header lines of a dictionary.
///
/// Only the first two lines are considered, as written by
/// [`default_dictionary`]. Returns `None` when neither line is a header.
pub fn update_meta_header(contents: &str, new_title: &str, new_abbr: &str) -> Option<String> {
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    let mut changed = false;

    if let Some(first) = lines.first_mut().filter(|l| META_TITLE.is_match(l)) {
        *first = format!("// series_title :  {}", new_title);
        changed = true;
    }
    if let Some(second) = lines.get_mut(1).filter(|l| META_ABBR.is_match(l)) {
        *second = format!("// series_abbr  :  {}", new_abbr);
        changed = true;
    }

    if !changed {
        return None;
    }
    let mut out = lines.join("\n");
    if contents.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}
