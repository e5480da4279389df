use unicode_normalization::UnicodeNormalization;

use super::formats::StringFormat;
use super::{Check, CheckBag, CheckDef};
use crate::config::ParseContext;
use crate::engine::ParsePayload;
use crate::error::{IssueCode, RawIssue};
use crate::value::Value;

fn format_issue(format: &str, value: &str, ctx: &ParseContext) -> RawIssue {
    let input = ctx.report_input.then(|| Value::from(value));
    RawIssue::new(IssueCode::InvalidFormat, input.as_ref())
        .origin("string")
        .format(format)
}

/// Unicode normalization form for `normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeForm {
    #[default]
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl NormalizeForm {
    pub fn apply(self, s: &str) -> String {
        match self {
            NormalizeForm::Nfc => s.nfc().collect(),
            NormalizeForm::Nfd => s.nfd().collect(),
            NormalizeForm::Nfkc => s.nfkc().collect(),
            NormalizeForm::Nfkd => s.nfkd().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Affix {
    Prefix,
    Suffix,
}

/// `starts_with` / `ends_with`.
#[derive(Debug, Clone)]
pub struct StringAffix {
    def: CheckDef,
    affix: String,
    kind: Affix,
}

/// Substring check, optionally starting at a character position.
#[derive(Debug, Clone)]
pub struct Includes {
    def: CheckDef,
    needle: String,
    position: Option<usize>,
}

/// `lowercase` / `uppercase`: no character of the other case.
#[derive(Debug, Clone)]
pub struct CaseCheck {
    def: CheckDef,
    upper: bool,
}

#[derive(Debug, Clone)]
pub struct FormatCheck {
    def: CheckDef,
    format: StringFormat,
}

check_builders!(StringAffix);
check_builders!(Includes);
check_builders!(CaseCheck);
check_builders!(FormatCheck);

pub fn starts_with(prefix: impl Into<String>) -> StringAffix {
    StringAffix {
        def: CheckDef::new("starts_with"),
        affix: prefix.into(),
        kind: Affix::Prefix,
    }
}

pub fn ends_with(suffix: impl Into<String>) -> StringAffix {
    StringAffix {
        def: CheckDef::new("ends_with"),
        affix: suffix.into(),
        kind: Affix::Suffix,
    }
}

pub fn includes(needle: impl Into<String>) -> Includes {
    Includes {
        def: CheckDef::new("includes"),
        needle: needle.into(),
        position: None,
    }
}

impl Includes {
    /// Only search from the given character position onwards.
    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

pub fn lowercase() -> CaseCheck {
    CaseCheck {
        def: CheckDef::new("lowercase"),
        upper: false,
    }
}

pub fn uppercase() -> CaseCheck {
    CaseCheck {
        def: CheckDef::new("uppercase"),
        upper: true,
    }
}

pub fn format(format: StringFormat) -> FormatCheck {
    FormatCheck {
        def: CheckDef::new("string_format"),
        format,
    }
}

impl FormatCheck {
    pub fn string_format(&self) -> &StringFormat {
        &self.format
    }
}

impl Check<String> for StringAffix {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<String>, ctx: &ParseContext) {
        let (ok, name) = match self.kind {
            Affix::Prefix => (payload.value.starts_with(&self.affix), "starts_with"),
            Affix::Suffix => (payload.value.ends_with(&self.affix), "ends_with"),
        };
        if !ok {
            let issue = format_issue(name, &payload.value, ctx).pattern(self.affix.clone());
            payload.issues.push(issue);
        }
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.formats.push(self.def.name.to_string());
    }
}

impl Check<String> for Includes {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<String>, ctx: &ParseContext) {
        let haystack = match self.position {
            Some(pos) => match payload.value.char_indices().nth(pos) {
                Some((byte, _)) => &payload.value[byte..],
                None => "",
            },
            None => payload.value.as_str(),
        };
        if !haystack.contains(&self.needle) {
            let issue = format_issue("includes", &payload.value, ctx).pattern(self.needle.clone());
            payload.issues.push(issue);
        }
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.formats.push("includes".to_string());
    }
}

impl Check<String> for CaseCheck {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<String>, ctx: &ParseContext) {
        let ok = if self.upper {
            !payload.value.chars().any(char::is_lowercase)
        } else {
            !payload.value.chars().any(char::is_uppercase)
        };
        if !ok {
            let issue = format_issue(self.def.name, &payload.value, ctx);
            payload.issues.push(issue);
        }
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.formats.push(self.def.name.to_string());
    }
}

impl Check<String> for FormatCheck {
    fn def(&self) -> &CheckDef {
        &self.def
    }

    fn run(&self, payload: &mut ParsePayload<String>, ctx: &ParseContext) {
        if !self.format.validate(&payload.value) {
            let issue = format_issue(self.format.name(), &payload.value, ctx);
            payload.issues.push(issue);
        }
    }

    fn on_attach(&self, bag: &mut CheckBag) {
        bag.formats.push(self.format.name().to_string());
    }
}

#[cfg(feature = "regex")]
pub use self::pattern::{regex, RegexCheck};

#[cfg(feature = "regex")]
mod pattern {
    use super::*;

    /// Full-string regex match.
    #[derive(Debug, Clone)]
    pub struct RegexCheck {
        def: CheckDef,
        regex: regex_lite::Regex,
    }

    check_builders!(RegexCheck);

    /// Build a regex check from a compiled pattern.
    pub fn regex(regex: regex_lite::Regex) -> RegexCheck {
        RegexCheck {
            def: CheckDef::new("string_format"),
            regex,
        }
    }

    impl Check<String> for RegexCheck {
        fn def(&self) -> &CheckDef {
            &self.def
        }

        fn run(&self, payload: &mut ParsePayload<String>, ctx: &ParseContext) {
            if !self.regex.is_match(&payload.value) {
                let issue =
                    format_issue("regex", &payload.value, ctx).pattern(self.regex.as_str());
                payload.issues.push(issue);
            }
        }

        fn on_attach(&self, bag: &mut CheckBag) {
            bag.patterns.push(self.regex.as_str().to_string());
        }
    }
}
