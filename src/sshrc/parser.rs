// ABOUTME: Record parser turning whitespace-split sshrc lines into typed attribute maps
// ABOUTME: Unknown keywords and dangling keywords degrade to warnings, parsing never fails

use crate::error::Warning;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    Machine,
    Profile,
    Nick,
    Login,
    Password,
    Keyfile,
    Port,
    /// Swallows the rest of the line as one space-joined value.
    Args,
}

impl Keyword {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "machine" => Some(Keyword::Machine),
            "profile" => Some(Keyword::Profile),
            "nick" => Some(Keyword::Nick),
            "login" => Some(Keyword::Login),
            "password" => Some(Keyword::Password),
            "keyfile" => Some(Keyword::Keyfile),
            "port" => Some(Keyword::Port),
            "args" => Some(Keyword::Args),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Machine => "machine",
            Keyword::Profile => "profile",
            Keyword::Nick => "nick",
            Keyword::Login => "login",
            Keyword::Password => "password",
            Keyword::Keyfile => "keyfile",
            Keyword::Port => "port",
            Keyword::Args => "args",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const MACHINE_KEYWORDS: &[Keyword] = &[
    Keyword::Machine,
    Keyword::Profile,
    Keyword::Nick,
    Keyword::Login,
    Keyword::Password,
    Keyword::Keyfile,
    Keyword::Port,
];

pub const PROFILE_KEYWORDS: &[Keyword] = &[
    Keyword::Profile,
    Keyword::Login,
    Keyword::Password,
    Keyword::Keyfile,
    Keyword::Port,
];

/// Keyword to value mapping for one record or one resolved session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<Keyword, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, keyword: Keyword) -> Option<&str> {
        self.0.get(&keyword).map(String::as_str)
    }

    /// Like `get`, but treats an empty value as absent.
    pub fn non_empty(&self, keyword: Keyword) -> Option<&str> {
        self.get(keyword).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, keyword: Keyword, value: impl Into<String>) -> Option<String> {
        self.0.insert(keyword, value.into())
    }

    /// Insert only if the keyword is not already set. Returns true if inserted.
    pub fn insert_if_absent(&mut self, keyword: Keyword, value: &str) -> bool {
        if self.0.contains_key(&keyword) {
            return false;
        }
        self.0.insert(keyword, value.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Keyword, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print passwords, these end up in debug logs
        let mut map = f.debug_map();
        for (keyword, value) in self.iter() {
            if keyword == Keyword::Password {
                map.entry(&keyword.as_str(), &"<redacted>");
            } else {
                map.entry(&keyword.as_str(), &value);
            }
        }
        map.finish()
    }
}

impl<const N: usize> From<[(Keyword, &str); N]> for Attributes {
    fn from(pairs: [(Keyword, &str); N]) -> Self {
        let mut attrs = Attributes::new();
        for (keyword, value) in pairs {
            attrs.insert(keyword, value);
        }
        attrs
    }
}

/// Parse keyword/value pairs from `fields`, accepting only `recognized`
/// keywords plus the `args` sentinel. `line` is used for diagnostics.
pub fn parse_fields(
    fields: &[&str],
    recognized: &[Keyword],
    line: usize,
    warnings: &mut Vec<Warning>,
) -> Attributes {
    let mut attrs = Attributes::new();
    let mut i = 0;

    while i < fields.len() {
        let token = fields[i];

        match Keyword::from_token(token) {
            Some(Keyword::Args) => {
                attrs.insert(Keyword::Args, fields[i + 1..].join(" "));
                break;
            }
            Some(keyword) if recognized.contains(&keyword) => match fields.get(i + 1) {
                Some(value) => {
                    attrs.insert(keyword, *value);
                    i += 2;
                }
                None => {
                    push_warning(
                        warnings,
                        Warning::MissingValue { keyword: token.to_string(), line },
                    );
                    i += 1;
                }
            },
            _ => {
                // Skip only the bad token, the next one is a fresh keyword candidate
                push_warning(
                    warnings,
                    Warning::UnrecognizedKeyword { keyword: token.to_string(), line },
                );
                i += 1;
            }
        }
    }

    attrs
}

pub(crate) fn push_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    warning.emit();
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str, recognized: &[Keyword]) -> (Attributes, Vec<Warning>) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let mut warnings = Vec::new();
        let attrs = parse_fields(&fields, recognized, 1, &mut warnings);
        (attrs, warnings)
    }

    #[test]
    fn test_parse_keyword_pairs() {
        let (attrs, warnings) = parse("login alice keyfile /k port 2222", MACHINE_KEYWORDS);

        assert!(warnings.is_empty());
        assert_eq!(attrs.get(Keyword::Login), Some("alice"));
        assert_eq!(attrs.get(Keyword::Keyfile), Some("/k"));
        assert_eq!(attrs.get(Keyword::Port), Some("2222"));
        assert_eq!(attrs.iter().count(), 3);
    }

    #[test]
    fn test_args_consumes_rest_of_line() {
        let (attrs, warnings) = parse(
            "login alice args -o   StrictHostKeyChecking=no login bob bogus",
            MACHINE_KEYWORDS,
        );

        assert!(warnings.is_empty());
        assert_eq!(
            attrs.get(Keyword::Args),
            Some("-o StrictHostKeyChecking=no login bob bogus")
        );
        // Keywords after args are part of its value, not parsed
        assert_eq!(attrs.get(Keyword::Login), Some("alice"));
    }

    #[test]
    fn test_args_last_token_is_empty_value() {
        let (attrs, warnings) = parse("login alice args", MACHINE_KEYWORDS);

        assert!(warnings.is_empty());
        assert_eq!(attrs.get(Keyword::Args), Some(""));
    }

    #[test]
    fn test_unrecognized_keyword_does_not_consume_value() {
        let (attrs, warnings) = parse("user login alice", MACHINE_KEYWORDS);

        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0],
            Warning::UnrecognizedKeyword { keyword: "user".to_string(), line: 1 }
        );
        assert_eq!(attrs.get(Keyword::Login), Some("alice"));
    }

    #[test]
    fn test_one_warning_per_unrecognized_token() {
        let (attrs, warnings) = parse("foo bar login alice baz", MACHINE_KEYWORDS);

        assert_eq!(warnings.len(), 3);
        assert_eq!(attrs.iter().count(), 1);
    }

    #[test]
    fn test_keyword_outside_recognized_set_is_unrecognized() {
        // Profiles never carry nick or machine
        let (attrs, warnings) = parse("nick db login root", PROFILE_KEYWORDS);

        assert_eq!(warnings.len(), 2);
        assert_eq!(attrs.get(Keyword::Nick), None);
        assert_eq!(attrs.get(Keyword::Login), Some("root"));
    }

    #[test]
    fn test_dangling_keyword_warns() {
        let (attrs, warnings) = parse("login alice port", MACHINE_KEYWORDS);

        assert_eq!(
            warnings,
            vec![Warning::MissingValue { keyword: "port".to_string(), line: 1 }]
        );
        assert_eq!(attrs.get(Keyword::Port), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let attrs = Attributes::from([(Keyword::Machine, "db1"), (Keyword::Password, "secret")]);
        let rendered = format!("{attrs:?}");

        assert!(rendered.contains("db1"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut attrs = Attributes::from([(Keyword::Login, "alice")]);

        assert!(!attrs.insert_if_absent(Keyword::Login, "root"));
        assert!(attrs.insert_if_absent(Keyword::Port, "22"));
        assert_eq!(attrs.get(Keyword::Login), Some("alice"));
        assert_eq!(attrs.get(Keyword::Port), Some("22"));
    }
}
