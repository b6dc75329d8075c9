//! Locale selection shared by every menu in a registry.
//!
//! Text resolution is two-level: the current locale, then the default locale.
//! Anything past that is a lookup miss. Which locale is the default is decided
//! by the [`LocaleContext`] alone; nodes store their default text unkeyed.
use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "english";

/// Text shown for a node that has no entry in either locale.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    current: String,
    default: String,
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl LocaleContext {
    /// Starts with the current locale equal to `default`.
    pub fn new(default: impl Into<String>) -> Self {
        let default = default.into();
        Self {
            current: default.clone(),
            default,
        }
    }

    pub fn with_current(mut self, current: impl Into<String>) -> Self {
        self.current = current.into();
        self
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn default_locale(&self) -> &str {
        &self.default
    }

    pub fn is_default(&self) -> bool {
        self.current == self.default
    }

    /// Only the registry broadcast path changes the locale of live menus.
    pub(crate) fn set_current(&mut self, locale: impl Into<String>) {
        self.current = locale.into();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText {
    by_locale: HashMap<String, String>,
    default_text: Option<String>,
}

impl LocalizedText {
    pub fn set(&mut self, locale: impl Into<String>, text: impl Into<String>) {
        self.by_locale.insert(locale.into(), text.into());
    }

    /// Text for whichever locale the context treats as default.
    pub fn set_default(&mut self, text: impl Into<String>) {
        self.default_text = Some(text.into());
    }

    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.by_locale.get(locale).map(String::as_str)
    }

    /// Current locale, then the default locale. Text stored under the default
    /// locale's name wins over the unkeyed default text.
    pub fn resolve(&self, locale: &LocaleContext) -> Option<&str> {
        self.get(locale.current()).or_else(|| {
            if locale.is_default() {
                self.default_text()
            } else {
                self.get(locale.default_locale())
                    .or_else(|| self.default_text())
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.by_locale.is_empty() && self.default_text.is_none()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.by_locale.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_current_locale() {
        let mut text = LocalizedText::default();
        text.set(DEFAULT_LOCALE, "Close menu");
        text.set("lithuanian", "uzdaryti");

        let locale = LocaleContext::default().with_current("lithuanian");
        assert_eq!(text.resolve(&locale), Some("uzdaryti"));
    }

    #[test]
    fn resolve_falls_back_to_default_once() {
        let mut text = LocalizedText::default();
        text.set(DEFAULT_LOCALE, "A");

        let locale = LocaleContext::default().with_current("lithuanian");
        assert_eq!(text.resolve(&locale), Some("A"));
    }

    #[test]
    fn resolve_misses_when_neither_locale_has_text() {
        let mut text = LocalizedText::default();
        text.set("german", "Schliessen");

        assert_eq!(text.resolve(&LocaleContext::default()), None);
        assert_eq!(
            text.resolve(&LocaleContext::default().with_current("lithuanian")),
            None
        );
    }

    #[test]
    fn default_text_follows_the_context_default() {
        let mut text = LocalizedText::default();
        text.set_default("Start");
        text.set("lithuanian", "Pradeti");

        assert_eq!(text.resolve(&LocaleContext::new("german")), Some("Start"));
        assert_eq!(
            text.resolve(&LocaleContext::new("german").with_current("french")),
            Some("Start")
        );
        assert_eq!(
            text.resolve(&LocaleContext::new("german").with_current("lithuanian")),
            Some("Pradeti")
        );
    }

    #[test]
    fn keyed_default_locale_text_wins_over_default_text() {
        let mut text = LocalizedText::default();
        text.set_default("Start");
        text.set(DEFAULT_LOCALE, "Begin");

        assert_eq!(text.resolve(&LocaleContext::default()), Some("Begin"));
        assert_eq!(
            text.resolve(&LocaleContext::default().with_current("lithuanian")),
            Some("Begin")
        );
    }

    #[test]
    fn setting_a_locale_twice_overwrites() {
        let mut text = LocalizedText::default();
        text.set(DEFAULT_LOCALE, "Old");
        text.set(DEFAULT_LOCALE, "New");

        assert_eq!(text.get(DEFAULT_LOCALE), Some("New"));
        assert_eq!(text.locales().count(), 1);
    }
}
