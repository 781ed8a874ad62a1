// i18n.rs — runtime UI strings
//
// - Catalogs: assets/i18n/<lang>.json (flat { "key": "value" }), searched next
//   to the executable first, then in the working directory
// - The English catalog is compiled in and answers any key the selected
//   language lacks
// - Lookup: tr("key") / tr_with("key", &[("name", value)]) with {name} placeholders
//
// Language selection: --lang <code>, then PANORAMA_LANG, then "en".

use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

const DEFAULT_LANG: &str = "en";
const EMBEDDED_EN: &str = include_str!("../assets/i18n/en.json");

pub const LANGUAGES: [(&str, &str); 2] = [("en", "English"), ("zh-Hans", "简体中文")];

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub lang: String,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Catalog {
    pub fn new(lang: impl Into<String>, strings: HashMap<String, String>) -> Self {
        Self {
            lang: lang.into(),
            strings,
            fallback: parse_catalog(EMBEDDED_EN).unwrap_or_default(),
        }
    }

    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn format(&self, key: &str, args: &[(&str, String)]) -> String {
        args.iter()
            .fold(self.lookup(key).to_string(), |s, (name, value)| {
                s.replace(&format!("{{{}}}", name), value)
            })
    }
}

static CATALOG: OnceCell<RwLock<Catalog>> = OnceCell::new();

fn parse_catalog(text: &str) -> Option<HashMap<String, String>> {
    serde_json::from_str(text)
        .map_err(|e| log::warn!("bad i18n catalog: {}", e))
        .ok()
}

fn catalog_path(lang: &str) -> Option<PathBuf> {
    let file = format!("{}.json", lang);
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    exe_dir
        .into_iter()
        .chain(std::iter::once(PathBuf::from(".")))
        .map(|dir| dir.join("assets").join("i18n").join(&file))
        .find(|p| p.exists())
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    let Some(path) = catalog_path(lang) else {
        if lang != DEFAULT_LANG {
            log::warn!("no i18n catalog for {}, falling back to English", lang);
        }
        return HashMap::new();
    };
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|text| parse_catalog(&text))
        .unwrap_or_default()
}

/// Install (or switch) the global catalog.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();
    let catalog = Catalog::new(lang.clone(), load_lang(&lang));

    match CATALOG.get() {
        Some(lock) => {
            if let Ok(mut w) = lock.write() {
                *w = catalog;
            }
        }
        None => {
            let _ = CATALOG.set(RwLock::new(catalog));
        }
    }
}

/// Localized text for `key`, or the key itself when unknown.
pub fn tr(key: &str) -> String {
    match CATALOG.get().and_then(|l| l.read().ok()) {
        Some(c) => c.lookup(key).to_string(),
        None => key.to_string(),
    }
}

pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    match CATALOG.get().and_then(|l| l.read().ok()) {
        Some(c) => c.format(key, args),
        None => key.to_string(),
    }
}

pub fn resolve_lang_from_args() -> String {
    let mut it = std::env::args();
    while let Some(a) = it.next() {
        if a == "--lang" {
            if let Some(v) = it.next() {
                return v;
            }
        }
    }

    std::env::var("PANORAMA_LANG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANG.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_english_then_key() {
        let mut strings = HashMap::new();
        strings.insert("menu.file".to_string(), "文件".to_string());
        let c = Catalog::new("zh-Hans", strings);
        assert_eq!(c.lookup("menu.file"), "文件");
        assert_eq!(c.lookup("menu.view"), "View");
        assert_eq!(c.lookup("no.such.key"), "no.such.key");
    }

    #[test]
    fn placeholders_are_substituted() {
        let c = Catalog::new("en", HashMap::new());
        assert_eq!(
            c.format("status.fov", &[("fov", "75.0".to_string())]),
            "FOV: 75.0°"
        );
    }
}
