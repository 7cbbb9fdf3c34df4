use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

/// Source of UTF-8 text resources addressed by relative file name.
pub trait ResourceLoader: Send + Sync {
    fn load(&self, name: &str) -> Option<String>;

    fn load_or_default(&self, name: &str) -> String {
        self.load(name)
            .unwrap_or_else(|| format!("Content not available for: {name}"))
    }
}

/// Texts compiled into the binary, used when the resource directory lacks a file.
fn bundled(name: &str) -> Option<&'static str> {
    match name {
        "prayers_english.txt" => Some(include_str!("../../resources/prayers_english.txt")),
        "prayers_tagalog.txt" => Some(include_str!("../../resources/prayers_tagalog.txt")),
        "prayers_latin.txt" => Some(include_str!("../../resources/prayers_latin.txt")),
        "rosary_english.txt" => Some(include_str!("../../resources/rosary_english.txt")),
        "psalms_english.txt" => Some(include_str!("../../resources/psalms_english.txt")),
        _ => None,
    }
}

/// Reads resources from a directory on disk, falling back to bundled texts.
pub struct FsResourceLoader {
    root: PathBuf,
}

impl FsResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLoader for FsResourceLoader {
    fn load(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        if path.is_file() {
            match fs::read_to_string(&path) {
                Ok(contents) => return Some(contents),
                Err(err) => warn!("Error loading resource file {}: {err}", path.display()),
            }
        }

        let fallback = bundled(name).map(str::to_owned);
        if fallback.is_some() {
            debug!("Using bundled content for {name}");
        }
        fallback
    }
}

/// Fixed in-memory resources, handy for embedding and tests.
#[derive(Default)]
pub struct MemoryResourceLoader {
    files: HashMap<String, String>,
}

impl MemoryResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_string(), contents.to_string());
        self
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn load(&self, name: &str) -> Option<String> {
        self.files.get(name).cloned()
    }
}

/// Splits `===`-delimited resource text into `(key, text)` pairs. The first
/// line of each section is the key, the remainder is the text.
pub fn parse_sections(content: &str) -> Vec<(String, String)> {
    content
        .split("===")
        .map(str::trim)
        .filter(|section| !section.is_empty())
        .map(|section| match section.split_once('\n') {
            Some((key, text)) => (key.trim().to_string(), text.trim().to_string()),
            None => (section.to_string(), String::new()),
        })
        .collect()
}
