//! Category whitelist. Scraped tags are noisy (hundreds of values), so the
//! search filters only offer the curated Steam categories below.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::traits::CatalogStore;

pub const DEFAULT_WHITELIST: &[&str] = &[
    "Action", "Aventure", "RPG", "Stratégie", "Simulation",
    "Sport", "Course", "Casse-tête", "Combat", "Plateforme",
    "FPS", "Tir", "Moba", "Battle Royale", "Metroidvania",
    "Roguelike", "Roguelite", "Hack 'n' Slash", "Point & Click",
    "Horreur", "Horreur psychologique", "Survie", "Infiltration",
    "Rythme", "Visual Novel", "Beat Them All", "Tower Defense",
    "Science-fiction", "Cyberpunk", "Fantasy", "Médiéval",
    "Postapocalyptique", "Espace", "Zombies", "Guerre",
    "Historique", "Western", "Monde ouvert", "Bac à sable",
    "Multijoueur", "Coop", "Coop en ligne", "MMORPG",
    "JcJ", "JcE", "2D", "3D", "Pixel Art", "Rétro", "Anime", "VR",
    "Gestion", "Construction", "Tour par tour", "Stratégie en temps réel",
    "Jeu de cartes", "Construction de decks", "Physique",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWhitelist {
    names: BTreeSet<String>,
}

impl Default for TagWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_WHITELIST.iter().copied())
    }
}

impl TagWhitelist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.names.contains(tag.trim())
    }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn sorted(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    /// Reject a tag outside the whitelist.
    pub fn check(&self, tag: &str) -> Result<()> {
        if self.contains(tag) { Ok(()) } else { Err(Error::UnknownTag(tag.to_string())) }
    }

    /// Whitelisted names present in `raw`, sorted. Falls back to the whole
    /// whitelist when none of them occur.
    pub fn intersect<'a, I>(&self, raw: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: BTreeSet<String> = raw
            .into_iter()
            .map(str::trim)
            .filter(|t| self.names.contains(*t))
            .map(str::to_string)
            .collect();
        if present.is_empty() { self.sorted() } else { present.into_iter().collect() }
    }
}

/// Categories to offer in the search filters: the whitelisted tags that
/// actually occur in the catalog, or the whole whitelist if the store is
/// unreachable or nothing matches.
pub fn available_tags(store: &dyn CatalogStore, whitelist: &TagWhitelist) -> Vec<String> {
    match store.distinct_tags() {
        Ok(raw) => whitelist.intersect(raw.iter().map(String::as_str)),
        Err(_) => whitelist.sorted(),
    }
}
