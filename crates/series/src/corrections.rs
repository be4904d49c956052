//! Name corrections between data sources.

use crate::error::{SeriesError, SeriesResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps source spellings of an entity to one canonical spelling.
///
/// No canonical name is ever an alias, so correcting is idempotent:
/// `correct(correct(x)) == correct(x)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct NameCorrections {
    aliases: BTreeMap<String, String>,
}

impl NameCorrections {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spellings that differ between Eurostat exports and the Europe GeoJSON.
    #[must_use]
    pub fn eurostat() -> Self {
        let pairs = [
            ("Czech Republic", "Czechia"),
            ("Turkey", "Türkiye"),
            (
                "The former Yugoslav Republic of Macedonia",
                "North Macedonia",
            ),
            (
                "Germany (until 1990 former territory of the FRG)",
                "Germany",
            ),
            ("Kosovo*", "Kosovo"),
        ];
        Self {
            aliases: pairs
                .iter()
                .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
                .collect(),
        }
    }

    /// Short display labels for the long "Internet use: ..." activity headings.
    #[must_use]
    pub fn activity_labels() -> Self {
        let pairs = [
            ("Internet use: Internet banking", "Internet Banking"),
            (
                "Internet use: doing an online course (of any subject)",
                "Online Learning",
            ),
            ("Internet use: sending/receiving e-mails", "e-mail"),
            (
                "Internet use: participating in social networks (creating user profile, posting messages or other contributions to facebook, twitter, etc.)",
                "social media",
            ),
        ];
        Self {
            aliases: pairs
                .iter()
                .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
                .collect(),
        }
    }

    /// Build a table from pairs, rejecting any that would chain.
    pub fn from_pairs<I, A, C>(pairs: I) -> SeriesResult<Self>
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        let mut table = Self::new();
        for (alias, canonical) in pairs {
            table.insert(alias, canonical)?;
        }
        Ok(table)
    }

    /// Add one correction.
    ///
    /// An alias equal to its canonical name is ignored. Fails when the
    /// canonical name is already an alias, or the alias is already some
    /// entry's canonical name.
    pub fn insert(
        &mut self,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) -> SeriesResult<()> {
        let alias = alias.into().trim().to_string();
        let canonical = canonical.into().trim().to_string();
        if alias == canonical {
            return Ok(());
        }

        let chains = self.aliases.contains_key(&canonical)
            || self.aliases.values().any(|existing| existing == &alias);
        if chains {
            return Err(SeriesError::ChainedCorrection { alias, canonical });
        }

        self.aliases.insert(alias, canonical);
        Ok(())
    }

    /// Merge another table into this one.
    pub fn extend(&mut self, other: &NameCorrections) -> SeriesResult<()> {
        for (alias, canonical) in other.iter() {
            self.insert(alias, canonical)?;
        }
        Ok(())
    }

    /// The canonical spelling of `name`, or `name` itself.
    #[must_use]
    pub fn correct<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for NameCorrections {
    type Error = SeriesError;

    fn try_from(map: BTreeMap<String, String>) -> SeriesResult<Self> {
        Self::from_pairs(map)
    }
}

impl From<NameCorrections> for BTreeMap<String, String> {
    fn from(table: NameCorrections) -> Self {
        table.aliases
    }
}
