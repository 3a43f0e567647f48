use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CascadeType {
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

impl CascadeType {
    pub const EVERY: [CascadeType; 5] = [
        CascadeType::Persist,
        CascadeType::Merge,
        CascadeType::Remove,
        CascadeType::Refresh,
        CascadeType::Detach,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeType::Persist => "PERSIST",
            CascadeType::Merge => "MERGE",
            CascadeType::Remove => "REMOVE",
            CascadeType::Refresh => "REFRESH",
            CascadeType::Detach => "DETACH",
        }
    }
}

/// Iterates in the fixed PERSIST, MERGE, REMOVE, REFRESH, DETACH order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CascadeSet(BTreeSet<CascadeType>);

impl CascadeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn every() -> Self {
        CascadeType::EVERY.into_iter().collect()
    }

    pub fn insert(&mut self, cascade: CascadeType) -> bool {
        self.0.insert(cascade)
    }

    pub fn remove(&mut self, cascade: CascadeType) -> bool {
        self.0.remove(&cascade)
    }

    pub fn contains(&self, cascade: CascadeType) -> bool {
        self.0.contains(&cascade)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CascadeType> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CascadeType> for CascadeSet {
    fn from_iter<I: IntoIterator<Item = CascadeType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchType {
    Lazy,
    Eager,
}

impl FetchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchType::Lazy => "LAZY",
            FetchType::Eager => "EAGER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MappingType {
    UnidirectionalJoinColumn,
    BidirectionalJoinColumn,
    UnidirectionalJoinTable,
    BidirectionalJoinTable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Set,
    #[default]
    List,
    Collection,
}

impl CollectionType {
    pub fn type_name(&self) -> &'static str {
        match self {
            CollectionType::Set => "Set",
            CollectionType::List => "List",
            CollectionType::Collection => "Collection",
        }
    }

    pub fn initializer(&self) -> &'static str {
        match self {
            CollectionType::Set => "LinkedHashSet<>()",
            CollectionType::List | CollectionType::Collection => "ArrayList<>()",
        }
    }

    pub fn imports(&self) -> [&'static str; 2] {
        match self {
            CollectionType::Set => ["java.util.Set", "java.util.LinkedHashSet"],
            CollectionType::List => ["java.util.List", "java.util.ArrayList"],
            CollectionType::Collection => ["java.util.Collection", "java.util.ArrayList"],
        }
    }
}

/// Per-side knobs. Not every kind reads every flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideOptions {
    pub cascades: CascadeSet,
    pub mandatory: bool,
    pub unique: bool,
    pub orphan_removal: bool,
    pub equals_hash_code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToOneConfig {
    pub mapping: MappingType,
    pub fetch: Option<FetchType>,
    pub collection: CollectionType,
    pub owning: SideOptions,
    pub inverse: SideOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToOneConfig {
    pub mapping: MappingType,
    pub owning: SideOptions,
    pub inverse: SideOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToManyConfig {
    pub mapping: MappingType,
    pub owning: SideOptions,
    pub inverse: SideOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RelationshipConfig {
    ManyToOne(ManyToOneConfig),
    OneToOne(OneToOneConfig),
    ManyToMany(ManyToManyConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    ManyToOne,
    OneToOne,
    ManyToMany,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipKind::ManyToOne => "many-to-one",
            RelationshipKind::OneToOne => "one-to-one",
            RelationshipKind::ManyToMany => "many-to-many",
        };
        f.write_str(name)
    }
}

impl RelationshipConfig {
    pub fn kind(&self) -> RelationshipKind {
        match self {
            RelationshipConfig::ManyToOne(_) => RelationshipKind::ManyToOne,
            RelationshipConfig::OneToOne(_) => RelationshipKind::OneToOne,
            RelationshipConfig::ManyToMany(_) => RelationshipKind::ManyToMany,
        }
    }

    pub fn mapping(&self) -> MappingType {
        match self {
            RelationshipConfig::ManyToOne(c) => c.mapping,
            RelationshipConfig::OneToOne(c) => c.mapping,
            RelationshipConfig::ManyToMany(c) => c.mapping,
        }
    }

    /// Whether the inverse file gets a mirrored field.
    pub fn touches_inverse(&self) -> bool {
        match self {
            RelationshipConfig::ManyToOne(c) => c.mapping == MappingType::BidirectionalJoinColumn,
            RelationshipConfig::OneToOne(c) => c.mapping != MappingType::UnidirectionalJoinColumn,
            RelationshipConfig::ManyToMany(c) => c.mapping != MappingType::UnidirectionalJoinColumn,
        }
    }
}
