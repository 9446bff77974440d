use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{py_value::PyValue, source::MemberSource};

/// The foundational classes every extractor ultimately derives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootBase {
    Info,
    Search,
    SelfHosted,
}
impl RootBase {
    pub const ALL: [Self; 3] = [Self::Info, Self::Search, Self::SelfHosted];

    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Info => "InfoExtractor",
            Self::Search => "SearchInfoExtractor",
            Self::SelfHosted => "SelfHostedInfoExtractor",
        }
    }

    /// Name of the boilerplate class that stands in for this root in the
    /// generated module.
    #[must_use]
    pub const fn stand_in_name(self) -> &'static str {
        match self {
            Self::Info => "LazyLoadExtractor",
            Self::Search => "LazyLoadSearchExtractor",
            Self::SelfHosted => "LazyLoadSelfHostedExtractor",
        }
    }

    #[must_use]
    pub fn from_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.class_name() == name)
    }

    /// Whether `name` is taken by a root or by one of the boilerplate stand-ins.
    #[must_use]
    pub fn is_reserved(name: &str) -> bool {
        Self::ALL
            .into_iter()
            .any(|x| x.class_name() == name || x.stand_in_name() == name)
    }
}
impl fmt::Display for RootBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BaseRef {
    Root(RootBase),
    Class(String),
}
impl BaseRef {
    #[must_use]
    pub fn class<T: Into<String>>(name: T) -> Self {
        Self::Class(name.into())
    }

    /// Name to use in the generated `class X(...)` header.
    #[must_use]
    pub fn stand_in_name(&self) -> &str {
        match self {
            Self::Root(root) => root.stand_in_name(),
            Self::Class(name) => name,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&str> {
        match self {
            Self::Root(_) => None,
            Self::Class(name) => Some(name),
        }
    }
}
impl From<String> for BaseRef {
    fn from(value: String) -> Self {
        RootBase::from_class_name(&value).map_or(Self::Class(value), Self::Root)
    }
}
impl From<&str> for BaseRef {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}
impl From<RootBase> for BaseRef {
    fn from(value: RootBase) -> Self {
        Self::Root(value)
    }
}
impl From<BaseRef> for String {
    fn from(value: BaseRef) -> Self {
        match value {
            BaseRef::Root(root) => root.class_name().to_string(),
            BaseRef::Class(name) => name,
        }
    }
}

/// Class attributes of self-hosted extractors, in the order they are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SelfHostedField {
    #[serde(rename = "_IMPOSSIBLE_HOSTNAMES")]
    ImpossibleHostnames,
    #[serde(rename = "_PREFIX_GROUPS")]
    PrefixGroups,
    #[serde(rename = "_HOSTNAME_GROUPS")]
    HostnameGroups,
    #[serde(rename = "_INSTANCE_LIST")]
    InstanceList,
    #[serde(rename = "_DYNAMIC_INSTANCE_LIST")]
    DynamicInstanceList,
    #[serde(rename = "_NODEINFO_SOFTWARE")]
    NodeinfoSoftware,
    #[serde(rename = "_SOFTWARE_NAME")]
    SoftwareName,
}
impl SelfHostedField {
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::ImpossibleHostnames => "_IMPOSSIBLE_HOSTNAMES",
            Self::PrefixGroups => "_PREFIX_GROUPS",
            Self::HostnameGroups => "_HOSTNAME_GROUPS",
            Self::InstanceList => "_INSTANCE_LIST",
            Self::DynamicInstanceList => "_DYNAMIC_INSTANCE_LIST",
            Self::NodeinfoSoftware => "_NODEINFO_SOFTWARE",
            Self::SoftwareName => "_SOFTWARE_NAME",
        }
    }
}

pub type SelfHostedFields = BTreeMap<SelfHostedField, PyValue>;

/// Everything the generator needs to know about one extractor class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorClass {
    pub name: String,
    pub bases: Vec<BaseRef>,
    #[serde(default)]
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_url: Option<String>,
    /// Search extractors derive their pattern from this key when no
    /// explicit `valid_url` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_key: Option<String>,
    #[serde(default = "default_true")]
    pub working: bool,
    #[serde(default, rename = "suitable", skip_serializing_if = "Option::is_none")]
    pub suitable_override: Option<MemberSource>,
    #[serde(default, rename = "self_hosted", skip_serializing_if = "BTreeMap::is_empty")]
    pub self_hosted_fields: SelfHostedFields,
    /// Helper base classes are emitted but not listed in `_ALL_CLASSES`.
    #[serde(default = "default_true")]
    pub concrete: bool,
    /// Scheduled after every other class, e.g. the catch-all extractor.
    #[serde(default)]
    pub generate_last: bool,
    /// Listing text; without one the class is left out of listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
impl ExtractorClass {
    #[must_use]
    pub fn new<N, M>(name: N, module: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            bases: vec![BaseRef::Root(RootBase::Info)],
            module: module.into(),
            valid_url: None,
            search_key: None,
            working: true,
            suitable_override: None,
            self_hosted_fields: SelfHostedFields::new(),
            concrete: true,
            generate_last: false,
            description: None,
        }
    }

    #[must_use]
    pub fn with_bases<I, B>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<BaseRef>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_valid_url<T: Into<String>>(mut self, valid_url: T) -> Self {
        self.valid_url = Some(valid_url.into());
        self
    }

    #[must_use]
    pub fn with_search_key<T: Into<String>>(mut self, key: T) -> Self {
        self.search_key = Some(key.into());
        self
    }

    #[must_use]
    pub const fn not_working(mut self) -> Self {
        self.working = false;
        self
    }

    #[must_use]
    pub fn with_suitable<T: Into<MemberSource>>(mut self, source: T) -> Self {
        self.suitable_override = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_self_hosted_field<V: Into<PyValue>>(
        mut self,
        field: SelfHostedField,
        value: V,
    ) -> Self {
        self.self_hosted_fields.insert(field, value.into());
        self
    }

    #[must_use]
    pub const fn helper(mut self) -> Self {
        self.concrete = false;
        self
    }

    #[must_use]
    pub const fn last(mut self) -> Self {
        self.generate_last = true;
        self
    }

    /// The URL pattern a stand-in carries: the declared one, or the one
    /// derived from the search key.
    #[must_use]
    pub fn effective_valid_url(&self) -> Option<String> {
        if let Some(valid_url) = self.valid_url.as_ref().filter(|x| !x.is_empty()) {
            return Some(valid_url.clone());
        }

        self.search_key
            .as_ref()
            .map(|key| format!(r"{key}(?P<prefix>|[1-9][0-9]*|all):(?P<query>[\s\S]+)"))
    }

    #[must_use]
    pub const fn overrides_suitable(&self) -> bool {
        self.suitable_override.is_some()
    }

    /// Bases that are other extractor classes rather than roots.
    pub fn class_bases(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().filter_map(BaseRef::as_class)
    }

    #[must_use]
    pub fn has_root(&self, root: RootBase) -> bool {
        self.bases.contains(&BaseRef::Root(root))
    }
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_names_parse_into_root_bases() {
        assert_eq!(
            BaseRef::from("SearchInfoExtractor"),
            BaseRef::Root(RootBase::Search)
        );
        assert_eq!(
            BaseRef::from("YoutubeBaseInfoExtractor"),
            BaseRef::class("YoutubeBaseInfoExtractor")
        );
        assert_eq!(
            BaseRef::Root(RootBase::SelfHosted).stand_in_name(),
            "LazyLoadSelfHostedExtractor"
        );
    }

    #[test]
    fn search_key_derives_pattern() {
        let cls = ExtractorClass::new("YoutubeSearchIE", "yt_dlp.extractor.youtube")
            .with_bases([RootBase::Search])
            .with_search_key("ytsearch");

        assert_eq!(
            cls.effective_valid_url().as_deref(),
            Some(r"ytsearch(?P<prefix>|[1-9][0-9]*|all):(?P<query>[\s\S]+)")
        );
    }

    #[test]
    fn explicit_pattern_wins_over_search_key() {
        let cls = ExtractorClass::new("FooSearchIE", "m")
            .with_search_key("foo")
            .with_valid_url("^foo:");

        assert_eq!(cls.effective_valid_url().as_deref(), Some("^foo:"));
    }

    #[test]
    fn reserved_names() {
        assert!(RootBase::is_reserved("InfoExtractor"));
        assert!(RootBase::is_reserved("LazyLoadSearchExtractor"));
        assert!(!RootBase::is_reserved("GenericIE"));
    }
}
