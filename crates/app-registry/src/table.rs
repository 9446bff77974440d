use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    class::{ExtractorClass, RootBase, SelfHostedFields},
    error::RegistryError,
    source::MemberSource,
};

/// Shared `InfoExtractor` members copied into the generated base stand-in so
/// that stand-ins can match URLs without importing the real classes.
pub const INFO_MEMBERS: &[&str] = &[
    "ie_key",
    "working",
    "_match_valid_url",
    "suitable",
    "_match_id",
    "get_temp_id",
];

/// Shared `SelfHostedInfoExtractor` members copied into the self-hosted stand-in.
pub const SELF_HOSTED_MEMBERS: &[&str] = &[
    "suitable",
    "_test_selfhosted_instance",
    "_is_probe_enabled",
    "_probe_selfhosted_service",
    "_probe_webpage",
    "_fetch_nodeinfo_software",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedMember {
    pub name: String,
    pub source: MemberSource,
}
impl NamedMember {
    #[must_use]
    pub fn new<N, S>(name: N, source: S) -> Self
    where
        N: Into<String>,
        S: Into<MemberSource>,
    {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelfHostedRoot {
    #[serde(default)]
    pub members: Vec<NamedMember>,
    #[serde(default)]
    pub fields: SelfHostedFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootMembers {
    #[serde(default)]
    pub info: Vec<NamedMember>,
    #[serde(default)]
    pub self_hosted: SelfHostedRoot,
}
impl RootMembers {
    /// `InfoExtractor` members in allowlist order.
    pub fn info_members(&self) -> impl Iterator<Item = &NamedMember> {
        ordered_members(&self.info, INFO_MEMBERS)
    }

    /// `SelfHostedInfoExtractor` members in allowlist order.
    pub fn self_hosted_members(&self) -> impl Iterator<Item = &NamedMember> {
        ordered_members(&self.self_hosted.members, SELF_HOSTED_MEMBERS)
    }

    /// Allowlisted members that were not declared.
    #[must_use]
    pub fn missing(&self) -> Vec<(RootBase, &'static str)> {
        let info = INFO_MEMBERS
            .iter()
            .filter(|x| !self.info.iter().any(|m| m.name == **x))
            .map(|x| (RootBase::Info, *x));
        let self_hosted = SELF_HOSTED_MEMBERS
            .iter()
            .filter(|x| !self.self_hosted.members.iter().any(|m| m.name == **x))
            .map(|x| (RootBase::SelfHosted, *x));

        info.chain(self_hosted).collect()
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let groups = [
            (RootBase::Info, &self.info, INFO_MEMBERS),
            (
                RootBase::SelfHosted,
                &self.self_hosted.members,
                SELF_HOSTED_MEMBERS,
            ),
        ];

        for (root, members, allowed) in groups {
            if let Some(m) = members.iter().find(|m| !allowed.contains(&m.name.as_str())) {
                return Err(RegistryError::UnlistedRootMember {
                    root,
                    member: m.name.clone(),
                });
            }
        }

        Ok(())
    }
}

fn ordered_members<'a>(
    members: &'a [NamedMember],
    allowlist: &'static [&'static str],
) -> impl Iterator<Item = &'a NamedMember> {
    allowlist
        .iter()
        .filter_map(move |name| members.iter().find(|m| m.name == *name))
}

/// The extractor class hierarchy as plain data, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    roots: RootMembers,
    classes: Vec<ExtractorClass>,
    index: HashMap<String, usize>,
}
impl ClassTable {
    #[must_use]
    pub fn builder() -> ClassTableBuilder {
        ClassTableBuilder::default()
    }

    #[must_use]
    pub const fn roots(&self) -> &RootMembers {
        &self.roots
    }

    #[must_use]
    pub fn classes(&self) -> &[ExtractorClass] {
        &self.classes
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExtractorClass> {
        self.index.get(name).map(|i| &self.classes[*i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes listed in the generated `_ALL_CLASSES`.
    pub fn concrete(&self) -> impl Iterator<Item = &ExtractorClass> {
        self.classes.iter().filter(|x| x.concrete)
    }

    /// Whether the class derives from the self-hosted root, directly or
    /// through any of its ancestors. Unknown ancestors count as not
    /// self-hosted.
    #[must_use]
    pub fn is_self_hosted(&self, class: &ExtractorClass) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![class];

        while let Some(c) = stack.pop() {
            if !seen.insert(c.name.as_str()) {
                continue;
            }

            if c.has_root(RootBase::SelfHosted) {
                return true;
            }

            stack.extend(c.class_bases().filter_map(|b| self.get(b)));
        }

        false
    }

    /// Rebuild the table with `classes` registered ahead of the existing ones.
    pub fn with_prepended<I>(self, classes: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = ExtractorClass>,
    {
        let mut builder = Self::builder().roots(self.roots);
        for c in classes.into_iter().chain(self.classes) {
            builder = builder.register(c);
        }

        builder.build()
    }
}

#[derive(Debug, Default)]
pub struct ClassTableBuilder {
    roots: RootMembers,
    classes: Vec<ExtractorClass>,
}
impl ClassTableBuilder {
    #[must_use]
    pub fn roots(mut self, roots: RootMembers) -> Self {
        self.roots = roots;
        self
    }

    #[must_use]
    pub fn register(mut self, class: ExtractorClass) -> Self {
        self.classes.push(class);
        self
    }

    #[must_use]
    pub fn register_all<I>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = ExtractorClass>,
    {
        self.classes.extend(classes);
        self
    }

    pub fn build(self) -> Result<ClassTable, RegistryError> {
        self.roots.validate()?;

        let mut index = HashMap::with_capacity(self.classes.len());
        for (i, c) in self.classes.iter().enumerate() {
            if RootBase::is_reserved(&c.name) {
                return Err(RegistryError::ReservedName(c.name.clone()));
            }
            if c.bases.is_empty() {
                return Err(RegistryError::MissingBases(c.name.clone()));
            }
            if c.module.trim().is_empty() {
                return Err(RegistryError::MissingModule(c.name.clone()));
            }
            if index.insert(c.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateClass(c.name.clone()));
            }
        }

        Ok(ClassTable {
            roots: self.roots,
            classes: self.classes,
            index,
        })
    }
}
