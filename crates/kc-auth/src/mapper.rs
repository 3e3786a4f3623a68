//! Authority mapping hook.
//!
//! Mappers turn the extracted role set into the authorities an application
//! checks. Without a mapper, roles are used verbatim.

use std::collections::BTreeSet;

use crate::principal::{Authority, Role};

/// Translates roles into authorities.
///
/// The caller takes the output as-is: a mapper may rename, filter or add.
pub trait AuthoritiesMapper: Send + Sync {
    /// Maps the role set to authorities.
    fn map_authorities(&self, roles: &BTreeSet<Role>) -> Vec<Authority>;
}

impl<F> AuthoritiesMapper for F
where
    F: Fn(&BTreeSet<Role>) -> Vec<Authority> + Send + Sync,
{
    fn map_authorities(&self, roles: &BTreeSet<Role>) -> Vec<Authority> {
        self(roles)
    }
}

/// Case conversion applied by [`SimpleAuthorityMapper`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseConversion {
    /// Keep role names as they are.
    #[default]
    None,
    /// Convert to upper case.
    Upper,
    /// Convert to lower case.
    Lower,
}

/// Prefixes roles (`ROLE_` by default) and optionally converts case.
#[derive(Debug, Clone)]
pub struct SimpleAuthorityMapper {
    prefix: String,
    case: CaseConversion,
    default_authority: Option<Authority>,
}

impl Default for SimpleAuthorityMapper {
    fn default() -> Self {
        Self {
            prefix: "ROLE_".to_string(),
            case: CaseConversion::None,
            default_authority: None,
        }
    }
}

impl SimpleAuthorityMapper {
    /// Creates a mapper with the `ROLE_` prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix. An empty prefix disables prefixing.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the case conversion.
    #[must_use]
    pub const fn with_case(mut self, case: CaseConversion) -> Self {
        self.case = case;
        self
    }

    /// Adds an authority granted to every principal.
    #[must_use]
    pub fn with_default_authority(mut self, authority: impl Into<String>) -> Self {
        self.default_authority = Some(Authority::new(authority));
        self
    }

    fn map_role(&self, role: &Role) -> Authority {
        let name = match self.case {
            CaseConversion::None => role.as_str().to_string(),
            CaseConversion::Upper => role.as_str().to_uppercase(),
            CaseConversion::Lower => role.as_str().to_lowercase(),
        };
        if name.starts_with(&self.prefix) {
            Authority::new(name)
        } else {
            Authority::new(format!("{}{name}", self.prefix))
        }
    }
}

impl AuthoritiesMapper for SimpleAuthorityMapper {
    fn map_authorities(&self, roles: &BTreeSet<Role>) -> Vec<Authority> {
        let mut mapped: BTreeSet<Authority> = roles.iter().map(|r| self.map_role(r)).collect();
        if let Some(default) = &self.default_authority {
            mapped.insert(default.clone());
        }
        mapped.into_iter().collect()
    }
}
