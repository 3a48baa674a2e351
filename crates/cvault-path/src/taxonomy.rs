//! Service and category taxonomy.
//!
//! The string token and integer value of every variant are part of the
//! stored path format. Renaming one without a data migration breaks every
//! backup written before the rename.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};

/// The cloud service that owns a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "UnknownService")]
    Unknown = 0,
    #[serde(rename = "exchange")]
    Exchange = 1,
    #[serde(rename = "onedrive")]
    OneDrive = 2,
    #[serde(rename = "sharepoint")]
    SharePoint = 3,
    #[serde(rename = "exchangeMetadata")]
    ExchangeMetadata = 4,
    #[serde(rename = "onedriveMetadata")]
    OneDriveMetadata = 5,
    #[serde(rename = "sharepointMetadata")]
    SharePointMetadata = 6,
    #[serde(rename = "groups")]
    Groups = 7,
    #[serde(rename = "groupsMetadata")]
    GroupsMetadata = 8,
}

/// The data partition within a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryType {
    #[serde(rename = "UnknownCategory")]
    Unknown = 0,
    #[serde(rename = "email")]
    Email = 1,
    #[serde(rename = "contacts")]
    Contacts = 2,
    #[serde(rename = "events")]
    Events = 3,
    #[serde(rename = "files")]
    Files = 4,
    #[serde(rename = "lists")]
    Lists = 5,
    #[serde(rename = "libraries")]
    Libraries = 6,
    #[serde(rename = "pages")]
    Pages = 7,
    #[serde(rename = "details")]
    Details = 8,
    #[serde(rename = "channelMessages")]
    ChannelMessages = 9,
}

use CategoryType as C;
use ServiceType as S;

const EXCHANGE_CATEGORIES: &[CategoryType] = &[C::Email, C::Contacts, C::Events];
const ONEDRIVE_CATEGORIES: &[CategoryType] = &[C::Files];
const SHAREPOINT_CATEGORIES: &[CategoryType] = &[C::Libraries, C::Lists, C::Pages];
const GROUPS_CATEGORIES: &[CategoryType] = &[C::Libraries, C::ChannelMessages];

const EXCHANGE_METADATA_CATEGORIES: &[CategoryType] =
    &[C::Email, C::Contacts, C::Events, C::Details];
const ONEDRIVE_METADATA_CATEGORIES: &[CategoryType] = &[C::Files, C::Details];
const SHAREPOINT_METADATA_CATEGORIES: &[CategoryType] =
    &[C::Libraries, C::Lists, C::Pages, C::Details];
const GROUPS_METADATA_CATEGORIES: &[CategoryType] =
    &[C::Libraries, C::ChannelMessages, C::Details];

impl ServiceType {
    pub const ALL: [ServiceType; 9] = [
        S::Unknown,
        S::Exchange,
        S::OneDrive,
        S::SharePoint,
        S::ExchangeMetadata,
        S::OneDriveMetadata,
        S::SharePointMetadata,
        S::Groups,
        S::GroupsMetadata,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            S::Unknown => "UnknownService",
            S::Exchange => "exchange",
            S::OneDrive => "onedrive",
            S::SharePoint => "sharepoint",
            S::ExchangeMetadata => "exchangeMetadata",
            S::OneDriveMetadata => "onedriveMetadata",
            S::SharePointMetadata => "sharepointMetadata",
            S::Groups => "groups",
            S::GroupsMetadata => "groupsMetadata",
        }
    }

    /// Categories that may appear under this service. Empty for services that
    /// cannot hold data.
    pub fn categories(self) -> &'static [CategoryType] {
        match self {
            S::Unknown => &[],
            S::Exchange => EXCHANGE_CATEGORIES,
            S::OneDrive => ONEDRIVE_CATEGORIES,
            S::SharePoint => SHAREPOINT_CATEGORIES,
            S::Groups => GROUPS_CATEGORIES,
            S::ExchangeMetadata => EXCHANGE_METADATA_CATEGORIES,
            S::OneDriveMetadata => ONEDRIVE_METADATA_CATEGORIES,
            S::SharePointMetadata => SHAREPOINT_METADATA_CATEGORIES,
            S::GroupsMetadata => GROUPS_METADATA_CATEGORIES,
        }
    }

    /// Services whose resources may be nested directly under a resource of
    /// this service.
    pub fn subservices(self) -> &'static [ServiceType] {
        match self {
            S::Groups => &[S::SharePoint],
            S::GroupsMetadata => &[S::SharePointMetadata],
            _ => &[],
        }
    }

    /// The metadata twin of a data service. Metadata services map to
    /// themselves.
    pub fn to_metadata(self) -> ServiceType {
        match self {
            S::Exchange | S::ExchangeMetadata => S::ExchangeMetadata,
            S::OneDrive | S::OneDriveMetadata => S::OneDriveMetadata,
            S::SharePoint | S::SharePointMetadata => S::SharePointMetadata,
            S::Groups | S::GroupsMetadata => S::GroupsMetadata,
            S::Unknown => S::Unknown,
        }
    }

    pub fn is_metadata(self) -> bool {
        matches!(
            self,
            S::ExchangeMetadata | S::OneDriveMetadata | S::SharePointMetadata | S::GroupsMetadata
        )
    }
}

impl CategoryType {
    pub const ALL: [CategoryType; 10] = [
        C::Unknown,
        C::Email,
        C::Contacts,
        C::Events,
        C::Files,
        C::Lists,
        C::Libraries,
        C::Pages,
        C::Details,
        C::ChannelMessages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            C::Unknown => "UnknownCategory",
            C::Email => "email",
            C::Contacts => "contacts",
            C::Events => "events",
            C::Files => "files",
            C::Lists => "lists",
            C::Libraries => "libraries",
            C::Pages => "pages",
            C::Details => "details",
            C::ChannelMessages => "channelMessages",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Token matching is case-insensitive so hand-typed paths still resolve.
impl FromStr for ServiceType {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|svc| svc.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PathError::UnknownService(s.to_string()))
    }
}

impl FromStr for CategoryType {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryType::ALL
            .into_iter()
            .find(|cat| cat.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PathError::UnknownCategory(s.to_string()))
    }
}

pub fn validate_service_and_category(
    service: ServiceType,
    category: CategoryType,
) -> PathResult<()> {
    let allowed = service.categories();
    if allowed.is_empty() {
        return Err(PathError::UnsupportedService(service));
    }

    if !allowed.contains(&category) {
        return Err(PathError::InvalidServiceCategoryPair { service, category });
    }

    Ok(())
}

pub fn validate_service_and_subservice(outer: ServiceType, inner: ServiceType) -> PathResult<()> {
    if !outer.subservices().contains(&inner) {
        return Err(PathError::InvalidSubservicePair { outer, inner });
    }

    Ok(())
}

/// Parse and validate a (service, category) token pair.
pub fn validate_service_and_category_strings(
    service: &str,
    category: &str,
) -> PathResult<(ServiceType, CategoryType)> {
    let service: ServiceType = service.parse()?;
    let category: CategoryType = category.parse()?;

    validate_service_and_category(service, category)?;

    Ok((service, category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_examples() {
        assert!(validate_service_and_category(S::Exchange, C::Email).is_ok());
        assert!(validate_service_and_category(S::OneDrive, C::Files).is_ok());
        assert!(validate_service_and_category(S::SharePoint, C::Libraries).is_ok());
        assert_eq!(
            validate_service_and_category(S::Exchange, C::Files),
            Err(PathError::InvalidServiceCategoryPair {
                service: S::Exchange,
                category: C::Files,
            })
        );
        assert_eq!(
            validate_service_and_category(S::Unknown, C::Email),
            Err(PathError::UnsupportedService(S::Unknown))
        );
    }

    #[test]
    fn test_every_pair_matches_table() {
        for service in ServiceType::ALL {
            for category in CategoryType::ALL {
                let allowed = service.categories().contains(&category);
                let res = validate_service_and_category(service, category);
                assert_eq!(res.is_ok(), allowed, "{service}/{category}");
            }
        }
    }

    #[test]
    fn test_unknown_category_never_valid() {
        for service in ServiceType::ALL {
            assert!(validate_service_and_category(service, C::Unknown).is_err());
        }
    }

    #[test]
    fn test_subservice_nesting() {
        assert!(validate_service_and_subservice(S::Groups, S::SharePoint).is_ok());
        assert!(validate_service_and_subservice(S::GroupsMetadata, S::SharePointMetadata).is_ok());
        assert!(validate_service_and_subservice(S::SharePoint, S::Groups).is_err());
        assert!(validate_service_and_subservice(S::Groups, S::Exchange).is_err());
        assert!(validate_service_and_subservice(S::Exchange, S::Exchange).is_err());
    }

    #[test]
    fn test_metadata_mapping() {
        for svc in ServiceType::ALL {
            let meta = svc.to_metadata();
            assert_eq!(meta.to_metadata(), meta);
            if svc != ServiceType::Unknown {
                assert!(meta.is_metadata(), "{svc}");
            }
        }

        assert!(!ServiceType::Exchange.is_metadata());
        assert!(!ServiceType::Groups.is_metadata());
        assert!(!ServiceType::Unknown.is_metadata());
        assert_eq!(ServiceType::SharePoint.to_metadata(), ServiceType::SharePointMetadata);
    }

    #[test]
    fn test_tokens_roundtrip() {
        for service in ServiceType::ALL {
            assert_eq!(service.as_str().parse::<ServiceType>().unwrap(), service);
        }
        for category in CategoryType::ALL {
            assert_eq!(category.as_str().parse::<CategoryType>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Exchange".parse::<ServiceType>().unwrap(), S::Exchange);
        assert_eq!("EMAIL".parse::<CategoryType>().unwrap(), C::Email);
        assert!("mailbox".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_serde_matches_tokens() {
        for service in ServiceType::ALL {
            let json = serde_json::to_string(&service).unwrap();
            assert_eq!(json, format!("\"{}\"", service.as_str()));
        }
        for category in CategoryType::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_stable_integer_values() {
        assert_eq!(S::Exchange as u8, 1);
        assert_eq!(S::GroupsMetadata as u8, 8);
        assert_eq!(C::Email as u8, 1);
        assert_eq!(C::ChannelMessages as u8, 9);
    }

    #[test]
    fn test_validate_strings() {
        assert_eq!(
            validate_service_and_category_strings("exchange", "contacts").unwrap(),
            (S::Exchange, C::Contacts)
        );
        assert!(matches!(
            validate_service_and_category_strings("nope", "contacts"),
            Err(PathError::UnknownService(_))
        ));
        assert!(matches!(
            validate_service_and_category_strings("exchange", "nope"),
            Err(PathError::UnknownCategory(_))
        ));
    }
}
