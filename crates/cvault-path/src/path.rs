//! Validated data-layer resource paths.
//!
//! Stored layout:
//!
//! ```text
//! <tenant>/<service>/<resource>[/<service>/<resource>...]/<category>/<folder>.../[<item>]
//! ```
//!
//! A `ResourcePath` can only be produced by the validating constructors in
//! this module, so holding one means the prefix is well formed.

use std::fmt;

use crate::builder::Builder;
use crate::elements::{Elements, CONCEALED};
use crate::error::{PathError, PathResult};
use crate::escape::{split, trim_trailing_slash};
use crate::resource::{
    elements_to_service_resources, service_resources_to_elements, validate_service_resources,
    ServiceResource,
};
use crate::taxonomy::{validate_service_and_category, CategoryType, ServiceType};

/// Tenant, one service/resource pair, category, and one folder or item.
pub const MIN_DATA_LAYER_ELEMENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    builder: Builder,
    service_resources: Vec<ServiceResource>,
    category: CategoryType,
    has_item: bool,
}

/// Build a full path from its parts. At least one trailing element is
/// required.
pub fn build<I, S>(
    tenant: &str,
    srs: &[ServiceResource],
    category: CategoryType,
    has_item: bool,
    elements: I,
) -> PathResult<ResourcePath>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Builder::new()
        .append(elements)
        .to_data_layer_path(tenant, srs, category, has_item)
}

/// Build the `<tenant>/<service>/<resource>.../<category>` prefix on its own.
pub fn build_prefix(
    tenant: &str,
    srs: &[ServiceResource],
    category: CategoryType,
) -> PathResult<ResourcePath> {
    verify_prefix(tenant, srs, category)?;

    Ok(ResourcePath::assemble(&Builder::new(), tenant, srs, category, false))
}

/// Parse an escaped data-layer path.
///
/// Accepts exactly what [`ResourcePath`]'s `Display` produces for the same
/// logical path.
pub fn from_data_layer_path(p: &str, is_item: bool) -> PathResult<ResourcePath> {
    let trimmed = trim_trailing_slash(p);
    if trimmed.is_empty() {
        return Err(PathError::parse(p, PathError::MissingSegment("path")));
    }

    let builder = Builder::new()
        .unescape_and_append(split(trimmed))
        .map_err(|e| PathError::parse(p, e))?;

    if builder.len() < MIN_DATA_LAYER_ELEMENTS {
        return Err(PathError::parse(
            p,
            PathError::TooFewSegments {
                got: builder.len(),
                need: MIN_DATA_LAYER_ELEMENTS,
            },
        ));
    }

    let elems = builder.elements();
    let (srs, used) =
        elements_to_service_resources(&elems[1..]).map_err(|e| PathError::parse(p, e))?;

    let category_idx = 1 + used;
    let category: CategoryType = elems
        .get(category_idx)
        .ok_or(PathError::MissingSegment("category"))
        .and_then(|c| c.parse())
        .map_err(|e| PathError::parse(p, e))?;

    if let Some(last) = srs.last() {
        validate_service_and_category(last.service, category)
            .map_err(|e| PathError::parse(p, e))?;
    }

    // Nested chains push the category out; there must still be something
    // after it.
    if elems.len() <= category_idx + 1 {
        return Err(PathError::parse(
            p,
            PathError::TooFewSegments {
                got: elems.len(),
                need: category_idx + 2,
            },
        ));
    }

    Ok(ResourcePath {
        builder,
        service_resources: srs,
        category,
        has_item: is_item,
    })
}

fn verify_prefix(tenant: &str, srs: &[ServiceResource], category: CategoryType) -> PathResult<()> {
    if tenant.is_empty() {
        return Err(PathError::MissingSegment("tenant"));
    }

    validate_service_resources(srs)?;

    if let Some(last) = srs.last() {
        validate_service_and_category(last.service, category)?;
    }

    Ok(())
}

impl Builder {
    /// Prefix this builder with tenant, ownership chain, and category.
    pub fn to_data_layer_path(
        &self,
        tenant: &str,
        srs: &[ServiceResource],
        category: CategoryType,
        is_item: bool,
    ) -> PathResult<ResourcePath> {
        verify_prefix(tenant, srs, category)?;

        if self.is_empty() {
            return Err(PathError::MissingSegment("folder or item"));
        }

        Ok(ResourcePath::assemble(self, tenant, srs, category, is_item))
    }

    pub fn to_data_layer_exchange_path_for_category(
        &self,
        tenant: &str,
        user: &str,
        category: CategoryType,
        is_item: bool,
    ) -> PathResult<ResourcePath> {
        let srs = [ServiceResource::new(ServiceType::Exchange, user)];
        self.to_data_layer_path(tenant, &srs, category, is_item)
    }

    pub fn to_data_layer_onedrive_path(
        &self,
        tenant: &str,
        user: &str,
        is_item: bool,
    ) -> PathResult<ResourcePath> {
        let srs = [ServiceResource::new(ServiceType::OneDrive, user)];
        self.to_data_layer_path(tenant, &srs, CategoryType::Files, is_item)
    }

    pub fn to_data_layer_sharepoint_path(
        &self,
        tenant: &str,
        site: &str,
        category: CategoryType,
        is_item: bool,
    ) -> PathResult<ResourcePath> {
        let srs = [ServiceResource::new(ServiceType::SharePoint, site)];
        self.to_data_layer_path(tenant, &srs, category, is_item)
    }

    /// Path under the metadata twin of each service in the chain. The
    /// (service, category) pair is validated against the data service.
    pub fn to_service_category_metadata_path(
        &self,
        tenant: &str,
        srs: &[ServiceResource],
        category: CategoryType,
        is_item: bool,
    ) -> PathResult<ResourcePath> {
        verify_prefix(tenant, srs, category)?;

        if is_item && self.is_empty() {
            return Err(PathError::MissingSegment("item"));
        }

        let metadata: Vec<ServiceResource> = srs
            .iter()
            .map(|sr| ServiceResource::new(sr.service.to_metadata(), sr.protected_resource.clone()))
            .collect();

        Ok(ResourcePath::assemble(self, tenant, &metadata, category, is_item))
    }

    /// Path for backup details streams:
    /// `<tenant>/<service metadata>/<purpose>/details/...`.
    pub fn to_stream_store_path(
        &self,
        tenant: &str,
        purpose: &str,
        service: ServiceType,
        is_item: bool,
    ) -> PathResult<ResourcePath> {
        if tenant.is_empty() {
            return Err(PathError::MissingSegment("tenant"));
        }

        if purpose.is_empty() {
            return Err(PathError::MissingSegment("purpose"));
        }

        if is_item && self.is_empty() {
            return Err(PathError::MissingSegment("item"));
        }

        let metadata_service = service.to_metadata();
        validate_service_and_category(metadata_service, CategoryType::Details)?;

        let srs = [ServiceResource::new(metadata_service, purpose)];

        Ok(ResourcePath::assemble(
            self,
            tenant,
            &srs,
            CategoryType::Details,
            is_item,
        ))
    }
}

impl ResourcePath {
    fn assemble(
        suffix: &Builder,
        tenant: &str,
        srs: &[ServiceResource],
        category: CategoryType,
        has_item: bool,
    ) -> ResourcePath {
        let mut prefix = vec![tenant.to_string()];
        prefix.extend(service_resources_to_elements(srs));
        prefix.push(category.as_str().to_string());

        ResourcePath {
            builder: suffix.with_prefix(prefix),
            service_resources: srs.to_vec(),
            category,
            has_item,
        }
    }

    fn category_idx(&self) -> usize {
        1 + 2 * self.service_resources.len()
    }

    fn prefix_len(&self) -> usize {
        self.category_idx() + 1
    }

    pub fn tenant(&self) -> &str {
        &self.builder.elements()[0]
    }

    pub fn service_resources(&self) -> &[ServiceResource] {
        &self.service_resources
    }

    /// The outermost service in the ownership chain.
    pub fn primary_service(&self) -> ServiceType {
        self.service_resources[0].service
    }

    /// The innermost service, the one the category belongs to.
    pub fn service(&self) -> ServiceType {
        self.service_resources[self.service_resources.len() - 1].service
    }

    /// The outermost protected resource.
    pub fn protected_resource(&self) -> &str {
        &self.service_resources[0].protected_resource
    }

    pub fn category(&self) -> CategoryType {
        self.category
    }

    pub fn is_item(&self) -> bool {
        self.has_item
    }

    /// The trailing element when this is an item path.
    pub fn item(&self) -> Option<&str> {
        if self.has_item {
            self.builder.last_elem()
        } else {
            None
        }
    }

    /// Raw folder elements between the category and the item.
    pub fn folders(&self) -> Elements {
        let elems = self.builder.elements();
        let end = if self.has_item {
            elems.len() - 1
        } else {
            elems.len()
        };
        let start = self.prefix_len().min(end);

        Elements::from(&elems[start..end])
    }

    /// The folder elements joined, escaped or raw.
    pub fn folder(&self, escaped: bool) -> String {
        let folders = self.folders();
        if escaped {
            folders.to_string()
        } else {
            folders.plain_string()
        }
    }

    pub fn elements(&self) -> &Elements {
        self.builder.elements()
    }

    /// Prefix through the category, and everything after it.
    pub fn halves(&self) -> (Builder, Elements) {
        let elems = self.builder.elements();
        let split_at = self.prefix_len().min(elems.len());

        (
            Builder::new().append(&elems[..split_at]),
            Elements::from(&elems[split_at..]),
        )
    }

    /// New path with one more element.
    pub fn append(&self, element: &str, is_item: bool) -> PathResult<ResourcePath> {
        if self.has_item {
            return Err(PathError::AppendToItemPath);
        }
        if element.is_empty() {
            return Err(PathError::MissingSegment("folder or item"));
        }

        Ok(ResourcePath {
            builder: self.builder.append([element]),
            service_resources: self.service_resources.clone(),
            category: self.category,
            has_item: is_item,
        })
    }

    pub fn append_item(&self, item: &str) -> PathResult<ResourcePath> {
        self.append(item, true)
    }

    /// The parent folder path. Fails rather than cut into the prefix.
    pub fn dir(&self) -> PathResult<ResourcePath> {
        if self.builder.len() <= self.prefix_len() {
            return Err(PathError::DirOfMinimalPath);
        }

        Ok(ResourcePath {
            builder: self.builder.dir(),
            service_resources: self.service_resources.clone(),
            category: self.category,
            has_item: false,
        })
    }

    /// All elements but the tenant. No longer a valid resource path, so a
    /// builder comes back.
    pub fn pop_front(&self) -> Builder {
        self.builder.pop_front()
    }

    /// Re-parent this path in place when the folder `prev` moved to `cur`.
    ///
    /// Same exclusivity rule as [`Builder::update_parent`].
    pub fn update_parent(&mut self, prev: &ResourcePath, cur: &ResourcePath) -> bool {
        self.builder.update_parent(&prev.builder, &cur.builder)
    }

    pub fn short_ref(&self) -> String {
        self.builder.short_ref()
    }

    pub fn to_builder(&self) -> Builder {
        self.builder.clone()
    }

    pub fn plain_string(&self) -> String {
        self.builder.plain_string()
    }

    /// Log-safe rendering: service and category tokens stay, everything else
    /// is masked.
    pub fn conceal(&self) -> String {
        let category_idx = self.category_idx();
        let parts: Vec<&str> = self
            .builder
            .elements()
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let is_service = i % 2 == 1 && i < category_idx;
                if is_service || i == category_idx {
                    e.as_str()
                } else {
                    CONCEALED
                }
            })
            .collect();

        crate::escape::join(parts)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.builder, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::new_service_resources;

    const TENANT: &str = "aTenant";
    const RESOURCE: &str = "aProtectedResource";
    const REST: &[&str] = &["some", "folder", "path", "with", "possible", "item"];

    fn exchange(resource: &str) -> Vec<ServiceResource> {
        vec![ServiceResource::new(ServiceType::Exchange, resource)]
    }

    fn all_valid_chains() -> Vec<(Vec<ServiceResource>, CategoryType)> {
        let single = |svc| vec![ServiceResource::new(svc, RESOURCE)];
        vec![
            (single(ServiceType::Exchange), CategoryType::Email),
            (single(ServiceType::Exchange), CategoryType::Contacts),
            (single(ServiceType::Exchange), CategoryType::Events),
            (single(ServiceType::OneDrive), CategoryType::Files),
            (single(ServiceType::SharePoint), CategoryType::Libraries),
            (single(ServiceType::SharePoint), CategoryType::Lists),
            (single(ServiceType::SharePoint), CategoryType::Pages),
            (single(ServiceType::Groups), CategoryType::ChannelMessages),
            (
                new_service_resources([
                    (ServiceType::Groups, RESOURCE),
                    (ServiceType::SharePoint, "aSite"),
                ])
                .unwrap(),
                CategoryType::Libraries,
            ),
        ]
    }

    #[test]
    fn test_build_and_parse_every_valid_chain() {
        for (srs, category) in all_valid_chains() {
            for is_item in [false, true] {
                let p = build(TENANT, &srs, category, is_item, REST).unwrap();
                let parsed = from_data_layer_path(&p.to_string(), is_item).unwrap();

                assert_eq!(parsed, p, "{}", p.conceal());
                assert_eq!(parsed.category(), category);
                assert_eq!(parsed.service_resources(), &srs[..]);
                assert_eq!(parsed.tenant(), TENANT);
                assert_eq!(parsed.protected_resource(), RESOURCE);
                assert_eq!(parsed.primary_service(), srs[0].service);

                if is_item {
                    assert_eq!(parsed.item(), Some("item"));
                    assert_eq!(parsed.folders(), REST[..REST.len() - 1]);
                } else {
                    assert_eq!(parsed.item(), None);
                    assert_eq!(parsed.folders(), REST[..]);
                }
            }
        }
    }

    #[test]
    fn test_build_missing_info() {
        assert_eq!(
            build("", &exchange(RESOURCE), CategoryType::Email, false, REST).unwrap_err(),
            PathError::MissingSegment("tenant")
        );
        assert_eq!(
            build(TENANT, &exchange(""), CategoryType::Email, false, REST).unwrap_err(),
            PathError::MissingSegment("protected resource")
        );
        assert_eq!(
            build(TENANT, &exchange(RESOURCE), CategoryType::Email, false, Vec::<String>::new())
                .unwrap_err(),
            PathError::MissingSegment("folder or item")
        );
        assert_eq!(
            build(TENANT, &[], CategoryType::Email, false, REST).unwrap_err(),
            PathError::MissingSegment("service resource")
        );
    }

    #[test]
    fn test_build_validation_order() {
        // Empty tenant is reported before the bad category.
        assert_eq!(
            build("", &exchange(RESOURCE), CategoryType::Files, false, REST).unwrap_err(),
            PathError::MissingSegment("tenant")
        );
        assert_eq!(
            build(TENANT, &exchange(RESOURCE), CategoryType::Files, false, REST).unwrap_err(),
            PathError::InvalidServiceCategoryPair {
                service: ServiceType::Exchange,
                category: CategoryType::Files,
            }
        );
    }

    #[test]
    fn test_build_category_checked_against_last_service() {
        let srs = new_service_resources([
            (ServiceType::Groups, "g"),
            (ServiceType::SharePoint, "s"),
        ])
        .unwrap();

        // Pages is a SharePoint category but not a Groups one.
        assert!(build(TENANT, &srs, CategoryType::Pages, false, REST).is_ok());
        assert!(build(TENANT, &srs, CategoryType::ChannelMessages, false, REST).is_err());
    }

    #[test]
    fn test_build_prefix() {
        let p = build_prefix(TENANT, &exchange(RESOURCE), CategoryType::Contacts).unwrap();
        assert_eq!(p.to_string(), "aTenant/exchange/aProtectedResource/contacts");
        assert!(p.folders().is_empty());
        assert_eq!(p.item(), None);
        assert_eq!(p.dir().unwrap_err(), PathError::DirOfMinimalPath);
    }

    #[test]
    fn test_from_data_layer_path_errors() {
        let cases: &[(&str, &str, fn(&PathError) -> bool)] = &[
            ("TooFewElements", "a/b/c", |e| {
                matches!(e, PathError::TooFewSegments { got: 3, .. })
            }),
            ("TooFewElementsEmptyElement", "a/b//c/d", |e| {
                matches!(e, PathError::TooFewSegments { got: 4, .. })
            }),
            ("BadEscapeSequence", r"t/exchange/u/email/f\a", |e| {
                matches!(e, PathError::BadEscapeSequence('a'))
            }),
            ("TrailingEscapeCharacter", r"t/exchange/u/email/f\", |e| {
                matches!(e, PathError::TrailingEscapeCharacter)
            }),
            ("UnknownService", "t/mailbox/u/email/f", |e| {
                matches!(e, PathError::UnknownService(_))
            }),
            ("UnknownCategory", "t/exchange/u/mail/f", |e| {
                matches!(e, PathError::UnknownCategory(_))
            }),
            ("InvalidPair", "t/exchange/u/files/f", |e| {
                matches!(e, PathError::InvalidServiceCategoryPair { .. })
            }),
            ("InvalidSubservice", "t/sharepoint/s/groups/g/libraries/f", |e| {
                matches!(e, PathError::InvalidSubservicePair { .. })
            }),
            ("NoFolderOrItemNested", "t/groups/g/sharepoint/s/libraries", |e| {
                matches!(e, PathError::TooFewSegments { .. })
            }),
            ("EmptyPath", "", |e| matches!(e, PathError::MissingSegment("path"))),
            ("JustPathSeparator", "/", |e| {
                matches!(e, PathError::MissingSegment("path"))
            }),
            ("JustMultiplePathSeparators", "////", |e| {
                matches!(e, PathError::MissingSegment("path"))
            }),
        ];

        for (name, input, check) in cases {
            let err = from_data_layer_path(input, false).unwrap_err();
            assert!(matches!(err, PathError::Parse { .. }), "{name}: {err:?}");
            assert!(check(err.root_cause()), "{name}: {err:?}");
        }
    }

    #[test]
    fn test_from_data_layer_path_minimal() {
        let p = from_data_layer_path("tenant/exchange/resource/email/item", true).unwrap();
        assert!(p.is_item());
        assert_eq!(p.item(), Some("item"));
        assert!(p.folders().is_empty());
        assert_eq!(p.service(), ServiceType::Exchange);
    }

    #[test]
    fn test_from_data_layer_path_empty_elements_and_trailing() {
        let p = from_data_layer_path("t//exchange/u/email/a//b/", false).unwrap();
        assert_eq!(p.to_string(), "t/exchange/u/email/a/b");
        assert_eq!(p.folders(), ["a", "b"]);
    }

    #[test]
    fn test_escaped_elements_survive_parse() {
        let p = build(TENANT, &exchange(RESOURCE), CategoryType::Email, true, ["a/b", r"c\", "i"])
            .unwrap();
        let s = p.to_string();
        assert_eq!(s, r"aTenant/exchange/aProtectedResource/email/a\/b/c\\/i");

        let parsed = from_data_layer_path(&s, true).unwrap();
        assert_eq!(parsed.folders(), ["a/b", r"c\"]);
        assert_eq!(parsed.item(), Some("i"));
    }

    #[test]
    fn test_folder() {
        let p = Builder::new()
            .append(["a/", "b", "c"])
            .to_data_layer_exchange_path_for_category("t", "u", CategoryType::Email, false)
            .unwrap();

        assert_eq!(p.folder(false), "a//b/c");
        assert_eq!(split(&p.folder(false)), ["a", "b", "c"]);
        assert_eq!(p.folder(true), r"a\//b/c");
        assert_eq!(split(&p.folder(true)), [r"a\/", "b", "c"]);
    }

    #[test]
    fn test_append() {
        let folder = build(TENANT, &exchange(RESOURCE), CategoryType::Email, false, REST).unwrap();
        let item = folder.append("new", true).unwrap();
        assert_eq!(item.item(), Some("new"));
        assert_eq!(item.folder(false), REST.join("/"));

        let dir = folder.append("new", false).unwrap();
        assert_eq!(dir.item(), None);
        assert_eq!(dir.folder(false), format!("{}/new", REST.join("/")));

        assert_eq!(item.append("x", false).unwrap_err(), PathError::AppendToItemPath);
    }

    #[test]
    fn test_append_empty_element() {
        let missing = PathError::MissingSegment("folder or item");

        let folder = build(TENANT, &exchange(RESOURCE), CategoryType::Email, false, ["inbox"]).unwrap();
        assert_eq!(folder.append("", true).unwrap_err(), missing);
        assert_eq!(folder.append_item("").unwrap_err(), missing);
        assert_eq!(folder.append("", false).unwrap_err(), missing);

        let prefix = build_prefix(TENANT, &exchange(RESOURCE), CategoryType::Contacts).unwrap();
        assert_eq!(prefix.append("", true).unwrap_err(), missing);

        // A non-empty append off the prefix still parses back.
        let item = prefix.append("item", true).unwrap();
        let parsed = from_data_layer_path(&item.to_string(), true).unwrap();
        assert_eq!(parsed.item(), Some("item"));
        assert!(parsed.folders().is_empty());
    }

    #[test]
    fn test_dir_append_symmetry() {
        let p = build(TENANT, &exchange(RESOURCE), CategoryType::Email, false, ["f1"]).unwrap();
        let round = p.append("x", false).unwrap().dir().unwrap();
        assert_eq!(round.to_string(), p.to_string());
        assert_eq!(round, p);
    }

    #[test]
    fn test_dir_walks_to_prefix() {
        let mut p = build(TENANT, &exchange(RESOURCE), CategoryType::Email, true, REST).unwrap();
        for remaining in (0..REST.len()).rev() {
            p = p.dir().unwrap();
            assert!(!p.is_item());
            assert_eq!(p.folders(), REST[..remaining]);
        }
        assert_eq!(p.dir().unwrap_err(), PathError::DirOfMinimalPath);
    }

    #[test]
    fn test_halves() {
        let srs = vec![ServiceResource::new(ServiceType::Exchange, "pr")];
        let expected_prefix =
            Builder::new().append(["tid", "exchange", "pr", "contacts"]);

        let prefix_only = build_prefix("tid", &srs, CategoryType::Contacts).unwrap();
        let (pfx, sfx) = prefix_only.halves();
        assert_eq!(pfx, expected_prefix);
        assert!(sfx.is_empty());

        let full = build("tid", &srs, CategoryType::Contacts, true, ["fld", "item"]).unwrap();
        let (pfx, sfx) = full.halves();
        assert_eq!(pfx, expected_prefix);
        assert_eq!(sfx, ["fld", "item"]);
    }

    #[test]
    fn test_update_parent() {
        let path = |s: &str, is_item: bool| {
            Builder::new()
                .append(s.split('/'))
                .to_data_layer_onedrive_path("tenant", "user", is_item)
                .unwrap()
        };

        let cases = [
            ("folder/item", "folder", "new-folder", Some("new-folder/item")),
            (
                "folder/folder1/folder2/item",
                "folder/folder1",
                "new-folder/new-folder1",
                Some("new-folder/new-folder1/folder2/item"),
            ),
            (
                "folder/folder1/folder2/item",
                "folder/folder1/folder2",
                "new-folder",
                Some("new-folder/item"),
            ),
            (
                "folder/item",
                "folder",
                "folder/folder1/folder2/folder3",
                Some("folder/folder1/folder2/folder3/item"),
            ),
            ("folder/folder1/folder2/item", "folder1", "new-folder1", None),
        ];

        for (item, prev, cur, expected) in cases {
            let mut p = path(item, true);
            let updated = p.update_parent(&path(prev, false), &path(cur, false));

            match expected {
                Some(expected) => {
                    assert!(updated, "{item}");
                    assert_eq!(p, path(expected, true));
                }
                None => {
                    assert!(!updated, "{item}");
                    assert_eq!(p, path(item, true));
                }
            }
        }
    }

    #[test]
    fn test_conceal() {
        let p = build("t", &exchange("ro"), CategoryType::Events, true, ["dir", "item"]).unwrap();
        assert_eq!(p.conceal(), "***/exchange/***/events/***/***");
        assert_eq!(p.to_string(), "t/exchange/ro/events/dir/item");
        assert_eq!(p.plain_string(), "t/exchange/ro/events/dir/item");

        let srs = new_service_resources([
            (ServiceType::Groups, "g"),
            (ServiceType::SharePoint, "s"),
        ])
        .unwrap();
        let nested = build("t", &srs, CategoryType::Libraries, false, ["d"]).unwrap();
        assert_eq!(nested.conceal(), "***/groups/***/sharepoint/***/libraries/***");
    }

    #[test]
    fn test_sharepoint_path() {
        let p = Builder::new()
            .append(["drives", "d1", "root:", "doc"])
            .to_data_layer_sharepoint_path(TENANT, "site", CategoryType::Libraries, true)
            .unwrap();
        assert_eq!(p.service(), ServiceType::SharePoint);
        assert_eq!(p.protected_resource(), "site");
        assert_eq!(p.item(), Some("doc"));
        assert_eq!(p.to_string(), "aTenant/sharepoint/site/libraries/drives/d1/root:/doc");

        assert!(Builder::new()
            .append(["x"])
            .to_data_layer_sharepoint_path(TENANT, "site", CategoryType::Email, false)
            .is_err());
    }

    #[test]
    fn test_pop_front_drops_tenant() {
        let p = build(TENANT, &exchange(RESOURCE), CategoryType::Email, true, ["f", "item"]).unwrap();
        let rest = p.pop_front();
        assert_eq!(rest.to_string(), "exchange/aProtectedResource/email/f/item");
        assert_eq!(rest.len(), p.elements().len() - 1);
        assert!(from_data_layer_path(&rest.to_string(), true).is_err());
    }

    #[test]
    fn test_metadata_path() {
        let p = Builder::new()
            .append(["delta"])
            .to_service_category_metadata_path(TENANT, &exchange(RESOURCE), CategoryType::Email, true)
            .unwrap();
        assert_eq!(p.service(), ServiceType::ExchangeMetadata);
        assert_eq!(p.to_string(), "aTenant/exchangeMetadata/aProtectedResource/email/delta");

        let reparsed = from_data_layer_path(&p.to_string(), true).unwrap();
        assert_eq!(reparsed, p);

        assert!(Builder::new()
            .to_service_category_metadata_path(TENANT, &exchange(RESOURCE), CategoryType::Files, false)
            .is_err());
        assert_eq!(
            Builder::new()
                .to_service_category_metadata_path(TENANT, &exchange(RESOURCE), CategoryType::Email, true)
                .unwrap_err(),
            PathError::MissingSegment("item")
        );
    }

    #[test]
    fn test_stream_store_path() {
        let p = Builder::new()
            .append(["details"])
            .to_stream_store_path(TENANT, "backup-details", ServiceType::OneDrive, true)
            .unwrap();
        assert_eq!(
            p.to_string(),
            "aTenant/onedriveMetadata/backup-details/details/details"
        );
        assert_eq!(p.category(), CategoryType::Details);
        assert!(Builder::new()
            .to_stream_store_path(TENANT, "", ServiceType::OneDrive, false)
            .is_err());
        assert!(Builder::new()
            .to_stream_store_path(TENANT, "p", ServiceType::Unknown, false)
            .is_err());
    }
}
