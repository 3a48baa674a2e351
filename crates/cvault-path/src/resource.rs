use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};
use crate::taxonomy::{validate_service_and_subservice, ServiceType};

/// A protected resource together with the service that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResource {
    pub service: ServiceType,
    pub protected_resource: String,
}

impl ServiceResource {
    pub fn new(service: ServiceType, protected_resource: impl Into<String>) -> Self {
        Self {
            service,
            protected_resource: protected_resource.into(),
        }
    }
}

/// Build and validate an ownership chain, outermost resource first.
pub fn new_service_resources<I, R>(pairs: I) -> PathResult<Vec<ServiceResource>>
where
    I: IntoIterator<Item = (ServiceType, R)>,
    R: Into<String>,
{
    let srs: Vec<ServiceResource> = pairs
        .into_iter()
        .map(|(service, resource)| ServiceResource::new(service, resource))
        .collect();

    validate_service_resources(&srs)?;

    Ok(srs)
}

/// The chain must be non-empty, every resource id populated, and every
/// adjacent pair a legal service/subservice nesting.
pub fn validate_service_resources(srs: &[ServiceResource]) -> PathResult<()> {
    if srs.is_empty() {
        return Err(PathError::MissingSegment("service resource"));
    }

    for sr in srs {
        if sr.protected_resource.is_empty() {
            return Err(PathError::MissingSegment("protected resource"));
        }
    }

    for pair in srs.windows(2) {
        validate_service_and_subservice(pair[0].service, pair[1].service)?;
    }

    Ok(())
}

/// Flatten a chain into `service, resource, service, resource, ...` elements.
pub(crate) fn service_resources_to_elements(srs: &[ServiceResource]) -> Vec<String> {
    srs.iter()
        .flat_map(|sr| [sr.service.as_str().to_string(), sr.protected_resource.clone()])
        .collect()
}

/// Read a chain from elements that start immediately after the tenant.
///
/// Pairs are consumed while the next element names a service. Returns the
/// chain and the number of elements it spans.
pub(crate) fn elements_to_service_resources(
    elems: &[String],
) -> PathResult<(Vec<ServiceResource>, usize)> {
    let mut srs = Vec::new();
    let mut i = 0;

    loop {
        let service: ServiceType = elems
            .get(i)
            .ok_or(PathError::MissingSegment("service"))?
            .parse()?;
        let resource = elems
            .get(i + 1)
            .ok_or(PathError::MissingSegment("protected resource"))?;

        srs.push(ServiceResource::new(service, resource.clone()));
        i += 2;

        let next_is_service = elems
            .get(i)
            .is_some_and(|e| e.parse::<ServiceType>().is_ok());
        if !next_is_service {
            break;
        }
    }

    validate_service_resources(&srs)?;

    Ok((srs, i))
}
