//! Association lookup.
//!
//! Selection rules:
//! 1. No associations at all → `NoAssociationFound`.
//! 2. First `AVAILABLE` association in service order wins.
//! 3. Associations exist but none is `AVAILABLE` → `NoAvailableAssociationFound`.
//! 4. Both base paths of the winner are normalized before returning.

use fsx_drt_core::{
    paths::normalize_base, DataRepositoryApi, FileSystemId, OrchestrationError,
    RepositoryAssociation, ResolvedAssociation,
};

/// List the associations of `file_system_id` and pick the usable one.
pub async fn locate<A>(
    api: &A,
    file_system_id: &FileSystemId,
) -> Result<ResolvedAssociation, OrchestrationError>
where
    A: DataRepositoryApi + ?Sized,
{
    let associations = api.list_associations(file_system_id).await?;
    tracing::debug!(
        count = associations.len(),
        "listed data repository associations"
    );
    select(file_system_id, &associations)
}

/// Apply the selection rules to an already-fetched listing.
pub fn select(
    file_system_id: &FileSystemId,
    associations: &[RepositoryAssociation],
) -> Result<ResolvedAssociation, OrchestrationError> {
    if associations.is_empty() {
        return Err(OrchestrationError::NoAssociationFound {
            file_system_id: file_system_id.clone(),
        });
    }

    let Some(chosen) = associations.iter().find(|a| a.lifecycle.is_available()) else {
        return Err(OrchestrationError::NoAvailableAssociationFound {
            file_system_id: file_system_id.clone(),
            observed: associations.iter().map(|a| a.lifecycle.clone()).collect(),
        });
    };

    if associations.len() > 1 {
        tracing::debug!(
            listed = associations.len(),
            association_id = chosen.association_id.as_deref().unwrap_or("-"),
            "multiple associations listed; using first AVAILABLE"
        );
    }

    let label = chosen.association_id.as_deref().unwrap_or("<unnamed>");
    let repository_base_path = normalize_base(&chosen.repository_path).ok_or_else(|| {
        OrchestrationError::UnusableAssociation {
            reason: format!("association {label} has an empty repository path"),
        }
    })?;
    let file_system_base_path = normalize_base(&chosen.file_system_path).ok_or_else(|| {
        OrchestrationError::UnusableAssociation {
            reason: format!("association {label} has an empty file system path"),
        }
    })?;

    Ok(ResolvedAssociation {
        association_id: chosen.association_id.clone(),
        repository_base_path,
        file_system_base_path,
    })
}
