//! Admin role management.
//!
//! Assignments locate the target user by email, patch the role/permissions
//! fields on their profile document, and record the grant in the
//! `adminAssignments` collection. The find-then-update pair is not atomic;
//! a concurrent change to the user document between the query and the patch
//! wins last-writer.

#[cfg(test)]
mod tests;

use crate::auth::models::{Role, UserProfile};
use crate::store::query::{FieldOp, Query};
use crate::store::{DocumentStore, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A record of an admin grant in `adminAssignments`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminAssignment {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub assigned_by: String,
    pub assigned_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RolePatch {
    role: Role,
    permissions: Vec<String>,
}

pub struct AdminService {
    store: DocumentStore,
}

impl AdminService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// All user profiles holding the given role.
    pub async fn users_by_role(&self, role: Role) -> Result<Vec<UserProfile>, AdminError> {
        let query = Query::collection("users").filter("role", FieldOp::Equal, role)?;
        let hits = self.store.query::<UserProfile>(query).await?;
        Ok(hits.into_iter().map(|hit| hit.data).collect())
    }

    /// Grants a role to the user with the given email.
    ///
    /// Returns `Ok(false)` when no user document matches the email; that is
    /// not an error. On a match the user document is patched first and the
    /// assignment record written second, so a failure between the two leaves
    /// the role granted but unrecorded.
    pub async fn assign_admin_role(
        &self,
        email: &str,
        role: Role,
        permissions: Vec<String>,
        assigned_by: &str,
    ) -> Result<bool, AdminError> {
        let Some(hit) = self.find_user(email).await? else {
            tracing::info!(%email, "admin assignment skipped: no matching user");
            return Ok(false);
        };

        self.store
            .doc(&format!("users/{}", hit.id))
            .update(
                &RolePatch {
                    role,
                    permissions: permissions.clone(),
                },
                &["role", "permissions"],
            )
            .await?;

        let assignment = AdminAssignment {
            uid: hit.id.clone(),
            email: email.to_string(),
            display_name: hit.data.display_name,
            role,
            permissions,
            is_active: true,
            assigned_by: assigned_by.to_string(),
            assigned_at: Utc::now().to_rfc3339(),
        };

        if let Err(e) = self
            .store
            .doc(&format!("adminAssignments/{}", hit.id))
            .set(&assignment)
            .await
        {
            // The role patch already landed; surface the gap loudly.
            tracing::warn!(uid = %hit.id, "role granted but assignment record failed: {}", e);
            return Err(e.into());
        }

        tracing::info!(uid = %hit.id, ?role, "admin role assigned");
        Ok(true)
    }

    /// Revokes elevated access from the user with the given email.
    ///
    /// Returns `Ok(false)` when no user document matches. The assignment
    /// record is marked inactive rather than deleted; a failure there is
    /// logged but does not undo the revocation.
    pub async fn remove_admin_role(&self, email: &str) -> Result<bool, AdminError> {
        let Some(hit) = self.find_user(email).await? else {
            tracing::info!(%email, "admin removal skipped: no matching user");
            return Ok(false);
        };

        self.store
            .doc(&format!("users/{}", hit.id))
            .update(
                &RolePatch {
                    role: Role::User,
                    permissions: vec![],
                },
                &["role", "permissions"],
            )
            .await?;

        if let Err(e) = self
            .store
            .doc(&format!("adminAssignments/{}", hit.id))
            .update(&serde_json::json!({ "isActive": false }), &["isActive"])
            .await
        {
            tracing::warn!(uid = %hit.id, "failed to deactivate assignment record: {}", e);
        }

        tracing::info!(uid = %hit.id, "admin role removed");
        Ok(true)
    }

    /// Active assignment records.
    pub async fn list_assignments(&self) -> Result<Vec<AdminAssignment>, AdminError> {
        let query =
            Query::collection("adminAssignments").filter("isActive", FieldOp::Equal, true)?;
        let hits = self.store.query::<AdminAssignment>(query).await?;
        Ok(hits.into_iter().map(|hit| hit.data).collect())
    }

    async fn find_user(
        &self,
        email: &str,
    ) -> Result<Option<crate::store::QueryHit<UserProfile>>, AdminError> {
        let query = Query::collection("users")
            .filter("email", FieldOp::Equal, email)?
            .limit(1);
        let mut hits = self.store.query::<UserProfile>(query).await?;
        Ok(hits.pop())
    }
}
