//! Session payloads
//!
//! Every shape that may be stored in a session is a variant of
//! [`SessionProfile`], so the serialization boundary is checked at compile
//! time.

use super::common::StringUuid;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Session key under which the profile is stored
pub const PROFILE_KEY: &str = "profile";

/// A logged-in master ("host") user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HostProfile {
    pub user_id: StringUuid,
    pub email: String,
}

/// A logged-in tenant ("client") user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClientProfile {
    pub user_id: StringUuid,
    pub tenant_id: StringUuid,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionProfile {
    Host(HostProfile),
    Client(ClientProfile),
}

impl SessionProfile {
    pub fn user_id(&self) -> StringUuid {
        match self {
            SessionProfile::Host(p) => p.user_id,
            SessionProfile::Client(p) => p.user_id,
        }
    }

    /// Tenant the session is bound to, `None` for host sessions
    pub fn tenant_id(&self) -> Option<StringUuid> {
        match self {
            SessionProfile::Host(_) => None,
            SessionProfile::Client(p) => Some(p.tenant_id),
        }
    }
}
