//! Domain models for Tenancy Core

pub mod common;
pub mod session;
pub mod tenant;
pub mod user;

pub use common::StringUuid;
pub use session::{ClientProfile, HostProfile, SessionProfile, PROFILE_KEY};
pub use tenant::TenantConnectionInformation;
pub use user::{CreateUserInput, LoginInput, NewUser, UpdateUserInput, User, UserChanges};
