//! Auth collaborator boundary
//!
//! Login and session refresh live outside the reports screen. This module only
//! answers "is there a usable bearer credential right now?".

pub mod context;
pub mod storage;

pub use context::{AuthContext, AuthRequired, Credential, StaticToken, TokenSource};
