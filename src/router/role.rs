//! Role derivation from a typed username.
//!
//! There is no credential check behind this: any client can pick a role by
//! choosing a username. Treat the result as a UI hint, not an identity claim.

use crate::session::Role;

/// Derive a role from a username with a case-insensitive substring match.
///
/// First match wins:
/// 1. contains `"editor"` → `Editor`
/// 2. contains `"music"` → `MusicDirector`
/// 3. otherwise → `Director`
pub fn derive_role(username: &str) -> Role {
    let lowered = username.to_lowercase();

    if lowered.contains("editor") {
        Role::Editor
    } else if lowered.contains("music") {
        Role::MusicDirector
    } else {
        Role::Director
    }
}
