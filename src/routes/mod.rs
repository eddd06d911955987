/// Router Module Index
///
/// Two surfaces: the anonymous citizen-facing catalog, and the back-office
/// nested under `/admin` behind the session guard.

/// Read-only catalog plus sign-in and sign-out.
pub mod public;

/// Back-office routes. Every handler here also checks its own capability.
pub mod admin;
