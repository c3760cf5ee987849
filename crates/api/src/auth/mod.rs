//! Access-token verification for the hosted auth service.
//!
//! Sign-up, login and session refresh happen against the hosted auth
//! service directly; this server only verifies the tokens it issues.

pub mod jwt;
