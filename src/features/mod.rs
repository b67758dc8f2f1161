//! Feature modules. Auth is the only feature; its pure pieces compile on
//! every target so they can be unit tested natively.

pub mod auth;
pub mod paths;
