// handlers/mod.rs - Handler tiers
//
// public:    no authentication (/api/, /api/auth/login)
// protected: bearer token, read/write split enforced by middleware (/api/*)
// pages:     browser pages behind the session cookie (except the login page)

pub mod pages;
pub mod protected;
pub mod public;
