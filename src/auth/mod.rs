// Verification-side auth plumbing; token issuance lives elsewhere

pub mod jwt;
