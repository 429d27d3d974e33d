//! Concrete wizard instances built on the shared wizard core.
//!
//! Each flow declares its field schema, step table, typed form struct, and
//! the explicit wire mapping its submission endpoint expects. Validation and
//! cursor rules live in `crate::wizard`; flows only supply data.

pub mod lead_intake;
pub mod talent_profile;
