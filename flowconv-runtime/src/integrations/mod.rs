//! Built-in integrations.

pub mod agent;

use crate::component::Registration;

/// Registrations of every built-in component.
pub fn registrations() -> Vec<Registration> {
    vec![agent::registration()]
}
