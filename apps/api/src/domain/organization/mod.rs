// Organization domain module

#![allow(clippy::module_inception)]

pub mod organization;
pub mod value_objects;

pub use organization::{Organization, OrganizationChanges};
pub use value_objects::Slug;
