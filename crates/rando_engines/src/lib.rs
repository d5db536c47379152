#![forbid(unsafe_code)]

pub mod arg_serializer;
pub mod asset_catalog;
pub mod builtin_catalog;
pub mod multiworld;
pub mod scope_manager;
pub mod session;
