//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Link`] - A short alias mapped to one or more destination URLs
//! - [`Account`] - An owner of links
//! - [`Caller`] - The authenticated identity behind a request
//!
//! Input and output shapes of the link registry ([`NewLink`], [`CreatedLink`],
//! [`Resolution`]) live next to [`Link`].

pub mod account;
pub mod link;

pub use account::{Account, Caller};
pub use link::{CreatedLink, Link, LinkFilter, NewLink, Resolution};
