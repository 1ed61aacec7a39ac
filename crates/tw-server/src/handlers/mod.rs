//! HTTP request handlers.

pub(crate) mod pages;
pub(crate) mod reload;
pub(crate) mod search;
